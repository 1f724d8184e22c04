//! Read-only traversal of the generic AST.
//!
//! Each `visit_*` hook of [`Visitor`] runs before the node's children and by
//! default continues into them through the matching `walk_*` function. An
//! override that wants the children visited calls the `walk_*` function itself;
//! one that does not simply returns.
//!
//! Every token, identifier and `Other*` payload item is reached. The contents
//! of [`IdInfoCell`](crate::ast::IdInfoCell)s are not: they are facts about an
//! occurrence, not part of the tree.

use crate::ast::*;

pub trait Visitor {
    fn visit_any(&mut self, any: &Any) {
        walk_any(self, any)
    }
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr)
    }
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt)
    }
    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        walk_stmts(self, stmts)
    }
    fn visit_type(&mut self, ty: &Type) {
        walk_type(self, ty)
    }
    fn visit_pattern(&mut self, pat: &Pattern) {
        walk_pattern(self, pat)
    }
    fn visit_definition(&mut self, def: &Definition) {
        walk_definition(self, def)
    }
    fn visit_directive(&mut self, dir: &Directive) {
        walk_directive(self, dir)
    }
    fn visit_attribute(&mut self, attr: &Attribute) {
        walk_attribute(self, attr)
    }
    fn visit_parameter(&mut self, param: &Parameter) {
        walk_parameter(self, param)
    }
    fn visit_argument(&mut self, arg: &Argument) {
        walk_argument(self, arg)
    }
    fn visit_ident(&mut self, ident: &Ident) {
        walk_ident(self, ident)
    }
    fn visit_name(&mut self, name: &Name) {
        walk_name(self, name)
    }
    fn visit_entity(&mut self, entity: &Entity) {
        walk_entity(self, entity)
    }
    fn visit_function_definition(&mut self, def: &FunctionDefinition) {
        walk_function_definition(self, def)
    }
    fn visit_class_definition(&mut self, def: &ClassDefinition) {
        walk_class_definition(self, def)
    }
    fn visit_field(&mut self, field: &Field) {
        walk_field(self, field)
    }
    fn visit_type_argument(&mut self, arg: &TypeArgument) {
        walk_type_argument(self, arg)
    }
    fn visit_literal(&mut self, lit: &Literal) {
        walk_literal(self, lit)
    }
    fn visit_token(&mut self, _tok: &Token) {}
}

/// Entry point: visit any node.
pub fn visit_any<V: Visitor + ?Sized>(v: &mut V, any: &Any) {
    v.visit_any(any)
}

pub fn walk_any<V: Visitor + ?Sized>(v: &mut V, any: &Any) {
    match any {
        Any::E(e) => v.visit_expr(e),
        Any::S(s) => v.visit_stmt(s),
        Any::T(t) => v.visit_type(t),
        Any::P(p) => v.visit_pattern(p),
        Any::Def(d) => v.visit_definition(d),
        Any::Dir(d) => v.visit_directive(d),
        Any::At(a) => v.visit_attribute(a),
        Any::Pa(p) => v.visit_parameter(p),
        Any::Ar(a) => v.visit_argument(a),
        Any::I(id) => v.visit_ident(id),
        Any::N(n) => v.visit_name(n),
        Any::En(e) => v.visit_entity(e),
        Any::Dk(k) => walk_definition_kind(v, k),
        Any::Di(ids) => walk_idents(v, ids),
        Any::Modn(m) => walk_module_name(v, m),
        Any::Fld(f) => v.visit_field(f),
        Any::Ta(t) => v.visit_type_argument(t),
        Any::Tp(t) => walk_type_parameter(v, t),
        Any::L(l) => v.visit_literal(l),
        Any::Tk(t) => v.visit_token(t),
        Any::Lbl(l) => walk_label(v, l),
        Any::Ss(ss) => v.visit_stmts(ss),
        Any::Params(ps) => ps.iter().for_each(|p| v.visit_parameter(p)),
        Any::Args(args) => args.iter().for_each(|a| v.visit_argument(a)),
        Any::Anys(anys) => walk_anys(v, anys),
    }
}

fn walk_anys<V: Visitor + ?Sized>(v: &mut V, anys: &[Any]) {
    for any in anys {
        v.visit_any(any);
    }
}

fn walk_idents<V: Visitor + ?Sized>(v: &mut V, ids: &[Ident]) {
    for id in ids {
        v.visit_ident(id);
    }
}

fn walk_exprs<V: Visitor + ?Sized>(v: &mut V, exprs: &[Expr]) {
    for e in exprs {
        v.visit_expr(e);
    }
}

fn walk_types<V: Visitor + ?Sized>(v: &mut V, types: &[Type]) {
    for t in types {
        v.visit_type(t);
    }
}

fn walk_fields<V: Visitor + ?Sized>(v: &mut V, fields: &Bracket<Vec<Field>>) {
    v.visit_token(&fields.open);
    for f in &fields.value {
        v.visit_field(f);
    }
    v.visit_token(&fields.close);
}

pub fn walk_arguments<V: Visitor + ?Sized>(v: &mut V, args: &Arguments) {
    v.visit_token(&args.open);
    for a in &args.value {
        v.visit_argument(a);
    }
    v.visit_token(&args.close);
}

pub fn walk_type_arguments<V: Visitor + ?Sized>(v: &mut V, targs: &TypeArguments) {
    v.visit_token(&targs.open);
    for t in &targs.value {
        v.visit_type_argument(t);
    }
    v.visit_token(&targs.close);
}

pub fn walk_ident<V: Visitor + ?Sized>(v: &mut V, ident: &Ident) {
    v.visit_token(&ident.tok)
}

pub fn walk_literal<V: Visitor + ?Sized>(v: &mut V, lit: &Literal) {
    v.visit_token(lit.tok())
}

pub fn walk_name<V: Visitor + ?Sized>(v: &mut V, name: &Name) {
    match name {
        Name::Id(id, _) => v.visit_ident(id),
        Name::IdQualified(qualified, _) => {
            if let Some(qualifier) = &qualified.info.qualifier {
                walk_idents(v, qualifier);
            }
            v.visit_ident(&qualified.ident);
            if let Some(targs) = &qualified.info.typeargs {
                walk_type_arguments(v, targs);
            }
        }
    }
}

pub fn walk_module_name<V: Visitor + ?Sized>(v: &mut V, module: &ModuleName) {
    match module {
        ModuleName::DottedName(ids) => walk_idents(v, ids),
        ModuleName::FileName(file) => v.visit_token(&file.tok),
    }
}

pub fn walk_label<V: Visitor + ?Sized>(v: &mut V, label: &LabelIdent) {
    match label {
        LabelIdent::None => {}
        LabelIdent::Id(id) => v.visit_ident(id),
        LabelIdent::Int(n) => v.visit_token(&n.tok),
        LabelIdent::Dynamic(e) => v.visit_expr(e),
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::L(lit) => v.visit_literal(lit),
        Expr::Container(_, items) | Expr::Tuple(items) => {
            v.visit_token(&items.open);
            walk_exprs(v, &items.value);
            v.visit_token(&items.close);
        }
        Expr::Record(fields) => walk_fields(v, fields),
        Expr::Constructor(name, args) => {
            v.visit_name(name);
            walk_exprs(v, args);
        }
        Expr::Lambda(def) => v.visit_function_definition(def),
        Expr::AnonClass(def) => v.visit_class_definition(def),
        Expr::N(name) => v.visit_name(name),
        Expr::IdSpecial(special) => v.visit_token(&special.tok),
        Expr::Call(callee, args) => {
            v.visit_expr(callee);
            walk_arguments(v, args);
        }
        Expr::DotAccess(obj, dot, field) => {
            v.visit_expr(obj);
            v.visit_token(dot);
            match field {
                FieldName::EN(name) => v.visit_name(name),
                FieldName::EDynamic(e) => v.visit_expr(e),
            }
        }
        Expr::ArrayAccess(obj, index) => {
            v.visit_expr(obj);
            v.visit_token(&index.open);
            v.visit_expr(&index.value);
            v.visit_token(&index.close);
        }
        Expr::SliceAccess(obj, slice) => {
            v.visit_expr(obj);
            v.visit_token(&slice.open);
            let Slice { start, end, step } = &slice.value;
            for e in [start, end, step].into_iter().flatten() {
                v.visit_expr(e);
            }
            v.visit_token(&slice.close);
        }
        Expr::Assign(lhs, tok, rhs) => {
            v.visit_expr(lhs);
            v.visit_token(tok);
            v.visit_expr(rhs);
        }
        Expr::AssignOp(lhs, op, rhs) => {
            v.visit_expr(lhs);
            v.visit_token(&op.tok);
            v.visit_expr(rhs);
        }
        Expr::LetPattern(pat, e) => {
            v.visit_pattern(pat);
            v.visit_expr(e);
        }
        Expr::Conditional(cond, then, otherwise) => {
            v.visit_expr(cond);
            v.visit_expr(then);
            v.visit_expr(otherwise);
        }
        Expr::MatchPattern(scrutinee, actions) => {
            v.visit_expr(scrutinee);
            for action in actions {
                v.visit_pattern(&action.pat);
                v.visit_expr(&action.body);
            }
        }
        Expr::Yield(tok, e, _) => {
            v.visit_token(tok);
            if let Some(e) = e {
                v.visit_expr(e);
            }
        }
        Expr::Await(tok, e) | Expr::Ref(tok, e) | Expr::DeRef(tok, e) => {
            v.visit_token(tok);
            v.visit_expr(e);
        }
        Expr::Cast(ty, e) => {
            v.visit_type(ty);
            v.visit_expr(e);
        }
        Expr::Seq(exprs) => walk_exprs(v, exprs),
        Expr::Ellipsis(tok) => v.visit_token(tok),
        Expr::DeepEllipsis(inner) => {
            v.visit_token(&inner.open);
            v.visit_expr(&inner.value);
            v.visit_token(&inner.close);
        }
        Expr::TypedMetavar(id, tok, ty) => {
            v.visit_ident(id);
            v.visit_token(tok);
            v.visit_type(ty);
        }
        Expr::DisjExpr(a, b) => {
            v.visit_expr(a);
            v.visit_expr(b);
        }
        Expr::OtherExpr(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_argument<V: Visitor + ?Sized>(v: &mut V, arg: &Argument) {
    match arg {
        Argument::Arg(e) => v.visit_expr(e),
        Argument::ArgKwd(id, e) => {
            v.visit_ident(id);
            v.visit_expr(e);
        }
        Argument::ArgType(ty) => v.visit_type(ty),
        Argument::ArgOther(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_stmts<V: Visitor + ?Sized>(v: &mut V, stmts: &[Stmt]) {
    for s in stmts {
        v.visit_stmt(s);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::ExprStmt(e, sc) => {
            v.visit_expr(e);
            v.visit_token(sc);
        }
        Stmt::DefStmt(def) => v.visit_definition(def),
        Stmt::DirectiveStmt(dir) => v.visit_directive(dir),
        Stmt::Block(block) => {
            v.visit_token(&block.open);
            v.visit_stmts(&block.value);
            v.visit_token(&block.close);
        }
        Stmt::If(tok, cond, then, otherwise) => {
            v.visit_token(tok);
            v.visit_expr(cond);
            v.visit_stmt(then);
            if let Some(s) = otherwise {
                v.visit_stmt(s);
            }
        }
        Stmt::While(tok, cond, body) => {
            v.visit_token(tok);
            v.visit_expr(cond);
            v.visit_stmt(body);
        }
        Stmt::DoWhile(tok, body, cond) => {
            v.visit_token(tok);
            v.visit_stmt(body);
            v.visit_expr(cond);
        }
        Stmt::For(tok, header, body) => {
            v.visit_token(tok);
            walk_for_header(v, header);
            v.visit_stmt(body);
        }
        Stmt::Switch(tok, scrutinee, cases) => {
            v.visit_token(tok);
            if let Some(e) = scrutinee {
                v.visit_expr(e);
            }
            for case in cases {
                walk_case_and_body(v, case);
            }
        }
        Stmt::Return(tok, e, sc) => {
            v.visit_token(tok);
            if let Some(e) = e {
                v.visit_expr(e);
            }
            v.visit_token(sc);
        }
        Stmt::Continue(tok, label, sc) | Stmt::Break(tok, label, sc) => {
            v.visit_token(tok);
            walk_label(v, label);
            v.visit_token(sc);
        }
        Stmt::Label(id, body) => {
            v.visit_ident(id);
            v.visit_stmt(body);
        }
        Stmt::Goto(tok, id) => {
            v.visit_token(tok);
            v.visit_ident(id);
        }
        Stmt::Throw(tok, e, sc) => {
            v.visit_token(tok);
            v.visit_expr(e);
            v.visit_token(sc);
        }
        Stmt::Try(tok, body, catches, finally) => {
            v.visit_token(tok);
            v.visit_stmt(body);
            for catch in catches {
                v.visit_token(&catch.tok);
                v.visit_pattern(&catch.pat);
                v.visit_stmt(&catch.body);
            }
            if let Some(finally) = finally {
                v.visit_token(&finally.tok);
                v.visit_stmt(&finally.body);
            }
        }
        Stmt::Assert(tok, cond, msg, sc) => {
            v.visit_token(tok);
            v.visit_expr(cond);
            if let Some(msg) = msg {
                v.visit_expr(msg);
            }
            v.visit_token(sc);
        }
        Stmt::DisjStmt(a, b) => {
            v.visit_stmt(a);
            v.visit_stmt(b);
        }
        Stmt::OtherStmtWithStmt(_, e, body) => {
            if let Some(e) = e {
                v.visit_expr(e);
            }
            v.visit_stmt(body);
        }
        Stmt::OtherStmt(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_for_header<V: Visitor + ?Sized>(v: &mut V, header: &ForHeader) {
    match header {
        ForHeader::Classic(inits, cond, next) => {
            for init in inits {
                match init {
                    ForVarOrExpr::InitVar(entity, var) => {
                        v.visit_entity(entity);
                        walk_variable_definition(v, var);
                    }
                    ForVarOrExpr::InitExpr(e) => v.visit_expr(e),
                }
            }
            for e in [cond, next].into_iter().flatten() {
                v.visit_expr(e);
            }
        }
        ForHeader::Each(pat, tok, e) => {
            v.visit_pattern(pat);
            v.visit_token(tok);
            v.visit_expr(e);
        }
        ForHeader::Ellipsis(tok) => v.visit_token(tok),
    }
}

fn walk_case_and_body<V: Visitor + ?Sized>(v: &mut V, case: &CaseAndBody) {
    for c in &case.cases {
        match c {
            Case::Case(tok, pat) => {
                v.visit_token(tok);
                v.visit_pattern(pat);
            }
            Case::Default(tok) => v.visit_token(tok),
            Case::CaseEqualExpr(tok, e) => {
                v.visit_token(tok);
                v.visit_expr(e);
            }
        }
    }
    v.visit_stmt(&case.body);
}

pub fn walk_pattern<V: Visitor + ?Sized>(v: &mut V, pat: &Pattern) {
    match pat {
        Pattern::PatLiteral(lit) => v.visit_literal(lit),
        Pattern::PatConstructor(name, pats) => {
            v.visit_name(name);
            pats.iter().for_each(|p| v.visit_pattern(p));
        }
        Pattern::PatRecord(fields) => {
            v.visit_token(&fields.open);
            for field in &fields.value {
                walk_idents(v, &field.field);
                v.visit_pattern(&field.pat);
            }
            v.visit_token(&fields.close);
        }
        Pattern::PatId(id, _) => v.visit_ident(id),
        Pattern::PatTuple(pats) | Pattern::PatList(pats) => {
            v.visit_token(&pats.open);
            pats.value.iter().for_each(|p| v.visit_pattern(p));
            v.visit_token(&pats.close);
        }
        Pattern::PatKeyVal(a, b) | Pattern::PatDisj(a, b) => {
            v.visit_pattern(a);
            v.visit_pattern(b);
        }
        Pattern::PatUnderscore(tok) | Pattern::PatEllipsis(tok) => v.visit_token(tok),
        Pattern::PatTyped(p, ty) => {
            v.visit_pattern(p);
            v.visit_type(ty);
        }
        Pattern::PatWhen(p, guard) => {
            v.visit_pattern(p);
            v.visit_expr(guard);
        }
        Pattern::PatAs(p, id, _) => {
            v.visit_pattern(p);
            v.visit_ident(id);
        }
        Pattern::PatType(ty) => v.visit_type(ty),
        Pattern::PatVar(ty, binding) => {
            v.visit_type(ty);
            if let Some((id, _)) = binding {
                v.visit_ident(id);
            }
        }
        Pattern::OtherPat(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_type<V: Visitor + ?Sized>(v: &mut V, ty: &Type) {
    match ty {
        Type::TyBuiltin(name) => v.visit_token(&name.tok),
        Type::TyN(name) => v.visit_name(name),
        Type::TyApply(base, targs) => {
            v.visit_type(base);
            walk_type_arguments(v, targs);
        }
        Type::TyVar(id) => v.visit_ident(id),
        Type::TyFun(params, ret) => {
            params.iter().for_each(|p| v.visit_parameter(p));
            v.visit_type(ret);
        }
        Type::TyArray(dim, elem) => {
            v.visit_type(elem);
            v.visit_token(&dim.open);
            if let Some(e) = &dim.value {
                v.visit_expr(e);
            }
            v.visit_token(&dim.close);
        }
        Type::TyPointer(tok, ty) => {
            v.visit_token(tok);
            v.visit_type(ty);
        }
        Type::TyTuple(types) => {
            v.visit_token(&types.open);
            walk_types(v, &types.value);
            v.visit_token(&types.close);
        }
        Type::TyQuestion(ty, tok) => {
            v.visit_type(ty);
            v.visit_token(tok);
        }
        Type::TyAnd(fields) => walk_fields(v, fields),
        Type::TyOr(a, tok, b) => {
            v.visit_type(a);
            v.visit_token(tok);
            v.visit_type(b);
        }
        Type::OtherType(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_type_argument<V: Visitor + ?Sized>(v: &mut V, arg: &TypeArgument) {
    match arg {
        TypeArgument::TypeArg(ty) => v.visit_type(ty),
        TypeArgument::Wildcard(tok, bound) => {
            v.visit_token(tok);
            if let Some((kind, ty)) = bound {
                v.visit_token(&kind.tok);
                v.visit_type(ty);
            }
        }
        TypeArgument::OtherTypeArg(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_type_parameter<V: Visitor + ?Sized>(v: &mut V, param: &TypeParameter) {
    v.visit_ident(&param.name);
    walk_types(v, &param.bounds);
}

pub fn walk_attribute<V: Visitor + ?Sized>(v: &mut V, attr: &Attribute) {
    match attr {
        Attribute::KeywordAttr(kw) => v.visit_token(&kw.tok),
        Attribute::NamedAttr(tok, name, args) => {
            v.visit_token(tok);
            v.visit_name(name);
            walk_arguments(v, args);
        }
        Attribute::OtherAttribute(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_entity<V: Visitor + ?Sized>(v: &mut V, entity: &Entity) {
    entity.attrs.iter().for_each(|a| v.visit_attribute(a));
    v.visit_ident(&entity.name);
    for tp in &entity.tparams {
        walk_type_parameter(v, tp);
    }
}

pub fn walk_definition<V: Visitor + ?Sized>(v: &mut V, def: &Definition) {
    v.visit_entity(&def.entity);
    walk_definition_kind(v, &def.kind);
}

pub fn walk_definition_kind<V: Visitor + ?Sized>(v: &mut V, kind: &DefinitionKind) {
    match kind {
        DefinitionKind::FuncDef(def) => v.visit_function_definition(def),
        DefinitionKind::VarDef(def) => walk_variable_definition(v, def),
        DefinitionKind::TypeDef(def) => walk_type_definition(v, def),
        DefinitionKind::ClassDef(def) => v.visit_class_definition(def),
        DefinitionKind::ModuleDef(def) => match &def.kind {
            ModuleDefinitionKind::ModuleAlias(ids) => walk_idents(v, ids),
            ModuleDefinitionKind::ModuleStruct(ids, body) => {
                if let Some(ids) = ids {
                    walk_idents(v, ids);
                }
                v.visit_stmts(body);
            }
            ModuleDefinitionKind::OtherModule(_, payload) => walk_anys(v, payload),
        },
        DefinitionKind::MacroDef(def) => {
            walk_idents(v, &def.params);
            walk_anys(v, &def.body);
        }
        DefinitionKind::Signature(ty) => v.visit_type(ty),
        DefinitionKind::UseOuterDecl(tok) => v.visit_token(tok),
        DefinitionKind::EnumEntryDef(def) => {
            if let Some(args) = &def.args {
                walk_arguments(v, args);
            }
            if let Some(body) = &def.body {
                walk_fields(v, body);
            }
        }
    }
}

pub fn walk_variable_definition<V: Visitor + ?Sized>(v: &mut V, def: &VariableDefinition) {
    if let Some(ty) = &def.ty {
        v.visit_type(ty);
    }
    if let Some(init) = &def.init {
        v.visit_expr(init);
    }
}

pub fn walk_type_definition<V: Visitor + ?Sized>(v: &mut V, def: &TypeDefinition) {
    match &def.kind {
        TypeDefinitionKind::OrType(elems) => {
            for elem in elems {
                match elem {
                    OrTypeElement::OrConstructor(id, types) => {
                        v.visit_ident(id);
                        walk_types(v, types);
                    }
                    OrTypeElement::OrEnum(id, e) => {
                        v.visit_ident(id);
                        if let Some(e) = e {
                            v.visit_expr(e);
                        }
                    }
                    OrTypeElement::OrUnion(id, ty) => {
                        v.visit_ident(id);
                        v.visit_type(ty);
                    }
                    OrTypeElement::OtherOr(_, payload) => walk_anys(v, payload),
                }
            }
        }
        TypeDefinitionKind::AndType(fields) => walk_fields(v, fields),
        TypeDefinitionKind::AliasType(ty) | TypeDefinitionKind::NewType(ty) => v.visit_type(ty),
        TypeDefinitionKind::Exception(id, types) => {
            v.visit_ident(id);
            walk_types(v, types);
        }
        TypeDefinitionKind::OtherTypeKind(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_function_definition<V: Visitor + ?Sized>(v: &mut V, def: &FunctionDefinition) {
    v.visit_token(&def.kind.tok);
    v.visit_token(&def.params.open);
    def.params.value.iter().for_each(|p| v.visit_parameter(p));
    v.visit_token(&def.params.close);
    if let Some(ty) = &def.ret_type {
        v.visit_type(ty);
    }
    v.visit_stmt(&def.body);
}

fn walk_parameter_classic<V: Visitor + ?Sized>(v: &mut V, param: &ParameterClassic) {
    param.attrs.iter().for_each(|a| v.visit_attribute(a));
    if let Some(ty) = &param.ty {
        v.visit_type(ty);
    }
    if let Some(name) = &param.name {
        v.visit_ident(name);
    }
    if let Some(default) = &param.default {
        v.visit_expr(default);
    }
}

pub fn walk_parameter<V: Visitor + ?Sized>(v: &mut V, param: &Parameter) {
    match param {
        Parameter::Classic(p) => walk_parameter_classic(v, p),
        Parameter::Pattern(p) => v.visit_pattern(p),
        Parameter::Rest(tok, p) | Parameter::HashSplat(tok, p) => {
            v.visit_token(tok);
            walk_parameter_classic(v, p);
        }
        Parameter::Ellipsis(tok) => v.visit_token(tok),
        Parameter::OtherParam(_, payload) => walk_anys(v, payload),
    }
}

pub fn walk_class_definition<V: Visitor + ?Sized>(v: &mut V, def: &ClassDefinition) {
    v.visit_token(&def.kind.tok);
    def.params.iter().for_each(|p| v.visit_parameter(p));
    walk_types(v, &def.extends);
    walk_types(v, &def.implements);
    walk_types(v, &def.mixins);
    walk_fields(v, &def.body);
}

pub fn walk_field<V: Visitor + ?Sized>(v: &mut V, field: &Field) {
    match field {
        Field::FieldStmt(s) => v.visit_stmt(s),
        Field::FieldSpread(tok, e) => {
            v.visit_token(tok);
            v.visit_expr(e);
        }
    }
}

pub fn walk_directive<V: Visitor + ?Sized>(v: &mut V, dir: &Directive) {
    match dir {
        Directive::ImportFrom(tok, module, id, alias) => {
            v.visit_token(tok);
            walk_module_name(v, module);
            v.visit_ident(id);
            if let Some(alias) = alias {
                v.visit_ident(&alias.ident);
            }
        }
        Directive::ImportAs(tok, module, alias) => {
            v.visit_token(tok);
            walk_module_name(v, module);
            if let Some(alias) = alias {
                v.visit_ident(&alias.ident);
            }
        }
        Directive::ImportAll(tok, module, star) => {
            v.visit_token(tok);
            walk_module_name(v, module);
            v.visit_token(star);
        }
        Directive::Package(tok, ids) => {
            v.visit_token(tok);
            walk_idents(v, ids);
        }
        Directive::PackageEnd(tok) => v.visit_token(tok),
        Directive::Pragma(id, payload) => {
            v.visit_ident(id);
            walk_anys(v, payload);
        }
        Directive::OtherDirective(_, payload) => walk_anys(v, payload),
    }
}
