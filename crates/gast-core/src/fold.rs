//! Structure-preserving map over the generic AST.
//!
//! [`Fold`] consumes a tree and rebuilds it. Every hook defaults to the
//! `fold_*` function of the same name in this module, which rebuilds the node
//! from its folded children, so an implementation overrides only the hooks whose
//! output should differ. Leaves bottom out in [`Fold::fold_token`] and
//! [`Fold::fold_id_info`], both identities by default.

use crate::ast::*;

pub trait Fold {
    fn fold_any(&mut self, any: Any) -> Any {
        fold_any(self, any)
    }
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        fold_expr(self, expr)
    }
    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        fold_stmt(self, stmt)
    }
    fn fold_stmts(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        fold_stmts(self, stmts)
    }
    fn fold_type(&mut self, ty: Type) -> Type {
        fold_type(self, ty)
    }
    fn fold_pattern(&mut self, pat: Pattern) -> Pattern {
        fold_pattern(self, pat)
    }
    fn fold_definition(&mut self, def: Definition) -> Definition {
        fold_definition(self, def)
    }
    fn fold_directive(&mut self, dir: Directive) -> Directive {
        fold_directive(self, dir)
    }
    fn fold_attribute(&mut self, attr: Attribute) -> Attribute {
        fold_attribute(self, attr)
    }
    fn fold_parameter(&mut self, param: Parameter) -> Parameter {
        fold_parameter(self, param)
    }
    fn fold_argument(&mut self, arg: Argument) -> Argument {
        fold_argument(self, arg)
    }
    fn fold_ident(&mut self, ident: Ident) -> Ident {
        fold_ident(self, ident)
    }
    fn fold_name(&mut self, name: Name) -> Name {
        fold_name(self, name)
    }
    fn fold_entity(&mut self, entity: Entity) -> Entity {
        fold_entity(self, entity)
    }
    fn fold_function_definition(&mut self, def: FunctionDefinition) -> FunctionDefinition {
        fold_function_definition(self, def)
    }
    fn fold_class_definition(&mut self, def: ClassDefinition) -> ClassDefinition {
        fold_class_definition(self, def)
    }
    fn fold_field(&mut self, field: Field) -> Field {
        fold_field(self, field)
    }
    fn fold_type_argument(&mut self, arg: TypeArgument) -> TypeArgument {
        fold_type_argument(self, arg)
    }
    fn fold_literal(&mut self, lit: Literal) -> Literal {
        fold_literal(self, lit)
    }
    fn fold_token(&mut self, tok: Token) -> Token {
        tok
    }
    fn fold_id_info(&mut self, info: IdInfoCell) -> IdInfoCell {
        info
    }
}

fn fold_wrap<F: Fold + ?Sized, T>(f: &mut F, w: Wrap<T>) -> Wrap<T> {
    Wrap::new(w.value, f.fold_token(w.tok))
}

fn fold_bracket<F: Fold + ?Sized, T, U>(
    f: &mut F,
    b: Bracket<T>,
    inner: impl FnOnce(&mut F, T) -> U,
) -> Bracket<U> {
    let open = f.fold_token(b.open);
    let value = inner(f, b.value);
    let close = f.fold_token(b.close);
    Bracket::new(open, value, close)
}

fn fold_anys<F: Fold + ?Sized>(f: &mut F, anys: Vec<Any>) -> Vec<Any> {
    anys.into_iter().map(|a| f.fold_any(a)).collect()
}

fn fold_idents<F: Fold + ?Sized>(f: &mut F, ids: Vec<Ident>) -> Vec<Ident> {
    ids.into_iter().map(|id| f.fold_ident(id)).collect()
}

fn fold_exprs<F: Fold + ?Sized>(f: &mut F, exprs: Vec<Expr>) -> Vec<Expr> {
    exprs.into_iter().map(|e| f.fold_expr(e)).collect()
}

fn fold_bexpr<F: Fold + ?Sized>(f: &mut F, expr: BExpr) -> BExpr {
    Box::new(f.fold_expr(*expr))
}

fn fold_bstmt<F: Fold + ?Sized>(f: &mut F, stmt: BStmt) -> BStmt {
    Box::new(f.fold_stmt(*stmt))
}

fn fold_btype<F: Fold + ?Sized>(f: &mut F, ty: BType) -> BType {
    Box::new(f.fold_type(*ty))
}

fn fold_bpattern<F: Fold + ?Sized>(f: &mut F, pat: BPattern) -> BPattern {
    Box::new(f.fold_pattern(*pat))
}

fn fold_types<F: Fold + ?Sized>(f: &mut F, types: Vec<Type>) -> Vec<Type> {
    types.into_iter().map(|t| f.fold_type(t)).collect()
}

fn fold_fields<F: Fold + ?Sized>(f: &mut F, fields: Bracket<Vec<Field>>) -> Bracket<Vec<Field>> {
    fold_bracket(f, fields, |f, fs| fs.into_iter().map(|x| f.fold_field(x)).collect())
}

fn fold_parameters<F: Fold + ?Sized>(f: &mut F, params: Vec<Parameter>) -> Vec<Parameter> {
    params.into_iter().map(|p| f.fold_parameter(p)).collect()
}

pub fn fold_arguments<F: Fold + ?Sized>(f: &mut F, args: Arguments) -> Arguments {
    fold_bracket(f, args, |f, args| {
        args.into_iter().map(|a| f.fold_argument(a)).collect()
    })
}

pub fn fold_type_arguments<F: Fold + ?Sized>(f: &mut F, targs: TypeArguments) -> TypeArguments {
    fold_bracket(f, targs, |f, targs| {
        targs.into_iter().map(|t| f.fold_type_argument(t)).collect()
    })
}

pub fn fold_any<F: Fold + ?Sized>(f: &mut F, any: Any) -> Any {
    match any {
        Any::E(e) => Any::E(f.fold_expr(e)),
        Any::S(s) => Any::S(f.fold_stmt(s)),
        Any::T(t) => Any::T(f.fold_type(t)),
        Any::P(p) => Any::P(f.fold_pattern(p)),
        Any::Def(d) => Any::Def(f.fold_definition(d)),
        Any::Dir(d) => Any::Dir(f.fold_directive(d)),
        Any::At(a) => Any::At(f.fold_attribute(a)),
        Any::Pa(p) => Any::Pa(f.fold_parameter(p)),
        Any::Ar(a) => Any::Ar(f.fold_argument(a)),
        Any::I(id) => Any::I(f.fold_ident(id)),
        Any::N(n) => Any::N(f.fold_name(n)),
        Any::En(e) => Any::En(f.fold_entity(e)),
        Any::Dk(k) => Any::Dk(fold_definition_kind(f, k)),
        Any::Di(ids) => Any::Di(fold_idents(f, ids)),
        Any::Modn(m) => Any::Modn(fold_module_name(f, m)),
        Any::Fld(x) => Any::Fld(f.fold_field(x)),
        Any::Ta(t) => Any::Ta(f.fold_type_argument(t)),
        Any::Tp(t) => Any::Tp(fold_type_parameter(f, t)),
        Any::L(l) => Any::L(f.fold_literal(l)),
        Any::Tk(t) => Any::Tk(f.fold_token(t)),
        Any::Lbl(l) => Any::Lbl(fold_label(f, l)),
        Any::Ss(ss) => Any::Ss(f.fold_stmts(ss)),
        Any::Params(ps) => Any::Params(fold_parameters(f, ps)),
        Any::Args(args) => Any::Args(args.into_iter().map(|a| f.fold_argument(a)).collect()),
        Any::Anys(anys) => Any::Anys(fold_anys(f, anys)),
    }
}

pub fn fold_ident<F: Fold + ?Sized>(f: &mut F, ident: Ident) -> Ident {
    fold_wrap(f, ident)
}

pub fn fold_literal<F: Fold + ?Sized>(f: &mut F, lit: Literal) -> Literal {
    match lit {
        Literal::Bool(w) => Literal::Bool(fold_wrap(f, w)),
        Literal::Int(w) => Literal::Int(fold_wrap(f, w)),
        Literal::Float(w) => Literal::Float(fold_wrap(f, w)),
        Literal::Char(w) => Literal::Char(fold_wrap(f, w)),
        Literal::String(w) => Literal::String(fold_wrap(f, w)),
        Literal::Regexp(w) => Literal::Regexp(fold_wrap(f, w)),
        Literal::Imag(w) => Literal::Imag(fold_wrap(f, w)),
        Literal::Unit(t) => Literal::Unit(f.fold_token(t)),
        Literal::Null(t) => Literal::Null(f.fold_token(t)),
        Literal::Undefined(t) => Literal::Undefined(f.fold_token(t)),
    }
}

/// Rebuild the contents of an [`IdInfo`] slot; used by folds that replace cells.
pub fn fold_id_info_contents<F: Fold + ?Sized>(f: &mut F, info: IdInfo) -> IdInfo {
    let resolved = info.resolved.map(|r| ResolvedName {
        kind: match r.kind {
            ResolvedKind::ImportedEntity(ids) => ResolvedKind::ImportedEntity(fold_idents(f, ids)),
            ResolvedKind::ImportedModule(m) => ResolvedKind::ImportedModule(fold_module_name(f, m)),
            other => other,
        },
        sid: r.sid,
    });
    let ty = info.ty.map(|ty| f.fold_type(ty));
    let constness = info.constness.map(|c| match c {
        Constness::Lit(lit) => Constness::Lit(f.fold_literal(lit)),
        other => other,
    });
    IdInfo {
        resolved,
        ty,
        constness,
    }
}

pub fn fold_name<F: Fold + ?Sized>(f: &mut F, name: Name) -> Name {
    match name {
        Name::Id(id, info) => {
            let id = f.fold_ident(id);
            Name::Id(id, f.fold_id_info(info))
        }
        Name::IdQualified(qualified, info) => {
            let QualifiedName { ident, info: name_info } = qualified;
            let qualifier = name_info.qualifier.map(|q| fold_idents(f, q));
            let ident = f.fold_ident(ident);
            let typeargs = name_info.typeargs.map(|t| fold_type_arguments(f, t));
            Name::IdQualified(
                QualifiedName {
                    ident,
                    info: NameInfo {
                        qualifier,
                        typeargs,
                    },
                },
                f.fold_id_info(info),
            )
        }
    }
}

pub fn fold_module_name<F: Fold + ?Sized>(f: &mut F, module: ModuleName) -> ModuleName {
    match module {
        ModuleName::DottedName(ids) => ModuleName::DottedName(fold_idents(f, ids)),
        ModuleName::FileName(file) => ModuleName::FileName(fold_wrap(f, file)),
    }
}

pub fn fold_label<F: Fold + ?Sized>(f: &mut F, label: LabelIdent) -> LabelIdent {
    match label {
        LabelIdent::None => LabelIdent::None,
        LabelIdent::Id(id) => LabelIdent::Id(f.fold_ident(id)),
        LabelIdent::Int(n) => LabelIdent::Int(fold_wrap(f, n)),
        LabelIdent::Dynamic(e) => LabelIdent::Dynamic(fold_bexpr(f, e)),
    }
}

pub fn fold_expr<F: Fold + ?Sized>(f: &mut F, expr: Expr) -> Expr {
    match expr {
        Expr::L(lit) => Expr::L(f.fold_literal(lit)),
        Expr::Container(op, items) => Expr::Container(op, fold_bracket(f, items, fold_exprs)),
        Expr::Tuple(items) => Expr::Tuple(fold_bracket(f, items, fold_exprs)),
        Expr::Record(fields) => Expr::Record(fold_fields(f, fields)),
        Expr::Constructor(name, args) => {
            let name = f.fold_name(name);
            Expr::Constructor(name, fold_exprs(f, args))
        }
        Expr::Lambda(def) => Expr::Lambda(Box::new(f.fold_function_definition(*def))),
        Expr::AnonClass(def) => Expr::AnonClass(Box::new(f.fold_class_definition(*def))),
        Expr::N(name) => Expr::N(f.fold_name(name)),
        Expr::IdSpecial(special) => Expr::IdSpecial(fold_wrap(f, special)),
        Expr::Call(callee, args) => {
            let callee = fold_bexpr(f, callee);
            Expr::Call(callee, fold_arguments(f, args))
        }
        Expr::DotAccess(obj, dot, field) => {
            let obj = fold_bexpr(f, obj);
            let dot = f.fold_token(dot);
            let field = match field {
                FieldName::EN(name) => FieldName::EN(f.fold_name(name)),
                FieldName::EDynamic(e) => FieldName::EDynamic(fold_bexpr(f, e)),
            };
            Expr::DotAccess(obj, dot, field)
        }
        Expr::ArrayAccess(obj, index) => {
            let obj = fold_bexpr(f, obj);
            Expr::ArrayAccess(obj, fold_bracket(f, index, fold_bexpr))
        }
        Expr::SliceAccess(obj, slice) => {
            let obj = fold_bexpr(f, obj);
            let slice = fold_bracket(f, slice, |f, s| Slice {
                start: s.start.map(|e| fold_bexpr(f, e)),
                end: s.end.map(|e| fold_bexpr(f, e)),
                step: s.step.map(|e| fold_bexpr(f, e)),
            });
            Expr::SliceAccess(obj, slice)
        }
        Expr::Assign(lhs, tok, rhs) => {
            let lhs = fold_bexpr(f, lhs);
            let tok = f.fold_token(tok);
            Expr::Assign(lhs, tok, fold_bexpr(f, rhs))
        }
        Expr::AssignOp(lhs, op, rhs) => {
            let lhs = fold_bexpr(f, lhs);
            let op = fold_wrap(f, op);
            Expr::AssignOp(lhs, op, fold_bexpr(f, rhs))
        }
        Expr::LetPattern(pat, e) => {
            let pat = fold_bpattern(f, pat);
            Expr::LetPattern(pat, fold_bexpr(f, e))
        }
        Expr::Conditional(cond, then, otherwise) => {
            let cond = fold_bexpr(f, cond);
            let then = fold_bexpr(f, then);
            Expr::Conditional(cond, then, fold_bexpr(f, otherwise))
        }
        Expr::MatchPattern(scrutinee, actions) => {
            let scrutinee = fold_bexpr(f, scrutinee);
            let actions = actions
                .into_iter()
                .map(|a| {
                    let pat = f.fold_pattern(a.pat);
                    Action {
                        pat,
                        body: f.fold_expr(a.body),
                    }
                })
                .collect();
            Expr::MatchPattern(scrutinee, actions)
        }
        Expr::Yield(tok, e, delegate) => {
            let tok = f.fold_token(tok);
            Expr::Yield(tok, e.map(|e| fold_bexpr(f, e)), delegate)
        }
        Expr::Await(tok, e) => {
            let tok = f.fold_token(tok);
            Expr::Await(tok, fold_bexpr(f, e))
        }
        Expr::Cast(ty, e) => {
            let ty = fold_btype(f, ty);
            Expr::Cast(ty, fold_bexpr(f, e))
        }
        Expr::Seq(exprs) => Expr::Seq(fold_exprs(f, exprs)),
        Expr::Ref(tok, e) => {
            let tok = f.fold_token(tok);
            Expr::Ref(tok, fold_bexpr(f, e))
        }
        Expr::DeRef(tok, e) => {
            let tok = f.fold_token(tok);
            Expr::DeRef(tok, fold_bexpr(f, e))
        }
        Expr::Ellipsis(tok) => Expr::Ellipsis(f.fold_token(tok)),
        Expr::DeepEllipsis(inner) => Expr::DeepEllipsis(fold_bracket(f, inner, fold_bexpr)),
        Expr::TypedMetavar(id, tok, ty) => {
            let id = f.fold_ident(id);
            let tok = f.fold_token(tok);
            Expr::TypedMetavar(id, tok, fold_btype(f, ty))
        }
        Expr::DisjExpr(a, b) => {
            let a = fold_bexpr(f, a);
            Expr::DisjExpr(a, fold_bexpr(f, b))
        }
        Expr::OtherExpr(op, payload) => Expr::OtherExpr(op, fold_anys(f, payload)),
    }
}

pub fn fold_argument<F: Fold + ?Sized>(f: &mut F, arg: Argument) -> Argument {
    match arg {
        Argument::Arg(e) => Argument::Arg(f.fold_expr(e)),
        Argument::ArgKwd(id, e) => {
            let id = f.fold_ident(id);
            Argument::ArgKwd(id, f.fold_expr(e))
        }
        Argument::ArgType(ty) => Argument::ArgType(f.fold_type(ty)),
        Argument::ArgOther(op, payload) => Argument::ArgOther(op, fold_anys(f, payload)),
    }
}

pub fn fold_stmts<F: Fold + ?Sized>(f: &mut F, stmts: Vec<Stmt>) -> Vec<Stmt> {
    stmts.into_iter().map(|s| f.fold_stmt(s)).collect()
}

pub fn fold_stmt<F: Fold + ?Sized>(f: &mut F, stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::ExprStmt(e, sc) => {
            let e = f.fold_expr(e);
            Stmt::ExprStmt(e, f.fold_token(sc))
        }
        Stmt::DefStmt(def) => Stmt::DefStmt(Box::new(f.fold_definition(*def))),
        Stmt::DirectiveStmt(dir) => Stmt::DirectiveStmt(Box::new(f.fold_directive(*dir))),
        Stmt::Block(block) => Stmt::Block(fold_bracket(f, block, |f, ss| f.fold_stmts(ss))),
        Stmt::If(tok, cond, then, otherwise) => {
            let tok = f.fold_token(tok);
            let cond = f.fold_expr(cond);
            let then = fold_bstmt(f, then);
            Stmt::If(tok, cond, then, otherwise.map(|s| fold_bstmt(f, s)))
        }
        Stmt::While(tok, cond, body) => {
            let tok = f.fold_token(tok);
            let cond = f.fold_expr(cond);
            Stmt::While(tok, cond, fold_bstmt(f, body))
        }
        Stmt::DoWhile(tok, body, cond) => {
            let tok = f.fold_token(tok);
            let body = fold_bstmt(f, body);
            Stmt::DoWhile(tok, body, f.fold_expr(cond))
        }
        Stmt::For(tok, header, body) => {
            let tok = f.fold_token(tok);
            let header = fold_for_header(f, header);
            Stmt::For(tok, header, fold_bstmt(f, body))
        }
        Stmt::Switch(tok, scrutinee, cases) => {
            let tok = f.fold_token(tok);
            let scrutinee = scrutinee.map(|e| f.fold_expr(e));
            let cases = cases
                .into_iter()
                .map(|c| fold_case_and_body(f, c))
                .collect();
            Stmt::Switch(tok, scrutinee, cases)
        }
        Stmt::Return(tok, e, sc) => {
            let tok = f.fold_token(tok);
            let e = e.map(|e| f.fold_expr(e));
            Stmt::Return(tok, e, f.fold_token(sc))
        }
        Stmt::Continue(tok, label, sc) => {
            let tok = f.fold_token(tok);
            let label = fold_label(f, label);
            Stmt::Continue(tok, label, f.fold_token(sc))
        }
        Stmt::Break(tok, label, sc) => {
            let tok = f.fold_token(tok);
            let label = fold_label(f, label);
            Stmt::Break(tok, label, f.fold_token(sc))
        }
        Stmt::Label(id, body) => {
            let id = f.fold_ident(id);
            Stmt::Label(id, fold_bstmt(f, body))
        }
        Stmt::Goto(tok, id) => {
            let tok = f.fold_token(tok);
            Stmt::Goto(tok, f.fold_ident(id))
        }
        Stmt::Throw(tok, e, sc) => {
            let tok = f.fold_token(tok);
            let e = f.fold_expr(e);
            Stmt::Throw(tok, e, f.fold_token(sc))
        }
        Stmt::Try(tok, body, catches, finally) => {
            let tok = f.fold_token(tok);
            let body = fold_bstmt(f, body);
            let catches = catches
                .into_iter()
                .map(|c| {
                    let tok = f.fold_token(c.tok);
                    let pat = f.fold_pattern(c.pat);
                    Catch {
                        tok,
                        pat,
                        body: f.fold_stmt(c.body),
                    }
                })
                .collect();
            let finally = finally.map(|fin| {
                let Finally { tok, body } = *fin;
                let tok = f.fold_token(tok);
                Box::new(Finally {
                    tok,
                    body: f.fold_stmt(body),
                })
            });
            Stmt::Try(tok, body, catches, finally)
        }
        Stmt::Assert(tok, cond, msg, sc) => {
            let tok = f.fold_token(tok);
            let cond = f.fold_expr(cond);
            let msg = msg.map(|m| f.fold_expr(m));
            Stmt::Assert(tok, cond, msg, f.fold_token(sc))
        }
        Stmt::DisjStmt(a, b) => {
            let a = fold_bstmt(f, a);
            Stmt::DisjStmt(a, fold_bstmt(f, b))
        }
        Stmt::OtherStmtWithStmt(op, e, body) => {
            let e = e.map(|e| f.fold_expr(e));
            Stmt::OtherStmtWithStmt(op, e, fold_bstmt(f, body))
        }
        Stmt::OtherStmt(op, payload) => Stmt::OtherStmt(op, fold_anys(f, payload)),
    }
}

pub fn fold_for_header<F: Fold + ?Sized>(f: &mut F, header: ForHeader) -> ForHeader {
    match header {
        ForHeader::Classic(inits, cond, next) => {
            let inits = inits
                .into_iter()
                .map(|init| match init {
                    ForVarOrExpr::InitVar(entity, var) => {
                        let entity = f.fold_entity(entity);
                        ForVarOrExpr::InitVar(entity, fold_variable_definition(f, var))
                    }
                    ForVarOrExpr::InitExpr(e) => ForVarOrExpr::InitExpr(f.fold_expr(e)),
                })
                .collect();
            let cond = cond.map(|e| f.fold_expr(e));
            let next = next.map(|e| f.fold_expr(e));
            ForHeader::Classic(inits, cond, next)
        }
        ForHeader::Each(pat, tok, e) => {
            let pat = f.fold_pattern(pat);
            let tok = f.fold_token(tok);
            ForHeader::Each(pat, tok, f.fold_expr(e))
        }
        ForHeader::Ellipsis(tok) => ForHeader::Ellipsis(f.fold_token(tok)),
    }
}

fn fold_case_and_body<F: Fold + ?Sized>(f: &mut F, case: CaseAndBody) -> CaseAndBody {
    let cases = case
        .cases
        .into_iter()
        .map(|c| match c {
            Case::Case(tok, pat) => {
                let tok = f.fold_token(tok);
                Case::Case(tok, f.fold_pattern(pat))
            }
            Case::Default(tok) => Case::Default(f.fold_token(tok)),
            Case::CaseEqualExpr(tok, e) => {
                let tok = f.fold_token(tok);
                Case::CaseEqualExpr(tok, f.fold_expr(e))
            }
        })
        .collect();
    CaseAndBody {
        cases,
        body: f.fold_stmt(case.body),
    }
}

pub fn fold_pattern<F: Fold + ?Sized>(f: &mut F, pat: Pattern) -> Pattern {
    match pat {
        Pattern::PatLiteral(lit) => Pattern::PatLiteral(f.fold_literal(lit)),
        Pattern::PatConstructor(name, pats) => {
            let name = f.fold_name(name);
            Pattern::PatConstructor(name, pats.into_iter().map(|p| f.fold_pattern(p)).collect())
        }
        Pattern::PatRecord(fields) => Pattern::PatRecord(fold_bracket(f, fields, |f, fields| {
            fields
                .into_iter()
                .map(|field| {
                    let name = fold_idents(f, field.field);
                    PatRecordField {
                        field: name,
                        pat: f.fold_pattern(field.pat),
                    }
                })
                .collect()
        })),
        Pattern::PatId(id, info) => {
            let id = f.fold_ident(id);
            Pattern::PatId(id, f.fold_id_info(info))
        }
        Pattern::PatTuple(pats) => Pattern::PatTuple(fold_bracket(f, pats, |f, pats| {
            pats.into_iter().map(|p| f.fold_pattern(p)).collect()
        })),
        Pattern::PatList(pats) => Pattern::PatList(fold_bracket(f, pats, |f, pats| {
            pats.into_iter().map(|p| f.fold_pattern(p)).collect()
        })),
        Pattern::PatKeyVal(a, b) => {
            let a = fold_bpattern(f, a);
            Pattern::PatKeyVal(a, fold_bpattern(f, b))
        }
        Pattern::PatUnderscore(tok) => Pattern::PatUnderscore(f.fold_token(tok)),
        Pattern::PatDisj(a, b) => {
            let a = fold_bpattern(f, a);
            Pattern::PatDisj(a, fold_bpattern(f, b))
        }
        Pattern::PatTyped(p, ty) => {
            let p = fold_bpattern(f, p);
            Pattern::PatTyped(p, f.fold_type(ty))
        }
        Pattern::PatWhen(p, guard) => {
            let p = fold_bpattern(f, p);
            Pattern::PatWhen(p, f.fold_expr(guard))
        }
        Pattern::PatAs(p, id, info) => {
            let p = fold_bpattern(f, p);
            let id = f.fold_ident(id);
            Pattern::PatAs(p, id, f.fold_id_info(info))
        }
        Pattern::PatType(ty) => Pattern::PatType(f.fold_type(ty)),
        Pattern::PatVar(ty, binding) => {
            let ty = f.fold_type(ty);
            let binding = binding.map(|(id, info)| {
                let id = f.fold_ident(id);
                (id, f.fold_id_info(info))
            });
            Pattern::PatVar(ty, binding)
        }
        Pattern::PatEllipsis(tok) => Pattern::PatEllipsis(f.fold_token(tok)),
        Pattern::OtherPat(op, payload) => Pattern::OtherPat(op, fold_anys(f, payload)),
    }
}

pub fn fold_type<F: Fold + ?Sized>(f: &mut F, ty: Type) -> Type {
    match ty {
        Type::TyBuiltin(name) => Type::TyBuiltin(fold_wrap(f, name)),
        Type::TyN(name) => Type::TyN(f.fold_name(name)),
        Type::TyApply(base, targs) => {
            let base = fold_btype(f, base);
            Type::TyApply(base, fold_type_arguments(f, targs))
        }
        Type::TyVar(id) => Type::TyVar(f.fold_ident(id)),
        Type::TyFun(params, ret) => {
            let params = fold_parameters(f, params);
            Type::TyFun(params, fold_btype(f, ret))
        }
        Type::TyArray(dim, elem) => {
            let elem = fold_btype(f, elem);
            let dim = fold_bracket(f, dim, |f, e| e.map(|e| fold_bexpr(f, e)));
            Type::TyArray(dim, elem)
        }
        Type::TyPointer(tok, ty) => {
            let tok = f.fold_token(tok);
            Type::TyPointer(tok, fold_btype(f, ty))
        }
        Type::TyTuple(types) => Type::TyTuple(fold_bracket(f, types, fold_types)),
        Type::TyQuestion(ty, tok) => {
            let ty = fold_btype(f, ty);
            Type::TyQuestion(ty, f.fold_token(tok))
        }
        Type::TyAnd(fields) => Type::TyAnd(fold_fields(f, fields)),
        Type::TyOr(a, tok, b) => {
            let a = fold_btype(f, a);
            let tok = f.fold_token(tok);
            Type::TyOr(a, tok, fold_btype(f, b))
        }
        Type::OtherType(op, payload) => Type::OtherType(op, fold_anys(f, payload)),
    }
}

pub fn fold_type_argument<F: Fold + ?Sized>(f: &mut F, arg: TypeArgument) -> TypeArgument {
    match arg {
        TypeArgument::TypeArg(ty) => TypeArgument::TypeArg(f.fold_type(ty)),
        TypeArgument::Wildcard(tok, bound) => {
            let tok = f.fold_token(tok);
            let bound = bound.map(|(kind, ty)| {
                let kind = fold_wrap(f, kind);
                (kind, f.fold_type(ty))
            });
            TypeArgument::Wildcard(tok, bound)
        }
        TypeArgument::OtherTypeArg(op, payload) => {
            TypeArgument::OtherTypeArg(op, fold_anys(f, payload))
        }
    }
}

pub fn fold_type_parameter<F: Fold + ?Sized>(f: &mut F, param: TypeParameter) -> TypeParameter {
    let name = f.fold_ident(param.name);
    TypeParameter {
        name,
        bounds: fold_types(f, param.bounds),
    }
}

pub fn fold_attribute<F: Fold + ?Sized>(f: &mut F, attr: Attribute) -> Attribute {
    match attr {
        Attribute::KeywordAttr(kw) => Attribute::KeywordAttr(fold_wrap(f, kw)),
        Attribute::NamedAttr(tok, name, args) => {
            let tok = f.fold_token(tok);
            let name = f.fold_name(name);
            Attribute::NamedAttr(tok, name, fold_arguments(f, args))
        }
        Attribute::OtherAttribute(op, payload) => {
            Attribute::OtherAttribute(op, fold_anys(f, payload))
        }
    }
}

pub fn fold_entity<F: Fold + ?Sized>(f: &mut F, entity: Entity) -> Entity {
    let attrs = entity
        .attrs
        .into_iter()
        .map(|a| f.fold_attribute(a))
        .collect();
    let name = f.fold_ident(entity.name);
    let tparams = entity
        .tparams
        .into_iter()
        .map(|tp| fold_type_parameter(f, tp))
        .collect();
    Entity {
        name,
        attrs,
        tparams,
        info: f.fold_id_info(entity.info),
    }
}

pub fn fold_definition<F: Fold + ?Sized>(f: &mut F, def: Definition) -> Definition {
    let entity = f.fold_entity(def.entity);
    Definition {
        entity,
        kind: fold_definition_kind(f, def.kind),
    }
}

pub fn fold_definition_kind<F: Fold + ?Sized>(f: &mut F, kind: DefinitionKind) -> DefinitionKind {
    match kind {
        DefinitionKind::FuncDef(def) => DefinitionKind::FuncDef(f.fold_function_definition(def)),
        DefinitionKind::VarDef(def) => DefinitionKind::VarDef(fold_variable_definition(f, def)),
        DefinitionKind::TypeDef(def) => DefinitionKind::TypeDef(fold_type_definition(f, def)),
        DefinitionKind::ClassDef(def) => DefinitionKind::ClassDef(f.fold_class_definition(def)),
        DefinitionKind::ModuleDef(def) => DefinitionKind::ModuleDef(ModuleDefinition {
            kind: match def.kind {
                ModuleDefinitionKind::ModuleAlias(ids) => {
                    ModuleDefinitionKind::ModuleAlias(fold_idents(f, ids))
                }
                ModuleDefinitionKind::ModuleStruct(ids, body) => {
                    let ids = ids.map(|ids| fold_idents(f, ids));
                    ModuleDefinitionKind::ModuleStruct(ids, f.fold_stmts(body))
                }
                ModuleDefinitionKind::OtherModule(op, payload) => {
                    ModuleDefinitionKind::OtherModule(op, fold_anys(f, payload))
                }
            },
        }),
        DefinitionKind::MacroDef(def) => {
            let params = fold_idents(f, def.params);
            DefinitionKind::MacroDef(MacroDefinition {
                params,
                body: fold_anys(f, def.body),
            })
        }
        DefinitionKind::Signature(ty) => DefinitionKind::Signature(f.fold_type(ty)),
        DefinitionKind::UseOuterDecl(tok) => DefinitionKind::UseOuterDecl(f.fold_token(tok)),
        DefinitionKind::EnumEntryDef(def) => {
            let args = def.args.map(|a| fold_arguments(f, a));
            let body = def.body.map(|b| fold_fields(f, b));
            DefinitionKind::EnumEntryDef(EnumEntryDefinition { args, body })
        }
    }
}

pub fn fold_variable_definition<F: Fold + ?Sized>(
    f: &mut F,
    def: VariableDefinition,
) -> VariableDefinition {
    let ty = def.ty.map(|t| f.fold_type(t));
    let init = def.init.map(|e| f.fold_expr(e));
    VariableDefinition { init, ty }
}

pub fn fold_type_definition<F: Fold + ?Sized>(f: &mut F, def: TypeDefinition) -> TypeDefinition {
    let kind = match def.kind {
        TypeDefinitionKind::OrType(elems) => TypeDefinitionKind::OrType(
            elems
                .into_iter()
                .map(|elem| match elem {
                    OrTypeElement::OrConstructor(id, types) => {
                        let id = f.fold_ident(id);
                        OrTypeElement::OrConstructor(id, fold_types(f, types))
                    }
                    OrTypeElement::OrEnum(id, e) => {
                        let id = f.fold_ident(id);
                        OrTypeElement::OrEnum(id, e.map(|e| f.fold_expr(e)))
                    }
                    OrTypeElement::OrUnion(id, ty) => {
                        let id = f.fold_ident(id);
                        OrTypeElement::OrUnion(id, f.fold_type(ty))
                    }
                    OrTypeElement::OtherOr(op, payload) => {
                        OrTypeElement::OtherOr(op, fold_anys(f, payload))
                    }
                })
                .collect(),
        ),
        TypeDefinitionKind::AndType(fields) => TypeDefinitionKind::AndType(fold_fields(f, fields)),
        TypeDefinitionKind::AliasType(ty) => TypeDefinitionKind::AliasType(f.fold_type(ty)),
        TypeDefinitionKind::NewType(ty) => TypeDefinitionKind::NewType(f.fold_type(ty)),
        TypeDefinitionKind::Exception(id, types) => {
            let id = f.fold_ident(id);
            TypeDefinitionKind::Exception(id, fold_types(f, types))
        }
        TypeDefinitionKind::OtherTypeKind(op, payload) => {
            TypeDefinitionKind::OtherTypeKind(op, fold_anys(f, payload))
        }
    };
    TypeDefinition { kind }
}

pub fn fold_function_definition<F: Fold + ?Sized>(
    f: &mut F,
    def: FunctionDefinition,
) -> FunctionDefinition {
    let kind = fold_wrap(f, def.kind);
    let params = fold_bracket(f, def.params, fold_parameters);
    let ret_type = def.ret_type.map(|t| f.fold_type(t));
    FunctionDefinition {
        kind,
        params,
        ret_type,
        body: fold_bstmt(f, def.body),
    }
}

fn fold_parameter_classic<F: Fold + ?Sized>(f: &mut F, param: ParameterClassic) -> ParameterClassic {
    let attrs = param
        .attrs
        .into_iter()
        .map(|a| f.fold_attribute(a))
        .collect();
    let ty = param.ty.map(|t| f.fold_type(t));
    let name = param.name.map(|n| f.fold_ident(n));
    let default = param.default.map(|e| f.fold_expr(e));
    ParameterClassic {
        name,
        ty,
        default,
        attrs,
        info: f.fold_id_info(param.info),
    }
}

pub fn fold_parameter<F: Fold + ?Sized>(f: &mut F, param: Parameter) -> Parameter {
    match param {
        Parameter::Classic(p) => Parameter::Classic(fold_parameter_classic(f, p)),
        Parameter::Pattern(p) => Parameter::Pattern(f.fold_pattern(p)),
        Parameter::Rest(tok, p) => {
            let tok = f.fold_token(tok);
            Parameter::Rest(tok, fold_parameter_classic(f, p))
        }
        Parameter::HashSplat(tok, p) => {
            let tok = f.fold_token(tok);
            Parameter::HashSplat(tok, fold_parameter_classic(f, p))
        }
        Parameter::Ellipsis(tok) => Parameter::Ellipsis(f.fold_token(tok)),
        Parameter::OtherParam(op, payload) => Parameter::OtherParam(op, fold_anys(f, payload)),
    }
}

pub fn fold_class_definition<F: Fold + ?Sized>(f: &mut F, def: ClassDefinition) -> ClassDefinition {
    let kind = fold_wrap(f, def.kind);
    let params = fold_parameters(f, def.params);
    let extends = fold_types(f, def.extends);
    let implements = fold_types(f, def.implements);
    let mixins = fold_types(f, def.mixins);
    ClassDefinition {
        kind,
        extends,
        implements,
        mixins,
        params,
        body: fold_fields(f, def.body),
    }
}

pub fn fold_field<F: Fold + ?Sized>(f: &mut F, field: Field) -> Field {
    match field {
        Field::FieldStmt(s) => Field::FieldStmt(f.fold_stmt(s)),
        Field::FieldSpread(tok, e) => {
            let tok = f.fold_token(tok);
            Field::FieldSpread(tok, f.fold_expr(e))
        }
    }
}

pub fn fold_directive<F: Fold + ?Sized>(f: &mut F, dir: Directive) -> Directive {
    match dir {
        Directive::ImportFrom(tok, module, id, alias) => {
            let tok = f.fold_token(tok);
            let module = fold_module_name(f, module);
            let id = f.fold_ident(id);
            Directive::ImportFrom(tok, module, id, alias.map(|a| fold_alias(f, a)))
        }
        Directive::ImportAs(tok, module, alias) => {
            let tok = f.fold_token(tok);
            let module = fold_module_name(f, module);
            Directive::ImportAs(tok, module, alias.map(|a| fold_alias(f, a)))
        }
        Directive::ImportAll(tok, module, star) => {
            let tok = f.fold_token(tok);
            let module = fold_module_name(f, module);
            Directive::ImportAll(tok, module, f.fold_token(star))
        }
        Directive::Package(tok, ids) => {
            let tok = f.fold_token(tok);
            Directive::Package(tok, fold_idents(f, ids))
        }
        Directive::PackageEnd(tok) => Directive::PackageEnd(f.fold_token(tok)),
        Directive::Pragma(id, payload) => {
            let id = f.fold_ident(id);
            Directive::Pragma(id, fold_anys(f, payload))
        }
        Directive::OtherDirective(op, payload) => {
            Directive::OtherDirective(op, fold_anys(f, payload))
        }
    }
}

fn fold_alias<F: Fold + ?Sized>(f: &mut F, alias: Alias) -> Alias {
    let ident = f.fold_ident(alias.ident);
    Alias {
        ident,
        info: f.fold_id_info(alias.info),
    }
}
