use gast_core::ast::{
    name_of_ids, Alias, Any, Argument, Arguments, Attribute, Bracket, ClassDefinition, ClassKind,
    Definition, DefinitionKind, Directive, DottedIdent, Entity, Field, FunctionDefinition,
    FunctionKind, Ident, Keyword, ModuleName, OtherAttributeOp, OtherDirectiveOp, OtherParamOp,
    Parameter, ParameterClassic, Stmt, Token, Type, TypeArgument, TypeDefinition,
    TypeDefinitionKind, TypeParameter, VariableDefinition, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{field_children, find_anon, find_kind, named_children};
use tree_sitter::Node;

use super::Normalizer;

impl<'s> Normalizer<'s> {
    /// Functions and classes, decorated or not. Functions directly inside a
    /// class body are methods.
    pub(super) fn lower_definition(&self, node: Node, in_class: bool) -> Result<Definition> {
        let ctx = &self.ctx;
        match node.kind() {
            "decorated_definition" => {
                let mut attrs = Vec::new();
                for decorator in named_children(node) {
                    if decorator.kind() == "decorator" {
                        attrs.push(self.lower_decorator(decorator)?);
                    }
                }
                let mut def = self.lower_definition(ctx.required(node, "definition")?, in_class)?;
                attrs.append(&mut def.entity.attrs);
                def.entity.attrs = attrs;
                Ok(def)
            }
            "class_definition" => self.lower_class(node),
            _ => self.lower_function(node, in_class),
        }
    }

    /// `@name`, `@a.b`, `@name(args)`; any other expression is kept as is.
    fn lower_decorator(&self, node: Node) -> Result<Attribute> {
        let ctx = &self.ctx;
        let at = ctx.token_of(node, "@");
        let expr = ctx.first_named(node)?;
        let (callee, args) = match expr.kind() {
            "call" => (
                ctx.required(expr, "function")?,
                Some(ctx.required(expr, "arguments")?),
            ),
            _ => (expr, None),
        };
        let Some(ids) = self.dotted_chain(callee) else {
            return Ok(Attribute::OtherAttribute(
                OtherAttributeOp::Todo("decorator".into()),
                vec![Any::Tk(at), Any::E(self.lower_expr(expr)?)],
            ));
        };
        let args = match args {
            Some(args) => self.lower_arguments(args)?,
            None => Arguments::fake(Vec::new()),
        };
        Ok(Attribute::NamedAttr(at, name_of_ids(ctx.language, ids)?, args))
    }

    /// Identifiers of `a.b.c` written with attribute accesses.
    pub(super) fn dotted_chain(&self, node: Node) -> Option<DottedIdent> {
        let ctx = &self.ctx;
        match node.kind() {
            "identifier" => Some(vec![ctx.ident(node)]),
            "attribute" => {
                let mut ids = self.dotted_chain(node.child_by_field_name("object")?)?;
                ids.push(ctx.ident(node.child_by_field_name("attribute")?));
                Some(ids)
            }
            _ => None,
        }
    }

    fn lower_function(&self, node: Node, in_class: bool) -> Result<Definition> {
        let ctx = &self.ctx;
        let name = ctx.ident(ctx.required(node, "name")?);
        let mut attrs = Vec::new();
        if let Some(tok) = find_anon(node, "async") {
            attrs.push(Attribute::keyword(Keyword::Async, ctx.tok(tok)));
        }
        let params = self.lower_params(ctx.required(node, "parameters")?)?;
        let ret_type = match node.child_by_field_name("return_type") {
            Some(ty) => Some(self.lower_type(ty)?),
            None => None,
        };
        let body = self.lower_block(ctx.required(node, "body")?)?;
        let kind = if in_class {
            FunctionKind::Method
        } else {
            FunctionKind::Function
        };
        let def = FunctionDefinition {
            kind: Wrap::new(kind, ctx.token_of(node, "def")),
            params,
            ret_type,
            body: Box::new(body),
        };
        let entity = Entity::basic(name)
            .with_attrs(attrs)
            .with_tparams(self.lower_type_parameters(node)?);
        Ok(Definition::new(entity, DefinitionKind::FuncDef(def)))
    }

    fn lower_class(&self, node: Node) -> Result<Definition> {
        let ctx = &self.ctx;
        let name = ctx.ident(ctx.required(node, "name")?);
        let mut extends = Vec::new();
        let mut mixins = Vec::new();
        if let Some(supers) = node.child_by_field_name("superclasses") {
            for arg in named_children(supers) {
                match arg.kind() {
                    // `metaclass=M` and friends
                    "keyword_argument" => mixins.push(Type::todo(
                        "keyword_argument",
                        vec![
                            Any::I(ctx.ident(ctx.required(arg, "name")?)),
                            Any::E(self.lower_expr(ctx.required(arg, "value")?)?),
                        ],
                    )),
                    _ => extends.push(self.lower_type(arg)?),
                }
            }
        }
        let block = ctx.required(node, "body")?;
        let mut fields = Vec::new();
        for member in named_children(block) {
            if matches!(member.kind(), "function_definition" | "decorated_definition") {
                fields.push(Field::FieldStmt(Stmt::def(self.lower_definition(member, true)?)));
            } else {
                let mut stmts = Vec::new();
                self.lower_stmt_into(member, &mut stmts)?;
                fields.extend(stmts.into_iter().map(Field::FieldStmt));
            }
        }
        let def = ClassDefinition {
            kind: Wrap::new(ClassKind::Class, ctx.token_of(node, "class")),
            extends,
            implements: Vec::new(),
            mixins,
            params: Vec::new(),
            body: Bracket::new(ctx.token_of(node, ":"), fields, Token::fake("")),
        };
        let entity = Entity::basic(name).with_tparams(self.lower_type_parameters(node)?);
        Ok(Definition::new(entity, DefinitionKind::ClassDef(def)))
    }

    /// PEP 695 `def f[T: int]()` parameters.
    fn lower_type_parameters(&self, node: Node) -> Result<Vec<TypeParameter>> {
        let Some(list) = node.child_by_field_name("type_parameters") else {
            return Ok(Vec::new());
        };
        let mut params = Vec::new();
        for param in named_children(list) {
            let ty = self.lower_type(param)?;
            match ty {
                Type::TyN(name) => params.push(TypeParameter {
                    name: name.ident().clone(),
                    bounds: Vec::new(),
                }),
                other => {
                    self.ctx.unsupported("type parameter", param);
                    params.push(TypeParameter {
                        name: Wrap::new(self.ctx.text(param).to_string(), self.ctx.tok(param)),
                        bounds: vec![other],
                    });
                }
            }
        }
        Ok(params)
    }

    /// Parameters of `def` (parenthesized) and `lambda` (bare).
    pub(super) fn lower_params(&self, node: Node) -> Result<Bracket<Vec<Parameter>>> {
        let ctx = &self.ctx;
        let mut params = Vec::new();
        for param in named_children(node) {
            params.push(self.lower_param(param)?);
        }
        if node.kind() == "lambda_parameters" {
            return Ok(Bracket::fake(params));
        }
        Ok(Bracket::new(
            ctx.token_of(node, "("),
            params,
            ctx.token_of(node, ")"),
        ))
    }

    fn lower_param(&self, node: Node) -> Result<Parameter> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "identifier" => Parameter::Classic(ParameterClassic::named(ctx.ident(node))),
            "default_parameter" | "typed_default_parameter" => {
                let name = ctx.required(node, "name")?;
                let ty = match node.child_by_field_name("type") {
                    Some(ty) => Some(self.lower_type(ty)?),
                    None => None,
                };
                let default = Some(self.lower_expr(ctx.required(node, "value")?)?);
                if name.kind() != "identifier" {
                    // py2 `def f((a, b)=p)`
                    return Ok(Parameter::Pattern(self.lower_target(name)?));
                }
                Parameter::Classic(
                    ParameterClassic::named(ctx.ident(name))
                        .with_type(ty)
                        .with_default(default),
                )
            }
            "typed_parameter" => {
                let ty = Some(self.lower_type(ctx.required(node, "type")?)?);
                let inner = ctx.first_named(node)?;
                match self.lower_param(inner)? {
                    Parameter::Classic(p) => Parameter::Classic(p.with_type(ty)),
                    Parameter::Rest(tok, p) => Parameter::Rest(tok, p.with_type(ty)),
                    Parameter::HashSplat(tok, p) => Parameter::HashSplat(tok, p.with_type(ty)),
                    other => other,
                }
            }
            "list_splat_pattern" => Parameter::Rest(
                ctx.token_of(node, "*"),
                ParameterClassic::named(ctx.ident(ctx.first_named(node)?)),
            ),
            "dictionary_splat_pattern" => Parameter::HashSplat(
                ctx.token_of(node, "**"),
                ParameterClassic::named(ctx.ident(ctx.first_named(node)?)),
            ),
            "tuple_pattern" => Parameter::Pattern(self.lower_target(node)?),
            // bare `*` and `/` markers
            "keyword_separator" | "positional_separator" => Parameter::OtherParam(
                OtherParamOp::Todo(node.kind().to_string()),
                vec![Any::Tk(ctx.tok(node))],
            ),
            kind => {
                ctx.unsupported("parameter", node);
                Parameter::OtherParam(
                    OtherParamOp::Todo(kind.to_string()),
                    self.lower_children_any(node)?,
                )
            }
        })
    }

    /// `x: int = 1` declares `x`; other annotated targets stay assignments.
    pub(super) fn lower_annotated_assignment(&self, node: Node) -> Result<Option<Definition>> {
        let ctx = &self.ctx;
        let left = ctx.required(node, "left")?;
        if left.kind() != "identifier" {
            return Ok(None);
        }
        let ty = Some(self.lower_type(ctx.required(node, "type")?)?);
        let init = match node.child_by_field_name("right") {
            Some(right) => Some(self.lower_expr(right)?),
            None => None,
        };
        Ok(Some(Definition::new(
            Entity::basic(ctx.ident(left)),
            DefinitionKind::VarDef(VariableDefinition { init, ty }),
        )))
    }

    /// `type Alias = T`, `type Alias[T] = U`
    pub(super) fn lower_type_alias(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let left = self.lower_type(ctx.required(node, "left")?)?;
        let right = self.lower_type(ctx.required(node, "right")?)?;
        let Some((name, tparams)) = alias_head(&left) else {
            ctx.unsupported("type alias target", node);
            return Ok(Stmt::todo_any(
                "type_alias_statement",
                vec![Any::T(left), Any::T(right)],
            ));
        };
        let entity = Entity::basic(name).with_tparams(tparams);
        Ok(Stmt::def(Definition::new(
            entity,
            DefinitionKind::TypeDef(TypeDefinition {
                kind: TypeDefinitionKind::AliasType(right),
            }),
        )))
    }

    /// One directive per imported name.
    pub(super) fn lower_import(&self, node: Node) -> Result<Vec<Stmt>> {
        let ctx = &self.ctx;
        let mut out = Vec::new();
        match node.kind() {
            "future_import_statement" => {
                let mut payload = vec![Any::Tk(ctx.token_of(node, "__future__"))];
                for name in field_children(node, "name") {
                    let (ids, alias) = self.imported_name(name)?;
                    payload.push(Any::Di(ids));
                    if let Some(alias) = alias {
                        payload.push(Any::I(alias.ident));
                    }
                }
                out.push(Stmt::directive(Directive::OtherDirective(
                    OtherDirectiveOp::Future,
                    payload,
                )));
            }
            "import_statement" => {
                let tok = ctx.token_of(node, "import");
                for name in field_children(node, "name") {
                    let (ids, alias) = self.imported_name(name)?;
                    out.push(Stmt::directive(Directive::ImportAs(
                        tok.clone(),
                        ModuleName::DottedName(ids),
                        alias,
                    )));
                }
            }
            _ => {
                let tok = ctx.token_of(node, "from");
                let module_node = ctx.required(node, "module_name")?;
                let module = match module_node.kind() {
                    "dotted_name" => ModuleName::DottedName(self.dotted_name(module_node)?),
                    // `from . import x`, `from ..pkg import y`
                    _ => ModuleName::FileName(Wrap::new(
                        ctx.text(module_node).to_string(),
                        ctx.tok(module_node),
                    )),
                };
                if let Some(star) = find_kind(node, "wildcard_import") {
                    out.push(Stmt::directive(Directive::ImportAll(
                        tok,
                        module,
                        ctx.tok(star),
                    )));
                    return Ok(out);
                }
                for name in field_children(node, "name") {
                    let (mut ids, alias) = self.imported_name(name)?;
                    let last = ids
                        .pop()
                        .ok_or_else(|| ctx.malformed(name, "empty imported name"))?;
                    out.push(Stmt::directive(Directive::ImportFrom(
                        tok.clone(),
                        module.clone(),
                        last,
                        alias,
                    )));
                }
            }
        }
        Ok(out)
    }

    /// `a.b` or `a.b as c`.
    fn imported_name(&self, node: Node) -> Result<(DottedIdent, Option<Alias>)> {
        let ctx = &self.ctx;
        if node.kind() == "aliased_import" {
            let ids = self.dotted_name(ctx.required(node, "name")?)?;
            let alias = Alias::new(ctx.ident(ctx.required(node, "alias")?));
            return Ok((ids, Some(alias)));
        }
        Ok((self.dotted_name(node)?, None))
    }

    fn dotted_name(&self, node: Node) -> Result<DottedIdent> {
        let ctx = &self.ctx;
        if node.kind() == "identifier" {
            return Ok(vec![ctx.ident(node)]);
        }
        let ids: DottedIdent = named_children(node)
            .into_iter()
            .map(|id| ctx.ident(id))
            .collect();
        if ids.is_empty() {
            return Err(ctx.malformed(node, "empty dotted name"));
        }
        Ok(ids)
    }

    pub(super) fn lower_arguments(&self, node: Node) -> Result<Arguments> {
        let ctx = &self.ctx;
        if node.kind() == "generator_expression" {
            // `f(x for x in xs)`
            return Ok(Bracket::fake(vec![Argument::Arg(self.lower_expr(node)?)]));
        }
        let mut args = Vec::new();
        for arg in named_children(node) {
            args.push(match arg.kind() {
                "keyword_argument" => Argument::ArgKwd(
                    ctx.ident(ctx.required(arg, "name")?),
                    self.lower_expr(ctx.required(arg, "value")?)?,
                ),
                _ => Argument::Arg(self.lower_expr(arg)?),
            });
        }
        Ok(Bracket::new(
            ctx.token_of(node, "("),
            args,
            ctx.token_of(node, ")"),
        ))
    }
}

/// Name and type parameters of an alias target, when it is `N` or `N[T, ...]`.
fn alias_head(left: &Type) -> Option<(Ident, Vec<TypeParameter>)> {
    match left {
        Type::TyN(name) => Some((name.ident().clone(), Vec::new())),
        Type::TyApply(head, targs) => {
            let Type::TyN(name) = head.as_ref() else {
                return None;
            };
            let mut tparams = Vec::new();
            for arg in &targs.value {
                let TypeArgument::TypeArg(Type::TyN(param)) = arg else {
                    return None;
                };
                tparams.push(TypeParameter {
                    name: param.ident().clone(),
                    bounds: Vec::new(),
                });
            }
            Some((name.ident().clone(), tparams))
        }
        _ => None,
    }
}
