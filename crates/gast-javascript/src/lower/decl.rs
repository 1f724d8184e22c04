use gast_core::ast::{
    Alias, Any, Arguments, Attribute, Bracket, ClassDefinition, ClassKind, Definition,
    DefinitionKind, Directive, Entity, Expr, Field, FunctionDefinition, FunctionKind, Ident,
    Keyword, Literal, ModuleName, Name, OtherAttributeOp, OtherDirectiveOp, Stmt, Token, Type,
    VariableDefinition, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{children, find_anon, has_anon, named_children, unquote};
use tree_sitter::Node;

use super::Normalizer;

impl<'s> Normalizer<'s> {
    /// Function, class and variable declarations. Destructuring declarations
    /// become [`Expr::LetPattern`] statements.
    pub(super) fn lower_declaration(&self, node: Node) -> Result<Vec<Stmt>> {
        let ctx = &self.ctx;
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                let name = ctx.ident(ctx.required(node, "name")?);
                let attrs = self.function_attrs(node);
                let def = self.lower_function(node, FunctionKind::Function)?;
                let entity = Entity::basic(name).with_attrs(attrs);
                Ok(vec![Stmt::def(Definition::new(
                    entity,
                    DefinitionKind::FuncDef(def),
                ))])
            }
            "class_declaration" => {
                let name = ctx.ident(ctx.required(node, "name")?);
                let attrs = self.decorators(node)?;
                let def = self.lower_class(node)?;
                let entity = Entity::basic(name).with_attrs(attrs);
                Ok(vec![Stmt::def(Definition::new(
                    entity,
                    DefinitionKind::ClassDef(def),
                ))])
            }
            "lexical_declaration" | "variable_declaration" => self.lower_variables(node),
            _ => Ok(vec![self.lower_stmt(node)?]),
        }
    }

    fn declaration_keyword(&self, node: Node) -> Attribute {
        let ctx = &self.ctx;
        let kind = node
            .child_by_field_name("kind")
            .or_else(|| find_anon(node, "var"))
            .or_else(|| find_anon(node, "let"))
            .or_else(|| find_anon(node, "const"));
        match kind {
            Some(kw) => {
                let keyword = Keyword::from_modifier(ctx.text(kw)).unwrap_or(Keyword::Var);
                Attribute::keyword(keyword, ctx.tok(kw))
            }
            None => Attribute::keyword(Keyword::Var, Token::fake("var")),
        }
    }

    fn lower_variables(&self, node: Node) -> Result<Vec<Stmt>> {
        let ctx = &self.ctx;
        let keyword = self.declaration_keyword(node);
        let mut out = Vec::new();
        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let name = ctx.required(declarator, "name")?;
            let init = match declarator.child_by_field_name("value") {
                Some(value) => Some(self.lower_expr(value)?),
                None => None,
            };
            if name.kind() == "identifier" {
                let entity = Entity::basic(ctx.ident(name)).with_attrs(vec![keyword.clone()]);
                out.push(Stmt::def(Definition::new(
                    entity,
                    DefinitionKind::VarDef(VariableDefinition { init, ty: None }),
                )));
            } else {
                let pat = self.lower_pattern(name)?;
                let init =
                    init.unwrap_or_else(|| Expr::L(Literal::Undefined(Token::fake("undefined"))));
                let e = Expr::LetPattern(Box::new(pat), Box::new(init));
                out.push(Stmt::expr(e, self.semicolon(node)));
            }
        }
        Ok(out)
    }

    /// Declarations in a classic `for` header.
    pub(super) fn lower_for_vars(&self, node: Node) -> Result<Vec<(Entity, VariableDefinition)>> {
        let ctx = &self.ctx;
        let keyword = self.declaration_keyword(node);
        let mut out = Vec::new();
        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let name = ctx.required(declarator, "name")?;
            let init = match declarator.child_by_field_name("value") {
                Some(value) => Some(self.lower_expr(value)?),
                None => None,
            };
            if name.kind() != "identifier" {
                // destructuring in a classic for header keeps the pattern text as the name
                ctx.unsupported("for initializer", name);
            }
            let entity = Entity::basic(ctx.ident(name)).with_attrs(vec![keyword.clone()]);
            out.push((entity, VariableDefinition { init, ty: None }));
        }
        Ok(out)
    }

    fn function_attrs(&self, node: Node) -> Vec<Attribute> {
        let ctx = &self.ctx;
        let mut attrs = Vec::new();
        if let Some(kw) = find_anon(node, "async") {
            attrs.push(Attribute::keyword(Keyword::Async, ctx.tok(kw)));
        }
        if let Some(star) = find_anon(node, "*") {
            attrs.push(Attribute::keyword(Keyword::Generator, ctx.tok(star)));
        }
        attrs
    }

    /// Parameters and body of any function-like node.
    pub(super) fn lower_function(&self, node: Node, kind: FunctionKind) -> Result<FunctionDefinition> {
        let ctx = &self.ctx;
        let kind_tok = match kind {
            FunctionKind::Arrow => ctx.token_of(node, "=>"),
            FunctionKind::Method => Token::fake("method"),
            _ => ctx.token_of(node, "function"),
        };
        let params = match (
            node.child_by_field_name("parameters"),
            node.child_by_field_name("parameter"),
        ) {
            (Some(params), _) => self.lower_params(params)?,
            (None, Some(single)) => Bracket::fake(vec![self.lower_param(single)?]),
            (None, None) => Bracket::fake(Vec::new()),
        };
        let body_node = ctx.required(node, "body")?;
        let body = if body_node.kind() == "statement_block" {
            self.lower_block(body_node)?
        } else {
            // expression-bodied arrow function
            let e = self.lower_expr(body_node)?;
            Stmt::Return(Token::fake("return"), Some(e), Token::fake(";"))
        };
        Ok(FunctionDefinition {
            kind: Wrap::new(kind, kind_tok),
            params,
            ret_type: None,
            body: Box::new(body),
        })
    }

    pub(super) fn lower_class(&self, node: Node) -> Result<ClassDefinition> {
        let ctx = &self.ctx;
        let mut extends = Vec::new();
        if let Some(heritage) = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "class_heritage")
        {
            for parent in named_children(heritage) {
                extends.push(self.type_of_expr(self.lower_expr(parent)?));
            }
        }
        let body_node = ctx.required(node, "body")?;
        let mut fields = Vec::new();
        for member in named_children(body_node) {
            if let Some(field) = self.lower_class_member(member)? {
                fields.push(field);
            }
        }
        Ok(ClassDefinition {
            kind: Wrap::new(ClassKind::Class, ctx.token_of(node, "class")),
            extends,
            implements: Vec::new(),
            mixins: Vec::new(),
            params: Vec::new(),
            body: Bracket::new(
                ctx.token_of(body_node, "{"),
                fields,
                ctx.token_of(body_node, "}"),
            ),
        })
    }

    fn lower_class_member(&self, node: Node) -> Result<Option<Field>> {
        let ctx = &self.ctx;
        let field = match node.kind() {
            "method_definition" => Field::FieldStmt(Stmt::def(self.lower_method(node)?)),
            "field_definition" => {
                let prop = ctx.required(node, "property")?;
                let mut attrs = self.decorators(node)?;
                if let Some(kw) = find_anon(node, "static") {
                    attrs.push(Attribute::keyword(Keyword::Static, ctx.tok(kw)));
                }
                let init = match node.child_by_field_name("value") {
                    Some(value) => Some(self.lower_expr(value)?),
                    None => None,
                };
                let entity = Entity::basic(self.property_name(prop)).with_attrs(attrs);
                Field::FieldStmt(Stmt::def(Definition::new(
                    entity,
                    DefinitionKind::VarDef(VariableDefinition { init, ty: None }),
                )))
            }
            "class_static_block" => Field::FieldStmt(self.lower_static_block(node)?),
            "decorator" => return Ok(None),
            _ => {
                ctx.unsupported("class member", node);
                Field::FieldStmt(Stmt::todo_any(node.kind(), self.lower_children_any(node)?))
            }
        };
        Ok(Some(field))
    }

    /// `name(params) { body }` in a class body or an object literal.
    pub(super) fn lower_method(&self, node: Node) -> Result<Definition> {
        let ctx = &self.ctx;
        let name_node = ctx.required(node, "name")?;
        let name = self.property_name(name_node);
        let mut attrs = self.decorators(node)?;
        for child in children(node) {
            if child.is_named() {
                continue;
            }
            let keyword = match child.kind() {
                "static" => Keyword::Static,
                "async" => Keyword::Async,
                "get" => Keyword::Getter,
                "set" => Keyword::Setter,
                "*" => Keyword::Generator,
                _ => continue,
            };
            attrs.push(Attribute::keyword(keyword, ctx.tok(child)));
        }
        if name.value == "constructor" {
            attrs.push(Attribute::keyword(Keyword::Ctor, Token::fake("constructor")));
        }
        let def = self.lower_function(node, FunctionKind::Method)?;
        Ok(Definition::new(
            Entity::basic(name).with_attrs(attrs),
            DefinitionKind::FuncDef(def),
        ))
    }

    /// Key of a property: identifiers as written, string keys unquoted.
    pub(super) fn property_name(&self, node: Node) -> Ident {
        let ctx = &self.ctx;
        match node.kind() {
            "string" => Wrap::new(unquote(ctx.text(node)).to_string(), ctx.tok(node)),
            _ => ctx.ident(node),
        }
    }

    /// A superclass or other type written as an expression.
    pub(super) fn type_of_expr(&self, e: Expr) -> Type {
        match e {
            Expr::N(name) => Type::TyN(name),
            Expr::DotAccess(..) => match dotted_name(&e) {
                Some(ids) => match gast_core::ast::name_of_ids(self.ctx.language, ids) {
                    Ok(name) => Type::TyN(name),
                    Err(_) => Type::todo("class_heritage", vec![Any::E(e)]),
                },
                None => Type::todo("class_heritage", vec![Any::E(e)]),
            },
            other => Type::todo("class_heritage", vec![Any::E(other)]),
        }
    }

    pub(super) fn decorators(&self, node: Node) -> Result<Vec<Attribute>> {
        let mut attrs = Vec::new();
        let decorators = named_children(node)
            .into_iter()
            .chain(node.child_by_field_name("decorator"))
            .filter(|c| c.kind() == "decorator");
        let mut seen = Vec::new();
        for decorator in decorators {
            if seen.contains(&decorator.id()) {
                continue;
            }
            seen.push(decorator.id());
            attrs.push(self.lower_decorator(decorator)?);
        }
        Ok(attrs)
    }

    fn lower_decorator(&self, node: Node) -> Result<Attribute> {
        let ctx = &self.ctx;
        let at = ctx.token_of(node, "@");
        let target = self.lower_expr(ctx.first_named(node)?)?;
        let (callee, args) = match target {
            Expr::Call(callee, args) => (*callee, args),
            other => (other, Arguments::fake(Vec::new())),
        };
        match &callee {
            Expr::N(name) => Ok(Attribute::NamedAttr(at, name.clone(), args)),
            Expr::DotAccess(..) => match dotted_name(&callee) {
                Some(ids) => Ok(Attribute::NamedAttr(
                    at,
                    gast_core::ast::name_of_ids(ctx.language, ids)?,
                    args,
                )),
                None => Ok(Attribute::OtherAttribute(
                    OtherAttributeOp::Todo("decorator".into()),
                    vec![Any::E(callee)],
                )),
            },
            _ => Ok(Attribute::OtherAttribute(
                OtherAttributeOp::Todo("decorator".into()),
                vec![Any::E(callee)],
            )),
        }
    }

    pub(super) fn lower_import(&self, node: Node) -> Result<Vec<Stmt>> {
        let ctx = &self.ctx;
        let import_tok = ctx.token_of(node, "import");
        let source = ctx.required(node, "source")?;
        let module = self.module_name(source);
        let Some(clause) = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "import_clause")
        else {
            return Ok(vec![Stmt::directive(Directive::ImportAs(
                import_tok, module, None,
            ))]);
        };
        let mut out = Vec::new();
        for part in named_children(clause) {
            let dir = match part.kind() {
                "identifier" => Directive::ImportFrom(
                    import_tok.clone(),
                    module.clone(),
                    Wrap::fake("default".to_string(), "default"),
                    Some(Alias::new(ctx.ident(part))),
                ),
                "namespace_import" => {
                    let alias = named_children(part)
                        .into_iter()
                        .next()
                        .map(|id| Alias::new(ctx.ident(id)));
                    Directive::ImportAs(import_tok.clone(), module.clone(), alias)
                }
                "named_imports" => {
                    for spec in named_children(part) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let name = self.property_name(ctx.required(spec, "name")?);
                        let alias = spec
                            .child_by_field_name("alias")
                            .map(|a| Alias::new(ctx.ident(a)));
                        out.push(Stmt::directive(Directive::ImportFrom(
                            import_tok.clone(),
                            module.clone(),
                            name,
                            alias,
                        )));
                    }
                    continue;
                }
                _ => {
                    ctx.unsupported("import clause", part);
                    continue;
                }
            };
            out.push(Stmt::directive(dir));
        }
        Ok(out)
    }

    /// Exported declarations are kept as declarations followed by an export
    /// marker naming them.
    pub(super) fn lower_export(&self, node: Node) -> Result<Vec<Stmt>> {
        let ctx = &self.ctx;
        let export_tok = ctx.token_of(node, "export");
        let is_default = has_anon(node, "default");
        let op = if is_default {
            OtherDirectiveOp::ExportDefault
        } else {
            OtherDirectiveOp::Export
        };
        let mut out = Vec::new();

        if let Some(decl) = node.child_by_field_name("declaration") {
            let stmts = self.lower_declaration(decl)?;
            let names: Vec<Ident> = stmts
                .iter()
                .filter_map(Stmt::as_definition)
                .map(|def| def.entity.name.clone())
                .collect();
            out.extend(stmts);
            for name in names {
                out.push(Stmt::directive(Directive::OtherDirective(
                    op.clone(),
                    vec![Any::Tk(export_tok.clone()), Any::I(name)],
                )));
            }
            return Ok(out);
        }

        if let Some(value) = node.child_by_field_name("value") {
            let e = self.lower_expr(value)?;
            out.push(Stmt::directive(Directive::OtherDirective(
                op,
                vec![Any::Tk(export_tok), Any::E(e)],
            )));
            return Ok(out);
        }

        let source = node
            .child_by_field_name("source")
            .map(|s| self.module_name(s));
        if let Some(clause) = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "export_clause")
        {
            for spec in named_children(clause) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let name = self.property_name(ctx.required(spec, "name")?);
                let alias = spec.child_by_field_name("alias").map(|a| self.property_name(a));
                if let Some(module) = &source {
                    out.push(Stmt::directive(Directive::ImportFrom(
                        export_tok.clone(),
                        module.clone(),
                        name.clone(),
                        alias.clone().map(Alias::new),
                    )));
                }
                let mut payload = vec![Any::Tk(export_tok.clone()), Any::I(name)];
                payload.extend(alias.map(Any::I));
                out.push(Stmt::directive(Directive::OtherDirective(op.clone(), payload)));
            }
            return Ok(out);
        }

        if let (Some(module), Some(star)) = (source, find_anon(node, "*")) {
            out.push(Stmt::directive(Directive::ImportAll(
                export_tok.clone(),
                module.clone(),
                ctx.tok(star),
            )));
            out.push(Stmt::directive(Directive::OtherDirective(
                op,
                vec![Any::Tk(export_tok), Any::Modn(module)],
            )));
            return Ok(out);
        }

        ctx.unsupported("export", node);
        out.push(Stmt::directive(Directive::OtherDirective(
            op,
            self.lower_children_any(node)?
                .into_iter()
                .filter(|a| !a.holds_stmt())
                .collect(),
        )));
        Ok(out)
    }

    fn module_name(&self, node: Node) -> ModuleName {
        let ctx = &self.ctx;
        ModuleName::FileName(Wrap::new(unquote(ctx.text(node)).to_string(), ctx.tok(node)))
    }
}

/// Segments of `a.b.c` when every part is a plain name.
pub(super) fn dotted_name(e: &Expr) -> Option<Vec<Ident>> {
    match e {
        Expr::N(Name::Id(id, _)) => Some(vec![id.clone()]),
        Expr::DotAccess(obj, _, gast_core::ast::FieldName::EN(Name::Id(id, _))) => {
            let mut ids = dotted_name(obj)?;
            ids.push(id.clone());
            Some(ids)
        }
        _ => None,
    }
}
