use gast_core::ast::{
    Any, Argument, Arguments, Attribute, Bracket, ClassDefinition, ClassKind, ContainerOperator,
    Definition, DefinitionKind, Directive, EnumEntryDefinition, Entity, Expr, Field,
    FunctionDefinition, FunctionKind, Keyword, ModuleDefinition, ModuleDefinitionKind,
    ModuleName, OtherAttributeOp, OtherModuleOp, OtherParamOp, OtherStmtWithStmtOp, Parameter,
    ParameterClassic, Stmt, Token, Type, VariableDefinition, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{children, find_kind, named_children};
use tree_sitter::Node;

use super::types::is_annotation;
use super::Normalizer;

impl<'s> Normalizer<'s> {
    /// Type and member declarations.
    pub(super) fn lower_declaration(&self, node: Node) -> Result<Vec<Stmt>> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => vec![Stmt::def(self.lower_class_declaration(node)?)],
            "field_declaration" | "constant_declaration" | "local_variable_declaration" => {
                self.lower_variables(node)?
            }
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                vec![Stmt::def(self.lower_method(node)?)]
            }
            "annotation_type_element_declaration" => {
                let name = ctx.ident(ctx.required(node, "name")?);
                let ty = self.lower_type(ctx.required(node, "type")?)?;
                let ty = self.wrap_dims(ty, node.child_by_field_name("dimensions"));
                let init = match node.child_by_field_name("value") {
                    Some(value) => Some(self.lower_element_value(value)?),
                    None => None,
                };
                let entity = Entity::basic(name).with_attrs(self.modifiers(node)?);
                vec![Stmt::def(Definition::new(
                    entity,
                    DefinitionKind::VarDef(VariableDefinition { init, ty: Some(ty) }),
                ))]
            }
            "package_declaration" => {
                let name = named_children(node)
                    .into_iter()
                    .find(|c| !is_annotation(*c))
                    .ok_or_else(|| ctx.malformed(node, "package without a name"))?;
                vec![Stmt::directive(Directive::Package(
                    ctx.token_of(node, "package"),
                    self.scoped_ids(name)?,
                ))]
            }
            "import_declaration" => vec![Stmt::directive(self.lower_import(node)?)],
            "module_declaration" => {
                let name = named_children(node)
                    .into_iter()
                    .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
                    .ok_or_else(|| ctx.malformed(node, "module without a name"))?;
                let mut ids = self.scoped_ids(name)?;
                let last = ids
                    .pop()
                    .ok_or_else(|| ctx.malformed(node, "module without a name"))?;
                let payload = match node.child_by_field_name("body") {
                    Some(body) => vec![Any::Tk(ctx.tok(body))],
                    None => Vec::new(),
                };
                ctx.unsupported("module declaration", node);
                vec![Stmt::def(Definition::new(
                    Entity::basic(last),
                    DefinitionKind::ModuleDef(ModuleDefinition {
                        kind: ModuleDefinitionKind::OtherModule(
                            OtherModuleOp::Todo("module_declaration".into()),
                            payload,
                        ),
                    }),
                ))]
            }
            _ => vec![self.lower_stmt(node)?],
        })
    }

    /// `import a.b.C;`, `import a.b.*;`, `import static a.B.c;`
    fn lower_import(&self, node: Node) -> Result<Directive> {
        let ctx = &self.ctx;
        let import_tok = ctx.token_of(node, "import");
        let name = named_children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
            .ok_or_else(|| ctx.malformed(node, "import without a name"))?;
        let mut ids = self.scoped_ids(name)?;
        if let Some(star) = find_kind(node, "asterisk") {
            return Ok(Directive::ImportAll(
                import_tok,
                ModuleName::DottedName(ids),
                ctx.tok(star),
            ));
        }
        if ids.len() == 1 {
            return Ok(Directive::ImportAs(import_tok, ModuleName::DottedName(ids), None));
        }
        let last = ids
            .pop()
            .ok_or_else(|| ctx.malformed(node, "import without a name"))?;
        Ok(Directive::ImportFrom(
            import_tok,
            ModuleName::DottedName(ids),
            last,
            None,
        ))
    }

    /// Modifier keywords and annotations of a declaration.
    pub(super) fn modifiers(&self, node: Node) -> Result<Vec<Attribute>> {
        let ctx = &self.ctx;
        let mut attrs = Vec::new();
        let Some(mods) = find_kind(node, "modifiers") else {
            return Ok(attrs);
        };
        for child in children(mods) {
            if is_annotation(child) {
                attrs.push(self.lower_annotation(child)?);
            } else if let Some(kw) = Keyword::from_modifier(ctx.text(child)) {
                attrs.push(Attribute::keyword(kw, ctx.tok(child)));
            } else if !child.is_named() {
                ctx.unsupported("modifier", child);
                attrs.push(Attribute::OtherAttribute(
                    OtherAttributeOp::Todo(ctx.text(child).to_string()),
                    vec![Any::Tk(ctx.tok(child))],
                ));
            }
        }
        Ok(attrs)
    }

    /// `@Name` or `@Name(args)`.
    pub(super) fn lower_annotation(&self, node: Node) -> Result<Attribute> {
        let ctx = &self.ctx;
        let at = ctx.token_of(node, "@");
        let name = self.scoped_name(ctx.required(node, "name")?)?;
        let args = match node.child_by_field_name("arguments") {
            Some(list) => {
                let mut args = Vec::new();
                for arg in named_children(list) {
                    if arg.kind() == "element_value_pair" {
                        let key = ctx.ident(ctx.required(arg, "key")?);
                        let value = self.lower_element_value(ctx.required(arg, "value")?)?;
                        args.push(Argument::ArgKwd(key, value));
                    } else {
                        args.push(Argument::Arg(self.lower_element_value(arg)?));
                    }
                }
                Bracket::new(ctx.token_of(list, "("), args, ctx.token_of(list, ")"))
            }
            None => Arguments::fake(Vec::new()),
        };
        Ok(Attribute::NamedAttr(at, name, args))
    }

    fn lower_element_value(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "element_value_array_initializer" => {
                let items = named_children(node)
                    .into_iter()
                    .map(|item| self.lower_element_value(item))
                    .collect::<Result<Vec<_>>>()?;
                Expr::Container(
                    ContainerOperator::Array,
                    Bracket::new(ctx.token_of(node, "{"), items, ctx.token_of(node, "}")),
                )
            }
            "annotation" | "marker_annotation" => Expr::todo(
                "annotation",
                vec![Any::At(self.lower_annotation(node)?)],
            ),
            _ => self.lower_expr(node)?,
        })
    }

    pub(super) fn lower_class_declaration(&self, node: Node) -> Result<Definition> {
        let ctx = &self.ctx;
        let name = ctx.ident(ctx.required(node, "name")?);
        let attrs = self.modifiers(node)?;
        let tparams = self.lower_type_parameters(node.child_by_field_name("type_parameters"))?;
        let (kind, kind_tok) = match node.kind() {
            "interface_declaration" => (ClassKind::Interface, ctx.token_of(node, "interface")),
            "enum_declaration" => (ClassKind::EnumClass, ctx.token_of(node, "enum")),
            "record_declaration" => (ClassKind::RecordClass, ctx.token_of(node, "record")),
            "annotation_type_declaration" => {
                (ClassKind::AtInterface, ctx.token_of(node, "@interface"))
            }
            _ => (ClassKind::Class, ctx.token_of(node, "class")),
        };

        let mut extends = Vec::new();
        if let Some(sup) = node.child_by_field_name("superclass") {
            for ty in named_children(sup) {
                extends.push(self.lower_type(ty)?);
            }
        }
        if let Some(ext) = find_kind(node, "extends_interfaces") {
            extends.extend(self.type_list(ext)?);
        }
        let implements = match node.child_by_field_name("interfaces") {
            Some(interfaces) => self.type_list(interfaces)?,
            None => Vec::new(),
        };
        let params = match node.child_by_field_name("parameters") {
            Some(params) => self.lower_params(params)?.value,
            None => Vec::new(),
        };
        let body_node = ctx.required(node, "body")?;
        let body = self.lower_class_body(body_node)?;

        let def = ClassDefinition {
            kind: Wrap::new(kind, kind_tok),
            extends,
            implements,
            mixins: Vec::new(),
            params,
            body,
        };
        Ok(Definition::new(
            Entity::basic(name).with_attrs(attrs).with_tparams(tparams),
            DefinitionKind::ClassDef(def),
        ))
    }

    /// Types of a `type_list`, possibly behind an `implements`/`extends` wrapper.
    fn type_list(&self, node: Node) -> Result<Vec<Type>> {
        let list = if node.kind() == "type_list" {
            node
        } else {
            find_kind(node, "type_list").unwrap_or(node)
        };
        named_children(list)
            .into_iter()
            .map(|ty| self.lower_type(ty))
            .collect()
    }

    pub(super) fn lower_class_body(&self, node: Node) -> Result<Bracket<Vec<Field>>> {
        let ctx = &self.ctx;
        let mut fields = Vec::new();
        for member in named_children(node) {
            match member.kind() {
                "enum_constant" => fields.push(Field::FieldStmt(Stmt::def(
                    self.lower_enum_constant(member)?,
                ))),
                "enum_body_declarations" => {
                    for decl in named_children(member) {
                        self.lower_member_into(decl, &mut fields)?;
                    }
                }
                _ => self.lower_member_into(member, &mut fields)?,
            }
        }
        Ok(Bracket::new(
            ctx.token_of(node, "{"),
            fields,
            ctx.token_of(node, "}"),
        ))
    }

    fn lower_member_into(&self, node: Node, out: &mut Vec<Field>) -> Result<()> {
        let ctx = &self.ctx;
        match node.kind() {
            "static_initializer" => {
                let block = self.lower_stmt(ctx.first_named(node)?)?;
                out.push(Field::FieldStmt(Stmt::other_with_stmt(
                    OtherStmtWithStmtOp::StaticInit,
                    None,
                    block,
                )));
            }
            "block" => out.push(Field::FieldStmt(self.lower_stmt(node)?)),
            _ => {
                for stmt in self.lower_declaration(node)? {
                    out.push(Field::FieldStmt(stmt));
                }
            }
        }
        Ok(())
    }

    fn lower_enum_constant(&self, node: Node) -> Result<Definition> {
        let ctx = &self.ctx;
        let name = ctx.ident(ctx.required(node, "name")?);
        let args = match node.child_by_field_name("arguments") {
            Some(args) => Some(self.lower_arguments(args)?),
            None => None,
        };
        let body = match node.child_by_field_name("body") {
            Some(body) => Some(self.lower_class_body(body)?),
            None => None,
        };
        Ok(Definition::new(
            Entity::basic(name).with_attrs(self.modifiers(node)?),
            DefinitionKind::EnumEntryDef(EnumEntryDefinition { args, body }),
        ))
    }

    /// Fields, interface constants and local variables: one definition per
    /// declarator, array dimensions after the name folded into the type.
    pub(super) fn lower_variables(&self, node: Node) -> Result<Vec<Stmt>> {
        Ok(self
            .lower_declarators(node)?
            .into_iter()
            .map(|(entity, var)| Stmt::def(Definition::new(entity, DefinitionKind::VarDef(var))))
            .collect())
    }

    pub(super) fn lower_declarators(
        &self,
        node: Node,
    ) -> Result<Vec<(Entity, VariableDefinition)>> {
        let ctx = &self.ctx;
        let attrs = self.modifiers(node)?;
        let ty_node = ctx.required(node, "type")?;
        let (base, attrs) = if ctx.text(ty_node) == "var" {
            // local type inference
            let mut attrs = attrs;
            attrs.push(Attribute::keyword(Keyword::Var, ctx.tok(ty_node)));
            (None, attrs)
        } else {
            (Some(self.lower_type(ty_node)?), attrs)
        };
        let mut out = Vec::new();
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        for declarator in declarators {
            let name = ctx.ident(ctx.required(declarator, "name")?);
            let ty = base
                .clone()
                .map(|ty| self.wrap_dims(ty, declarator.child_by_field_name("dimensions")));
            let init = match declarator.child_by_field_name("value") {
                Some(value) => Some(self.lower_expr(value)?),
                None => None,
            };
            out.push((
                Entity::basic(name).with_attrs(attrs.clone()),
                VariableDefinition { init, ty },
            ));
        }
        Ok(out)
    }

    /// Methods and constructors. Methods without a body become signatures.
    fn lower_method(&self, node: Node) -> Result<Definition> {
        let ctx = &self.ctx;
        let name = ctx.ident(ctx.required(node, "name")?);
        let mut attrs = self.modifiers(node)?;
        let tparams = self.lower_type_parameters(node.child_by_field_name("type_parameters"))?;
        let is_ctor = node.kind() != "method_declaration";
        if is_ctor {
            attrs.push(Attribute::keyword(Keyword::Ctor, Token::fake("constructor")));
        }
        if let Some(throws) = find_kind(node, "throws") {
            let types = named_children(throws)
                .into_iter()
                .map(|ty| self.lower_type(ty).map(Any::T))
                .collect::<Result<Vec<_>>>()?;
            attrs.push(Attribute::OtherAttribute(
                OtherAttributeOp::Todo("throws".into()),
                std::iter::once(Any::Tk(ctx.token_of(throws, "throws")))
                    .chain(types)
                    .collect(),
            ));
        }
        let params = match node.child_by_field_name("parameters") {
            Some(params) => self.lower_params(params)?,
            None => Bracket::fake(Vec::new()),
        };
        let ret_type = match node.child_by_field_name("type") {
            Some(ty) => Some(self.wrap_dims(
                self.lower_type(ty)?,
                node.child_by_field_name("dimensions"),
            )),
            None => None,
        };
        let entity = Entity::basic(name).with_attrs(attrs).with_tparams(tparams);

        let Some(body) = node.child_by_field_name("body") else {
            let ret = ret_type.unwrap_or_else(|| Type::builtin("void", Token::fake("void")));
            return Ok(Definition::new(
                entity,
                DefinitionKind::Signature(Type::TyFun(params.value, Box::new(ret))),
            ));
        };
        let def = FunctionDefinition {
            kind: Wrap::new(FunctionKind::Method, Token::fake("method")),
            params,
            ret_type,
            body: Box::new(self.lower_block(body)?),
        };
        Ok(Definition::new(entity, DefinitionKind::FuncDef(def)))
    }

    pub(super) fn lower_params(&self, node: Node) -> Result<Bracket<Vec<Parameter>>> {
        let ctx = &self.ctx;
        let mut params = Vec::new();
        for param in named_children(node) {
            params.push(self.lower_param(param)?);
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
            "formal_parameter" => {
                let ty = self.lower_type(ctx.required(node, "type")?)?;
                let ty = self.wrap_dims(ty, node.child_by_field_name("dimensions"));
                let name = ctx.ident(ctx.required(node, "name")?);
                Parameter::Classic(
                    ParameterClassic::named(name)
                        .with_type(Some(ty))
                        .with_attrs(self.modifiers(node)?),
                )
            }
            "spread_parameter" => {
                let ty_node = named_children(node)
                    .into_iter()
                    .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))
                    .ok_or_else(|| ctx.malformed(node, "varargs parameter without a type"))?;
                let declarator = find_kind(node, "variable_declarator")
                    .ok_or_else(|| ctx.malformed(node, "varargs parameter without a name"))?;
                let name = ctx.ident(ctx.required(declarator, "name")?);
                Parameter::Rest(
                    ctx.token_of(node, "..."),
                    ParameterClassic::named(name)
                        .with_type(Some(self.lower_type(ty_node)?))
                        .with_attrs(self.modifiers(node)?),
                )
            }
            "receiver_parameter" => {
                let mut payload = Vec::new();
                for child in named_children(node) {
                    if is_annotation(child) {
                        payload.push(Any::At(self.lower_annotation(child)?));
                    } else if child.kind() == "this" {
                        payload.push(Any::Tk(ctx.tok(child)));
                    } else if child.kind() != "identifier" {
                        payload.push(Any::T(self.lower_type(child)?));
                    }
                }
                Parameter::OtherParam(OtherParamOp::Receiver, payload)
            }
            "identifier" => Parameter::Classic(ParameterClassic::named(ctx.ident(node))),
            kind => {
                ctx.unsupported("parameter", node);
                Parameter::OtherParam(
                    OtherParamOp::Todo(kind.to_string()),
                    self.lower_children_any(node)?,
                )
            }
        })
    }
}
