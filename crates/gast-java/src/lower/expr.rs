use gast_core::ast::{
    name_of_ids, parse_float_literal, parse_int_literal, Any, Argument, Arguments, Bracket,
    ClassDefinition, ClassKind, ContainerOperator, Expr, FieldName, FunctionDefinition,
    FunctionKind, IdInfoCell, Ident, IncrDecr, Literal, Name, NameInfo, Operator, OtherArgOp,
    OtherExprOp, Parameter, ParameterClassic, Pattern, PrefixPostfix, SpecialKind, Stmt, Token,
    Type, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{children, field_children, find_anon, find_kind, named_children, unquote};
use tree_sitter::Node;

use super::types::is_annotation;
use super::Normalizer;

impl<'s> Normalizer<'s> {
    pub(super) fn lower_expr(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        // arms stay small: this frame is live once per nesting level
        Ok(match node.kind() {
            "identifier" => Expr::id(ctx.ident(node)),
            "this" => Expr::special(SpecialKind::This, ctx.tok(node)),
            "super" => Expr::special(SpecialKind::Super, ctx.tok(node)),
            "true" => Expr::L(Literal::Bool(Wrap::new(true, ctx.tok(node)))),
            "false" => Expr::L(Literal::Bool(Wrap::new(false, ctx.tok(node)))),
            "null_literal" => Expr::L(Literal::Null(ctx.tok(node))),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => Expr::int(parse_int_literal(ctx.text(node)), ctx.tok(node)),
            "decimal_floating_point_literal" | "hex_floating_point_literal" => Expr::L(
                Literal::Float(Wrap::new(parse_float_literal(ctx.text(node)), ctx.tok(node))),
            ),
            "character_literal" => Expr::L(Literal::Char(Wrap::new(
                unquote(ctx.text(node)).to_string(),
                ctx.tok(node),
            ))),
            "string_literal" | "text_block" => {
                Expr::string(unquote(ctx.text(node)), ctx.tok(node))
            }
            "parenthesized_expression" => self.lower_expr(ctx.first_named(node)?)?,
            "field_access" => self.lower_field_access(node)?,
            "array_access" => self.lower_array_access(node)?,
            "method_invocation" => self.lower_method_invocation(node)?,
            "object_creation_expression" => self.lower_new(node)?,
            "array_creation_expression" => self.lower_array_creation(node)?,
            "array_initializer" => self.lower_array_initializer(node)?,
            "assignment_expression" => self.lower_assignment(node)?,
            "binary_expression" => self.lower_binary(node)?,
            "unary_expression" => self.lower_unary(node)?,
            "update_expression" => self.lower_update(node)?,
            "ternary_expression" => self.lower_ternary(node)?,
            "cast_expression" => self.lower_cast(node)?,
            "instanceof_expression" => self.lower_instanceof(node)?,
            "lambda_expression" => Expr::Lambda(Box::new(self.lower_lambda(node)?)),
            "method_reference" => self.lower_method_reference(node)?,
            "class_literal" => self.lower_class_literal(node)?,
            "switch_expression" => {
                Expr::other(OtherExprOp::StmtExpr, vec![Any::S(self.lower_switch(node)?)])
            }
            "ERROR" => Expr::todo("ERROR", self.lower_children_any(node)?),
            kind => {
                ctx.unsupported("expression", node);
                Expr::todo(kind, self.lower_children_any(node)?)
            }
        })
    }

    fn lower_array_access(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::ArrayAccess(
            Box::new(self.lower_expr(ctx.required(node, "array")?)?),
            Bracket::new(
                ctx.token_of(node, "["),
                Box::new(self.lower_expr(ctx.required(node, "index")?)?),
                ctx.token_of(node, "]"),
            ),
        ))
    }

    fn lower_assignment(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let left = self.lower_expr(ctx.required(node, "left")?)?;
        let op_node = ctx.required(node, "operator")?;
        let right = self.lower_expr(ctx.required(node, "right")?)?;
        Ok(match ctx.text(op_node) {
            "=" => Expr::assign(left, ctx.tok(op_node), right),
            text => match Operator::from_assign_op(text) {
                Some(op) => Expr::AssignOp(
                    Box::new(left),
                    Wrap::new(op, ctx.tok(op_node)),
                    Box::new(right),
                ),
                None => {
                    ctx.unsupported("assignment operator", op_node);
                    Expr::todo(
                        text,
                        vec![Any::E(left), Any::Tk(ctx.tok(op_node)), Any::E(right)],
                    )
                }
            },
        })
    }

    /// Left-nested operator chains are unrolled along their left spine, so a
    /// long `a + b + ... + z` does not recurse once per operand.
    fn lower_binary(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let mut spine = vec![node];
        let mut leftmost = ctx.required(node, "left")?;
        while leftmost.kind() == "binary_expression" {
            spine.push(leftmost);
            leftmost = ctx.required(leftmost, "left")?;
        }
        let mut acc = self.lower_expr(leftmost)?;
        for parent in spine.into_iter().rev() {
            let op_node = ctx.required(parent, "operator")?;
            let right = self.lower_expr(ctx.required(parent, "right")?)?;
            acc = match Operator::from_c_like(ctx.text(op_node)) {
                Some(op) => Expr::op_call(op, ctx.tok(op_node), vec![acc, right]),
                None => {
                    ctx.unsupported("binary operator", op_node);
                    Expr::todo(
                        ctx.text(op_node),
                        vec![Any::E(acc), Any::Tk(ctx.tok(op_node)), Any::E(right)],
                    )
                }
            };
        }
        Ok(acc)
    }

    fn lower_unary(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let op_node = ctx.required(node, "operator")?;
        let operand = self.lower_expr(ctx.required(node, "operand")?)?;
        Ok(match Operator::from_c_like(ctx.text(op_node)) {
            Some(op) => Expr::op_call(op, ctx.tok(op_node), vec![operand]),
            None => {
                ctx.unsupported("unary operator", op_node);
                Expr::todo(ctx.text(op_node), vec![Any::Tk(ctx.tok(op_node)), Any::E(operand)])
            }
        })
    }

    fn lower_ternary(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::Conditional(
            Box::new(self.lower_expr(ctx.required(node, "condition")?)?),
            Box::new(self.lower_expr(ctx.required(node, "consequence")?)?),
            Box::new(self.lower_expr(ctx.required(node, "alternative")?)?),
        ))
    }

    fn lower_cast(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let mut types = field_children(node, "type").into_iter();
        let first = types
            .next()
            .ok_or_else(|| ctx.malformed(node, "cast without a type"))?;
        let mut ty = self.lower_type(first)?;
        for extra in types {
            // intersection cast `(A & B) e`
            ty = Type::todo(
                "intersection_type",
                vec![Any::T(ty), Any::T(self.lower_type(extra)?)],
            );
        }
        Ok(Expr::Cast(
            Box::new(ty),
            Box::new(self.lower_expr(ctx.required(node, "value")?)?),
        ))
    }

    /// `String.class`
    fn lower_class_literal(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let ty = self.lower_type(ctx.first_named(node)?)?;
        Ok(Expr::other(
            OtherExprOp::ClassLiteral,
            vec![Any::T(ty), Any::Tk(ctx.token_of(node, "class"))],
        ))
    }

    /// Segments of `a.b.c` when every part is a plain identifier.
    fn name_chain(&self, node: Node) -> Option<Vec<Ident>> {
        let ctx = &self.ctx;
        match node.kind() {
            "identifier" => Some(vec![ctx.ident(node)]),
            "field_access" => {
                let field = node.child_by_field_name("field")?;
                if field.kind() != "identifier" || find_kind(node, "super").is_some() {
                    return None;
                }
                let mut ids = self.name_chain(node.child_by_field_name("object")?)?;
                ids.push(ctx.ident(field));
                Some(ids)
            }
            _ => None,
        }
    }

    /// Receiver of a member access. A chain of identifiers stays a dotted
    /// name: without symbol tables `a.b` may be a package, a class or a field.
    fn lower_receiver(&self, node: Node) -> Result<Expr> {
        match self.name_chain(node) {
            Some(ids) => Ok(Expr::N(name_of_ids(self.ctx.language, ids)?)),
            None => self.lower_expr(node),
        }
    }

    fn lower_field_access(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let object = self.lower_receiver(ctx.required(node, "object")?)?;
        let object = match find_kind(node, "super") {
            // `Outer.super.field`
            Some(sup) if node.child_by_field_name("object") != Some(sup) => Expr::DotAccess(
                Box::new(object),
                Token::fake("."),
                FieldName::EDynamic(Box::new(Expr::special(SpecialKind::Super, ctx.tok(sup)))),
            ),
            _ => object,
        };
        let field = ctx.ident(ctx.required(node, "field")?);
        Ok(Expr::DotAccess(
            Box::new(object),
            last_dot(ctx, node),
            FieldName::EN(Name::id(field)),
        ))
    }

    fn lower_method_invocation(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let name = ctx.ident(ctx.required(node, "name")?);
        let name = match node.child_by_field_name("type_arguments") {
            Some(targs) => Name::qualified(
                name,
                NameInfo {
                    qualifier: None,
                    typeargs: Some(self.lower_type_arguments(targs)?),
                },
            ),
            None => Name::id(name),
        };
        let callee = match node.child_by_field_name("object") {
            Some(object) => Expr::DotAccess(
                Box::new(self.lower_receiver(object)?),
                last_dot(ctx, node),
                FieldName::EN(name),
            ),
            None => Expr::N(name),
        };
        let args = self.lower_arguments(ctx.required(node, "arguments")?)?;
        Ok(Expr::call(callee, args))
    }

    pub(super) fn lower_arguments(&self, node: Node) -> Result<Arguments> {
        let ctx = &self.ctx;
        let args = named_children(node)
            .into_iter()
            .map(|arg| self.lower_expr(arg).map(Argument::Arg))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bracket::new(
            ctx.token_of(node, "("),
            args,
            ctx.token_of(node, ")"),
        ))
    }

    /// `new T(args)` and `new T(args) { body }`. The created type is the first
    /// argument; an anonymous body becomes an anonymous class extending it.
    fn lower_new(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let ty = self.lower_type(ctx.required(node, "type")?)?;
        let args = self.lower_arguments(ctx.required(node, "arguments")?)?;
        let anon = match find_kind(node, "class_body") {
            Some(body) => Some(Expr::AnonClass(Box::new(ClassDefinition {
                kind: Wrap::new(ClassKind::Class, Token::fake("class")),
                extends: vec![ty.clone()],
                implements: Vec::new(),
                mixins: Vec::new(),
                params: Vec::new(),
                body: self.lower_class_body(body)?,
            }))),
            None => None,
        };
        let args = args.map(|rest| {
            let mut all = vec![Argument::ArgType(ty)];
            all.extend(rest);
            all.extend(anon.map(Argument::Arg));
            all
        });
        let new = Expr::call(
            Expr::special(SpecialKind::New, ctx.token_of(node, "new")),
            args,
        );
        // `outer.new Inner()`
        match children(node).first() {
            Some(outer) if outer.is_named() => Ok(Expr::other(
                OtherExprOp::QualifiedNew,
                vec![Any::E(self.lower_expr(*outer)?), Any::E(new)],
            )),
            _ => Ok(new),
        }
    }

    /// `new int[n][]`: one array layer per dimension expression, then one per
    /// trailing `[]`, the first written dimension outermost.
    fn lower_array_creation(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let mut ty = self.lower_type(ctx.required(node, "type")?)?;
        let dims = field_children(node, "dimensions");
        if let Some(trailing) = dims.iter().find(|d| d.kind() == "dimensions") {
            ty = self.wrap_dims(ty, Some(*trailing));
        }
        for dim in dims.iter().rev().filter(|d| d.kind() == "dimensions_expr") {
            let size = named_children(*dim)
                .into_iter()
                .filter(|c| !is_annotation(*c))
                .last()
                .ok_or_else(|| ctx.malformed(*dim, "empty dimension"))?;
            let size = self.lower_expr(size)?;
            ty = Type::array(
                ctx.token_of(*dim, "["),
                Some(Box::new(size)),
                ctx.token_of(*dim, "]"),
                ty,
            );
        }
        let mut args = vec![Argument::ArgType(ty)];
        if let Some(init) = node.child_by_field_name("value") {
            args.push(Argument::Arg(self.lower_array_initializer(init)?));
        }
        Ok(Expr::special_call(
            SpecialKind::New,
            ctx.token_of(node, "new"),
            args,
        ))
    }

    fn lower_array_initializer(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let items = named_children(node)
            .into_iter()
            .map(|item| self.lower_expr(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Expr::Container(
            ContainerOperator::Array,
            Bracket::new(ctx.token_of(node, "{"), items, ctx.token_of(node, "}")),
        ))
    }

    fn lower_update(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let parts = children(node);
        let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
            return Err(ctx.malformed(node, "empty update expression"));
        };
        let (op_node, operand, fix) = if first.is_named() {
            (*last, *first, PrefixPostfix::Postfix)
        } else {
            (*first, *last, PrefixPostfix::Prefix)
        };
        let which = if ctx.text(op_node) == "++" {
            IncrDecr::Incr
        } else {
            IncrDecr::Decr
        };
        Ok(Expr::special_call(
            SpecialKind::IncrDecr(which, fix),
            ctx.tok(op_node),
            vec![Argument::Arg(self.lower_expr(operand)?)],
        ))
    }

    /// `x instanceof T`, `x instanceof T t`, `x instanceof Point(int a, int b)`.
    /// A binding form passes its pattern as the second argument.
    fn lower_instanceof(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let left = self.lower_expr(ctx.required(node, "left")?)?;
        let tok = ctx.token_of(node, "instanceof");
        let right = if let Some(pattern) = node.child_by_field_name("pattern") {
            Argument::ArgOther(OtherArgOp::Pattern, vec![Any::P(self.lower_pattern(pattern)?)])
        } else {
            let ty = self.lower_type(ctx.required(node, "right")?)?;
            match node.child_by_field_name("name") {
                Some(name) => Argument::ArgOther(
                    OtherArgOp::Pattern,
                    vec![Any::P(Pattern::PatVar(
                        ty,
                        Some((ctx.ident(name), IdInfoCell::new())),
                    ))],
                ),
                None => Argument::ArgType(ty),
            }
        };
        Ok(Expr::special_call(
            SpecialKind::Instanceof,
            tok,
            vec![Argument::Arg(left), right],
        ))
    }

    fn lower_lambda(&self, node: Node) -> Result<FunctionDefinition> {
        let ctx = &self.ctx;
        let params_node = ctx.required(node, "parameters")?;
        let params = match params_node.kind() {
            "identifier" => Bracket::fake(vec![Parameter::Classic(ParameterClassic::named(
                ctx.ident(params_node),
            ))]),
            "formal_parameters" => self.lower_params(params_node)?,
            _ => Bracket::new(
                ctx.token_of(params_node, "("),
                named_children(params_node)
                    .into_iter()
                    .map(|id| Parameter::Classic(ParameterClassic::named(ctx.ident(id))))
                    .collect(),
                ctx.token_of(params_node, ")"),
            ),
        };
        let body_node = ctx.required(node, "body")?;
        let body = if body_node.kind() == "block" {
            self.lower_block(body_node)?
        } else {
            let e = self.lower_expr(body_node)?;
            Stmt::Return(Token::fake("return"), Some(e), Token::fake(";"))
        };
        Ok(FunctionDefinition {
            kind: Wrap::new(FunctionKind::LambdaKind, ctx.token_of(node, "->")),
            params,
            ret_type: None,
            body: Box::new(body),
        })
    }

    /// `Foo::bar`, `this::bar`, `int[]::new`
    fn lower_method_reference(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let parts = named_children(node);
        let target = parts
            .first()
            .ok_or_else(|| ctx.malformed(node, "method reference without a target"))?;
        let target = match target.kind() {
            "type_identifier" | "scoped_type_identifier" | "generic_type" | "array_type"
            | "integral_type" | "floating_point_type" | "boolean_type" => {
                Any::T(self.lower_type(*target)?)
            }
            _ => Any::E(self.lower_receiver(*target)?),
        };
        let mut payload = vec![target, Any::Tk(ctx.token_of(node, "::"))];
        if let Some(targs) = find_kind(node, "type_arguments") {
            payload.extend(self.lower_type_arguments(targs)?.value.into_iter().map(Any::Ta));
        }
        match find_anon(node, "new") {
            Some(new) => payload.push(Any::Tk(ctx.tok(new))),
            None => {
                let name = parts
                    .iter()
                    .skip(1)
                    .rev()
                    .find(|c| c.kind() == "identifier")
                    .ok_or_else(|| ctx.malformed(node, "method reference without a name"))?;
                payload.push(Any::I(ctx.ident(*name)));
            }
        }
        Ok(Expr::other(OtherExprOp::MethodRef, payload))
    }

    /// `this(args)`, `super(args)`, `outer.super(args)`.
    pub(super) fn lower_ctor_invocation(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let ctor = ctx.required(node, "constructor")?;
        let kind = if ctor.kind() == "this" {
            SpecialKind::This
        } else {
            SpecialKind::Super
        };
        let special = Expr::special(kind, ctx.tok(ctor));
        let callee = match node.child_by_field_name("object") {
            Some(object) => Expr::DotAccess(
                Box::new(self.lower_receiver(object)?),
                ctx.token_of(node, "."),
                FieldName::EDynamic(Box::new(special)),
            ),
            None => special,
        };
        let args = self.lower_arguments(ctx.required(node, "arguments")?)?;
        Ok(Expr::call(callee, args))
    }
}

/// The `.` right before the member name.
fn last_dot(ctx: &gast_core::ts::SourceCtx, node: Node) -> Token {
    children(node)
        .into_iter()
        .filter(|c| !c.is_named() && c.kind() == ".")
        .last()
        .map(|dot| ctx.tok(dot))
        .unwrap_or_else(|| Token::fake("."))
}
