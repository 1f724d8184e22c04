use gast_core::ast::{
    parse_float_literal, parse_int_literal, Any, Argument, Arguments, Bracket, ConcatKind,
    ContainerOperator, Definition, DefinitionKind, Entity, Expr, Field, FieldName, FunctionKind,
    Ident, IncrDecr, Literal, Name, Operator, OtherExprOp, PrefixPostfix, SpecialKind, Stmt, Token,
    VariableDefinition, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{has_anon, named_children, unquote};
use tree_sitter::Node;

use super::Normalizer;

impl<'s> Normalizer<'s> {
    pub(super) fn lower_expr(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        // arms stay small: this frame is live once per nesting level
        Ok(match node.kind() {
            "identifier"
            | "property_identifier"
            | "private_property_identifier"
            | "shorthand_property_identifier"
            | "statement_identifier" => Expr::id(ctx.ident(node)),
            "this" => Expr::special(SpecialKind::This, ctx.tok(node)),
            "super" => Expr::special(SpecialKind::Super, ctx.tok(node)),
            "true" => Expr::L(Literal::Bool(Wrap::new(true, ctx.tok(node)))),
            "false" => Expr::L(Literal::Bool(Wrap::new(false, ctx.tok(node)))),
            "null" => Expr::L(Literal::Null(ctx.tok(node))),
            "undefined" => Expr::L(Literal::Undefined(ctx.tok(node))),
            "number" => self.lower_number(node),
            "string" => Expr::string(unquote(ctx.text(node)), ctx.tok(node)),
            "template_string" => self.lower_template(node)?,
            "regex" => Expr::L(Literal::Regexp(Wrap::new(
                ctx.text(node).to_string(),
                ctx.tok(node),
            ))),
            "parenthesized_expression" => self.lower_expr(ctx.first_named(node)?)?,
            "array" => self.lower_array(node)?,
            "object" => self.lower_object(node)?,
            "function_expression" | "function" | "generator_function" => {
                Expr::Lambda(Box::new(self.lower_function(node, FunctionKind::Function)?))
            }
            "arrow_function" => {
                Expr::Lambda(Box::new(self.lower_function(node, FunctionKind::Arrow)?))
            }
            "class" => Expr::AnonClass(Box::new(self.lower_class(node)?)),
            "call_expression" => self.lower_call(node)?,
            "new_expression" => self.lower_new(node)?,
            "member_expression" => self.lower_member(node)?,
            "subscript_expression" => self.lower_subscript(node)?,
            "assignment_expression" => self.lower_assignment(node)?,
            "augmented_assignment_expression" => self.lower_augmented_assignment(node)?,
            "binary_expression" => self.lower_binary(node)?,
            "unary_expression" => self.lower_unary(node)?,
            "update_expression" => self.lower_update(node)?,
            "ternary_expression" => self.lower_ternary(node)?,
            "sequence_expression" => {
                let mut items = Vec::new();
                self.flatten_sequence(node, &mut items)?;
                Expr::Seq(items)
            }
            "await_expression" => self.lower_await(node)?,
            "yield_expression" => self.lower_yield(node)?,
            "spread_element" => self.lower_spread(node)?,
            "meta_property" => Expr::id(Wrap::new(ctx.text(node).to_string(), ctx.tok(node))),
            "ERROR" => Expr::todo("ERROR", self.lower_children_any(node)?),
            kind => {
                ctx.unsupported("expression", node);
                Expr::todo(kind, self.lower_children_any(node)?)
            }
        })
    }

    fn lower_number(&self, node: Node) -> Expr {
        let ctx = &self.ctx;
        let text = ctx.text(node);
        let lower = text.to_ascii_lowercase();
        let radix_prefixed = ["0x", "0b", "0o"].iter().any(|p| lower.starts_with(p));
        if !radix_prefixed && (lower.contains('.') || lower.contains('e')) {
            Expr::L(Literal::Float(Wrap::new(parse_float_literal(text), ctx.tok(node))))
        } else {
            Expr::int(parse_int_literal(text), ctx.tok(node))
        }
    }

    /// `` `a${b}c` `` becomes a call to the interpolation builtin with the
    /// fragments and substitutions in order; a template without
    /// substitutions is a plain string.
    fn lower_template(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let parts = named_children(node);
        if parts.iter().all(|p| p.kind() != "template_substitution") {
            return Ok(Expr::string(unquote(ctx.text(node)), ctx.tok(node)));
        }
        let mut args = Vec::new();
        for part in parts {
            let arg = match part.kind() {
                "template_substitution" => {
                    let inner = self.lower_expr(ctx.first_named(part)?)?;
                    Expr::special_call(
                        SpecialKind::InterpolatedElement,
                        ctx.token_of(part, "${"),
                        vec![Argument::Arg(inner)],
                    )
                }
                _ => Expr::string(ctx.text(part), ctx.tok(part)),
            };
            args.push(Argument::Arg(arg));
        }
        let backtick = ctx.token_of(node, "`");
        Ok(Expr::special_call(
            SpecialKind::ConcatString(ConcatKind::Interpolated),
            backtick,
            args,
        ))
    }

    /// Object literal: every property is a field definition.
    fn lower_object(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let mut fields = Vec::new();
        for prop in named_children(node) {
            let field = match prop.kind() {
                "pair" => {
                    let key = ctx.required(prop, "key")?;
                    let value = self.lower_expr(ctx.required(prop, "value")?)?;
                    if key.kind() == "computed_property_name" {
                        let key = self.lower_expr(ctx.first_named(key)?)?;
                        Field::FieldStmt(Stmt::expr(
                            Expr::todo("computed_property_name", vec![Any::E(key), Any::E(value)]),
                            Token::fake(","),
                        ))
                    } else {
                        field_def(self.property_name(key), Some(value))
                    }
                }
                "shorthand_property_identifier" => {
                    field_def(ctx.ident(prop), Some(Expr::id(ctx.ident(prop))))
                }
                "method_definition" => Field::FieldStmt(Stmt::def(self.lower_method(prop)?)),
                "spread_element" => Field::FieldSpread(
                    ctx.token_of(prop, "..."),
                    self.lower_expr(ctx.first_named(prop)?)?,
                ),
                kind => {
                    ctx.unsupported("object property", prop);
                    Field::FieldStmt(Stmt::todo_any(kind, self.lower_children_any(prop)?))
                }
            };
            fields.push(field);
        }
        Ok(Expr::Record(Bracket::new(
            ctx.token_of(node, "{"),
            fields,
            ctx.token_of(node, "}"),
        )))
    }

    fn lower_arguments(&self, node: Node) -> Result<Arguments> {
        let ctx = &self.ctx;
        if node.kind() == "template_string" {
            // tagged template
            return Ok(Bracket::fake(vec![Argument::Arg(self.lower_template(node)?)]));
        }
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

    fn lower_call(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let callee = self.lower_expr(ctx.required(node, "function")?)?;
        let args = self.lower_arguments(ctx.required(node, "arguments")?)?;
        Ok(Expr::call(callee, args))
    }

    /// `new C(args)`: the constructor travels as the first argument.
    fn lower_new(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let ctor = self.lower_expr(ctx.required(node, "constructor")?)?;
        let args = match node.child_by_field_name("arguments") {
            Some(args) => self.lower_arguments(args)?,
            None => Bracket::fake(Vec::new()),
        };
        let args = args.map(|rest| {
            let mut all = vec![Argument::Arg(ctor)];
            all.extend(rest);
            all
        });
        Ok(Expr::call(
            Expr::special(SpecialKind::New, ctx.token_of(node, "new")),
            args,
        ))
    }

    fn lower_array(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let items = named_children(node)
            .into_iter()
            .map(|item| self.lower_expr(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Expr::Container(
            ContainerOperator::Array,
            Bracket::new(ctx.token_of(node, "["), items, ctx.token_of(node, "]")),
        ))
    }

    fn lower_member(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let object = self.lower_expr(ctx.required(node, "object")?)?;
        let dot = match node.child_by_field_name("optional_chain") {
            Some(chain) => ctx.tok(chain),
            None => ctx.token_of(node, "."),
        };
        let property = ctx.ident(ctx.required(node, "property")?);
        Ok(Expr::DotAccess(Box::new(object), dot, FieldName::EN(Name::id(property))))
    }

    fn lower_subscript(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let object = self.lower_expr(ctx.required(node, "object")?)?;
        let index = self.lower_expr(ctx.required(node, "index")?)?;
        Ok(Expr::ArrayAccess(
            Box::new(object),
            Bracket::new(
                ctx.token_of(node, "["),
                Box::new(index),
                ctx.token_of(node, "]"),
            ),
        ))
    }

    fn lower_assignment(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let left = ctx.required(node, "left")?;
        let right = self.lower_expr(ctx.required(node, "right")?)?;
        Ok(match left.kind() {
            "object_pattern" | "array_pattern" => Expr::LetPattern(
                Box::new(self.lower_pattern(left)?),
                Box::new(right),
            ),
            _ => Expr::assign(self.lower_expr(left)?, ctx.token_of(node, "="), right),
        })
    }

    fn lower_augmented_assignment(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let left = self.lower_expr(ctx.required(node, "left")?)?;
        let op_node = ctx.required(node, "operator")?;
        let right = self.lower_expr(ctx.required(node, "right")?)?;
        Ok(match Operator::from_assign_op(ctx.text(op_node)) {
            Some(op) => Expr::AssignOp(
                Box::new(left),
                Wrap::new(op, ctx.tok(op_node)),
                Box::new(right),
            ),
            None => {
                ctx.unsupported("assignment operator", op_node);
                Expr::todo(
                    ctx.text(op_node),
                    vec![Any::E(left), Any::Tk(ctx.tok(op_node)), Any::E(right)],
                )
            }
        })
    }

    /// Operator chains such as `a + b + c` nest to the left; the left spine is
    /// unrolled so the recursion depth does not grow with the chain length.
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
            acc = self.binary_op(acc, op_node, right);
        }
        Ok(acc)
    }

    fn binary_op(&self, left: Expr, op_node: Node, right: Expr) -> Expr {
        let ctx = &self.ctx;
        let text = ctx.text(op_node);
        if text == "instanceof" {
            return Expr::special_call(
                SpecialKind::Instanceof,
                ctx.tok(op_node),
                vec![Argument::Arg(left), Argument::Arg(right)],
            );
        }
        match Operator::from_c_like(text) {
            Some(op) => Expr::op_call(op, ctx.tok(op_node), vec![left, right]),
            None => {
                ctx.unsupported("binary operator", op_node);
                Expr::todo(
                    text,
                    vec![Any::E(left), Any::Tk(ctx.tok(op_node)), Any::E(right)],
                )
            }
        }
    }

    fn lower_update(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let op_node = ctx.required(node, "operator")?;
        let arg_node = ctx.required(node, "argument")?;
        let which = if ctx.text(op_node) == "++" {
            IncrDecr::Incr
        } else {
            IncrDecr::Decr
        };
        let fix = if op_node.start_byte() < arg_node.start_byte() {
            PrefixPostfix::Prefix
        } else {
            PrefixPostfix::Postfix
        };
        Ok(Expr::special_call(
            SpecialKind::IncrDecr(which, fix),
            ctx.tok(op_node),
            vec![Argument::Arg(self.lower_expr(arg_node)?)],
        ))
    }

    fn lower_ternary(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::Conditional(
            Box::new(self.lower_expr(ctx.required(node, "condition")?)?),
            Box::new(self.lower_expr(ctx.required(node, "consequence")?)?),
            Box::new(self.lower_expr(ctx.required(node, "alternative")?)?),
        ))
    }

    fn lower_await(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::Await(
            ctx.token_of(node, "await"),
            Box::new(self.lower_expr(ctx.first_named(node)?)?),
        ))
    }

    fn lower_yield(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let value = match named_children(node).into_iter().next() {
            Some(value) => Some(Box::new(self.lower_expr(value)?)),
            None => None,
        };
        Ok(Expr::Yield(ctx.token_of(node, "yield"), value, has_anon(node, "*")))
    }

    fn lower_spread(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::special_call(
            SpecialKind::Spread,
            ctx.token_of(node, "..."),
            vec![Argument::Arg(self.lower_expr(ctx.first_named(node)?)?)],
        ))
    }

    fn lower_unary(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let op_node = ctx.required(node, "operator")?;
        let tok = ctx.tok(op_node);
        let arg = self.lower_expr(ctx.required(node, "argument")?)?;
        Ok(match ctx.text(op_node) {
            "typeof" => Expr::special_call(SpecialKind::Typeof, tok, vec![Argument::Arg(arg)]),
            "void" => Expr::other(OtherExprOp::Void, vec![Any::Tk(tok), Any::E(arg)]),
            "delete" => Expr::other(OtherExprOp::Delete, vec![Any::Tk(tok), Any::E(arg)]),
            text => match Operator::from_c_like(text) {
                Some(op) => Expr::op_call(op, tok, vec![arg]),
                None => {
                    ctx.unsupported("unary operator", op_node);
                    Expr::todo(text, vec![Any::Tk(tok), Any::E(arg)])
                }
            },
        })
    }

    fn flatten_sequence(&self, node: Node, out: &mut Vec<Expr>) -> Result<()> {
        for child in named_children(node) {
            if child.kind() == "sequence_expression" {
                self.flatten_sequence(child, out)?;
            } else {
                out.push(self.lower_expr(child)?);
            }
        }
        Ok(())
    }
}

fn field_def(name: Ident, init: Option<Expr>) -> Field {
    Field::FieldStmt(Stmt::def(Definition::new(
        Entity::basic(name),
        DefinitionKind::VarDef(VariableDefinition { init, ty: None }),
    )))
}
