use gast_core::ast::{
    name_of_ids, parse_float_literal, parse_int_literal, Any, Argument, Bracket, ConcatKind,
    ContainerOperator, Expr, FieldName, FunctionDefinition, FunctionKind, Literal, Name, Operator,
    OtherExprOp, Slice, SpecialKind, Stmt, Token, Type, TypeArgument, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{children, field_children, find_anon, named_children, SourceCtx};
use tree_sitter::Node;

use super::Normalizer;

/// Operators spelled the Python way, falling back to the C spelling.
fn operator(text: &str) -> Option<Operator> {
    Some(match text {
        "and" => Operator::And,
        "or" => Operator::Or,
        "not" => Operator::Not,
        "//" => Operator::FloorDiv,
        "@" => Operator::MatMult,
        "is" => Operator::Is,
        "is not" => Operator::NotIs,
        "not in" => Operator::NotIn,
        "<>" => Operator::NotEq,
        _ => return Operator::from_c_like(text),
    })
}

impl<'s> Normalizer<'s> {
    pub(super) fn lower_expr(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        // arms stay small: this frame is live once per nesting level
        Ok(match node.kind() {
            "identifier" | "keyword_identifier" => Expr::id(ctx.ident(node)),
            "true" => Expr::L(Literal::Bool(Wrap::new(true, ctx.tok(node)))),
            "false" => Expr::L(Literal::Bool(Wrap::new(false, ctx.tok(node)))),
            "none" => Expr::L(Literal::Null(ctx.tok(node))),
            "ellipsis" => Expr::Ellipsis(ctx.tok(node)),
            "integer" | "float" => lower_number(ctx, node),
            "string" => self.lower_string(node)?,
            "concatenated_string" => self.lower_concatenated_string(node)?,
            "parenthesized_expression" => self.lower_expr(ctx.first_named(node)?)?,
            "tuple" | "tuple_pattern" => Expr::Tuple(Bracket::new(
                ctx.token_of(node, "("),
                self.lower_exprs(node)?,
                ctx.token_of(node, ")"),
            )),
            "expression_list" | "pattern_list" => {
                Expr::Tuple(Bracket::fake(self.lower_exprs(node)?))
            }
            "list" | "list_pattern" => self.container(node, ContainerOperator::List, "[", "]")?,
            "set" => self.container(node, ContainerOperator::Set, "{", "}")?,
            "dictionary" => self.container(node, ContainerOperator::Dict, "{", "}")?,
            "pair" => self.lower_pair(node)?,
            "list_splat" | "list_splat_pattern" => {
                self.lower_splat(node, SpecialKind::Spread, "*")?
            }
            "dictionary_splat" | "dictionary_splat_pattern" => {
                self.lower_splat(node, SpecialKind::HashSplat, "**")?
            }
            "list_comprehension" => self.lower_comprehension(node, "[", "]")?,
            "set_comprehension" | "dictionary_comprehension" => {
                self.lower_comprehension(node, "{", "}")?
            }
            "generator_expression" => self.lower_comprehension(node, "(", ")")?,
            "attribute" => self.lower_attribute(node)?,
            "subscript" => self.lower_subscript(node)?,
            "call" => self.lower_call(node)?,
            "binary_operator" | "boolean_operator" => self.lower_binary(node)?,
            "unary_operator" => self.lower_unary(node)?,
            "not_operator" => self.lower_not(node)?,
            "comparison_operator" => self.lower_comparison(node)?,
            "conditional_expression" => self.lower_conditional(node)?,
            "assignment" => self.lower_assignment(node)?,
            "augmented_assignment" => self.lower_augmented_assignment(node)?,
            "named_expression" => self.lower_named_expression(node)?,
            "lambda" => Expr::Lambda(Box::new(self.lower_lambda(node)?)),
            "await" => self.lower_await(node)?,
            "yield" => self.lower_yield(node)?,
            "as_pattern" => Expr::todo("as_pattern", self.lower_children_any(node)?),
            "ERROR" => Expr::todo("ERROR", self.lower_children_any(node)?),
            kind => {
                ctx.unsupported("expression", node);
                Expr::todo(kind, self.lower_children_any(node)?)
            }
        })
    }

    fn lower_concatenated_string(&self, node: Node) -> Result<Expr> {
        let parts = named_children(node)
            .into_iter()
            .map(|part| self.lower_string(part).map(Argument::Arg))
            .collect::<Result<Vec<_>>>()?;
        Ok(Expr::special_call(
            SpecialKind::ConcatString(ConcatKind::Implicit),
            Token::fake("concat"),
            parts,
        ))
    }

    fn lower_pair(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::Tuple(Bracket::fake(vec![
            self.lower_expr(ctx.required(node, "key")?)?,
            self.lower_expr(ctx.required(node, "value")?)?,
        ])))
    }

    fn lower_splat(&self, node: Node, kind: SpecialKind, star: &str) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::special_call(
            kind,
            ctx.token_of(node, star),
            vec![Argument::Arg(self.lower_expr(ctx.first_named(node)?)?)],
        ))
    }

    fn lower_attribute(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::DotAccess(
            Box::new(self.lower_expr(ctx.required(node, "object")?)?),
            ctx.token_of(node, "."),
            FieldName::EN(Name::id(ctx.ident(ctx.required(node, "attribute")?))),
        ))
    }

    fn lower_call(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::call(
            self.lower_expr(ctx.required(node, "function")?)?,
            self.lower_arguments(ctx.required(node, "arguments")?)?,
        ))
    }

    /// `a + b + c` nests to the left. The left spine is walked in a loop, so
    /// long flat chains do not deepen the recursion.
    fn lower_binary(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let mut spine = vec![node];
        let mut leftmost = ctx.required(node, "left")?;
        while matches!(leftmost.kind(), "binary_operator" | "boolean_operator") {
            spine.push(leftmost);
            leftmost = ctx.required(leftmost, "left")?;
        }
        let mut acc = self.lower_expr(leftmost)?;
        for parent in spine.into_iter().rev() {
            let op_node = ctx.required(parent, "operator")?;
            let right = self.lower_expr(ctx.required(parent, "right")?)?;
            acc = match operator(op_node.kind()) {
                Some(op) => Expr::op_call(op, ctx.tok(op_node), vec![acc, right]),
                None => {
                    ctx.unsupported("binary operator", op_node);
                    Expr::todo(
                        op_node.kind(),
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
        let operand = self.lower_expr(ctx.required(node, "argument")?)?;
        Ok(match operator(op_node.kind()) {
            Some(op) => Expr::op_call(op, ctx.tok(op_node), vec![operand]),
            None => {
                ctx.unsupported("unary operator", op_node);
                Expr::todo(op_node.kind(), vec![Any::Tk(ctx.tok(op_node)), Any::E(operand)])
            }
        })
    }

    fn lower_not(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::op_call(
            Operator::Not,
            ctx.token_of(node, "not"),
            vec![self.lower_expr(ctx.required(node, "argument")?)?],
        ))
    }

    /// `then if cond else otherwise`
    fn lower_conditional(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let parts = named_children(node);
        let [then, cond, otherwise] = parts.as_slice() else {
            return Err(ctx.malformed(node, "expected three operands"));
        };
        Ok(Expr::Conditional(
            Box::new(self.lower_expr(*cond)?),
            Box::new(self.lower_expr(*then)?),
            Box::new(self.lower_expr(*otherwise)?),
        ))
    }

    fn lower_assignment(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let left = self.lower_expr(ctx.required(node, "left")?)?;
        Ok(match node.child_by_field_name("right") {
            Some(right) => Expr::assign(left, ctx.token_of(node, "="), self.lower_expr(right)?),
            // bare annotation `obj.x: int`
            None => Expr::todo(
                "annotation",
                vec![
                    Any::E(left),
                    Any::T(self.lower_type(ctx.required(node, "type")?)?),
                ],
            ),
        })
    }

    fn lower_augmented_assignment(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let left = self.lower_expr(ctx.required(node, "left")?)?;
        let op_node = ctx.required(node, "operator")?;
        let right = self.lower_expr(ctx.required(node, "right")?)?;
        Ok(match Operator::from_assign_op(op_node.kind()) {
            Some(op) => Expr::AssignOp(
                Box::new(left),
                Wrap::new(op, ctx.tok(op_node)),
                Box::new(right),
            ),
            None => {
                ctx.unsupported("assignment operator", op_node);
                Expr::todo(
                    op_node.kind(),
                    vec![Any::E(left), Any::Tk(ctx.tok(op_node)), Any::E(right)],
                )
            }
        })
    }

    fn lower_named_expression(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        Ok(Expr::assign(
            Expr::id(ctx.ident(ctx.required(node, "name")?)),
            ctx.token_of(node, ":="),
            self.lower_expr(ctx.required(node, "value")?)?,
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
        Ok(Expr::Yield(
            ctx.token_of(node, "yield"),
            value,
            find_anon(node, "from").is_some(),
        ))
    }

    fn lower_exprs(&self, node: Node) -> Result<Vec<Expr>> {
        named_children(node)
            .into_iter()
            .map(|child| self.lower_expr(child))
            .collect()
    }

    fn container(&self, node: Node, op: ContainerOperator, open: &str, close: &str) -> Result<Expr> {
        Ok(Expr::Container(
            op,
            Bracket::new(
                self.ctx.token_of(node, open),
                self.lower_exprs(node)?,
                self.ctx.token_of(node, close),
            ),
        ))
    }

    /// Plain strings become literals; f-strings an interpolation call over
    /// their literal parts and `{...}` elements.
    fn lower_string(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let parts = named_children(node);
        let has_interpolation = parts.iter().any(|p| p.kind() == "interpolation");
        if !has_interpolation {
            let value: String = parts
                .iter()
                .filter(|p| p.kind() == "string_content")
                .map(|p| ctx.text(*p))
                .collect();
            return Ok(Expr::string(value, ctx.tok(node)));
        }
        let mut args = Vec::new();
        for part in parts {
            match part.kind() {
                "string_content" => {
                    args.push(Argument::Arg(Expr::string(ctx.text(part), ctx.tok(part))))
                }
                "interpolation" => {
                    let value = self.lower_expr(ctx.required(part, "expression")?)?;
                    args.push(Argument::Arg(Expr::special_call(
                        SpecialKind::InterpolatedElement,
                        ctx.token_of(part, "{"),
                        vec![Argument::Arg(value)],
                    )));
                }
                _ => {}
            }
        }
        let open = children(node)
            .into_iter()
            .find(|c| c.kind() == "string_start")
            .map(|start| ctx.tok(start))
            .unwrap_or_else(|| Token::fake("f\""));
        Ok(Expr::special_call(
            SpecialKind::ConcatString(ConcatKind::Interpolated),
            open,
            args,
        ))
    }

    /// `[body for x in xs if cond]`: the body, then one `CompFor`/`CompIf`
    /// per clause, between the delimiters.
    fn lower_comprehension(&self, node: Node, open: &str, close: &str) -> Result<Expr> {
        let ctx = &self.ctx;
        let body = self.lower_expr(ctx.required(node, "body")?)?;
        let mut payload = vec![Any::Tk(ctx.token_of(node, open)), Any::E(body)];
        for clause in named_children(node) {
            match clause.kind() {
                "for_in_clause" => {
                    let pat = self.lower_target(ctx.required(clause, "left")?)?;
                    let rights = field_children(clause, "right")
                        .into_iter()
                        .map(|r| self.lower_expr(r))
                        .collect::<Result<Vec<_>>>()?;
                    let coll = match rights.len() {
                        1 => rights.into_iter().next().ok_or_else(|| {
                            ctx.malformed(clause, "for clause without an iterable")
                        })?,
                        0 => return Err(ctx.malformed(clause, "for clause without an iterable")),
                        _ => Expr::Tuple(Bracket::fake(rights)),
                    };
                    payload.push(Any::E(Expr::other(
                        OtherExprOp::CompFor,
                        vec![
                            Any::Tk(ctx.token_of(clause, "for")),
                            Any::P(pat),
                            Any::Tk(ctx.token_of(clause, "in")),
                            Any::E(coll),
                        ],
                    )));
                }
                "if_clause" => payload.push(Any::E(Expr::other(
                    OtherExprOp::CompIf,
                    vec![
                        Any::Tk(ctx.token_of(clause, "if")),
                        Any::E(self.lower_expr(ctx.first_named(clause)?)?),
                    ],
                ))),
                _ => {}
            }
        }
        payload.push(Any::Tk(ctx.token_of(node, close)));
        Ok(Expr::other(OtherExprOp::Comprehension, payload))
    }

    /// `a[i]`, `a[i:j:k]`, `a[i, j:k]`
    fn lower_subscript(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let value = Box::new(self.lower_expr(ctx.required(node, "value")?)?);
        let open = ctx.token_of(node, "[");
        let close = ctx.token_of(node, "]");
        let indices = field_children(node, "subscript");
        match indices.as_slice() {
            [slice] if slice.kind() == "slice" => Ok(Expr::SliceAccess(
                value,
                Bracket::new(open, self.lower_slice(*slice)?, close),
            )),
            [index] => Ok(Expr::ArrayAccess(
                value,
                Bracket::new(open, Box::new(self.lower_expr(*index)?), close),
            )),
            [] => Err(ctx.malformed(node, "subscript without an index")),
            _ => {
                let mut items = Vec::new();
                for index in indices {
                    items.push(if index.kind() == "slice" {
                        let slice = self.lower_slice(index)?;
                        Expr::todo(
                            "slice",
                            [slice.start, slice.end, slice.step]
                                .into_iter()
                                .flatten()
                                .map(|e| Any::E(*e))
                                .collect(),
                        )
                    } else {
                        self.lower_expr(index)?
                    });
                }
                Ok(Expr::ArrayAccess(
                    value,
                    Bracket::new(open, Box::new(Expr::Tuple(Bracket::fake(items))), close),
                ))
            }
        }
    }

    fn lower_slice(&self, node: Node) -> Result<Slice> {
        let mut slots: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut section = 0;
        for child in children(node) {
            if !child.is_named() {
                if child.kind() == ":" {
                    section += 1;
                }
                continue;
            }
            if let Some(slot) = slots.get_mut(section) {
                *slot = Some(Box::new(self.lower_expr(child)?));
            }
        }
        let [start, end, step] = slots;
        Ok(Slice { start, end, step })
    }

    /// `a < b` is a plain operator call; `a < b < c` keeps the chain.
    fn lower_comparison(&self, node: Node) -> Result<Expr> {
        let ctx = &self.ctx;
        let operands = named_children(node);
        let ops = field_children(node, "operators");
        if operands.len() != ops.len() + 1 {
            return Err(ctx.malformed(node, "operators and operands do not alternate"));
        }
        let special = |op_node: Node| match operator(op_node.kind()) {
            Some(op) => Expr::special(SpecialKind::Op(op), ctx.tok(op_node)),
            None => {
                ctx.unsupported("comparison operator", op_node);
                Expr::todo(op_node.kind(), vec![Any::Tk(ctx.tok(op_node))])
            }
        };
        if let ([left, right], [op_node]) = (operands.as_slice(), ops.as_slice()) {
            let args = vec![
                Argument::Arg(self.lower_expr(*left)?),
                Argument::Arg(self.lower_expr(*right)?),
            ];
            return Ok(Expr::call(special(*op_node), Bracket::fake(args)));
        }
        let mut payload = Vec::new();
        let mut operands = operands.into_iter();
        if let Some(first) = operands.next() {
            payload.push(Any::E(self.lower_expr(first)?));
        }
        for (op_node, operand) in ops.into_iter().zip(operands) {
            payload.push(Any::E(special(op_node)));
            payload.push(Any::E(self.lower_expr(operand)?));
        }
        Ok(Expr::other(OtherExprOp::CmpOps, payload))
    }

    fn lower_lambda(&self, node: Node) -> Result<FunctionDefinition> {
        let ctx = &self.ctx;
        let params = match node.child_by_field_name("parameters") {
            Some(params) => self.lower_params(params)?,
            None => Bracket::fake(Vec::new()),
        };
        let body = self.lower_expr(ctx.required(node, "body")?)?;
        Ok(FunctionDefinition {
            kind: Wrap::new(FunctionKind::LambdaKind, ctx.token_of(node, "lambda")),
            params,
            ret_type: None,
            body: Box::new(Stmt::Return(Token::fake("return"), Some(body), Token::fake(";"))),
        })
    }

    /// Annotations and base classes: names become named types, `X[...]` a
    /// type application, `A | B` a union.
    pub(super) fn lower_type(&self, node: Node) -> Result<Type> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "type" => self.lower_type(ctx.first_named(node)?)?,
            "identifier" => Type::TyN(Name::id(ctx.ident(node))),
            "none" => Type::builtin("None", ctx.tok(node)),
            "attribute" => match self.dotted_chain(node) {
                Some(ids) => Type::TyN(name_of_ids(ctx.language, ids)?),
                None => Type::todo("attribute", vec![Any::E(self.lower_expr(node)?)]),
            },
            "subscript" => {
                let base = self.lower_type(ctx.required(node, "value")?)?;
                let mut args = Vec::new();
                for index in field_children(node, "subscript") {
                    args.push(self.lower_type_argument(index)?);
                }
                Type::TyApply(
                    Box::new(base),
                    Bracket::new(ctx.token_of(node, "["), args, ctx.token_of(node, "]")),
                )
            }
            "generic_type" => {
                let base = self.lower_type(ctx.first_named(node)?)?;
                let params = named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "type_parameter")
                    .ok_or_else(|| ctx.malformed(node, "generic type without arguments"))?;
                let mut args = Vec::new();
                for arg in named_children(params) {
                    args.push(self.lower_type_argument(arg)?);
                }
                Type::TyApply(
                    Box::new(base),
                    Bracket::new(ctx.token_of(params, "["), args, ctx.token_of(params, "]")),
                )
            }
            "union_type" => {
                let parts = named_children(node);
                let [left, right] = parts.as_slice() else {
                    return Err(ctx.malformed(node, "expected two alternatives"));
                };
                Type::TyOr(
                    Box::new(self.lower_type(*left)?),
                    ctx.token_of(node, "|"),
                    Box::new(self.lower_type(*right)?),
                )
            }
            "binary_operator"
                if node
                    .child_by_field_name("operator")
                    .is_some_and(|op| op.kind() == "|") =>
            {
                Type::TyOr(
                    Box::new(self.lower_type(ctx.required(node, "left")?)?),
                    ctx.tok(ctx.required(node, "operator")?),
                    Box::new(self.lower_type(ctx.required(node, "right")?)?),
                )
            }
            kind => Type::todo(kind, vec![Any::E(self.lower_expr(node)?)]),
        })
    }

    fn lower_type_argument(&self, node: Node) -> Result<TypeArgument> {
        Ok(TypeArgument::TypeArg(self.lower_type(node)?))
    }
}

/// Integers, floats and imaginary literals (`1j`).
fn lower_number(ctx: &SourceCtx, node: Node) -> Expr {
    let text = ctx.text(node);
    if text.ends_with(['j', 'J']) {
        return Expr::L(Literal::Imag(Wrap::new(text.to_string(), ctx.tok(node))));
    }
    if node.kind() == "float" {
        return Expr::L(Literal::Float(Wrap::new(
            parse_float_literal(text),
            ctx.tok(node),
        )));
    }
    Expr::int(parse_int_literal(text), ctx.tok(node))
}
