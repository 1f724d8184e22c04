use gast_core::ast::{
    name_of_ids, Any, Bracket, Expr, IdInfoCell, Literal, OtherPatOp, Pattern, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{children, named_children};
use tree_sitter::Node;

use super::Normalizer;

impl<'s> Normalizer<'s> {
    /// Binding targets of `for`, `with ... as` and comprehensions.
    pub(super) fn lower_target(&self, node: Node) -> Result<Pattern> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "identifier" | "keyword_identifier" => Pattern::id(ctx.ident(node)),
            "pattern_list" | "expression_list" => Pattern::PatTuple(Bracket::fake(
                self.lower_targets(node)?,
            )),
            "tuple_pattern" | "tuple" => Pattern::PatTuple(Bracket::new(
                ctx.token_of(node, "("),
                self.lower_targets(node)?,
                ctx.token_of(node, ")"),
            )),
            "list_pattern" | "list" => Pattern::PatList(Bracket::new(
                ctx.token_of(node, "["),
                self.lower_targets(node)?,
                ctx.token_of(node, "]"),
            )),
            "list_splat_pattern" | "list_splat" => Pattern::other(
                OtherPatOp::Rest,
                vec![
                    Any::Tk(ctx.token_of(node, "*")),
                    Any::P(self.lower_target(ctx.first_named(node)?)?),
                ],
            ),
            "parenthesized_expression" => self.lower_target(ctx.first_named(node)?)?,
            // `for x.attr in ...` assigns through an arbitrary expression
            _ => Pattern::other(OtherPatOp::ExprPattern, vec![Any::E(self.lower_expr(node)?)]),
        })
    }

    fn lower_targets(&self, node: Node) -> Result<Vec<Pattern>> {
        named_children(node)
            .into_iter()
            .map(|child| self.lower_target(child))
            .collect()
    }

    /// Patterns of `case` clauses.
    pub(super) fn lower_case_pattern(&self, node: Node) -> Result<Pattern> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "case_pattern" => match named_children(node).as_slice() {
                [] => Pattern::PatUnderscore(ctx.tok(node)),
                [inner] => self.lower_case_pattern(*inner)?,
                _ => return Err(ctx.malformed(node, "expected one pattern")),
            },
            "dotted_name" => {
                let ids: Vec<_> = named_children(node)
                    .into_iter()
                    .map(|id| ctx.ident(id))
                    .collect();
                if ids.len() == 1 {
                    // a bare name captures the subject
                    let id = ids.into_iter().next().ok_or_else(|| ctx.malformed(node, "empty name"))?;
                    if id.value == "_" {
                        Pattern::PatUnderscore(id.tok)
                    } else {
                        Pattern::PatId(id, IdInfoCell::new())
                    }
                } else {
                    // `Color.RED` compares against a value
                    Pattern::other(
                        OtherPatOp::ExprPattern,
                        vec![Any::E(Expr::N(name_of_ids(ctx.language, ids)?))],
                    )
                }
            }
            "integer" | "float" | "string" | "concatenated_string" | "true" | "false"
            | "none" => match self.lower_expr(node)? {
                Expr::L(lit) => Pattern::PatLiteral(lit),
                other => Pattern::other(OtherPatOp::ExprPattern, vec![Any::E(other)]),
            },
            "class_pattern" => {
                let parts = named_children(node);
                let Some((head, args)) = parts.split_first() else {
                    return Err(ctx.malformed(node, "class pattern without a class"));
                };
                let ids = named_children(*head)
                    .into_iter()
                    .map(|id| ctx.ident(id))
                    .collect();
                let mut subs = Vec::new();
                for arg in args {
                    subs.push(self.lower_case_pattern(*arg)?);
                }
                Pattern::PatConstructor(name_of_ids(ctx.language, ids)?, subs)
            }
            "list_pattern" => Pattern::PatList(Bracket::new(
                ctx.token_of(node, "["),
                self.lower_case_patterns(node)?,
                ctx.token_of(node, "]"),
            )),
            "tuple_pattern" => Pattern::PatTuple(Bracket::new(
                ctx.token_of(node, "("),
                self.lower_case_patterns(node)?,
                ctx.token_of(node, ")"),
            )),
            "union_pattern" => {
                let mut alts = self.lower_case_patterns(node)?.into_iter();
                let first = alts
                    .next()
                    .ok_or_else(|| ctx.malformed(node, "empty union pattern"))?;
                alts.fold(first, |acc, alt| Pattern::PatDisj(Box::new(acc), Box::new(alt)))
            }
            "as_pattern" => {
                let inner = self.lower_case_pattern(ctx.first_named(node)?)?;
                let alias = named_children(node)
                    .into_iter()
                    .last()
                    .ok_or_else(|| ctx.malformed(node, "as without a name"))?;
                let alias = named_children(alias).into_iter().next().unwrap_or(alias);
                Pattern::PatAs(Box::new(inner), ctx.ident(alias), IdInfoCell::new())
            }
            "dict_pattern" => {
                let mut payload = Vec::new();
                let mut parts = named_children(node).into_iter();
                while let Some(part) = parts.next() {
                    if part.kind() == "splat_pattern" {
                        payload.push(Any::P(self.lower_case_pattern(part)?));
                        continue;
                    }
                    let value = parts
                        .next()
                        .ok_or_else(|| ctx.malformed(node, "key without a pattern"))?;
                    payload.push(Any::P(Pattern::PatKeyVal(
                        Box::new(self.lower_case_pattern(part)?),
                        Box::new(self.lower_case_pattern(value)?),
                    )));
                }
                Pattern::other(OtherPatOp::Todo("dict_pattern".into()), payload)
            }
            "keyword_pattern" => {
                let parts = named_children(node);
                let [key, value] = parts.as_slice() else {
                    return Err(ctx.malformed(node, "expected a keyword and a pattern"));
                };
                Pattern::PatKeyVal(
                    Box::new(Pattern::id(ctx.ident(*key))),
                    Box::new(self.lower_case_pattern(*value)?),
                )
            }
            "splat_pattern" => {
                let mut payload = Vec::new();
                for part in children(node) {
                    payload.push(match part.kind() {
                        "identifier" => Any::P(Pattern::id(ctx.ident(part))),
                        _ => Any::Tk(ctx.tok(part)),
                    });
                }
                Pattern::other(OtherPatOp::Rest, payload)
            }
            "complex_pattern" => Pattern::PatLiteral(Literal::Imag(Wrap::new(
                ctx.text(node).to_string(),
                ctx.tok(node),
            ))),
            kind => {
                ctx.unsupported("pattern", node);
                Pattern::todo(kind, self.lower_children_any(node)?)
            }
        })
    }

    fn lower_case_patterns(&self, node: Node) -> Result<Vec<Pattern>> {
        named_children(node)
            .into_iter()
            .map(|child| self.lower_case_pattern(child))
            .collect()
    }
}
