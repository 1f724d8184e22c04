use gast_core::ast::{
    Any, Bracket, OtherParamOp, OtherPatOp, Parameter, ParameterClassic, PatRecordField, Pattern,
    Token, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::named_children;
use tree_sitter::Node;

use super::Normalizer;

impl<'s> Normalizer<'s> {
    pub(super) fn lower_params(&self, node: Node) -> Result<Bracket<Vec<Parameter>>> {
        let params = named_children(node)
            .into_iter()
            .map(|param| self.lower_param(param))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bracket::new(
            self.ctx.token_of(node, "("),
            params,
            self.ctx.token_of(node, ")"),
        ))
    }

    pub(super) fn lower_param(&self, node: Node) -> Result<Parameter> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "identifier" => Parameter::Classic(ParameterClassic::named(ctx.ident(node))),
            "assignment_pattern" => {
                let left = ctx.required(node, "left")?;
                let default = self.lower_expr(ctx.required(node, "right")?)?;
                if left.kind() == "identifier" {
                    Parameter::Classic(
                        ParameterClassic::named(ctx.ident(left)).with_default(Some(default)),
                    )
                } else {
                    Parameter::Pattern(Pattern::other(
                        OtherPatOp::DefaultValue,
                        vec![Any::P(self.lower_pattern(left)?), Any::E(default)],
                    ))
                }
            }
            "rest_pattern" => {
                let dots = ctx.token_of(node, "...");
                let inner = ctx.first_named(node)?;
                if inner.kind() == "identifier" {
                    Parameter::Rest(dots, ParameterClassic::named(ctx.ident(inner)))
                } else {
                    Parameter::Pattern(Pattern::other(
                        OtherPatOp::Rest,
                        vec![Any::Tk(dots), Any::P(self.lower_pattern(inner)?)],
                    ))
                }
            }
            "object_pattern" | "array_pattern" => Parameter::Pattern(self.lower_pattern(node)?),
            kind => {
                ctx.unsupported("parameter", node);
                Parameter::OtherParam(
                    OtherParamOp::Todo(kind.to_string()),
                    self.lower_children_any(node)?,
                )
            }
        })
    }

    /// Binding patterns of declarations, parameters, catch clauses and loops.
    pub(super) fn lower_pattern(&self, node: Node) -> Result<Pattern> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => Pattern::id(ctx.ident(node)),
            "undefined" => Pattern::id(ctx.ident(node)),
            "object_pattern" => {
                let mut fields = Vec::new();
                for prop in named_children(node) {
                    fields.push(self.lower_record_field(prop)?);
                }
                Pattern::PatRecord(Bracket::new(
                    ctx.token_of(node, "{"),
                    fields,
                    ctx.token_of(node, "}"),
                ))
            }
            "array_pattern" => {
                let items = named_children(node)
                    .into_iter()
                    .map(|item| self.lower_pattern(item))
                    .collect::<Result<Vec<_>>>()?;
                Pattern::PatList(Bracket::new(
                    ctx.token_of(node, "["),
                    items,
                    ctx.token_of(node, "]"),
                ))
            }
            "assignment_pattern" => {
                let left = self.lower_pattern(ctx.required(node, "left")?)?;
                let default = self.lower_expr(ctx.required(node, "right")?)?;
                Pattern::other(OtherPatOp::DefaultValue, vec![Any::P(left), Any::E(default)])
            }
            "rest_pattern" => {
                let inner = self.lower_pattern(ctx.first_named(node)?)?;
                Pattern::other(
                    OtherPatOp::Rest,
                    vec![Any::Tk(ctx.token_of(node, "...")), Any::P(inner)],
                )
            }
            "member_expression" | "subscript_expression" | "parenthesized_expression" => {
                self.expr_pattern(node)?
            }
            kind => {
                ctx.unsupported("pattern", node);
                Pattern::todo(kind, self.lower_children_any(node)?)
            }
        })
    }

    fn lower_record_field(&self, node: Node) -> Result<PatRecordField> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "pair_pattern" => PatRecordField {
                field: vec![self.property_name(ctx.required(node, "key")?)],
                pat: self.lower_pattern(ctx.required(node, "value")?)?,
            },
            "shorthand_property_identifier_pattern" => PatRecordField {
                field: vec![ctx.ident(node)],
                pat: Pattern::id(ctx.ident(node)),
            },
            "object_assignment_pattern" => {
                let left = ctx.required(node, "left")?;
                let default = self.lower_expr(ctx.required(node, "right")?)?;
                PatRecordField {
                    field: vec![ctx.ident(left)],
                    pat: Pattern::other(
                        OtherPatOp::DefaultValue,
                        vec![Any::P(self.lower_pattern(left)?), Any::E(default)],
                    ),
                }
            }
            "rest_pattern" => PatRecordField {
                field: vec![Wrap::new("...".to_string(), ctx.token_of(node, "..."))],
                pat: self.lower_pattern(node)?,
            },
            _ => PatRecordField {
                field: vec![Wrap::new(node.kind().to_string(), Token::fake(node.kind()))],
                pat: self.lower_pattern(node)?,
            },
        })
    }
}
