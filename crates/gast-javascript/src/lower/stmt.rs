use gast_core::ast::{
    Any, Bracket, Case, CaseAndBody, Catch, Directive, Finally, ForHeader, ForVarOrExpr, LabelIdent,
    OtherPatOp, OtherStmtOp, OtherStmtWithStmtOp, Pattern, Stmt, Token,
};
use gast_core::error::Result;
use gast_core::ts::{field_children, find_anon, named_children};
use tree_sitter::Node;

use super::Normalizer;

impl<'s> Normalizer<'s> {
    /// Lower one statement; declarations of several variables give one
    /// statement per variable, grouped in a fake block.
    pub(super) fn lower_stmt(&self, node: Node) -> Result<Stmt> {
        let mut out = Vec::new();
        self.lower_stmt_into(node, &mut out)?;
        if out.len() == 1 {
            Ok(out.remove(0))
        } else {
            Ok(Stmt::fake_block(out))
        }
    }

    pub(super) fn lower_stmt_into(&self, node: Node, out: &mut Vec<Stmt>) -> Result<()> {
        let ctx = &self.ctx;
        let stmt = match node.kind() {
            "expression_statement" => {
                let expr = self.lower_expr(ctx.first_named(node)?)?;
                Stmt::expr(expr, self.semicolon(node))
            }
            "statement_block" => self.lower_block(node)?,
            "class_static_block" => self.lower_static_block(node)?,
            "empty_statement" => Stmt::other(OtherStmtOp::Empty, vec![Any::Tk(ctx.tok(node))]),
            "if_statement" => {
                let cond = self.lower_expr(ctx.required(node, "condition")?)?;
                let then = self.lower_stmt(ctx.required(node, "consequence")?)?;
                let otherwise = match node.child_by_field_name("alternative") {
                    Some(alt) => Some(Box::new(self.lower_else(alt)?)),
                    None => None,
                };
                Stmt::If(ctx.token_of(node, "if"), cond, Box::new(then), otherwise)
            }
            "while_statement" => {
                let cond = self.lower_expr(ctx.required(node, "condition")?)?;
                let body = self.lower_stmt(ctx.required(node, "body")?)?;
                Stmt::While(ctx.token_of(node, "while"), cond, Box::new(body))
            }
            "do_statement" => {
                let body = self.lower_stmt(ctx.required(node, "body")?)?;
                let cond = self.lower_expr(ctx.required(node, "condition")?)?;
                Stmt::DoWhile(ctx.token_of(node, "do"), Box::new(body), cond)
            }
            "for_statement" => self.lower_for(node)?,
            "for_in_statement" => self.lower_for_in(node)?,
            "return_statement" => {
                let value = match named_children(node).into_iter().next() {
                    Some(e) => Some(self.lower_expr(e)?),
                    None => None,
                };
                Stmt::Return(ctx.token_of(node, "return"), value, self.semicolon(node))
            }
            "break_statement" | "continue_statement" => {
                let label = match node.child_by_field_name("label") {
                    Some(label) => LabelIdent::Id(ctx.ident(label)),
                    None => LabelIdent::None,
                };
                if node.kind() == "break_statement" {
                    Stmt::Break(ctx.token_of(node, "break"), label, self.semicolon(node))
                } else {
                    Stmt::Continue(ctx.token_of(node, "continue"), label, self.semicolon(node))
                }
            }
            "throw_statement" => {
                let value = self.lower_expr(ctx.first_named(node)?)?;
                Stmt::Throw(ctx.token_of(node, "throw"), value, self.semicolon(node))
            }
            "try_statement" => self.lower_try(node)?,
            "switch_statement" => self.lower_switch(node)?,
            "labeled_statement" => {
                let label = ctx.ident(ctx.required(node, "label")?);
                let body = self.lower_stmt(ctx.required(node, "body")?)?;
                Stmt::Label(label, Box::new(body))
            }
            "with_statement" => {
                let object = self.lower_expr(ctx.required(node, "object")?)?;
                let body = self.lower_stmt(ctx.required(node, "body")?)?;
                Stmt::other_with_stmt(OtherStmtWithStmtOp::With, Some(object), body)
            }
            "debugger_statement" => Stmt::todo(
                "debugger_statement",
                vec![
                    Any::Tk(ctx.token_of(node, "debugger")),
                    Any::Tk(self.semicolon(node)),
                ],
            ),
            "function_declaration"
            | "generator_function_declaration"
            | "class_declaration"
            | "lexical_declaration"
            | "variable_declaration" => {
                out.extend(self.lower_declaration(node)?);
                return Ok(());
            }
            "import_statement" => {
                out.extend(self.lower_import(node)?);
                return Ok(());
            }
            "export_statement" => {
                out.extend(self.lower_export(node)?);
                return Ok(());
            }
            "hash_bang_line" => Stmt::directive(Directive::Pragma(ctx.ident(node), Vec::new())),
            "ERROR" => Stmt::todo("ERROR", vec![Any::Tk(ctx.tok(node))]),
            kind => {
                if !is_expression_like(node) {
                    ctx.unsupported("statement", node);
                    Stmt::todo_any(kind, self.lower_children_any(node)?)
                } else {
                    Stmt::expr(self.lower_expr(node)?, Token::fake(";"))
                }
            }
        };
        out.push(stmt);
        Ok(())
    }

    pub(super) fn lower_block(&self, node: Node) -> Result<Stmt> {
        let mut stmts = Vec::new();
        for child in named_children(node) {
            self.lower_stmt_into(child, &mut stmts)?;
        }
        Ok(Stmt::Block(Bracket::new(
            self.ctx.token_of(node, "{"),
            stmts,
            self.ctx.token_of(node, "}"),
        )))
    }

    /// `static { ... }` in a class body; the braces belong to the `body` block.
    pub(super) fn lower_static_block(&self, node: Node) -> Result<Stmt> {
        let body = self.lower_block(self.ctx.required(node, "body")?)?;
        Ok(Stmt::other_with_stmt(
            OtherStmtWithStmtOp::StaticInit,
            None,
            body,
        ))
    }

    fn lower_else(&self, node: Node) -> Result<Stmt> {
        if node.kind() == "else_clause" {
            self.lower_stmt(self.ctx.first_named(node)?)
        } else {
            self.lower_stmt(node)
        }
    }

    fn lower_for(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let mut inits = Vec::new();
        if let Some(init) = first_named_field(node, "initializer") {
            match init.kind() {
                "lexical_declaration" | "variable_declaration" => {
                    for (entity, var) in self.lower_for_vars(init)? {
                        inits.push(ForVarOrExpr::InitVar(entity, var));
                    }
                }
                "empty_statement" => {}
                "expression_statement" => {
                    let e = self.lower_expr(ctx.first_named(init)?)?;
                    inits.push(ForVarOrExpr::InitExpr(e));
                }
                _ => inits.push(ForVarOrExpr::InitExpr(self.lower_expr(init)?)),
            }
        }
        let cond = match first_named_field(node, "condition") {
            Some(c) if c.kind() == "empty_statement" => None,
            Some(c) if c.kind() == "expression_statement" => {
                Some(self.lower_expr(ctx.first_named(c)?)?)
            }
            Some(c) => Some(self.lower_expr(c)?),
            None => None,
        };
        let next = match first_named_field(node, "increment") {
            Some(e) => Some(self.lower_expr(e)?),
            None => None,
        };
        let body = self.lower_stmt(ctx.required(node, "body")?)?;
        Ok(Stmt::For(
            ctx.token_of(node, "for"),
            ForHeader::Classic(inits, cond, next),
            Box::new(body),
        ))
    }

    /// `for (x in xs)`, `for (const [k, v] of m)`
    fn lower_for_in(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let left = ctx.required(node, "left")?;
        let pat = match left.kind() {
            "identifier" | "object_pattern" | "array_pattern" => self.lower_pattern(left)?,
            "parenthesized_expression" => self.lower_pattern(ctx.first_named(left)?)?,
            _ => self.expr_pattern(left)?,
        };
        let op = match node.child_by_field_name("operator") {
            Some(op) => ctx.tok(op),
            None => ctx.token_of_any(node, &["in", "of"]),
        };
        let right = self.lower_expr(ctx.required(node, "right")?)?;
        let body = self.lower_stmt(ctx.required(node, "body")?)?;
        Ok(Stmt::For(
            ctx.token_of(node, "for"),
            ForHeader::Each(pat, op, right),
            Box::new(body),
        ))
    }

    fn lower_try(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let body = self.lower_stmt(ctx.required(node, "body")?)?;
        let mut catches = Vec::new();
        if let Some(handler) = node.child_by_field_name("handler") {
            let pat = match handler.child_by_field_name("parameter") {
                Some(param) => self.lower_pattern(param)?,
                None => Pattern::PatUnderscore(Token::fake("_")),
            };
            catches.push(Catch {
                tok: ctx.token_of(handler, "catch"),
                pat,
                body: self.lower_stmt(ctx.required(handler, "body")?)?,
            });
        }
        let finally = match node.child_by_field_name("finalizer") {
            Some(fin) => Some(Finally {
                tok: ctx.token_of(fin, "finally"),
                body: self.lower_stmt(ctx.required(fin, "body")?)?,
            }),
            None => None,
        };
        Ok(Stmt::Try(
            ctx.token_of(node, "try"),
            Box::new(body),
            catches,
            finally.map(Box::new),
        ))
    }

    fn lower_switch(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let value = self.lower_expr(ctx.required(node, "value")?)?;
        let mut cases = Vec::new();
        for clause in named_children(ctx.required(node, "body")?) {
            let case = match clause.kind() {
                "switch_case" => {
                    let e = self.lower_expr(ctx.required(clause, "value")?)?;
                    Case::CaseEqualExpr(ctx.token_of(clause, "case"), e)
                }
                "switch_default" => Case::Default(ctx.token_of(clause, "default")),
                _ => continue,
            };
            let mut body = Vec::new();
            for stmt in field_children(clause, "body") {
                self.lower_stmt_into(stmt, &mut body)?;
            }
            cases.push(CaseAndBody {
                cases: vec![case],
                body: Stmt::fake_block(body),
            });
        }
        Ok(Stmt::Switch(ctx.token_of(node, "switch"), Some(value), cases))
    }

    /// Destructuring target that is not a plain pattern (`for (a.b of xs)`).
    pub(super) fn expr_pattern(&self, node: Node) -> Result<Pattern> {
        Ok(Pattern::other(
            OtherPatOp::ExprPattern,
            vec![Any::E(self.lower_expr(node)?)],
        ))
    }
}

fn first_named_field<'t>(node: Node<'t>, field: &str) -> Option<Node<'t>> {
    field_children(node, field)
        .into_iter()
        .find(|child| child.is_named())
}

fn is_expression_like(node: Node) -> bool {
    let kind = node.kind();
    !(kind.ends_with("_statement") || kind.ends_with("_declaration") || kind.ends_with("_clause"))
        && find_anon(node, ";").is_none()
}
