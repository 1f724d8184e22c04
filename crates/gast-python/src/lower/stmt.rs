use gast_core::ast::{
    Any, Bracket, Case, CaseAndBody, Catch, Definition, DefinitionKind, Entity, Expr, Finally,
    ForHeader, IdInfoCell, LabelIdent, OtherStmtOp, OtherStmtWithStmtOp, Pattern, Stmt, Token,
    Type,
};
use gast_core::error::Result;
use gast_core::ts::{children, field_children, find_kind, named_children};
use tree_sitter::Node;

use super::Normalizer;

fn semicolon() -> Token {
    Token::fake(";")
}

/// Target of `e as target`.
pub(super) fn as_target(node: Node) -> Option<Node> {
    let alias = node.child_by_field_name("alias")?;
    Some(named_children(alias).into_iter().next().unwrap_or(alias))
}

impl<'s> Normalizer<'s> {
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
            "expression_statement" => self.lower_expression_statement(node)?,
            "block" => self.lower_block(node)?,
            "pass_statement" => Stmt::other(OtherStmtOp::Pass, vec![Any::Tk(ctx.tok(node))]),
            "break_statement" => Stmt::Break(ctx.tok(node), LabelIdent::None, semicolon()),
            "continue_statement" => Stmt::Continue(ctx.tok(node), LabelIdent::None, semicolon()),
            "return_statement" => {
                let value = match named_children(node).into_iter().next() {
                    Some(e) => Some(self.lower_expr(e)?),
                    None => None,
                };
                Stmt::Return(ctx.token_of(node, "return"), value, semicolon())
            }
            "raise_statement" => self.lower_raise(node)?,
            "assert_statement" => {
                let mut parts = named_children(node).into_iter();
                let cond = parts
                    .next()
                    .ok_or_else(|| ctx.malformed(node, "assert without a condition"))?;
                let message = match parts.next() {
                    Some(msg) => Some(self.lower_expr(msg)?),
                    None => None,
                };
                Stmt::Assert(
                    ctx.token_of(node, "assert"),
                    self.lower_expr(cond)?,
                    message,
                    semicolon(),
                )
            }
            "delete_statement" => {
                let mut payload = vec![Any::Tk(ctx.token_of(node, "del"))];
                for target in named_children(node) {
                    payload.push(Any::E(self.lower_expr(target)?));
                }
                Stmt::other(OtherStmtOp::Delete, payload)
            }
            "print_statement" => {
                let mut payload = vec![Any::Tk(ctx.token_of(node, "print"))];
                for arg in named_children(node) {
                    let arg = if arg.kind() == "chevron" {
                        ctx.first_named(arg)?
                    } else {
                        arg
                    };
                    payload.push(Any::E(self.lower_expr(arg)?));
                }
                Stmt::other(OtherStmtOp::Print, payload)
            }
            "exec_statement" => {
                let mut payload = vec![Any::Tk(ctx.token_of(node, "exec"))];
                for arg in named_children(node) {
                    payload.push(Any::E(self.lower_expr(arg)?));
                }
                Stmt::other(OtherStmtOp::Exec, payload)
            }
            "global_statement" | "nonlocal_statement" => {
                // one declaration per name
                let tok = ctx.tok(
                    children(node)
                        .into_iter()
                        .find(|c| !c.is_named())
                        .ok_or_else(|| ctx.malformed(node, "missing keyword"))?,
                );
                for name in named_children(node) {
                    out.push(Stmt::def(Definition::new(
                        Entity::basic(ctx.ident(name)),
                        DefinitionKind::UseOuterDecl(tok.clone()),
                    )));
                }
                return Ok(());
            }
            "if_statement" => self.lower_if(node)?,
            "for_statement" => {
                let pat = self.lower_target(ctx.required(node, "left")?)?;
                let coll = self.lower_expr(ctx.required(node, "right")?)?;
                let body = self.lower_stmt(ctx.required(node, "body")?)?;
                let stmt = Stmt::For(
                    ctx.token_of(node, "for"),
                    ForHeader::Each(pat, ctx.token_of(node, "in"), coll),
                    Box::new(body),
                );
                self.with_else(node, stmt)?
            }
            "while_statement" => {
                let stmt = Stmt::While(
                    ctx.token_of(node, "while"),
                    self.lower_expr(ctx.required(node, "condition")?)?,
                    Box::new(self.lower_stmt(ctx.required(node, "body")?)?),
                );
                self.with_else(node, stmt)?
            }
            "try_statement" => self.lower_try(node)?,
            "with_statement" => self.lower_with(node)?,
            "match_statement" => self.lower_match(node)?,
            "function_definition" | "class_definition" | "decorated_definition" => {
                Stmt::def(self.lower_definition(node, false)?)
            }
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                out.extend(self.lower_import(node)?);
                return Ok(());
            }
            "type_alias_statement" => self.lower_type_alias(node)?,
            "ERROR" => Stmt::todo_any("ERROR", self.lower_children_any(node)?),
            kind => {
                ctx.unsupported("statement", node);
                Stmt::todo_any(kind, self.lower_children_any(node)?)
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
        Ok(Stmt::fake_block(stmts))
    }

    fn lower_expression_statement(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let parts = named_children(node);
        if let [single] = parts.as_slice() {
            if single.kind() == "assignment" && single.child_by_field_name("type").is_some() {
                if let Some(def) = self.lower_annotated_assignment(*single)? {
                    return Ok(Stmt::def(def));
                }
            }
            return Ok(Stmt::expr(self.lower_expr(*single)?, semicolon()));
        }
        if parts.is_empty() {
            return Err(ctx.malformed(node, "empty expression statement"));
        }
        let items = parts
            .into_iter()
            .map(|e| self.lower_expr(e))
            .collect::<Result<Vec<_>>>()?;
        Ok(Stmt::expr(Expr::Tuple(Bracket::fake(items)), semicolon()))
    }

    /// `if`/`elif`/`else`: each `elif` nests as the else branch of the one before.
    fn lower_if(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let mut otherwise = None;
        for alt in field_children(node, "alternative").into_iter().rev() {
            otherwise = Some(match alt.kind() {
                "else_clause" => self.lower_stmt(ctx.required(alt, "body")?)?,
                _ => Stmt::If(
                    ctx.token_of(alt, "elif"),
                    self.lower_expr(ctx.required(alt, "condition")?)?,
                    Box::new(self.lower_stmt(ctx.required(alt, "consequence")?)?),
                    otherwise.map(Box::new),
                ),
            });
        }
        Ok(Stmt::If(
            ctx.token_of(node, "if"),
            self.lower_expr(ctx.required(node, "condition")?)?,
            Box::new(self.lower_stmt(ctx.required(node, "consequence")?)?),
            otherwise.map(Box::new),
        ))
    }

    /// Loops and `try` with an `else:` arm run the arm after the statement.
    fn with_else(&self, node: Node, stmt: Stmt) -> Result<Stmt> {
        let Some(clause) = find_kind(node, "else_clause") else {
            return Ok(stmt);
        };
        let body = self.lower_stmt(self.ctx.required(clause, "body")?)?;
        Ok(Stmt::fake_block(vec![
            stmt,
            Stmt::other_with_stmt(OtherStmtWithStmtOp::Else, None, body),
        ]))
    }

    fn lower_raise(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let raise = ctx.token_of(node, "raise");
        let Some(value) = named_children(node)
            .into_iter()
            .find(|c| node.child_by_field_name("cause") != Some(*c))
        else {
            // bare `raise` re-raises the active exception
            return Ok(Stmt::todo("reraise", vec![Any::Tk(raise)]));
        };
        let value = self.lower_expr(value)?;
        let value = match node.child_by_field_name("cause") {
            Some(cause) => Expr::todo(
                "raise_from",
                vec![
                    Any::E(value),
                    Any::Tk(ctx.token_of(node, "from")),
                    Any::E(self.lower_expr(cause)?),
                ],
            ),
            None => value,
        };
        Ok(Stmt::Throw(raise, value, semicolon()))
    }

    fn lower_try(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let body = self.lower_stmt(ctx.required(node, "body")?)?;
        let mut catches = Vec::new();
        let mut finally = None;
        for child in named_children(node) {
            match child.kind() {
                "except_clause" | "except_group_clause" => catches.push(self.lower_except(child)?),
                "finally_clause" => {
                    let block = find_kind(child, "block")
                        .ok_or_else(|| ctx.malformed(child, "finally without a body"))?;
                    finally = Some(Finally {
                        tok: ctx.token_of(child, "finally"),
                        body: self.lower_stmt(block)?,
                    });
                }
                _ => {}
            }
        }
        let stmt = Stmt::Try(
            ctx.token_of(node, "try"),
            Box::new(body),
            catches,
            finally.map(Box::new),
        );
        self.with_else(node, stmt)
    }

    /// `except`, `except E`, `except (A, B) as e`.
    fn lower_except(&self, node: Node) -> Result<Catch> {
        let ctx = &self.ctx;
        let parts = named_children(node);
        let Some((block, head)) = parts.split_last() else {
            return Err(ctx.malformed(node, "except without a body"));
        };
        let pat = match head {
            [] => Pattern::PatUnderscore(Token::fake("_")),
            [value] if value.kind() == "as_pattern" => {
                // `except E as e` in grammars that fold the alias into the value
                let ty = self.lower_exception_type(ctx.first_named(*value)?)?;
                match as_target(*value) {
                    Some(alias) => {
                        Pattern::PatVar(ty, Some((ctx.ident(alias), IdInfoCell::new())))
                    }
                    None => Pattern::PatType(ty),
                }
            }
            [value] => Pattern::PatType(self.lower_exception_type(*value)?),
            [value, alias, ..] => Pattern::PatVar(
                self.lower_exception_type(*value)?,
                Some((ctx.ident(*alias), IdInfoCell::new())),
            ),
        };
        Ok(Catch {
            tok: ctx.tok(
                children(node)
                    .into_iter()
                    .next()
                    .ok_or_else(|| ctx.malformed(node, "except without a keyword"))?,
            ),
            pat,
            body: self.lower_stmt(*block)?,
        })
    }

    /// A tuple of exception classes reads as a union.
    fn lower_exception_type(&self, node: Node) -> Result<Type> {
        if !matches!(node.kind(), "tuple" | "parenthesized_expression") {
            return self.lower_type(node);
        }
        let mut items = named_children(node).into_iter();
        let first = items
            .next()
            .ok_or_else(|| self.ctx.malformed(node, "empty exception tuple"))?;
        let mut ty = self.lower_exception_type(first)?;
        for item in items {
            ty = Type::TyOr(
                Box::new(ty),
                Token::fake("|"),
                Box::new(self.lower_exception_type(item)?),
            );
        }
        Ok(ty)
    }

    /// `with a as x, b:` nests one wrapper per item, the first outermost.
    fn lower_with(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let clause = find_kind(node, "with_clause")
            .ok_or_else(|| ctx.malformed(node, "with without items"))?;
        let mut items = Vec::new();
        for item in named_children(clause) {
            if item.kind() != "with_item" {
                continue;
            }
            let value = ctx.required(item, "value")?;
            let resource = if value.kind() == "as_pattern" {
                let source = self.lower_expr(ctx.first_named(value)?)?;
                let target =
                    as_target(value).ok_or_else(|| ctx.malformed(value, "as without a target"))?;
                Expr::LetPattern(Box::new(self.lower_target(target)?), Box::new(source))
            } else {
                self.lower_expr(value)?
            };
            items.push(resource);
        }
        let mut stmt = self.lower_stmt(ctx.required(node, "body")?)?;
        for resource in items.into_iter().rev() {
            stmt = Stmt::other_with_stmt(OtherStmtWithStmtOp::With, Some(resource), stmt);
        }
        Ok(stmt)
    }

    /// `match` becomes a switch whose cases are patterns.
    fn lower_match(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let subjects = field_children(node, "subject")
            .into_iter()
            .map(|s| self.lower_expr(s))
            .collect::<Result<Vec<_>>>()?;
        let subject = match subjects.len() {
            0 => return Err(ctx.malformed(node, "match without a subject")),
            1 => subjects.into_iter().next(),
            _ => Some(Expr::Tuple(Bracket::fake(subjects))),
        };
        let mut arms = Vec::new();
        let body = ctx.required(node, "body")?;
        for clause in named_children(body) {
            if clause.kind() != "case_clause" {
                continue;
            }
            let case_tok = ctx.token_of(clause, "case");
            let mut pats = Vec::new();
            for pat in named_children(clause) {
                if pat.kind() == "case_pattern" {
                    pats.push(self.lower_case_pattern(pat)?);
                }
            }
            let mut pat = match pats.len() {
                0 => return Err(ctx.malformed(clause, "case without a pattern")),
                1 => pats.remove(0),
                _ => Pattern::PatTuple(Bracket::fake(pats)),
            };
            if let Some(guard) = clause.child_by_field_name("guard") {
                pat = Pattern::PatWhen(Box::new(pat), self.lower_expr(ctx.first_named(guard)?)?);
            }
            let case = match pat {
                Pattern::PatUnderscore(_) => Case::Default(case_tok),
                pat => Case::Case(case_tok, pat),
            };
            arms.push(CaseAndBody {
                cases: vec![case],
                body: self.lower_stmt(ctx.required(clause, "consequence")?)?,
            });
        }
        Ok(Stmt::Switch(ctx.token_of(node, "match"), subject, arms))
    }
}
