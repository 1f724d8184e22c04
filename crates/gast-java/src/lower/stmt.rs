use gast_core::ast::{
    name_of_ids_with_targs, Any, Bracket, Case, CaseAndBody, Catch, Expr, Finally, ForHeader,
    ForVarOrExpr, IdInfoCell, LabelIdent, OtherStmtOp, OtherStmtWithStmtOp, Pattern, Stmt,
    Token, Type,
};
use gast_core::error::Result;
use gast_core::ts::{field_children, find_anon, find_kind, named_children};
use tree_sitter::Node;

use super::types::is_annotation;
use super::Normalizer;

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
            "expression_statement" => {
                let inner = ctx.first_named(node)?;
                if inner.kind() == "switch_expression" {
                    self.lower_switch(inner)?
                } else {
                    Stmt::expr(self.lower_expr(inner)?, ctx.token_of(node, ";"))
                }
            }
            "block" | "constructor_body" => self.lower_block(node)?,
            "if_statement" => {
                let cond = self.lower_expr(ctx.required(node, "condition")?)?;
                let then = self.lower_stmt(ctx.required(node, "consequence")?)?;
                let otherwise = match node.child_by_field_name("alternative") {
                    Some(alt) => Some(Box::new(self.lower_stmt(alt)?)),
                    None => None,
                };
                Stmt::If(ctx.token_of(node, "if"), cond, Box::new(then), otherwise)
            }
            "while_statement" => Stmt::While(
                ctx.token_of(node, "while"),
                self.lower_expr(ctx.required(node, "condition")?)?,
                Box::new(self.lower_stmt(ctx.required(node, "body")?)?),
            ),
            "do_statement" => Stmt::DoWhile(
                ctx.token_of(node, "do"),
                Box::new(self.lower_stmt(ctx.required(node, "body")?)?),
                self.lower_expr(ctx.required(node, "condition")?)?,
            ),
            "for_statement" => self.lower_for(node)?,
            "enhanced_for_statement" => self.lower_enhanced_for(node)?,
            "return_statement" => {
                let value = match named_children(node).into_iter().next() {
                    Some(e) => Some(self.lower_expr(e)?),
                    None => None,
                };
                Stmt::Return(ctx.token_of(node, "return"), value, ctx.token_of(node, ";"))
            }
            "break_statement" | "continue_statement" => {
                let label = match named_children(node).into_iter().next() {
                    Some(label) => LabelIdent::Id(ctx.ident(label)),
                    None => LabelIdent::None,
                };
                if node.kind() == "break_statement" {
                    Stmt::Break(ctx.token_of(node, "break"), label, ctx.token_of(node, ";"))
                } else {
                    Stmt::Continue(ctx.token_of(node, "continue"), label, ctx.token_of(node, ";"))
                }
            }
            "yield_statement" => {
                let value = self.lower_expr(ctx.first_named(node)?)?;
                Stmt::expr(
                    Expr::Yield(ctx.token_of(node, "yield"), Some(Box::new(value)), false),
                    ctx.token_of(node, ";"),
                )
            }
            "throw_statement" => Stmt::Throw(
                ctx.token_of(node, "throw"),
                self.lower_expr(ctx.first_named(node)?)?,
                ctx.token_of(node, ";"),
            ),
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
                    ctx.token_of(node, ";"),
                )
            }
            "synchronized_statement" => {
                let lock = named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "parenthesized_expression")
                    .ok_or_else(|| ctx.malformed(node, "synchronized without a lock"))?;
                let body = self.lower_stmt(ctx.required(node, "body")?)?;
                Stmt::other_with_stmt(
                    OtherStmtWithStmtOp::Synchronized,
                    Some(self.lower_expr(lock)?),
                    body,
                )
            }
            "labeled_statement" => {
                let mut parts = named_children(node).into_iter();
                let label = parts
                    .next()
                    .ok_or_else(|| ctx.malformed(node, "statement without a label"))?;
                // `label: ;` labels the anonymous empty statement
                let body = match parts.next().or_else(|| find_anon(node, ";")) {
                    Some(body) => self.lower_stmt(body)?,
                    None => return Err(ctx.malformed(node, "label without a statement")),
                };
                Stmt::Label(ctx.ident(label), Box::new(body))
            }
            ";" => Stmt::other(OtherStmtOp::Empty, vec![Any::Tk(ctx.tok(node))]),
            "try_statement" => self.lower_try(node)?,
            "try_with_resources_statement" => {
                let resources = self.lower_resources(ctx.required(node, "resources")?)?;
                Stmt::other_with_stmt(OtherStmtWithStmtOp::With, resources, self.lower_try(node)?)
            }
            "switch_expression" => self.lower_switch(node)?,
            "explicit_constructor_invocation" => Stmt::expr(
                self.lower_ctor_invocation(node)?,
                ctx.token_of(node, ";"),
            ),
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
            | "local_variable_declaration"
            | "field_declaration"
            | "constant_declaration"
            | "method_declaration"
            | "constructor_declaration"
            | "compact_constructor_declaration"
            | "annotation_type_element_declaration"
            | "package_declaration"
            | "import_declaration"
            | "module_declaration" => {
                out.extend(self.lower_declaration(node)?);
                return Ok(());
            }
            "ERROR" => Stmt::todo_any("ERROR", self.lower_children_any(node)?),
            kind => {
                if kind.ends_with("_statement") || kind.ends_with("_declaration") {
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

    fn lower_for(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let mut inits = Vec::new();
        for init in field_children(node, "init") {
            if init.kind() == "local_variable_declaration" {
                for (entity, var) in self.lower_declarators(init)? {
                    inits.push(ForVarOrExpr::InitVar(entity, var));
                }
            } else if init.is_named() {
                inits.push(ForVarOrExpr::InitExpr(self.lower_expr(init)?));
            }
        }
        let cond = match node.child_by_field_name("condition") {
            Some(cond) => Some(self.lower_expr(cond)?),
            None => None,
        };
        let updates = field_children(node, "update")
            .into_iter()
            .filter(|u| u.is_named())
            .map(|u| self.lower_expr(u))
            .collect::<Result<Vec<_>>>()?;
        let next = match updates.len() {
            0 => None,
            1 => updates.into_iter().next(),
            _ => Some(Expr::Seq(updates)),
        };
        let body = self.lower_stmt(ctx.required(node, "body")?)?;
        Ok(Stmt::For(
            ctx.token_of(node, "for"),
            ForHeader::Classic(inits, cond, next),
            Box::new(body),
        ))
    }

    /// `for (T x : xs)` binds `x` through a typed-variable pattern.
    fn lower_enhanced_for(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let ty = self.lower_type(ctx.required(node, "type")?)?;
        let ty = self.wrap_dims(ty, node.child_by_field_name("dimensions"));
        let name = ctx.ident(ctx.required(node, "name")?);
        let pat = Pattern::PatVar(ty, Some((name, IdInfoCell::new())));
        let value = self.lower_expr(ctx.required(node, "value")?)?;
        let body = self.lower_stmt(ctx.required(node, "body")?)?;
        Ok(Stmt::For(
            ctx.token_of(node, "for"),
            ForHeader::Each(pat, ctx.token_of(node, ":"), value),
            Box::new(body),
        ))
    }

    fn lower_try(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let body = self.lower_stmt(ctx.required(node, "body")?)?;
        let mut catches = Vec::new();
        let mut finally = None;
        for child in named_children(node) {
            match child.kind() {
                "catch_clause" => catches.push(self.lower_catch(child)?),
                "finally_clause" => {
                    finally = Some(Finally {
                        tok: ctx.token_of(child, "finally"),
                        body: self.lower_stmt(ctx.first_named(child)?)?,
                    })
                }
                _ => {}
            }
        }
        Ok(Stmt::Try(
            ctx.token_of(node, "try"),
            Box::new(body),
            catches,
            finally.map(Box::new),
        ))
    }

    /// `catch (A | B e)`: the union type becomes a `TyOr` chain.
    fn lower_catch(&self, node: Node) -> Result<Catch> {
        let ctx = &self.ctx;
        let param = find_kind(node, "catch_formal_parameter")
            .ok_or_else(|| ctx.malformed(node, "catch without a parameter"))?;
        let catch_type = find_kind(param, "catch_type")
            .ok_or_else(|| ctx.malformed(param, "catch without a type"))?;
        let mut types = named_children(catch_type).into_iter();
        let first = types
            .next()
            .ok_or_else(|| ctx.malformed(catch_type, "empty catch type"))?;
        let mut ty = self.lower_type(first)?;
        for alt in types {
            ty = Type::TyOr(Box::new(ty), Token::fake("|"), Box::new(self.lower_type(alt)?));
        }
        let pat = match param.child_by_field_name("name") {
            Some(name) => Pattern::PatVar(ty, Some((ctx.ident(name), IdInfoCell::new()))),
            None => Pattern::PatType(ty),
        };
        Ok(Catch {
            tok: ctx.token_of(node, "catch"),
            pat,
            body: self.lower_stmt(ctx.required(node, "body")?)?,
        })
    }

    /// Resources of a try-with-resources; declarations bind through typed patterns.
    fn lower_resources(&self, node: Node) -> Result<Option<Expr>> {
        let ctx = &self.ctx;
        let mut items = Vec::new();
        for resource in named_children(node) {
            if resource.kind() != "resource" {
                continue;
            }
            let item = match resource.child_by_field_name("value") {
                Some(value) => {
                    let ty = self.lower_type(ctx.required(resource, "type")?)?;
                    let name = ctx.ident(ctx.required(resource, "name")?);
                    Expr::LetPattern(
                        Box::new(Pattern::PatVar(ty, Some((name, IdInfoCell::new())))),
                        Box::new(self.lower_expr(value)?),
                    )
                }
                None => self.lower_expr(ctx.first_named(resource)?)?,
            };
            items.push(item);
        }
        Ok(match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Expr::Seq(items)),
        })
    }

    pub(super) fn lower_switch(&self, node: Node) -> Result<Stmt> {
        let ctx = &self.ctx;
        let cond = self.lower_expr(ctx.required(node, "condition")?)?;
        let mut arms = Vec::new();
        for group in named_children(ctx.required(node, "body")?) {
            match group.kind() {
                "switch_block_statement_group" => {
                    let mut cases = Vec::new();
                    let mut body = Vec::new();
                    for child in named_children(group) {
                        if child.kind() == "switch_label" {
                            cases.extend(self.lower_switch_label(child)?);
                        } else {
                            self.lower_stmt_into(child, &mut body)?;
                        }
                    }
                    arms.push(CaseAndBody {
                        cases,
                        body: Stmt::fake_block(body),
                    });
                }
                "switch_rule" => {
                    let mut cases = Vec::new();
                    let mut body = None;
                    for child in named_children(group) {
                        if child.kind() == "switch_label" {
                            cases.extend(self.lower_switch_label(child)?);
                        } else {
                            body = Some(self.lower_stmt(child)?);
                        }
                    }
                    let body =
                        body.ok_or_else(|| ctx.malformed(group, "switch rule without a body"))?;
                    arms.push(CaseAndBody { cases, body });
                }
                _ => {}
            }
        }
        Ok(Stmt::Switch(ctx.token_of(node, "switch"), Some(cond), arms))
    }

    /// `case A, B`, `case Point(int x, int y) when x > 0`, `default`
    fn lower_switch_label(&self, node: Node) -> Result<Vec<Case>> {
        let ctx = &self.ctx;
        let Some(case_tok) = find_anon(node, "case").map(|t| ctx.tok(t)) else {
            return Ok(vec![Case::Default(ctx.token_of(node, "default"))]);
        };
        let mut cases = Vec::new();
        let mut guard = None;
        for child in named_children(node) {
            match child.kind() {
                "guard" => guard = Some(self.lower_expr(ctx.first_named(child)?)?),
                "pattern" | "type_pattern" | "record_pattern" => {
                    cases.push(Case::Case(case_tok.clone(), self.lower_pattern(child)?))
                }
                _ => cases.push(Case::CaseEqualExpr(case_tok.clone(), self.lower_expr(child)?)),
            }
        }
        if let Some(guard) = guard {
            cases = cases
                .into_iter()
                .map(|case| match case {
                    Case::Case(tok, pat) => {
                        Case::Case(tok, Pattern::PatWhen(Box::new(pat), guard.clone()))
                    }
                    other => other,
                })
                .collect();
        }
        Ok(cases)
    }

    /// Type and record patterns of `instanceof` and `case` labels.
    pub(super) fn lower_pattern(&self, node: Node) -> Result<Pattern> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "pattern" | "record_pattern_component" if named_children(node).len() == 1 => {
                self.lower_pattern(ctx.first_named(node)?)?
            }
            "type_pattern" | "record_pattern_component" => {
                let parts: Vec<Node> = named_children(node)
                    .into_iter()
                    .filter(|c| !is_annotation(*c) && c.kind() != "modifiers")
                    .collect();
                match parts.as_slice() {
                    [ty, name] => Pattern::PatVar(
                        self.lower_type(*ty)?,
                        Some((ctx.ident(*name), IdInfoCell::new())),
                    ),
                    [ty] => Pattern::PatType(self.lower_type(*ty)?),
                    _ => return Err(ctx.malformed(node, "expected a type and a name")),
                }
            }
            "record_pattern" => {
                let parts = named_children(node);
                let Some((body, head)) = parts.split_last() else {
                    return Err(ctx.malformed(node, "empty record pattern"));
                };
                let head = head
                    .first()
                    .ok_or_else(|| ctx.malformed(node, "record pattern without a type"))?;
                let name = name_of_ids_with_targs(ctx.language, self.type_segments(*head)?)?;
                let mut subs = Vec::new();
                for component in named_children(*body) {
                    subs.push(self.lower_pattern(component)?);
                }
                Pattern::PatConstructor(name, subs)
            }
            "underscore_pattern" => Pattern::PatUnderscore(ctx.tok(node)),
            kind => {
                ctx.unsupported("pattern", node);
                Pattern::todo(kind, self.lower_children_any(node)?)
            }
        })
    }
}
