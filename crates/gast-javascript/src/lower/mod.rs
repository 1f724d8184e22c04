//! Lowering of tree-sitter-javascript trees into the generic AST.
//!
//! One `lower_*` method per syntactic category. Node kinds without a dedicated
//! lowering become the category's `Other*` variant tagged with the node kind.

mod decl;
mod expr;
mod pattern;
mod stmt;

use std::path::Path;

use gast_core::ast::{Any, Program, Stmt, Token};
use gast_core::config::NormalizeConfig;
use gast_core::error::Result;
use gast_core::ts::{self, named_children, SourceCtx};
use gast_core::Language;
use tree_sitter::{Node, Tree};

pub(crate) struct Normalizer<'s> {
    ctx: SourceCtx<'s>,
}

/// Normalize a whole file with settings from the environment.
pub fn normalize(tree: &Tree, source: &str, path: Option<&Path>) -> Result<Program> {
    normalize_with(tree, source, path, NormalizeConfig::default())
}

pub fn normalize_with(
    tree: &Tree,
    source: &str,
    path: Option<&Path>,
    config: NormalizeConfig,
) -> Result<Program> {
    let ctx = SourceCtx::new(Language::JavaScript, source, path).with_config(config);
    ts::check_syntax(tree, &ctx)?;
    Normalizer { ctx }.lower_program(tree.root_node())
}

/// Normalize a snippet: a lone expression statement yields the expression, a
/// lone statement the statement, anything else the statement list.
pub fn normalize_fragment(tree: &Tree, source: &str) -> Result<Any> {
    let mut stmts = normalize(tree, source, None)?;
    if stmts.len() != 1 {
        return Ok(Any::Ss(stmts));
    }
    Ok(match stmts.remove(0) {
        Stmt::ExprStmt(e, _) => Any::E(e),
        stmt => Any::S(stmt),
    })
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement") || kind.ends_with("_declaration") || kind == "statement_block"
}

impl<'s> Normalizer<'s> {
    fn lower_program(&self, root: Node) -> Result<Program> {
        let mut out = Vec::new();
        for child in named_children(root) {
            self.lower_stmt_into(child, &mut out)?;
        }
        Ok(out)
    }

    /// Lower a node of unknown category for an escape-hatch payload.
    fn lower_any(&self, node: Node) -> Result<Any> {
        if is_statement_kind(node.kind()) {
            Ok(Any::S(self.lower_stmt(node)?))
        } else {
            Ok(Any::E(self.lower_expr(node)?))
        }
    }

    fn lower_children_any(&self, node: Node) -> Result<Vec<Any>> {
        named_children(node)
            .into_iter()
            .map(|child| self.lower_any(child))
            .collect()
    }

    /// `;` of a statement; automatic semicolon insertion leaves a fake one.
    fn semicolon(&self, node: Node) -> Token {
        self.ctx.token_of(node, ";")
    }
}
