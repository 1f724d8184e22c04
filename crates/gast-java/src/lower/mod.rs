//! Lowering of tree-sitter-java trees into the generic AST.

mod decl;
mod expr;
mod stmt;
mod types;

use std::path::Path;

use gast_core::ast::{Any, Program, Stmt};
use gast_core::config::NormalizeConfig;
use gast_core::error::Result;
use gast_core::ts::{self, named_children, SourceCtx};
use gast_core::Language;
use tree_sitter::{Node, Tree};

pub(crate) struct Normalizer<'s> {
    ctx: SourceCtx<'s>,
}

/// Normalize a whole compilation unit with settings from the environment.
pub fn normalize(tree: &Tree, source: &str, path: Option<&Path>) -> Result<Program> {
    normalize_with(tree, source, path, NormalizeConfig::default())
}

pub fn normalize_with(
    tree: &Tree,
    source: &str,
    path: Option<&Path>,
    config: NormalizeConfig,
) -> Result<Program> {
    let ctx = SourceCtx::new(Language::Java, source, path).with_config(config);
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

impl<'s> Normalizer<'s> {
    fn lower_program(&self, root: Node) -> Result<Program> {
        let mut out = Vec::new();
        for child in named_children(root) {
            self.lower_stmt_into(child, &mut out)?;
        }
        Ok(out)
    }

    fn lower_any(&self, node: Node) -> Result<Any> {
        let kind = node.kind();
        if kind.ends_with("_statement") || kind.ends_with("_declaration") || kind == "block" {
            Ok(Any::S(self.lower_stmt(node)?))
        } else if kind.ends_with("_type") || kind == "type_identifier" {
            Ok(Any::T(self.lower_type(node)?))
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
}
