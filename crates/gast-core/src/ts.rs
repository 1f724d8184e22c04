//! Shared plumbing for normalizers that read tree-sitter trees.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use tree_sitter::{Node, Tree};

use crate::ast::{Ident, Location, Token, Wrap};
use crate::config::NormalizeConfig;
use crate::error::{Error, Result};
use crate::frontend::{describe_source, FrontendSnapshot};
use crate::lang::Language;

/// File name recorded in tokens when the source has no path.
pub const NO_FILE: &str = "<stdin>";

/// Source text plus everything needed to turn tree-sitter nodes into tokens.
#[derive(Debug, Clone)]
pub struct SourceCtx<'s> {
    pub source: &'s str,
    pub file: Arc<str>,
    pub language: Language,
    pub config: NormalizeConfig,
}

impl<'s> SourceCtx<'s> {
    pub fn new(language: Language, source: &'s str, path: Option<&Path>) -> Self {
        let file: Arc<str> = match path {
            Some(path) => Arc::from(path.display().to_string()),
            None => Arc::from(NO_FILE),
        };
        Self {
            source,
            file,
            language,
            config: NormalizeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: NormalizeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn text(&self, node: Node) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    pub fn location(&self, node: Node) -> Location {
        let start = node.start_position();
        Location {
            str: self.text(node).to_string(),
            charpos: node.start_byte(),
            line: start.row + 1,
            column: start.column,
            file: self.file.clone(),
        }
    }

    pub fn tok(&self, node: Node) -> Token {
        Token::Origin(self.location(node))
    }

    pub fn ident(&self, node: Node) -> Ident {
        Wrap::new(self.text(node).to_string(), self.tok(node))
    }

    /// Token of the first unnamed child spelled `text`, or a fake one.
    pub fn token_of(&self, node: Node, text: &str) -> Token {
        match find_anon(node, text) {
            Some(child) => self.tok(child),
            None => Token::fake(text),
        }
    }

    /// Like [`SourceCtx::token_of`], trying each spelling in turn.
    pub fn token_of_any(&self, node: Node, texts: &[&str]) -> Token {
        texts
            .iter()
            .find_map(|text| find_anon(node, text))
            .map(|child| self.tok(child))
            .unwrap_or_else(|| Token::fake(texts.first().copied().unwrap_or_default()))
    }

    /// A field the grammar guarantees.
    pub fn required<'t>(&self, node: Node<'t>, field: &str) -> Result<Node<'t>> {
        node.child_by_field_name(field).ok_or_else(|| {
            Error::malformed(
                self.language,
                node.kind(),
                format!("missing field `{field}`"),
            )
        })
    }

    /// The first named child, for nodes the grammar guarantees one.
    pub fn first_named<'t>(&self, node: Node<'t>) -> Result<Node<'t>> {
        named_children(node).into_iter().next().ok_or_else(|| {
            Error::malformed(self.language, node.kind(), "expected a child node")
        })
    }

    pub fn malformed(&self, node: Node, detail: impl Into<String>) -> Error {
        Error::malformed(self.language, node.kind(), detail)
    }

    /// Note a node kind the normalizer has no dedicated lowering for.
    pub fn unsupported(&self, category: &str, node: Node) {
        debug!(
            language = %self.language,
            category,
            kind = node.kind(),
            line = node.start_position().row + 1,
            "unsupported node kind, using escape hatch"
        );
    }
}

/// Named children, comments and other extras left out.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// All children, anonymous ones included, extras left out.
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

pub fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Children with the field name they sit under, if any.
pub fn children_with_fields<'t>(node: Node<'t>) -> Vec<(Option<&'static str>, Node<'t>)> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if !child.is_extra() {
                out.push((cursor.field_name(), child));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    out
}

pub fn find_anon<'t>(node: Node<'t>, text: &str) -> Option<Node<'t>> {
    children(node)
        .into_iter()
        .find(|child| !child.is_named() && child.kind() == text)
}

pub fn find_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    children(node).into_iter().find(|child| child.kind() == kind)
}

pub fn has_anon(node: Node, text: &str) -> bool {
    find_anon(node, text).is_some()
}

/// First `ERROR` or missing node, in document order.
pub fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

/// Reject trees with syntax errors, unless lossy mode accepts them.
pub fn check_syntax(tree: &Tree, ctx: &SourceCtx) -> Result<()> {
    let Some(err) = first_error(tree.root_node()) else {
        return Ok(());
    };
    let pos = err.start_position();
    let message = if err.is_missing() {
        format!(
            "missing `{}` at {}:{}:{}",
            err.kind(),
            ctx.file,
            pos.row + 1,
            pos.column
        )
    } else {
        let text: String = ctx.text(err).chars().take(40).collect();
        format!(
            "unexpected `{}` at {}:{}:{}",
            text,
            ctx.file,
            pos.row + 1,
            pos.column
        )
    };
    if ctx.config.lossy {
        warn!(language = %ctx.language, "{message}; continuing in lossy mode");
        Ok(())
    } else {
        Err(Error::parse(ctx.language, message))
    }
}

pub fn snapshot(tree: &Tree, language: Language, path: Option<&Path>) -> FrontendSnapshot {
    FrontendSnapshot {
        language,
        description: describe_source(language, path),
        serialized: Some(tree.root_node().to_sexp()),
    }
}

/// Strip one layer of matching quotes (`"`, `'`, backtick, or a tripled one).
pub fn unquote(text: &str) -> &str {
    for quote in ["\"\"\"", "'''", "\"", "'", "`"] {
        if text.len() >= 2 * quote.len() && text.starts_with(quote) && text.ends_with(quote) {
            return &text[quote.len()..text.len() - quote.len()];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_one_layer() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"\"\"doc\"\"\""), "doc");
        assert_eq!(unquote("``"), "");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\""), "\"");
    }
}
