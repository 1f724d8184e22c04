//! Parser wrapper around `tree-sitter-javascript`.

use eyre::{eyre, Result};
use tree_sitter::{Parser as TsParser, Tree};

/// Owns a tree-sitter parser with the JavaScript grammar loaded.
pub struct JsParser {
    parser: TsParser,
}

impl JsParser {
    pub fn new() -> Result<Self> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|err| eyre!("Failed to load tree-sitter JavaScript grammar: {err}"))?;
        Ok(Self { parser })
    }

    pub fn parse_str(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| eyre!("failed to parse JavaScript source"))
    }
}
