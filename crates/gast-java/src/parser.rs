//! Parser wrapper around `tree-sitter-java`.

use eyre::{eyre, Result};
use tree_sitter::{Parser as TsParser, Tree};

/// Owns a tree-sitter parser with the Java grammar loaded.
pub struct JavaParser {
    parser: TsParser,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|err| eyre!("Failed to load tree-sitter Java grammar: {err}"))?;
        Ok(Self { parser })
    }

    pub fn parse_str(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| eyre!("failed to parse Java source"))
    }
}
