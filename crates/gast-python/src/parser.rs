//! Parser wrapper around `tree-sitter-python`.

use eyre::{eyre, Result};
use tree_sitter::{Parser as TsParser, Tree};

/// Owns a tree-sitter parser with the Python grammar loaded.
pub struct PyParser {
    parser: TsParser,
}

impl PyParser {
    pub fn new() -> Result<Self> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|err| eyre!("Failed to load tree-sitter Python grammar: {err}"))?;
        Ok(Self { parser })
    }

    pub fn parse_str(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| eyre!("failed to parse Python source"))
    }
}
