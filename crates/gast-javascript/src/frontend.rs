//! JavaScript frontend backed by tree-sitter-javascript.

use std::path::Path;

use gast_core::config::NormalizeConfig;
use gast_core::error::{Error as CoreError, Result as CoreResult};
use gast_core::frontend::{describe_source, FrontendResult, FrontendSnapshot, LanguageFrontend};
use gast_core::ts;
use gast_core::Language;
use tracing::debug;

use crate::lower::normalize_with;
use crate::parser::JsParser;

/// Frontend that converts JavaScript source code into the generic AST.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsFrontend {
    config: Option<NormalizeConfig>,
}

impl JsFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NormalizeConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl LanguageFrontend for JsFrontend {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn parse(&self, source: &str, path: Option<&Path>) -> CoreResult<FrontendResult> {
        let config = self.config.unwrap_or_default();
        let mut parser = JsParser::new().map_err(|err| CoreError::from(err.to_string()))?;
        let tree = parser
            .parse_str(source)
            .map_err(|err| CoreError::from(err.to_string()))?;
        let ast = normalize_with(&tree, source, path, config)?;
        debug!(
            "{}: {} top-level statements",
            describe_source(self.language(), path),
            ast.len()
        );

        let snapshot = if config.snapshot {
            ts::snapshot(&tree, self.language(), path)
        } else {
            FrontendSnapshot {
                language: self.language(),
                description: describe_source(self.language(), path),
                serialized: None,
            }
        };

        Ok(FrontendResult {
            ast,
            snapshot: Some(snapshot),
        })
    }
}
