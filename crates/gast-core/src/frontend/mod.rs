use crate::ast::Program;
use crate::error::Result;
use crate::lang::Language;
use std::path::Path;

/// Snapshot of the language-specific tree a frontend normalized.
///
/// Records provenance as well as an optional serialised representation
/// (the parser's S-expression) that tooling can inspect next to the GAST.
#[derive(Debug, Clone)]
pub struct FrontendSnapshot {
    pub language: Language,
    pub description: String,
    pub serialized: Option<String>,
}

/// Result produced by a language frontend after normalising source code.
#[derive(Debug, Clone)]
pub struct FrontendResult {
    pub ast: Program,
    pub snapshot: Option<FrontendSnapshot>,
}

/// Trait implemented by every source-language frontend.
pub trait LanguageFrontend: Send + Sync {
    fn language(&self) -> Language;
    fn extensions(&self) -> &'static [&'static str] {
        self.language().extensions()
    }
    fn parse(&self, source: &str, path: Option<&Path>) -> Result<FrontendResult>;
}

/// `"<Language> source <path>"`, the snapshot description every frontend uses.
pub fn describe_source(language: Language, path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("{} source {}", language, path.display()),
        None => format!("{} source <stdin>", language),
    }
}
