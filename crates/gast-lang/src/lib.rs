//! One entry point over every language normalizer: pick the frontend for a
//! language or file, parse, and normalize to the generic AST.

mod registry;

use std::path::Path;
use std::sync::Arc;

use gast_core::ast::{Any, Program};
use gast_core::error::{Error, Result};
use gast_core::{Language, LanguageFrontend};
use gast_java::JavaFrontend;
use gast_javascript::JsFrontend;
use gast_python::PyFrontend;
use tracing::debug;
use tree_sitter::Tree;

pub use registry::FrontendRegistry;

/// The frontend normalizing `lang`, configured from the environment.
pub fn frontend_for(lang: Language) -> Arc<dyn LanguageFrontend> {
    match lang {
        Language::Java => Arc::new(JavaFrontend::new()),
        Language::JavaScript => Arc::new(JsFrontend::new()),
        Language::Python => Arc::new(PyFrontend::new()),
    }
}

/// Parse `source` with the tree-sitter grammar of `lang`.
pub fn parse_tree(lang: Language, source: &str) -> Result<Tree> {
    let tree = match lang {
        Language::Java => gast_java::JavaParser::new()?.parse_str(source)?,
        Language::JavaScript => gast_javascript::JsParser::new()?.parse_str(source)?,
        Language::Python => gast_python::PyParser::new()?.parse_str(source)?,
    };
    Ok(tree)
}

/// Normalize an already parsed tree. `tree` must come from the grammar of `lang`.
pub fn normalize(lang: Language, tree: &Tree, source: &str, path: Option<&Path>) -> Result<Program> {
    match lang {
        Language::Java => gast_java::normalize(tree, source, path),
        Language::JavaScript => gast_javascript::normalize(tree, source, path),
        Language::Python => gast_python::normalize(tree, source, path),
    }
}

pub fn normalize_source(lang: Language, source: &str, path: Option<&Path>) -> Result<Program> {
    Ok(frontend_for(lang).parse(source, path)?.ast)
}

/// Read and normalize a file, choosing the language from its extension.
pub fn normalize_file(path: &Path) -> Result<Program> {
    let lang = Language::from_path(path)
        .ok_or_else(|| Error::UnsupportedLanguage(path.display().to_string()))?;
    debug!("normalizing {} as {}", path.display(), lang);
    let source = std::fs::read_to_string(path)?;
    normalize_source(lang, &source, Some(path))
}

/// Normalize a snippet: a lone expression comes back as [`Any::E`], a lone
/// statement as [`Any::S`], anything else as [`Any::Ss`].
pub fn parse_fragment(lang: Language, source: &str) -> Result<Any> {
    let tree = parse_tree(lang, source)?;
    match lang {
        Language::Java => gast_java::normalize_fragment(&tree, source),
        Language::JavaScript => gast_javascript::normalize_fragment(&tree, source),
        Language::Python => gast_python::normalize_fragment(&tree, source),
    }
}

#[cfg(test)]
mod tests;
