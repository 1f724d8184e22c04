//! JavaScript support: tree-sitter-javascript trees normalized into the generic AST.

pub mod frontend;
mod lower;
pub mod parser;

pub use frontend::JsFrontend;
pub use lower::{normalize, normalize_fragment, normalize_with};
pub use parser::JsParser;

#[cfg(test)]
mod tests;
