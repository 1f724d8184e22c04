//! Python support: tree-sitter-python trees normalized into the generic AST.

pub mod frontend;
mod lower;
pub mod parser;

pub use frontend::PyFrontend;
pub use lower::{normalize, normalize_fragment, normalize_with};
pub use parser::PyParser;

#[cfg(test)]
mod tests;
