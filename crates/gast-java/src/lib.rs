//! Java support: tree-sitter-java trees normalized into the generic AST.

pub mod frontend;
mod lower;
pub mod parser;

pub use frontend::JavaFrontend;
pub use lower::{normalize, normalize_fragment, normalize_with};
pub use parser::JavaParser;

#[cfg(test)]
mod tests;
