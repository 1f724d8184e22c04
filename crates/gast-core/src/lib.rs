#[macro_use]
pub mod macros;

pub mod ast;
pub mod config;
pub mod dump;
pub mod error;
pub mod fold;
pub mod frontend;
pub mod lang;
pub mod ts;
pub mod utils;
pub mod visit;

// Re-export commonly used items for convenience
pub use tracing;

pub use frontend::{FrontendResult, FrontendSnapshot, LanguageFrontend};
pub use lang::Language;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
