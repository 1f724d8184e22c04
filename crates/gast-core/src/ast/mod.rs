//! The generic AST.
//!
//! One enum per syntactic family ([`Expr`], [`Stmt`], [`Pattern`], [`Type`],
//! [`Definition`], [`Directive`]) plus [`Any`], the sum of all of them. Families
//! refer to each other through boxed fields. Constructs a normalizer does not
//! model go into the `Other*` variant of their family: a tag plus a payload of
//! [`Any`] values.
//!
//! Doc comments use two conventions: *newvar* marks positions that introduce a
//! binding, *newscope* marks constructs that open a scope.

mod any;
mod def;
mod directive;
mod expr;
mod ident;
mod pat;
mod stmt;
mod tok;
mod ty;

pub use any::*;
pub use def::*;
pub use directive::*;
pub use expr::*;
pub use ident::*;
pub use pat::*;
pub use stmt::*;
pub use tok::*;
pub use ty::*;
