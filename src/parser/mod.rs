//! Parser for Go template sources

pub mod ast;
mod grammar;
pub mod index;
pub mod lexer;
pub mod visit;

pub use ast::*;
pub use grammar::{parse_file, parse_type_expr};
pub use index::DeclIndex;
pub use visit::{VisitMut, Walk};
