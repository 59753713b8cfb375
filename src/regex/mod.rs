pub mod ast;
pub mod core;
pub mod desugar;
pub mod syntax;

pub use ast::Ast;
pub use core::{is_nullable, Core};
pub use syntax::escape;
