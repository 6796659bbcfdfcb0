//! Reading for the interpreter
//!
//! Converts an input character stream into read syntax trees, one complete
//! form at a time.

mod reader;
mod syntax;

pub use reader::Reader;
pub use syntax::Syntax;
