//! Runtime: values, environments and the evaluator.

mod environment;
mod evaluator;
mod value;

pub use environment::Env;
pub use evaluator::{eval, quote_value, DefineBatch};
pub use value::{PairCell, Procedure, Value};
