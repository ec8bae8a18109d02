// Matrix Module
// Declarative parameter matrices, Cartesian expansion and include/exclude filtering

pub mod expander;
pub mod filter;
pub mod models;
pub mod parser;

// Re-export key types
pub use expander::MatrixExpander;
pub use filter::{apply_exclude, apply_include, exclude_all, include_all};
pub use models::{Combination, FilterSpec, Matrix, MatrixDefinition, Value};
pub use parser::MatrixParser;
