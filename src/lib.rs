#![warn(clippy::disallowed_types)]

pub use ast::{BinaryOperator, Expr};
pub use error::{ErrorKind, FormulaError, Span};
pub use parser::{ParsedFormula, MAX_NESTING_DEPTH};
pub use symbols::*;
pub use truth_table::{TableConfig, TruthTable, TruthTableEntry, DEFAULT_MAX_VARIABLES};

pub mod ast;
pub mod entailment;
pub mod parser;
pub mod parser_io;
pub mod scanner;
pub mod truth_table;

mod error;
mod log;
mod symbols;
mod table_io;
