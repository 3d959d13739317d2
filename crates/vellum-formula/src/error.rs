//! Formula error types

use crate::ast::Operation;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Unbalanced `{`/`}` nesting
    #[error("malformed formula '{0}': unbalanced braces")]
    MalformedFormula(String),

    /// Operator name outside the closed operator set
    #[error("unknown operation '{name}'; supported operations: {}", .supported.join(", "))]
    UnknownOperation {
        name: String,
        supported: Vec<&'static str>,
    },

    /// Wrong number of arguments for an operator
    #[error("wrong number of arguments for {operation}: got {} [{}]; usage: {usage}", .received.len(), .received.join(", "))]
    ArityMismatch {
        operation: Operation,
        received: Vec<String>,
        usage: &'static str,
    },

    /// An operand whose type fails the operator's requirement
    #[error("invalid operand types for {operation}: [{}]; usage: {}", .operands.join(", "), .operation.usage())]
    InvalidOperandType {
        operation: Operation,
        operands: Vec<String>,
    },

    /// DIVIDE with a zero divisor
    #[error("division by zero")]
    DivisionByZero,

    /// A `{REF, ...}` token that is not a usable coordinate
    #[error(transparent)]
    Coordinate(#[from] vellum_core::Error),
}
