//! Expression evaluation
//!
//! A pure, recursive function from an expression tree to a value. The only
//! outside input is a [`ValueLookup`], which supplies other cells' current
//! effective values for `REF` operands; evaluation never re-walks another
//! cell's expression and never mutates anything (the write path owns
//! recomputation ordering).

use crate::ast::{BinaryOp, Expr, Operation};
use crate::error::{FormulaError, FormulaResult};
use vellum_core::{CellValue, Coordinate};

/// Lookup of a cell's current effective value by coordinate
///
/// `None` means the coordinate is unoccupied, which reads as
/// [`CellValue::Empty`].
pub trait ValueLookup {
    fn effective_value(&self, coordinate: Coordinate) -> Option<CellValue>;
}

/// A lookup over no cells at all; every reference resolves to `Empty`
pub struct EmptyContext;

impl ValueLookup for EmptyContext {
    fn effective_value(&self, _coordinate: Coordinate) -> Option<CellValue> {
        None
    }
}

/// Evaluate an expression against the given cell lookup
///
/// Operator nodes evaluate their operands first, then type-check, then
/// compute.
pub fn evaluate(expr: &Expr, cells: &dyn ValueLookup) -> FormulaResult<CellValue> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),

        Expr::Ref(coordinate) => Ok(cells
            .effective_value(*coordinate)
            .unwrap_or(CellValue::Empty)),

        Expr::Binary { op, left, right } => {
            let left = evaluate(left, cells)?;
            let right = evaluate(right, cells)?;
            apply_binary(*op, &left, &right)
        }

        Expr::Abs(operand) => {
            let value = evaluate(operand, cells)?;
            match value.as_number() {
                Some(n) => Ok(CellValue::Number(n.abs())),
                None => Err(invalid_operands(Operation::Abs, &[&value])),
            }
        }

        Expr::Sub {
            source,
            start,
            length,
        } => {
            let source = evaluate(source, cells)?;
            let start = evaluate(start, cells)?;
            let length = evaluate(length, cells)?;
            apply_sub(&source, &start, &length)
        }
    }
}

fn apply_binary(op: BinaryOp, left: &CellValue, right: &CellValue) -> FormulaResult<CellValue> {
    match op {
        BinaryOp::Plus => {
            let (a, b) = numeric_pair(op, left, right)?;
            Ok(CellValue::Number(a + b))
        }
        BinaryOp::Minus => {
            let (a, b) = numeric_pair(op, left, right)?;
            Ok(CellValue::Number(a - b))
        }
        BinaryOp::Times => {
            let (a, b) = numeric_pair(op, left, right)?;
            Ok(CellValue::Number(a * b))
        }
        BinaryOp::Divide => {
            let (a, b) = numeric_pair(op, left, right)?;
            if b == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            Ok(CellValue::Number(a / b))
        }
        BinaryOp::Mod => {
            let (a, b) = numeric_pair(op, left, right)?;
            Ok(CellValue::Number(a % b))
        }
        BinaryOp::Pow => {
            let (a, b) = numeric_pair(op, left, right)?;
            Ok(CellValue::Number(a.powf(b)))
        }
        BinaryOp::Concat => match (left.coerce_text(), right.coerce_text()) {
            (Some(a), Some(b)) => Ok(CellValue::Text(a + &b)),
            _ => Err(invalid_operands(Operation::Concat, &[left, right])),
        },
    }
}

fn numeric_pair(op: BinaryOp, left: &CellValue, right: &CellValue) -> FormulaResult<(f64, f64)> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(invalid_operands(op.operation(), &[left, right])),
    }
}

/// Substring: 1-based character start, non-negative character count
///
/// Fractional bounds truncate. A start past the end yields the empty
/// string; an over-long length clamps to the end.
fn apply_sub(source: &CellValue, start: &CellValue, length: &CellValue) -> FormulaResult<CellValue> {
    let operands: &[&CellValue] = &[source, start, length];

    let (Some(text), Some(start_n), Some(length_n)) =
        (source.as_text(), start.as_number(), length.as_number())
    else {
        return Err(invalid_operands(Operation::Sub, operands));
    };

    let start_n = start_n.trunc();
    let length_n = length_n.trunc();
    if !start_n.is_finite() || !length_n.is_finite() || start_n < 1.0 || length_n < 0.0 {
        return Err(invalid_operands(Operation::Sub, operands));
    }

    let skip = start_n as usize - 1;
    let take = length_n as usize;
    Ok(CellValue::Text(text.chars().skip(skip).take(take).collect()))
}

fn invalid_operands(operation: Operation, operands: &[&CellValue]) -> FormulaError {
    FormulaError::InvalidOperandType {
        operation,
        operands: operands
            .iter()
            .map(|v| format!("{} ({})", v, v.kind()))
            .collect(),
    }
}
