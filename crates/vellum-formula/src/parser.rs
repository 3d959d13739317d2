//! Formula parser
//!
//! Turns raw cell text into an expression tree plus the set of coordinates
//! it references. The grammar has two layers: a `{OP, arg, ...}` function
//! form whose arguments are split at top-level commas using a brace-depth
//! counter, and a primitive layer (boolean, number, raw text) everything
//! else falls through to.

use crate::ast::{BinaryOp, Expr, Operation};
use crate::error::{FormulaError, FormulaResult};
use std::collections::BTreeSet;
use vellum_core::{CellValue, Coordinate};

/// A parsed formula: the expression tree and its declared references
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormula {
    /// The expression tree
    pub expr: Expr,
    /// Every coordinate the expression reads (its influence-from set)
    pub references: BTreeSet<Coordinate>,
}

/// Parse raw cell text into an expression and its reference set
///
/// The caller is expected to have trimmed surrounding whitespace; empty
/// text parses to an empty literal.
///
/// # Example
/// ```rust
/// use vellum_formula::parse_cell_text;
///
/// let parsed = parse_cell_text("{PLUS,1,2}").unwrap();
/// assert!(parsed.references.is_empty());
///
/// let parsed = parse_cell_text("{PLUS,{REF,A1},{REF,B2}}").unwrap();
/// assert_eq!(parsed.references.len(), 2);
/// ```
pub fn parse_cell_text(input: &str) -> FormulaResult<ParsedFormula> {
    let expr = parse_segment(input)?;
    let references = expr.references();
    Ok(ParsedFormula { expr, references })
}

/// Parse one segment: the whole input, or one argument of a function form
///
/// Shape detection (function form, boolean, number) works on the trimmed
/// segment; a fallthrough text literal keeps its verbatim spacing.
fn parse_segment(segment: &str) -> FormulaResult<Expr> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return Ok(Expr::Literal(CellValue::Empty));
    }

    let opens = trimmed.starts_with('{');
    let closes = trimmed.ends_with('}');
    if opens && closes {
        return parse_function(trimmed);
    }
    if opens || closes {
        return Err(FormulaError::MalformedFormula(trimmed.to_string()));
    }

    Ok(Expr::Literal(parse_primitive(segment, trimmed)))
}

fn parse_primitive(verbatim: &str, trimmed: &str) -> CellValue {
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return CellValue::Number(n);
    }
    CellValue::Text(verbatim.to_string())
}

/// Parse a `{OP, arg, ...}` function form (outer braces still present)
fn parse_function(input: &str) -> FormulaResult<Expr> {
    let content = &input[1..input.len() - 1];
    let parts = split_top_level(content, input)?;

    let Some((name_part, arg_parts)) = parts.split_first() else {
        return Err(FormulaError::UnknownOperation {
            name: String::new(),
            supported: Operation::supported_names(),
        });
    };

    let name = name_part.trim().to_uppercase();
    let operation =
        Operation::from_name(&name).ok_or_else(|| FormulaError::UnknownOperation {
            name,
            supported: Operation::supported_names(),
        })?;

    if arg_parts.len() != operation.arity() {
        return Err(FormulaError::ArityMismatch {
            operation,
            received: arg_parts.iter().map(|a| a.trim().to_string()).collect(),
            usage: operation.usage(),
        });
    }

    match operation {
        Operation::Plus => binary(BinaryOp::Plus, arg_parts),
        Operation::Minus => binary(BinaryOp::Minus, arg_parts),
        Operation::Times => binary(BinaryOp::Times, arg_parts),
        Operation::Divide => binary(BinaryOp::Divide, arg_parts),
        Operation::Mod => binary(BinaryOp::Mod, arg_parts),
        Operation::Pow => binary(BinaryOp::Pow, arg_parts),
        Operation::Concat => binary(BinaryOp::Concat, arg_parts),
        Operation::Sub => Ok(Expr::Sub {
            source: Box::new(parse_segment(&arg_parts[0])?),
            start: Box::new(parse_segment(&arg_parts[1])?),
            length: Box::new(parse_segment(&arg_parts[2])?),
        }),
        Operation::Abs => Ok(Expr::Abs(Box::new(parse_segment(&arg_parts[0])?))),
        Operation::Ref => {
            let coordinate = Coordinate::parse(arg_parts[0].trim())?;
            Ok(Expr::Ref(coordinate))
        }
    }
}

fn binary(op: BinaryOp, args: &[String]) -> FormulaResult<Expr> {
    Ok(Expr::Binary {
        op,
        left: Box::new(parse_segment(&args[0])?),
        right: Box::new(parse_segment(&args[1])?),
    })
}

/// Split function content at top-level commas
///
/// Scans left to right keeping a `{`/`}` nesting depth; commas only
/// separate arguments at depth zero, so nested function forms travel as
/// one segment. Depth underflow or a non-zero final depth means the
/// braces don't balance.
fn split_top_level(content: &str, original: &str) -> FormulaResult<Vec<String>> {
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut depth = 0usize;

    for c in content.chars() {
        match c {
            '{' => {
                depth += 1;
                buffer.push(c);
            }
            '}' => {
                if depth == 0 {
                    return Err(FormulaError::MalformedFormula(original.to_string()));
                }
                depth -= 1;
                buffer.push(c);
            }
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut buffer));
            }
            _ => buffer.push(c),
        }
    }

    if depth != 0 {
        return Err(FormulaError::MalformedFormula(original.to_string()));
    }

    if !buffer.is_empty() {
        parts.push(buffer);
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expr(input: &str) -> Expr {
        parse_cell_text(input).unwrap().expr
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(expr(""), Expr::Literal(CellValue::Empty));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(expr("42"), Expr::Literal(CellValue::Number(42.0)));
        assert_eq!(expr("3.14"), Expr::Literal(CellValue::Number(3.14)));
        assert_eq!(expr("-7"), Expr::Literal(CellValue::Number(-7.0)));
        assert_eq!(expr("1e3"), Expr::Literal(CellValue::Number(1000.0)));
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(expr("true"), Expr::Literal(CellValue::Boolean(true)));
        assert_eq!(expr("FALSE"), Expr::Literal(CellValue::Boolean(false)));
        assert_eq!(expr("True"), Expr::Literal(CellValue::Boolean(true)));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(expr("hello"), Expr::Literal(CellValue::Text("hello".into())));
        // Not quite a number or boolean
        assert_eq!(expr("12a"), Expr::Literal(CellValue::Text("12a".into())));
        assert_eq!(expr("truey"), Expr::Literal(CellValue::Text("truey".into())));
    }

    #[test]
    fn test_parse_function_form() {
        let e = expr("{PLUS,1,2}");
        assert_eq!(
            e,
            Expr::Binary {
                op: BinaryOp::Plus,
                left: Box::new(Expr::Literal(CellValue::Number(1.0))),
                right: Box::new(Expr::Literal(CellValue::Number(2.0))),
            }
        );
    }

    #[test]
    fn test_operator_name_case_and_padding() {
        assert_eq!(expr("{plus,1,2}"), expr("{PLUS,1,2}"));
        assert_eq!(expr("{ Plus ,1,2}"), expr("{PLUS,1,2}"));
    }

    #[test]
    fn test_nested_function() {
        let e = expr("{PLUS,{TIMES,2,3},4}");
        if let Expr::Binary { op, left, right } = e {
            assert_eq!(op, BinaryOp::Plus);
            assert!(matches!(
                *left,
                Expr::Binary {
                    op: BinaryOp::Times,
                    ..
                }
            ));
            assert_eq!(*right, Expr::Literal(CellValue::Number(4.0)));
        } else {
            panic!("Expected Binary");
        }
    }

    #[test]
    fn test_deeply_nested_argument_travels_whole() {
        // The inner commas must not split the outer argument list
        let e = expr("{CONCAT,{SUB,hello world,1,5},!}");
        if let Expr::Binary { op, left, .. } = e {
            assert_eq!(op, BinaryOp::Concat);
            assert!(matches!(*left, Expr::Sub { .. }));
        } else {
            panic!("Expected Binary");
        }
    }

    #[test]
    fn test_parse_ref() {
        let e = expr("{REF,B3}");
        let coordinate = Coordinate::parse("B3").unwrap();
        assert_eq!(e, Expr::Ref(coordinate));

        // Padding and case both tolerated
        assert_eq!(expr("{REF, b3}"), Expr::Ref(coordinate));
    }

    #[test]
    fn test_reference_extraction() {
        let parsed = parse_cell_text("{PLUS,{REF,A1},{TIMES,{REF,B2},{REF,A1}}}").unwrap();
        let expected: BTreeSet<Coordinate> = ["A1", "B2"]
            .iter()
            .map(|s| Coordinate::parse(s).unwrap())
            .collect();
        assert_eq!(parsed.references, expected);
    }

    #[test]
    fn test_unknown_operation() {
        let err = parse_cell_text("{SUM,1,2}").unwrap_err();
        match err {
            FormulaError::UnknownOperation { name, supported } => {
                assert_eq!(name, "SUM");
                assert!(supported.contains(&"PLUS"));
                assert_eq!(supported.len(), 10);
            }
            other => panic!("Expected UnknownOperation, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_braces_is_unknown_operation() {
        assert!(matches!(
            parse_cell_text("{}"),
            Err(FormulaError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = parse_cell_text("{PLUS,1}").unwrap_err();
        match err {
            FormulaError::ArityMismatch {
                operation,
                received,
                usage,
            } => {
                assert_eq!(operation, Operation::Plus);
                assert_eq!(received, vec!["1".to_string()]);
                assert_eq!(usage, "{PLUS,<numeric>,<numeric>}");
            }
            other => panic!("Expected ArityMismatch, got {:?}", other),
        }

        assert!(matches!(
            parse_cell_text("{ABS,1,2}"),
            Err(FormulaError::ArityMismatch { .. })
        ));
        assert!(matches!(
            parse_cell_text("{SUB,abc,1}"),
            Err(FormulaError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_braces() {
        assert!(matches!(
            parse_cell_text("{PLUS,1,2"),
            Err(FormulaError::MalformedFormula(_))
        ));
        assert!(matches!(
            parse_cell_text("{PLUS,{REF,A1,2}"),
            Err(FormulaError::MalformedFormula(_))
        ));
        assert!(matches!(
            parse_cell_text("{PLUS,}1{,2}"),
            Err(FormulaError::MalformedFormula(_))
        ));
    }

    #[test]
    fn test_ref_bad_coordinate() {
        assert!(matches!(
            parse_cell_text("{REF,banana}"),
            Err(FormulaError::Coordinate(
                vellum_core::Error::MalformedCoordinate(_)
            ))
        ));
        assert!(matches!(
            parse_cell_text("{REF,A51}"),
            Err(FormulaError::Coordinate(
                vellum_core::Error::OutOfBounds { .. }
            ))
        ));
    }

    #[test]
    fn test_text_argument_keeps_verbatim_spacing() {
        let e = expr("{CONCAT, ab,cd}");
        if let Expr::Binary { left, right, .. } = e {
            assert_eq!(*left, Expr::Literal(CellValue::Text(" ab".into())));
            assert_eq!(*right, Expr::Literal(CellValue::Text("cd".into())));
        } else {
            panic!("Expected Binary");
        }
    }

    #[test]
    fn test_numeric_argument_tolerates_padding() {
        let e = expr("{PLUS, 1, 2}");
        if let Expr::Binary { left, right, .. } = e {
            assert_eq!(*left, Expr::Literal(CellValue::Number(1.0)));
            assert_eq!(*right, Expr::Literal(CellValue::Number(2.0)));
        } else {
            panic!("Expected Binary");
        }
    }
}
