//! Expression tree types

use std::collections::BTreeSet;
use std::fmt;
use vellum_core::{CellValue, Coordinate, ValueKind};

/// The closed set of computable operations
///
/// Each member declares its name, arity, and a usage pattern for error
/// messages. Unknown names and arity mismatches are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    Pow,
    Concat,
    Sub,
    Abs,
    Ref,
}

impl Operation {
    /// Every member of the operator set, in declaration order
    pub const ALL: [Operation; 10] = [
        Operation::Plus,
        Operation::Minus,
        Operation::Times,
        Operation::Divide,
        Operation::Mod,
        Operation::Pow,
        Operation::Concat,
        Operation::Sub,
        Operation::Abs,
        Operation::Ref,
    ];

    /// Look up an operation by name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    /// Canonical (upper-case) operator name
    pub fn name(self) -> &'static str {
        match self {
            Operation::Plus => "PLUS",
            Operation::Minus => "MINUS",
            Operation::Times => "TIMES",
            Operation::Divide => "DIVIDE",
            Operation::Mod => "MOD",
            Operation::Pow => "POW",
            Operation::Concat => "CONCAT",
            Operation::Sub => "SUB",
            Operation::Abs => "ABS",
            Operation::Ref => "REF",
        }
    }

    /// Number of arguments the operation takes
    pub fn arity(self) -> usize {
        match self {
            Operation::Abs | Operation::Ref => 1,
            Operation::Sub => 3,
            _ => 2,
        }
    }

    /// Usage pattern shown in arity and operand-type errors
    pub fn usage(self) -> &'static str {
        match self {
            Operation::Plus => "{PLUS,<numeric>,<numeric>}",
            Operation::Minus => "{MINUS,<numeric>,<numeric>}",
            Operation::Times => "{TIMES,<numeric>,<numeric>}",
            Operation::Divide => "{DIVIDE,<numeric>,<numeric>}",
            Operation::Mod => "{MOD,<numeric>,<numeric>}",
            Operation::Pow => "{POW,<numeric>,<numeric>}",
            Operation::Concat => "{CONCAT,<text>,<text>}",
            Operation::Sub => "{SUB,<text>,<numeric start>,<numeric length>}",
            Operation::Abs => "{ABS,<numeric>}",
            Operation::Ref => "{REF,<coordinate>}",
        }
    }

    /// The names of every supported operation, for error listings
    pub fn supported_names() -> Vec<&'static str> {
        Self::ALL.into_iter().map(Operation::name).collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    Pow,
    Concat,
}

impl BinaryOp {
    /// The operator-set member this binary op belongs to
    pub fn operation(self) -> Operation {
        match self {
            BinaryOp::Plus => Operation::Plus,
            BinaryOp::Minus => Operation::Minus,
            BinaryOp::Times => Operation::Times,
            BinaryOp::Divide => Operation::Divide,
            BinaryOp::Mod => Operation::Mod,
            BinaryOp::Pow => Operation::Pow,
            BinaryOp::Concat => Operation::Concat,
        }
    }
}

/// A parsed, not-yet-evaluated cell expression
///
/// Immutable once built; operand sub-expressions are owned exclusively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value (number, text, boolean, or empty)
    Literal(CellValue),

    /// Reference to another cell's effective value
    Ref(Coordinate),

    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Absolute value
    Abs(Box<Expr>),

    /// Substring: `source` from 1-based `start`, `length` characters
    Sub {
        source: Box<Expr>,
        start: Box<Expr>,
        length: Box<Expr>,
    },
}

impl Expr {
    /// The statically-declared result kind, where determinable
    ///
    /// References resolve dynamically, so they declare nothing.
    pub fn declared_kind(&self) -> Option<ValueKind> {
        match self {
            Expr::Literal(v) => Some(v.kind()),
            Expr::Ref(_) => None,
            Expr::Binary { op, .. } => match op {
                BinaryOp::Concat => Some(ValueKind::Text),
                _ => Some(ValueKind::Number),
            },
            Expr::Abs(_) => Some(ValueKind::Number),
            Expr::Sub { .. } => Some(ValueKind::Text),
        }
    }

    /// Every coordinate referenced anywhere in this tree
    pub fn references(&self) -> BTreeSet<Coordinate> {
        let mut refs = BTreeSet::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references(&self, refs: &mut BTreeSet<Coordinate>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Ref(coordinate) => {
                refs.insert(*coordinate);
            }
            Expr::Binary { left, right, .. } => {
                left.collect_references(refs);
                right.collect_references(refs);
            }
            Expr::Abs(operand) => operand.collect_references(refs),
            Expr::Sub {
                source,
                start,
                length,
            } => {
                source.collect_references(refs);
                start.collect_references(refs);
                length.collect_references(refs);
            }
        }
    }
}
