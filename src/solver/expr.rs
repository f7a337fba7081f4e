//! Operators and Exact Integer Arithmetic
//!
//! The puzzle domain is integers: division is only legal when it is exact,
//! and division by zero is excluded before evaluation ever happens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An arithmetic operator combining two operands.
///
/// "No operator chosen yet" is represented as `Option<Operator>` at call
/// sites, never as an extra variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition
    Add,
    /// Subtraction (non-commutative: both orderings are distinct)
    Sub,
    /// Multiplication
    Mul,
    /// Exact division (non-commutative; fractional results are illegal)
    Div,
}

/// All operators, in the order the search tries them.
pub const OPERATORS: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

impl Operator {
    /// The operator's display symbol.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Whether `a op b` and `b op a` always agree.
    pub fn is_commutative(self) -> bool {
        matches!(self, Operator::Add | Operator::Mul)
    }

    /// Apply the operator to two integer operands.
    ///
    /// Returns `None` when the combination is illegal in the integer
    /// domain: division by zero, or division with a remainder.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operator::Add => a.checked_add(b),
            Operator::Sub => a.checked_sub(b),
            Operator::Mul => a.checked_mul(b),
            Operator::Div => {
                if b == 0 || a % b != 0 {
                    None
                } else {
                    Some(a / b)
                }
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Format one combination step as fully parenthesized text.
///
/// Raw dice render bare; every committed combination is wrapped, so the
/// reduction order is always recoverable from the string.
pub fn combine_text(a: &str, op: Operator, b: &str) -> String {
    format!("({}{}{})", a, op.symbol(), b)
}
