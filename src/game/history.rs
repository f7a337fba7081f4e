//! Live Operands and Committed Formulas
//!
//! Tracks the reduction state of one round: which values are still
//! combinable ("live"), and the append-only log of committed combinations.
//! Each successful combination consumes exactly two live operands and
//! produces one, so an `n`-die roll is fully reduced after `n - 1`
//! commits. The round is solved precisely when one live operand remains
//! and it equals the target.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::dice::Roll;
use crate::solver::expr::{combine_text, Operator, OPERATORS};

/// Identity of a live operand.
///
/// Allocation is sequential and predictable: dice occupy `0..n` in roll
/// order, every commit allocates the next id for its result. External
/// mirrors (auto-players, the solver's plans) rely on this scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperandId(pub u32);

/// A combinable value: a raw die or the result of a prior combination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    /// Stable identity within the round.
    pub id: OperandId,
    /// Current integer value.
    pub value: i64,
    /// Fully parenthesized text of how this value was built.
    pub text: String,
}

/// One committed combination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Text of the combination, e.g. `((3+4)*2)`.
    pub formula_text: String,
    /// The value it produced.
    pub value: i64,
}

/// Contract violations raised by combination requests.
///
/// These indicate a desynchronized caller (the UI offered an operand that
/// is no longer live), so they are reported, never silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The operand is not currently live (already consumed or unknown).
    #[error("operand {0:?} is not live")]
    NotLive(OperandId),

    /// Both sides of the combination named the same operand.
    #[error("operand {0:?} cannot be combined with itself")]
    SameOperand(OperandId),

    /// The operator is illegal for the pair (zero or fractional division).
    #[error("{op} is not a legal combination for {left} and {right}")]
    IllegalOperation {
        /// Left operand value.
        left: i64,
        /// Right operand value.
        right: i64,
        /// The rejected operator.
        op: Operator,
    },
}

/// Reduction state of the current round.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormulaHistory {
    live: Vec<Operand>,
    entries: Vec<HistoryEntry>,
    next_id: u32,
}

impl FormulaHistory {
    /// Create an empty history; call `reset` before the round starts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the live set to the given roll and clear committed text.
    pub fn reset(&mut self, roll: &Roll) {
        self.live = roll
            .dice()
            .iter()
            .map(|d| Operand {
                id: OperandId(d.id.0 as u32),
                value: d.value,
                text: d.value.to_string(),
            })
            .collect();
        self.entries.clear();
        self.next_id = roll.len() as u32;
    }

    /// The operands still available for combination.
    pub fn live_operands(&self) -> &[Operand] {
        &self.live
    }

    /// Number of live operands.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Committed combinations, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Text of the latest committed combination; empty before the first.
    pub fn current_formula_text(&self) -> &str {
        self.entries
            .last()
            .map(|e| e.formula_text.as_str())
            .unwrap_or("")
    }

    /// Whether the round is solved: one live operand equal to the target.
    pub fn is_solved(&self, target: i64) -> bool {
        self.live.len() == 1 && self.live[0].value == target
    }

    /// The operators that may legally combine `a op b`, in trial order.
    ///
    /// Errors if either operand is not live or both name the same one.
    pub fn legal_operators(
        &self,
        a: OperandId,
        b: OperandId,
    ) -> Result<Vec<Operator>, HistoryError> {
        if a == b {
            return Err(HistoryError::SameOperand(a));
        }
        let left = self.find_live(a)?;
        let right = self.find_live(b)?;

        Ok(OPERATORS
            .into_iter()
            .filter(|op| op.apply(left.value, right.value).is_some())
            .collect())
    }

    /// Consume two live operands, commit `a op b`, and produce one new
    /// live operand holding the result.
    pub fn record_combination(
        &mut self,
        a: OperandId,
        b: OperandId,
        op: Operator,
    ) -> Result<&HistoryEntry, HistoryError> {
        if a == b {
            return Err(HistoryError::SameOperand(a));
        }
        let left = self.find_live(a)?.clone();
        let right = self.find_live(b)?.clone();

        let value = op
            .apply(left.value, right.value)
            .ok_or(HistoryError::IllegalOperation {
                left: left.value,
                right: right.value,
                op,
            })?;

        let text = combine_text(&left.text, op, &right.text);

        self.live.retain(|o| o.id != a && o.id != b);
        self.live.push(Operand {
            id: OperandId(self.next_id),
            value,
            text: text.clone(),
        });
        self.next_id += 1;

        self.entries.push(HistoryEntry {
            formula_text: text,
            value,
        });
        Ok(self.entries.last().expect("entry just pushed"))
    }

    fn find_live(&self, id: OperandId) -> Result<&Operand, HistoryError> {
        self.live
            .iter()
            .find(|o| o.id == id)
            .ok_or(HistoryError::NotLive(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(values: &[i64]) -> FormulaHistory {
        let mut history = FormulaHistory::new();
        history.reset(&Roll::from_values(values));
        history
    }

    #[test]
    fn test_reset_populates_live_set() {
        let history = fresh(&[1, 2, 3]);
        assert_eq!(history.live_count(), 3);
        assert_eq!(history.current_formula_text(), "");
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_combination_reduces_live_count_by_one() {
        let mut history = fresh(&[1, 2, 3]);
        history
            .record_combination(OperandId(0), OperandId(1), Operator::Add)
            .unwrap();
        assert_eq!(history.live_count(), 2);
        assert_eq!(history.current_formula_text(), "(1+2)");
    }

    #[test]
    fn test_full_reduction_leaves_one_live() {
        let mut history = fresh(&[1, 2, 3]);
        history
            .record_combination(OperandId(0), OperandId(1), Operator::Add)
            .unwrap();
        // The first commit allocated id 3 for (1+2).
        history
            .record_combination(OperandId(3), OperandId(2), Operator::Mul)
            .unwrap();

        assert_eq!(history.live_count(), 1);
        assert_eq!(history.live_operands()[0].value, 9);
        assert_eq!(history.current_formula_text(), "((1+2)*3)");
        assert!(history.is_solved(9));
        assert!(!history.is_solved(8));
    }

    #[test]
    fn test_consumed_operand_rejected() {
        let mut history = fresh(&[1, 2, 3]);
        history
            .record_combination(OperandId(0), OperandId(1), Operator::Add)
            .unwrap();

        let err = history
            .record_combination(OperandId(0), OperandId(2), Operator::Add)
            .unwrap_err();
        assert_eq!(err, HistoryError::NotLive(OperandId(0)));
    }

    #[test]
    fn test_too_few_live_rejected() {
        let mut history = fresh(&[4, 2]);
        history
            .record_combination(OperandId(0), OperandId(1), Operator::Div)
            .unwrap();
        assert_eq!(history.live_count(), 1);

        // Only one operand left: any further combination names a dead id.
        let err = history
            .record_combination(OperandId(2), OperandId(0), Operator::Add)
            .unwrap_err();
        assert_eq!(err, HistoryError::NotLive(OperandId(0)));
    }

    #[test]
    fn test_same_operand_rejected() {
        let mut history = fresh(&[1, 2]);
        let err = history
            .record_combination(OperandId(0), OperandId(0), Operator::Add)
            .unwrap_err();
        assert_eq!(err, HistoryError::SameOperand(OperandId(0)));
    }

    #[test]
    fn test_illegal_division_rejected_and_state_unchanged() {
        let mut history = fresh(&[5, 2]);
        let err = history
            .record_combination(OperandId(0), OperandId(1), Operator::Div)
            .unwrap_err();
        assert_eq!(
            err,
            HistoryError::IllegalOperation {
                left: 5,
                right: 2,
                op: Operator::Div
            }
        );
        // A rejected request consumes nothing.
        assert_eq!(history.live_count(), 2);
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_legal_operators_excludes_bad_division() {
        let history = fresh(&[5, 2]);
        let ops = history.legal_operators(OperandId(0), OperandId(1)).unwrap();
        assert_eq!(ops, vec![Operator::Add, Operator::Sub, Operator::Mul]);

        let history = fresh(&[4, 2]);
        let ops = history.legal_operators(OperandId(0), OperandId(1)).unwrap();
        assert!(ops.contains(&Operator::Div));
    }

    #[test]
    fn test_legal_operators_ordering_matters() {
        // 2/4 is fractional but 4/2 is exact.
        let history = fresh(&[2, 4]);
        let forward = history.legal_operators(OperandId(0), OperandId(1)).unwrap();
        let backward = history.legal_operators(OperandId(1), OperandId(0)).unwrap();
        assert!(!forward.contains(&Operator::Div));
        assert!(backward.contains(&Operator::Div));
    }

    #[test]
    fn test_equal_faces_combine_by_identity() {
        let mut history = fresh(&[3, 3]);
        history
            .record_combination(OperandId(0), OperandId(1), Operator::Add)
            .unwrap();
        assert!(history.is_solved(6));
    }

    #[test]
    fn test_reset_clears_previous_round() {
        let mut history = fresh(&[1, 2]);
        history
            .record_combination(OperandId(0), OperandId(1), Operator::Add)
            .unwrap();

        history.reset(&Roll::from_values(&[5, 6, 1]));
        assert_eq!(history.live_count(), 3);
        assert!(history.entries().is_empty());
        assert_eq!(history.current_formula_text(), "");

        // Ids restart from the dice.
        let ops = history.legal_operators(OperandId(0), OperandId(2)).unwrap();
        assert!(!ops.is_empty());
    }

    #[test]
    fn test_n_minus_one_commits_solve_five_dice() {
        let mut history = fresh(&[2, 2, 2, 2, 2]);
        // ((((2+2)+2)+2)+2) = 10
        let mut acc = OperandId(0);
        for (step, die) in (1..5).enumerate() {
            let entry = history
                .record_combination(acc, OperandId(die), Operator::Add)
                .unwrap();
            assert_eq!(entry.value, 2 * (step as i64 + 2));
            acc = OperandId(5 + step as u32);
        }
        assert_eq!(history.live_count(), 1);
        assert!(history.is_solved(10));
    }
}
