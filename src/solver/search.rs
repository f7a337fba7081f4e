//! Exhaustive Pairwise-Reduction Search
//!
//! Models the way the puzzle is actually played: pick any two live values,
//! pick an operator, collapse the pair into one new value, repeat until a
//! single value remains. A formula is recorded only when that final value
//! equals the target.
//!
//! Dice are distinguished by position, not face value, so two dice showing
//! the same face are still separate combination candidates. Two formulas
//! are distinct iff their texts differ; `(2+3)` and `(3+2)` are both
//! reported.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::solver::expr::{combine_text, Operator, OPERATORS};

/// Outcome of an exhaustive search.
///
/// `solutions` is empty iff `can_solve` is false. Order is discovery
/// order, which is deterministic for a given roll.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Whether at least one formula reaches the target.
    pub can_solve: bool,
    /// Every distinct formula text that reaches the target.
    pub solutions: Vec<String>,
}

/// Solver contract violations.
///
/// An unsolvable roll is NOT an error; it is a normal `Ok` result with
/// `can_solve = false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The roll had no dice. Failing fast beats a misleading "unsolvable".
    #[error("cannot solve an empty roll")]
    EmptyRoll,
}

/// One step of a reduction plan: combine the live operands with the given
/// ids, left op right.
///
/// Ids follow the history allocation scheme: dice occupy `0..n` in roll
/// order, each combination allocates the next id for its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Id of the left operand.
    pub left: u32,
    /// Id of the right operand.
    pub right: u32,
    /// Operator to apply.
    pub op: Operator,
}

/// A live value during reduction, with its fully parenthesized text.
#[derive(Clone, Debug)]
struct Node {
    value: i64,
    text: String,
}

/// Exhaustively search for every distinct formula reaching `target`.
///
/// Every die is consumed exactly once; subtraction and division try both
/// orderings of each pair; division must be exact and never by zero.
/// Symmetric reduction orders (combine pair A then B vs. B then A) reach
/// the same intermediate state and are expanded once, via memoization on
/// the multiset of remaining `(value, text)` nodes.
pub fn solve(roll: &[i64], target: i64) -> Result<SolveResult, SolverError> {
    if roll.is_empty() {
        return Err(SolverError::EmptyRoll);
    }

    let nodes: Vec<Node> = roll
        .iter()
        .map(|&v| Node {
            value: v,
            text: v.to_string(),
        })
        .collect();

    let mut solutions = Vec::new();
    let mut seen = HashSet::new();
    let mut visited = HashSet::new();
    reduce(&nodes, target, &mut solutions, &mut seen, &mut visited);

    Ok(SolveResult {
        can_solve: !solutions.is_empty(),
        solutions,
    })
}

/// Recursive reduction: collapse one pair per level until one node remains.
fn reduce(
    nodes: &[Node],
    target: i64,
    solutions: &mut Vec<String>,
    seen: &mut HashSet<String>,
    visited: &mut HashSet<String>,
) {
    if nodes.len() == 1 {
        // Final reduction only: partial matches never count.
        if nodes[0].value == target && seen.insert(nodes[0].text.clone()) {
            solutions.push(nodes[0].text.clone());
        }
        return;
    }

    // Two states with the same node multiset generate the same formulas;
    // expand each state once.
    if !visited.insert(state_key(nodes)) {
        return;
    }

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            // Both orderings: required for Sub/Div, and Add/Mul orderings
            // produce distinct formula texts.
            for (a, b) in [(i, j), (j, i)] {
                for op in OPERATORS {
                    let Some(value) = op.apply(nodes[a].value, nodes[b].value) else {
                        continue;
                    };

                    let mut next: Vec<Node> = Vec::with_capacity(nodes.len() - 1);
                    next.extend(
                        nodes
                            .iter()
                            .enumerate()
                            .filter(|&(k, _)| k != i && k != j)
                            .map(|(_, n)| n.clone()),
                    );
                    next.push(Node {
                        value,
                        text: combine_text(&nodes[a].text, op, &nodes[b].text),
                    });

                    reduce(&next, target, solutions, seen, visited);
                }
            }
        }
    }
}

/// Canonical key for the multiset of remaining nodes.
fn state_key(nodes: &[Node]) -> String {
    let mut texts: Vec<&str> = nodes.iter().map(|n| n.text.as_str()).collect();
    texts.sort_unstable();
    texts.join("\u{1}")
}

/// Find the reduction steps of one formula reaching `target`.
///
/// Returns the first solution found, expressed as operand-id steps an
/// auto-player can feed to `FormulaHistory` verbatim. `None` when the roll
/// is unsolvable or empty.
pub fn solution_plan(roll: &[i64], target: i64) -> Option<Vec<PlanStep>> {
    if roll.is_empty() {
        return None;
    }

    let live: Vec<(u32, i64)> = roll
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as u32, v))
        .collect();

    let mut steps = Vec::with_capacity(roll.len() - 1);
    let mut dead_ends = HashSet::new();
    if plan_reduce(&live, roll.len() as u32, target, &mut steps, &mut dead_ends) {
        Some(steps)
    } else {
        None
    }
}

/// Depth-first plan search; prunes value-multiset states already proven
/// dead (a plan depends only on values, so the pruning is exact).
fn plan_reduce(
    live: &[(u32, i64)],
    next_id: u32,
    target: i64,
    steps: &mut Vec<PlanStep>,
    dead_ends: &mut HashSet<Vec<i64>>,
) -> bool {
    if live.len() == 1 {
        return live[0].1 == target;
    }

    let mut key: Vec<i64> = live.iter().map(|&(_, v)| v).collect();
    key.sort_unstable();
    if dead_ends.contains(&key) {
        return false;
    }

    for i in 0..live.len() {
        for j in (i + 1)..live.len() {
            for (a, b) in [(i, j), (j, i)] {
                for op in OPERATORS {
                    let Some(value) = op.apply(live[a].1, live[b].1) else {
                        continue;
                    };

                    let mut next: Vec<(u32, i64)> = Vec::with_capacity(live.len() - 1);
                    next.extend(
                        live.iter()
                            .enumerate()
                            .filter(|&(k, _)| k != i && k != j)
                            .map(|(_, &n)| n),
                    );
                    next.push((next_id, value));

                    steps.push(PlanStep {
                        left: live[a].0,
                        right: live[b].0,
                        op,
                    });
                    if plan_reduce(&next, next_id + 1, target, steps, dead_ends) {
                        return true;
                    }
                    steps.pop();
                }
            }
        }
    }

    dead_ends.insert(key);
    false
}
