//! Unary operators of the delete relaxation, as consumed by an additive or max heuristic.
//!
//! Propositions are interned to dense ids, and dominated operators can be removed:
//! `o1` dominates `o2` if they have the same effect, `pre(o1)` is a subset of `pre(o2)`,
//! `cost(o1) <= cost(o2)` and either one of those is strict or `o1` comes first.

use crate::operators::ParsedOperator;
use crate::{IntValue, config};

/// Dense identifier of a proposition.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PropId(u32);

impl From<PropId> for usize {
    fn from(p: PropId) -> Self {
        p.0 as usize
    }
}
impl From<usize> for PropId {
    fn from(u: usize) -> Self {
        PropId(u as u32)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UnaryOperator {
    pub effect: PropId,
    /// Sorted, without duplicates
    pub preconditions: Vec<PropId>,
    pub cost: IntValue,
}

#[derive(Clone, Debug, Default)]
pub struct UnaryOperators {
    propositions: Vec<String>,
    ids: hashbrown::HashMap<String, PropId>,
    operators: Vec<UnaryOperator>,
}

impl UnaryOperators {
    pub fn build(parsed: &[ParsedOperator]) -> Self {
        let mut ops = UnaryOperators::default();
        for op in parsed {
            let mut preconditions: Vec<PropId> = op.preconditions.iter().map(|p| ops.intern(p)).collect();
            preconditions.sort_unstable();
            preconditions.dedup();
            let effect = ops.intern(&op.effect);
            ops.operators.push(UnaryOperator {
                effect,
                preconditions,
                cost: op.cost,
            });
        }
        ops
    }

    fn intern(&mut self, proposition: &str) -> PropId {
        if let Some(&id) = self.ids.get(proposition) {
            return id;
        }
        let id = PropId::from(self.propositions.len());
        self.propositions.push(proposition.to_string());
        self.ids.insert(proposition.to_string(), id);
        id
    }

    pub fn id_of(&self, proposition: &str) -> Option<PropId> {
        self.ids.get(proposition).copied()
    }

    pub fn proposition(&self, id: PropId) -> &str {
        &self.propositions[usize::from(id)]
    }

    pub fn num_propositions(&self) -> usize {
        self.propositions.len()
    }

    pub fn operators(&self) -> &[UnaryOperator] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Removes dominated operators, testing strict subsets of up to
    /// `ARIES_GROUNDING_MAX_PRECONDITIONS_TO_TEST` preconditions.
    pub fn simplify(&mut self) {
        self.simplify_with(config::MAX_PRECONDITIONS_TO_TEST.get())
    }

    pub fn simplify_with(&mut self, max_preconditions_to_test: usize) {
        let num_before = self.operators.len();

        // for each (preconditions, effect), the cheapest operator, the first one on ties
        let mut best: hashbrown::HashMap<(&[PropId], PropId), (IntValue, usize)> = hashbrown::HashMap::new();
        for (i, op) in self.operators.iter().enumerate() {
            let candidate = (op.cost, i);
            best.entry((op.preconditions.as_slice(), op.effect))
                .and_modify(|current| {
                    if candidate < *current {
                        *current = candidate
                    }
                })
                .or_insert(candidate);
        }

        let is_dominated = |i: usize, op: &UnaryOperator| -> bool {
            if best[&(op.preconditions.as_slice(), op.effect)].1 != i {
                return true;
            }
            let n = op.preconditions.len();
            // the number of subsets to test grows exponentially
            if n > max_preconditions_to_test || n >= 32 {
                return false;
            }
            let mut subset = Vec::with_capacity(n);
            for mask in 0..((1u32 << n) - 1) {
                subset.clear();
                subset.extend((0..n).filter(|b| mask & (1 << b) != 0).map(|b| op.preconditions[b]));
                if let Some(&(cost, _)) = best.get(&(subset.as_slice(), op.effect)) {
                    if cost <= op.cost {
                        return true;
                    }
                }
            }
            false
        };
        let dominated: Vec<bool> = self
            .operators
            .iter()
            .enumerate()
            .map(|(i, op)| is_dominated(i, op))
            .collect();
        drop(best);

        let mut i = 0;
        self.operators.retain(|_| {
            let keep = !dominated[i];
            i += 1;
            keep
        });
        tracing::debug!(
            "simplified unary operators: {} -> {}",
            num_before,
            self.operators.len()
        );
    }
}
