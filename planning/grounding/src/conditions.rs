use std::fmt::Display;

use itertools::Itertools;

use crate::*;

/// Signal raised when instantiating a condition that is statically false:
/// a positive literal on a static fact absent from the initial state, or a negative literal
/// on a static fact present in it.
#[derive(Debug)]
pub(crate) enum Failure {
    Impossible,
    Error(GroundingError),
}

impl From<GroundingError> for Failure {
    fn from(value: GroundingError) -> Self {
        Failure::Error(value)
    }
}

pub(crate) trait Feasibility<T> {
    /// Converts the impossibility signal into `None`, keeping genuine errors as errors.
    fn feasible(self) -> Result<Option<T>, GroundingError>;
}

impl<T> Feasibility<T> for Result<T, Failure> {
    fn feasible(self) -> Result<Option<T>, GroundingError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(Failure::Impossible) => Ok(None),
            Err(Failure::Error(err)) => Err(err),
        }
    }
}

/// Ground facts against which conditions are resolved.
#[derive(Clone, Copy)]
pub struct Facts<'a> {
    /// Facts of the initial state.
    pub init: &'a hashbrown::HashSet<GroundAtom>,
    /// Reachable facts whose predicate may change.
    pub fluent: &'a hashbrown::HashSet<GroundAtom>,
}

impl LiftedLiteral {
    fn instantiate(&self, binding: &Binding, facts: Facts, result: &mut Vec<GroundLiteral>) -> Result<(), Failure> {
        let atom = self.atom.ground(binding)?;
        if facts.fluent.contains(&atom) {
            result.push(GroundLiteral::new(atom, self.negated));
            Ok(())
        } else if facts.init.contains(&atom) == self.negated {
            Err(Failure::Impossible)
        } else {
            // static and true: nothing to check at search time
            Ok(())
        }
    }
}

/// Conjunction of literals, the normal form of preconditions, effect conditions and goals.
#[derive(Clone, Debug, Default)]
pub struct Conjunction {
    pub literals: Vec<LiftedLiteral>,
}

impl Conjunction {
    pub fn new(literals: impl IntoIterator<Item = LiftedLiteral>) -> Self {
        Conjunction {
            literals: literals.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Appends to `result` the fluent literals of the condition under `binding`.
    /// Literals on static facts are checked immediately and dropped.
    pub(crate) fn instantiate(
        &self,
        binding: &Binding,
        facts: Facts,
        result: &mut Vec<GroundLiteral>,
    ) -> Result<(), Failure> {
        for lit in &self.literals {
            lit.instantiate(binding, facts, result)?;
        }
        Ok(())
    }
}

impl Display for Conjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(and {})", self.literals.iter().format(" "))
    }
}
