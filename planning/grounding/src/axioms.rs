use std::fmt::Display;

use itertools::Itertools;

use crate::actions::{bound_values, instance_name};
use crate::conditions::Feasibility;
use crate::*;

/// Derived predicate: the head `name(external parameters)` holds whenever the condition holds
/// for some value of the remaining (internal) parameters.
#[derive(Clone, Debug)]
pub struct AxiomSchema {
    pub name: Sym,
    pub parameters: Vec<Param>,
    /// Number of leading parameters that appear in the head
    pub num_external_parameters: usize,
    pub condition: Conjunction,
}

impl AxiomSchema {
    pub fn new(name: impl Into<Sym>, parameters: Vec<Param>, condition: Conjunction) -> Self {
        AxiomSchema {
            name: name.into(),
            num_external_parameters: parameters.len(),
            parameters,
            condition,
        }
    }

    pub fn with_external_parameters(self, num_external_parameters: usize) -> Self {
        debug_assert!(num_external_parameters <= self.parameters.len());
        AxiomSchema {
            num_external_parameters,
            ..self
        }
    }

    pub fn parameters(&self) -> &[Param] {
        &self.parameters
    }

    fn external_parameters(&self) -> &[Param] {
        &self.parameters[..self.num_external_parameters.min(self.parameters.len())]
    }

    /// Resolves the instance designated by `binding`, or `None` if its condition is statically false.
    pub fn instantiate(
        &self,
        id: AxiomId,
        binding: &Binding,
        facts: Facts,
    ) -> Result<Option<GroundAxiom>, GroundingError> {
        let args = bound_values(self.external_parameters(), binding)?;
        let mut condition = Vec::new();
        if self
            .condition
            .instantiate(binding, facts, &mut condition)
            .feasible()?
            .is_none()
        {
            return Ok(None);
        }
        Ok(Some(GroundAxiom {
            name: instance_name(&self.name, &args),
            condition,
            effect: GroundAtom::new(self.name.clone(), args),
            schema: id,
        }))
    }
}

impl Display for AxiomSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:?}) <- {}",
            self.name,
            self.parameters.iter().format(", "),
            self.condition
        )
    }
}

/// Fully instantiated axiom.
///
/// The derived ordering (name, condition, effect, schema) is used to sort axioms so that
/// the grounding output does not depend on the iteration order of the model.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct GroundAxiom {
    pub name: String,
    pub condition: Vec<GroundLiteral>,
    pub effect: GroundAtom,
    pub schema: AxiomId,
}

impl Display for GroundAxiom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for c in &self.condition {
            write!(f, "\n  PRE: {c}")?;
        }
        write!(f, "\n  EFF: {}", self.effect)
    }
}
