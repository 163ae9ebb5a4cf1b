use std::fmt::Display;

use itertools::Itertools;

use crate::conditions::Feasibility;
use crate::*;

/// Everything an action schema needs to resolve one of its instances.
#[derive(Clone, Copy)]
pub struct GroundingContext<'a> {
    pub facts: Facts<'a>,
    /// Initial values of numeric fluents
    pub init_assignments: &'a hashbrown::HashMap<GroundAtom, IntValue>,
    pub objects_by_type: &'a ObjectsByType,
    /// If false, all actions have unit cost.
    pub use_min_cost_metric: bool,
}

/// Cost of an action, as an increase of the total cost.
#[derive(Clone, Debug)]
pub enum CostExpr {
    Constant(IntValue),
    /// Numeric fluent whose value is given in the initial state, e.g. `(road-length ?from ?to)`
    Fluent(LiftedAtom),
}

/// A (possibly conditional and universally quantified) effect of an action schema.
#[derive(Clone, Debug)]
pub struct Effect {
    /// Universally quantified variables, ranging over all objects of their type.
    pub parameters: Vec<Param>,
    pub condition: Conjunction,
    pub literal: LiftedLiteral,
}

impl Effect {
    pub fn simple(literal: LiftedLiteral) -> Self {
        Effect {
            parameters: Vec::new(),
            condition: Conjunction::default(),
            literal,
        }
    }

    pub fn conditional(condition: Conjunction, literal: LiftedLiteral) -> Self {
        Effect {
            parameters: Vec::new(),
            condition,
            literal,
        }
    }

    pub fn forall(self, parameters: Vec<Param>) -> Self {
        Effect { parameters, ..self }
    }

    fn instantiate(
        &self,
        binding: &Binding,
        ctx: &GroundingContext,
        result: &mut Vec<GroundEffect>,
    ) -> Result<(), GroundingError> {
        if self.parameters.is_empty() {
            return self.instantiate_once(binding, ctx, result);
        }
        let domains = self.parameters.iter().map(|p| {
            ctx.objects_by_type
                .get(&p.tpe)
                .map(Vec::as_slice)
                .unwrap_or(&[])
                .iter()
        });
        let mut extended = binding.clone();
        for objects in domains.multi_cartesian_product() {
            for (param, obj) in self.parameters.iter().zip(objects) {
                extended.insert(param.name.clone(), obj.clone());
            }
            self.instantiate_once(&extended, ctx, result)?;
        }
        Ok(())
    }

    fn instantiate_once(
        &self,
        binding: &Binding,
        ctx: &GroundingContext,
        result: &mut Vec<GroundEffect>,
    ) -> Result<(), GroundingError> {
        let mut condition = Vec::new();
        if self
            .condition
            .instantiate(binding, ctx.facts, &mut condition)
            .feasible()?
            .is_none()
        {
            return Ok(());
        }
        let atom = self.literal.atom.ground(binding)?;
        // effects on unreachable facts can never matter
        if ctx.facts.fluent.contains(&atom) {
            result.push(GroundEffect {
                condition,
                literal: GroundLiteral::new(atom, self.literal.negated),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ActionSchema {
    pub name: Sym,
    pub parameters: Vec<Param>,
    pub precondition: Conjunction,
    pub effects: Vec<Effect>,
    pub cost: Option<CostExpr>,
}

impl ActionSchema {
    pub fn new(name: impl Into<Sym>, parameters: Vec<Param>) -> Self {
        ActionSchema {
            name: name.into(),
            parameters,
            precondition: Conjunction::default(),
            effects: Vec::new(),
            cost: None,
        }
    }

    pub fn with_precondition(self, precondition: Conjunction) -> Self {
        ActionSchema { precondition, ..self }
    }
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
    pub fn with_cost(self, cost: CostExpr) -> Self {
        ActionSchema {
            cost: Some(cost),
            ..self
        }
    }

    pub fn parameters(&self) -> &[Param] {
        &self.parameters
    }

    /// Resolves the instance of this schema designated by `binding`.
    ///
    /// Returns `None` if the instance is not applicable under the non-relaxed semantics:
    /// its precondition is statically false or it has no effect on a reachable fact.
    pub fn instantiate(
        &self,
        id: ActionId,
        binding: &Binding,
        ctx: &GroundingContext,
    ) -> Result<Option<GroundAction>, GroundingError> {
        let args = bound_values(&self.parameters, binding)?;
        let mut precondition = Vec::new();
        if self
            .precondition
            .instantiate(binding, ctx.facts, &mut precondition)
            .feasible()?
            .is_none()
        {
            return Ok(None);
        }
        let mut effects = Vec::new();
        for eff in &self.effects {
            eff.instantiate(binding, ctx, &mut effects)?;
        }
        if effects.is_empty() {
            return Ok(None);
        }
        let cost = self.instantiate_cost(binding, ctx)?;
        Ok(Some(GroundAction {
            schema: id,
            name: instance_name(&self.name, &args),
            args,
            precondition,
            effects,
            cost,
        }))
    }

    fn instantiate_cost(&self, binding: &Binding, ctx: &GroundingContext) -> Result<IntValue, GroundingError> {
        if !ctx.use_min_cost_metric {
            return Ok(1);
        }
        match &self.cost {
            None => Ok(0),
            Some(CostExpr::Constant(c)) => Ok(*c),
            Some(CostExpr::Fluent(term)) => {
                let term = term.ground(binding)?;
                match ctx.init_assignments.get(&term) {
                    Some(value) => Ok(*value),
                    None => Err(GroundingError::UnassignedFluent(term)),
                }
            }
        }
    }
}

impl Display for ActionSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.name, self.parameters.iter().format(", "))
    }
}

/// Values of the given parameters, in order.
pub(crate) fn bound_values(params: &[Param], binding: &Binding) -> Result<Args, GroundingError> {
    params
        .iter()
        .map(|p| {
            binding
                .get(&p.name)
                .cloned()
                .ok_or_else(|| GroundingError::UnboundParameter(p.name.clone()))
        })
        .collect()
}

/// Name of a ground instance, e.g. `(drive t1 a b)`
pub(crate) fn instance_name(schema: &Sym, args: &[Sym]) -> String {
    format!("({})", std::iter::once(schema).chain(args).format(" "))
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GroundEffect {
    /// Fluent part of the effect condition (empty if unconditional)
    pub condition: Vec<GroundLiteral>,
    pub literal: GroundLiteral,
}

/// Fully instantiated action.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GroundAction {
    pub schema: ActionId,
    pub name: String,
    pub args: Args,
    pub precondition: Vec<GroundLiteral>,
    pub effects: Vec<GroundEffect>,
    pub cost: IntValue,
}

impl GroundAction {
    pub fn add_effects(&self) -> impl Iterator<Item = &GroundEffect> + '_ {
        self.effects.iter().filter(|e| !e.literal.negated)
    }

    pub fn del_effects(&self) -> impl Iterator<Item = &GroundEffect> + '_ {
        self.effects.iter().filter(|e| e.literal.negated)
    }
}

impl Display for GroundAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for pre in &self.precondition {
            write!(f, "\n  PRE: {pre}")?;
        }
        for eff in &self.effects {
            if eff.condition.is_empty() {
                write!(f, "\n  EFF: {}", eff.literal)?;
            } else {
                write!(f, "\n  EFF: {} -> {}", eff.condition.iter().format(" and "), eff.literal)?;
            }
        }
        write!(f, "\n  cost: {}", self.cost)
    }
}
