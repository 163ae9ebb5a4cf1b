//! Extraction of the ground operators of the delete relaxation from the logic program used to
//! compute the reachability model.
//!
//! Each way of satisfying the body of a rule with atoms of the model yields one operator:
//! the matching instance of the rule's head, the supporting preconditions and the rule weight.

use std::fmt::Display;

use itertools::Itertools;

use crate::*;

/// Prefix of the synthetic predicates introduced when compiling the task into a logic program
/// (e.g. to split long rule bodies).
pub const SYNTHETIC_PREFIX: &str = "p$";

/// Horn rule of the logic program: `effect :- conditions` with a weight.
#[derive(Clone, Debug)]
pub struct Rule {
    pub conditions: Vec<LiftedAtom>,
    pub effect: LiftedAtom,
    pub weight: IntValue,
}

impl Rule {
    pub fn new(conditions: Vec<LiftedAtom>, effect: LiftedAtom, weight: IntValue) -> Self {
        Rule {
            conditions,
            effect,
            weight,
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} :- {}. [weight: {}]",
            self.effect,
            self.conditions.iter().format(", "),
            self.weight
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct LogicProgram {
    pub rules: Vec<Rule>,
}

impl LogicProgram {
    pub fn new(rules: Vec<Rule>) -> Self {
        LogicProgram { rules }
    }
}

/// Ground operator of the delete relaxation.
///
/// The derived ordering (effect, preconditions, weight) is a total order used to emit
/// operators deterministically.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GroundOperator {
    pub effect: GroundAtom,
    pub preconditions: Vec<GroundAtom>,
    pub weight: IntValue,
}

/// For each predicate, the textual form of its atoms that are values of some state variable
/// of the finite-domain task.
#[derive(Clone, Debug, Default)]
pub struct ValueIndex {
    values: hashbrown::HashMap<Sym, hashbrown::HashSet<String>>,
}

impl ValueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from the value names of the state variables, e.g. `Atom at(t, a)`.
    /// Negated values and values that are not atoms (`<none of those>`) are ignored.
    pub fn from_value_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut index = Self::new();
        for name in names {
            let name = name.as_ref();
            if name.contains("NegatedAtom") {
                continue;
            }
            let Some((pred, _)) = name.strip_prefix("Atom ").and_then(|atom| atom.split_once('(')) else {
                continue;
            };
            index.insert(pred.trim(), name);
        }
        index
    }

    pub fn insert(&mut self, pred: impl Into<Sym>, value: impl Into<String>) {
        self.values.entry(pred.into()).or_default().insert(value.into());
    }

    pub fn insert_atom(&mut self, atom: &GroundAtom) {
        if let Some(pred) = atom.predicate_name() {
            self.insert(pred, atom.to_string());
        }
    }

    pub fn knows(&self, pred: &Sym) -> bool {
        self.values.contains_key(pred)
    }

    /// True if the atom is one of the values of a state variable.
    pub fn contains(&self, atom: &GroundAtom) -> bool {
        match atom.predicate_name().and_then(|pred| self.values.get(pred)) {
            Some(values) => values.contains(atom.to_string().as_str()),
            None => false,
        }
    }
}

/// Role of a model atom matched by a rule condition.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Support {
    /// Synthetic predicate of the logic program: always satisfied, not a precondition.
    Synthetic,
    /// Value of a state variable: guaranteed by the domain of the variable, not a precondition.
    StateValue,
    /// Kept as a precondition of the operator.
    Precondition,
    /// Static fact that does not hold initially: the candidate binding is rejected.
    Refuted,
}

/// Matches `pattern` against `atom`, extending `binding` with the variables it binds.
///
/// On failure, `binding` may hold a partial extension that the caller must discard.
fn unify<'a>(pattern: &'a LiftedAtom, atom: &'a GroundAtom, binding: &mut Vec<(&'a Sym, &'a Sym)>) -> bool {
    if pattern.args.len() != atom.args.len() {
        return false;
    }
    for (param, value) in pattern.args.iter().zip(&atom.args) {
        if param.is_variable() {
            match binding.iter().find(|(var, _)| *var == param) {
                Some((_, bound)) => {
                    if *bound != value {
                        return false;
                    }
                }
                None => binding.push((param, value)),
            }
        } else if param != value {
            return false;
        }
    }
    true
}

struct RuleGrounder<'a> {
    model: hashbrown::HashMap<&'a Sym, Vec<&'a GroundAtom>>,
    init: hashbrown::HashMap<&'a Sym, hashbrown::HashSet<&'a GroundAtom>>,
    values: &'a ValueIndex,
}

impl<'a> RuleGrounder<'a> {
    fn classify(&self, atom: &GroundAtom) -> Support {
        let Some(pred) = atom.predicate_name() else {
            return Support::Precondition;
        };
        if pred.starts_with(SYNTHETIC_PREFIX) {
            Support::Synthetic
        } else if self.values.contains(atom) {
            Support::StateValue
        } else {
            match self.init.get(pred) {
                Some(facts) if !facts.contains(atom) => Support::Refuted,
                _ => Support::Precondition,
            }
        }
    }

    fn ground_rule(&self, rule: &'a Rule, operators: &mut hashbrown::HashSet<GroundOperator>) {
        let mut binding = Vec::new();
        let mut support = Vec::new();
        self.ground_conditions(rule, &rule.conditions, &mut binding, &mut support, operators);
    }

    fn ground_conditions(
        &self,
        rule: &'a Rule,
        conditions: &'a [LiftedAtom],
        binding: &mut Vec<(&'a Sym, &'a Sym)>,
        support: &mut Vec<&'a GroundAtom>,
        operators: &mut hashbrown::HashSet<GroundOperator>,
    ) {
        let Some((condition, remaining)) = conditions.split_first() else {
            self.ground_effect(rule, binding, support, operators);
            return;
        };
        let Some(candidates) = self.model.get(&condition.pred) else {
            return;
        };
        for &atom in candidates {
            let mark = binding.len();
            if unify(condition, atom, binding) {
                match self.classify(atom) {
                    Support::Synthetic | Support::StateValue => {
                        self.ground_conditions(rule, remaining, binding, support, operators);
                    }
                    Support::Precondition => {
                        support.push(atom);
                        self.ground_conditions(rule, remaining, binding, support, operators);
                        support.pop();
                    }
                    Support::Refuted => {}
                }
            }
            binding.truncate(mark);
        }
    }

    fn ground_effect(
        &self,
        rule: &'a Rule,
        binding: &mut Vec<(&'a Sym, &'a Sym)>,
        support: &[&'a GroundAtom],
        operators: &mut hashbrown::HashSet<GroundOperator>,
    ) {
        let Some(candidates) = self.model.get(&rule.effect.pred) else {
            return;
        };
        for &atom in candidates {
            let mark = binding.len();
            if unify(&rule.effect, atom, binding) {
                operators.insert(GroundOperator {
                    effect: atom.clone(),
                    preconditions: support.iter().map(|&a| a.clone()).collect(),
                    weight: rule.weight,
                });
            }
            binding.truncate(mark);
        }
    }
}

/// Enumerates the ground operators of all rules of the program (except the one deriving goal
/// reachability).
///
/// `initial_facts` are the facts of the initial state: a static condition atom is only accepted
/// if it is one of them (predicates with no initial fact are assumed to always hold).
pub fn instantiate_for_relaxation_heuristic<'a>(
    program: &LogicProgram,
    model: &Model,
    values: &ValueIndex,
    initial_facts: impl IntoIterator<Item = &'a GroundAtom>,
) -> hashbrown::HashSet<GroundOperator> {
    let _span = tracing::span!(tracing::Level::TRACE, "RELAXATION OPERATORS").entered();
    let mut init: hashbrown::HashMap<&Sym, hashbrown::HashSet<&GroundAtom>> = hashbrown::HashMap::new();
    for atom in initial_facts {
        if let Some(pred) = atom.predicate_name() {
            init.entry(pred).or_default().insert(atom);
        }
    }
    let grounder = RuleGrounder {
        model: model.by_predicate(),
        init,
        values,
    };

    let mut operators = hashbrown::HashSet::new();
    for rule in &program.rules {
        if rule.effect.pred.as_str().contains(GOAL_REACHABLE) {
            continue;
        }
        grounder.ground_rule(rule, &mut operators);
    }
    tracing::debug!("#relaxation operators: {}", operators.len());
    operators
}

/// Computes the operators of the delete relaxation, identifying state variable values from
/// their names in the finite-domain task.
pub fn relaxation_operators<S: AsRef<str>>(
    program: &LogicProgram,
    model: &Model,
    value_names: impl IntoIterator<Item = S>,
    task: &Task,
) -> hashbrown::HashSet<GroundOperator> {
    let values = ValueIndex::from_value_names(value_names);
    instantiate_for_relaxation_heuristic(program, model, &values, task.init_facts())
}
