use std::fmt::Display;

use crate::*;

/// Element of the initial state.
#[derive(Clone, Debug)]
pub enum InitElement {
    Fact(GroundAtom),
    /// Initial value of a numeric fluent, e.g. `(= (road-length a b) 12)`
    Assign { fluent: GroundAtom, value: IntValue },
}

/// A normalized lifted planning task.
///
/// Schemas are stored in arenas: an `ActionId` or `AxiomId` is the only reliable way to
/// identify a schema, since normalization may produce several schemas with the same name.
#[derive(Default)]
pub struct Task {
    pub types: TypeHierarchy,
    pub objects: Vec<TypedObject>,
    pub init: Vec<InitElement>,
    pub goal: Conjunction,
    pub use_min_cost_metric: bool,
    actions: Vec<ActionSchema>,
    axioms: Vec<AxiomSchema>,
}

impl Task {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, name: impl Into<Sym>, tpe: impl Into<Sym>) {
        self.objects.push(TypedObject::new(name, tpe));
    }

    pub fn add_fact(&mut self, fact: GroundAtom) {
        self.init.push(InitElement::Fact(fact));
    }

    pub fn add_assignment(&mut self, fluent: GroundAtom, value: IntValue) {
        self.init.push(InitElement::Assign { fluent, value });
    }

    pub fn add_action(&mut self, action: ActionSchema) -> ActionId {
        self.actions.push(action);
        ActionId::from(self.actions.len() - 1)
    }

    pub fn add_axiom(&mut self, axiom: AxiomSchema) -> AxiomId {
        self.axioms.push(axiom);
        AxiomId::from(self.axioms.len() - 1)
    }

    pub fn action(&self, id: ActionId) -> Option<&ActionSchema> {
        self.actions.get(usize::from(id))
    }

    pub fn axiom(&self, id: AxiomId) -> Option<&AxiomSchema> {
        self.axioms.get(usize::from(id))
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionId, &ActionSchema)> + '_ {
        self.actions.iter().enumerate().map(|(i, a)| (ActionId::from(i), a))
    }

    pub fn axioms(&self) -> impl Iterator<Item = (AxiomId, &AxiomSchema)> + '_ {
        self.axioms.iter().enumerate().map(|(i, a)| (AxiomId::from(i), a))
    }

    /// Facts of the initial state, excluding numeric assignments.
    pub fn init_facts(&self) -> impl Iterator<Item = &GroundAtom> + '_ {
        self.init.iter().filter_map(|e| match e {
            InitElement::Fact(fact) => Some(fact),
            InitElement::Assign { .. } => None,
        })
    }

    /// Splits the initial state into boolean facts and numeric fluent assignments.
    pub fn initial_state(
        &self,
    ) -> (
        hashbrown::HashSet<GroundAtom>,
        hashbrown::HashMap<GroundAtom, IntValue>,
    ) {
        let mut facts = hashbrown::HashSet::new();
        let mut assignments = hashbrown::HashMap::new();
        for element in &self.init {
            match element {
                InitElement::Fact(fact) => {
                    facts.insert(fact.clone());
                }
                InitElement::Assign { fluent, value } => {
                    assignments.insert(fluent.clone(), *value);
                }
            }
        }
        (facts, assignments)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Objects:")?;
        for o in &self.objects {
            write!(f, "\n  {o}")?;
        }
        write!(f, "\n\nActions:")?;
        for (id, a) in self.actions() {
            write!(f, "\n  [{id}] {a}")?;
        }
        write!(f, "\n\nAxioms:")?;
        for (id, a) in self.axioms() {
            write!(f, "\n  [{id}] {a}")?;
        }
        write!(f, "\n\nInit:")?;
        for e in &self.init {
            match e {
                InitElement::Fact(fact) => write!(f, "\n  {fact:?}")?,
                InitElement::Assign { fluent, value } => write!(f, "\n  {fluent:?} := {value}")?,
            }
        }
        write!(f, "\n\nGoal:\n  {}", self.goal)
    }
}
