use std::fmt::{Debug, Display, Formatter};

use itertools::Itertools;
use smallvec::SmallVec;

use crate::{GroundingError, Sym};

/// Arguments of an atom. Most predicates have a small arity so they are stored inline.
pub type Args = SmallVec<[Sym; 4]>;

/// Association of parameter (variable) names to the constants they are bound to.
pub type Binding = hashbrown::HashMap<Sym, Sym>;

macro_rules! schema_id {
    ($type_name:ident, $label:literal) => {
        /// Index of a schema in the arena of its task.
        /// Two schemas that share a name always have distinct ids.
        #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
        pub struct $type_name(u32);

        impl From<usize> for $type_name {
            fn from(u: usize) -> Self {
                $type_name(u as u32)
            }
        }
        impl From<$type_name> for usize {
            fn from(v: $type_name) -> Self {
                v.0 as usize
            }
        }

        impl Display for $type_name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

schema_id!(ActionId, "action");
schema_id!(AxiomId, "axiom");

/// Predicate of a ground atom in the reachability model.
///
/// Besides ordinary predicates, the model contains one marker atom per reachable instantiation
/// of an action or axiom schema. Those are identified by the schema id rather than by name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Pred {
    Named(Sym),
    Action(ActionId),
    Axiom(AxiomId),
}

impl Pred {
    pub fn name(&self) -> Option<&Sym> {
        match self {
            Pred::Named(sym) => Some(sym),
            _ => None,
        }
    }
}

impl From<Sym> for Pred {
    fn from(value: Sym) -> Self {
        Pred::Named(value)
    }
}
impl From<&str> for Pred {
    fn from(value: &str) -> Self {
        Pred::Named(value.into())
    }
}
impl From<ActionId> for Pred {
    fn from(value: ActionId) -> Self {
        Pred::Action(value)
    }
}
impl From<AxiomId> for Pred {
    fn from(value: AxiomId) -> Self {
        Pred::Axiom(value)
    }
}

impl Display for Pred {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Pred::Named(sym) => write!(f, "{sym}"),
            Pred::Action(id) => write!(f, "{id}"),
            Pred::Axiom(id) => write!(f, "{id}"),
        }
    }
}

/// A predicate applied to constants, e.g. `at(truck1, depot)`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroundAtom {
    pub pred: Pred,
    pub args: Args,
}

impl GroundAtom {
    pub fn new<S: Into<Sym>>(pred: impl Into<Pred>, args: impl IntoIterator<Item = S>) -> Self {
        GroundAtom {
            pred: pred.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the predicate if this is not a schema marker.
    pub fn predicate_name(&self) -> Option<&Sym> {
        self.pred.name()
    }
}

/// Canonical textual form, shared with the search component: `Atom at(truck1, depot)`
impl Display for GroundAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Atom {}({})", self.pred, self.args.iter().format(", "))
    }
}
impl Debug for GroundAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.pred, self.args.iter().format(", "))
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroundLiteral {
    pub atom: GroundAtom,
    pub negated: bool,
}

impl GroundLiteral {
    pub fn new(atom: GroundAtom, negated: bool) -> Self {
        GroundLiteral { atom, negated }
    }
    pub fn pos(atom: GroundAtom) -> Self {
        Self::new(atom, false)
    }
    pub fn neg(atom: GroundAtom) -> Self {
        Self::new(atom, true)
    }
}

impl Display for GroundLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "Negated{}", self.atom)
        } else {
            write!(f, "{}", self.atom)
        }
    }
}
impl Debug for GroundLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "not {:?}", self.atom)
        } else {
            write!(f, "{:?}", self.atom)
        }
    }
}

/// A predicate applied to variables and constants, e.g. `at(?t, depot)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LiftedAtom {
    pub pred: Sym,
    pub args: SmallVec<[Sym; 3]>,
}

impl LiftedAtom {
    pub fn new<S: Into<Sym>>(pred: impl Into<Sym>, args: impl IntoIterator<Item = S>) -> Self {
        LiftedAtom {
            pred: pred.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Replaces every variable by its value in the binding.
    /// A variable absent from the binding is an error: ground atoms never refer to parameters.
    pub fn ground(&self, binding: &Binding) -> Result<GroundAtom, GroundingError> {
        let mut args = Args::with_capacity(self.args.len());
        for arg in &self.args {
            if arg.is_variable() {
                let value = binding
                    .get(arg)
                    .ok_or_else(|| GroundingError::UnboundParameter(arg.clone()))?;
                args.push(value.clone());
            } else {
                args.push(arg.clone());
            }
        }
        Ok(GroundAtom {
            pred: Pred::Named(self.pred.clone()),
            args,
        })
    }
}

impl Display for LiftedAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.pred, self.args.iter().format(", "))
    }
}
impl Debug for LiftedAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LiftedLiteral {
    pub atom: LiftedAtom,
    pub negated: bool,
}

impl LiftedLiteral {
    pub fn pos(atom: LiftedAtom) -> Self {
        LiftedLiteral { atom, negated: false }
    }
    pub fn neg(atom: LiftedAtom) -> Self {
        LiftedLiteral { atom, negated: true }
    }
}

impl Display for LiftedLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "not {}", self.atom)
        } else {
            write!(f, "{}", self.atom)
        }
    }
}
