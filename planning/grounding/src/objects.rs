use derive_more::derive::Display;

use crate::*;

/// Mapping from each type to the objects that belong to it or one of its subtypes.
pub type ObjectsByType = hashbrown::HashMap<Sym, Vec<Sym>>;

#[derive(Clone, Display, Debug, PartialEq, Eq)]
#[display("{} - {}", name, tpe)]
pub struct TypedObject {
    pub name: Sym,
    pub tpe: Sym,
}

impl TypedObject {
    pub fn new(name: impl Into<Sym>, tpe: impl Into<Sym>) -> Self {
        Self {
            name: name.into(),
            tpe: tpe.into(),
        }
    }
}

/// Type hierarchy, possibly with multiple inheritance.
#[derive(Clone, Debug, Default)]
pub struct TypeHierarchy {
    /// Direct parents of each type
    parents: hashbrown::HashMap<Sym, Vec<Sym>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new type with the given parent.
    /// If the parent is not recorded yet, it is created (assuming no parents).
    /// If the type already exists, a new parent is added.
    pub fn add_type(&mut self, tpe: impl Into<Sym>, parent: Option<impl Into<Sym>>) {
        let tpe = tpe.into();
        if let Some(parent) = parent {
            let parent = parent.into();
            self.parents.entry(parent.clone()).or_default();
            let parents = self.parents.entry(tpe).or_default();
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        } else {
            self.parents.entry(tpe).or_default();
        }
    }

    pub fn contains(&self, tpe: &Sym) -> bool {
        self.parents.contains_key(tpe)
    }

    /// All direct and indirect supertypes of `tpe` (excluding itself), closest first.
    /// Unknown types have no supertypes.
    pub fn supertypes(&self, tpe: &Sym) -> Vec<Sym> {
        let mut result: Vec<Sym> = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(tpe);
        while let Some(t) = queue.pop_front() {
            for parent in self.parents.get(t).into_iter().flatten() {
                if parent != tpe && !result.contains(parent) {
                    result.push(parent.clone());
                    queue.push_back(parent);
                }
            }
        }
        result
    }
}

/// Builds the object index used to expand typed parameters.
///
/// Each object is listed under its declared type and under each of that type's supertypes,
/// following declaration order.
pub fn objects_by_type(objects: &[TypedObject], types: &TypeHierarchy) -> ObjectsByType {
    let mut result = ObjectsByType::new();
    for obj in objects {
        result.entry(obj.tpe.clone()).or_default().push(obj.name.clone());
        for tpe in types.supertypes(&obj.tpe) {
            result.entry(tpe).or_default().push(obj.name.clone());
        }
    }
    result
}
