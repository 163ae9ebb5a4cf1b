use crate::*;

/// Reachability model: the ground atoms derivable in the delete relaxation of the task,
/// including one marker atom per reachable action or axiom instantiation.
///
/// Atoms are kept in the order in which they were first produced; duplicates are dropped.
#[derive(Clone, Debug, Default)]
pub struct Model {
    atoms: Vec<GroundAtom>,
    known: hashbrown::HashSet<GroundAtom>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an atom to the model. Returns false if it was already present.
    pub fn insert(&mut self, atom: GroundAtom) -> bool {
        if self.known.contains(&atom) {
            false
        } else {
            self.known.insert(atom.clone());
            self.atoms.push(atom);
            true
        }
    }

    pub fn contains(&self, atom: &GroundAtom) -> bool {
        self.known.contains(atom)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundAtom> + '_ {
        self.atoms.iter()
    }

    /// Atoms of ordinary (named) predicates, grouped by predicate. Schema markers are left out.
    pub fn by_predicate(&self) -> hashbrown::HashMap<&Sym, Vec<&GroundAtom>> {
        let mut index: hashbrown::HashMap<&Sym, Vec<&GroundAtom>> = hashbrown::HashMap::new();
        for atom in &self.atoms {
            if let Some(pred) = atom.predicate_name() {
                index.entry(pred).or_default().push(atom);
            }
        }
        index
    }
}

impl FromIterator<GroundAtom> for Model {
    fn from_iter<T: IntoIterator<Item = GroundAtom>>(iter: T) -> Self {
        let mut model = Model::new();
        for atom in iter {
            model.insert(atom);
        }
        model
    }
}

impl<'a> IntoIterator for &'a Model {
    type Item = &'a GroundAtom;
    type IntoIter = std::slice::Iter<'a, GroundAtom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_dropped_in_first_seen_order() {
        let model: Model = [
            GroundAtom::new("at", ["a"]),
            GroundAtom::new(ActionId::from(0), ["a"]),
            GroundAtom::new("at", ["b"]),
            GroundAtom::new("at", ["a"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(model.len(), 3);
        let index = model.by_predicate();
        assert_eq!(index.len(), 1);
        assert_eq!(
            index[&Sym::from("at")],
            vec![&GroundAtom::new("at", ["a"]), &GroundAtom::new("at", ["b"])]
        );
    }
}
