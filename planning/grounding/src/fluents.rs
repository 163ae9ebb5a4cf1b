use crate::*;

/// Predicates whose truth value may change: those appearing in some action effect and the
/// heads of axioms. All other predicates are static.
pub fn fluent_predicates(task: &Task) -> hashbrown::HashSet<Sym> {
    let mut fluents = hashbrown::HashSet::new();
    for (_, action) in task.actions() {
        for eff in &action.effects {
            fluents.insert(eff.literal.atom.pred.clone());
        }
    }
    for (_, axiom) in task.axioms() {
        fluents.insert(axiom.name.clone());
    }
    fluents
}

/// Reachable atoms of fluent predicates.
pub fn fluent_facts(task: &Task, model: &Model) -> hashbrown::HashSet<GroundAtom> {
    let fluents = fluent_predicates(task);
    model
        .iter()
        .filter(|atom| matches!(atom.predicate_name(), Some(pred) if fluents.contains(pred)))
        .cloned()
        .collect()
}
