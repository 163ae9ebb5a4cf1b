use crate::conditions::Failure;
use crate::params::bind;
use crate::*;

/// Reserved predicate of the model atom stating that the goal is reachable in the relaxation.
pub const GOAL_REACHABLE: &str = "@goal-reachable";

/// Result of grounding the goal condition.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GoalGrounding {
    /// Fluent literals of the goal. Static goal literals are already known to hold.
    Reachable(Vec<GroundLiteral>),
    /// Some goal literal is statically false.
    Impossible,
}

impl GoalGrounding {
    pub fn is_impossible(&self) -> bool {
        matches!(self, GoalGrounding::Impossible)
    }

    pub fn literals(&self) -> Option<&[GroundLiteral]> {
        match self {
            GoalGrounding::Reachable(lits) => Some(lits),
            GoalGrounding::Impossible => None,
        }
    }
}

pub struct GroundingResult {
    /// True if the goal-reachability marker is part of the model.
    pub relaxed_reachable: bool,
    pub fluent_facts: hashbrown::HashSet<GroundAtom>,
    /// Ground actions, in the order in which their instantiation was found in the model.
    pub actions: Vec<GroundAction>,
    pub goal: GoalGrounding,
    /// Ground axioms, sorted.
    pub axioms: Vec<GroundAxiom>,
    /// For each action schema, the arguments of all its reachable instantiations
    /// (including the ones that were pruned when resolved against the initial state).
    pub reachable_action_parameters: hashbrown::HashMap<ActionId, Vec<Args>>,
}

/// Grounds the goal against the initial and fluent facts.
pub fn instantiate_goal(goal: &Conjunction, facts: Facts) -> Result<GoalGrounding, GroundingError> {
    let mut result = Vec::new();
    match goal.instantiate(&Binding::new(), facts, &mut result) {
        Ok(()) => Ok(GoalGrounding::Reachable(result)),
        Err(Failure::Impossible) => Ok(GoalGrounding::Impossible),
        Err(Failure::Error(err)) => Err(err),
    }
}

fn check_arity(schema: &Sym, atom: &GroundAtom, expected: usize) -> Result<(), GroundingError> {
    if atom.args.len() < expected {
        Err(GroundingError::MissingArguments {
            schema: schema.clone(),
            atom: atom.clone(),
            expected,
            found: atom.args.len(),
        })
    } else {
        Ok(())
    }
}

/// Instantiates all actions and axioms whose instantiation markers appear in the model,
/// as well as the goal.
///
/// The only error is an inconsistency between the model and the task (e.g. a marker atom with
/// fewer arguments than the schema has parameters), which should never happen with a model
/// computed for this task.
pub fn ground(task: &Task, model: &Model) -> Result<GroundingResult, GroundingError> {
    let _span = tracing::span!(tracing::Level::TRACE, "GROUNDING").entered();

    let fluent_facts = fluent_facts(task, model);
    let (init_facts, init_assignments) = task.initial_state();
    let objects_by_type = objects_by_type(&task.objects, &task.types);
    let ctx = GroundingContext {
        facts: Facts {
            init: &init_facts,
            fluent: &fluent_facts,
        },
        init_assignments: &init_assignments,
        objects_by_type: &objects_by_type,
        use_min_cost_metric: task.use_min_cost_metric,
    };

    let mut relaxed_reachable = false;
    let mut actions = Vec::new();
    let mut axioms = Vec::new();
    let mut reachable_action_parameters: hashbrown::HashMap<ActionId, Vec<Args>> = hashbrown::HashMap::new();

    for atom in model {
        match &atom.pred {
            Pred::Action(id) => {
                let Some(action) = task.action(*id) else {
                    tracing::trace!("ignoring marker of unknown action {id}");
                    continue;
                };
                let params = action.parameters();
                check_arity(&action.name, atom, params.len())?;
                // the model may append other payload after the parameters
                let args: Args = atom.args[..params.len()].iter().cloned().collect();
                reachable_action_parameters.entry(*id).or_default().push(args);
                let binding = bind(params, &atom.args);
                if let Some(ground_action) = action.instantiate(*id, &binding, &ctx)? {
                    actions.push(ground_action);
                }
            }
            Pred::Axiom(id) => {
                let Some(axiom) = task.axiom(*id) else {
                    tracing::trace!("ignoring marker of unknown axiom {id}");
                    continue;
                };
                check_arity(&axiom.name, atom, axiom.parameters().len())?;
                let binding = bind(axiom.parameters(), &atom.args);
                if let Some(ground_axiom) = axiom.instantiate(*id, &binding, ctx.facts)? {
                    axioms.push(ground_axiom);
                }
            }
            Pred::Named(pred) if pred == GOAL_REACHABLE => {
                relaxed_reachable = true;
            }
            Pred::Named(_) => {}
        }
    }

    let goal = instantiate_goal(&task.goal, ctx.facts)?;
    axioms.sort();

    tracing::debug!("#fluent facts: {}", fluent_facts.len());
    tracing::debug!("#actions: {}", actions.len());
    tracing::debug!("#axioms: {}", axioms.len());
    tracing::debug!(relaxed_reachable, impossible_goal = goal.is_impossible());

    Ok(GroundingResult {
        relaxed_reachable,
        fluent_facts,
        actions,
        goal,
        axioms,
        reachable_action_parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(pred: &str, args: &[&str]) -> LiftedLiteral {
        LiftedLiteral::pos(LiftedAtom::new(pred, args.iter().copied()))
    }
    fn neg(pred: &str, args: &[&str]) -> LiftedLiteral {
        LiftedLiteral::neg(LiftedAtom::new(pred, args.iter().copied()))
    }

    /// Two locations connected by a one-way road, a truck that drives and a cost given by the
    /// road length.
    fn logistics() -> (Task, ActionId) {
        let mut task = Task::new();
        task.types.add_type("truck", Some("object"));
        task.types.add_type("location", Some("object"));
        task.add_object("t", "truck");
        task.add_object("a", "location");
        task.add_object("b", "location");
        task.add_fact(GroundAtom::new("road", ["a", "b"]));
        task.add_fact(GroundAtom::new("at", ["t", "a"]));
        task.add_assignment(GroundAtom::new("length", ["a", "b"]), 7);
        task.use_min_cost_metric = true;
        let drive = task.add_action(
            ActionSchema::new(
                "drive",
                vec![
                    Param::new("?t", "truck"),
                    Param::new("?from", "location"),
                    Param::new("?to", "location"),
                ],
            )
            .with_precondition(Conjunction::new([pos("road", &["?from", "?to"]), pos("at", &["?t", "?from"])]))
            .with_effect(Effect::simple(neg("at", &["?t", "?from"])))
            .with_effect(Effect::simple(pos("at", &["?t", "?to"])))
            .with_cost(CostExpr::Fluent(LiftedAtom::new("length", ["?from", "?to"]))),
        );
        task.goal = Conjunction::new([pos("at", &["t", "b"])]);
        (task, drive)
    }

    #[test]
    fn ground_logistics() {
        let (task, drive) = logistics();
        let model: Model = [
            GroundAtom::new("road", ["a", "b"]),
            GroundAtom::new("at", ["t", "a"]),
            GroundAtom::new(drive, ["t", "a", "b"]),
            GroundAtom::new("at", ["t", "b"]),
            GroundAtom::new(GOAL_REACHABLE, Vec::<Sym>::new()),
        ]
        .into_iter()
        .collect();
        let res = ground(&task, &model).unwrap();
        assert!(res.relaxed_reachable);
        assert_eq!(res.fluent_facts.len(), 2);
        assert_eq!(res.actions.len(), 1);
        let action = &res.actions[0];
        assert_eq!(action.name, "(drive t a b)");
        assert_eq!(action.schema, drive);
        assert_eq!(action.cost, 7);
        // static precondition on the road was checked and dropped
        assert_eq!(action.precondition, vec![GroundLiteral::pos(GroundAtom::new("at", ["t", "a"]))]);
        assert_eq!(action.add_effects().count(), 1);
        assert_eq!(action.del_effects().count(), 1);
        assert_eq!(
            res.goal,
            GoalGrounding::Reachable(vec![GroundLiteral::pos(GroundAtom::new("at", ["t", "b"]))])
        );
    }

    #[test]
    fn unit_costs_without_metric() {
        let (mut task, drive) = logistics();
        task.use_min_cost_metric = false;
        let model: Model = [GroundAtom::new(drive, ["t", "a", "b"]), GroundAtom::new("at", ["t", "b"])]
            .into_iter()
            .collect();
        let res = ground(&task, &model).unwrap();
        assert_eq!(res.actions[0].cost, 1);
    }

    #[test]
    fn missing_cost_value_is_an_error() {
        let (mut task, drive) = logistics();
        task.init.retain(|e| matches!(e, InitElement::Fact(_)));
        let model: Model = [GroundAtom::new(drive, ["t", "a", "b"]), GroundAtom::new("at", ["t", "b"])]
            .into_iter()
            .collect();
        assert!(matches!(ground(&task, &model), Err(GroundingError::UnassignedFluent(_))));
    }

    #[test]
    fn statically_inapplicable_actions_are_pruned() {
        let (task, drive) = logistics();
        // no road from b to a: the relaxed model is optimistic but the instance is dropped
        let model: Model = [
            GroundAtom::new(drive, ["t", "b", "a"]),
            GroundAtom::new(drive, ["t", "a", "b"]),
            GroundAtom::new("at", ["t", "a"]),
            GroundAtom::new("at", ["t", "b"]),
        ]
        .into_iter()
        .collect();
        let res = ground(&task, &model).unwrap();
        assert_eq!(res.actions.len(), 1);
        assert_eq!(res.actions[0].name, "(drive t a b)");
        assert_eq!(res.reachable_action_parameters[&drive].len(), 2);
        assert!(!res.relaxed_reachable);
    }

    #[test]
    fn axioms_are_sorted() {
        let mut task = Task::new();
        task.add_action(
            ActionSchema::new("visit", vec![Param::new("?l", "location")])
                .with_effect(Effect::simple(pos("visited", &["?l"]))),
        );
        let axiom = task.add_axiom(AxiomSchema::new(
            "seen",
            vec![Param::new("?l", "location")],
            Conjunction::new([pos("visited", &["?l"])]),
        ));
        let model: Model = [
            GroundAtom::new("visited", ["c"]),
            GroundAtom::new("visited", ["a"]),
            GroundAtom::new(axiom, ["c"]),
            GroundAtom::new(axiom, ["a"]),
        ]
        .into_iter()
        .collect();
        let res = ground(&task, &model).unwrap();
        let names: Vec<_> = res.axioms.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["(seen a)", "(seen c)"]);
        assert_eq!(res.axioms[0].effect, GroundAtom::new("seen", ["a"]));
        assert_eq!(
            res.axioms[0].condition,
            vec![GroundLiteral::pos(GroundAtom::new("visited", ["a"]))]
        );
    }

    #[test]
    fn axioms_with_internal_parameters() {
        let mut task = Task::new();
        task.add_fact(GroundAtom::new("link", ["a", "b"]));
        let axiom = task.add_axiom(
            AxiomSchema::new(
                "connected",
                vec![Param::new("?x", "node"), Param::new("?y", "node")],
                Conjunction::new([pos("link", &["?x", "?y"])]),
            )
            .with_external_parameters(1),
        );
        let model: Model = [GroundAtom::new(axiom, ["a", "b"])].into_iter().collect();
        let res = ground(&task, &model).unwrap();
        assert_eq!(res.axioms.len(), 1);
        assert_eq!(res.axioms[0].name, "(connected a)");
        assert_eq!(res.axioms[0].effect, GroundAtom::new("connected", ["a"]));
        assert!(res.axioms[0].condition.is_empty());
    }

    #[test]
    fn axiom_markers_with_too_few_arguments_are_fatal() {
        let mut task = Task::new();
        let axiom = task.add_axiom(AxiomSchema::new(
            "connected",
            vec![Param::new("?x", "node"), Param::new("?y", "node")],
            Conjunction::default(),
        ));
        let model: Model = [GroundAtom::new(axiom, ["a"])].into_iter().collect();
        assert!(matches!(
            ground(&task, &model),
            Err(GroundingError::MissingArguments {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn universally_quantified_effects() {
        let mut task = Task::new();
        task.add_object("p1", "package");
        task.add_object("p2", "package");
        task.add_fact(GroundAtom::new("in", ["p1", "t"]));
        let unload = task.add_action(
            ActionSchema::new("unload-all", vec![Param::new("?t", "truck")]).with_effect(
                Effect::conditional(
                    Conjunction::new([pos("in", &["?p", "?t"])]),
                    pos("delivered", &["?p"]),
                )
                .forall(vec![Param::new("?p", "package")]),
            ),
        );
        task.add_action(
            ActionSchema::new("load", vec![Param::new("?p", "package"), Param::new("?t", "truck")])
                .with_effect(Effect::simple(pos("in", &["?p", "?t"]))),
        );
        let model: Model = [
            GroundAtom::new(unload, ["t"]),
            GroundAtom::new("in", ["p1", "t"]),
            GroundAtom::new("delivered", ["p1"]),
            GroundAtom::new("delivered", ["p2"]),
        ]
        .into_iter()
        .collect();
        let res = ground(&task, &model).unwrap();
        let action = &res.actions[0];
        // p2 is never in the truck: its conditional effect can not be triggered
        assert_eq!(action.effects.len(), 1);
        assert_eq!(action.effects[0].literal, GroundLiteral::pos(GroundAtom::new("delivered", ["p1"])));
        assert_eq!(
            action.effects[0].condition,
            vec![GroundLiteral::pos(GroundAtom::new("in", ["p1", "t"]))]
        );
    }
}
