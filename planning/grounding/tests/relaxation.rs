use aries_grounding::operators::{read_operators, write_operators};
use aries_grounding::relaxation::*;
use aries_grounding::unary::UnaryOperators;
use aries_grounding::*;

fn atom(pred: &str, args: &[&str]) -> LiftedAtom {
    LiftedAtom::new(pred, args.iter().copied())
}
fn fact(pred: &str, args: &[&str]) -> GroundAtom {
    GroundAtom::new(pred, args.iter().copied())
}

fn model(atoms: &[GroundAtom]) -> Model {
    atoms.iter().cloned().collect()
}

#[test]
fn synthetic_fact_without_body() {
    let program = LogicProgram::new(vec![Rule::new(vec![], atom("p$1", &[]), 4)]);
    let ops = instantiate_for_relaxation_heuristic(&program, &model(&[fact("p$1", &[])]), &ValueIndex::new(), []);
    assert_eq!(ops.len(), 1);
    let op = ops.iter().next().unwrap();
    assert_eq!(op.effect, fact("p$1", &[]));
    assert!(op.preconditions.is_empty());
    assert_eq!(op.weight, 4);
}

#[test]
fn unreached_effects_yield_no_operator() {
    let program = LogicProgram::new(vec![Rule::new(
        vec![atom("at", &["?o", "?l"])],
        atom("delivered", &["?o"]),
        1,
    )]);
    let m = model(&[fact("at", &["obj1", "loc1"])]);
    assert!(instantiate_for_relaxation_heuristic(&program, &m, &ValueIndex::new(), []).is_empty());
}

#[test]
fn duplicated_rules_are_absorbed() {
    let rule = Rule::new(
        vec![atom("at", &["?o", "?l"]), atom("connected", &["?l", "?m"])],
        atom("at", &["?o", "?m"]),
        2,
    );
    let m = model(&[
        fact("at", &["obj1", "loc1"]),
        fact("at", &["obj1", "loc2"]),
        fact("connected", &["loc1", "loc2"]),
        fact("connected", &["loc2", "loc1"]),
    ]);
    let init = [fact("at", &["obj1", "loc1"])];
    let once = instantiate_for_relaxation_heuristic(&LogicProgram::new(vec![rule.clone()]), &m, &ValueIndex::new(), &init);
    let twice = instantiate_for_relaxation_heuristic(&LogicProgram::new(vec![rule.clone(), rule]), &m, &ValueIndex::new(), &init);
    assert_eq!(once, twice);
    // at(obj1, loc2) is not initial: the only body supported by an initial `at` fact is the one from loc1
    assert_eq!(once.len(), 1);
}

#[test]
fn predicate_unknown_to_init_and_values_is_a_precondition() {
    let program = LogicProgram::new(vec![Rule::new(
        vec![atom("at", &["?o", "?l"]), atom("fuel", &["?o"])],
        atom("moved", &["?o"]),
        1,
    )]);
    let m = model(&[
        fact("at", &["obj1", "loc1"]),
        fact("fuel", &["obj1"]),
        fact("moved", &["obj1"]),
    ]);
    let values = ValueIndex::from_value_names(["Atom at(obj1, loc1)", "Atom at(obj1, loc2)"]);
    let init = [fact("at", &["obj1", "loc1"])];
    let ops = instantiate_for_relaxation_heuristic(&program, &m, &values, &init);
    assert_eq!(ops.len(), 1);
    let op = ops.iter().next().unwrap();
    assert_eq!(op.effect, fact("moved", &["obj1"]));
    assert_eq!(op.preconditions, vec![fact("fuel", &["obj1"])]);
}

/// From the logic program of a small transport task down to the simplified unary operators
/// read by the heuristic.
#[test]
fn operators_handed_to_the_heuristic() {
    let mut task = Task::new();
    task.add_object("obj1", "obj");
    task.add_object("loc1", "loc");
    task.add_object("loc2", "loc");
    task.add_fact(fact("at", &["obj1", "loc1"]));
    task.add_fact(fact("adjacent", &["loc1", "loc2"]));

    let program = LogicProgram::new(vec![
        Rule::new(
            vec![atom("at", &["?o", "?from"]), atom("adjacent", &["?from", "?to"])],
            atom("at", &["?o", "?to"]),
            1,
        ),
        // same operator, the state value is left out of the body
        Rule::new(vec![atom("adjacent", &["?from", "?to"])], atom("at", &["obj1", "?to"]), 1),
        Rule::new(vec![atom("at", &["obj1", "loc2"])], atom(GOAL_REACHABLE, &[]), 0),
    ]);
    let m = model(&[
        fact("at", &["obj1", "loc1"]),
        fact("adjacent", &["loc1", "loc2"]),
        fact("at", &["obj1", "loc2"]),
        fact(GOAL_REACHABLE, &[]),
    ]);
    let value_names = ["Atom at(obj1, loc1)", "Atom at(obj1, loc2)"];
    let ops = relaxation_operators(&program, &m, value_names, &task);
    // both rules yield the same operator: at(obj1, loc2) from the static adjacency
    assert_eq!(ops.len(), 1);

    let mut buffer = Vec::new();
    let mut sorted: Vec<&GroundOperator> = ops.iter().collect();
    sorted.sort();
    write_operators(sorted, &mut buffer).unwrap();
    let text = String::from_utf8(buffer.clone()).unwrap();
    assert_eq!(text, "Atom at(obj1, loc2)\nAtom adjacent(loc1, loc2)\ncost\n1\nend_operators\n");

    let parsed = read_operators(buffer.as_slice()).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].effect, "Atom at(obj1, loc2)");
    assert_eq!(parsed[0].preconditions, vec!["Atom adjacent(loc1, loc2)".to_string()]);

    let mut unary = UnaryOperators::build(&parsed);
    unary.simplify();
    assert_eq!(unary.len(), 1);
    assert_eq!(unary.num_propositions(), 2);
    let op = &unary.operators()[0];
    assert_eq!(unary.proposition(op.effect), "Atom at(obj1, loc2)");
    assert_eq!(op.cost, 1);
}
