//! Tests for step-through sessions and the visual state they keep

use segviz::application::{ApplicationError, Operation, Script, Session, Step};
use segviz::domain::{DomainError, HighlightTag};
use segviz::util::testing;

const DEMO: [i64; 8] = [2, 1, 3, 4, 5, 7, 8, 9];

#[test]
fn given_reset_then_traversal_reproduces_fresh_tree_tags() {
    testing::init_test_setup();
    let query = Operation::Query { l: 1, r: 6 };

    let mut fresh = Session::new(&DEMO, Script::demo()).unwrap();
    fresh.execute(&query).unwrap();

    let mut used = Session::new(&DEMO, Script::demo()).unwrap();
    used.execute(&Operation::UpdateRange { l: 0, r: 3, delta: 2 }).unwrap();
    used.execute(&Operation::Query { l: 7, r: 7 }).unwrap();
    used.reset_visuals();
    used.execute(&query).unwrap();

    assert_eq!(used.highlights(), fresh.highlights());
}

#[test]
fn given_empty_array_when_creating_session_then_domain_error() {
    let err = Session::new(&[], Script::demo()).unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidInput(_))
    ));
}

#[test]
fn given_demo_script_when_stepping_then_labels_follow_script() {
    let mut session = Session::new(&DEMO, Script::demo()).unwrap();

    let first = session.step().unwrap().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.label, "Initial state");
    assert_eq!(first.result, None);
    assert!(session.highlights().is_empty());

    let second = session.step().unwrap().unwrap();
    assert_eq!(second.label, "Query [2, 5]");
    assert_eq!(second.result, Some(19));
    assert_eq!(
        session.highlights().tag(session.tree().root()),
        HighlightTag::Partial
    );
    assert_eq!(session.cursor(), 2);
}

#[test]
fn given_custom_script_when_run_all_then_each_step_starts_from_clean_view() {
    let script = Script::new(vec![
        Step::new(Operation::Query { l: 0, r: 7 }),
        Step::labeled("bump", Operation::Update { index: 0, value: 100 }),
    ])
    .unwrap();
    let mut session = Session::new(&DEMO, script).unwrap();
    let reports = session.run_all().unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].result, Some(39));
    assert_eq!(reports[1].label, "bump");

    // Only the update path is tagged: the query's tags were reset first
    let view = session.snapshot();
    let tagged = view
        .nodes
        .iter()
        .filter(|n| n.tag != HighlightTag::Default)
        .count();
    assert_eq!(tagged, 4);
    assert_eq!(view.leaves[0], 100);
}

#[test]
fn given_strict_session_when_update_in_range_then_applied() {
    let script = Script::new(vec![Step::new(Operation::Update { index: 7, value: 0 })]).unwrap();
    let mut session = Session::new(&DEMO, script)
        .unwrap()
        .with_strict_bounds(true);
    session.step().unwrap();
    assert_eq!(session.tree().leaves()[7], 0);
    assert!(session.is_finished());
}
