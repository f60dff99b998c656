use pinpoint::condition::{Comparison, Operator};
use pinpoint::persist::parse_table;
use pinpoint::predicate::PredicateSet;
use pinpoint::query::translate;
use pinpoint::table::Table;

fn setup() -> Table {
    parse_table(
        "banner\nid,temperature,pressure,element\n\
         1,250,1.0,Si\n2,300,0.5,Si\n3,350,1.0,Ge\n4,400,2.0,Ge\n5,450,,C\n6,500,1.5,Si\n",
        "grid",
    )
    .expect("valid table")
}

fn predicate_sets() -> Vec<PredicateSet> {
    [
        r#"{}"#,
        r#"{"temperature": "> 300"}"#,
        r#"{"temperature": [">= 300", "< 500"]}"#,
        r#"{"pressure": "<= 1"}"#,
        r#"{"element": "== 'Si'", "pressure": "!= 0.5"}"#,
        r#"{"element": "!= 'Si'", "temperature": "> id"}"#,
    ]
    .iter()
    .map(|p| PredicateSet::from_json_str(p).expect("valid predicates"))
    .collect()
}

fn refinements() -> Vec<(&'static str, Comparison)> {
    vec![
        ("temperature", Comparison::literal(Operator::Lt, 420i64)),
        ("pressure", Comparison::literal(Operator::Ge, 1.0)),
        ("element", Comparison::literal(Operator::Eq, "Ge")),
        ("id", Comparison::literal(Operator::Ne, 3i64)),
    ]
}

#[test]
fn filtering_is_idempotent() {
    let table = setup();
    for predicates in predicate_sets() {
        let query = translate(&predicates);
        let once = query.filter(&table).expect("filter ok");
        let twice = translate(&predicates).filter(&table).expect("filter ok");
        assert_eq!(once.indices(), twice.indices(), "query {query}");
    }
}

#[test]
fn adding_predicates_never_grows_the_view() {
    let table = setup();
    for predicates in predicate_sets() {
        let before = translate(&predicates).filter(&table).expect("filter ok");
        for (column, comparison) in refinements() {
            let mut grown = predicates.clone();
            grown.push(column, comparison);
            assert!(grown.includes(&predicates));
            let after = translate(&grown).filter(&table).expect("filter ok");
            assert!(
                after.is_subset_of(&before),
                "{} narrowed {:?} to {:?}",
                grown,
                before.indices(),
                after.indices()
            );
        }
    }
}

#[test]
fn views_are_recomputed_from_the_full_table() {
    let table = setup();
    let mut predicates = PredicateSet::from_json_str(r#"{"temperature": "> 300"}"#).expect("valid");
    let first = translate(&predicates).filter(&table).expect("filter ok");
    assert_eq!(first.indices(), &[2, 3, 4, 5]);
    predicates.push("element", Comparison::literal(Operator::Eq, "Si"));
    let second = translate(&predicates).filter(&table).expect("filter ok");
    assert_eq!(second.indices(), &[5]);
    assert_eq!(second.table().len(), 6);
}

#[test]
fn missing_cells_satisfy_only_not_equal() {
    let table = setup();
    for expression in ["> 0", "<= 100", "== 1.0", ">= 0"] {
        let mut predicates = PredicateSet::new();
        predicates.push_expression("pressure", expression).expect("valid");
        let view = translate(&predicates).filter(&table).expect("filter ok");
        assert!(!view.indices().contains(&4), "row without pressure matched {expression}");
    }
    let mut predicates = PredicateSet::new();
    predicates.push_expression("pressure", "!= 1.0").expect("valid");
    let view = translate(&predicates).filter(&table).expect("filter ok");
    assert_eq!(view.indices(), &[1, 3, 4, 5]);
}

#[test]
fn large_integer_ids_select_a_single_row() {
    let table = parse_table("banner\nid,label\n9007199254740992,a\n9007199254740993,b\n", "ids").expect("valid table");
    let predicates = PredicateSet::from_json_str(r#"{"id": "== 9007199254740993"}"#).expect("valid predicates");
    let view = translate(&predicates).filter(&table).expect("filter ok");
    assert_eq!(view.indices(), &[1]);
    let predicates = PredicateSet::from_json_str(r#"{"id": "> 9007199254740992"}"#).expect("valid predicates");
    assert_eq!(translate(&predicates).filter(&table).expect("filter ok").indices(), &[1]);
}
