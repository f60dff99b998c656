use std::io::Cursor;

use pinpoint::PinpointError;
use pinpoint::extract::{ExtractorOptions, extract};
use pinpoint::narrow::{NarrowingOptions, Outcome, narrow};
use pinpoint::persist::parse_table;
use pinpoint::predicate::PredicateSet;
use pinpoint::refine::{LineRefinement, Refinement};
use pinpoint::table::Table;
use pinpoint::value::Value;

const SIMULATIONS: &str = "\
exported from Atomistic_Numerical_Simulations
temperature,pressure,dft_dict,atomic_positions_x,atomic_positions_y,atomic_positions_z
250,1,{'hgrids': 0.45},\"[0.0, 1.1]\",\"[0.0, 0.0]\",\"[0.0, 0.0]\"
350,1,{'hgrids': 0.4},\"[0.0, 1.5]\",\"[0.0, 0.2]\",\"[0.0, 0.7]\"
400,2,{'hgrids': 0.3},\"[0.0, 1.9]\",\"[0.0, 0.4]\",\"[0.0, 1.4]\"
";

fn setup() -> Table {
    parse_table(SIMULATIONS, "simulations").expect("valid table")
}

fn answers(lines: &str) -> LineRefinement<Cursor<String>, Vec<u8>> {
    LineRefinement::new(Cursor::new(lines.to_string()), Vec::new())
}

#[test]
fn refinement_narrows_to_one_row_and_extracts() {
    let table = setup();
    let mut predicates = PredicateSet::from_json_str(r#"{"temperature": "> 300"}"#).expect("valid predicates");
    let mut source = answers("pressure,<=,1\n");
    let outcome = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).expect("narrowed");

    let transcript = String::from_utf8(source.into_output()).expect("utf8");
    assert!(transcript.contains("2 entries found"), "count should be reported: {transcript}");
    assert_eq!(predicates.to_string(), r#"{"temperature":["> 300"],"pressure":["<= 1"]}"#);

    let row = outcome.into_row().expect("resolved");
    assert_eq!(&row, &table.rows()[1], "resolved row is returned unchanged");

    let record = extract(&row, &["temperature".to_string()], &ExtractorOptions::default()).expect("extracted");
    let keys: Vec<&str> = record.attributes().collect();
    assert_eq!(
        keys,
        vec!["dft_dict", "atomic_positions_x", "atomic_positions_y", "atomic_positions_z", "temperature"]
    );
    assert_eq!(record.get("temperature"), Some(&Value::Int(350)));
    assert_eq!(record.get("atomic_positions_z"), Some(&Value::from(vec![0.0, 0.7])));
}

#[test]
fn no_match_is_exhausted_without_asking() {
    let table = setup();
    let mut predicates = PredicateSet::from_json_str(r#"{"temperature": "> 1000"}"#).expect("valid predicates");
    let mut asked = false;
    let mut source = |_: usize, _: &PredicateSet| -> pinpoint::Result<Refinement> {
        asked = true;
        Ok(Refinement::Cancel)
    };
    let outcome = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).expect("no error");
    assert_eq!(outcome, Outcome::Exhausted);
    assert!(outcome.into_row().is_none());
    assert!(!asked);
}

#[test]
fn refinement_can_exhaust_the_table() {
    let table = setup();
    let mut predicates = PredicateSet::from_json_str(r#"{"temperature": ">= 350"}"#).expect("valid predicates");
    let mut source = answers("pressure,>,5\n");
    let outcome = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).expect("no error");
    assert_eq!(outcome, Outcome::Exhausted);
}

#[test]
fn several_refinements_on_the_same_column_accumulate() {
    let table = setup();
    let mut predicates = PredicateSet::new();
    let mut source = answers("temperature,>,200\ntemperature,<,390\ntemperature,>,300\n");
    let outcome = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).expect("narrowed");
    // 3 rows -> 3 -> 2 -> 1
    assert!(outcome.is_resolved());
    assert_eq!(predicates.get("temperature").map(|c| c.len()), Some(3));
    assert_eq!(predicates.comparison_count(), 3);
}

#[test]
fn malformed_answers_are_retried() {
    let table = setup();
    let mut predicates = PredicateSet::from_json_str(r#"{"temperature": "> 300"}"#).expect("valid predicates");
    let mut source = answers("pressure <= 1\npressure,~,1\npressure,==,2\n");
    let outcome = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).expect("narrowed");
    let row = outcome.into_row().expect("resolved");
    assert_eq!(row.get("temperature"), Some(&Value::Int(400)));
    assert_eq!(predicates.comparison_count(), 2, "rejected lines add nothing");
}

#[test]
fn cancel_and_end_of_input_stop_the_session() {
    let table = setup();
    for input in ["cancel\n", ""] {
        let mut predicates = PredicateSet::from_json_str(r#"{"temperature": "> 300"}"#).expect("valid predicates");
        let mut source = answers(input);
        let outcome = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).expect("no error");
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(predicates.comparison_count(), 1);
    }
}

#[test]
fn refinement_limit_is_honoured() {
    let table = setup();
    let mut predicates = PredicateSet::new();
    let mut source = answers("temperature,>,200\ntemperature,>,300\n");
    let options = NarrowingOptions { verbose: false, max_refinements: Some(1) };
    let outcome = narrow(&table, &mut predicates, &mut source, &options).expect("no error");
    assert_eq!(outcome, Outcome::LimitReached { remaining: 3 });
}

#[test]
fn unknown_column_in_a_refinement_is_an_error() {
    let table = setup();
    let mut predicates = PredicateSet::from_json_str(r#"{"temperature": "> 300"}"#).expect("valid predicates");
    let mut source = answers("volume,>,1\n");
    let err = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).unwrap_err();
    assert!(matches!(err, PinpointError::UnknownColumn(ref c) if c == "volume"));
    // the bad predicate stays: the set never shrinks
    assert!(predicates.get("volume").is_some());
}

#[test]
fn unknown_column_in_the_initial_predicates_is_an_error() {
    let table = setup();
    let mut predicates = PredicateSet::from_json_str(r#"{"volume": "> 1"}"#).expect("valid predicates");
    let mut source = answers("");
    let err = narrow(&table, &mut predicates, &mut source, &NarrowingOptions::default()).unwrap_err();
    assert!(format!("{}", err).contains("Unknown column: volume"));
}
