use pinpoint::extract::{ExtractorOptions, Extractor, MANDATORY_ATTRIBUTES};
use pinpoint::persist::write_record;
use pinpoint::table::Row;
use pinpoint::value::Value;

fn setup() -> Row {
    Row::new()
        .with("temperature", 350i64)
        .with("pressure", 1.0)
        .with("element", "Si")
        .with("dft_dict", Value::parse_cell(r#"{"hgrids": [0.4, 0.4, 0.4], "ixc": "PBE"}"#))
        .with("atomic_positions_x", vec![0.0, 1.5])
        .with("atomic_positions_y", vec![0.0, 0.2])
        .with("atomic_positions_z", vec![Value::from(vec![0.0]), Value::from(vec![0.7])])
}

#[test]
fn mandatory_and_present_extras_are_extracted() {
    let row = setup();
    let extractor = Extractor::new(ExtractorOptions::default());
    let extras = vec!["temperature".to_string(), "element".to_string()];
    let record = extractor.extract(&row, &extras).expect("extracted");
    assert_eq!(record.len(), MANDATORY_ATTRIBUTES.len() + 2);
    for attribute in MANDATORY_ATTRIBUTES.iter().chain(["temperature", "element"].iter()) {
        assert_eq!(
            record.get(attribute),
            row.get(attribute).map(Value::flatten).as_ref(),
            "{attribute} should equal the row value"
        );
    }
    assert_eq!(record.get("atomic_positions_z"), Some(&Value::from(vec![0.0, 0.7])));
}

#[test]
fn absent_extras_are_skipped() {
    let row = setup();
    let extractor = Extractor::new(ExtractorOptions { verbose: true, ..ExtractorOptions::default() });
    let extras = vec!["volume".to_string(), "pressure".to_string()];
    let record = extractor.extract(&row, &extras).expect("extracted");
    assert!(record.get("volume").is_none());
    assert_eq!(record.get("pressure"), Some(&Value::Float(1.0)));
    assert_eq!(record.len(), MANDATORY_ATTRIBUTES.len() + 1);
}

#[test]
fn record_file_is_indented_json() {
    let row = setup();
    let record = Extractor::new(ExtractorOptions::default()).extract(&row, &[]).expect("extracted");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("attributes_for_simulation.json");
    write_record(&record, &path).expect("written");
    let text = std::fs::read_to_string(&path).expect("readable");
    assert!(text.starts_with("{\n  \"dft_dict\": {"));
    let json: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(json["atomic_positions_x"], serde_json::json!([0.0, 1.5]));
    assert_eq!(json["dft_dict"]["ixc"], "PBE");
}
