//! Integration tests for eda.

use std::fs;
use std::io::Write;

use chrono::NaiveDate;
use tempfile::{NamedTempFile, TempDir};

use eda::inference::ScoreDistribution;
use eda::{
    classify, load_csv, summarize, Column, CsvExplorer, DiagnosticKind, Hypothesis, NativeKind,
    OverrideMap, Table, TypesDocument,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn day(d: u32) -> Option<chrono::NaiveDateTime> {
    NaiveDate::from_ymd_opt(2018, 1, d).and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn abcd_table() -> Table {
    Table::new(vec![
        Column::from_i64("a", &[1, 2, 3, 4]),
        Column::from_f64("b", &[Some(1.0), Some(2.0), Some(3.0), Some(3.0)]),
        Column::from_strs("c", &[Some("a"), Some("b"), Some("c"), Some("b")]),
        Column::from_datetimes("d", &[day(1), day(2), day(3), day(4)]),
    ])
    .expect("valid table")
}

// =============================================================================
// Type Selection
// =============================================================================

#[test]
fn test_argmax_and_normalize() {
    let dist: eda::inference::Distribution<&str> =
        [("a", 10.0), ("b", 70.0), ("c", 20.0)].into_iter().collect();

    assert_eq!(dist.argmax(), Some(&"b"));

    let normalized = dist.normalize();
    assert!((normalized.get(&"a") - 0.1).abs() < 1e-12);
    assert!((normalized.get(&"b") - 0.7).abs() < 1e-12);
    assert!((normalized.get(&"c") - 0.2).abs() < 1e-12);
}

#[test]
fn test_degenerate_distribution_becomes_uniform() {
    let dist: ScoreDistribution = Hypothesis::ALL.iter().map(|h| (*h, 0.0)).collect();
    let normalized = dist.normalize();

    for (_, mass) in normalized.iter() {
        assert!((mass - 1.0 / 7.0).abs() < 1e-12);
    }
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_whole_number_column_is_not_float() {
    let column = Column::from_i64("count", &[1, 2, 3, 100]);
    let probabilities = eda::type_probabilities(&column, "count", None);

    let int = probabilities.get(&Hypothesis::Int);
    let float = probabilities.get(&Hypothesis::Float);
    assert!(int > float);
    assert_eq!(probabilities.argmax(), Some(&Hypothesis::Int));
}

#[test]
fn test_fraction_column_has_no_int_mass() {
    let column = Column::from_f64("ratio", &[Some(0.5), Some(1.0), Some(2.25)]);
    let probabilities = eda::type_probabilities(&column, "ratio", None);

    assert_eq!(probabilities.get(&Hypothesis::Int), 0.0);
}

#[test]
fn test_text_column_has_no_numeric_mass() {
    let column = Column::from_strs("country", &[Some("Germany"), Some("France"), Some("Spain")]);
    let probabilities = eda::type_probabilities(&column, "country", None);

    assert_eq!(probabilities.get(&Hypothesis::Int), 0.0);
    assert_eq!(probabilities.get(&Hypothesis::Float), 0.0);
}

#[test]
fn test_classify_from_csv() {
    let file = create_test_file(
        "user_id,signup_date,score,description\n\
         u1,2020-01-01,0.5,first customer\n\
         u2,2020-02-01,1.5,second customer\n\
         u3,2020-03-01,2.5,third customer\n",
    );

    let reports = CsvExplorer::new().classify(file.path()).expect("classification failed");

    assert_eq!(reports[0].inferred_type, Hypothesis::Identifier);
    assert_eq!(reports[1].dtype, NativeKind::DateTime);
    assert_eq!(reports[1].inferred_type, Hypothesis::Date);
    assert_eq!(reports[2].inferred_type, Hypothesis::Float);
    assert_eq!(reports[2].min, Some(0.5));
    assert_eq!(reports[3].inferred_type, Hypothesis::Text);
}

// =============================================================================
// Summarization
// =============================================================================

#[test]
fn test_summarize_buckets() {
    let types = summarize(&abcd_table(), &OverrideMap::new()).column_types();

    let expected: Vec<(&str, &str)> = vec![("a", "int"), ("b", "float"), ("c", "str"), ("d", "time")];
    let actual: Vec<(&str, &str)> = types.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_unknown_kind_does_not_stop_other_columns() {
    let table = Table::new(vec![
        Column::from_bools("flag", &[true, false, true]),
        Column::from_i64("n", &[1, 2, 3]),
    ])
    .unwrap();

    let summary = summarize(&table, &OverrideMap::new());

    assert_eq!(summary.column_types().len(), 1);
    assert_eq!(summary.column_types()["n"], "int");
    assert!(summary
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnrecognizedColumnKind && d.column == "flag"));
}

#[test]
fn test_override_moves_text_to_category() {
    let mut overrides = OverrideMap::new();
    overrides.insert("c".to_string(), "category".to_string());

    let summary = summarize(&abcd_table(), &overrides);

    assert_eq!(summary.column_types()["c"], "category");
    assert!(summary.to_string().contains("## Category Columns"));
}

#[test]
fn test_persisted_types_reproduce_summary() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("types.yaml");
    let table = Table::new(vec![
        Column::from_i64("a", &[1, 2, 3, 4]),
        Column::from_f64("b", &[Some(1.5), Some(2.25), Some(3.0), Some(3.0)]),
        Column::from_strs(
            "description",
            &[Some("red"), Some("green"), Some("blue"), Some("red")],
        ),
        Column::from_datetimes("date", &[day(1), day(2), day(3), day(4)]),
    ])
    .unwrap();

    let reports = classify(&table, &OverrideMap::new());
    let meta = eda::document::CsvMeta {
        delimiter: ",".to_string(),
        quotechar: "\"".to_string(),
        hash: None,
    };
    TypesDocument::new(meta, reports).save(&path).unwrap();
    let overrides = TypesDocument::load(&path).unwrap().overrides();

    let without = summarize(&table, &OverrideMap::new()).column_types();
    let with = summarize(&table, &overrides).column_types();

    assert_eq!(without, with);
}

// =============================================================================
// Predict Workflow
// =============================================================================

#[test]
fn test_predict_round_trip() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("cities.csv");
    let types_path = dir.path().join("cities.yaml");
    fs::write(
        &csv_path,
        "city;population;founded\nBerlin;3645000;1237-01-01\nParis;2161000;0250-01-01\nRome;2873000;0753-04-21\n",
    )
    .unwrap();

    let explorer = CsvExplorer::new();
    let first = explorer.predict(&csv_path, &types_path).expect("first run");
    assert!(first.created);
    assert_eq!(first.document.csv_meta.delimiter, ";");

    let written = fs::read_to_string(&types_path).unwrap();
    assert!(written.contains("csv_meta:"));
    assert!(written.contains("name: city"));

    let second = explorer.predict(&csv_path, &types_path).expect("second run");
    assert!(!second.created);
    assert_eq!(first.summary.column_types()["population"], "int");
    assert_eq!(second.summary.column_types()["population"], "int");
    // Classified as a category on the first run, the city now reports as one.
    assert_eq!(first.summary.column_types()["city"], "str");
    assert_eq!(second.summary.column_types()["city"], "category");

    let table = load_csv(&csv_path, &types_path).expect("typed load");
    assert_eq!(table.column("population").unwrap().kind, NativeKind::Int64);
}

#[test]
fn test_predict_respects_nrows() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("data.csv");
    fs::write(&csv_path, "x\n1\n2\n3\n4\n5\n").unwrap();

    let config = eda::ExplorerConfig {
        parser: eda::input::ParserConfig {
            max_rows: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let prediction = CsvExplorer::with_config(config)
        .predict(&csv_path, dir.path().join("t.yaml"))
        .unwrap();

    assert_eq!(prediction.summary.datapoints, 2);
}

#[test]
fn test_predict_with_repeated_header() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("data.csv");
    let types_path = dir.path().join("t.yaml");
    fs::write(&csv_path, "a,a,b\n1,2,x\n3,4,y\n").unwrap();

    let prediction = CsvExplorer::new()
        .predict(&csv_path, &types_path)
        .expect("repeated header names are renamed");

    let types = prediction.summary.column_types();
    assert_eq!(types["a"], "int");
    assert_eq!(types["a.1"], "int");
    assert_eq!(types["b"], "str");
    assert!(types_path.exists());
}

#[test]
fn test_predict_rejects_rows_with_extra_fields() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("names.csv");
    let types_path = dir.path().join("t.yaml");
    fs::write(&csv_path, "name,age\nDoe, J,40\n").unwrap();

    let result = CsvExplorer::new().predict(&csv_path, &types_path);

    assert!(matches!(result, Err(eda::EdaError::Parse { row: 0, .. })));
    assert!(!types_path.exists());
}

#[test]
fn test_hand_edited_type_wins() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("data.csv");
    let types_path = dir.path().join("t.yaml");
    fs::write(&csv_path, "code\nA\nB\nA\n").unwrap();

    let explorer = CsvExplorer::new();
    explorer.predict(&csv_path, &types_path).unwrap();

    let mut document = TypesDocument::load(&types_path).unwrap();
    document.columns[0].column_type = Some("category".to_string());
    document.save(&types_path).unwrap();

    let prediction = explorer.predict(&csv_path, &types_path).unwrap();
    assert_eq!(prediction.summary.column_types()["code"], "category");
}
