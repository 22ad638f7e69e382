//! End-to-end conformance runs: a real source (in-memory and on-disk JSON),
//! a real gzip golden fixture, and the full comparison pipeline.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use colcheck_json::JsonFileSource;
use colcheck_oracle::{
    canonicalize, compare_to_golden, compare_to_golden_with_capacity, format_divergence,
    structural_check, ComparisonOutcome,
};
use colcheck_types::{CellValue, ColumnType, ColumnarSource, Field, FixtureLayout, Schema, VecSource};
use flate2::write::GzEncoder;
use flate2::Compression;

fn write_golden(path: &Path, lines: &[String]) {
    let file = File::create(path).unwrap();
    let mut enc = GzEncoder::new(file, Compression::default());
    for line in lines {
        writeln!(enc, "{line}").unwrap();
    }
    enc.finish().unwrap();
}

fn map_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", ColumnType::Int),
        Field::new(
            "attrs",
            ColumnType::Map {
                key: Box::new(ColumnType::String),
                value: Box::new(ColumnType::String),
            },
        ),
    ])
    .unwrap()
}

#[test]
fn map_columns_reconcile_across_emitter_spellings() {
    // Golden writers serialize map entries as {"key":…,"value":…}; the
    // renderer under test emits {"_key":…,"_value":…}.  Canonicalization
    // must land both on the same text.
    let dir = tempfile::tempdir().unwrap();
    let golden = dir.path().join("maps.jsn.gz");
    write_golden(
        &golden,
        &[r#"{"id": 1, "attrs": [{"key": "color", "value": "red"}]}"#.to_owned()],
    );

    let mut source = VecSource::new(
        map_schema(),
        vec![vec![
            CellValue::Integer(1),
            CellValue::Map(vec![(
                CellValue::Text("color".to_owned()),
                CellValue::Text("red".to_owned()),
            )]),
        ]],
    )
    .unwrap();

    let outcome = compare_to_golden(&mut source, &golden).unwrap();
    assert!(outcome.is_match(), "{}", format_divergence(&outcome));
}

#[test]
fn literal_key_in_row_data_still_matches_when_both_sides_agree() {
    // The documented canonicalizer limitation: a string value "key" is
    // rewritten to "_key" on both sides, so equal data still matches.
    let schema = Schema::new(vec![Field::new("word", ColumnType::String)]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let golden = dir.path().join("words.jsn.gz");
    write_golden(&golden, &[r#"{"word": "key"}"#.to_owned()]);

    let mut source = VecSource::new(
        schema,
        vec![vec![CellValue::Text("key".to_owned())]],
    )
    .unwrap();

    assert!(compare_to_golden(&mut source, &golden).unwrap().is_match());
}

#[test]
fn literal_key_data_can_collide_with_renamed_spelling() {
    // The flip side of the limitation: "_key" and "key" as *data* become
    // indistinguishable after canonicalization.  Kept as a pinned behavior.
    assert_eq!(
        canonicalize(r#"{"word":"key"}"#),
        canonicalize(r#"{"word":"_key"}"#)
    );
}

#[test]
fn default_capacity_batch_with_five_rows_compares_five_rows() {
    let schema = Schema::new(vec![Field::new("n", ColumnType::BigInt)]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let golden = dir.path().join("five.jsn.gz");
    write_golden(
        &golden,
        &(0..5).map(|i| format!("{{\"n\":{i}}}")).collect::<Vec<_>>(),
    );

    let mut source = VecSource::new(
        schema,
        (0..5).map(|i| vec![CellValue::Integer(i)]).collect(),
    )
    .unwrap();

    // Capacity 1024, five valid rows: slots 5..1024 are never read.
    let outcome = compare_to_golden_with_capacity(&mut source, &golden, 1024).unwrap();
    assert_eq!(outcome, ComparisonOutcome::Match { rows_compared: 5 });
}

#[test]
fn json_file_source_end_to_end_with_layout() {
    let dir = tempfile::tempdir().unwrap();
    let layout = FixtureLayout::new(dir.path());
    std::fs::create_dir_all(dir.path().join("expected")).unwrap();

    let schema = Schema::new(vec![
        Field::new("id", ColumnType::BigInt),
        Field::new("score", ColumnType::Double),
    ])
    .unwrap();

    let data_path: PathBuf = layout.data_path("run1");
    std::fs::write(
        &data_path,
        "{\"id\":1,\"score\":0.5}\n{\"id\":2,\"score\":1.5}\n",
    )
    .unwrap();
    write_golden(
        &layout.golden_path("run1"),
        &[
            r#"{"id": 1, "score": 0.5}"#.to_owned(),
            r#"{"id": 2, "score": 1.5}"#.to_owned(),
        ],
    );

    let mut source = JsonFileSource::open(schema, &data_path).unwrap();
    assert_eq!(source.row_count(), 2);

    let outcome = compare_to_golden(&mut source, &layout.golden_path("run1")).unwrap();
    assert_eq!(outcome, ComparisonOutcome::Match { rows_compared: 2 });

    let report = structural_check(&mut source, &layout.golden_path("run1")).unwrap();
    assert!(report.is_consistent(), "{}", report.summary());
}

#[test]
fn structural_check_flags_what_value_comparison_catches() {
    // Same cardinality, different values: the value comparison fails, the
    // structural report stays consistent.  This is why the structural path
    // must never be the sole check.
    let schema = Schema::new(vec![Field::new("n", ColumnType::BigInt)]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let golden = dir.path().join("g.jsn.gz");
    write_golden(&golden, &[r#"{"n": 42}"#.to_owned()]);

    let mut source =
        VecSource::new(schema, vec![vec![CellValue::Integer(41)]]).unwrap();

    let outcome = compare_to_golden(&mut source, &golden).unwrap();
    assert!(matches!(outcome, ComparisonOutcome::ContentMismatch { row_index: 0, .. }));

    let report = structural_check(&mut source, &golden).unwrap();
    assert!(report.is_consistent());
}

#[test]
fn comparison_releases_golden_between_runs() {
    // Reopening the fixture yields a fresh, independent stream: two
    // back-to-back comparisons over the same paths agree.
    let schema = Schema::new(vec![Field::new("n", ColumnType::BigInt)]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let golden = dir.path().join("g.jsn.gz");
    write_golden(&golden, &[r#"{"n": 1}"#.to_owned()]);

    let mut source = VecSource::new(schema, vec![vec![CellValue::Integer(1)]]).unwrap();

    for _ in 0..2 {
        let outcome = compare_to_golden(&mut source, &golden).unwrap();
        assert_eq!(outcome, ComparisonOutcome::Match { rows_compared: 1 });
    }
}

#[test]
fn error_paths_do_not_leak_into_outcomes() {
    // Missing fixture is an error, not a divergence outcome.
    let schema = Schema::new(vec![Field::new("n", ColumnType::BigInt)]).unwrap();
    let mut source = VecSource::new(schema, vec![]).unwrap();
    let missing = PathBuf::from("/nonexistent/golden.jsn.gz");
    assert!(compare_to_golden(&mut source, &missing).is_err());
}
