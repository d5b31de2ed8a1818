#![allow(unused)]
//! Delimited → JSON adapter harness.
//!
//! # What this covers
//!
//! - **Row count and order**: N data rows produce a JSON array of N objects
//!   in input order.
//! - **Encoding**: non-ASCII text is written verbatim, never `\u` escaped.
//! - **Profiles**: the `titles` (TSV) and `reviews` (CSV) profiles end to end.
//! - **Output shape**: insta snapshot of the pretty-printed array.
//! - **Fatal paths**: unreadable input propagates as an error.
//!
//! # Running
//!
//! ```sh
//! cargo test --test delimited_harness
//! ```

mod common;
use common::*;

use flatconv_core::{Config, Delimiter, FieldSpec};
use flatconv_formats::delimited::{self, ConvertError, ConvertOptions};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn titles_options() -> ConvertOptions {
    ConvertOptions::new(Delimiter::Tab, titles_spec())
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Row count and order
// ---------------------------------------------------------------------------

#[test]
fn every_row_becomes_one_object_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "titles.tsv", TITLES_TSV);
    let output = dir.path().join("titles.json");

    let count = delimited::convert(&input, &output, &titles_options()).unwrap();
    assert_eq!(count, TITLES_ROWS);

    let json = read_json(&output);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["tconst"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["tt0211915", "tt0000001", "tt0000002", "tt0000003"]);
}

#[test]
fn titles_fields_are_coerced() {
    let records = delimited::records_from_str(TITLES_TSV, &titles_options()).unwrap();
    assert_eq!(records.len(), TITLES_ROWS);

    let amelie = &records[0];
    assert_field!(amelie, "startYear", 2001);
    assert_null!(amelie, "endYear");
    assert_field!(amelie, "genres", ["Comedy", "Romance"]);
    assert_field!(amelie, "averageRating", 8.3);
    assert_field!(
        amelie,
        "top_3_cast",
        [["nm0851582", "Audrey Tautou"], ["nm0473455", "Mathieu Kassovitz"]]
    );

    let carmencita = &records[1];
    assert_null!(carmencita, "top_3_cast");

    let clown = &records[2];
    assert_null!(clown, "runtimeMinutes");
    assert_field!(clown, "genres", []);
    assert_null!(clown, "numVotes");
    assert_field!(clown, "top_3_cast", "not a literal");

    let pierrot = &records[3];
    assert_field!(pierrot, "primaryTitle", "Pauvre Pierrot");
    assert_field!(pierrot, "genres", ["Animation", "Comedy", "Romance"]);
    assert_null!(pierrot, "averageRating");
    assert_field!(pierrot, "numVotes", 142);
    assert_field!(pierrot, "top_3_cast", []);
}

#[test]
fn keys_follow_header_order() {
    let records = delimited::records_from_str(TITLES_TSV, &titles_options()).unwrap();
    let header: Vec<&str> = TITLES_TSV.lines().next().unwrap().split('\t').collect();
    for record in &records {
        assert_eq!(record.keys().collect::<Vec<_>>(), header);
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn non_ascii_is_written_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "titles.tsv", TITLES_TSV);
    let output = dir.path().join("titles.json");
    delimited::convert(&input, &output, &titles_options()).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("\"Amélie\""));
    assert!(!text.contains("\\u00e9"));
}

// ---------------------------------------------------------------------------
// Reviews profile (CSV)
// ---------------------------------------------------------------------------

#[test]
fn reviews_csv_is_trimmed_passthrough() {
    let cfg = Config::defaults();
    let profile = cfg.profile("reviews").unwrap();
    let options = ConvertOptions::new(profile.delimiter, cfg.field_spec("reviews").unwrap());

    let records = delimited::records_from_str(REVIEWS_CSV, &options).unwrap();
    assert_eq!(records.len(), 3);
    assert_field!(records[0], "quote", "Times are hard for dreamers.");
    assert_field!(records[0], "author", "Amélie Poulain");
    assert_field!(records[1], "title", "Casablanca");
    assert_field!(records[1], "quote", "Here's looking at you, kid.");
    assert_null!(records[2], "quote");
}

// ---------------------------------------------------------------------------
// Output shape
// ---------------------------------------------------------------------------

#[test]
fn snapshot_pretty_array() {
    let text = "tconst\tgenres\tnumVotes\ntt1\tDrama, Short\t12\ntt2\t\t\\N\n";
    let (json, count) = delimited::convert_str(text, &titles_options()).unwrap();
    assert_eq!(count, 2);
    insta::assert_snapshot!(json, @r#"
[
    {
        "tconst": "tt1",
        "genres": [
            "Drama",
            "Short"
        ],
        "numVotes": 12
    },
    {
        "tconst": "tt2",
        "genres": [],
        "numVotes": null
    }
]
"#);
}

#[test]
fn configured_indent_is_honoured() {
    let options = titles_options().with_indent(2);
    let (json, _) = delimited::convert_str("tconst\ntt1\n", &options).unwrap();
    assert_eq!(json, "[\n  {\n    \"tconst\": \"tt1\"\n  }\n]");
}

// ---------------------------------------------------------------------------
// Fatal paths
// ---------------------------------------------------------------------------

#[test]
fn unreadable_input_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let err = delimited::convert(
        &dir.path().join("absent.tsv"),
        &dir.path().join("out.json"),
        &titles_options(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Read { .. }));
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn unwritable_output_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "titles.tsv", TITLES_TSV);
    let output = dir.path().join("no/such/dir/out.json");
    let err = delimited::convert(&input, &output, &titles_options()).unwrap_err();
    assert!(matches!(err, ConvertError::Write { .. }));
}
