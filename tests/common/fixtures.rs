//! Static input corpora used across harnesses.

use flatconv_core::{Config, FieldSpec};
use std::path::{Path, PathBuf};

/// IMDb-style title export: header plus four rows covering nulls, bad
/// numbers, stringified cast lists and non-ASCII titles.
pub const TITLES_TSV: &str = "tconst\ttitleType\tprimaryTitle\tstartYear\tendYear\truntimeMinutes\tgenres\taverageRating\tnumVotes\ttop_3_cast
tt0211915\tmovie\tAmélie\t2001\t\\N\t122\tComedy,Romance\t8.3\t800000\t[('nm0851582', 'Audrey Tautou'), ('nm0473455', 'Mathieu Kassovitz')]
tt0000001\tshort\tCarmencita\t1894\t\\N\t1\tDocumentary,Short\t5.7\t2100\t\\N
tt0000002\tshort\tLe clown et ses chiens\t1892\t\\N\tabc\t\t5.5\t\tnot a literal
tt0000003\tshort\t  Pauvre Pierrot  \t1892\t\\N\t5\tAnimation, Comedy ,Romance\tseven\t142\t[]
";

/// Number of data rows in [`TITLES_TSV`].
pub const TITLES_ROWS: usize = 4;

/// Review quotes as comma-separated text with quoted cells.
pub const REVIEWS_CSV: &str = "title,quote,author,tconst
Amélie,\"  Times are hard for dreamers.  \",Amélie Poulain,tt0211915
\"Casablanca\",\"Here's looking at you, kid.\",Rick Blaine,tt0034583
Heat,,Neil McCauley,tt0113277
";

/// Upstream Solr payload for two queries.
pub const SOLR_RESPONSE: &str = r#"{
  "1": {"responseHeader": {"status": 0}, "response": {"numFound": 2, "docs": [
    {"tconst": ["tt0211915"], "averageRating": [8.3]},
    {"tconst": ["tt0034583"], "averageRating": [8.5]}
  ]}},
  "0": {"response": {"docs": [
    {"tconst": ["tt0113277"], "averageRating": [8.0]}
  ]}}
}"#;

/// Solr payload whose second query has no `docs` list.
pub const SOLR_RESPONSE_MISSING_DOCS: &str = r#"{
  "0": {"response": {"docs": [{"tconst": ["tt001"], "averageRating": [8.1]}]}},
  "1": {"response": {"numFound": 0}}
}"#;

/// Field spec of the built-in `titles` profile.
pub fn titles_spec() -> FieldSpec {
    Config::defaults()
        .field_spec("titles")
        .expect("titles profile is built in")
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create fixture dir");
    }
    std::fs::write(&path, contents).expect("write fixture");
    path
}
