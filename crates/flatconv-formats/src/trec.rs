//! Solr response → TREC adapter.
//!
//! A search response maps each query id to a Solr payload of the shape
//! `{"response": {"docs": [{"<id>": [v], "<score>": [v]}, ...]}}`. Every
//! document becomes one [`RunLine`] (or [`QrelLine`]), ranked by its position
//! in the response; scores are reported, never re-sorted.
//!
//! Unlike the normalizer, this adapter is fail-fast: one malformed query
//! entry rejects the whole batch.

use flatconv_core::normalizer::parse_integer;
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The fixed iteration column of a TREC run file.
pub const RUN_ITERATION: &str = "Q0";

#[derive(Debug, thiserror::Error)]
pub enum TrecError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid JSON document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid Solr response format. Expected an object keyed by query id.")]
    NotAnObject,
    #[error("Invalid Solr response format. Query id {0:?} is not an integer.")]
    InvalidQueryId(String),
    #[error("Invalid Solr response format. 'docs' key not found for query {query_id}.")]
    MissingDocs { query_id: String },
    #[error("Invalid Solr response format. Document {position} of query {query_id} has no {field:?} value.")]
    MissingField {
        query_id: String,
        position: usize,
        field: String,
    },
}

/// Names of the per-document id and score fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrecFields {
    pub id_field: String,
    pub score_field: String,
}

impl TrecFields {
    pub fn new(id_field: impl Into<String>, score_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            score_field: score_field.into(),
        }
    }
}

impl Default for TrecFields {
    fn default() -> Self {
        Self::new("tconst", "averageRating")
    }
}

/// One line of a TREC run file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLine {
    pub query_id: i64,
    pub doc_id: String,
    /// 1-based position in the response's document list.
    pub rank: usize,
    pub score: String,
    pub run_id: String,
}

impl fmt::Display for RunLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.query_id, RUN_ITERATION, self.doc_id, self.rank, self.score, self.run_id
        )
    }
}

/// One line of a TREC qrels file; every returned document is judged relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrelLine {
    pub query_id: i64,
    pub doc_id: String,
}

impl fmt::Display for QrelLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0 {} 1", self.query_id, self.doc_id)
    }
}

/// A parsed search response. Query order follows the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    queries: Map<String, Value>,
}

impl SearchResponse {
    pub fn from_value(value: Value) -> Result<Self, TrecError> {
        match value {
            Value::Object(queries) => Ok(Self { queries }),
            _ => Err(TrecError::NotAnObject),
        }
    }

    /// Read and parse the response file at `path`.
    pub fn load(path: &Path) -> Result<Self, TrecError> {
        let text = std::fs::read_to_string(path).map_err(|source| TrecError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value = serde_json::from_str(&text).map_err(|source| TrecError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Each query id with its document list, in response order.
    fn queries(&self) -> impl Iterator<Item = Result<(i64, &str, &[Value]), TrecError>> + '_ {
        self.queries.iter().map(|(key, entry)| {
            let query_id =
                parse_integer(key).ok_or_else(|| TrecError::InvalidQueryId(key.clone()))?;
            let docs = entry
                .get("response")
                .and_then(|r| r.get("docs"))
                .and_then(Value::as_array)
                .ok_or_else(|| TrecError::MissingDocs {
                    query_id: key.clone(),
                })?;
            Ok((query_id, key.as_str(), docs.as_slice()))
        })
    }
}

impl std::str::FromStr for SearchResponse {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let queries = serde_json::from_str::<Map<String, Value>>(s)?;
        Ok(Self { queries })
    }
}

/// Unwrap Solr's single-element list around a stored field and render the
/// scalar: strings verbatim, numbers in JSON form.
fn field_text(doc: &Value, field: &str) -> Option<String> {
    let value = match doc.get(field)? {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_field(
    doc: &Value,
    field: &str,
    query_id: &str,
    position: usize,
) -> Result<String, TrecError> {
    field_text(doc, field).ok_or_else(|| TrecError::MissingField {
        query_id: query_id.to_string(),
        position,
        field: field.to_string(),
    })
}

/// Build the run lines for every query, failing on the first malformed entry.
pub fn to_run_lines(
    response: &SearchResponse,
    run_id: &str,
    fields: &TrecFields,
) -> Result<Vec<RunLine>, TrecError> {
    let mut lines = Vec::new();
    for query in response.queries() {
        let (query_id, key, docs) = query?;
        for (index, doc) in docs.iter().enumerate() {
            let rank = index + 1;
            lines.push(RunLine {
                query_id,
                doc_id: required_field(doc, &fields.id_field, key, rank)?,
                rank,
                score: required_field(doc, &fields.score_field, key, rank)?,
                run_id: run_id.to_string(),
            });
        }
    }
    tracing::debug!(queries = response.len(), lines = lines.len(), run_id, "built run lines");
    Ok(lines)
}

/// Build qrels marking every returned document relevant.
pub fn to_qrels(
    response: &SearchResponse,
    fields: &TrecFields,
) -> Result<Vec<QrelLine>, TrecError> {
    let mut lines = Vec::new();
    for query in response.queries() {
        let (query_id, key, docs) = query?;
        for (index, doc) in docs.iter().enumerate() {
            lines.push(QrelLine {
                query_id,
                doc_id: required_field(doc, &fields.id_field, key, index + 1)?,
            });
        }
    }
    Ok(lines)
}

/// Write one line per item, each terminated by `\n`.
pub fn write_lines<W: Write, T: fmt::Display>(mut writer: W, lines: &[T]) -> std::io::Result<()> {
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
