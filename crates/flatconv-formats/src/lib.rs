//! flatconv-formats — format adapters for flatconv.
//!
//! Each adapter drives the core normalizer (or reads a search payload) over
//! one input and serialises the result to one sink:
//!
//! - [`delimited`]: TSV/CSV with a header row → JSON array
//! - [`trec`]: Solr response → TREC run lines and qrels

pub mod delimited;
pub mod trec;

pub use delimited::{convert, ConvertError, ConvertOptions};
pub use trec::{to_qrels, to_run_lines, QrelLine, RunLine, SearchResponse, TrecError, TrecFields};
