//! Delimited text → JSON adapter.
//!
//! Reads a tab- or comma-separated file with a header row, normalises every
//! row against a [`FieldSpec`] and writes the whole collection as one
//! pretty-printed JSON array. Non-ASCII text is written verbatim.

use flatconv_core::{normalize, Delimiter, FieldSpec, NormalizedRecord, RawRecord};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Indentation width used when none is configured.
pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialise records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How a delimited source is read and written.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub delimiter: Delimiter,
    pub spec: FieldSpec,
    pub indent: usize,
}

impl ConvertOptions {
    pub fn new(delimiter: Delimiter, spec: FieldSpec) -> Self {
        Self {
            delimiter,
            spec,
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Parse `text` into raw records keyed by the header row.
///
/// Rows shorter than the header get absent trailing cells; cells past the
/// header width are dropped. Quoting is read leniently: a stray or
/// unterminated quote is kept as cell text rather than rejected.
pub fn read_records(text: &str, delimiter: Delimiter) -> Result<Vec<RawRecord>, ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row = result?;
        if row.len() > headers.len() {
            tracing::debug!(
                row = index + 1,
                cells = row.len(),
                columns = headers.len(),
                "row wider than header, extra cells dropped"
            );
        }

        let mut raw = RawRecord::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            raw.push(name, row.get(i).map(str::to_string));
        }
        records.push(raw);
    }

    Ok(records)
}

/// Read and normalise every row of `text`, in input order.
pub fn records_from_str(
    text: &str,
    options: &ConvertOptions,
) -> Result<Vec<NormalizedRecord>, ConvertError> {
    Ok(read_records(text, options.delimiter)?
        .iter()
        .map(|raw| normalize(raw, &options.spec))
        .collect())
}

/// Write `records` as an indented JSON array.
pub fn write_json<W: Write>(
    writer: W,
    records: &[NormalizedRecord],
    indent: usize,
) -> Result<(), serde_json::Error> {
    let indent = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    records.serialize(&mut serializer)
}

/// Render `records` as an indented JSON array.
pub fn to_json_string(records: &[NormalizedRecord], indent: usize) -> Result<String, ConvertError> {
    let mut buf = Vec::new();
    write_json(&mut buf, records, indent)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Convert `text` straight to JSON. Returns the JSON and the record count.
pub fn convert_str(text: &str, options: &ConvertOptions) -> Result<(String, usize), ConvertError> {
    let records = records_from_str(text, options)?;
    let json = to_json_string(&records, options.indent)?;
    Ok((json, records.len()))
}

/// Convert the delimited file at `input` into a JSON file at `output`.
///
/// Returns the number of records written. Failing to read `input` or decode
/// it as UTF-8 is fatal.
pub fn convert(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<usize, ConvertError> {
    let bytes = std::fs::read(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConvertError::Decode {
        path: input.to_path_buf(),
        source,
    })?;

    let (json, count) = convert_str(&text, options)?;
    std::fs::write(output, json).map_err(|source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        records = count,
        delimiter = %options.delimiter,
        "conversion finished"
    );
    Ok(count)
}
