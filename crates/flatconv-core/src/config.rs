//! Configuration types for flatconv.
//!
//! [`Config::defaults`] returns the built-in profiles and settings.
//! [`Config::load`] layers an optional user file (TOML, YAML or JSON, picked
//! by extension) over those defaults. Nothing is read from the environment.

use crate::field_spec::{FieldCategory, FieldSpec, SpecError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[convert]
null_sentinel   = '\N'
indent          = 4
default_profile = "titles"

# IMDb title export with derived columns.
[profiles.titles]
delimiter    = "tab"
integer      = ["startYear", "endYear", "runtimeMinutes", "numVotes"]
float        = ["averageRating", "weightedRating"]
literal_list = ["top_3_cast"]
comma_list   = ["genres"]

# Plain title export: numeric coercion only.
[profiles.basics]
delimiter = "tab"
integer   = ["startYear", "endYear", "runtimeMinutes", "numVotes"]
float     = ["averageRating", "weightedRating"]

# Review quotes: title, quote, author, tconst.
[profiles.reviews]
delimiter = "comma"

[trec]
input       = "results/solr_results.json"
run_id      = "run0"
id_field    = "tconst"
score_field = "averageRating"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    #[serde(default)]
    pub trec: TrecConfig,
}

/// `[convert]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    #[serde(default = "default_null_sentinel")]
    pub null_sentinel: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default = "default_profile")]
    pub default_profile: String,
}

fn default_null_sentinel() -> String { crate::field_spec::DEFAULT_NULL_SENTINEL.to_string() }
fn default_indent() -> usize { 4 }
fn default_profile() -> String { "titles".to_string() }

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            null_sentinel: default_null_sentinel(),
            indent: default_indent(),
            default_profile: default_profile(),
        }
    }
}

/// Column separator of a delimited source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Comma => write!(f, "comma"),
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tab" | "tsv" | "\t" | "\\t" => Ok(Delimiter::Tab),
            "comma" | "csv" | "," => Ok(Delimiter::Comma),
            other => Err(format!("unknown delimiter {other:?} (expected tab or comma)")),
        }
    }
}

/// `[profiles.<name>]` section: delimiter plus field categories.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub integer: Vec<String>,
    #[serde(default)]
    pub float: Vec<String>,
    #[serde(default)]
    pub literal_list: Vec<String>,
    #[serde(default)]
    pub comma_list: Vec<String>,
}

impl Profile {
    /// Build a [`FieldSpec`], rejecting a field listed under two categories.
    pub fn field_spec(&self, null_sentinel: &str) -> Result<FieldSpec, SpecError> {
        let mut spec = FieldSpec::new().with_null_sentinel(null_sentinel);
        spec.declare_all(&self.integer, FieldCategory::Integer)?;
        spec.declare_all(&self.float, FieldCategory::Float)?;
        spec.declare_all(&self.literal_list, FieldCategory::LiteralList)?;
        spec.declare_all(&self.comma_list, FieldCategory::CommaList)?;
        Ok(spec)
    }
}

/// `[trec]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TrecConfig {
    #[serde(default = "default_trec_input")]
    pub input: PathBuf,
    #[serde(default = "default_run_id")]
    pub run_id: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_score_field")]
    pub score_field: String,
}

fn default_trec_input() -> PathBuf { PathBuf::from("results").join("solr_results.json") }
fn default_run_id() -> String { "run0".to_string() }
fn default_id_field() -> String { "tconst".to_string() }
fn default_score_field() -> String { "averageRating".to_string() }

impl Default for TrecConfig {
    fn default() -> Self {
        Self {
            input: default_trec_input(),
            run_id: default_run_id(),
            id_field: default_id_field(),
            score_field: default_score_field(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Layer `path`, when given, over the built-in defaults. A path that
    /// does not exist is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> anyhow::Result<&Profile> {
        self.profiles.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
            anyhow::anyhow!("unknown profile {name:?} (available: {})", known.join(", "))
        })
    }

    /// Field spec for `name`, using the configured null sentinel.
    pub fn field_spec(&self, name: &str) -> anyhow::Result<FieldSpec> {
        Ok(self.profile(name)?.field_spec(&self.convert.null_sentinel)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
