//! Record loading from the data directory.
//!
//! Every file in the data directory with a recognized extension holds exactly
//! one record:
//!
//! ```text
//! data/recipes/
//! ├── banana-bread.json        # → Record { slug: "banana-bread", ... }
//! ├── shakshuka.toml           # TOML works too
//! ├── notes.txt                # ignored (unrecognized extension)
//! └── drafts/                  # ignored (not a file)
//! ```
//!
//! A record must carry string `slug` and `headline` keys. Everything else is
//! passed through to templates untouched. Beyond those two existence checks
//! no content validation happens here.
//!
//! Files are read in file-name order so that ties in the later headline sort
//! resolve the same way on every machine.

use crate::types::Record;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data directory not found: {path}: {source}")]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("{path}: missing string field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    #[error("{path}: slug {slug:?} cannot be used as a file name")]
    InvalidSlug { path: PathBuf, slug: String },
}

/// Data file extensions recognized as records (compared case-insensitively).
pub const DATA_EXTENSIONS: &[&str] = &["json", "toml"];

/// Whether `path` has a recognized data file extension.
pub fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| DATA_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Load one record per recognized data file in `dir`.
///
/// An empty directory yields an empty list. The returned order is file-name
/// order, which is not meaningful to callers beyond being deterministic.
pub fn load_records(dir: &Path) -> Result<Vec<Record>, LoadError> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::NotFound {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_data_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        let record = load_record(path)?;
        log::debug!("loaded record {:?} from {}", record.slug, path.display());
        records.push(record);
    }
    Ok(records)
}

/// Parse a single data file into a [`Record`].
pub fn load_record(path: &Path) -> Result<Record, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let object = parse_object(path, &content)?;
    record_from_object(path, object)
}

/// Parse file content into a key/value object, choosing the format by
/// extension.
fn parse_object(path: &Path, content: &str) -> Result<Map<String, Value>, LoadError> {
    let parse_err = |message: String| LoadError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let value: Value = if is_toml {
        let table: toml::Table = toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
        toml_to_json(toml::Value::Table(table))
    } else {
        serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(parse_err(format!(
            "expected an object at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

/// Convert TOML into template context. Datetimes become their RFC 3339
/// text; non-finite floats, which JSON cannot hold, become their string form.
pub(crate) fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pull the required fields out of a parsed object.
fn record_from_object(path: &Path, mut fields: Map<String, Value>) -> Result<Record, LoadError> {
    let mut take = |field: &'static str| match fields.remove(field) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(LoadError::MissingField {
            path: path.to_path_buf(),
            field,
        }),
    };
    let slug = take("slug")?;
    let headline = take("headline")?;

    if !is_valid_slug(&slug) {
        return Err(LoadError::InvalidSlug {
            path: path.to_path_buf(),
            slug,
        });
    }

    Ok(Record {
        slug,
        headline,
        fields,
    })
}

/// A slug becomes `<slug>.html` in the output root, so it must be a plain
/// file stem: non-blank, no path separator, and not `.` or `..` on its own.
/// Dots inside a stem (`v1..2`) are harmless.
fn is_valid_slug(slug: &str) -> bool {
    !slug.trim().is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
