//! Loading JSON-lines documents into an index.

use pathdex_core::{CoreError, EntityKey, IndexConfig, Indexable, PageIndex};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while reading a documents file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A line is not valid JSON.
    #[error("line {line}: {source}")]
    Json {
        /// One-based line number.
        line: usize,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A line holds JSON that is not an object.
    #[error("line {line}: expected a JSON object")]
    NotAnObject {
        /// One-based line number.
        line: usize,
    },

    /// The index rejected a document.
    #[error(transparent)]
    Index(#[from] CoreError),
}

/// One line of a documents file.
///
/// Identified by the value of the key field when it holds a string,
/// number or boolean, and by its line number (shown as `#line:N`)
/// otherwise. The identity also carries the kind of key, so `"1"`, `1`
/// and line 1 are three different documents.
#[derive(Debug, Clone)]
pub struct Document {
    key: String,
    identity: EntityKey,
    body: serde_json::Value,
}

impl Document {
    /// Wraps a parsed line.
    pub fn new(body: serde_json::Value, key_field: &str, line: usize) -> Self {
        let (kind, key) = match body.get(key_field) {
            Some(serde_json::Value::String(s)) => ("text", s.clone()),
            Some(v @ serde_json::Value::Number(_)) => ("number", v.to_string()),
            Some(v @ serde_json::Value::Bool(_)) => ("bool", v.to_string()),
            _ => ("line", format!("#line:{line}")),
        };
        let identity = EntityKey::new(format!("{kind}:{key}"));
        Self {
            key,
            identity,
            body,
        }
    }

    /// Returns the key as shown to users.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the parsed JSON.
    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

impl Indexable for Document {
    fn entity_key(&self) -> EntityKey {
        self.identity.clone()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

/// Reads `path` and indexes every non-blank line.
///
/// Lines sharing a key are folded into one entity.
pub fn load(path: &Path, key_field: &str, config: IndexConfig) -> Result<PageIndex<Document>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut index = PageIndex::with_config(config);
    let mut lines = 0usize;
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line_no = number + 1;
        let line = line.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let body: serde_json::Value = serde_json::from_str(&line)
            .map_err(|source| LoadError::Json { line: line_no, source })?;
        if !body.is_object() {
            return Err(LoadError::NotAnObject { line: line_no });
        }

        index.index(Document::new(body, key_field, line_no))?;
        lines += 1;
    }

    debug!(lines, "Read documents file");
    info!("Indexed {} documents from {:?}", index.len(), path);
    Ok(index)
}
