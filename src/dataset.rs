//! Dataset files
//!
//! A dataset is a single JSON document whose top level is an array of story
//! records. It is read fully into memory and written fully back out.

use crate::record::{json_kind, StoryRecord};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Indentation used for written datasets.
const INDENT: &[u8] = b"    ";

/// Errors that can occur while reading or writing a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset must be a JSON array, found {0}")]
    NotAnArray(&'static str),

    #[error("record {index} must be a JSON object, found {found}")]
    RecordNotObject { index: usize, found: &'static str },
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// An ordered sequence of story records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<StoryRecord>,
}

impl Dataset {
    pub fn new(records: Vec<StoryRecord>) -> Self {
        Self { records }
    }

    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a dataset from JSON text.
    pub fn from_json_str(content: &str) -> DatasetResult<Self> {
        let value: Value = serde_json::from_str(content)?;
        let items = match value {
            Value::Array(items) => items,
            other => return Err(DatasetError::NotAnArray(json_kind(&other))),
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(StoryRecord::from_map(fields)),
                other => Err(DatasetError::RecordNotObject {
                    index,
                    found: json_kind(&other),
                }),
            })
            .collect::<DatasetResult<Vec<_>>>()?;

        Ok(Self { records })
    }

    /// Render the dataset as pretty-printed JSON.
    ///
    /// Four-space indentation, non-ASCII kept literal, no trailing newline.
    pub fn to_json_string(&self) -> DatasetResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.records.serialize(&mut serializer)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the dataset to a JSON file, creating parent directories.
    ///
    /// The document is rendered before the file is touched, so a
    /// serialization failure leaves no output behind.
    pub fn save(&self, path: impl AsRef<Path>) -> DatasetResult<()> {
        let path = path.as_ref();
        let content = self.to_json_string()?;
        let write_err = |source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)
    }

    pub fn records(&self) -> &[StoryRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StoryRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<StoryRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = StoryRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_array_top_level() {
        let err = Dataset::from_json_str(r#"{"story": "x"}"#).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnArray("an object")));
    }

    #[test]
    fn rejects_non_object_records() {
        let err = Dataset::from_json_str(r#"[{"story": "x"}, "y"]"#).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::RecordNotObject { index: 1, found: "a string" }
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = Dataset::from_json_str("[{").unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let err = Dataset::load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn renders_four_space_indent_and_literal_unicode() {
        let dataset = Dataset::new(vec![StoryRecord::from_story("Zoë smiled.")]);
        let json = dataset.to_json_string().unwrap();
        assert_eq!(json, "[\n    {\n        \"story\": \"Zoë smiled.\"\n    }\n]");
    }

    #[test]
    fn numbers_pass_through_unchanged() {
        let json = concat!(
            "[\n    {\n",
            "        \"id\": 123456789012345678901234567890,\n",
            "        \"score\": 0.10000000000000000555,\n",
            "        \"story\": \"\"\n",
            "    }\n]"
        );
        let dataset = Dataset::from_json_str(json).unwrap();
        assert_eq!(dataset.to_json_string().unwrap(), json);
    }

    #[test]
    fn empty_dataset_renders_as_empty_array() {
        assert_eq!(Dataset::default().to_json_string().unwrap(), "[]");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("processed").join("out.json");
        let dataset = Dataset::new(vec![StoryRecord::from_story("A cat sat.")]);

        dataset.save(&path).unwrap();

        let reloaded = Dataset::load(&path).unwrap();
        assert_eq!(reloaded, dataset);
    }
}
