//! Story records
//!
//! A record is one JSON object of the dataset. Stages read `story` and
//! `dialogues` and append derived fields; every other key is carried through
//! untouched, in its original position.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Field names written and read by the pipeline stages.
pub mod field {
    pub const STORY: &str = "story";
    pub const SENTENCES: &str = "sentences";
    pub const DIALOGUES: &str = "dialogues";
    pub const CHARACTERS: &str = "characters";
}

/// Errors raised when a record field has the wrong shape
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("field '{field}' must be {expected}, found {found}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// One story of the dataset.
///
/// Wraps the raw JSON object so that unknown fields survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryRecord {
    fields: Map<String, Value>,
}

impl StoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record holding only a `story` field.
    pub fn from_story(story: impl Into<String>) -> Self {
        let mut record = Self::new();
        record
            .fields
            .insert(field::STORY.to_string(), Value::String(story.into()));
        record
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The raw story text. A missing field reads as the empty string.
    pub fn story(&self) -> Result<&str, RecordError> {
        match self.fields.get(field::STORY) {
            None => Ok(""),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(invalid(field::STORY, "a string", other)),
        }
    }

    /// Dialogue strings produced by the segmenter. Missing or `null` reads as empty.
    pub fn dialogues(&self) -> Result<Vec<&str>, RecordError> {
        self.string_list(field::DIALOGUES)
    }

    pub fn sentences(&self) -> Result<Vec<&str>, RecordError> {
        self.string_list(field::SENTENCES)
    }

    pub fn characters(&self) -> Result<Vec<&str>, RecordError> {
        self.string_list(field::CHARACTERS)
    }

    pub fn set_sentences(&mut self, sentences: Vec<String>) {
        self.insert(field::SENTENCES, string_array(sentences));
    }

    pub fn set_dialogues(&mut self, dialogues: Vec<String>) {
        self.insert(field::DIALOGUES, string_array(dialogues));
    }

    pub fn set_characters(&mut self, characters: Vec<String>) {
        self.insert(field::CHARACTERS, string_array(characters));
    }

    fn string_list(&self, key: &'static str) -> Result<Vec<&str>, RecordError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.as_str()),
                    other => Err(invalid(key, "an array of strings", other)),
                })
                .collect(),
            Some(other) => Err(invalid(key, "an array of strings", other)),
        }
    }
}

impl From<Map<String, Value>> for StoryRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

fn string_array(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

fn invalid(field: &'static str, expected: &'static str, found: &Value) -> RecordError {
    RecordError::InvalidField {
        field,
        expected,
        found: json_kind(found),
    }
}

/// Short name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
