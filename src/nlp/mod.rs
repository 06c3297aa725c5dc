//! NLP capabilities — sentence boundaries and named entities
//!
//! The segmenter and the character resolver never do linguistic analysis
//! themselves. They call two capability traits:
//! - `SentenceSplitter`: raw text → sentence spans in source order
//! - `EntityRecognizer`: raw text → labelled entity mentions
//!
//! Implementations:
//! - `rules`: built-in heuristics, no external process (default)
//! - `subprocess`: an external NLP process (e.g. spaCy) spoken to over JSON lines
//! - `MockNlp`: preconfigured responses (testing)
//!
//! A process builds one `NlpBackend` up front and shares it by reference
//! with every per-record call.

pub mod rules;
pub mod subprocess;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use rules::{HeuristicPersonRecognizer, RuleSentenceSplitter};
pub use subprocess::SubprocessNlp;

/// Entity label for people.
pub const PERSON: &str = "PERSON";

/// A labelled entity mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Surface text as it appears in the source
    pub text: String,
    /// Category label, e.g. `PERSON`, `GPE`, `ORG`
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }

    pub fn person(text: impl Into<String>) -> Self {
        Self::new(text, PERSON)
    }

    pub fn is_person(&self) -> bool {
        self.label == PERSON
    }
}

/// Errors from NLP capability calls.
#[derive(Debug, thiserror::Error)]
pub enum NlpError {
    #[error("NLP backend not available: {0}")]
    Unavailable(String),
    #[error("NLP protocol error: {0}")]
    Protocol(String),
    #[error("NLP backend failed: {0}")]
    Backend(String),
}

/// Splits raw text into sentences.
pub trait SentenceSplitter: Send + Sync {
    /// Return sentence spans in left-to-right source order.
    ///
    /// Spans may carry surrounding whitespace; callers trim.
    fn split(&self, text: &str) -> Result<Vec<String>, NlpError>;
}

/// Finds named entities in raw text.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NlpError>;
}

/// The process-wide pair of NLP capabilities.
#[derive(Clone)]
pub struct NlpBackend {
    splitter: Arc<dyn SentenceSplitter>,
    recognizer: Arc<dyn EntityRecognizer>,
}

impl NlpBackend {
    pub fn new(splitter: Arc<dyn SentenceSplitter>, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            splitter,
            recognizer,
        }
    }

    /// Built-in rule-based backend.
    pub fn rules() -> Self {
        Self::new(
            Arc::new(RuleSentenceSplitter::new()),
            Arc::new(HeuristicPersonRecognizer::new()),
        )
    }

    /// Both capabilities served by one external process.
    pub fn subprocess(nlp: SubprocessNlp) -> Self {
        let shared = Arc::new(nlp);
        Self::new(shared.clone(), shared)
    }

    /// Both capabilities served by one mock.
    pub fn mock(mock: MockNlp) -> Self {
        let shared = Arc::new(mock);
        Self::new(shared.clone(), shared)
    }

    pub fn splitter(&self) -> Arc<dyn SentenceSplitter> {
        self.splitter.clone()
    }

    pub fn recognizer(&self) -> Arc<dyn EntityRecognizer> {
        self.recognizer.clone()
    }
}

impl std::fmt::Debug for NlpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpBackend").finish_non_exhaustive()
    }
}

/// Mock NLP for testing — returns preconfigured responses.
///
/// Sentences: the configured list, or the whole text as a single span.
/// Entities: every configured person whose name occurs in the text.
#[derive(Debug, Default)]
pub struct MockNlp {
    sentences: Option<Vec<String>>,
    people: Vec<String>,
    failure: Option<String>,
}

impl MockNlp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentences<I, S>(mut self, sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sentences = Some(sentences.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_people<I, S>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.people = people.into_iter().map(Into::into).collect();
        self
    }

    /// Make every call fail with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    fn check(&self) -> Result<(), NlpError> {
        match &self.failure {
            Some(message) => Err(NlpError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl SentenceSplitter for MockNlp {
    fn split(&self, text: &str) -> Result<Vec<String>, NlpError> {
        self.check()?;
        Ok(self
            .sentences
            .clone()
            .unwrap_or_else(|| vec![text.to_string()]))
    }
}

impl EntityRecognizer for MockNlp {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        self.check()?;
        Ok(self
            .people
            .iter()
            .filter(|name| text.contains(name.trim()))
            .map(|name| Entity::person(name.clone()))
            .collect())
    }
}
