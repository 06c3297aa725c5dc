//! Segmenter — sentences and quoted dialogue
//!
//! Derives two views of a story's raw text: the ordered sentences (from the
//! sentence splitter capability) and the contents of every double-quoted span.

use crate::nlp::{NlpError, SentenceSplitter};
use crate::pipeline::{RecordStage, StageError};
use crate::record::StoryRecord;
use regex_lite::Regex;
use std::sync::{Arc, LazyLock};

/// Non-greedy span between two straight double quotes, within one line.
static DIALOGUE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(.*?)""#).expect("dialogue pattern is valid"));

/// Contents of every double-quoted span, trimmed, empties dropped.
///
/// Quotes pair up left to right with no notion of nesting or escaping, so an
/// odd number of quote characters leaves the last one unmatched.
pub fn extract_dialogues(text: &str) -> Vec<String> {
    DIALOGUE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// Adds `sentences` and `dialogues` to story records.
pub struct Segmenter {
    splitter: Arc<dyn SentenceSplitter>,
}

impl Segmenter {
    pub fn new(splitter: Arc<dyn SentenceSplitter>) -> Self {
        Self { splitter }
    }

    /// Sentences in source order, trimmed, empties dropped.
    pub fn split_sentences(&self, text: &str) -> Result<Vec<String>, NlpError> {
        Ok(self
            .splitter
            .split(text)?
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Write `sentences` and `dialogues` onto the record.
    pub fn preprocess_story(&self, mut record: StoryRecord) -> Result<StoryRecord, StageError> {
        let story = record.story()?;
        let sentences = self.split_sentences(story)?;
        let dialogues = extract_dialogues(story);
        tracing::trace!(
            sentences = sentences.len(),
            dialogues = dialogues.len(),
            "segmented story"
        );

        record.set_sentences(sentences);
        record.set_dialogues(dialogues);
        Ok(record)
    }
}

impl RecordStage for Segmenter {
    fn label(&self) -> &str {
        "Processing stories"
    }

    fn process(&self, record: StoryRecord) -> Result<StoryRecord, StageError> {
        self.preprocess_story(record)
    }
}
