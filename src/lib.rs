//! storyprep: Story Dataset Annotation
//!
//! Two batch stages over a JSON array of story records:
//!
//! 1. **Segmenter** adds `sentences` (from a sentence splitter) and
//!    `dialogues` (every double-quoted span).
//! 2. **Character resolver** adds `characters`: person entities plus speakers
//!    named by attribution phrases, checked against the dialogue and cleaned
//!    of pronouns and common words.
//!
//! Linguistic analysis sits behind the `SentenceSplitter` and
//! `EntityRecognizer` traits so the stage logic runs the same against the
//! built-in rules, an external NLP process, or a test mock.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use storyprep::{CharacterResolver, MockNlp, StoryRecord};
//!
//! let resolver = CharacterResolver::new(Arc::new(MockNlp::new()));
//! let record = StoryRecord::from_story(r#""I am hungry," said the Teacher."#);
//! let record = resolver.extract_characters(record).unwrap();
//! assert_eq!(record.characters().unwrap(), ["Teacher"]);
//! ```

pub mod characters;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod nlp;
pub mod pipeline;
pub mod record;
pub mod segment;

pub use characters::CharacterResolver;
pub use config::{Config, ConfigError};
pub use dataset::{Dataset, DatasetError, DatasetResult};
pub use nlp::{
    Entity, EntityRecognizer, HeuristicPersonRecognizer, MockNlp, NlpBackend, NlpError,
    RuleSentenceSplitter, SentenceSplitter, SubprocessNlp,
};
pub use pipeline::{
    process_dataset, run_stage, BatchReport, PipelineError, PipelineResult, RecordStage, StageError,
};
pub use record::{RecordError, StoryRecord};
pub use segment::{extract_dialogues, Segmenter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
