//! Character resolver — who appears in a story
//!
//! Two independent extraction strategies feed one working set:
//! - person entities from the entity recognizer
//! - speakers named by attribution templates (`said Tom`, `replied Ann`, ...)
//!
//! The set is then cross-checked against the story's dialogue (when there is
//! any), stripped of pronouns and common words, and sorted.

use crate::nlp::{EntityRecognizer, NlpError};
use crate::pipeline::{RecordStage, StageError};
use crate::record::StoryRecord;
use regex_lite::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

/// Speech-verb templates, each capturing the one word that follows.
///
/// Applied one after another, never merged into a single pattern: a phrase
/// like `said the Teacher` matches both of the first two templates.
pub const ATTRIBUTION_TEMPLATES: [&str; 5] = [
    r"said the ([A-Za-z]+)",
    r"said ([A-Za-z]+)",
    r"told her ([A-Za-z]+)",
    r"told him ([A-Za-z]+)",
    r"replied ([A-Za-z]+)",
];

/// Names kept even when the dialogue never mentions them.
pub const ALWAYS_ACCEPTED: [&str; 2] = ["Mom", "Teacher"];

pub const COMMON_PRONOUNS: [&str; 8] = ["He", "She", "His", "Her", "They", "We", "I", "It"];

pub const COMMON_WORDS: [&str; 15] = [
    "The", "A", "An", "Next", "Ow", "No", "Stop", "That", "This", "Both", "And", "But", "Today",
    "There", "They",
];

static ATTRIBUTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ATTRIBUTION_TEMPLATES
        .iter()
        .map(|t| Regex::new(t).expect("attribution template is valid"))
        .collect()
});

/// Candidate names found by the attribution templates, capitalized.
pub fn attribution_candidates(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for pattern in ATTRIBUTION_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            if let Some(word) = caps.get(1) {
                names.insert(capitalize(word.as_str().trim()));
            }
        }
    }
    names
}

/// First character uppercased, the rest lowercased.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// True for pronouns and common words that are never characters.
pub fn is_noise(name: &str) -> bool {
    COMMON_PRONOUNS.contains(&name) || COMMON_WORDS.contains(&name)
}

/// Keep names that occur in the joined dialogue text, plus the always
/// accepted ones. No dialogue means nothing to check against: all names pass.
fn validate_against_dialogues(names: BTreeSet<String>, dialogues: &[&str]) -> BTreeSet<String> {
    if dialogues.is_empty() {
        return names;
    }
    let dialogue_text = dialogues.join(" ");
    names
        .into_iter()
        .filter(|name| {
            dialogue_text.contains(name.as_str()) || ALWAYS_ACCEPTED.contains(&name.as_str())
        })
        .collect()
}

/// Resolves the character list of a story.
pub struct CharacterResolver {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl CharacterResolver {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Sorted, unique character names for a story.
    pub fn resolve(&self, text: &str, dialogues: &[&str]) -> Result<Vec<String>, NlpError> {
        let mut names = self.entity_candidates(text)?;
        names.extend(attribution_candidates(text));

        let names = validate_against_dialogues(names, dialogues);

        Ok(names.into_iter().filter(|name| !is_noise(name)).collect())
    }

    /// Person entities, trimmed.
    fn entity_candidates(&self, text: &str) -> Result<BTreeSet<String>, NlpError> {
        Ok(self
            .recognizer
            .recognize(text)?
            .into_iter()
            .filter(|entity| entity.is_person())
            .map(|entity| entity.text.trim().to_string())
            .collect())
    }

    /// Write `characters` onto the record.
    pub fn extract_characters(&self, mut record: StoryRecord) -> Result<StoryRecord, StageError> {
        let characters = {
            let story = record.story()?;
            let dialogues = record.dialogues()?;
            self.resolve(story, &dialogues)?
        };
        tracing::trace!(characters = characters.len(), "resolved characters");

        record.set_characters(characters);
        Ok(record)
    }
}

impl RecordStage for CharacterResolver {
    fn label(&self) -> &str {
        "Extracting characters"
    }

    fn process(&self, record: StoryRecord) -> Result<StoryRecord, StageError> {
        self.extract_characters(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Entity, MockNlp};
    use serde_json::json;

    fn resolver(mock: MockNlp) -> CharacterResolver {
        CharacterResolver::new(Arc::new(mock))
    }

    /// Recognizer returning a fixed entity list regardless of input.
    struct FixedEntities(Vec<Entity>);

    impl EntityRecognizer for FixedEntities {
        fn recognize(&self, _text: &str) -> Result<Vec<Entity>, NlpError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn attribution_finds_teacher_without_entities() {
        let text = r#""I am hungry," said the Teacher."#;

        let candidates = attribution_candidates(text);
        assert!(candidates.contains("Teacher"));
        // "said ([A-Za-z]+)" also captures the article
        assert!(candidates.contains("The"));

        let names = resolver(MockNlp::new()).resolve(text, &[]).unwrap();
        assert_eq!(names, ["Teacher"]);
    }

    #[test]
    fn attribution_capitalizes_captured_word() {
        let candidates = attribution_candidates("\"Go,\" replied bOB. \"No,\" told him sam.");
        assert!(candidates.contains("Bob"));
        assert!(candidates.contains("Sam"));
    }

    #[test]
    fn attribution_templates_are_case_sensitive() {
        assert!(attribution_candidates("\"Hi,\" Said Tom.").is_empty());
    }

    #[test]
    fn capitalize_matches_title_case_of_one_word() {
        assert_eq!(capitalize("lILY"), "Lily");
        assert_eq!(capitalize("m"), "M");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn combines_entities_and_attributions() {
        let r = resolver(MockNlp::new().with_people(["Lily"]));
        let names = r
            .resolve("Lily waved. \"Come here,\" said max.", &[])
            .unwrap();
        assert_eq!(names, ["Lily", "Max"]);
    }

    #[test]
    fn ignores_non_person_entities_and_trims_text() {
        let r = CharacterResolver::new(Arc::new(FixedEntities(vec![
            Entity::person("  Ava "),
            Entity::new("Paris", "GPE"),
        ])));
        assert_eq!(r.resolve("anything", &[]).unwrap(), ["Ava"]);
    }

    #[test]
    fn blank_person_mention_is_kept_as_empty_name() {
        let r = CharacterResolver::new(Arc::new(FixedEntities(vec![
            Entity::person("   "),
            Entity::person("Ava"),
        ])));
        assert_eq!(r.resolve("anything", &[]).unwrap(), ["", "Ava"]);
        // The empty string is a substring of any dialogue
        assert_eq!(r.resolve("anything", &["Hi, Ava"]).unwrap(), ["", "Ava"]);
    }

    #[test]
    fn dialogue_filter_drops_names_absent_from_dialogue() {
        let r = resolver(MockNlp::new().with_people(["Lily", "Max"]));
        let text = "Lily and Max played. \"Hi Max!\" said Lily.";
        let names = r.resolve(text, &["Hi Max!"]).unwrap();
        assert_eq!(names, ["Max"]);
    }

    #[test]
    fn dialogue_filter_matches_substrings() {
        let r = resolver(MockNlp::new().with_people(["Ann"]));
        // "Ann" is a substring of "Anna"
        let names = r.resolve("Ann sat.", &["Where is Anna?"]).unwrap();
        assert_eq!(names, ["Ann"]);
    }

    #[test]
    fn dialogue_filter_always_accepts_mom_and_teacher() {
        let r = resolver(MockNlp::new());
        let text = "\"Dinner!\" said Mom. \"Class!\" said the Teacher. \"Hey,\" said Tim.";
        let names = r.resolve(text, &["Dinner!", "Class!", "Hey,"]).unwrap();
        assert_eq!(names, ["Mom", "Teacher"]);
    }

    #[test]
    fn empty_dialogue_list_skips_validation() {
        let r = resolver(MockNlp::new().with_people(["Zed"]));
        assert_eq!(r.resolve("Zed hummed.", &[]).unwrap(), ["Zed"]);
    }

    #[test]
    fn noise_words_never_survive() {
        let r = CharacterResolver::new(Arc::new(FixedEntities(
            COMMON_PRONOUNS
                .iter()
                .chain(COMMON_WORDS.iter())
                .map(|w| Entity::person(*w))
                .chain([Entity::person("Rosa")])
                .collect(),
        )));
        let text = "\"Run,\" said he. \"Stop,\" said the cat.";
        let names = r.resolve(text, &[]).unwrap();
        assert_eq!(names, ["Cat", "Rosa"]);
    }

    #[test]
    fn noise_filter_is_case_sensitive() {
        assert!(is_noise("They"));
        assert!(!is_noise("they"));
        assert!(!is_noise("THE"));
    }

    #[test]
    fn output_is_sorted_by_codepoint() {
        let r = resolver(MockNlp::new().with_people(["zoe", "Zoe", "Émile", "Adam"]));
        let names = r.resolve("Adam zoe Zoe Émile", &[]).unwrap();
        assert_eq!(names, ["Adam", "Zoe", "zoe", "Émile"]);
    }

    #[test]
    fn extract_characters_sets_field() {
        let r = resolver(MockNlp::new().with_people(["Lily"]));
        let record: StoryRecord = serde_json::from_value(json!({
            "story": "Lily smiled. \"Hello,\" said Lily.",
            "dialogues": ["Hello,"],
        }))
        .unwrap();

        let out = r.extract_characters(record).unwrap();
        // Lily is neither in the dialogue nor always accepted
        assert!(out.characters().unwrap().is_empty());
    }

    #[test]
    fn extract_characters_is_idempotent() {
        let r = resolver(MockNlp::new().with_people(["Max"]));
        let record = StoryRecord::from_story("Max ran. \"Wait!\" replied Ruby.");

        let once = r.extract_characters(record).unwrap();
        let twice = r.extract_characters(once.clone()).unwrap();

        assert_eq!(once.characters().unwrap(), ["Max", "Ruby"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_story_has_no_characters() {
        let r = resolver(MockNlp::new());
        let out = r.extract_characters(StoryRecord::from_story("")).unwrap();
        assert!(out.characters().unwrap().is_empty());
    }

    #[test]
    fn recognizer_failure_propagates() {
        let r = resolver(MockNlp::new().failing("ner down"));
        assert!(matches!(
            r.extract_characters(StoryRecord::from_story("x")),
            Err(StageError::Nlp(_))
        ));
    }

    #[test]
    fn malformed_dialogues_are_an_error() {
        let r = resolver(MockNlp::new());
        let record: StoryRecord =
            serde_json::from_value(json!({"story": "x", "dialogues": "oops"})).unwrap();
        assert!(matches!(
            r.extract_characters(record),
            Err(StageError::Record(_))
        ));
    }
}
