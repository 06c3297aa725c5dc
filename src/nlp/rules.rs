//! Built-in rule-based NLP
//!
//! Heuristic stand-ins for a statistical pipeline, tuned for short English
//! narrative prose. They need no model files and no external process.

use super::{Entity, EntityRecognizer, NlpError, SentenceSplitter};
use std::collections::HashSet;

const TERMINATORS: [char; 4] = ['.', '!', '?', '…'];

/// Characters that may trail a terminator and still belong to the sentence.
const CLOSERS: [char; 7] = ['"', '\'', ')', ']', '”', '’', '»'];

const OPENERS: [char; 7] = ['"', '\'', '(', '[', '“', '‘', '«'];

/// Words that take a period without ending the sentence.
const ABBREVIATIONS: [&str; 17] = [
    "Mr", "Mrs", "Ms", "Dr", "Prof", "St", "Jr", "Sr", "Mt", "Capt", "Gen", "Lt", "Sgt", "Col",
    "vs", "e.g", "i.e",
];

/// Titles that precede a name.
const TITLES: [&str; 10] = [
    "Mr", "Mrs", "Ms", "Dr", "Prof", "Miss", "Sir", "Capt", "Lt", "Sgt",
];

/// Sentence splitter driven by punctuation, abbreviations and blank lines.
///
/// A boundary falls after a run of terminators (plus any closing quotes or
/// brackets) that is followed by whitespace, unless:
/// - the period closes a known abbreviation or a single-letter initial
/// - the next word starts lowercase (`"Run!" said Tom.` stays one sentence)
///
/// A blank line always ends the current sentence.
#[derive(Debug, Default, Clone)]
pub struct RuleSentenceSplitter;

impl RuleSentenceSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl SentenceSplitter for RuleSentenceSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>, NlpError> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut spans = Vec::new();
        let mut start = 0;
        let mut i = 0;

        let mut push = |from: usize, to: usize| {
            let span = &text[from..to];
            if !span.trim().is_empty() {
                spans.push(span.to_string());
            }
        };

        while i < chars.len() {
            let (pos, c) = chars[i];

            if c == '\n' && is_blank_line_at(&chars, i) {
                push(start, pos);
                start = pos;
                i += 1;
                continue;
            }

            if !TERMINATORS.contains(&c) {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() && TERMINATORS.contains(&chars[j].1) {
                j += 1;
            }
            while j < chars.len() && CLOSERS.contains(&chars[j].1) {
                j += 1;
            }

            let at_end = j == chars.len();
            if at_end || chars[j].1.is_whitespace() {
                let end = if at_end { text.len() } else { chars[j].0 };
                let abbreviated = c == '.' && ends_with_abbreviation(&text[start..pos]);
                if !abbreviated && !continues_lowercase(&chars[j..]) {
                    push(start, end);
                    start = end;
                }
            }
            i = j;
        }

        push(start, text.len());
        Ok(spans)
    }
}

/// True when the newline at `i` is followed by another line break with only
/// horizontal whitespace in between.
fn is_blank_line_at(chars: &[(usize, char)], i: usize) -> bool {
    chars[i + 1..]
        .iter()
        .map(|&(_, c)| c)
        .find(|&c| !matches!(c, ' ' | '\t' | '\r'))
        == Some('\n')
}

fn ends_with_abbreviation(before_period: &str) -> bool {
    let word = before_period
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| OPENERS.contains(&c));

    if ABBREVIATIONS.contains(&word) {
        return true;
    }

    // Single-letter initials ("J. K."), but not the pronoun "I"
    let mut letters = word.chars();
    matches!(
        (letters.next(), letters.next()),
        (Some(c), None) if c.is_uppercase() && c != 'I'
    )
}

fn continues_lowercase(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|&(_, c)| c)
        .find(|c| !c.is_whitespace())
        .is_some_and(char::is_lowercase)
}

/// Person recognizer based on capitalisation.
///
/// Runs of capitalised words that are neither sentence-initial nor
/// dialogue-initial, and not common function words, are reported as
/// `PERSON`. A title (`Mr.`, `Miss`, ...) is dropped but lets the following
/// word count as a name even at the start of a sentence.
#[derive(Debug, Clone)]
pub struct HeuristicPersonRecognizer {
    common_words: HashSet<&'static str>,
}

impl Default for HeuristicPersonRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicPersonRecognizer {
    pub fn new() -> Self {
        let common_words: HashSet<&str> = [
            "The", "This", "That", "These", "Those", "When", "Where", "What", "Which", "While",
            "With", "From", "Into", "Upon", "About", "After", "Before", "During", "Then", "There",
            "Here", "Now", "Once", "One", "Every", "Each", "Some", "All", "Both", "But", "And",
            "For", "Not", "Yes", "No", "Oh", "Hello", "Hi", "Bye", "Goodbye", "Please", "Thank",
            "Thanks", "Okay", "OK", "Wow", "Look", "Let", "Come", "Good", "Today", "Tomorrow",
            "Yesterday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
            "Sunday", "January", "February", "March", "April", "June", "July", "August",
            "September", "October", "November", "December", "God", "Christmas", "English",
        ]
        .into_iter()
        .collect();
        Self { common_words }
    }

    fn is_name_word(&self, word: &str) -> bool {
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        first.is_uppercase()
            && word.chars().count() >= 2
            && word.chars().all(|c| c.is_alphabetic() || c == '-')
            && !word.chars().all(char::is_uppercase)
            && !self.common_words.contains(word)
    }
}

/// A whitespace token split into its name-bearing core and context flags.
struct Token<'a> {
    core: &'a str,
    quote_initial: bool,
    trailing_punct: bool,
    ends_sentence: bool,
}

impl<'a> Token<'a> {
    fn parse(raw: &'a str) -> Self {
        let opened = raw.trim_start_matches(|c: char| OPENERS.contains(&c));
        let quote_initial = opened.len() != raw.len();

        let closed = opened.trim_end_matches(|c: char| CLOSERS.contains(&c));
        let ends_sentence = closed.ends_with(|c: char| TERMINATORS.contains(&c));

        let stripped = opened.trim_end_matches(|c: char| {
            c.is_ascii_punctuation() || CLOSERS.contains(&c) || c == '…'
        });
        let trailing_punct = stripped.len() != opened.len();
        let core = stripped
            .strip_suffix("'s")
            .or_else(|| stripped.strip_suffix("’s"))
            .unwrap_or(stripped);

        Self {
            core,
            quote_initial,
            trailing_punct,
            ends_sentence,
        }
    }
}

impl EntityRecognizer for HeuristicPersonRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        let mut entities = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut sentence_start = true;
        let mut after_title = false;

        let mut close = |run: &mut Vec<&str>| {
            if !run.is_empty() {
                entities.push(Entity::person(run.join(" ")));
                run.clear();
            }
        };

        for raw in text.split_whitespace() {
            let token = Token::parse(raw);

            if TITLES.contains(&token.core) {
                close(&mut run);
                after_title = true;
                sentence_start = false;
                continue;
            }

            let initial = (sentence_start || token.quote_initial) && !after_title;
            after_title = false;

            if !initial && self.is_name_word(token.core) {
                run.push(token.core);
                if token.trailing_punct {
                    close(&mut run);
                }
            } else {
                close(&mut run);
            }

            sentence_start = token.ends_sentence;
        }
        close(&mut run);

        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<String> {
        RuleSentenceSplitter::new()
            .split(text)
            .unwrap()
            .into_iter()
            .map(|s| s.trim().to_string())
            .collect()
    }

    fn people(text: &str) -> Vec<String> {
        HeuristicPersonRecognizer::new()
            .recognize(text)
            .unwrap()
            .into_iter()
            .map(|e| e.text)
            .collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            sentences("Tom ran to the park. He fell down! Was he hurt?"),
            ["Tom ran to the park.", "He fell down!", "Was he hurt?"]
        );
    }

    #[test]
    fn keeps_abbreviations_and_initials_inside_sentence() {
        assert_eq!(
            sentences("Mr. Brown waved at J. K. Lee. Lily waved back."),
            ["Mr. Brown waved at J. K. Lee.", "Lily waved back."]
        );
    }

    #[test]
    fn pronoun_i_still_ends_a_sentence() {
        assert_eq!(sentences("So did I. Then we ate."), ["So did I.", "Then we ate."]);
    }

    #[test]
    fn quoted_speech_with_lowercase_attribution_stays_together() {
        assert_eq!(
            sentences("\"Run!\" said Tom. Then he left."),
            ["\"Run!\" said Tom.", "Then he left."]
        );
    }

    #[test]
    fn closing_quote_belongs_to_the_sentence() {
        assert_eq!(
            sentences("She said, \"Hello there.\" Then she left."),
            ["She said, \"Hello there.\"", "Then she left."]
        );
    }

    #[test]
    fn blank_line_ends_a_sentence() {
        assert_eq!(
            sentences("Once upon a time\n\nThe end"),
            ["Once upon a time", "The end"]
        );
    }

    #[test]
    fn empty_and_blank_text_have_no_sentences() {
        assert!(sentences("").is_empty());
        assert!(sentences("   \n\n  ").is_empty());
    }

    #[test]
    fn finds_mid_sentence_names() {
        assert_eq!(people("Yesterday Lily met Max at the park."), ["Lily", "Max"]);
    }

    #[test]
    fn skips_sentence_and_quote_initial_words() {
        assert_eq!(people("\"Hello,\" said Lily. Birds sang."), ["Lily"]);
    }

    #[test]
    fn title_introduces_a_name() {
        assert_eq!(people("Mr. Brown smiled at Sam."), ["Brown", "Sam"]);
    }

    #[test]
    fn joins_consecutive_capitalised_words() {
        assert_eq!(people("The cat saw Lady Rose Green today."), ["Lady Rose Green"]);
    }

    #[test]
    fn strips_possessive_suffix() {
        assert_eq!(people("They played with Ben's ball."), ["Ben"]);
    }
}
