//! Unicode-aware tokenization and lemmatization
//!
//! Pages are split into UAX #29 words, tagged with a heuristic part of speech
//! and reduced to a lowercase lemma. Only content words are kept for
//! vectorization.

use crate::types::{PosTag, Token};
use unicode_segmentation::UnicodeSegmentation;

const ADJECTIVE_SUFFIXES: &[&str] = &["ful", "less", "ous", "ive", "able", "ible", "al", "ic"];
const VERB_SUFFIXES: &[&str] = &["ing", "ed", "ize", "ise"];
const NOUN_SUFFIXES: &[&str] = &["tion", "sion", "ness", "ment", "ity", "er", "or", "ship"];

/// A stateless tokenizer and lemmatizer.
///
/// Construct it once and share it; it holds no per-document state, so it can
/// be used from several threads at the same time.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Minimum token length (in chars) to consider
    min_token_length: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a new tokenizer with default settings
    pub fn new() -> Self {
        Self {
            min_token_length: 1,
        }
    }

    /// Set minimum token length
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_token_length = min_length;
        self
    }

    /// Tokenize a page into tagged, lemmatized tokens
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        text.unicode_words()
            .filter(|word| word.chars().count() >= self.min_token_length)
            .filter(|word| word.chars().any(|c| c.is_alphanumeric()))
            .map(|word| {
                let pos = self.guess_pos(word);
                Token::new(word, self.lemmatize(word), pos)
            })
            .collect()
    }

    /// Lemmas of the content words of a page, in reading order
    pub fn content_lemmas(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|token| token.pos.is_content_word())
            .map(|token| token.lemma)
            .collect()
    }

    /// Heuristic part-of-speech tag for a single word
    pub fn guess_pos(&self, word: &str) -> PosTag {
        let lower = word.to_lowercase();

        if let Some(pos) = closed_class(&lower) {
            return pos;
        }

        if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return PosTag::Numeral;
        }

        let mut chars = word.chars();
        if chars.next().is_some_and(char::is_uppercase) && chars.all(char::is_lowercase) {
            return PosTag::ProperNoun;
        }

        if lower.ends_with("ly") && lower.chars().count() > 3 {
            return PosTag::Adverb;
        }
        if has_suffix(&lower, ADJECTIVE_SUFFIXES) {
            return PosTag::Adjective;
        }
        if has_suffix(&lower, VERB_SUFFIXES) {
            return PosTag::Verb;
        }
        if has_suffix(&lower, NOUN_SUFFIXES) {
            return PosTag::Noun;
        }

        PosTag::Noun
    }

    /// Reduce a word to a lowercase lemma using simple English morphology
    pub fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        let len = lower.len();

        if !lower.is_ascii() || len < 4 {
            return lower;
        }

        if let Some(stem) = lower.strip_suffix("ies") {
            return format!("{}y", stem);
        }
        if let Some(stem) = lower.strip_suffix("ied") {
            return format!("{}y", stem);
        }
        if let Some(stem) = lower.strip_suffix("es") {
            if ["ss", "sh", "ch", "x", "o"].iter().any(|s| stem.ends_with(s)) {
                return stem.to_string();
            }
        }
        if let Some(stem) = lower.strip_suffix("ing") {
            if stem.len() >= 3 {
                return undouble(stem);
            }
        }
        if let Some(stem) = lower.strip_suffix("ed") {
            if stem.len() >= 3 {
                return undouble(stem);
            }
        }
        if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
            return lower[..len - 1].to_string();
        }

        lower
    }
}

fn has_suffix(word: &str, suffixes: &[&str]) -> bool {
    suffixes
        .iter()
        .any(|suffix| word.len() > suffix.len() + 2 && word.ends_with(suffix))
}

/// Drop a doubled final consonant ("stopp" -> "stop")
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !b"aeiouls".contains(&bytes[n - 1]) {
        stem[..n - 1].to_string()
    } else {
        stem.to_string()
    }
}

fn closed_class(lower: &str) -> Option<PosTag> {
    let pos = match lower {
        "a" | "an" | "the" | "this" | "that" | "these" | "those" | "my" | "your" | "his"
        | "her" | "its" | "our" | "their" | "some" | "any" | "each" | "every" | "no" => {
            PosTag::Determiner
        }
        "and" | "or" | "but" | "nor" | "so" | "yet" | "if" | "because" | "while" | "though"
        | "although" | "when" | "unless" | "until" | "since" | "than" => PosTag::Conjunction,
        "of" | "to" | "in" | "for" | "on" | "with" | "at" | "from" | "by" | "about" | "as"
        | "into" | "like" | "through" | "after" | "over" | "between" | "out" | "against"
        | "during" | "without" | "before" | "under" | "around" | "among" | "upon" => {
            PosTag::Preposition
        }
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "us" | "them"
        | "myself" | "yourself" | "himself" | "herself" | "itself" | "ourselves"
        | "themselves" | "who" | "whom" | "what" | "which" => PosTag::Pronoun,
        "not" | "n't" | "up" | "off" => PosTag::Particle,
        "is" | "am" | "are" | "was" | "were" | "be" | "been" | "being" | "do" | "does"
        | "did" | "have" | "has" | "had" | "will" | "would" | "shall" | "should" | "can"
        | "could" | "may" | "might" | "must" => PosTag::Other,
        _ => return None,
    };
    Some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("The cat sat on the mat.");

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "cat", "sat", "on", "the", "mat"]);
    }

    #[test]
    fn test_content_lemmas_drop_function_words() {
        let tokenizer = Tokenizer::new();
        let lemmas = tokenizer.content_lemmas("The rabbits were running under the hedges");

        assert!(lemmas.contains(&"rabbit".to_string()));
        assert!(lemmas.contains(&"run".to_string()));
        assert!(!lemmas.contains(&"the".to_string()));
        assert!(!lemmas.contains(&"under".to_string()));
        assert!(!lemmas.contains(&"were".to_string()));
    }

    #[test]
    fn test_lemmatization() {
        let tokenizer = Tokenizer::new();

        assert_eq!(tokenizer.lemmatize("running"), "run");
        assert_eq!(tokenizer.lemmatize("cats"), "cat");
        assert_eq!(tokenizer.lemmatize("studies"), "study");
        assert_eq!(tokenizer.lemmatize("boxes"), "box");
        assert_eq!(tokenizer.lemmatize("glass"), "glass");
        assert_eq!(tokenizer.lemmatize("Alice"), "alice");
    }

    #[test]
    fn test_pos_guessing() {
        let tokenizer = Tokenizer::new();

        assert_eq!(tokenizer.guess_pos("beautiful"), PosTag::Adjective);
        assert_eq!(tokenizer.guess_pos("walking"), PosTag::Verb);
        assert_eq!(tokenizer.guess_pos("quickly"), PosTag::Adverb);
        assert_eq!(tokenizer.guess_pos("information"), PosTag::Noun);
        assert_eq!(tokenizer.guess_pos("Hyde"), PosTag::ProperNoun);
        assert_eq!(tokenizer.guess_pos("the"), PosTag::Determiner);
        assert_eq!(tokenizer.guess_pos("1920"), PosTag::Numeral);
    }

    #[test]
    fn test_unicode_handling() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Café résumé naïve.");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].lemma, "café");
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.content_lemmas("  \n ").is_empty());
    }

    #[test]
    fn test_min_length() {
        let tokenizer = Tokenizer::new().with_min_length(4);
        let tokens = tokenizer.tokenize("an old lighthouse keeper");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["lighthouse", "keeper"]);
    }
}
