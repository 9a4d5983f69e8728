//! Core types for page_graph
//!
//! This module defines the small value types shared across the crate: tokens
//! produced by the preprocessing service, page windows, and the dataset
//! configuration.

use crate::errors::{PageGraphError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Token
// ============================================================================

/// Part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    Numeral,
    Particle,
    ProperNoun,
    Other,
}

impl PosTag {
    /// Whether tokens with this tag survive preprocessing.
    ///
    /// Only open-class words carry topical signal; function words and numbers
    /// are dropped before vectorization.
    pub fn is_content_word(&self) -> bool {
        matches!(
            self,
            PosTag::Noun | PosTag::Verb | PosTag::Adjective | PosTag::Adverb | PosTag::ProperNoun
        )
    }
}

/// A token from a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The surface form (original text)
    pub text: String,
    /// The lemmatized, lowercased form
    pub lemma: String,
    /// Part-of-speech tag
    pub pos: PosTag,
}

impl Token {
    /// Create a new token
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, pos: PosTag) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos,
        }
    }
}

// ============================================================================
// Window
// ============================================================================

/// A half-open range `[start, end)` over a book's page sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of pages covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the pages covered by this window
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.start..self.end]
    }
}

impl From<(usize, usize)> for Window {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// What the dataset assembler does when one book fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookErrorPolicy {
    /// Log the failure, record the book as skipped and keep going
    #[default]
    Skip,
    /// Stop the whole run with the book's error
    Abort,
}

impl std::str::FromStr for BookErrorPolicy {
    type Err = PageGraphError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "skip" => Ok(BookErrorPolicy::Skip),
            "abort" => Ok(BookErrorPolicy::Abort),
            other => Err(PageGraphError::invalid_config(format!(
                "on_book_error must be 'skip' or 'abort', got '{}'",
                other
            ))),
        }
    }
}

/// Configuration for dataset assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Target page count for the re-paginated whole-book graph
    pub num_pages: usize,
    /// Pages per windowed subgraph
    pub window_size: usize,
    /// Permutations drawn per graph
    pub num_perms: usize,
    /// Delimiter between a book's natural pages
    #[serde(default = "default_page_delimiter")]
    pub page_delimiter: String,
    /// Seed for the permutation RNG (None = OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Failure policy for individual books
    #[serde(default)]
    pub on_book_error: BookErrorPolicy,
    /// Store the incident weight sum as a node feature
    #[serde(default = "default_true")]
    pub weight_sums: bool,
}

fn default_page_delimiter() -> String {
    "\n\n".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            num_pages: 100,
            window_size: 100,
            num_perms: 10,
            page_delimiter: default_page_delimiter(),
            seed: None,
            on_book_error: BookErrorPolicy::Skip,
            weight_sums: true,
        }
    }
}

impl DatasetConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_pages < 2 {
            return Err(PageGraphError::invalid_config(format!(
                "num_pages must be >= 2, got {}",
                self.num_pages
            )));
        }

        if self.window_size < 2 {
            return Err(PageGraphError::invalid_config(format!(
                "window_size must be >= 2, got {}",
                self.window_size
            )));
        }

        if self.num_perms == 0 {
            return Err(PageGraphError::invalid_config("num_perms must be > 0"));
        }

        if self.page_delimiter.is_empty() {
            return Err(PageGraphError::invalid_config(
                "page_delimiter must not be empty",
            ));
        }

        Ok(())
    }

    /// Builder method: set target page count
    pub fn with_num_pages(mut self, num_pages: usize) -> Self {
        self.num_pages = num_pages;
        self
    }

    /// Builder method: set window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Builder method: set permutations per graph
    pub fn with_num_perms(mut self, num_perms: usize) -> Self {
        self.num_perms = num_perms;
        self
    }

    /// Builder method: set page delimiter
    pub fn with_page_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.page_delimiter = delimiter.into();
        self
    }

    /// Builder method: set RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set book failure policy
    pub fn with_on_book_error(mut self, policy: BookErrorPolicy) -> Self {
        self.on_book_error = policy;
        self
    }

    /// Builder method: toggle the weight-sum node feature
    pub fn with_weight_sums(mut self, enabled: bool) -> Self {
        self.weight_sums = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DatasetConfig::default();
        assert_eq!(config.num_pages, 100);
        assert_eq!(config.window_size, 100);
        assert_eq!(config.num_perms, 10);
        assert_eq!(config.page_delimiter, "\n\n");
        assert_eq!(config.on_book_error, BookErrorPolicy::Skip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(DatasetConfig::new().with_num_pages(1).validate().is_err());
        assert!(DatasetConfig::new().with_window_size(0).validate().is_err());
        assert!(DatasetConfig::new().with_num_perms(0).validate().is_err());
        assert!(DatasetConfig::new()
            .with_page_delimiter("")
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_serde_missing_fields_default() {
        let json = r#"{"num_pages": 50, "window_size": 40, "num_perms": 3}"#;
        let config = DatasetConfig::from_json(json).unwrap();
        assert_eq!(config.num_pages, 50);
        assert_eq!(config.window_size, 40);
        assert_eq!(config.page_delimiter, "\n\n");
        assert_eq!(config.seed, None);
        assert!(config.weight_sums);
    }

    #[test]
    fn test_config_serde_policy() {
        let json = r#"{"num_pages": 50, "window_size": 40, "num_perms": 3, "on_book_error": "abort", "seed": 7}"#;
        let config = DatasetConfig::from_json(json).unwrap();
        assert_eq!(config.on_book_error, BookErrorPolicy::Abort);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_config_from_json_rejects_invalid() {
        let json = r#"{"num_pages": 0, "window_size": 40, "num_perms": 3}"#;
        assert!(matches!(
            DatasetConfig::from_json(json),
            Err(PageGraphError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse::<BookErrorPolicy>().unwrap(), BookErrorPolicy::Skip);
        assert_eq!("ABORT".parse::<BookErrorPolicy>().unwrap(), BookErrorPolicy::Abort);
        assert!("retry".parse::<BookErrorPolicy>().is_err());
    }

    #[test]
    fn test_window_slice() {
        let pages = vec!["a", "b", "c", "d"];
        let window = Window::new(1, 3);
        assert_eq!(window.len(), 2);
        assert_eq!(window.slice(&pages), &["b", "c"]);
        assert_eq!(Window::from((0, 4)).len(), 4);
    }

    #[test]
    fn test_content_words() {
        assert!(PosTag::Noun.is_content_word());
        assert!(PosTag::Adverb.is_content_word());
        assert!(!PosTag::Determiner.is_content_word());
        assert!(!PosTag::Numeral.is_content_word());
    }
}
