//! Text normalization, symptom extraction, and intent classification.
//!
//! The matcher is a pure function bundle over the static lexicon plus the
//! catalog-derived symptom and alias tables. Whole-word matching is a
//! substring scan with explicit word-boundary checks; a token must not be
//! preceded or followed by a word character, so "burnout" never matches
//! "burn". Longer tokens are always tried first.

use std::collections::HashSet;

use super::catalog::ConditionCatalog;
use super::lexicon;

/// Global answer intent for a pending question batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Yes,
    No,
    Maybe,
}

/// Extracts symptoms and conversational intents from raw utterances.
///
/// Immutable after construction; safe to share across conversations.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    /// `variant -> canonical` alias pairs, longest variant first.
    aliases: Vec<(String, String)>,
    /// Known symptom tokens, longest first.
    symptoms: Vec<String>,
}

impl TextMatcher {
    /// Builds a matcher from the catalog's known symptoms and synonyms merged
    /// with the built-in alias table.
    pub fn new(catalog: &ConditionCatalog) -> Self {
        let mut aliases: Vec<(String, String)> = lexicon::SYMPTOM_ALIASES
            .iter()
            .map(|&(variant, canonical)| (variant.to_string(), canonical.to_string()))
            .collect();
        for (variant, canonical) in catalog.synonym_pairs() {
            if !aliases.iter().any(|(v, _)| v == variant) {
                aliases.push((variant.to_string(), canonical.to_string()));
            }
        }
        aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut symptoms: Vec<String> = catalog.known_symptoms().iter().cloned().collect();
        symptoms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self { aliases, symptoms }
    }

    /// Collapses whitespace, trims, and lowercases. Never fails.
    pub fn normalize(text: &str) -> String {
        text.to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Extracts every known symptom token mentioned in `text`.
    ///
    /// Alias substitution runs first, then direct hits against the known
    /// symptom tokens; the result is the union of both.
    pub fn extract_symptoms(&self, text: &str) -> HashSet<String> {
        let normalized = Self::normalize(text);
        let mut found = HashSet::new();

        for (variant, canonical) in &self.aliases {
            if contains_whole_word(&normalized, variant) {
                found.insert(canonical.clone());
            }
        }
        for token in &self.symptoms {
            if contains_whole_word(&normalized, token) {
                found.insert(token.clone());
            }
        }

        found
    }

    /// Classifies a whole-batch answer intent.
    ///
    /// Affirmation, negation, and uncertainty phrase sets are checked in that
    /// priority order; the first set containing a whole-word hit wins.
    pub fn classify_intent(&self, text: &str) -> Option<Intent> {
        let normalized = Self::normalize(text);
        if phrase_hit(&normalized, lexicon::AFFIRMATIONS) {
            Some(Intent::Yes)
        } else if phrase_hit(&normalized, lexicon::NEGATIONS) {
            Some(Intent::No)
        } else if phrase_hit(&normalized, lexicon::UNCERTAINTY) {
            Some(Intent::Maybe)
        } else {
            None
        }
    }

    /// True for exact greeting phrases or a short interjection followed only
    /// by punctuation/whitespace.
    pub fn is_greeting(&self, text: &str) -> bool {
        let normalized = Self::normalize(text);
        if lexicon::GREETINGS.contains(&normalized.as_str()) {
            return true;
        }
        lexicon::GREETING_WORDS.iter().any(|word| {
            normalized.starts_with(word)
                && normalized[word.len()..]
                    .chars()
                    .all(|c| c == '!' || c == '.' || c == ' ')
        })
    }

    /// Loose containment check for thanks phrases.
    pub fn is_thanks(&self, text: &str) -> bool {
        let normalized = Self::normalize(text);
        lexicon::THANKS.iter().any(|k| normalized.contains(k))
    }

    /// Loose containment check for farewell phrases.
    pub fn is_farewell(&self, text: &str) -> bool {
        let normalized = Self::normalize(text);
        lexicon::FAREWELLS.iter().any(|k| normalized.contains(k))
    }
}

fn phrase_hit(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_whole_word(normalized, p))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Substring search requiring non-word characters (or the string edge) on
/// both sides of the match.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return true;
        }
        from = start + needle.chars().next().map_or(1, char::len_utf8);
    }
    false
}
