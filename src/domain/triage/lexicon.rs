//! Static conversational lexicon.
//!
//! Fixed phrase tables for intent classification, greeting detection, and
//! symptom aliasing. These are compile-time constants shared by every
//! conversation; per-catalog synonyms are merged in by the matcher at
//! construction time.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Phrases that affirm an entire pending batch.
pub const AFFIRMATIONS: &[&str] = &[
    "yes",
    "y",
    "yeah",
    "yep",
    "sure",
    "correct",
    "right",
    "i do",
    "i have",
    "affirmative",
];

/// Phrases that negate an entire pending batch.
pub const NEGATIONS: &[&str] = &[
    "no",
    "n",
    "nope",
    "nah",
    "negative",
    "i don't",
    "i do not",
    "i havent",
    "haven't",
];

/// Phrases expressing uncertainty about a pending batch.
pub const UNCERTAINTY: &[&str] = &[
    "maybe",
    "not sure",
    "unsure",
    "idk",
    "dont know",
    "don't know",
];

/// Exact greeting phrases, including explicit restart signals.
pub const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "yo",
    "hola",
    "hi there",
    "hello there",
    "assalamualaikum",
    "as-salamu alaykum",
    "salam",
    "good morning",
    "good afternoon",
    "good evening",
    "start",
    "start again",
    "restart",
];

/// Short interjections accepted as a greeting when followed only by
/// punctuation or whitespace ("hey!!", "hello.").
pub const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "yo"];

/// Closing-remark phrases, matched loosely by containment.
pub const THANKS: &[&str] = &[
    "thanks",
    "thank you",
    "thx",
    "ty",
    "appreciate it",
    "many thanks",
];

/// Farewell phrases, matched loosely by containment.
pub const FAREWELLS: &[&str] = &["bye", "goodbye", "see you", "take care", "okay bye", "ok bye"];

/// Built-in informal-phrase aliases mapping to canonical symptom tokens.
pub const SYMPTOM_ALIASES: &[(&str, &str)] = &[
    // snake bite variants
    ("snakebite", "snake bite"),
    ("snake-bite", "snake bite"),
    ("snake", "snake bite"),
    ("bitten by snake", "snake bite"),
    ("bitten by a snake", "snake bite"),
    // burn variants
    ("burnt", "burn"),
    ("burned", "burn"),
    ("burn injury", "burn"),
    ("hand burn", "burn"),
    ("burn on hand", "burn"),
];

/// Friendly display labels for symptom tokens that read poorly as-is.
static FRIENDLY_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("mosquito", "recent mosquito bites or exposure"),
        ("shortness of breath", "shortness of breath"),
        ("loss of smell", "loss of smell"),
    ])
});

/// Returns the user-facing label for a symptom token.
pub fn friendly_label(token: &str) -> &str {
    FRIENDLY_LABELS.get(token).copied().unwrap_or(token)
}
