//! Shared immutable engine bundle.
//!
//! A `TriageEngine` packages the catalog with the matcher and ranking
//! services derived from it. Constructed once at startup and shared via
//! `Arc` across every conversation; nothing in it mutates after
//! construction.

use std::sync::Arc;

use super::catalog::ConditionCatalog;
use super::matcher::TextMatcher;
use super::ranking::RankingEngine;

/// Catalog + matcher + ranking, immutable and shareable.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    catalog: Arc<ConditionCatalog>,
    matcher: TextMatcher,
    ranking: RankingEngine,
}

impl TriageEngine {
    /// Builds the engine from a loaded catalog.
    pub fn new(catalog: ConditionCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let matcher = TextMatcher::new(&catalog);
        let ranking = RankingEngine::new(Arc::clone(&catalog));
        Self {
            catalog,
            matcher,
            ranking,
        }
    }

    /// The condition catalog.
    pub fn catalog(&self) -> &ConditionCatalog {
        &self.catalog
    }

    /// The text matcher.
    pub fn matcher(&self) -> &TextMatcher {
        &self.matcher
    }

    /// The ranking engine.
    pub fn ranking(&self) -> &RankingEngine {
        &self.ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::catalog::ConditionRecord;

    #[test]
    fn engine_wires_matcher_to_catalog_symptoms() {
        let engine = TriageEngine::new(ConditionCatalog::new(vec![ConditionRecord::new(
            "Flu",
            vec!["fever".to_string()],
        )]));

        assert!(engine.catalog().known_symptoms().contains("fever"));
        assert!(!engine.matcher().extract_symptoms("i have fever").is_empty());
    }
}
