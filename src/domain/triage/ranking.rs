//! Evidence-based condition ranking and follow-up selection.
//!
//! All three operations are pure reads over the shared catalog: `score`
//! ranks candidates against accumulated evidence, `matching_conditions`
//! scopes the search to records still consistent with the confirmed set, and
//! `next_batch` picks the most informative unresolved symptoms to ask about
//! next.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use super::catalog::ConditionCatalog;
use super::state::TriageState;

/// Default number of symptoms per follow-up batch.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// One ranked candidate condition.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCondition {
    pub name: String,
    pub score: f64,
}

/// Scores and selects follow-ups over a shared, immutable catalog.
#[derive(Debug, Clone)]
pub struct RankingEngine {
    catalog: Arc<ConditionCatalog>,
}

impl RankingEngine {
    /// Creates a ranking engine over the given catalog.
    pub fn new(catalog: Arc<ConditionCatalog>) -> Self {
        Self { catalog }
    }

    /// Ranks catalog records against the accumulated evidence.
    ///
    /// Records are skipped when ruled out, when their core-symptom set is
    /// empty, or when an only-set excludes any confirmed symptom. The score
    /// is the confirmed overlap, plus half a point per maybe-overlap once at
    /// least one symptom is confirmed — pure uncertainty never outranks pure
    /// silence. Zero scores are dropped. Ties keep catalog order.
    pub fn score(
        &self,
        confirmed: &HashSet<String>,
        ruled_out: &HashSet<String>,
        maybe: &HashSet<String>,
    ) -> Vec<RankedCondition> {
        let mut ranked = Vec::new();
        for record in self.catalog.records() {
            if ruled_out.contains(record.name()) || record.core_symptoms().is_empty() {
                continue;
            }
            if !record.permits_confirmed(confirmed) {
                continue;
            }
            let overlap = record.core_set().intersection(confirmed).count();
            let maybe_count = record.core_set().intersection(maybe).count();
            let score = if overlap > 0 {
                overlap as f64 + 0.5 * maybe_count as f64
            } else {
                0.0
            };
            if score > 0.0 {
                ranked.push(RankedCondition {
                    name: record.name().to_string(),
                    score,
                });
            }
        }
        // Stable sort: equal scores stay in catalog order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Returns the names of records whose core-symptom set contains every
    /// seed symptom, in catalog order. An empty seed matches everything.
    pub fn matching_conditions(&self, seed: &HashSet<String>) -> Vec<&str> {
        self.catalog
            .records()
            .iter()
            .filter(|record| seed.iter().all(|s| record.core_set().contains(s)))
            .map(|record| record.name())
            .collect()
    }

    /// Selects up to `k` unresolved symptoms to ask about next.
    ///
    /// Tallies distinct-token frequency across every condition still matching
    /// the confirmed set, excluding symptoms already confirmed, denied,
    /// asked, or marked maybe. Candidates are ordered by descending
    /// frequency, then ascending token length, then alphabetically; frequency
    /// ties break toward shorter phrasing.
    pub fn next_batch(&self, state: &TriageState, k: usize) -> Vec<String> {
        let candidates = self.matching_conditions(state.confirmed());
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut freq: HashMap<&str, usize> = HashMap::new();
        for name in candidates {
            let record = match self.catalog.get(name) {
                Some(record) => record,
                None => continue,
            };
            for symptom in record.core_set() {
                if state.confirmed().contains(symptom)
                    || state.denied().contains(symptom)
                    || state.asked().contains(symptom)
                    || state.maybe().contains(symptom)
                {
                    continue;
                }
                *freq.entry(symptom.as_str()).or_insert(0) += 1;
            }
        }
        if freq.is_empty() {
            return Vec::new();
        }

        let mut remaining: Vec<(&str, usize)> = freq.into_iter().collect();
        remaining.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.len().cmp(&b.0.len()))
                .then_with(|| a.0.cmp(b.0))
        });
        remaining
            .into_iter()
            .take(k)
            .map(|(symptom, _)| symptom.to_string())
            .collect()
    }
}
