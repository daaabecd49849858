//! Per-conversation triage state.
//!
//! One `TriageState` exists per conversation and is owned exclusively by its
//! dialogue state machine. The mutators keep `confirmed`, `denied`, and
//! `maybe` pairwise disjoint: resolving a symptom one way withdraws any
//! earlier resolution.

use std::collections::HashSet;

/// Accumulated evidence and question-tracking for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageState {
    confirmed: HashSet<String>,
    denied: HashSet<String>,
    maybe: HashSet<String>,
    asked: HashSet<String>,
    pending_batch: Vec<String>,
    overview_shown: bool,
    ruled_out: HashSet<String>,
}

impl TriageState {
    /// Creates an empty state for a fresh conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Symptoms the user has affirmed.
    pub fn confirmed(&self) -> &HashSet<String> {
        &self.confirmed
    }

    /// Symptoms the user has negated.
    pub fn denied(&self) -> &HashSet<String> {
        &self.denied
    }

    /// Symptoms the user was uncertain about.
    pub fn maybe(&self) -> &HashSet<String> {
        &self.maybe
    }

    /// Symptoms already posed to the user.
    pub fn asked(&self) -> &HashSet<String> {
        &self.asked
    }

    /// Condition names excluded from consideration. No producer sets this
    /// today; scoring must still honor it.
    pub fn ruled_out(&self) -> &HashSet<String> {
        &self.ruled_out
    }

    /// Symptoms awaiting a yes/no/maybe answer this turn.
    pub fn pending_batch(&self) -> &[String] {
        &self.pending_batch
    }

    /// True once the multi-candidate overview has been emitted.
    pub fn overview_shown(&self) -> bool {
        self.overview_shown
    }

    /// Marks symptoms as confirmed, withdrawing denied/maybe resolutions.
    pub fn confirm_all(&mut self, symptoms: impl IntoIterator<Item = String>) {
        for symptom in symptoms {
            self.denied.remove(&symptom);
            self.maybe.remove(&symptom);
            self.confirmed.insert(symptom);
        }
    }

    /// Marks symptoms as denied, withdrawing confirmed/maybe resolutions.
    pub fn deny_all(&mut self, symptoms: impl IntoIterator<Item = String>) {
        for symptom in symptoms {
            self.confirmed.remove(&symptom);
            self.maybe.remove(&symptom);
            self.denied.insert(symptom);
        }
    }

    /// Marks symptoms as uncertain, withdrawing confirmed/denied resolutions.
    pub fn mark_maybe_all(&mut self, symptoms: impl IntoIterator<Item = String>) {
        for symptom in symptoms {
            self.confirmed.remove(&symptom);
            self.denied.remove(&symptom);
            self.maybe.insert(symptom);
        }
    }

    /// Records symptoms as already posed, preventing re-asking.
    pub fn mark_asked_all(&mut self, symptoms: impl IntoIterator<Item = String>) {
        self.asked.extend(symptoms);
    }

    /// Excludes a condition from scoring.
    pub fn rule_out(&mut self, condition: impl Into<String>) {
        self.ruled_out.insert(condition.into());
    }

    /// Sets the outstanding question batch.
    pub fn set_pending_batch(&mut self, batch: Vec<String>) {
        self.pending_batch = batch;
    }

    /// Clears and returns the outstanding question batch.
    pub fn take_pending_batch(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_batch)
    }

    /// Marks the one-shot overview flag.
    pub fn mark_overview_shown(&mut self) {
        self.overview_shown = true;
    }
}
