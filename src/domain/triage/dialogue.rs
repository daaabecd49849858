//! Dialogue state machine.
//!
//! `SymptomBot` owns one conversation's [`TriageState`] and implements the
//! turn-by-turn protocol: greeting and restart handling, batch-answer
//! ingestion, the one-shot candidate overview, follow-up batches, competitor
//! disambiguation, and the guarded finalize that ends the active triage
//! phase. Every turn resolves to a textual reply; no input can fail it.

use std::collections::HashSet;
use std::sync::Arc;

use super::catalog::ConditionRecord;
use super::engine::TriageEngine;
use super::lexicon;
use super::matcher::Intent;
use super::ranking::DEFAULT_BATCH_SIZE;
use super::state::TriageState;

/// Fixed introduction, also returned by `greet`.
pub const INTRO: &str = "Hi there! I'm your symptom guide. How are you feeling today?";

const CLARIFY: &str = "Could you tell me what's bothering you most, like fever, cough, \
                       stomach pain, or something else?";

const CLOSING: &str =
    "You're welcome! Take care, and feel free to tell me new symptoms anytime.";

const NOT_ENOUGH_INFO: &str = "I don't have enough to suggest a likely condition. If you can, \
                               list any symptoms in simple words, like 'fever, cough'.\n\
                               If you're unwell or worried, please seek professional medical advice.";

const DISCLAIMER: &str = "This is informational only. Please consult a clinician for \
                          diagnosis or concerns.";

/// Severe conditions summarized immediately once top-ranked; disambiguation
/// delay is undesirable for these.
const EMERGENCY_CONDITIONS: &[&str] = &["Snake Bite", "Burn"];

/// One conversation's dialogue state machine.
///
/// Owns its state exclusively; callers must not share one bot across
/// concurrent conversations.
#[derive(Debug, Clone)]
pub struct SymptomBot {
    engine: Arc<TriageEngine>,
    state: TriageState,
    started: bool,
    finished: bool,
}

impl SymptomBot {
    /// Creates a fresh conversation over the shared engine.
    pub fn new(engine: Arc<TriageEngine>) -> Self {
        Self {
            engine,
            state: TriageState::new(),
            started: false,
            finished: false,
        }
    }

    /// Discards all conversation state.
    pub fn reset(&mut self) {
        self.state = TriageState::new();
        self.started = false;
        self.finished = false;
    }

    /// Returns the fixed introduction text.
    pub fn greet(&self) -> String {
        INTRO.to_string()
    }

    /// True once any turn has been handled since the last reset.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True once a condition summary has been delivered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read access to the accumulated state.
    pub fn state(&self) -> &TriageState {
        &self.state
    }

    /// Handles one user utterance and returns the reply.
    pub fn handle(&mut self, user_text: &str) -> String {
        if !self.started {
            self.started = true;
        }
        let engine = Arc::clone(&self.engine);
        let matcher = engine.matcher();

        if self.finished {
            if matcher.is_thanks(user_text) || matcher.is_farewell(user_text) {
                return CLOSING.to_string();
            }
            if matcher.is_greeting(user_text) {
                self.reset();
                self.started = true;
                return self.greet();
            }
            // New symptom mentions restart the conversation implicitly.
            let found = matcher.extract_symptoms(user_text);
            if !found.is_empty() {
                self.reset();
                self.started = true;
                self.state.confirm_all(found);
                return self.continue_turn();
            }
            return CLOSING.to_string();
        }

        // Greetings win over everything, including an outstanding batch.
        if matcher.is_greeting(user_text) {
            self.reset();
            self.started = true;
            return self.greet();
        }

        if !self.state.pending_batch().is_empty() {
            let batch = self.state.take_pending_batch();
            let resolved = self.ingest_answers(user_text, &batch);
            self.state.mark_asked_all(resolved);
            return self.continue_turn();
        }

        let found = matcher.extract_symptoms(user_text);
        if !found.is_empty() {
            self.state.confirm_all(found);
        } else if self.state.confirmed().is_empty() {
            if matcher.is_thanks(user_text) || matcher.is_farewell(user_text) {
                return CLOSING.to_string();
            }
            return CLARIFY.to_string();
        }

        self.continue_turn()
    }

    /// Resolves an outstanding batch against the user's answer.
    ///
    /// A global yes/no/maybe intent answers the whole batch at once;
    /// otherwise tokens explicitly mentioned in the utterance are confirmed
    /// individually and unmentioned tokens stay unresolved, eligible for a
    /// later batch. Returns the resolved tokens.
    fn ingest_answers(&mut self, text: &str, batch: &[String]) -> HashSet<String> {
        let engine = Arc::clone(&self.engine);
        match engine.matcher().classify_intent(text) {
            Some(Intent::Yes) => {
                self.state.confirm_all(batch.to_vec());
                batch.iter().cloned().collect()
            }
            Some(Intent::No) => {
                self.state.deny_all(batch.to_vec());
                batch.iter().cloned().collect()
            }
            Some(Intent::Maybe) => {
                self.state.mark_maybe_all(batch.to_vec());
                batch.iter().cloned().collect()
            }
            None => {
                let found = engine.matcher().extract_symptoms(text);
                let mentioned: Vec<String> = batch
                    .iter()
                    .filter(|token| found.contains(*token))
                    .cloned()
                    .collect();
                self.state.confirm_all(mentioned.clone());
                mentioned.into_iter().collect()
            }
        }
    }

    /// The decision step: produces exactly one reply for the turn.
    fn continue_turn(&mut self) -> String {
        if !self.state.overview_shown() && !self.state.confirmed().is_empty() {
            self.state.mark_overview_shown();
            if let Some(reply) = self.overview() {
                return reply;
            }
        }

        let engine = Arc::clone(&self.engine);
        let batch = engine.ranking().next_batch(&self.state, DEFAULT_BATCH_SIZE);
        if !batch.is_empty() {
            let lines = question_lines(&batch);
            self.state.set_pending_batch(batch);
            return format!("Could you also let me know if any of these apply:\n{lines}");
        }

        let ranked = engine.ranking().score(
            self.state.confirmed(),
            self.state.ruled_out(),
            self.state.maybe(),
        );
        let top = match ranked.first().and_then(|r| engine.catalog().get(&r.name)) {
            Some(record) => record,
            None => return NOT_ENOUGH_INFO.to_string(),
        };

        // Emergency override: no disambiguation detour for severe conditions.
        if EMERGENCY_CONDITIONS.contains(&top.name()) {
            return self.finalize(top);
        }

        // A competitor round already happened for this evidence state.
        if top
            .core_symptoms()
            .iter()
            .any(|s| self.state.asked().contains(s))
        {
            return self.finalize(top);
        }

        let candidates = self.competitor_candidates(top);
        if !candidates.is_empty() {
            let lines = question_lines(&candidates);
            // Marked asked on queueing, not on resolution: the override above
            // then guarantees at most one competitor round per evidence state.
            self.state.mark_asked_all(candidates.iter().cloned());
            self.state.set_pending_batch(candidates);
            return format!("One quick check before I summarize:\n{lines}");
        }

        self.finalize(top)
    }

    /// One-shot overview of the top-ranked candidates with their hallmark
    /// symptoms, plus the first follow-up batch when one exists.
    fn overview(&mut self) -> Option<String> {
        let engine = Arc::clone(&self.engine);
        let ranked = engine.ranking().score(
            self.state.confirmed(),
            self.state.ruled_out(),
            self.state.maybe(),
        );
        if ranked.is_empty() {
            return None;
        }

        let mut bullets = Vec::new();
        for candidate in ranked.iter().take(3) {
            let record = match engine.catalog().get(&candidate.name) {
                Some(record) => record,
                None => continue,
            };
            let hallmarks: Vec<&str> = record
                .core_symptoms()
                .iter()
                .filter(|s| !self.state.confirmed().contains(*s))
                .map(String::as_str)
                .take(2)
                .collect();
            if hallmarks.is_empty() {
                bullets.push(format!("- {}", record.name()));
            } else {
                bullets.push(format!("- {}: often with {}", record.name(), hallmarks.join(", ")));
            }
        }

        let header = "Thanks for sharing that. It can happen in many conditions. \
                      Some common ones are:";
        let batch = engine.ranking().next_batch(&self.state, DEFAULT_BATCH_SIZE);
        if batch.is_empty() {
            return Some(format!("{header}\n{}", bullets.join("\n")));
        }
        let lines = question_lines(&batch);
        self.state.set_pending_batch(batch);
        Some(format!(
            "{header}\n{}\n\nCould you tell me if you also have any of these:\n{lines}",
            bullets.join("\n")
        ))
    }

    /// Collects up to one batch of symptoms distinguishing the top candidate
    /// from conditions sharing core evidence with it.
    ///
    /// Competitors are visited in catalog order and queued tokens are
    /// de-duplicated, keeping replies deterministic.
    fn competitor_candidates(&self, top: &ConditionRecord) -> Vec<String> {
        let mut competitor_names: HashSet<&str> = HashSet::new();
        for symptom in top.core_set() {
            for name in self.engine.catalog().conditions_with_symptom(symptom) {
                if name != top.name() {
                    competitor_names.insert(name.as_str());
                }
            }
        }

        let mut candidates: Vec<String> = Vec::new();
        'records: for record in self.engine.catalog().records() {
            if !competitor_names.contains(record.name()) {
                continue;
            }
            for symptom in record.core_symptoms() {
                if top.core_set().contains(symptom)
                    || self.state.confirmed().contains(symptom)
                    || self.state.denied().contains(symptom)
                    || self.state.asked().contains(symptom)
                    || self.state.maybe().contains(symptom)
                    || candidates.contains(symptom)
                {
                    continue;
                }
                candidates.push(symptom.clone());
                if candidates.len() >= DEFAULT_BATCH_SIZE {
                    break 'records;
                }
            }
        }
        candidates
    }

    /// Commits to a condition summary once confirmed evidence meets the
    /// required threshold; otherwise asks for more.
    fn finalize(&mut self, condition: &ConditionRecord) -> String {
        let min_required = if condition.critical_symptom_count() >= 3 { 3 } else { 1 };
        let confirmed_overlap = condition
            .core_set()
            .intersection(self.state.confirmed())
            .count();

        if confirmed_overlap < min_required {
            let engine = Arc::clone(&self.engine);
            let extra = engine.ranking().next_batch(&self.state, DEFAULT_BATCH_SIZE);
            if !extra.is_empty() {
                let lines = question_lines(&extra);
                self.state.set_pending_batch(extra);
                return format!(
                    "I need a bit more info to be confident. Do you also have any of these?\n{lines}"
                );
            }
            // No further questions available: stay non-final rather than
            // committing to a weakly-evidenced summary.
            return NOT_ENOUGH_INFO.to_string();
        }

        self.finished = true;
        self.summary(condition)
    }

    /// Renders the final informational summary.
    fn summary(&self, condition: &ConditionRecord) -> String {
        let core = if condition.core_symptoms().is_empty() {
            "(n/a)".to_string()
        } else {
            condition.core_symptoms().join(", ")
        };

        let mut lines = vec![format!(
            "{} looks likely given what you've shared.",
            condition.name()
        )];
        if let Some(text) = condition.description() {
            lines.push(format!("About it: {text}"));
        }
        lines.push(format!("Core symptoms: {core}."));
        if let Some(text) = condition.first_aid() {
            lines.push(format!("First aid: {text}"));
        }
        if let Some(text) = condition.when_to_see_doctor() {
            lines.push(format!("When to see a doctor: {text}"));
        }
        if let Some(text) = condition.doctor_type() {
            lines.push(format!("Doctor to consult: {text}"));
        }
        lines.push(DISCLAIMER.to_string());
        lines.join("\n")
    }
}

fn question_lines(batch: &[String]) -> String {
    batch
        .iter()
        .map(|symptom| question_line(symptom))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Capitalized, question-marked prompt line for one symptom.
fn question_line(symptom: &str) -> String {
    let label = lexicon::friendly_label(symptom);
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => format!("{}{}?", first.to_uppercase(), chars.as_str()),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::catalog::ConditionCatalog;

    fn symptoms(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn bot(records: Vec<ConditionRecord>) -> SymptomBot {
        SymptomBot::new(Arc::new(TriageEngine::new(ConditionCatalog::new(records))))
    }

    fn respiratory_bot() -> SymptomBot {
        bot(vec![
            ConditionRecord::new("Flu", symptoms(&["fever", "cough"]))
                .with_description("A contagious respiratory illness.")
                .with_first_aid("Rest and fluids.")
                .with_when_to_see_doctor("If symptoms persist beyond a week.")
                .with_doctor_type("General physician"),
            ConditionRecord::new("Common Cold", symptoms(&["cough", "runny nose"])),
        ])
    }

    #[test]
    fn greet_returns_fixed_intro() {
        let bot = respiratory_bot();
        assert_eq!(bot.greet(), INTRO);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut bot = respiratory_bot();
        bot.handle("i have fever");

        bot.reset();
        let once = bot.state().clone();
        bot.reset();

        assert_eq!(bot.state(), &once);
        assert!(!bot.is_started());
        assert!(!bot.is_finished());
        assert_eq!(bot.greet(), INTRO);
    }

    #[test]
    fn gibberish_without_evidence_asks_for_clarification() {
        let mut bot = respiratory_bot();
        let reply = bot.handle("qwerty asdf");
        assert!(reply.contains("bothering you most"));
        assert!(bot.state().confirmed().is_empty());
    }

    #[test]
    fn thanks_without_evidence_gets_closing_remark() {
        let mut bot = respiratory_bot();
        let reply = bot.handle("thanks anyway");
        assert!(reply.contains("Take care"));
    }

    #[test]
    fn greeting_resets_and_greets() {
        let mut bot = respiratory_bot();
        bot.handle("i have fever");
        let reply = bot.handle("hello");
        assert_eq!(reply, INTRO);
        assert!(bot.state().confirmed().is_empty());
        assert!(bot.is_started());
    }

    #[test]
    fn free_text_symptoms_produce_overview_with_follow_up() {
        let mut bot = respiratory_bot();
        let reply = bot.handle("I have a cough");

        assert!(reply.contains("Some common ones are:"));
        assert!(reply.contains("Flu"));
        assert!(reply.contains("Common Cold"));
        assert!(bot.state().confirmed().contains("cough"));
        // The first follow-up batch is outstanding.
        assert!(!bot.state().pending_batch().is_empty());
        assert!(bot.state().overview_shown());
    }

    #[test]
    fn yes_confirms_whole_batch_and_prevents_reissue() {
        let mut bot = respiratory_bot();
        bot.handle("I have fever");
        let batch = bot.state().pending_batch().to_vec();
        assert!(!batch.is_empty());

        bot.handle("yes");

        for token in &batch {
            assert!(bot.state().confirmed().contains(token));
            assert!(bot.state().asked().contains(token));
        }
        assert!(bot.state().pending_batch().iter().all(|t| !batch.contains(t)));
    }

    #[test]
    fn no_denies_whole_batch() {
        let mut bot = respiratory_bot();
        bot.handle("I have fever");
        let batch = bot.state().pending_batch().to_vec();

        bot.handle("no");

        for token in &batch {
            assert!(bot.state().denied().contains(token));
            assert!(bot.state().asked().contains(token));
        }
    }

    #[test]
    fn maybe_marks_whole_batch_uncertain() {
        let mut bot = respiratory_bot();
        bot.handle("I have fever");
        let batch = bot.state().pending_batch().to_vec();

        bot.handle("not sure");

        for token in &batch {
            assert!(bot.state().maybe().contains(token));
        }
    }

    #[test]
    fn granular_answer_confirms_only_mentioned_tokens() {
        let mut bot = bot(vec![ConditionRecord::new(
            "Dengue",
            symptoms(&["fever", "rash", "mosquito"]),
        )]);
        bot.handle("I have fever");
        let batch = bot.state().pending_batch().to_vec();
        assert!(batch.contains(&"rash".to_string()));
        assert!(batch.contains(&"mosquito".to_string()));

        bot.handle("there is a rash");

        assert!(bot.state().confirmed().contains("rash"));
        assert!(bot.state().asked().contains("rash"));
        // Unmentioned tokens stay unresolved and may be re-asked later.
        assert!(!bot.state().asked().contains("mosquito"));
        assert!(!bot.state().confirmed().contains("mosquito"));
    }

    #[test]
    fn conversation_reaches_summary_after_probing() {
        let mut bot = respiratory_bot();
        bot.handle("I have fever");
        let reply = bot.handle("yes");

        // Flu's remaining symptom was asked and confirmed; its evidence is
        // complete and a prior round marked it probed, so it finalizes.
        assert!(bot.is_finished(), "unexpected reply: {reply}");
        assert!(reply.contains("Flu looks likely"));
        assert!(reply.contains("About it: A contagious respiratory illness."));
        assert!(reply.contains("Core symptoms: fever, cough."));
        assert!(reply.contains("First aid: Rest and fluids."));
        assert!(reply.contains("When to see a doctor:"));
        assert!(reply.contains("Doctor to consult: General physician"));
        assert!(reply.contains("informational only"));
    }

    #[test]
    fn finalize_guard_blocks_weakly_evidenced_summary() {
        let mut bot = bot(vec![ConditionRecord::new(
            "Dengue",
            symptoms(&["fever", "rash", "mosquito"]),
        )]);
        bot.handle("I have fever");
        let reply = bot.handle("no");

        // One of three critical symptoms confirmed: must not finalize, and
        // with no questions left the fallback is emitted instead.
        assert!(!bot.is_finished());
        assert!(reply.contains("I don't have enough"), "unexpected reply: {reply}");
    }

    #[test]
    fn emergency_condition_finalizes_without_competitor_check() {
        let mut bot = bot(vec![
            ConditionRecord::new("Burn", symptoms(&["burn"]))
                .with_first_aid("Cool the area under running water."),
            ConditionRecord::new("Flu", symptoms(&["fever", "cough"])),
            ConditionRecord::new("Fire Injury", symptoms(&["burn", "smoke inhalation"])),
        ]);
        // Two confirmed symptoms match no single record as a subset, so no
        // follow-up batch exists and ranking decides directly.
        bot.handle("i burned my hand and i have fever");
        let reply = bot.handle("so what is it");

        assert!(bot.is_finished(), "unexpected reply: {reply}");
        assert!(reply.contains("Burn looks likely"));
        assert!(!reply.contains("One quick check"));
    }

    #[test]
    fn competitor_check_runs_before_non_emergency_summary() {
        let mut bot = bot(vec![
            ConditionRecord::new("Skin Injury", symptoms(&["burn"])),
            ConditionRecord::new("Flu", symptoms(&["fever", "cough"])),
            ConditionRecord::new("Fire Injury", symptoms(&["burn", "smoke inhalation"])),
        ]);
        bot.handle("i burned my hand and i have fever");
        let reply = bot.handle("so what is it");

        assert!(!bot.is_finished());
        assert!(reply.contains("One quick check"), "unexpected reply: {reply}");
        assert!(reply.contains("Smoke inhalation?"));
        // Competitor tokens are marked asked when queued.
        assert!(bot.state().asked().contains("smoke inhalation"));

        // Denying the distinguishing symptom lets the top candidate finalize.
        let reply = bot.handle("no");
        assert!(bot.is_finished(), "unexpected reply: {reply}");
        assert!(reply.contains("Skin Injury looks likely"));
    }

    #[test]
    fn finished_conversation_repeats_closing_remark() {
        let mut bot = respiratory_bot();
        bot.handle("I have fever");
        bot.handle("yes");
        assert!(bot.is_finished());

        assert!(bot.handle("thanks").contains("Take care"));
        assert!(bot.handle("anything else").contains("Take care"));
        assert!(bot.is_finished());
    }

    #[test]
    fn greeting_after_finish_restarts() {
        let mut bot = respiratory_bot();
        bot.handle("I have fever");
        bot.handle("yes");
        assert!(bot.is_finished());

        let reply = bot.handle("hello");

        assert_eq!(reply, INTRO);
        assert!(!bot.is_finished());
        assert!(bot.state().confirmed().is_empty());
    }

    #[test]
    fn new_symptoms_after_finish_restart_implicitly() {
        let mut bot = respiratory_bot();
        bot.handle("I have fever");
        bot.handle("yes");
        assert!(bot.is_finished());

        let reply = bot.handle("now i have a runny nose");

        assert!(!bot.is_finished());
        assert!(bot.state().confirmed().contains("runny nose"));
        // Old evidence was discarded by the implicit restart.
        assert!(!bot.state().confirmed().contains("fever"));
        assert!(reply.contains("Some common ones are:"));
    }

    #[test]
    fn unknown_utterance_with_prior_evidence_continues_probing() {
        let mut bot = bot(vec![ConditionRecord::new(
            "Dengue",
            symptoms(&["fever", "rash", "mosquito"]),
        )]);
        bot.handle("I have fever");
        bot.handle("there is a rash");

        // mosquito was never resolved, so it is asked again.
        let pending = bot.state().pending_batch().to_vec();
        assert!(pending.contains(&"mosquito".to_string()), "pending: {pending:?}");
    }

    #[test]
    fn question_lines_use_friendly_labels() {
        let line = question_line("mosquito");
        assert_eq!(line, "Recent mosquito bites or exposure?");
        assert_eq!(question_line("fever"), "Fever?");
    }
}
