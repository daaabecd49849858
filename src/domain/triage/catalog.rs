//! Condition catalog entities.
//!
//! A `ConditionCatalog` is an ordered, immutable collection of condition
//! records together with the lookup structure derived from them once at
//! construction: a name index, a symptom-to-conditions index, and the set of
//! all known symptom tokens. The catalog is shared read-only across every
//! conversation.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Errors raised while constructing a catalog from a source.
///
/// Catalog construction is the only checked failure in the triage core; it is
/// fatal at startup, never a per-turn error.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required column (condition identifier or core symptoms) is absent.
    #[error("catalog source is missing a required column: {0}")]
    MissingColumn(&'static str),

    /// The underlying source could not be read or parsed.
    #[error("failed to read catalog source: {0}")]
    Source(String),
}

/// One condition with its evidence tokens and informational text.
///
/// Immutable after load. Optional fields carry `None` when the source had no
/// value, never an empty-string sentinel.
#[derive(Debug, Clone)]
pub struct ConditionRecord {
    name: String,
    core_symptoms: Vec<String>,
    core_set: HashSet<String>,
    only_set: HashSet<String>,
    is_single: bool,
    synonyms: Vec<(String, String)>,
    critical_symptoms: Option<Vec<String>>,
    description: Option<String>,
    first_aid: Option<String>,
    when_to_see_doctor: Option<String>,
    doctor_type: Option<String>,
}

impl ConditionRecord {
    /// Creates a record with the given name and ordered core-symptom tokens.
    ///
    /// The single-symptom flag defaults to whether exactly one core symptom is
    /// listed; sources with an explicit column override it via
    /// [`with_single`](Self::with_single).
    pub fn new(name: impl Into<String>, core_symptoms: Vec<String>) -> Self {
        let core_set = core_symptoms.iter().cloned().collect::<HashSet<_>>();
        let is_single = core_symptoms.len() == 1;
        Self {
            name: name.into(),
            core_symptoms,
            core_set,
            only_set: HashSet::new(),
            is_single,
            synonyms: Vec::new(),
            critical_symptoms: None,
            description: None,
            first_aid: None,
            when_to_see_doctor: None,
            doctor_type: None,
        }
    }

    /// Restricts the record to confirmed-symptom subsets of `only`.
    pub fn with_only_set(mut self, only: impl IntoIterator<Item = String>) -> Self {
        self.only_set = only.into_iter().collect();
        self
    }

    /// Overrides the derived single-symptom flag.
    pub fn with_single(mut self, is_single: bool) -> Self {
        self.is_single = is_single;
        self
    }

    /// Attaches `variant -> canonical` synonym pairs.
    pub fn with_synonyms(mut self, pairs: Vec<(String, String)>) -> Self {
        self.synonyms = pairs;
        self
    }

    /// Attaches the ordered critical-symptom token list.
    pub fn with_critical_symptoms(mut self, tokens: Vec<String>) -> Self {
        self.critical_symptoms = Some(tokens);
        self
    }

    /// Attaches the free-text description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Attaches the first-aid guidance text.
    pub fn with_first_aid(mut self, text: impl Into<String>) -> Self {
        self.first_aid = Some(text.into());
        self
    }

    /// Attaches the when-to-see-a-doctor text.
    pub fn with_when_to_see_doctor(mut self, text: impl Into<String>) -> Self {
        self.when_to_see_doctor = Some(text.into());
        self
    }

    /// Attaches the specialist type.
    pub fn with_doctor_type(mut self, text: impl Into<String>) -> Self {
        self.doctor_type = Some(text.into());
        self
    }

    /// Returns the unique condition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered core-symptom tokens (duplicates preserved).
    pub fn core_symptoms(&self) -> &[String] {
        &self.core_symptoms
    }

    /// Returns the distinct core-symptom set.
    pub fn core_set(&self) -> &HashSet<String> {
        &self.core_set
    }

    /// Returns the exclusivity set; empty means unrestricted.
    pub fn only_set(&self) -> &HashSet<String> {
        &self.only_set
    }

    /// Returns the single-symptom flag.
    pub fn is_single(&self) -> bool {
        self.is_single
    }

    /// Returns the `variant -> canonical` synonym pairs.
    pub fn synonyms(&self) -> &[(String, String)] {
        &self.synonyms
    }

    /// Returns the critical-symptom tokens, if the source listed any.
    pub fn critical_symptoms(&self) -> Option<&[String]> {
        self.critical_symptoms.as_deref()
    }

    /// Returns the free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the first-aid guidance text.
    pub fn first_aid(&self) -> Option<&str> {
        self.first_aid.as_deref()
    }

    /// Returns the when-to-see-a-doctor text.
    pub fn when_to_see_doctor(&self) -> Option<&str> {
        self.when_to_see_doctor.as_deref()
    }

    /// Returns the specialist type.
    pub fn doctor_type(&self) -> Option<&str> {
        self.doctor_type.as_deref()
    }

    /// Number of critical symptoms, falling back to the core-symptom count
    /// when the source had no separate critical-symptom field.
    pub fn critical_symptom_count(&self) -> usize {
        self.critical_symptoms
            .as_ref()
            .map_or(self.core_symptoms.len(), Vec::len)
    }

    /// True when every confirmed symptom is permitted by the only-set.
    ///
    /// Records without an only-set accept any confirmed set.
    pub fn permits_confirmed(&self, confirmed: &HashSet<String>) -> bool {
        self.only_set.is_empty() || confirmed.iter().all(|s| self.only_set.contains(s))
    }
}

/// Ordered, immutable collection of condition records with derived indices.
#[derive(Debug, Clone)]
pub struct ConditionCatalog {
    records: Vec<ConditionRecord>,
    by_name: HashMap<String, usize>,
    symptom_index: HashMap<String, Vec<String>>,
    known_symptoms: HashSet<String>,
}

impl ConditionCatalog {
    /// Builds a catalog from records, preserving source ordering.
    pub fn new(records: Vec<ConditionRecord>) -> Self {
        let mut by_name = HashMap::new();
        let mut symptom_index: HashMap<String, Vec<String>> = HashMap::new();
        let mut known_symptoms = HashSet::new();

        for (idx, record) in records.iter().enumerate() {
            by_name.insert(record.name().to_string(), idx);
            for symptom in record.core_set() {
                known_symptoms.insert(symptom.clone());
                let entry = symptom_index.entry(symptom.clone()).or_default();
                if !entry.iter().any(|n| n == record.name()) {
                    entry.push(record.name().to_string());
                }
            }
        }

        Self {
            records,
            by_name,
            symptom_index,
            known_symptoms,
        }
    }

    /// Returns all records in source order.
    pub fn records(&self) -> &[ConditionRecord] {
        &self.records
    }

    /// Looks up a record by condition name.
    pub fn get(&self, name: &str) -> Option<&ConditionRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// Returns the names of conditions listing `symptom` as core evidence,
    /// in catalog order.
    pub fn conditions_with_symptom(&self, symptom: &str) -> &[String] {
        self.symptom_index
            .get(symptom)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the set of every symptom token any record knows about.
    pub fn known_symptoms(&self) -> &HashSet<String> {
        &self.known_symptoms
    }

    /// Returns every `variant -> canonical` synonym pair across all records.
    pub fn synonym_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records
            .iter()
            .flat_map(|r| r.synonyms().iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
