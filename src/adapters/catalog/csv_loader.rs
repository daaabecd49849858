//! CSV-backed catalog source.
//!
//! Loads condition records from a CSV file with tolerant, alias-based header
//! resolution: real-world symptom sheets name their columns inconsistently
//! ("Disease" vs "condition", "Key_Symptoms" vs "symptoms"), so each logical
//! field accepts several header spellings. Cell conventions follow the
//! source sheets: list cells split on `,`/`|`/`;`, `only <symptom>` entries
//! restrict a condition to exclusive presentations, and synonym cells hold
//! `variant=canonical` pairs.

use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::triage::{CatalogError, ConditionCatalog, ConditionRecord};
use crate::ports::CatalogSource;

const CONDITION_ALIASES: &[&str] = &["disease", "condition", "diagnosis", "name"];
const SYMPTOMS_ALIASES: &[&str] = &["core_symptoms", "symptoms", "key_symptoms", "must_have"];
const SINGLE_ALIASES: &[&str] = &["single", "single_symptom", "is_single"];
const SYNONYMS_ALIASES: &[&str] = &["synonyms"];
const DESCRIPTION_ALIASES: &[&str] = &["description"];
const FIRST_AID_ALIASES: &[&str] = &["first_aid", "first aid"];
const WHEN_TO_SEE_ALIASES: &[&str] = &["when_to_see_doctor", "when to see doctor"];
const DOCTOR_TYPE_ALIASES: &[&str] = &["doctor_type", "doctor type"];
const CRITICAL_ALIASES: &[&str] = &["critical_symptoms", "critical symptoms"];

const ONLY_PREFIX: &str = "only ";

/// Loads a `ConditionCatalog` from a CSV file, preserving row order.
#[derive(Debug, Clone)]
pub struct CsvCatalogLoader {
    path: PathBuf,
}

impl CsvCatalogLoader {
    /// Creates a loader for the given CSV path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured source path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for CsvCatalogLoader {
    fn load(&self) -> Result<ConditionCatalog, CatalogError> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| CatalogError::Source(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| CatalogError::Source(e.to_string()))?
            .clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| CatalogError::Source(e.to_string()))?;
            if let Some(record) = columns.parse_row(&row) {
                records.push(record);
            }
        }
        Ok(ConditionCatalog::new(records))
    }
}

/// Resolved column indices for one source file.
#[derive(Debug)]
struct ColumnMap {
    condition: usize,
    symptoms: usize,
    single: Option<usize>,
    synonyms: Option<usize>,
    description: Option<usize>,
    first_aid: Option<usize>,
    when_to_see: Option<usize>,
    doctor_type: Option<usize>,
    critical: Option<usize>,
}

impl ColumnMap {
    /// Resolves headers against the alias tables. The condition identifier
    /// and core-symptoms columns are required; everything else is optional.
    fn resolve(headers: &StringRecord) -> Result<Self, CatalogError> {
        let condition =
            pick(headers, CONDITION_ALIASES).ok_or(CatalogError::MissingColumn("condition"))?;
        let symptoms =
            pick(headers, SYMPTOMS_ALIASES).ok_or(CatalogError::MissingColumn("symptoms"))?;

        Ok(Self {
            condition,
            symptoms,
            single: pick(headers, SINGLE_ALIASES),
            synonyms: pick(headers, SYNONYMS_ALIASES),
            description: pick(headers, DESCRIPTION_ALIASES),
            first_aid: pick(headers, FIRST_AID_ALIASES),
            when_to_see: pick(headers, WHEN_TO_SEE_ALIASES),
            doctor_type: pick(headers, DOCTOR_TYPE_ALIASES),
            critical: pick(headers, CRITICAL_ALIASES),
        })
    }

    /// Parses one data row; rows without a condition name are skipped.
    fn parse_row(&self, row: &StringRecord) -> Option<ConditionRecord> {
        let name = cell(row, Some(self.condition))?.trim().to_string();
        if name.is_empty() {
            return None;
        }

        let raw_core = split_list(cell(row, Some(self.symptoms)).unwrap_or(""));
        let (core, only_set) = strip_only_markers(raw_core);

        let mut record = ConditionRecord::new(name, core);
        if !only_set.is_empty() {
            record = record.with_only_set(only_set);
        }
        if let Some(cell_text) = cell(row, self.single) {
            record = record.with_single(truthy(cell_text));
        }
        if let Some(cell_text) = cell(row, self.synonyms) {
            let pairs = parse_synonyms(cell_text);
            if !pairs.is_empty() {
                record = record.with_synonyms(pairs);
            }
        }
        if let Some(cell_text) = cell(row, self.critical) {
            let tokens = split_list(cell_text);
            if !tokens.is_empty() {
                record = record.with_critical_symptoms(tokens);
            }
        }
        if let Some(text) = text_cell(row, self.description) {
            record = record.with_description(text);
        }
        if let Some(text) = text_cell(row, self.first_aid) {
            record = record.with_first_aid(text);
        }
        if let Some(text) = text_cell(row, self.when_to_see) {
            record = record.with_when_to_see_doctor(text);
        }
        if let Some(text) = text_cell(row, self.doctor_type) {
            record = record.with_doctor_type(text);
        }
        Some(record)
    }
}

/// Finds the first column whose normalized header matches any alias,
/// honoring alias priority order.
fn pick(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        for (idx, header) in headers.iter().enumerate() {
            if normalize(header) == *alias {
                return Some(idx);
            }
        }
    }
    None
}

fn cell<'r>(row: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| row.get(i))
}

/// Trimmed, non-empty free-text cell.
fn text_cell(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    let text = cell(row, idx)?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a list cell on `,`, `|`, or `;`, normalizing each entry.
fn split_list(cell: &str) -> Vec<String> {
    cell.split(|c: char| c == ',' || c == '|' || c == ';')
        .map(normalize)
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn truthy(cell: &str) -> bool {
    matches!(normalize(cell).as_str(), "1" | "true" | "yes" | "y" | "t")
}

/// Separates `only <symptom>` markers from a core-symptom list: the marked
/// symptom joins both the cleaned core list and the exclusivity set.
fn strip_only_markers(raw: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut core = Vec::with_capacity(raw.len());
    let mut only_set = Vec::new();
    for entry in raw {
        match entry.strip_prefix(ONLY_PREFIX) {
            Some(base) => {
                core.push(base.to_string());
                only_set.push(base.to_string());
            }
            None => core.push(entry),
        }
    }
    (core, only_set)
}

/// Parses `variant=canonical` pairs separated by `|` or `;`.
fn parse_synonyms(cell: &str) -> Vec<(String, String)> {
    cell.split(|c: char| c == '|' || c == ';')
        .filter_map(|pair| {
            let (variant, canonical) = pair.split_once('=')?;
            let variant = normalize(variant);
            let canonical = normalize(canonical);
            if variant.is_empty() || canonical.is_empty() {
                None
            } else {
                Some((variant, canonical))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(csv_text: &str) -> Result<ConditionCatalog, CatalogError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv_text.as_bytes()).unwrap();
        CsvCatalogLoader::new(file.path()).load()
    }

    #[test]
    fn loads_records_preserving_source_order() {
        let catalog = load(
            "disease,symptoms\n\
             Flu,\"fever, cough\"\n\
             Common Cold,\"cough, runny nose\"\n",
        )
        .unwrap();

        let names: Vec<&str> = catalog.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Flu", "Common Cold"]);
        assert_eq!(
            catalog.get("Flu").unwrap().core_symptoms(),
            &["fever", "cough"]
        );
    }

    #[test]
    fn resolves_header_aliases_case_insensitively() {
        let catalog = load("Condition,Key_Symptoms\nFlu,fever\n").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Flu").unwrap().core_symptoms(), &["fever"]);
    }

    #[test]
    fn missing_condition_column_fails() {
        let err = load("symptoms\nfever\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn("condition")));
    }

    #[test]
    fn missing_symptoms_column_fails() {
        let err = load("disease\nFlu\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn("symptoms")));
    }

    #[test]
    fn list_cells_split_on_any_separator() {
        let catalog = load("disease,symptoms\nFlu,fever|cough; body ache\n").unwrap();
        assert_eq!(
            catalog.get("Flu").unwrap().core_symptoms(),
            &["fever", "cough", "body ache"]
        );
    }

    #[test]
    fn only_markers_populate_exclusivity_set_and_clean_core() {
        let catalog =
            load("disease,symptoms\nHeat Rash,\"only high temperature, rash\"\n").unwrap();
        let record = catalog.get("Heat Rash").unwrap();

        assert_eq!(record.core_symptoms(), &["high temperature", "rash"]);
        assert!(record.only_set().contains("high temperature"));
        assert_eq!(record.only_set().len(), 1);
    }

    #[test]
    fn single_column_overrides_derived_flag() {
        let catalog = load(
            "disease,symptoms,single\n\
             A,\"fever, cough\",yes\n\
             B,\"fever, cough\",0\n",
        )
        .unwrap();
        assert!(catalog.get("A").unwrap().is_single());
        assert!(!catalog.get("B").unwrap().is_single());
    }

    #[test]
    fn synonyms_parse_variant_canonical_pairs() {
        let catalog =
            load("disease,symptoms,synonyms\nMigraine,headache,head pain=headache|hurting head=headache\n")
                .unwrap();
        assert_eq!(
            catalog.get("Migraine").unwrap().synonyms(),
            &[
                ("head pain".to_string(), "headache".to_string()),
                ("hurting head".to_string(), "headache".to_string())
            ]
        );
    }

    #[test]
    fn malformed_synonym_entries_are_dropped() {
        let catalog =
            load("disease,symptoms,synonyms\nFlu,fever,no-equals-sign|=headache|ok=fever\n")
                .unwrap();
        assert_eq!(
            catalog.get("Flu").unwrap().synonyms(),
            &[("ok".to_string(), "fever".to_string())]
        );
    }

    #[test]
    fn critical_symptoms_column_parses_to_typed_list() {
        let catalog = load(
            "disease,symptoms,critical_symptoms\n\
             Dengue,\"fever, rash, mosquito\",\"fever, rash\"\n\
             Flu,\"fever, cough\",\n",
        )
        .unwrap();

        let dengue = catalog.get("Dengue").unwrap();
        assert_eq!(dengue.critical_symptoms().unwrap(), &["fever", "rash"]);
        assert_eq!(dengue.critical_symptom_count(), 2);

        // Blank cell resolves to None, falling back to the core count.
        let flu = catalog.get("Flu").unwrap();
        assert!(flu.critical_symptoms().is_none());
        assert_eq!(flu.critical_symptom_count(), 2);
    }

    #[test]
    fn blank_optional_cells_resolve_to_none() {
        let catalog = load(
            "disease,symptoms,description,first aid,when to see doctor,doctor type\n\
             Flu,fever,Seasonal viral illness.,, ,General physician\n",
        )
        .unwrap();
        let record = catalog.get("Flu").unwrap();

        assert_eq!(record.description(), Some("Seasonal viral illness."));
        assert!(record.first_aid().is_none());
        assert!(record.when_to_see_doctor().is_none());
        assert_eq!(record.doctor_type(), Some("General physician"));
    }

    #[test]
    fn rows_without_a_name_are_skipped() {
        let catalog = load("disease,symptoms\n,fever\nFlu,fever\n").unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn unreadable_path_reports_source_error() {
        let err = CsvCatalogLoader::new("/nonexistent/conditions.csv")
            .load()
            .unwrap_err();
        assert!(matches!(err, CatalogError::Source(_)));
    }

    #[test]
    fn symptom_cells_are_normalized() {
        let catalog = load("disease,symptoms\nFlu,\"  FEVER ,  Body   Ache \"\n").unwrap();
        assert_eq!(
            catalog.get("Flu").unwrap().core_symptoms(),
            &["fever", "body ache"]
        );
    }
}
