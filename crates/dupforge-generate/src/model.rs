use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dupforge_core::{ErrorKind, PersonField, Variant};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run directories are created.
    pub out_dir: PathBuf,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
        }
    }
}

/// Dataset family produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Population,
    Orders,
    Returns,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Population => "population",
            DatasetKind::Orders => "orders",
            DatasetKind::Returns => "returns",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One CSV written by a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub name: String,
    pub rows: u64,
    pub bytes: u64,
    pub sha256: String,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl GenerationIssue {
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: "error".to_string(),
            ..Self::warning(code, message)
        }
    }
}

/// Report for a generation run, written as `generation_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub dataset: DatasetKind,
    pub config_version: String,
    pub seed: u64,
    pub config_fingerprint: String,
    pub files: Vec<FileReport>,
    pub records_written: u64,
    pub canonical_entities: u64,
    /// Clusters with at least one duplicate.
    pub clusters: u64,
    pub duplicate_records: u64,
    /// Duplicates whose pollution draws left every field untouched.
    pub unchanged_duplicates: u64,
    pub error_kind_usage: BTreeMap<String, u64>,
    pub field_pollution: BTreeMap<String, u64>,
    pub skipped_units: u64,
    pub skipped_by_reason: BTreeMap<String, u64>,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub errors: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(run_id: String, dataset: DatasetKind, seed: u64, config_fingerprint: String) -> Self {
        Self {
            run_id,
            dataset,
            config_version: dupforge_core::CONFIG_VERSION.to_string(),
            seed,
            config_fingerprint,
            files: Vec::new(),
            records_written: 0,
            canonical_entities: 0,
            clusters: 0,
            duplicate_records: 0,
            unchanged_duplicates: 0,
            error_kind_usage: BTreeMap::new(),
            field_pollution: BTreeMap::new(),
            skipped_units: 0,
            skipped_by_reason: BTreeMap::new(),
            bytes_written: 0,
            duration_ms: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record_canonical(&mut self, duplicates: usize) {
        self.canonical_entities += 1;
        if duplicates > 0 {
            self.clusters += 1;
        }
    }

    pub fn record_variant(&mut self, variant: &Variant) {
        if !variant.is_duplicate {
            return;
        }
        self.duplicate_records += 1;
        if variant.is_unchanged() {
            self.unchanged_duplicates += 1;
        }
        for (field, kind) in &variant.changes {
            self.record_pollution(*field, *kind);
        }
    }

    pub fn record_pollution(&mut self, field: PersonField, kind: ErrorKind) {
        *self.error_kind_usage.entry(kind.to_string()).or_insert(0) += 1;
        *self.field_pollution.entry(field.to_string()).or_insert(0) += 1;
    }

    pub fn record_skipped(&mut self, reason: &str) {
        self.skipped_units += 1;
        *self.skipped_by_reason.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn record_file(&mut self, file: FileReport) {
        self.records_written += file.rows;
        self.bytes_written += file.bytes;
        self.files.push(file);
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    pub fn record_error(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.errors.push(issue);
    }

    /// Checksum of the primary dataset file.
    pub fn csv_sha256(&self) -> Option<&str> {
        self.files.last().map(|file| file.sha256.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dupforge_core::PersonFields;

    fn variant(is_duplicate: bool, changes: Vec<(PersonField, ErrorKind)>) -> Variant {
        Variant {
            canonical_id: "id_00001".to_string(),
            variant_id: "v".to_string(),
            is_duplicate,
            fields: PersonFields::default(),
            changes,
        }
    }

    #[test]
    fn variant_counters_track_kinds_and_fields() {
        let mut report = GenerationReport::new("run".into(), DatasetKind::Population, 1, "fp".into());
        report.record_variant(&variant(false, Vec::new()));
        report.record_variant(&variant(true, Vec::new()));
        report.record_variant(&variant(
            true,
            vec![
                (PersonField::Email, ErrorKind::GmailPlusAlias),
                (PersonField::City, ErrorKind::CaseVariation),
            ],
        ));

        assert_eq!(report.duplicate_records, 2);
        assert_eq!(report.unchanged_duplicates, 1);
        assert_eq!(report.error_kind_usage.get("gmail_plus_alias"), Some(&1));
        assert_eq!(report.field_pollution.get("city"), Some(&1));
    }

    #[test]
    fn skipped_units_are_grouped_by_reason() {
        let mut report = GenerationReport::new("run".into(), DatasetKind::Returns, 1, "fp".into());
        report.record_skipped("line_item_missing");
        report.record_skipped("line_item_missing");
        assert_eq!(report.skipped_units, 2);
        assert_eq!(report.skipped_by_reason.get("line_item_missing"), Some(&2));
    }
}
