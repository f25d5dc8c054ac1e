use std::path::Path;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::kinds::{ErrorKind, FieldType};

/// Full configuration surface of a generation run.
///
/// Together with `seed` it defines the whole output deterministically. The
/// value is read-only for the duration of a run; load it with
/// [`GenerationConfig::from_path`] and check it with
/// [`crate::validation::ensure_valid`] before generating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed of the single run-wide random generator.
    pub seed: u64,
    /// Number of canonical entities (people, or orders for order datasets).
    pub population_size: u64,
    /// Share of canonical entities that receive duplicates.
    pub dup_rate: f64,
    /// Upper bound of duplicates per canonical entity.
    pub max_dup_accounts: u32,
    /// Shape of the duplicate count in `[1, max_dup_accounts]`.
    pub dup_distribution: DuplicateDistribution,
    /// Upper bound of edits chained on one triggered field.
    pub max_field_modifications: u32,
    /// Upper bound of fields changed in one duplicate; unbounded when unset.
    pub max_record_modifications: Option<u32>,
    /// Window for transaction and order timestamps.
    pub date_range: DateRange,
    /// Base-value provider used to synthesize canonical entities.
    pub locale: ProviderLocale,
    /// Per-field chance that a duplicate's field is polluted.
    pub triggers: TriggerProbabilities,
    /// Per-field chance that an optional field is populated at all.
    pub presence: PresenceProbabilities,
    /// Error-model weight tables.
    pub noise: NoiseWeights,
    /// Providers where dots and plus tags address the same mailbox.
    pub tag_tolerant_domains: Vec<String>,
    /// Re-draw duplicates whose pollution left every field unchanged.
    pub require_visible_change: bool,
    /// Re-draw budget when `require_visible_change` is set.
    pub max_attempts_variant: u32,
    pub population: PopulationOptions,
    pub orders: OrderOptions,
    pub returns: ReturnOptions,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            population_size: 100,
            dup_rate: 0.6,
            max_dup_accounts: 3,
            dup_distribution: DuplicateDistribution::Uniform,
            max_field_modifications: 1,
            max_record_modifications: None,
            date_range: DateRange::default(),
            locale: ProviderLocale::EnUs,
            triggers: TriggerProbabilities::default(),
            presence: PresenceProbabilities::default(),
            noise: NoiseWeights::default(),
            tag_tolerant_domains: vec!["gmail.com".to_string(), "googlemail.com".to_string()],
            require_visible_change: false,
            max_attempts_variant: 10,
            population: PopulationOptions::default(),
            orders: OrderOptions::default(),
            returns: ReturnOptions::default(),
        }
    }
}

impl GenerationConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a `.toml` or `.json` configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or_default(),
        }
    }
}

/// Distribution of the number of duplicates an entity receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateDistribution {
    /// Every count in `[1, max_dup_accounts]` equally likely.
    #[default]
    #[serde(alias = "uni")]
    Uniform,
    /// Poisson weights with mean `1 + dup_rate`.
    #[serde(alias = "poi")]
    Poisson,
    /// Zipf weights `1 / sqrt(k)`, favouring single duplicates.
    #[serde(alias = "zip")]
    Zipf,
}

/// Supported base-value providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProviderLocale {
    /// US names, addresses and phone numbers.
    EnUs,
    /// Swiss DE/FR/IT names, cities with canton codes.
    DeCh,
}

impl ProviderLocale {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderLocale::EnUs => "en_us",
            ProviderLocale::DeCh => "de_ch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TriggerProbabilities {
    pub first_name: f64,
    pub last_name: f64,
    pub email: f64,
    pub phone: f64,
    pub address_1: f64,
    pub address_2: f64,
    pub city: f64,
    pub state: f64,
}

impl Default for TriggerProbabilities {
    fn default() -> Self {
        Self {
            first_name: 0.7,
            last_name: 0.7,
            email: 0.8,
            phone: 0.6,
            address_1: 0.8,
            address_2: 0.5,
            city: 0.4,
            state: 0.12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PresenceProbabilities {
    pub email: f64,
    pub phone: f64,
    pub address_2: f64,
    pub postcode: f64,
}

impl Default for PresenceProbabilities {
    fn default() -> Self {
        Self {
            email: 0.9,
            phone: 0.7,
            address_2: 0.3,
            postcode: 1.0,
        }
    }
}

/// One entry of an error-model table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightedKind {
    pub kind: ErrorKind,
    pub weight: f64,
}

impl WeightedKind {
    pub const fn new(kind: ErrorKind, weight: f64) -> Self {
        Self { kind, weight }
    }
}

/// Weight tables for every field type.
///
/// Email has two tables: one for tag-tolerant providers, where the
/// semantically neutral kinds dominate, and one for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NoiseWeights {
    pub text: Vec<WeightedKind>,
    pub name: Vec<WeightedKind>,
    pub email_tag_tolerant: Vec<WeightedKind>,
    pub email_standard: Vec<WeightedKind>,
    pub phone: Vec<WeightedKind>,
    pub address: Vec<WeightedKind>,
    pub locality: Vec<WeightedKind>,
}

impl NoiseWeights {
    /// Every table with its config path and owning field type.
    pub fn tables(&self) -> [(&'static str, FieldType, &[WeightedKind]); 7] {
        [
            ("/noise/text", FieldType::Text, &self.text),
            ("/noise/name", FieldType::Name, &self.name),
            (
                "/noise/email_tag_tolerant",
                FieldType::Email,
                &self.email_tag_tolerant,
            ),
            ("/noise/email_standard", FieldType::Email, &self.email_standard),
            ("/noise/phone", FieldType::Phone, &self.phone),
            ("/noise/address", FieldType::Address, &self.address),
            ("/noise/locality", FieldType::Locality, &self.locality),
        ]
    }
}

impl Default for NoiseWeights {
    fn default() -> Self {
        use ErrorKind as K;
        Self {
            text: vec![
                WeightedKind::new(K::KeyboardAdjacent, 0.4),
                WeightedKind::new(K::Transposition, 0.2),
                WeightedKind::new(K::Omission, 0.15),
                WeightedKind::new(K::Insertion, 0.1),
                WeightedKind::new(K::OcrConfusion, 0.1),
                WeightedKind::new(K::Phonetic, 0.05),
            ],
            name: vec![
                WeightedKind::new(K::Typo, 0.25),
                WeightedKind::new(K::CaseVariation, 0.2),
                WeightedKind::new(K::NicknameSubstitution, 0.2),
                WeightedKind::new(K::Initialization, 0.15),
                WeightedKind::new(K::CulturalVariant, 0.1),
                WeightedKind::new(K::Hyphenation, 0.1),
            ],
            email_tag_tolerant: vec![
                WeightedKind::new(K::TypoLocal, 0.2),
                WeightedKind::new(K::TypoDomain, 0.1),
                WeightedKind::new(K::DomainMistake, 0.15),
                WeightedKind::new(K::GmailDotVariation, 0.3),
                WeightedKind::new(K::GmailPlusAlias, 0.2),
                WeightedKind::new(K::CaseVariation, 0.05),
            ],
            email_standard: vec![
                WeightedKind::new(K::TypoLocal, 0.4),
                WeightedKind::new(K::TypoDomain, 0.2),
                WeightedKind::new(K::DomainMistake, 0.25),
                WeightedKind::new(K::CaseVariation, 0.1),
                WeightedKind::new(K::NumberVariation, 0.05),
            ],
            phone: vec![
                WeightedKind::new(K::FormatVariation, 0.3),
                WeightedKind::new(K::DigitTransposition, 0.2),
                WeightedKind::new(K::DigitSubstitution, 0.2),
                WeightedKind::new(K::PartialNumber, 0.1),
                WeightedKind::new(K::ExtraDigits, 0.1),
                WeightedKind::new(K::SpacingErrors, 0.1),
            ],
            address: vec![
                WeightedKind::new(K::Typo, 0.25),
                WeightedKind::new(K::AbbreviationVariation, 0.3),
                WeightedKind::new(K::CaseVariation, 0.15),
                WeightedKind::new(K::WhitespaceCorruption, 0.15),
                WeightedKind::new(K::HouseNumber, 0.1),
                WeightedKind::new(K::DirectionFlip, 0.05),
            ],
            locality: vec![
                WeightedKind::new(K::AliasSubstitution, 0.35),
                WeightedKind::new(K::DiacriticFolding, 0.35),
                WeightedKind::new(K::Typo, 0.2),
                WeightedKind::new(K::CaseVariation, 0.1),
            ],
        }
    }
}

/// Population dataset options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PopulationOptions {
    /// When set, accounts are fanned out over transactions with this
    /// Poisson mean per canonical entity; otherwise one row per account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_transactions: Option<f64>,
}

/// Transactional order dataset options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OrderOptions {
    /// Every Nth order is duplicated; defaults to `max(1, orders / 10)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_frequency: Option<u64>,
    pub min_duplicates: u32,
    pub max_duplicates: u32,
    pub max_line_items: u32,
    pub max_quantity: u32,
    /// Chance that a duplicate order changes a line item's quantity.
    pub quantity_jitter_rate: f64,
    /// Write the `duplicate_group_id` ground-truth column.
    pub include_duplicate_group_id: bool,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            duplicate_frequency: None,
            min_duplicates: 2,
            max_duplicates: 6,
            max_line_items: 5,
            max_quantity: 20,
            quantity_jitter_rate: 0.3,
            include_duplicate_group_id: true,
        }
    }
}

impl OrderOptions {
    pub fn effective_frequency(&self, orders: u64) -> u64 {
        self.duplicate_frequency
            .unwrap_or_else(|| (orders / 10).max(1))
    }
}

/// Return dataset options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReturnOptions {
    pub return_rate: f64,
    pub partial_return_rate: f64,
    /// Chance to return only a subset of a multi-item order.
    pub subset_rate: f64,
    pub restocking_fee_rate: f64,
    pub min_days_after: u32,
    pub max_days_after: u32,
}

impl Default for ReturnOptions {
    fn default() -> Self {
        Self {
            return_rate: 0.15,
            partial_return_rate: 0.3,
            subset_rate: 0.4,
            restocking_fee_rate: 0.1,
            min_days_after: 3,
            max_days_after: 60,
        }
    }
}
