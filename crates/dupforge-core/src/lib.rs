//! Core contracts for dupforge.
//!
//! This crate defines the run configuration, the canonical/variant record
//! model, the error-kind taxonomy and configuration validation shared by the
//! generator and the CLI.

pub mod config;
pub mod error;
pub mod kinds;
pub mod model;
pub mod validation;

pub use config::{
    DateRange, DuplicateDistribution, GenerationConfig, NoiseWeights, OrderOptions,
    PopulationOptions, PresenceProbabilities, ProviderLocale, ReturnOptions, TriggerProbabilities,
    WeightedKind,
};
pub use error::{ConfigError, IssueSeverity, Result, ValidationIssue, ValidationReport};
pub use kinds::{ErrorKind, FieldType};
pub use model::{CanonicalEntity, DuplicateCluster, PersonField, PersonFields, Variant};
pub use validation::{ensure_valid, validate_config};

/// Current contract version for configuration files and run reports.
pub const CONFIG_VERSION: &str = "0.1";
