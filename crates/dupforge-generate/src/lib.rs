//! Duplicate-cluster generation engine for dupforge.
//!
//! This crate turns a validated `GenerationConfig` into deterministic CSV
//! datasets: canonical entities from a locale provider, polluted duplicates
//! from the noise operator library, and population, order or return rows
//! assembled around them.

pub mod assemble;
pub mod cluster;
pub mod engine;
pub mod errors;
pub mod model;
pub mod noise;
pub mod output;
pub mod providers;
pub mod rng;

pub use cluster::ClusterGenerator;
pub use engine::{GenerationEngine, GenerationResult, config_fingerprint, run_id};
pub use errors::GenerationError;
pub use model::{DatasetKind, GenerateOptions, GenerationIssue, GenerationReport};
pub use noise::{NoiseOperator, OperatorLibrary, Polluted};
pub use providers::{BaseValueProvider, provider_for};
