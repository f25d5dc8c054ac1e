use std::any::Any;
use std::path::{Path, PathBuf};
use std::time::Instant;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use dupforge_core::{GenerationConfig, validate_config};

use crate::assemble::{
    PopulationRows, assemble_orders, assemble_population, assemble_returns, orders,
};
use crate::cluster::ClusterGenerator;
use crate::errors::GenerationError;
use crate::model::{DatasetKind, FileReport, GenerateOptions, GenerationIssue, GenerationReport};
use crate::noise::OperatorLibrary;
use crate::output::csv::{CsvRecord, write_csv};
use crate::providers::provider_for;
use crate::rng::run_rng;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
}

impl GenerationResult {
    /// Path of the primary dataset file.
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.report
            .files
            .last()
            .map(|file| self.run_dir.join(&file.name))
    }
}

/// Entry point for generating datasets from a configuration.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run_population(
        &self,
        config: &GenerationConfig,
    ) -> Result<GenerationResult, GenerationError> {
        self.run(DatasetKind::Population, config)
    }

    pub fn run_orders(&self, config: &GenerationConfig) -> Result<GenerationResult, GenerationError> {
        self.run(DatasetKind::Orders, config)
    }

    /// Orders plus the returns derived from them; both CSVs are written.
    pub fn run_returns(
        &self,
        config: &GenerationConfig,
    ) -> Result<GenerationResult, GenerationError> {
        self.run(DatasetKind::Returns, config)
    }

    pub fn run(
        &self,
        dataset: DatasetKind,
        config: &GenerationConfig,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let validation = validate_config(config);
        if !validation.is_ok() {
            for issue in &validation.errors {
                warn!(code = %issue.code, path = %issue.path, message = %issue.message, "invalid config");
            }
            return Err(GenerationError::InvalidConfig(validation));
        }

        let fingerprint = config_fingerprint(config)?;
        let run_id = run_id(dataset, config.seed, &fingerprint);
        let run_dir = self.options.out_dir.join(&run_id);
        std::fs::create_dir_all(&run_dir)?;
        std::fs::write(
            run_dir.join("resolved_config.json"),
            serde_json::to_vec_pretty(config)?,
        )?;

        let mut report = GenerationReport::new(run_id.clone(), dataset, config.seed, fingerprint);
        for issue in &validation.warnings {
            let mut warning = GenerationIssue::warning(issue.code.clone(), issue.message.clone());
            warning.path = Some(issue.path.clone());
            record_warning(&mut report, warning);
        }

        info!(
            run_id = %run_id,
            dataset = %dataset,
            seed = config.seed,
            population = config.population_size,
            locale = config.locale.as_str(),
            dup_rate = config.dup_rate,
            "generation started"
        );

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
            || -> Result<(), GenerationError> {
                let mut rng = run_rng(config.seed);
                let library = OperatorLibrary::from_config(config);
                let generator = ClusterGenerator::new(config, &library);
                let provider = provider_for(config.locale);

                match dataset {
                    DatasetKind::Population => {
                        let rows = assemble_population(
                            config,
                            &generator,
                            provider.as_ref(),
                            &mut rng,
                            &mut report,
                        );
                        info!(rows = rows.len(), "population assembled");
                        let file = match rows {
                            PopulationRows::Accounts(rows) => {
                                write_dataset(&run_dir, "population.csv", &rows, &[])?
                            }
                            PopulationRows::Transactions(rows) => {
                                write_dataset(&run_dir, "transactions.csv", &rows, &[])?
                            }
                        };
                        report.record_file(file);
                    }
                    DatasetKind::Orders | DatasetKind::Returns => {
                        let rows = assemble_orders(
                            config,
                            &generator,
                            provider.as_ref(),
                            &mut rng,
                            &mut report,
                        );
                        info!(rows = rows.len(), "orders assembled");
                        let hidden = orders::hidden_columns(config);
                        let file = write_dataset(&run_dir, "orders.csv", &rows, &hidden)?;
                        report.record_file(file);

                        if dataset == DatasetKind::Returns {
                            let returns = assemble_returns(config, &rows, &mut rng, &mut report);
                            info!(rows = returns.len(), "returns assembled");
                            let file = write_dataset(&run_dir, "returns.csv", &returns, &[])?;
                            report.record_file(file);
                        }
                    }
                }
                Ok(())
            },
        ));

        report.duration_ms = start.elapsed().as_millis() as u64;
        summarize(&mut report);

        let report_path = run_dir.join("generation_report.json");
        let write_report = |report: &GenerationReport| -> Result<(), GenerationError> {
            std::fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
            Ok(())
        };

        match outcome {
            Ok(Ok(())) => {
                write_report(&report)?;
                info!(
                    run_id = %run_id,
                    records = report.records_written,
                    clusters = report.clusters,
                    duplicates = report.duplicate_records,
                    duration_ms = report.duration_ms,
                    bytes_written = report.bytes_written,
                    "generation completed"
                );
                Ok(GenerationResult { run_dir, report })
            }
            Ok(Err(err)) => {
                record_generation_failure(&mut report, err.to_string());
                write_report(&report)?;
                warn!(run_id = %run_id, error = %err, "generation failed");
                Err(err)
            }
            Err(panic) => {
                record_generation_failure(&mut report, panic_message(panic));
                write_report(&report)?;
                warn!(run_id = %run_id, "generation panicked");
                Err(GenerationError::Failed(report))
            }
        }
    }
}

/// First 12 hex chars of the SHA-256 of the serialized configuration.
pub fn config_fingerprint(config: &GenerationConfig) -> Result<String, GenerationError> {
    let bytes = serde_json::to_vec(config)?;
    let digest = hex::encode(Sha256::digest(&bytes));
    Ok(digest[..12].to_string())
}

/// Run directory name: `<dataset>__seed_<seed>__<fingerprint>`.
pub fn run_id(dataset: DatasetKind, seed: u64, fingerprint: &str) -> String {
    format!("{dataset}__seed_{seed}__{fingerprint}")
}

fn write_dataset<R: CsvRecord>(
    run_dir: &Path,
    name: &str,
    rows: &[R],
    hidden: &[&str],
) -> Result<FileReport, GenerationError> {
    let path = run_dir.join(name);
    let summary = write_csv(&path, rows, hidden)?;
    info!(
        file = name,
        rows = summary.rows,
        bytes = summary.bytes,
        sha256 = %summary.sha256,
        "csv written"
    );
    Ok(FileReport {
        name: name.to_string(),
        rows: summary.rows,
        bytes: summary.bytes,
        sha256: summary.sha256,
    })
}

fn summarize(report: &mut GenerationReport) {
    if report.unchanged_duplicates > 0 {
        let issue = GenerationIssue::warning(
            "unchanged_duplicates",
            format!(
                "{} of {} duplicates are identical to their baseline",
                report.unchanged_duplicates, report.duplicate_records
            ),
        );
        record_warning(report, issue);
    }
    if report.skipped_units > 0 {
        let issue = GenerationIssue::warning(
            "skipped_units",
            format!("{} units skipped on missing lookups", report.skipped_units),
        );
        record_warning(report, issue);
    }
}

fn record_warning(report: &mut GenerationReport, issue: GenerationIssue) {
    log_issue(&issue);
    report.record_warning(issue);
}

fn record_generation_failure(report: &mut GenerationReport, message: String) {
    let issue = GenerationIssue::error("generation_failed", message);
    log_issue(&issue);
    report.record_error(issue);
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}

fn log_issue(issue: &GenerationIssue) {
    warn!(
        level = %issue.level,
        code = %issue.code,
        path = issue.path.as_deref().unwrap_or(""),
        message = %issue.message
    );
}
