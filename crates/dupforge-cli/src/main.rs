mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dupforge_core::{ConfigError, GenerationConfig, ProviderLocale, ensure_valid, validate_config};
use dupforge_generate::{
    DatasetKind, GenerateOptions, GenerationEngine, GenerationError, config_fingerprint, run_id,
};
use logging::{LogFormat, init_logging};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "dupforge", version, about = "Synthetic duplicate-record datasets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a population of accounts (or transactions) with duplicates.
    Population(GenerateArgs),
    /// Generate transactional orders with resubmitted duplicates.
    Orders(GenerateArgs),
    /// Generate orders and the returns raised against them.
    Returns(GenerateArgs),
    /// Check a configuration file and print its issues.
    Validate(ValidateArgs),
    /// Print the JSON Schema of the configuration.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Configuration file (.toml or .json); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the run seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the number of canonical entities.
    #[arg(long)]
    population: Option<u64>,
    /// Override the share of entities that receive duplicates.
    #[arg(long)]
    dup_rate: Option<f64>,
    /// Override the maximum duplicates per entity.
    #[arg(long)]
    max_dup: Option<u32>,
    /// Override the base-value provider.
    #[arg(long, value_enum)]
    locale: Option<LocaleArg>,
    /// Output directory for runs.
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Format of the stderr log stream.
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,
    /// Skip the JSON log file in the run directory.
    #[arg(long, default_value_t = false)]
    no_log_file: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LocaleArg {
    #[value(name = "en_us")]
    EnUs,
    #[value(name = "de_ch")]
    DeCh,
}

impl From<LocaleArg> for ProviderLocale {
    fn from(value: LocaleArg) -> Self {
        match value {
            LocaleArg::EnUs => ProviderLocale::EnUs,
            LocaleArg::DeCh => ProviderLocale::DeCh,
        }
    }
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Population(args) => run_generate(DatasetKind::Population, args),
        Command::Orders(args) => run_generate(DatasetKind::Orders, args),
        Command::Returns(args) => run_generate(DatasetKind::Returns, args),
        Command::Validate(args) => run_validate(args),
        Command::Schema(args) => run_schema(args),
    }
}

fn run_generate(dataset: DatasetKind, args: GenerateArgs) -> Result<(), CliError> {
    let config = resolve_config(&args)?;
    ensure_valid(&config)?;

    let log_path = if args.no_log_file {
        None
    } else {
        let run_dir = args
            .out
            .join(run_id(dataset, config.seed, &config_fingerprint(&config)?));
        std::fs::create_dir_all(&run_dir)?;
        Some(run_dir.join("generation.log.jsonl"))
    };
    init_logging(args.log_format, log_path.as_deref())?;

    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: args.out.clone(),
    });
    let result = engine.run(dataset, &config)?;

    info!(
        run_dir = %result.run_dir.display(),
        records = result.report.records_written,
        warnings = result.report.warnings.len(),
        "run finished"
    );
    println!("{}", result.run_dir.display());
    Ok(())
}

fn resolve_config(args: &GenerateArgs) -> Result<GenerationConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_path(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(population) = args.population {
        config.population_size = population;
    }
    if let Some(dup_rate) = args.dup_rate {
        config.dup_rate = dup_rate;
    }
    if let Some(max_dup) = args.max_dup {
        config.max_dup_accounts = max_dup;
    }
    if let Some(locale) = args.locale {
        config.locale = locale.into();
    }
    Ok(config)
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let config = GenerationConfig::from_path(&args.config)?;
    let report = validate_config(&config);
    for issue in report.errors.iter().chain(report.warnings.iter()) {
        println!("{issue}");
    }
    if !report.is_ok() {
        return Err(ConfigError::Invalid(report).into());
    }
    println!("{}: ok", args.config.display());
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = schemars::schema_for!(GenerationConfig);
    let json = serde_json::to_string_pretty(&schema)?;
    match args.out {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = Cli::parse_from([
            "dupforge",
            "population",
            "--seed",
            "9",
            "--population",
            "25",
            "--dup-rate",
            "0.2",
            "--locale",
            "de_ch",
        ]);
        let Command::Population(args) = cli.command else {
            panic!("expected population command");
        };
        let config = resolve_config(&args).expect("config");
        assert_eq!(config.seed, 9);
        assert_eq!(config.population_size, 25);
        assert_eq!(config.dup_rate, 0.2);
        assert_eq!(config.locale, ProviderLocale::DeCh);
        assert_eq!(config.max_dup_accounts, GenerationConfig::default().max_dup_accounts);
    }

    #[test]
    fn unknown_locale_is_rejected() {
        assert!(Cli::try_parse_from(["dupforge", "orders", "--locale", "fr_fr"]).is_err());
        assert!(Cli::try_parse_from(["dupforge", "orders", "--locale", "en_us"]).is_ok());
    }
}
