use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use dupforge_core::GenerationConfig;
use dupforge_generate::output::csv::file_sha256;
use dupforge_generate::{DatasetKind, GenerateOptions, GenerationEngine, GenerationError};

fn temp_out_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dupforge_{label}_{}", uuid::Uuid::new_v4()))
}

fn engine(label: &str) -> GenerationEngine {
    let mut options = GenerateOptions::default();
    options.out_dir = temp_out_dir(label);
    GenerationEngine::new(options)
}

fn load_config(name: &str) -> GenerationConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs")
        .join(name);
    GenerationConfig::from_path(&path).expect("load config")
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<BTreeMap<String, String>>) {
    let mut reader = csv::Reader::from_path(path)
        .unwrap_or_else(|_| panic!("missing csv at {}", path.display()));
    let headers: Vec<String> = reader
        .headers()
        .expect("csv headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            let record = record.expect("csv record");
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect()
        })
        .collect();
    (headers, rows)
}

#[test]
fn single_entity_cluster_has_baseline_and_duplicate() {
    let config = GenerationConfig {
        seed: 42,
        population_size: 1,
        dup_rate: 1.0,
        max_dup_accounts: 1,
        ..GenerationConfig::default()
    };
    let result = engine("single")
        .run_population(&config)
        .expect("run population");

    let (_, rows) = read_rows(&result.run_dir.join("population.csv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["canonical_id"], rows[1]["canonical_id"]);
    let flags: BTreeSet<&str> = rows.iter().map(|row| row["is_duplicate"].as_str()).collect();
    assert_eq!(flags, BTreeSet::from(["false", "true"]));
    assert_ne!(rows[0]["variant_id"], rows[1]["variant_id"]);

    assert_eq!(result.report.dataset, DatasetKind::Population);
    assert_eq!(result.report.canonical_entities, 1);
    assert_eq!(result.report.duplicate_records, 1);
    assert_eq!(result.report.records_written, 2);
}

#[test]
fn generate_is_deterministic() {
    let config = load_config("population.toml");
    let result_a = engine("run_a").run_population(&config).expect("run A");
    let result_b = engine("run_b").run_population(&config).expect("run B");

    let name_a = result_a.run_dir.file_name().expect("run dir name");
    let name_b = result_b.run_dir.file_name().expect("run dir name");
    assert_eq!(name_a, name_b);

    let path_a = result_a.dataset_path().expect("dataset A");
    let path_b = result_b.dataset_path().expect("dataset B");
    assert_eq!(
        file_sha256(&path_a).expect("hash A"),
        file_sha256(&path_b).expect("hash B"),
        "population csv should be deterministic"
    );
    assert_eq!(result_a.report.csv_sha256(), result_b.report.csv_sha256());
    assert_eq!(
        result_a.report.error_kind_usage,
        result_b.report.error_kind_usage
    );
}

#[test]
fn seed_changes_output() {
    let config = GenerationConfig {
        population_size: 30,
        ..GenerationConfig::default()
    };
    let other = GenerationConfig {
        seed: 43,
        ..config.clone()
    };
    let result_a = engine("seed_a").run_population(&config).expect("run A");
    let result_b = engine("seed_b").run_population(&other).expect("run B");
    assert_ne!(result_a.report.csv_sha256(), result_b.report.csv_sha256());
    assert_ne!(result_a.run_dir.file_name(), result_b.run_dir.file_name());
}

#[test]
fn run_dir_and_report_are_written() {
    let config = GenerationConfig {
        population_size: 15,
        ..GenerationConfig::default()
    };
    let result = engine("report").run_population(&config).expect("run");
    let dir_name = result
        .run_dir
        .file_name()
        .and_then(|name| name.to_str())
        .expect("dir name");
    assert!(dir_name.starts_with("population__seed_42__"), "{dir_name}");
    assert_eq!(dir_name.len(), "population__seed_42__".len() + 12);

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(result.run_dir.join("generation_report.json"))
            .expect("read generation_report.json"),
    )
    .expect("parse report");
    assert_eq!(report["dataset"], "population");
    assert_eq!(report["seed"], 42);
    assert_eq!(report["records_written"], result.report.records_written);
    let files = report["files"].as_array().expect("files array");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "population.csv");
    assert!(result.run_dir.join("resolved_config.json").exists());
}

#[test]
fn accounts_keep_cluster_integrity() {
    let config = GenerationConfig {
        population_size: 200,
        max_dup_accounts: 4,
        ..GenerationConfig::default()
    };
    let result = engine("integrity").run_population(&config).expect("run");
    let (headers, rows) = read_rows(&result.run_dir.join("population.csv"));
    assert_eq!(headers[0], "record_id");

    let mut clusters: BTreeMap<&str, Vec<&BTreeMap<String, String>>> = BTreeMap::new();
    for row in &rows {
        clusters.entry(row["canonical_id"].as_str()).or_default().push(row);
    }
    assert_eq!(clusters.len(), 200);
    for members in clusters.values() {
        assert!((1..=5).contains(&members.len()));
        let baselines = members
            .iter()
            .filter(|row| row["is_duplicate"] == "false")
            .count();
        assert_eq!(baselines, 1);
        let country: BTreeSet<&str> = members.iter().map(|row| row["country_code"].as_str()).collect();
        assert_eq!(country.len(), 1);
    }
}

#[test]
fn transactions_mode_writes_transactions() {
    let config = load_config("population.toml");
    let result = engine("transactions").run_population(&config).expect("run");
    let (headers, rows) = read_rows(&result.run_dir.join("transactions.csv"));
    assert_eq!(
        headers,
        [
            "record_id",
            "date",
            "first_name",
            "last_name",
            "email",
            "phone",
            "address_1",
            "address_2",
            "city",
            "state",
            "canonical_id",
            "variant_id",
            "is_duplicate",
        ]
    );
    let entities: BTreeSet<&str> = rows.iter().map(|row| row["canonical_id"].as_str()).collect();
    assert_eq!(entities.len() as u64, config.population_size);
}

#[test]
fn swiss_population_uses_swiss_values() {
    let config = load_config("swiss.toml");
    let result = engine("swiss").run_population(&config).expect("run");
    let path = result.dataset_path().expect("dataset");
    let (_, rows) = read_rows(&path);
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| row["country_code"] == "CH"));
}

#[test]
fn one_duplicated_order_spawns_two_to_six_resubmissions() {
    let mut config = GenerationConfig {
        population_size: 10,
        ..GenerationConfig::default()
    };
    config.orders.duplicate_frequency = Some(10);
    let result = engine("orders").run_orders(&config).expect("run orders");
    let (headers, rows) = read_rows(&result.run_dir.join("orders.csv"));
    assert_eq!(headers.last().map(String::as_str), Some("duplicate_group_id"));

    let orders: BTreeSet<&str> = rows.iter().map(|row| row["group_order_id"].as_str()).collect();
    let duplicated: Vec<&BTreeMap<String, String>> = rows
        .iter()
        .filter(|row| !row["duplicate_group_id"].is_empty())
        .collect();
    let groups: BTreeSet<&str> = duplicated
        .iter()
        .map(|row| row["duplicate_group_id"].as_str())
        .collect();
    assert_eq!(groups.len(), 1);
    let group = groups.iter().next().expect("one group");
    assert!(group.starts_with("DUP_"));

    let group_orders: BTreeSet<&str> = duplicated
        .iter()
        .map(|row| row["group_order_id"].as_str())
        .collect();
    let resubmissions = group_orders.len() - 1;
    assert!((2..=6).contains(&resubmissions), "resubmissions {resubmissions}");
    assert_eq!(orders.len(), 10 + resubmissions);
    assert_eq!(result.report.duplicate_records as usize, resubmissions);
}

#[test]
fn duplicate_group_column_can_be_hidden() {
    let mut config = load_config("orders.toml");
    config.orders.include_duplicate_group_id = false;
    let result = engine("hidden").run_orders(&config).expect("run orders");
    let (headers, _) = read_rows(&result.run_dir.join("orders.csv"));
    assert!(!headers.iter().any(|header| header == "duplicate_group_id"));
    assert_eq!(headers[0], "id");
}

#[test]
fn returns_reference_ordered_rows() {
    let mut config = load_config("orders.toml");
    config.returns.return_rate = 0.5;
    let result = engine("returns").run_returns(&config).expect("run returns");
    let (_, orders) = read_rows(&result.run_dir.join("orders.csv"));
    let (_, returns) = read_rows(&result.run_dir.join("returns.csv"));
    assert!(!returns.is_empty());

    let order_ids: BTreeSet<&str> = orders.iter().map(|row| row["id"].as_str()).collect();
    for row in &returns {
        assert!(order_ids.contains(row["ordered_variant_id"].as_str()));
        assert!(row["returned_line_item_external_id"].starts_with("RETLINE_"));
    }
    assert_eq!(result.report.files.len(), 2);
    assert_eq!(result.report.skipped_units, 0);
}

#[test]
fn invalid_config_is_rejected_before_generation() {
    let config = GenerationConfig {
        dup_rate: 1.5,
        ..GenerationConfig::default()
    };
    let mut options = GenerateOptions::default();
    let out_dir = temp_out_dir("invalid");
    options.out_dir = out_dir.clone();
    let err = GenerationEngine::new(options)
        .run_population(&config)
        .expect_err("invalid config");
    match err {
        GenerationError::InvalidConfig(report) => {
            assert!(report.has_code("probability_out_of_range"));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(!out_dir.exists());
}
