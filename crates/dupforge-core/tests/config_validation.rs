use std::path::Path;

use dupforge_core::{
    ConfigError, ErrorKind, GenerationConfig, ProviderLocale, WeightedKind, ensure_valid,
    validate_config,
};

fn config_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs").join(name)
}

#[test]
fn shipped_configs_load_and_validate() {
    for name in ["population.toml", "swiss.toml", "orders.toml"] {
        let config = GenerationConfig::from_path(&config_path(name))
            .unwrap_or_else(|err| panic!("load {name}: {err}"));
        let report = validate_config(&config);
        assert!(report.is_ok(), "{name}: {report}");
    }
}

#[test]
fn swiss_config_overrides_locality_table_only() {
    let config = GenerationConfig::from_path(&config_path("swiss.toml")).expect("load swiss");
    assert_eq!(config.locale, ProviderLocale::DeCh);
    assert_eq!(config.noise.locality.len(), 4);
    assert_eq!(config.noise.locality[0].weight, 0.4);
    assert_eq!(
        config.noise.phone,
        GenerationConfig::default().noise.phone,
        "untouched tables keep their defaults"
    );
}

#[test]
fn default_config_is_valid() {
    let report = validate_config(&GenerationConfig::default());
    assert!(report.errors.is_empty(), "{report}");
    assert!(report.warnings.is_empty());
}

#[test]
fn out_of_range_probabilities_are_rejected_not_clamped() {
    let mut config = GenerationConfig::default();
    config.dup_rate = 1.5;
    config.triggers.email = -0.1;

    let err = ensure_valid(&config).expect_err("config must be rejected");
    let ConfigError::Invalid(report) = err else {
        panic!("expected invalid config error");
    };
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().any(|issue| issue.path == "/dup_rate"));
    assert!(report.errors.iter().any(|issue| issue.path == "/triggers/email"));
    assert_eq!(config.dup_rate, 1.5);
}

#[test]
fn zero_sized_population_and_duplicate_bounds_are_errors() {
    let mut config = GenerationConfig::default();
    config.population_size = 0;
    config.max_dup_accounts = 0;
    config.orders.min_duplicates = 7;

    let report = validate_config(&config);
    assert!(report.has_code("population_empty"));
    assert!(report.has_code("max_dup_accounts_zero"));
    assert!(report.has_code("duplicate_bounds_inverted"));
}

#[test]
fn modification_caps_must_allow_an_edit() {
    let mut config = GenerationConfig::default();
    config.max_field_modifications = 0;
    config.max_record_modifications = Some(0);

    let report = validate_config(&config);
    assert!(report.has_code("max_field_modifications_zero"));
    assert!(report.has_code("max_record_modifications_zero"));

    config.max_field_modifications = 2;
    config.max_record_modifications = Some(1);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn generic_kinds_fit_every_table_they_apply_to() {
    let mut config = GenerationConfig::default();
    config.noise.phone.push(WeightedKind::new(ErrorKind::MissingValue, 0.05));
    config.noise.address.push(WeightedKind::new(ErrorKind::WordSwap, 0.05));
    assert!(validate_config(&config).is_ok());

    config.noise.email_standard.push(WeightedKind::new(ErrorKind::WordSwap, 0.05));
    let report = validate_config(&config);
    assert!(report.has_code("kind_not_applicable"));
}

#[test]
fn noise_table_rejects_foreign_kinds_and_zero_totals() {
    let mut config = GenerationConfig::default();
    config.noise.phone = vec![WeightedKind::new(ErrorKind::NicknameSubstitution, 1.0)];
    config.noise.name = vec![
        WeightedKind::new(ErrorKind::Typo, 0.0),
        WeightedKind::new(ErrorKind::CaseVariation, 0.0),
    ];

    let report = validate_config(&config);
    let kind_issue = report
        .errors
        .iter()
        .find(|issue| issue.code == "kind_not_applicable")
        .expect("kind issue");
    assert_eq!(kind_issue.path, "/noise/phone/0/kind");
    assert!(report.has_code("noise_table_zero_total"));
}

#[test]
fn gmail_kinds_on_standard_domains_warn() {
    let mut config = GenerationConfig::default();
    config
        .noise
        .email_standard
        .push(WeightedKind::new(ErrorKind::GmailPlusAlias, 0.1));

    let report = validate_config(&config);
    assert!(report.is_ok());
    assert!(report.has_code("tag_semantics_on_standard_domain"));
}

#[test]
fn unknown_extension_is_unsupported() {
    let path = std::env::temp_dir().join(format!("dupforge_{}.yaml", uuid::Uuid::new_v4()));
    std::fs::write(&path, "seed: 1").expect("write temp config");
    let err = GenerationConfig::from_path(&path).expect_err("yaml is not supported");
    assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "yaml"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn inverted_date_range_is_rejected() {
    let config = GenerationConfig::from_toml_str(
        r#"
[date_range]
start = "2025-01-01"
end = "2024-01-01"
"#,
    )
    .expect("parse");
    let report = validate_config(&config);
    assert!(report.has_code("date_range_inverted"));
}
