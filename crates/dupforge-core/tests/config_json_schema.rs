use dupforge_core::GenerationConfig;
use schemars::schema_for;

#[test]
fn json_schema_covers_every_section() {
    let schema = schema_for!(GenerationConfig);
    let json = serde_json::to_value(&schema).expect("serialize schema");
    let properties = json
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("schema properties");

    for key in [
        "seed",
        "population_size",
        "dup_rate",
        "max_dup_accounts",
        "dup_distribution",
        "max_field_modifications",
        "max_record_modifications",
        "triggers",
        "presence",
        "noise",
        "tag_tolerant_domains",
        "require_visible_change",
        "orders",
        "returns",
    ] {
        assert!(properties.contains_key(key), "missing property {key}");
    }
}

#[test]
fn default_config_round_trips_through_json() {
    let config = GenerationConfig::default();
    let json = serde_json::to_string(&config).expect("serialize config");
    let parsed = GenerationConfig::from_json_str(&json).expect("parse config");
    assert_eq!(parsed, config);
}
