use std::collections::BTreeSet;

use crate::config::{GenerationConfig, WeightedKind};
use crate::error::{ConfigError, Result, ValidationIssue, ValidationReport};
use crate::kinds::{ErrorKind, FieldType};

/// Validate a configuration and collect every issue found.
///
/// Values are never clamped: any out-of-range value is reported as an error
/// and the run must not start.
pub fn validate_config(config: &GenerationConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_population(config, &mut report);
    validate_probabilities(config, &mut report);
    validate_noise_tables(config, &mut report);
    validate_orders(config, &mut report);
    validate_returns(config, &mut report);

    report
}

/// Validate and convert a failing report into [`ConfigError::Invalid`].
pub fn ensure_valid(config: &GenerationConfig) -> Result<ValidationReport> {
    let report = validate_config(config);
    if report.is_ok() {
        Ok(report)
    } else {
        Err(ConfigError::Invalid(report))
    }
}

fn validate_population(config: &GenerationConfig, report: &mut ValidationReport) {
    if config.population_size == 0 {
        report.push(
            ValidationIssue::error(
                "population_empty",
                "/population_size",
                "population_size must be greater than zero",
            )
            .with_hint("set population_size to at least 1"),
        );
    }

    if config.max_dup_accounts == 0 {
        report.push(
            ValidationIssue::error(
                "max_dup_accounts_zero",
                "/max_dup_accounts",
                "max_dup_accounts must be at least 1",
            )
            .with_hint("use dup_rate = 0 to disable duplicates instead"),
        );
    }

    if config.max_field_modifications == 0 {
        report.push(
            ValidationIssue::error(
                "max_field_modifications_zero",
                "/max_field_modifications",
                "max_field_modifications must be at least 1",
            )
            .with_hint("lower the field triggers to reduce pollution instead"),
        );
    }

    if config.max_record_modifications == Some(0) {
        report.push(
            ValidationIssue::error(
                "max_record_modifications_zero",
                "/max_record_modifications",
                "max_record_modifications must be at least 1 when set",
            )
            .with_hint("remove the key to leave duplicates unbounded"),
        );
    }

    if config.date_range.start > config.date_range.end {
        report.push(ValidationIssue::error(
            "date_range_inverted",
            "/date_range",
            format!(
                "date_range start {} is after end {}",
                config.date_range.start, config.date_range.end
            ),
        ));
    }

    if config.require_visible_change && config.max_attempts_variant == 0 {
        report.push(ValidationIssue::error(
            "max_attempts_variant_zero",
            "/max_attempts_variant",
            "max_attempts_variant must be at least 1 when require_visible_change is set",
        ));
    }

    if let Some(avg) = config.population.avg_transactions {
        if !avg.is_finite() || avg <= 0.0 {
            report.push(ValidationIssue::error(
                "avg_transactions_invalid",
                "/population/avg_transactions",
                format!("avg_transactions must be a positive number, got {avg}"),
            ));
        }
    }

    if config.tag_tolerant_domains.iter().any(|d| d.trim().is_empty()) {
        report.push(ValidationIssue::error(
            "tag_tolerant_domain_empty",
            "/tag_tolerant_domains",
            "tag_tolerant_domains must not contain empty entries",
        ));
    }
}

fn validate_probabilities(config: &GenerationConfig, report: &mut ValidationReport) {
    let triggers = &config.triggers;
    let presence = &config.presence;
    let checks = [
        ("/dup_rate", config.dup_rate),
        ("/triggers/first_name", triggers.first_name),
        ("/triggers/last_name", triggers.last_name),
        ("/triggers/email", triggers.email),
        ("/triggers/phone", triggers.phone),
        ("/triggers/address_1", triggers.address_1),
        ("/triggers/address_2", triggers.address_2),
        ("/triggers/city", triggers.city),
        ("/triggers/state", triggers.state),
        ("/presence/email", presence.email),
        ("/presence/phone", presence.phone),
        ("/presence/address_2", presence.address_2),
        ("/presence/postcode", presence.postcode),
        ("/orders/quantity_jitter_rate", config.orders.quantity_jitter_rate),
        ("/returns/return_rate", config.returns.return_rate),
        ("/returns/partial_return_rate", config.returns.partial_return_rate),
        ("/returns/subset_rate", config.returns.subset_rate),
        ("/returns/restocking_fee_rate", config.returns.restocking_fee_rate),
    ];

    for (path, value) in checks {
        check_probability(path, value, report);
    }
}

fn check_probability(path: &str, value: f64, report: &mut ValidationReport) {
    if !(0.0..=1.0).contains(&value) {
        report.push(
            ValidationIssue::error(
                "probability_out_of_range",
                path,
                format!("probability must be between 0 and 1, got {value}"),
            )
            .with_hint("probabilities are never clamped"),
        );
    }
}

fn validate_noise_tables(config: &GenerationConfig, report: &mut ValidationReport) {
    for (path, field, table) in config.noise.tables() {
        validate_table(path, field, table, report);
    }

    let gmail_only = config
        .noise
        .email_standard
        .iter()
        .filter(|entry| {
            matches!(
                entry.kind,
                ErrorKind::GmailDotVariation | ErrorKind::GmailPlusAlias
            )
        })
        .map(|entry| entry.kind.as_str())
        .collect::<BTreeSet<_>>();
    for kind in gmail_only {
        report.push(
            ValidationIssue::warning(
                "tag_semantics_on_standard_domain",
                "/noise/email_standard",
                format!("'{kind}' changes the mailbox on domains that are not tag tolerant"),
            )
            .with_hint("move the entry to noise.email_tag_tolerant"),
        );
    }
}

fn validate_table(
    path: &str,
    field: FieldType,
    table: &[WeightedKind],
    report: &mut ValidationReport,
) {
    if table.is_empty() {
        report.push(ValidationIssue::error(
            "noise_table_empty",
            path,
            format!("{field} noise table has no entries"),
        ));
        return;
    }

    let mut seen = BTreeSet::new();
    let mut total = 0.0;
    for (index, entry) in table.iter().enumerate() {
        let entry_path = format!("{path}/{index}");
        if !entry.kind.applies_to(field) {
            report.push(
                ValidationIssue::error(
                    "kind_not_applicable",
                    format!("{entry_path}/kind"),
                    format!("'{}' does not apply to {field} values", entry.kind),
                )
                .with_hint("remove the entry or move it to the matching table"),
            );
        }
        if !seen.insert(entry.kind) {
            report.push(ValidationIssue::warning(
                "kind_repeated",
                format!("{entry_path}/kind"),
                format!("'{}' appears more than once; weights add up", entry.kind),
            ));
        }
        if !entry.weight.is_finite() || entry.weight < 0.0 {
            report.push(ValidationIssue::error(
                "weight_invalid",
                format!("{entry_path}/weight"),
                format!("weight must be a non-negative number, got {}", entry.weight),
            ));
        } else {
            total += entry.weight;
        }
    }

    if total <= 0.0 {
        report.push(ValidationIssue::error(
            "noise_table_zero_total",
            path,
            format!("{field} noise table weights must sum to a positive value"),
        ));
    }
}

fn validate_orders(config: &GenerationConfig, report: &mut ValidationReport) {
    let orders = &config.orders;
    if orders.duplicate_frequency == Some(0) {
        report.push(ValidationIssue::error(
            "duplicate_frequency_zero",
            "/orders/duplicate_frequency",
            "duplicate_frequency must be at least 1",
        ));
    }
    if orders.min_duplicates == 0 {
        report.push(ValidationIssue::error(
            "min_duplicates_zero",
            "/orders/min_duplicates",
            "min_duplicates must be at least 1",
        ));
    }
    if orders.min_duplicates > orders.max_duplicates {
        report.push(ValidationIssue::error(
            "duplicate_bounds_inverted",
            "/orders",
            format!(
                "min_duplicates {} exceeds max_duplicates {}",
                orders.min_duplicates, orders.max_duplicates
            ),
        ));
    }
    if orders.max_line_items == 0 {
        report.push(ValidationIssue::error(
            "max_line_items_zero",
            "/orders/max_line_items",
            "max_line_items must be at least 1",
        ));
    }
    if orders.max_quantity == 0 {
        report.push(ValidationIssue::error(
            "max_quantity_zero",
            "/orders/max_quantity",
            "max_quantity must be at least 1",
        ));
    }
}

fn validate_returns(config: &GenerationConfig, report: &mut ValidationReport) {
    let returns = &config.returns;
    if returns.min_days_after > returns.max_days_after {
        report.push(ValidationIssue::error(
            "return_window_inverted",
            "/returns",
            format!(
                "min_days_after {} exceeds max_days_after {}",
                returns.min_days_after, returns.max_days_after
            ),
        ));
    }
}
