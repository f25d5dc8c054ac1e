use chrono::NaiveDate;
use rand::RngCore;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::debug;

use dupforge_core::{CanonicalEntity, DuplicateCluster, GenerationConfig, PersonFields, Variant};

use crate::cluster::ClusterGenerator;
use crate::model::GenerationReport;
use crate::output::csv::{CsvRecord, optional};
use crate::providers::BaseValueProvider;
use crate::rng::{poisson, random_date};

/// One row per cluster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub record_id: String,
    pub canonical_id: String,
    pub variant_id: String,
    pub is_duplicate: bool,
    pub fields: PersonFields,
}

impl CsvRecord for AccountRow {
    const COLUMNS: &'static [&'static str] = &[
        "record_id",
        "canonical_id",
        "variant_id",
        "is_duplicate",
        "first_name",
        "last_name",
        "email",
        "phone",
        "address_1",
        "address_2",
        "city",
        "state",
        "postcode",
        "country_code",
    ];

    fn values(&self) -> Vec<String> {
        let fields = &self.fields;
        vec![
            self.record_id.clone(),
            self.canonical_id.clone(),
            self.variant_id.clone(),
            self.is_duplicate.to_string(),
            fields.first_name.clone(),
            fields.last_name.clone(),
            optional(&fields.email),
            optional(&fields.phone),
            fields.address_1.clone(),
            optional(&fields.address_2),
            fields.city.clone(),
            fields.state.clone(),
            optional(&fields.postcode),
            fields.country_code.clone(),
        ]
    }
}

/// One row per transaction; the account is drawn from the entity's cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub record_id: String,
    pub date: NaiveDate,
    pub canonical_id: String,
    pub variant_id: String,
    pub is_duplicate: bool,
    pub fields: PersonFields,
}

impl CsvRecord for TransactionRow {
    const COLUMNS: &'static [&'static str] = &[
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
    ];

    fn values(&self) -> Vec<String> {
        let fields = &self.fields;
        vec![
            self.record_id.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            fields.first_name.clone(),
            fields.last_name.clone(),
            optional(&fields.email),
            optional(&fields.phone),
            fields.address_1.clone(),
            optional(&fields.address_2),
            fields.city.clone(),
            fields.state.clone(),
            self.canonical_id.clone(),
            self.variant_id.clone(),
            self.is_duplicate.to_string(),
        ]
    }
}

/// Population output in either layout.
#[derive(Debug, Clone)]
pub enum PopulationRows {
    Accounts(Vec<AccountRow>),
    Transactions(Vec<TransactionRow>),
}

impl PopulationRows {
    pub fn len(&self) -> usize {
        match self {
            PopulationRows::Accounts(rows) => rows.len(),
            PopulationRows::Transactions(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn canonical_id(index: u64) -> String {
    format!("id_{index:05}")
}

fn record_id(index: usize) -> String {
    format!("r{index:07}")
}

/// Create every canonical entity and its duplicate cluster.
pub fn build_clusters(
    config: &GenerationConfig,
    generator: &ClusterGenerator<'_>,
    provider: &dyn BaseValueProvider,
    rng: &mut dyn RngCore,
    report: &mut GenerationReport,
) -> Vec<DuplicateCluster> {
    let mut clusters = Vec::with_capacity(config.population_size as usize);
    for index in 0..config.population_size {
        let canonical = CanonicalEntity {
            canonical_id: canonical_id(index),
            fields: provider.person(&config.presence, rng),
        };
        let cluster = generator.cluster(canonical, rng);
        report.record_canonical(cluster.duplicates().len());
        for member in &cluster.members {
            report.record_variant(member);
        }
        clusters.push(cluster);
    }
    clusters
}

/// Flatten clusters into account rows, then shuffle.
pub fn account_rows(clusters: &[DuplicateCluster], rng: &mut dyn RngCore) -> Vec<AccountRow> {
    let mut rows: Vec<AccountRow> = clusters
        .iter()
        .flat_map(|cluster| cluster.members.iter())
        .enumerate()
        .map(|(index, member)| AccountRow {
            record_id: record_id(index + 1),
            canonical_id: member.canonical_id.clone(),
            variant_id: member.variant_id.clone(),
            is_duplicate: member.is_duplicate,
            fields: member.fields.clone(),
        })
        .collect();
    rows.shuffle(rng);
    rows
}

/// `max(1, poisson(avg))` transactions per entity, then shuffle.
pub fn transaction_rows(
    config: &GenerationConfig,
    clusters: &[DuplicateCluster],
    avg_transactions: f64,
    rng: &mut dyn RngCore,
) -> Vec<TransactionRow> {
    let mut rows = Vec::new();
    for cluster in clusters {
        let count = poisson(avg_transactions, rng).max(1);
        debug!(
            canonical_id = %cluster.canonical.canonical_id,
            transactions = count,
            "transactions drawn"
        );
        for _ in 0..count {
            let Some(account) = cluster.members.choose(rng) else {
                continue;
            };
            let date = random_date(&config.date_range, rng);
            rows.push(transaction(rows.len() + 1, date, account));
        }
    }
    rows.shuffle(rng);
    rows
}

fn transaction(index: usize, date: NaiveDate, account: &Variant) -> TransactionRow {
    TransactionRow {
        record_id: record_id(index),
        date,
        canonical_id: account.canonical_id.clone(),
        variant_id: account.variant_id.clone(),
        is_duplicate: account.is_duplicate,
        fields: account.fields.clone(),
    }
}

/// Build the population dataset; the layout follows `population.avg_transactions`.
pub fn assemble_population(
    config: &GenerationConfig,
    generator: &ClusterGenerator<'_>,
    provider: &dyn BaseValueProvider,
    rng: &mut dyn RngCore,
    report: &mut GenerationReport,
) -> PopulationRows {
    let clusters = build_clusters(config, generator, provider, rng, report);
    match config.population.avg_transactions {
        Some(avg) => PopulationRows::Transactions(transaction_rows(config, &clusters, avg, rng)),
        None => PopulationRows::Accounts(account_rows(&clusters, rng)),
    }
}
