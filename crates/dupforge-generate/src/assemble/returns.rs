use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::warn;

use dupforge_core::GenerationConfig;

use crate::assemble::orders::{OrderLineRow, external_id, money, pick, scale_cents, timestamp};
use crate::model::GenerationReport;
use crate::output::csv::{CsvRecord, optional};
use crate::rng::random_uuid;

/// Order statuses that can carry a return.
pub const RETURNABLE_STATUSES: &[&str] = &["delivered", "completed", "shipped"];

const RETURN_REASONS: &[&str] = &[
    "Defective item",
    "Wrong item received",
    "Item not as described",
    "Changed mind",
    "Too small",
    "Too large",
    "Poor quality",
    "Damaged during shipping",
    "Late delivery",
    "Duplicate order",
    "Color not as expected",
    "Material issues",
    "Sizing issues",
    "Customer dissatisfaction",
    "Product malfunction",
    "Missing parts",
    "Incorrect specifications",
    "Better price found elsewhere",
    "No longer needed",
    "Gift return",
];

const REFUNDED_BY: &[&str] = &[
    "Customer Service",
    "Auto-refund System",
    "Return Department",
    "Manager",
    "Support Agent",
    "Quality Assurance",
    "Billing Department",
];

const FULL_RETURN_STATUSES: &[&str] = &["fully_returned", "return_processed", "refunded"];

pub const SKIP_LINE_ITEM_MISSING: &str = "line_item_missing";

/// Lines of one order selected for return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRequest {
    pub group_order_id: String,
    /// `id`s of the ordered line rows.
    pub line_ids: Vec<String>,
    pub requested_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refund {
    pub external_id: Option<String>,
    pub amount_cents: Option<i64>,
    pub reason: String,
    pub refunded_by: Option<String>,
    pub refunded_payment: bool,
}

/// One returned line item, referencing the ordered row through `ordered_variant_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRow {
    pub id: String,
    pub ordered: OrderLineRow,
    pub refund: Refund,
    pub order_status: String,
    pub line_item_external_id: String,
    pub quantity: u32,
    pub subtotal_cents: i64,
    pub created_at: NaiveDateTime,
}

impl ReturnRow {
    pub fn is_partial(&self) -> bool {
        self.quantity < self.ordered.line.quantity
    }
}

impl CsvRecord for ReturnRow {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "ordered_variant_id",
        "group_order_id",
        "parent_order_external_id",
        "refund_external_id",
        "refund_date_created",
        "refund_amount",
        "refund_reason",
        "refunded_by",
        "refunded_payment",
        "order_status",
        "order_total_amount",
        "order_currency",
        "order_created_at",
        "order_updated_at",
        "customer_email",
        "customer_phone_number",
        "shipping_first_name",
        "shipping_last_name",
        "shipping_address_1",
        "shipping_address_2",
        "shipping_city",
        "shipping_state",
        "shipping_postcode",
        "shipping_country_code",
        "product_external_id",
        "product_title",
        "product_description",
        "variant_external_id",
        "variant_title",
        "variant_sku",
        "variant_price",
        "variant_attributes",
        "variant_image_id",
        "variant_image_src",
        "returned_line_item_external_id",
        "returned_quantity",
        "returned_unit_price",
        "returned_subtotal",
        "returned_total",
        "returned_currency",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<String> {
        let ordered = &self.ordered;
        let person = &ordered.person;
        let refund = &self.refund;
        let returned_at = timestamp(self.created_at);
        vec![
            self.id.clone(),
            ordered.id.clone(),
            ordered.group_order_id.clone(),
            ordered.order.external_id.clone(),
            optional(&refund.external_id),
            returned_at.clone(),
            refund.amount_cents.map(money).unwrap_or_default(),
            refund.reason.clone(),
            optional(&refund.refunded_by),
            refund.refunded_payment.to_string(),
            self.order_status.clone(),
            money(ordered.order.total_cents),
            ordered.order.currency.clone(),
            timestamp(ordered.order.created_at),
            returned_at.clone(),
            optional(&person.email),
            optional(&person.phone),
            person.first_name.clone(),
            person.last_name.clone(),
            person.address_1.clone(),
            optional(&person.address_2),
            person.city.clone(),
            person.state.clone(),
            optional(&person.postcode),
            person.country_code.clone(),
            ordered.product.external_id.clone(),
            ordered.product.title.clone(),
            optional(&ordered.product.description),
            ordered.variant.external_id.clone(),
            ordered.variant.title.clone(),
            optional(&ordered.variant.sku),
            money(ordered.variant.price_cents),
            optional(&ordered.variant.attributes),
            optional(&ordered.variant.image_id),
            optional(&ordered.variant.image_src),
            self.line_item_external_id.clone(),
            self.quantity.to_string(),
            money(ordered.line.unit_price_cents),
            money(self.subtotal_cents),
            money(self.subtotal_cents),
            ordered.line.currency.clone(),
            returned_at.clone(),
            returned_at,
        ]
    }
}

/// Decide which orders return which lines.
pub fn plan_requests(
    config: &GenerationConfig,
    rows: &[OrderLineRow],
    rng: &mut dyn RngCore,
) -> Vec<ReturnRequest> {
    let options = &config.returns;
    let mut orders: BTreeMap<&str, Vec<&OrderLineRow>> = BTreeMap::new();
    for row in rows {
        orders.entry(row.group_order_id.as_str()).or_default().push(row);
    }

    let mut requests = Vec::new();
    for (group_order_id, lines) in orders {
        let Some(first) = lines.first() else {
            continue;
        };
        if !RETURNABLE_STATUSES.contains(&first.order.status.as_str()) {
            continue;
        }
        if rng.random::<f64>() >= options.return_rate {
            continue;
        }

        let days = rng.random_range(options.min_days_after..=options.max_days_after);
        let requested_at = first.order.created_at + Duration::days(i64::from(days));

        let line_ids = if lines.len() > 1 && rng.random_bool(options.subset_rate) {
            let amount = rng.random_range(1..=lines.len());
            rand::seq::index::sample(rng, lines.len(), amount)
                .into_iter()
                .map(|index| lines[index].id.clone())
                .collect()
        } else {
            lines.iter().map(|line| line.id.clone()).collect()
        };

        requests.push(ReturnRequest {
            group_order_id: group_order_id.to_string(),
            line_ids,
            requested_at,
        });
    }
    requests
}

/// Resolve requests against the ordered rows; unknown line ids are skipped.
pub fn fulfil_requests(
    config: &GenerationConfig,
    requests: &[ReturnRequest],
    rows: &[OrderLineRow],
    rng: &mut dyn RngCore,
    report: &mut GenerationReport,
) -> Vec<ReturnRow> {
    let index: HashMap<&str, &OrderLineRow> =
        rows.iter().map(|row| (row.id.as_str(), row)).collect();

    let mut returns = Vec::new();
    for request in requests {
        for line_id in &request.line_ids {
            let Some(ordered) = index.get(line_id.as_str()) else {
                warn!(
                    group_order_id = %request.group_order_id,
                    line_id = %line_id,
                    "returned line item not found, skipping"
                );
                report.record_skipped(SKIP_LINE_ITEM_MISSING);
                continue;
            };
            returns.push(return_row(config, ordered, request.requested_at, rng));
        }
    }
    returns
}

fn return_row(
    config: &GenerationConfig,
    ordered: &OrderLineRow,
    requested_at: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> ReturnRow {
    let options = &config.returns;
    let ordered_quantity = ordered.line.quantity;
    let quantity = if ordered_quantity > 1 && rng.random_bool(options.partial_return_rate) {
        rng.random_range(1..ordered_quantity)
    } else {
        ordered_quantity
    };

    let gross = ordered.line.unit_price_cents * i64::from(quantity);
    let subtotal_cents = if rng.random_bool(options.restocking_fee_rate) {
        scale_cents(gross, 70..=95, rng)
    } else {
        gross
    };

    let refund = Refund {
        external_id: rng.random_bool(0.9).then(|| external_id("REF", rng)),
        amount_cents: rng.random_bool(0.95).then_some(subtotal_cents),
        reason: pick(RETURN_REASONS, rng),
        refunded_by: rng.random_bool(0.8).then(|| pick(REFUNDED_BY, rng)),
        refunded_payment: rng.random_bool(0.8) && rng.random_bool(0.5),
    };

    let order_status = if quantity < ordered_quantity {
        "partially_returned".to_string()
    } else {
        pick(FULL_RETURN_STATUSES, rng)
    };

    ReturnRow {
        id: random_uuid(rng),
        ordered: ordered.clone(),
        refund,
        order_status,
        line_item_external_id: external_id("RETLINE", rng),
        quantity,
        subtotal_cents,
        created_at: requested_at,
    }
}

/// Build the returns dataset from ordered rows, shuffled.
pub fn assemble_returns(
    config: &GenerationConfig,
    rows: &[OrderLineRow],
    rng: &mut dyn RngCore,
    report: &mut GenerationReport,
) -> Vec<ReturnRow> {
    let requests = plan_requests(config, rows, rng);
    let mut returns = fulfil_requests(config, &requests, rows, rng, report);
    returns.shuffle(rng);
    returns
}
