use chrono::{NaiveDateTime, NaiveTime};
use fake::Fake;
use fake::faker::internet::en::IPv4;
use fake::faker::lorem::en::Sentence;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore};
use tracing::debug;

use dupforge_core::{CanonicalEntity, DateRange, GenerationConfig, PersonFields};

use crate::assemble::population::canonical_id;
use crate::cluster::ClusterGenerator;
use crate::model::GenerationReport;
use crate::output::csv::{CsvRecord, optional};
use crate::providers::BaseValueProvider;
use crate::rng::{datetime_between, random_datetime, random_uuid, weighted_pick};

pub const STORE_ID: &str = "1e27b743-d66d-41a4-8b4e-876b051a5948";

/// Ground-truth column, written only when `include_duplicate_group_id` is set.
pub const DUPLICATE_GROUP_COLUMN: &str = "duplicate_group_id";

pub const ORDER_STATUSES: &[&str] = &[
    "pending",
    "processing",
    "shipped",
    "delivered",
    "cancelled",
    "refunded",
    "completed",
];

const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "CAD", "AUD", "CHF", "JPY"];

const CATEGORIES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Home & Garden",
    "Sports & Outdoors",
    "Books",
    "Health & Beauty",
    "Toys & Games",
    "Automotive",
    "Tools & Hardware",
    "Jewelry & Watches",
    "Music & Movies",
    "Pet Supplies",
];

const ADJECTIVES: &[&str] = &[
    "Premium",
    "Deluxe",
    "Professional",
    "Classic",
    "Modern",
    "Vintage",
    "Eco-Friendly",
    "Wireless",
    "Portable",
    "Heavy-Duty",
    "Lightweight",
    "Waterproof",
    "Stainless",
    "Digital",
    "Smart",
    "Ultra",
    "Pro",
    "Max",
];

const NOUNS: &[&str] = &[
    "Widget",
    "Device",
    "Tool",
    "Gadget",
    "Accessory",
    "Component",
    "Kit",
    "Set",
    "System",
    "Solution",
    "Product",
    "Item",
    "Unit",
    "Piece",
];

const VENDORS: &[&str] = &[
    "TechCorp",
    "GlobalMart",
    "PrimeBrand",
    "MegaStore",
    "EliteProducts",
    "InnovateCo",
    "QualityFirst",
    "BestChoice",
    "TopTier",
    "UltimateBrand",
    "SuperiorGoods",
    "ExcellenceCorp",
    "PremiumPlus",
    "MaxValue",
    "ProLine",
];

const COLORS: &[&str] = &[
    "Red", "Blue", "Green", "Black", "White", "Gray", "Silver", "Gold", "Brown", "Purple",
];
const SIZES: &[&str] = &[
    "XS", "S", "M", "L", "XL", "XXL", "32", "34", "36", "38", "40", "42",
];
const MATERIALS: &[&str] = &[
    "Cotton", "Polyester", "Leather", "Metal", "Plastic", "Wood", "Glass", "Ceramic",
];
const STYLES: &[&str] = &[
    "Classic", "Modern", "Vintage", "Casual", "Formal", "Sport", "Business",
];

const VARIANT_ATTRIBUTES: [(&str, &[&str]); 4] = [
    ("color", COLORS),
    ("size", SIZES),
    ("material", MATERIALS),
    ("style", STYLES),
];

/// Price tiers in whole currency units with their weights.
const PRICE_TIERS: [((i64, i64), f64); 4] = [
    ((5, 50), 0.4),
    ((50, 200), 0.3),
    ((200, 1000), 0.2),
    ((1000, 5000), 0.1),
];

/// Order-level values, regenerated for every duplicate submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHeader {
    pub external_id: String,
    pub status: String,
    pub currency: String,
    pub total_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub client_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVariant {
    pub external_id: String,
    pub title: String,
    pub sku: Option<String>,
    pub price_cents: i64,
    /// JSON object of the drawn attributes.
    pub attributes: Option<String>,
    pub image_id: Option<String>,
    pub image_src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub external_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub subtotal_cents: Option<i64>,
}

/// One ordered line item; orders are the rows sharing a `group_order_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRow {
    pub id: String,
    pub store_id: String,
    pub group_order_id: String,
    pub duplicate_group_id: Option<String>,
    pub order: OrderHeader,
    /// Customer contact plus shipping address.
    pub person: PersonFields,
    pub product: Product,
    pub variant: ProductVariant,
    pub line: LineItem,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CsvRecord for OrderLineRow {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "store_id",
        "group_order_id",
        "order_external_id",
        "order_status",
        "order_total_amount",
        "order_currency",
        "order_created_at",
        "order_updated_at",
        "customer_email",
        "customer_phone_number",
        "client_ip",
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
        "product_vendor",
        "product_type",
        "variant_external_id",
        "variant_title",
        "variant_sku",
        "variant_price",
        "variant_attributes",
        "variant_image_id",
        "variant_image_src",
        "line_item_external_id",
        "line_item_quantity",
        "line_item_unit_price",
        "line_item_total_price",
        "line_item_currency",
        "line_item_subtotal",
        "created_at",
        "updated_at",
        DUPLICATE_GROUP_COLUMN,
    ];

    fn values(&self) -> Vec<String> {
        let order = &self.order;
        let person = &self.person;
        let product = &self.product;
        let variant = &self.variant;
        let line = &self.line;
        vec![
            self.id.clone(),
            self.store_id.clone(),
            self.group_order_id.clone(),
            order.external_id.clone(),
            order.status.clone(),
            money(order.total_cents),
            order.currency.clone(),
            timestamp(order.created_at),
            timestamp(order.updated_at),
            optional(&person.email),
            optional(&person.phone),
            order.client_ip.clone(),
            person.first_name.clone(),
            person.last_name.clone(),
            person.address_1.clone(),
            optional(&person.address_2),
            person.city.clone(),
            person.state.clone(),
            optional(&person.postcode),
            person.country_code.clone(),
            product.external_id.clone(),
            product.title.clone(),
            optional(&product.description),
            optional(&product.vendor),
            optional(&product.product_type),
            variant.external_id.clone(),
            variant.title.clone(),
            optional(&variant.sku),
            money(variant.price_cents),
            optional(&variant.attributes),
            optional(&variant.image_id),
            optional(&variant.image_src),
            line.external_id.clone(),
            line.quantity.to_string(),
            money(line.unit_price_cents),
            money(line.total_cents),
            line.currency.clone(),
            line.subtotal_cents.map(money).unwrap_or_default(),
            timestamp(self.created_at),
            timestamp(self.updated_at),
            optional(&self.duplicate_group_id),
        ]
    }
}

/// Columns left out of the orders CSV for a configuration.
pub fn hidden_columns(config: &GenerationConfig) -> Vec<&'static str> {
    if config.orders.include_duplicate_group_id {
        Vec::new()
    } else {
        vec![DUPLICATE_GROUP_COLUMN]
    }
}

/// Two-decimal amount from cents.
pub fn money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

pub fn timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn external_id(prefix: &str, rng: &mut dyn RngCore) -> String {
    format!("{prefix}_{}", rng.random_range(1..=9_999_999))
}

pub(crate) fn pick(pool: &[&'static str], rng: &mut dyn RngCore) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

/// Scale cents by a factor drawn in hundredths from `range`.
pub(crate) fn scale_cents(
    cents: i64,
    range: std::ops::RangeInclusive<i64>,
    rng: &mut dyn RngCore,
) -> i64 {
    let factor = rng.random_range(range);
    (cents * factor + 50).div_euclid(100)
}

fn window_end(range: &DateRange) -> NaiveDateTime {
    range
        .end
        .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default())
}

fn order_header(config: &GenerationConfig, rng: &mut dyn RngCore) -> OrderHeader {
    let currency = pick(CURRENCIES, rng);
    let created_at = random_datetime(&config.date_range, rng);
    let updated_at = datetime_between(created_at, window_end(&config.date_range), rng);
    OrderHeader {
        external_id: external_id("ORD", rng),
        status: pick(ORDER_STATUSES, rng),
        currency,
        total_cents: 0,
        created_at,
        updated_at,
        client_ip: IPv4().fake_with_rng(rng),
    }
}

fn product_title(rng: &mut dyn RngCore) -> String {
    let adjective = pick(ADJECTIVES, rng);
    let noun = pick(NOUNS, rng);
    let category = pick(CATEGORIES, rng);
    match rng.random_range(0..4) {
        0 => format!("{adjective} {noun}"),
        1 => format!("{adjective} {category} {noun}"),
        2 => format!("{category} {noun}"),
        _ => format!("{adjective} {category}"),
    }
}

fn product(rng: &mut dyn RngCore) -> Product {
    let title = product_title(rng);
    let description = (!rng.random_bool(0.2)).then(|| {
        let sentence: String = Sentence(4..10).fake_with_rng(rng);
        sentence.chars().take(100).collect()
    });
    Product {
        external_id: external_id("PROD", rng),
        title,
        description,
        vendor: rng.random_bool(0.8).then(|| pick(VENDORS, rng)),
        product_type: rng.random_bool(0.6).then(|| pick(CATEGORIES, rng)),
    }
}

fn variant_title(product_title: &str, rng: &mut dyn RngCore) -> String {
    if rng.random_bool(0.3) {
        return product_title.to_string();
    }
    let mut parts = Vec::new();
    if rng.random_bool(0.7) {
        parts.push(pick(COLORS, rng));
    }
    if rng.random_bool(0.5) {
        parts.push(pick(SIZES, rng));
    }
    if parts.is_empty() {
        product_title.to_string()
    } else {
        format!("{product_title} - {}", parts.join(" / "))
    }
}

fn sku(rng: &mut dyn RngCore) -> Option<String> {
    if rng.random_bool(0.1) {
        return None;
    }
    let letters: String = (0..2)
        .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
        .collect();
    let digits: String = (0..4)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect();
    Some(format!("{letters}-{digits}"))
}

fn variant_attributes(rng: &mut dyn RngCore) -> Option<String> {
    if rng.random_bool(0.3) {
        return None;
    }
    let mut attributes = serde_json::Map::new();
    for (name, values) in VARIANT_ATTRIBUTES {
        if rng.random_bool(0.4) {
            attributes.insert(name.to_string(), pick(values, rng).into());
        }
    }
    if attributes.is_empty() {
        return None;
    }
    serde_json::to_string(&attributes).ok()
}

fn price_cents(rng: &mut dyn RngCore) -> i64 {
    let (low, high) = weighted_pick(&PRICE_TIERS, rng).copied().unwrap_or((5, 50));
    rng.random_range(low * 100..=high * 100)
}

fn product_variant(product_title: &str, rng: &mut dyn RngCore) -> ProductVariant {
    let title = variant_title(product_title, rng);
    let (image_id, image_src) = if rng.random_bool(0.4) {
        (None, None)
    } else {
        let id = format!("img_{}", rng.random_range(100_000..=999_999));
        let src = format!("https://cdn.example.com/products/{id}.jpg");
        (Some(id), Some(src))
    };
    let attributes = variant_attributes(rng);
    ProductVariant {
        external_id: external_id("VAR", rng),
        title,
        sku: sku(rng),
        price_cents: price_cents(rng),
        attributes,
        image_id,
        image_src,
    }
}

fn line_item(unit_price_cents: i64, quantity: u32, currency: &str, rng: &mut dyn RngCore) -> LineItem {
    let total_cents = unit_price_cents * i64::from(quantity);
    let subtotal_cents = rng
        .random_bool(0.6)
        .then(|| scale_cents(total_cents, 85..=95, rng));
    LineItem {
        external_id: external_id("LINE", rng),
        quantity,
        unit_price_cents,
        total_cents,
        currency: currency.to_string(),
        subtotal_cents,
    }
}

/// Sum of line totals with a 95–115% tax and shipping variance.
fn order_total(lines: &[LineItem], rng: &mut dyn RngCore) -> i64 {
    let sum: i64 = lines.iter().map(|line| line.total_cents).sum();
    scale_cents(sum, 95..=115, rng)
}

struct OrderContext<'a> {
    group_order_id: String,
    duplicate_group_id: Option<&'a str>,
    person: &'a PersonFields,
}

fn rows_for_order(
    config: &GenerationConfig,
    context: OrderContext<'_>,
    mut order: OrderHeader,
    items: Vec<(Product, ProductVariant, LineItem)>,
    rng: &mut dyn RngCore,
) -> Vec<OrderLineRow> {
    let lines: Vec<LineItem> = items.iter().map(|(_, _, line)| line.clone()).collect();
    order.total_cents = order_total(&lines, rng);
    items
        .into_iter()
        .map(|(product, variant, line)| OrderLineRow {
            id: random_uuid(rng),
            store_id: STORE_ID.to_string(),
            group_order_id: context.group_order_id.clone(),
            duplicate_group_id: context.duplicate_group_id.map(str::to_string),
            order: order.clone(),
            person: context.person.clone(),
            product,
            variant,
            line,
            created_at: random_datetime(&config.date_range, rng),
            updated_at: random_datetime(&config.date_range, rng),
        })
        .collect()
}

fn original_order(
    config: &GenerationConfig,
    person: &PersonFields,
    duplicate_group_id: Option<&str>,
    rng: &mut dyn RngCore,
) -> Vec<OrderLineRow> {
    let group_order_id = random_uuid(rng);
    let order = order_header(config, rng);
    let count = rng.random_range(1..=config.orders.max_line_items);
    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let item = product(rng);
        let variant = product_variant(&item.title, rng);
        let quantity = rng.random_range(1..=config.orders.max_quantity);
        let line = line_item(variant.price_cents, quantity, &order.currency, rng);
        items.push((item, variant, line));
    }
    let context = OrderContext {
        group_order_id,
        duplicate_group_id,
        person,
    };
    rows_for_order(config, context, order, items, rng)
}

/// Resubmission of `original`: same products, new order values, jittered quantities.
fn duplicate_order(
    config: &GenerationConfig,
    original: &[OrderLineRow],
    person: &PersonFields,
    duplicate_group_id: &str,
    rng: &mut dyn RngCore,
) -> Vec<OrderLineRow> {
    let group_order_id = random_uuid(rng);
    let order = order_header(config, rng);
    let items = original
        .iter()
        .map(|row| {
            let mut quantity = row.line.quantity;
            if rng.random_bool(config.orders.quantity_jitter_rate) {
                let shifted = i64::from(quantity) + rng.random_range(-1i64..=2);
                quantity = u32::try_from(shifted.max(1)).unwrap_or(1);
            }
            let line = line_item(row.line.unit_price_cents, quantity, &order.currency, rng);
            (row.product.clone(), row.variant.clone(), line)
        })
        .collect();
    let context = OrderContext {
        group_order_id,
        duplicate_group_id: Some(duplicate_group_id),
        person,
    };
    rows_for_order(config, context, order, items, rng)
}

/// Whether 1-based order `position` spawns duplicate submissions.
pub fn is_duplicated(position: u64, frequency: u64) -> bool {
    frequency > 0 && position % frequency == 0
}

/// Build the order line dataset, shuffled.
///
/// `population_size` is the number of original orders. Every
/// `duplicate_frequency`-th order is followed by `min_duplicates..=max_duplicates`
/// resubmissions whose customer and shipping fields run through the cluster
/// generator.
pub fn assemble_orders(
    config: &GenerationConfig,
    generator: &ClusterGenerator<'_>,
    provider: &dyn BaseValueProvider,
    rng: &mut dyn RngCore,
    report: &mut GenerationReport,
) -> Vec<OrderLineRow> {
    let frequency = config.orders.effective_frequency(config.population_size);
    let mut rows = Vec::new();

    for index in 0..config.population_size {
        let canonical = CanonicalEntity {
            canonical_id: canonical_id(index),
            fields: provider.person(&config.presence, rng),
        };

        if !is_duplicated(index + 1, frequency) {
            report.record_canonical(0);
            rows.extend(original_order(config, &canonical.fields, None, rng));
            continue;
        }

        let duplicate_group_id = format!("DUP_{}", random_uuid(rng));
        let original = original_order(config, &canonical.fields, Some(duplicate_group_id.as_str()), rng);
        let count = rng.random_range(config.orders.min_duplicates..=config.orders.max_duplicates);
        let cluster = generator.cluster_with_count(canonical, count, rng);
        report.record_canonical(cluster.duplicates().len());
        debug!(
            duplicate_group_id = %duplicate_group_id,
            duplicates = count,
            lines = original.len(),
            "order duplicated"
        );

        let mut duplicates = Vec::new();
        for member in cluster.duplicates() {
            report.record_variant(member);
            duplicates.extend(duplicate_order(
                config,
                &original,
                &member.fields,
                &duplicate_group_id,
                rng,
            ));
        }
        rows.extend(original);
        rows.extend(duplicates);
    }

    rows.shuffle(rng);
    rows
}
