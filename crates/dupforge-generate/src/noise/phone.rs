use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use dupforge_core::{ErrorKind, FieldType, NoiseWeights};

use crate::noise::tables::DIGIT_LOOKALIKES;
use crate::noise::{ErrorModel, NoiseOperator, OperatorLibrary};

/// Characters a polluted phone may contain besides digits.
pub const PHONE_PUNCTUATION: &str = "()+-. ";

pub fn register(library: &mut OperatorLibrary, weights: &NoiseWeights) {
    library.register(Box::new(PhoneOperator {
        model: ErrorModel::new(&weights.phone),
    }));
}

/// Phone pollution over the extracted digit string.
///
/// North American values with fewer than ten digits are left alone; Swiss
/// `+41` values need a nine-digit national number. Only `digit_substitution`
/// may emit letters, through its scanner-lookalike path.
pub struct PhoneOperator {
    model: ErrorModel,
}

impl NoiseOperator for PhoneOperator {
    fn field_type(&self) -> FieldType {
        FieldType::Phone
    }

    fn model_for(&self, _value: &str) -> &ErrorModel {
        &self.model
    }

    fn apply(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String> {
        let digits = extract_digits(value);
        match NumberPlan::detect(value, &digits) {
            NumberPlan::NorthAmerican => north_american(kind, digits, rng),
            NumberPlan::Swiss { national } => swiss(kind, national, rng),
        }
    }
}

/// Numbering plan a value is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NumberPlan {
    NorthAmerican,
    /// National significant number, without the `41` country code.
    Swiss { national: String },
}

impl NumberPlan {
    fn detect(value: &str, digits: &str) -> Self {
        let value = value.trim_start();
        let national = if value.starts_with("+41") {
            digits.strip_prefix("41")
        } else if value.starts_with("0041") {
            digits.strip_prefix("0041")
        } else {
            None
        };
        match national {
            Some(national) => NumberPlan::Swiss {
                national: national.trim_start_matches('0').to_string(),
            },
            None => NumberPlan::NorthAmerican,
        }
    }
}

fn north_american(kind: ErrorKind, digits: String, rng: &mut dyn RngCore) -> Option<String> {
    if digits.len() < 10 {
        return None;
    }
    match kind {
        ErrorKind::FormatVariation => format_layouts(&digits).choose(rng).cloned(),
        ErrorKind::DigitTransposition => Some(grouped(&transpose_digits(&digits, rng))),
        ErrorKind::DigitSubstitution => Some(grouped(&substitute_digit(&digits, rng))),
        ErrorKind::PartialNumber => {
            let partial = if rng.random_bool(0.5) {
                let drop = rng.random_range(1..=2);
                digits[..digits.len() - drop].to_string()
            } else {
                digits[3..].to_string()
            };
            if partial.len() >= 10 {
                Some(grouped(&partial))
            } else {
                Some(partial)
            }
        }
        ErrorKind::ExtraDigits => {
            let prefix = match rng.random_range(0..3) {
                0 => "1",
                1 => "001",
                _ => ["123", "456", "789"].choose(rng).copied().unwrap_or("123"),
            };
            let extended = format!("{prefix}{digits}");
            Some(format!(
                "+{} ({}) {}-{}",
                &extended[..1],
                &extended[1..4],
                &extended[4..7],
                &extended[7..]
            ))
        }
        ErrorKind::SpacingErrors => {
            let (area, exchange, rest) = split(&digits);
            if rng.random_bool(0.5) {
                Some(format!("({area}){exchange} - {rest}"))
            } else {
                Some(format!("( {area} ) {exchange} - {rest}"))
            }
        }
        _ => None,
    }
}

/// Swiss pollution keeps the `+41` country code in front of every result.
fn swiss(kind: ErrorKind, national: String, rng: &mut dyn RngCore) -> Option<String> {
    if national.len() < 9 {
        return None;
    }
    match kind {
        ErrorKind::FormatVariation => swiss_layouts(&national).choose(rng).cloned(),
        ErrorKind::DigitTransposition => Some(swiss_grouped(&transpose_digits(&national, rng))),
        ErrorKind::DigitSubstitution => Some(swiss_grouped(&substitute_digit(&national, rng))),
        ErrorKind::PartialNumber => {
            if rng.random_bool(0.5) {
                let drop = rng.random_range(1..=2);
                Some(format!("+41 {}", &national[..national.len() - drop]))
            } else {
                Some(format!("+41 {}", &national[2..]))
            }
        }
        ErrorKind::ExtraDigits => {
            let prefix = ["0", "41", "00"].choose(rng).copied().unwrap_or("0");
            Some(format!("+41 {prefix}{}", &swiss_grouped(&national)[4..]))
        }
        ErrorKind::SpacingErrors => {
            let (prefix, block, pair, last) = swiss_split(&national);
            if rng.random_bool(0.5) {
                Some(format!("+41({prefix}){block} - {pair}{last}"))
            } else {
                Some(format!("+41 ( {prefix} ) {block} -{pair} {last}"))
            }
        }
        _ => None,
    }
}

pub fn extract_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Every layout `format_variation` can produce for a digit string of ten or
/// more digits.
pub fn format_layouts(digits: &str) -> Vec<String> {
    let (area, exchange, rest) = split(digits);
    let tail = &digits[3..];
    vec![
        format!("({area}) {exchange}-{rest}"),
        format!("{area}-{exchange}-{rest}"),
        format!("{area}.{exchange}.{rest}"),
        format!("{area} {exchange} {rest}"),
        format!("+1 {area} {exchange} {rest}"),
        format!("+1({area}){exchange}-{rest}"),
        format!("1-{area}-{exchange}-{rest}"),
        digits.to_string(),
        format!("{area}-{tail}"),
    ]
}

/// Every layout `format_variation` can produce for a Swiss national number.
pub fn swiss_layouts(national: &str) -> Vec<String> {
    let (prefix, block, pair, last) = swiss_split(national);
    vec![
        format!("+41 {prefix} {block} {pair} {last}"),
        format!("+41{national}"),
        format!("0041 {prefix} {block} {pair} {last}"),
        format!("+41 (0){prefix} {block} {pair} {last}"),
        format!("+41-{prefix}-{block}-{pair}-{last}"),
        format!("+41.{prefix}.{block}.{pair}.{last}"),
    ]
}

fn swiss_split(national: &str) -> (&str, &str, &str, &str) {
    (
        &national[..2],
        &national[2..5],
        &national[5..7],
        &national[7..],
    )
}

fn swiss_grouped(national: &str) -> String {
    let (prefix, block, pair, last) = swiss_split(national);
    format!("+41 {prefix} {block} {pair} {last}")
}

fn split(digits: &str) -> (&str, &str, &str) {
    (&digits[..3], &digits[3..6], &digits[6..])
}

fn grouped(digits: &str) -> String {
    let (area, exchange, rest) = split(digits);
    format!("({area}) {exchange}-{rest}")
}

fn transpose_digits(digits: &str, rng: &mut dyn RngCore) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    let pos = rng.random_range(0..bytes.len() - 1);
    bytes.swap(pos, pos + 1);
    String::from_utf8_lossy(&bytes).into_owned()
}

fn substitute_digit(digits: &str, rng: &mut dyn RngCore) -> String {
    let mut chars: Vec<char> = digits.chars().collect();
    let pos = rng.random_range(0..chars.len());
    let current = chars[pos];
    let lookalikes = DIGIT_LOOKALIKES
        .iter()
        .find(|(digit, _)| *digit == current)
        .map(|(_, letters)| *letters);
    if let Some(lookalikes) = lookalikes {
        chars[pos] = if rng.random_bool(0.7) {
            char::from(b'0' + rng.random_range(0..10u8))
        } else {
            lookalikes.choose(rng).copied().unwrap_or(current)
        };
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::run_rng;

    #[test]
    fn short_numbers_are_untouched() {
        let operator = PhoneOperator {
            model: ErrorModel::new(&NoiseWeights::default().phone),
        };
        let mut rng = run_rng(1);
        assert_eq!(
            operator.apply(ErrorKind::FormatVariation, "555-1234", &mut rng),
            None
        );
    }

    #[test]
    fn extra_digits_prefix_the_number() {
        let operator = PhoneOperator {
            model: ErrorModel::new(&NoiseWeights::default().phone),
        };
        let mut rng = run_rng(5);
        for _ in 0..30 {
            let out = operator
                .apply(ErrorKind::ExtraDigits, "4155551234", &mut rng)
                .expect("extra digits");
            assert!(out.starts_with('+'));
            assert!(extract_digits(&out).ends_with("4155551234"));
        }
    }

    #[test]
    fn swiss_numbers_keep_their_country_code() {
        let operator = PhoneOperator {
            model: ErrorModel::new(&NoiseWeights::default().phone),
        };
        let mut rng = run_rng(9);
        let kinds = [
            ErrorKind::FormatVariation,
            ErrorKind::DigitTransposition,
            ErrorKind::PartialNumber,
            ErrorKind::ExtraDigits,
            ErrorKind::SpacingErrors,
        ];
        for _ in 0..40 {
            for kind in kinds {
                let out = operator
                    .apply(kind, "+41 79 123 45 67", &mut rng)
                    .expect("swiss variant");
                assert!(out.starts_with("+41") || out.starts_with("0041"), "{kind}: {out}");
                assert!(!out.starts_with("+1"), "{kind}: {out}");
            }
        }
    }

    #[test]
    fn swiss_partial_number_drops_the_mobile_prefix_not_the_country_code() {
        let operator = PhoneOperator {
            model: ErrorModel::new(&NoiseWeights::default().phone),
        };
        let mut rng = run_rng(2);
        for _ in 0..40 {
            let out = operator
                .apply(ErrorKind::PartialNumber, "+41 79 123 45 67", &mut rng)
                .expect("partial");
            let digits = extract_digits(&out);
            assert!(
                ["41791234567", "4179123456", "417912345", "411234567"].contains(&digits.as_str()),
                "{out}"
            );
        }
    }

    #[test]
    fn swiss_layouts_keep_the_national_number() {
        for layout in swiss_layouts("791234567") {
            assert!(extract_digits(&layout).ends_with("791234567"), "{layout}");
        }
    }

    #[test]
    fn layouts_keep_digit_order() {
        for layout in format_layouts("4155551234") {
            let digits = extract_digits(&layout);
            assert!(digits.ends_with("4155551234"), "{layout}");
        }
    }
}
