use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use regex::{NoExpand, Regex};

use dupforge_core::{ErrorKind, FieldType, NoiseWeights};

use crate::noise::tables::{ADDRESS_ABBREVIATIONS, COMPOUND_STREET_SUFFIXES, DIRECTION_SWAPS};
use crate::noise::{ErrorModel, NoiseOperator, OperatorLibrary, TypoModel, capitalize, title_case};

pub fn register(library: &mut OperatorLibrary, weights: &NoiseWeights, typos: &TypoModel) {
    library.register(Box::new(AddressOperator {
        model: ErrorModel::new(&weights.address),
        typos: typos.clone(),
    }));
}

/// Street-line pollution. Results are trimmed.
pub struct AddressOperator {
    model: ErrorModel,
    typos: TypoModel,
}

impl NoiseOperator for AddressOperator {
    fn field_type(&self) -> FieldType {
        FieldType::Address
    }

    fn model_for(&self, _value: &str) -> &ErrorModel {
        &self.model
    }

    fn apply(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let polluted = match kind {
            ErrorKind::Typo => self.typos.introduce(value, rng),
            ErrorKind::AbbreviationVariation => abbreviate(value, rng)?,
            ErrorKind::CaseVariation => address_case(value, rng),
            ErrorKind::WhitespaceCorruption => corrupt_whitespace(value, rng)?,
            ErrorKind::HouseNumber => shift_house_number(value, rng)?,
            ErrorKind::DirectionFlip => flip_direction(value)?,
            _ => return None,
        };
        Some(polluted.trim().to_string())
    }
}

fn whole_word(word: &str, ignore_case: bool) -> Option<Regex> {
    let flags = if ignore_case { "(?i)" } else { "" };
    Regex::new(&format!(r"{flags}\b{}\b", regex::escape(word))).ok()
}

/// Swap the first table word found for one of its variants. German compound
/// streets fall back to abbreviating their suffix (`Bahnhofstrasse` to
/// `Bahnhofstr.`).
fn abbreviate(value: &str, rng: &mut dyn RngCore) -> Option<String> {
    for (full, variants) in ADDRESS_ABBREVIATIONS {
        let Some(re) = whole_word(full, true) else {
            continue;
        };
        if re.is_match(value) {
            let variant = variants.choose(rng)?;
            return Some(re.replacen(value, 1, NoExpand(*variant)).into_owned());
        }
    }
    for (suffix, variants) in COMPOUND_STREET_SUFFIXES {
        let Ok(re) = Regex::new(&format!(r"(?i)\B{}\b", regex::escape(suffix))) else {
            continue;
        };
        if re.is_match(value) {
            let variant = variants.choose(rng)?;
            return Some(re.replacen(value, 1, NoExpand(*variant)).into_owned());
        }
    }
    None
}

fn address_case(value: &str, rng: &mut dyn RngCore) -> String {
    match rng.random_range(0..5) {
        0 => value.to_uppercase(),
        1 => value.to_lowercase(),
        2 => title_case(value),
        3 => capitalize(value),
        _ => proper_case(value),
    }
}

/// Upper-case after spaces only, lower-case everywhere else.
fn proper_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous = ' ';
    for ch in value.chars() {
        if previous == ' ' {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        previous = ch;
    }
    out
}

fn corrupt_whitespace(value: &str, rng: &mut dyn RngCore) -> Option<String> {
    if rng.random_bool(0.4) {
        Some(value.replace(' ', "  "))
    } else if rng.random_bool(0.3) {
        Some(value.replace(' ', ""))
    } else if rng.random_bool(0.3) {
        Some(format!(" {value} "))
    } else {
        None
    }
}

fn shift_house_number(value: &str, rng: &mut dyn RngCore) -> Option<String> {
    let re = Regex::new(r"\d+").ok()?;
    let numbers: Vec<&str> = re.find_iter(value).map(|found| found.as_str()).collect();
    let old = *numbers.choose(rng)?;

    let new = if old.len() > 1 && rng.random_bool(0.5) {
        let mut digits = old.as_bytes().to_vec();
        let pos = rng.random_range(0..digits.len() - 1);
        digits.swap(pos, pos + 1);
        String::from_utf8_lossy(&digits).into_owned()
    } else {
        let parsed: i64 = old.parse().ok()?;
        (parsed + rng.random_range(-5..=5)).max(1).to_string()
    };
    Some(value.replacen(old, &new, 1))
}

/// Flip the leftmost compass token; two-letter tokens win over their first letter.
fn flip_direction(value: &str) -> Option<String> {
    let mut keys: Vec<&str> = DIRECTION_SWAPS.iter().map(|(from, _)| *from).collect();
    keys.sort_by_key(|key| std::cmp::Reverse(key.len()));
    let re = Regex::new(&format!(r"\b(?:{})\b", keys.join("|"))).ok()?;
    let found = re.find(value)?;
    let (_, to) = DIRECTION_SWAPS
        .iter()
        .find(|(from, _)| *from == found.as_str())?;
    let mut out = String::with_capacity(value.len());
    out.push_str(&value[..found.start()]);
    out.push_str(to);
    out.push_str(&value[found.end()..]);
    Some(out)
}
