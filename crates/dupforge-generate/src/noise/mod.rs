//! Field-level noise operators and the library that dispatches to them.
//!
//! Every operator is a pure function of its input string and the run
//! generator: the input is never mutated and a precondition that does not
//! hold yields a no-op instead of an error.

use std::collections::BTreeMap;

use rand::{Rng, RngCore};

use dupforge_core::{ErrorKind, FieldType, GenerationConfig, ProviderLocale};

pub mod address;
pub mod email;
pub mod locality;
pub mod name;
pub mod phone;
pub mod selector;
pub mod tables;
pub mod typo;

pub use selector::ErrorModel;
pub use typo::TypoModel;

/// Outcome of a pollution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polluted {
    pub value: String,
    /// Kind that changed the value; `None` when the value is unchanged.
    pub applied: Option<ErrorKind>,
}

impl Polluted {
    pub fn unchanged(value: &str) -> Self {
        Self {
            value: value.to_string(),
            applied: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.applied.is_some()
    }
}

/// Pollution policy for one field type.
pub trait NoiseOperator {
    fn field_type(&self) -> FieldType;

    /// Weight table used for `value`; email picks it by domain class.
    fn model_for(&self, value: &str) -> &ErrorModel;

    /// Apply exactly one transformation of `kind`, or `None` when the kind
    /// does not apply to this value.
    fn apply(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String>;

    /// [`NoiseOperator::apply`] plus the kinds every field type shares.
    fn edit(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String> {
        let shared = kind.applies_to(self.field_type());
        match kind {
            ErrorKind::MissingValue if shared => Some(String::new()),
            ErrorKind::WordSwap if shared => swap_words(value, rng),
            _ => self.apply(kind, value, rng),
        }
    }

    /// Trigger draw, kind selection and application.
    fn pollute(&self, value: &str, trigger_probability: f64, rng: &mut dyn RngCore) -> Polluted {
        if value.is_empty() {
            return Polluted::unchanged(value);
        }
        if rng.random::<f64>() >= trigger_probability {
            return Polluted::unchanged(value);
        }
        let Some(kind) = self.model_for(value).choose(rng) else {
            return Polluted::unchanged(value);
        };
        match self.edit(kind, value, rng) {
            Some(polluted) if polluted != value => Polluted {
                value: polluted,
                applied: Some(kind),
            },
            _ => Polluted::unchanged(value),
        }
    }
}

/// Operators keyed by field type, built from one configuration.
pub struct OperatorLibrary {
    operators: BTreeMap<FieldType, Box<dyn NoiseOperator>>,
}

impl OperatorLibrary {
    pub fn new() -> Self {
        Self {
            operators: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        let mut library = Self::new();
        let typos = TypoModel::new(ErrorModel::new(&config.noise.text));
        library.register(Box::new(typo::TextOperator::new(typos.clone())));
        name::register(&mut library, &config.noise, &typos);
        email::register(
            &mut library,
            &config.noise,
            &typos,
            &config.tag_tolerant_domains,
        );
        phone::register(&mut library, &config.noise);
        address::register(&mut library, &config.noise, &typos);
        locality::register(&mut library, &config.noise, &typos, config.locale);
        library
    }

    /// Library with default weight tables for `locale`.
    pub fn with_defaults(locale: ProviderLocale) -> Self {
        let config = GenerationConfig {
            locale,
            ..GenerationConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn register(&mut self, operator: Box<dyn NoiseOperator>) {
        self.operators.insert(operator.field_type(), operator);
    }

    pub fn get(&self, field: FieldType) -> Option<&dyn NoiseOperator> {
        self.operators.get(&field).map(|operator| operator.as_ref())
    }

    pub fn pollute(
        &self,
        field: FieldType,
        value: &str,
        trigger_probability: f64,
        rng: &mut dyn RngCore,
    ) -> Polluted {
        match self.get(field) {
            Some(operator) => operator.pollute(value, trigger_probability, rng),
            None => Polluted::unchanged(value),
        }
    }

    /// Forced-kind application; unknown fields and inapplicable kinds are
    /// no-ops.
    pub fn apply(
        &self,
        field: FieldType,
        kind: ErrorKind,
        value: &str,
        rng: &mut dyn RngCore,
    ) -> Polluted {
        if value.is_empty() {
            return Polluted::unchanged(value);
        }
        let polluted = self
            .get(field)
            .and_then(|operator| operator.edit(kind, value, rng));
        match polluted {
            Some(polluted) if polluted != value => Polluted {
                value: polluted,
                applied: Some(kind),
            },
            _ => Polluted::unchanged(value),
        }
    }
}

impl Default for OperatorLibrary {
    fn default() -> Self {
        Self::with_defaults(ProviderLocale::EnUs)
    }
}

/// Random mixed case, one coin per character.
pub(crate) fn random_case(value: &str, rng: &mut dyn RngCore) -> String {
    value
        .chars()
        .map(|ch| {
            if rng.random_bool(0.5) {
                ch.to_uppercase().collect::<String>()
            } else {
                ch.to_lowercase().collect::<String>()
            }
        })
        .collect()
}

/// Swap two adjacent whitespace separated words, rejoined by single spaces.
pub(crate) fn swap_words(value: &str, rng: &mut dyn RngCore) -> Option<String> {
    let mut words: Vec<&str> = value.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }
    let pos = rng.random_range(0..words.len() - 1);
    words.swap(pos, pos + 1);
    Some(words.join(" "))
}

/// Upper-case the first letter of every whitespace separated word.
pub(crate) fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        at_word_start = !ch.is_alphanumeric();
    }
    out
}

/// Upper-case the first character and lower-case the rest.
pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::run_rng;

    #[test]
    fn empty_values_never_draw() {
        let library = OperatorLibrary::default();
        let mut used = run_rng(42);
        let mut fresh = run_rng(42);
        for field in FieldType::ALL {
            let out = library.pollute(field, "", 1.0, &mut used);
            assert_eq!(out, Polluted::unchanged(""));
        }
        assert_eq!(used.random::<u64>(), fresh.random::<u64>());
    }

    #[test]
    fn zero_trigger_is_identity() {
        let library = OperatorLibrary::default();
        let mut rng = run_rng(7);
        for _ in 0..100 {
            let out = library.pollute(FieldType::Name, "Alexander", 0.0, &mut rng);
            assert!(!out.is_changed());
            assert_eq!(out.value, "Alexander");
        }
    }

    #[test]
    fn word_swap_exchanges_neighbours() {
        let mut rng = run_rng(12);
        for _ in 0..50 {
            let out = swap_words("12 Main  Street", &mut rng).expect("three words");
            assert!(out == "Main 12 Street" || out == "12 Street Main", "{out}");
        }
        assert_eq!(swap_words("Zurich", &mut rng), None);
    }

    #[test]
    fn shared_kinds_reach_every_operator() {
        let library = OperatorLibrary::default();
        let mut rng = run_rng(4);

        let missing = library.apply(
            FieldType::Phone,
            ErrorKind::MissingValue,
            "(415) 555-1234",
            &mut rng,
        );
        assert_eq!(missing.value, "");
        assert_eq!(missing.applied, Some(ErrorKind::MissingValue));

        let swapped = library.apply(FieldType::Name, ErrorKind::WordSwap, "Mary Ann", &mut rng);
        assert_eq!(swapped.value, "Ann Mary");

        let text = library.apply(FieldType::Text, ErrorKind::MissingValue, "hello", &mut rng);
        assert_ne!(text.value, "");
        let phone = library.apply(FieldType::Phone, ErrorKind::WordSwap, "555 1234", &mut rng);
        assert!(!phone.is_changed());
    }

    #[test]
    fn casing_helpers() {
        assert_eq!(title_case("mary-ann o'neil"), "Mary-Ann O'Neil");
        assert_eq!(capitalize("mARY"), "Mary");
        assert_eq!(capitalize(""), "");
    }
}
