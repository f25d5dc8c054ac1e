//! Base-value providers for canonical entities.

use rand::{Rng, RngCore};

use dupforge_core::{PersonFields, PresenceProbabilities, ProviderLocale};

pub mod swiss;
pub mod us;

pub use swiss::SwissProvider;
pub use us::UsProvider;

/// Source of clean person values.
///
/// Optional fields are decided here, once per entity, from the presence
/// probabilities; pollution never adds or removes a field.
pub trait BaseValueProvider {
    fn locale(&self) -> ProviderLocale;

    fn person(&self, presence: &PresenceProbabilities, rng: &mut dyn RngCore) -> PersonFields;
}

pub fn provider_for(locale: ProviderLocale) -> Box<dyn BaseValueProvider> {
    match locale {
        ProviderLocale::EnUs => Box::new(UsProvider),
        ProviderLocale::DeCh => Box::new(SwissProvider),
    }
}

pub(crate) fn present(probability: f64, rng: &mut dyn RngCore) -> bool {
    probability > 0.0 && rng.random::<f64>() < probability
}
