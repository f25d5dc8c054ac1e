use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use dupforge_core::{ErrorKind, FieldType, NoiseWeights, ProviderLocale};

use crate::noise::tables::{
    AliasTable, SWISS_LOCALITY_ALIASES, US_LOCALITY_ALIASES, diacritic_fold, lookup,
    lookup_ignore_case,
};
use crate::noise::{ErrorModel, NoiseOperator, OperatorLibrary, TypoModel, random_case, title_case};

pub fn register(
    library: &mut OperatorLibrary,
    weights: &NoiseWeights,
    typos: &TypoModel,
    locale: ProviderLocale,
) {
    library.register(Box::new(LocalityOperator {
        model: ErrorModel::new(&weights.locality),
        typos: typos.clone(),
        aliases: aliases_for(locale),
    }));
}

pub fn aliases_for(locale: ProviderLocale) -> AliasTable {
    match locale {
        ProviderLocale::EnUs => US_LOCALITY_ALIASES,
        ProviderLocale::DeCh => SWISS_LOCALITY_ALIASES,
    }
}

/// City and region pollution aware of the provider's alias table.
pub struct LocalityOperator {
    model: ErrorModel,
    typos: TypoModel,
    aliases: AliasTable,
}

impl NoiseOperator for LocalityOperator {
    fn field_type(&self) -> FieldType {
        FieldType::Locality
    }

    fn model_for(&self, _value: &str) -> &ErrorModel {
        &self.model
    }

    fn apply(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        match kind {
            ErrorKind::AliasSubstitution => substitute_alias(self.aliases, value, rng),
            ErrorKind::DiacriticFolding => fold_diacritics(value, rng),
            ErrorKind::Typo => Some(self.typos.introduce(value, rng)),
            ErrorKind::CaseVariation => Some(match rng.random_range(0..4) {
                0 => value.to_uppercase(),
                1 => value.to_lowercase(),
                2 => title_case(value),
                _ => random_case(value, rng),
            }),
            _ => None,
        }
    }
}

fn substitute_alias(table: AliasTable, value: &str, rng: &mut dyn RngCore) -> Option<String> {
    let options: Vec<&str> = lookup(table, value)
        .or_else(|| lookup_ignore_case(table, value))?
        .iter()
        .copied()
        .filter(|alias| *alias != value)
        .collect();
    options.choose(rng).map(|alias| alias.to_string())
}

/// Fold each accented occurrence with probability one half; at least one
/// occurrence is folded when any exists.
pub fn fold_diacritics(value: &str, rng: &mut dyn RngCore) -> Option<String> {
    let chars: Vec<char> = value.chars().collect();
    let candidates: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, ch)| diacritic_fold(**ch).is_some())
        .map(|(index, _)| index)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let mut folded: Vec<bool> = candidates.iter().map(|_| rng.random_bool(0.5)).collect();
    if !folded.iter().any(|flag| *flag) {
        let forced = rng.random_range(0..folded.len());
        folded[forced] = true;
    }

    let mut fold_at = vec![false; chars.len()];
    for (position, fold) in candidates.iter().zip(folded) {
        fold_at[*position] = fold;
    }

    let mut out = String::with_capacity(value.len() + candidates.len());
    for (ch, fold) in chars.iter().zip(fold_at) {
        match diacritic_fold(*ch) {
            Some(replacement) if fold => out.push_str(replacement),
            _ => out.push(*ch),
        }
    }
    Some(out)
}
