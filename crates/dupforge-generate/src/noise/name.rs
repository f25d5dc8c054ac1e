use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use dupforge_core::{ErrorKind, FieldType, NoiseWeights};

use crate::noise::tables::{AliasTable, CULTURAL_VARIANTS, NICKNAMES, lookup};
use crate::noise::{
    ErrorModel, NoiseOperator, OperatorLibrary, TypoModel, capitalize, random_case, title_case,
};

pub fn register(library: &mut OperatorLibrary, weights: &NoiseWeights, typos: &TypoModel) {
    library.register(Box::new(NameOperator {
        model: ErrorModel::new(&weights.name),
        typos: typos.clone(),
    }));
}

/// Person-name pollution: typos, casing, nicknames, initials, cultural
/// spellings and hyphenation.
pub struct NameOperator {
    model: ErrorModel,
    typos: TypoModel,
}

impl NoiseOperator for NameOperator {
    fn field_type(&self) -> FieldType {
        FieldType::Name
    }

    fn model_for(&self, _value: &str) -> &ErrorModel {
        &self.model
    }

    fn apply(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        match kind {
            ErrorKind::Typo => Some(self.typos.introduce(value, rng)),
            ErrorKind::CaseVariation => Some(name_case(value, rng)),
            ErrorKind::NicknameSubstitution => substitute(NICKNAMES, value, rng),
            ErrorKind::Initialization => initial(value, rng),
            ErrorKind::CulturalVariant => substitute(CULTURAL_VARIANTS, value, rng),
            ErrorKind::Hyphenation => hyphenation(value, rng),
            _ => None,
        }
    }
}

fn name_case(value: &str, rng: &mut dyn RngCore) -> String {
    match rng.random_range(0..5) {
        0 => value.to_uppercase(),
        1 => value.to_lowercase(),
        2 => title_case(value),
        3 => capitalize(value),
        _ => random_case(value, rng),
    }
}

fn substitute(table: AliasTable, value: &str, rng: &mut dyn RngCore) -> Option<String> {
    lookup(table, value)
        .or_else(|| lookup(table, &title_case(value)))
        .and_then(|options| options.choose(rng))
        .map(|option| option.to_string())
}

fn initial(value: &str, rng: &mut dyn RngCore) -> Option<String> {
    let first = value.chars().next()?;
    if rng.random_bool(0.6) {
        Some(format!("{first}."))
    } else if rng.random_bool(0.5) {
        Some(first.to_string())
    } else {
        Some(format!("{}.", first.to_lowercase()))
    }
}

fn hyphenation(value: &str, rng: &mut dyn RngCore) -> Option<String> {
    if value.contains('-') {
        if rng.random_bool(0.5) {
            Some(value.replace('-', " "))
        } else {
            Some(value.replace('-', ""))
        }
    } else {
        let parts: Vec<&str> = value.split_whitespace().collect();
        match parts.as_slice() {
            [left, right] => Some(format!("{left}-{right}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::run_rng;

    fn operator() -> NameOperator {
        let weights = NoiseWeights::default();
        NameOperator {
            model: ErrorModel::new(&weights.name),
            typos: TypoModel::new(ErrorModel::new(&weights.text)),
        }
    }

    #[test]
    fn nickname_comes_from_the_table() {
        let operator = operator();
        let mut rng = run_rng(42);
        for _ in 0..20 {
            let out = operator
                .apply(ErrorKind::NicknameSubstitution, "William", &mut rng)
                .expect("nickname");
            assert!(["Bill", "Will", "Billy"].contains(&out.as_str()));
        }
        assert_eq!(
            operator.apply(ErrorKind::NicknameSubstitution, "Zebulon", &mut rng),
            None
        );
    }

    #[test]
    fn initials_keep_the_first_letter() {
        let operator = operator();
        let mut rng = run_rng(3);
        for _ in 0..50 {
            let out = operator
                .apply(ErrorKind::Initialization, "Jane", &mut rng)
                .expect("initial");
            assert!(["J.", "J", "j."].contains(&out.as_str()), "{out}");
        }
    }

    #[test]
    fn hyphenation_toggles() {
        let operator = operator();
        let mut rng = run_rng(9);
        let joined = operator
            .apply(ErrorKind::Hyphenation, "Mary Ann", &mut rng)
            .expect("join");
        assert_eq!(joined, "Mary-Ann");
        let split = operator
            .apply(ErrorKind::Hyphenation, "Mary-Ann", &mut rng)
            .expect("split");
        assert!(split == "Mary Ann" || split == "MaryAnn");
        assert_eq!(operator.apply(ErrorKind::Hyphenation, "Mary", &mut rng), None);
    }

    #[test]
    fn one_character_names_survive_every_kind() {
        let operator = operator();
        let mut rng = run_rng(11);
        let kinds: Vec<ErrorKind> = operator.model.kinds().collect();
        for kind in kinds {
            for _ in 0..20 {
                let _ = operator.apply(kind, "A", &mut rng);
                let out = operator.pollute("A", 1.0, &mut rng);
                assert!(!out.value.is_empty());
            }
        }
    }
}
