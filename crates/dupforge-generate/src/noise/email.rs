use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use dupforge_core::{ErrorKind, FieldType, NoiseWeights};

use crate::noise::tables::{DOMAIN_MISTAKES, PLUS_TAG_WORDS, lookup};
use crate::noise::{ErrorModel, NoiseOperator, OperatorLibrary, TypoModel, random_case};

pub fn register(
    library: &mut OperatorLibrary,
    weights: &NoiseWeights,
    typos: &TypoModel,
    tag_tolerant_domains: &[String],
) {
    library.register(Box::new(EmailOperator {
        tag_tolerant: ErrorModel::new(&weights.email_tag_tolerant),
        standard: ErrorModel::new(&weights.email_standard),
        tag_tolerant_domains: tag_tolerant_domains
            .iter()
            .map(|domain| domain.to_lowercase())
            .collect(),
        typos: typos.clone(),
    }));
}

/// Email pollution with separate tables for tag-tolerant providers, where
/// dots and `+tag` suffixes reach the same mailbox.
pub struct EmailOperator {
    tag_tolerant: ErrorModel,
    standard: ErrorModel,
    tag_tolerant_domains: Vec<String>,
    typos: TypoModel,
}

impl EmailOperator {
    fn is_tag_tolerant(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.tag_tolerant_domains
            .iter()
            .any(|candidate| *candidate == domain)
    }
}

impl NoiseOperator for EmailOperator {
    fn field_type(&self) -> FieldType {
        FieldType::Email
    }

    fn model_for(&self, value: &str) -> &ErrorModel {
        match value.split_once('@') {
            Some((_, domain)) if self.is_tag_tolerant(domain) => &self.tag_tolerant,
            _ => &self.standard,
        }
    }

    fn apply(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String> {
        let (local, domain) = match value.split_once('@') {
            Some((local, domain)) => (local, Some(domain)),
            None => (value, None),
        };
        let tolerant = domain.is_some_and(|domain| self.is_tag_tolerant(domain));

        let (local, domain) = match kind {
            ErrorKind::TypoLocal => (self.typos.introduce(local, rng), domain.map(str::to_string)),
            ErrorKind::TypoDomain => {
                let domain = domain?;
                (local.to_string(), Some(self.typos.introduce(domain, rng)))
            }
            ErrorKind::DomainMistake => {
                let mistakes = lookup(DOMAIN_MISTAKES, &domain?.to_lowercase())?;
                let mistake = mistakes.choose(rng)?;
                (local.to_string(), Some(mistake.to_string()))
            }
            ErrorKind::GmailDotVariation if tolerant => {
                (dot_variation(local, rng)?, domain.map(str::to_string))
            }
            ErrorKind::GmailPlusAlias if tolerant => {
                (plus_alias(local, rng), domain.map(str::to_string))
            }
            ErrorKind::CaseVariation => (random_case(local, rng), domain.map(str::to_string)),
            ErrorKind::NumberVariation => (number_variation(local, rng), domain.map(str::to_string)),
            _ => return None,
        };

        Some(match domain {
            Some(domain) => format!("{local}@{domain}"),
            None => local,
        })
    }
}

/// Insert up to two dots into a dotless local part, or drop some dots.
fn dot_variation(local: &str, rng: &mut dyn RngCore) -> Option<String> {
    let mut chars: Vec<char> = local.chars().collect();
    let dots = chars.iter().filter(|ch| **ch == '.').count();

    if dots == 0 {
        if chars.len() <= 3 {
            return None;
        }
        let amount = 2.min(chars.len() - 2);
        let mut positions: Vec<usize> = rand::seq::index::sample(rng, chars.len() - 1, amount)
            .into_iter()
            .map(|index| index + 1)
            .collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        for pos in positions {
            chars.insert(pos, '.');
        }
        return Some(chars.into_iter().collect());
    }

    let remove = rng.random_range(1..=dots);
    Some(local.replacen('.', "", remove))
}

/// Replace any existing tag with exactly one `+tag`.
fn plus_alias(local: &str, rng: &mut dyn RngCore) -> String {
    let base = local.split('+').next().unwrap_or(local);
    let tag = match rng.random_range(0..PLUS_TAG_WORDS.len() + 2) {
        index if index < PLUS_TAG_WORDS.len() => PLUS_TAG_WORDS[index].to_string(),
        index if index == PLUS_TAG_WORDS.len() => rng.random_range(1..=999).to_string(),
        _ => rng.random_range(2000..=2024).to_string(),
    };
    format!("{base}+{tag}")
}

fn number_variation(local: &str, rng: &mut dyn RngCore) -> String {
    if local.chars().any(|ch| ch.is_ascii_digit()) {
        local
            .chars()
            .map(|ch| {
                if ch.is_ascii_digit() && rng.random_bool(0.5) {
                    char::from(b'0' + rng.random_range(0..10u8))
                } else {
                    ch
                }
            })
            .collect()
    } else {
        format!("{local}{}", rng.random_range(1..=999))
    }
}

/// Mailbox identity on tag-tolerant providers: lower-cased, without dots
/// and without the `+tag` suffix.
pub fn canonical_mailbox(email: &str) -> String {
    let (local, domain) = email.split_once('@').unwrap_or((email, ""));
    let base = local.split('+').next().unwrap_or(local);
    format!("{}@{}", base.replace('.', "").to_lowercase(), domain.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::run_rng;

    #[test]
    fn dot_variation_on_dotless_local_inserts_dots() {
        let mut rng = run_rng(42);
        for _ in 0..50 {
            let out = dot_variation("johndoe", &mut rng).expect("dots");
            assert_eq!(out.replace('.', ""), "johndoe");
            assert_eq!(out.matches('.').count(), 2);
            assert!(!out.starts_with('.') && !out.ends_with('.'));
        }
        assert_eq!(dot_variation("abc", &mut rng), None);
    }

    #[test]
    fn tag_tolerance_ignores_domain_case() {
        let weights = NoiseWeights::default();
        let typos = TypoModel::new(ErrorModel::new(&weights.text));
        let mut library = OperatorLibrary::new();
        register(&mut library, &weights, &typos, &["Gmail.com".to_string()]);
        let mut rng = run_rng(3);

        let tolerant = library
            .apply(
                FieldType::Email,
                ErrorKind::GmailPlusAlias,
                "John.Doe@GMAIL.com",
                &mut rng,
            )
            .value;
        assert!(tolerant.starts_with("John.Doe+"), "{tolerant}");
        assert!(tolerant.ends_with("@GMAIL.com"), "{tolerant}");
        let standard = library.apply(
            FieldType::Email,
            ErrorKind::GmailPlusAlias,
            "john@example.com",
            &mut rng,
        );
        assert!(!standard.is_changed());
    }

    #[test]
    fn plus_alias_replaces_existing_tag() {
        let mut rng = run_rng(7);
        let out = plus_alias("jane+old", &mut rng);
        assert!(out.starts_with("jane+"));
        assert_eq!(out.matches('+').count(), 1);
        assert!(!out.contains("old"));
    }

    #[test]
    fn number_variation_appends_when_no_digits() {
        let mut rng = run_rng(1);
        let out = number_variation("jane", &mut rng);
        let suffix: u32 = out.trim_start_matches("jane").parse().expect("numeric suffix");
        assert!((1..=999).contains(&suffix));
    }

    #[test]
    fn canonical_mailbox_ignores_dots_tags_and_case() {
        assert_eq!(
            canonical_mailbox("John.Doe+shop@Gmail.com"),
            canonical_mailbox("johndoe@gmail.com")
        );
    }
}
