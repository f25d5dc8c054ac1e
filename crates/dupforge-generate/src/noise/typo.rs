use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use dupforge_core::{ErrorKind, FieldType};

use crate::noise::selector::ErrorModel;
use crate::noise::tables::{OCR_CONFUSIONS, PHONETIC_SWAPS, keyboard_neighbours};
use crate::noise::NoiseOperator;

/// Keyboard and scanner typo model for free text.
///
/// The text is lower-cased first, then receives between one and
/// `min(3, max(1, len / 5))` edits, each of a kind drawn from the text
/// table. Editing stops once fewer than two characters remain.
#[derive(Debug, Clone)]
pub struct TypoModel {
    model: ErrorModel,
}

impl TypoModel {
    pub fn new(model: ErrorModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ErrorModel {
        &self.model
    }

    pub fn introduce(&self, text: &str, rng: &mut dyn RngCore) -> String {
        self.introduce_with(None, text, rng)
    }

    /// Same as [`TypoModel::introduce`] with the first edit forced to `first`.
    pub fn introduce_with(
        &self,
        first: Option<ErrorKind>,
        text: &str,
        rng: &mut dyn RngCore,
    ) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut chars: Vec<char> = text.to_lowercase().chars().collect();
        let max_edits = (chars.len() / 5).clamp(1, 3);
        let edits = rng.random_range(1..=max_edits);

        for index in 0..edits {
            if chars.len() < 2 {
                break;
            }
            let forced = if index == 0 { first } else { None };
            let Some(kind) = forced.or_else(|| self.model.choose(rng)) else {
                break;
            };
            chars = edit(kind, chars, rng);
        }

        chars.into_iter().collect()
    }
}

/// One character-level edit at a random position.
fn edit(kind: ErrorKind, mut chars: Vec<char>, rng: &mut dyn RngCore) -> Vec<char> {
    let pos = rng.random_range(0..chars.len());
    let current = chars[pos];

    match kind {
        ErrorKind::KeyboardAdjacent => {
            if let Some(neighbour) = keyboard_neighbours(current)
                .and_then(|keys| keys.chars().collect::<Vec<_>>().choose(rng).copied())
            {
                chars[pos] = neighbour;
            }
        }
        ErrorKind::Transposition => {
            if pos + 1 < chars.len() {
                chars.swap(pos, pos + 1);
            }
        }
        ErrorKind::Omission => {
            if chars.len() > 3 {
                chars.remove(pos);
            }
        }
        ErrorKind::Insertion => {
            let mut options = vec![current];
            if let Some(keys) = keyboard_neighbours(current) {
                options.extend(keys.chars());
            }
            let inserted = options.choose(rng).copied().unwrap_or(current);
            chars.insert(pos, inserted);
        }
        ErrorKind::OcrConfusion => {
            return ocr_confusion(chars, pos, rng);
        }
        ErrorKind::Phonetic => {
            let text: String = chars.iter().collect();
            if let Some((from, to)) = PHONETIC_SWAPS.iter().find(|(from, _)| text.contains(from)) {
                return text.replacen(from, to, 1).chars().collect();
            }
        }
        _ => {}
    }

    chars
}

fn ocr_confusion(chars: Vec<char>, pos: usize, rng: &mut dyn RngCore) -> Vec<char> {
    let pair: String = chars.iter().skip(pos).take(2).collect();
    let single = chars[pos].to_string();
    let hit = OCR_CONFUSIONS
        .iter()
        .find(|(glyph, _)| glyph.chars().count() == 2 && **glyph == pair)
        .map(|entry| (entry, 2))
        .or_else(|| {
            OCR_CONFUSIONS
                .iter()
                .find(|(glyph, _)| **glyph == single)
                .map(|entry| (entry, 1))
        });

    let Some(((_, replacements), width)) = hit else {
        return chars;
    };
    let Some(replacement) = replacements.choose(rng) else {
        return chars;
    };

    let mut out: Vec<char> = chars[..pos].to_vec();
    out.extend(replacement.chars());
    out.extend_from_slice(&chars[pos + width..]);
    out
}

/// Operator for free-text values; every kind is a typo edit.
pub struct TextOperator {
    typos: TypoModel,
}

impl TextOperator {
    pub fn new(typos: TypoModel) -> Self {
        Self { typos }
    }
}

impl NoiseOperator for TextOperator {
    fn field_type(&self) -> FieldType {
        FieldType::Text
    }

    fn model_for(&self, _value: &str) -> &ErrorModel {
        self.typos.model()
    }

    fn apply(&self, kind: ErrorKind, value: &str, rng: &mut dyn RngCore) -> Option<String> {
        if !kind.applies_to(FieldType::Text) || value.is_empty() {
            return None;
        }
        Some(self.typos.introduce_with(Some(kind), value, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::run_rng;
    use dupforge_core::{NoiseWeights, WeightedKind};

    fn model(kind: ErrorKind) -> TypoModel {
        TypoModel::new(ErrorModel::new(&[WeightedKind::new(kind, 1.0)]))
    }

    #[test]
    fn transposition_keeps_the_letters() {
        let typos = model(ErrorKind::Transposition);
        let mut rng = run_rng(42);
        for _ in 0..50 {
            let out = typos.introduce("abcd", &mut rng);
            let mut sorted: Vec<char> = out.chars().collect();
            sorted.sort_unstable();
            assert_eq!(sorted, vec!['a', 'b', 'c', 'd']);
        }
    }

    #[test]
    fn omission_never_shrinks_short_words() {
        let typos = model(ErrorKind::Omission);
        let mut rng = run_rng(1);
        for _ in 0..50 {
            assert_eq!(typos.introduce("abc", &mut rng), "abc");
        }
    }

    #[test]
    fn ocr_reads_rn_as_m() {
        let typos = model(ErrorKind::OcrConfusion);
        let mut rng = run_rng(3);
        let mut saw_m = false;
        for _ in 0..200 {
            let out = typos.introduce("rn", &mut rng);
            saw_m |= out == "m";
        }
        assert!(saw_m);
    }

    #[test]
    fn phonetic_replaces_first_match_once() {
        let typos = model(ErrorKind::Phonetic);
        let mut rng = run_rng(5);
        assert_eq!(typos.introduce("phph", &mut rng), "fph");
    }

    #[test]
    fn single_characters_only_change_case() {
        let typos = TypoModel::new(ErrorModel::new(&NoiseWeights::default().text));
        let mut rng = run_rng(8);
        assert_eq!(typos.introduce("Q", &mut rng), "q");
        assert_eq!(typos.introduce("", &mut rng), "");
    }
}
