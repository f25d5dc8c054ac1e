use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Field families that own an error-model table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text; the character-level typo model.
    Text,
    Name,
    Email,
    Phone,
    Address,
    /// City and region values, locale aware.
    Locality,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::Name,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Address,
        FieldType::Locality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Name => "name",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Address => "address",
            FieldType::Locality => "locality",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named category of corruption applied by a noise operator.
///
/// Kinds are scoped per field type (see [`ErrorKind::applies_to`]); they
/// drive the error-model selector and are counted in run reports but never
/// written to a dataset. The text table only holds character edits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    KeyboardAdjacent,
    Transposition,
    Omission,
    Insertion,
    OcrConfusion,
    Phonetic,
    /// Delegates to the text typo model.
    Typo,
    CaseVariation,
    NicknameSubstitution,
    Initialization,
    CulturalVariant,
    Hyphenation,
    TypoLocal,
    TypoDomain,
    DomainMistake,
    GmailDotVariation,
    GmailPlusAlias,
    NumberVariation,
    FormatVariation,
    DigitTransposition,
    DigitSubstitution,
    PartialNumber,
    ExtraDigits,
    SpacingErrors,
    AbbreviationVariation,
    WhitespaceCorruption,
    HouseNumber,
    DirectionFlip,
    DiacriticFolding,
    AliasSubstitution,
    /// Swap two adjacent words.
    WordSwap,
    /// Blank the value; optional fields become absent.
    MissingValue,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::KeyboardAdjacent => "keyboard_adjacent",
            ErrorKind::Transposition => "transposition",
            ErrorKind::Omission => "omission",
            ErrorKind::Insertion => "insertion",
            ErrorKind::OcrConfusion => "ocr_confusion",
            ErrorKind::Phonetic => "phonetic",
            ErrorKind::Typo => "typo",
            ErrorKind::CaseVariation => "case_variation",
            ErrorKind::NicknameSubstitution => "nickname_substitution",
            ErrorKind::Initialization => "initialization",
            ErrorKind::CulturalVariant => "cultural_variant",
            ErrorKind::Hyphenation => "hyphenation",
            ErrorKind::TypoLocal => "typo_local",
            ErrorKind::TypoDomain => "typo_domain",
            ErrorKind::DomainMistake => "domain_mistake",
            ErrorKind::GmailDotVariation => "gmail_dot_variation",
            ErrorKind::GmailPlusAlias => "gmail_plus_alias",
            ErrorKind::NumberVariation => "number_variation",
            ErrorKind::FormatVariation => "format_variation",
            ErrorKind::DigitTransposition => "digit_transposition",
            ErrorKind::DigitSubstitution => "digit_substitution",
            ErrorKind::PartialNumber => "partial_number",
            ErrorKind::ExtraDigits => "extra_digits",
            ErrorKind::SpacingErrors => "spacing_errors",
            ErrorKind::AbbreviationVariation => "abbreviation_variation",
            ErrorKind::WhitespaceCorruption => "whitespace_corruption",
            ErrorKind::HouseNumber => "house_number",
            ErrorKind::DirectionFlip => "direction_flip",
            ErrorKind::DiacriticFolding => "diacritic_folding",
            ErrorKind::AliasSubstitution => "alias_substitution",
            ErrorKind::WordSwap => "word_swap",
            ErrorKind::MissingValue => "missing_value",
        }
    }

    /// Whether the operator for `field` knows how to apply this kind.
    pub fn applies_to(self, field: FieldType) -> bool {
        match self {
            ErrorKind::KeyboardAdjacent
            | ErrorKind::Transposition
            | ErrorKind::Omission
            | ErrorKind::Insertion
            | ErrorKind::OcrConfusion
            | ErrorKind::Phonetic => field == FieldType::Text,
            ErrorKind::Typo => matches!(
                field,
                FieldType::Name | FieldType::Address | FieldType::Locality
            ),
            ErrorKind::CaseVariation => matches!(
                field,
                FieldType::Name | FieldType::Email | FieldType::Address | FieldType::Locality
            ),
            ErrorKind::NicknameSubstitution
            | ErrorKind::Initialization
            | ErrorKind::CulturalVariant
            | ErrorKind::Hyphenation => field == FieldType::Name,
            ErrorKind::TypoLocal
            | ErrorKind::TypoDomain
            | ErrorKind::DomainMistake
            | ErrorKind::GmailDotVariation
            | ErrorKind::GmailPlusAlias
            | ErrorKind::NumberVariation => field == FieldType::Email,
            ErrorKind::FormatVariation
            | ErrorKind::DigitTransposition
            | ErrorKind::DigitSubstitution
            | ErrorKind::PartialNumber
            | ErrorKind::ExtraDigits
            | ErrorKind::SpacingErrors => field == FieldType::Phone,
            ErrorKind::AbbreviationVariation
            | ErrorKind::WhitespaceCorruption
            | ErrorKind::HouseNumber
            | ErrorKind::DirectionFlip => field == FieldType::Address,
            ErrorKind::DiacriticFolding | ErrorKind::AliasSubstitution => {
                field == FieldType::Locality
            }
            ErrorKind::WordSwap => matches!(
                field,
                FieldType::Name | FieldType::Address | FieldType::Locality
            ),
            ErrorKind::MissingValue => field != FieldType::Text,
        }
    }

    /// Kinds that keep a tag-tolerant mailbox identical.
    pub fn is_mailbox_neutral(self) -> bool {
        matches!(
            self,
            ErrorKind::GmailDotVariation | ErrorKind::GmailPlusAlias | ErrorKind::CaseVariation
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_as_str() {
        let kinds = [
            ErrorKind::KeyboardAdjacent,
            ErrorKind::GmailPlusAlias,
            ErrorKind::AbbreviationVariation,
            ErrorKind::DiacriticFolding,
            ErrorKind::WordSwap,
            ErrorKind::MissingValue,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).expect("serialize kind");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn every_kind_belongs_to_some_field() {
        let kinds = [
            ErrorKind::Typo,
            ErrorKind::Hyphenation,
            ErrorKind::NumberVariation,
            ErrorKind::SpacingErrors,
            ErrorKind::HouseNumber,
            ErrorKind::AliasSubstitution,
        ];
        for kind in kinds {
            assert!(FieldType::ALL.iter().any(|field| kind.applies_to(*field)));
        }
        assert!(!ErrorKind::FormatVariation.applies_to(FieldType::Email));
    }

    #[test]
    fn generic_kinds_stay_out_of_the_character_table() {
        assert!(ErrorKind::MissingValue.applies_to(FieldType::Phone));
        assert!(ErrorKind::MissingValue.applies_to(FieldType::Email));
        assert!(!ErrorKind::MissingValue.applies_to(FieldType::Text));
        assert!(ErrorKind::WordSwap.applies_to(FieldType::Address));
        assert!(!ErrorKind::WordSwap.applies_to(FieldType::Phone));
        assert!(!ErrorKind::WordSwap.applies_to(FieldType::Text));
    }
}
