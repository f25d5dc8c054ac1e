use dupforge_core::{ErrorKind, FieldType, GenerationConfig, ProviderLocale, WeightedKind};
use dupforge_generate::noise::OperatorLibrary;
use dupforge_generate::noise::email::canonical_mailbox;
use dupforge_generate::noise::phone::{
    PHONE_PUNCTUATION, extract_digits, format_layouts, swiss_layouts,
};
use dupforge_generate::rng::run_rng;
use dupforge_generate::{ClusterGenerator, provider_for};

#[test]
fn format_variation_produces_a_known_layout() {
    let library = OperatorLibrary::default();
    let layouts = format_layouts("4155551234");
    let mut rng = run_rng(42);
    for _ in 0..100 {
        let out = library.apply(
            FieldType::Phone,
            ErrorKind::FormatVariation,
            "4155551234",
            &mut rng,
        );
        assert!(layouts.contains(&out.value), "unexpected layout {}", out.value);
        assert_eq!(extract_digits(&out.value), "4155551234");
    }
}

#[test]
fn gmail_plus_alias_keeps_the_mailbox() {
    let library = OperatorLibrary::default();
    let mut rng = run_rng(42);
    for _ in 0..50 {
        let out = library.apply(
            FieldType::Email,
            ErrorKind::GmailPlusAlias,
            "john.doe@gmail.com",
            &mut rng,
        );
        assert_eq!(out.applied, Some(ErrorKind::GmailPlusAlias));
        assert!(out.value.starts_with("john.doe+"), "{}", out.value);
        assert!(out.value.ends_with("@gmail.com"));
        assert_eq!(
            canonical_mailbox(&out.value),
            canonical_mailbox("john.doe@gmail.com")
        );
    }
}

#[test]
fn gmail_kinds_do_not_touch_standard_domains() {
    let library = OperatorLibrary::default();
    let mut rng = run_rng(3);
    for kind in [ErrorKind::GmailPlusAlias, ErrorKind::GmailDotVariation] {
        let out = library.apply(FieldType::Email, kind, "john.doe@yahoo.com", &mut rng);
        assert!(!out.is_changed());
        assert_eq!(out.value, "john.doe@yahoo.com");
    }
}

#[test]
fn street_suffix_is_abbreviated() {
    let library = OperatorLibrary::default();
    let mut rng = run_rng(42);
    for _ in 0..50 {
        let out = library.apply(
            FieldType::Address,
            ErrorKind::AbbreviationVariation,
            "123 Main Street",
            &mut rng,
        );
        assert!(out.value.starts_with("123 Main "), "{}", out.value);
        let suffix = out.value.trim_start_matches("123 Main ");
        assert!(
            ["St", "St.", "Str", "Strt", "street"].contains(&suffix),
            "unexpected suffix {suffix}"
        );
    }
}

#[test]
fn neutral_kinds_keep_tag_tolerant_mailboxes_equal() {
    let library = OperatorLibrary::default();
    let mut rng = run_rng(11);
    let inputs = ["john.doe@gmail.com", "janesmith42@googlemail.com", "a.b.c.d@gmail.com"];
    let mut neutral = 0;
    for _ in 0..2_000 {
        for input in inputs {
            let out = library.pollute(FieldType::Email, input, 1.0, &mut rng);
            if let Some(kind) = out.applied {
                if kind.is_mailbox_neutral() {
                    neutral += 1;
                    assert_eq!(canonical_mailbox(&out.value), canonical_mailbox(input));
                }
            }
        }
    }
    assert!(neutral > 0);
}

#[test]
fn phones_only_gain_letters_through_digit_substitution() {
    let library = OperatorLibrary::default();
    let mut rng = run_rng(5);
    let provider = provider_for(dupforge_core::ProviderLocale::EnUs);
    let presence = dupforge_core::PresenceProbabilities {
        phone: 1.0,
        ..Default::default()
    };
    for _ in 0..3_000 {
        let phone = provider
            .person(&presence, &mut rng)
            .phone
            .expect("phone present");
        let out = library.pollute(FieldType::Phone, &phone, 1.0, &mut rng);
        let has_letters = out.value.chars().any(|ch| ch.is_alphabetic());
        if has_letters {
            assert_eq!(out.applied, Some(ErrorKind::DigitSubstitution), "{}", out.value);
        }
        assert!(
            out.value
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || PHONE_PUNCTUATION.contains(ch)),
            "unexpected character in {}",
            out.value
        );
    }
}

#[test]
fn trigger_rate_converges() {
    let mut config = GenerationConfig::default();
    config.noise.phone = vec![WeightedKind::new(ErrorKind::SpacingErrors, 1.0)];
    let library = OperatorLibrary::from_config(&config);
    let mut rng = run_rng(42);
    let draws = 10_000;
    let changed = (0..draws)
        .filter(|_| {
            library
                .pollute(FieldType::Phone, "(415) 555-1234", 0.7, &mut rng)
                .is_changed()
        })
        .count();
    let rate = changed as f64 / draws as f64;
    assert!((rate - 0.7).abs() <= 0.02, "rate {rate}");
}

#[test]
fn duplicate_rate_converges() {
    let config = GenerationConfig::default();
    let library = OperatorLibrary::from_config(&config);
    let generator = ClusterGenerator::new(&config, &library);
    let mut rng = run_rng(42);
    let draws = 10_000;
    let mut duplicated = 0;
    for _ in 0..draws {
        let count = generator.duplicate_count(&mut rng);
        assert!(count <= config.max_dup_accounts);
        if count > 0 {
            duplicated += 1;
        }
    }
    let rate = duplicated as f64 / draws as f64;
    assert!((rate - config.dup_rate).abs() <= 0.02, "rate {rate}");
}

#[test]
fn degenerate_values_are_safe() {
    let config = GenerationConfig::default();
    let library = OperatorLibrary::from_config(&config);
    let mut rng = run_rng(9);
    for (_, field, table) in config.noise.tables() {
        for entry in table {
            let empty = library.apply(field, entry.kind, "", &mut rng);
            assert_eq!(empty.value, "");
            assert!(!empty.is_changed());
            for value in ["a", "7", "@", " "] {
                let out = library.apply(field, entry.kind, value, &mut rng);
                if !out.is_changed() {
                    assert_eq!(out.value, value);
                }
            }
        }
        let skipped = library.pollute(field, "", 1.0, &mut rng);
        assert_eq!(skipped.value, "");
    }
}

#[test]
fn short_phones_are_left_alone() {
    let library = OperatorLibrary::default();
    let mut rng = run_rng(1);
    for _ in 0..100 {
        let out = library.pollute(FieldType::Phone, "555-1234", 1.0, &mut rng);
        assert!(!out.is_changed());
        assert_eq!(out.value, "555-1234");
    }
}

#[test]
fn swiss_streets_are_abbreviated() {
    let library = OperatorLibrary::with_defaults(ProviderLocale::DeCh);
    let mut rng = run_rng(42);
    let cases = [
        ("Bahnhofstrasse 12", &["Bahnhofstr. 12", "Bahnhofstr 12"][..]),
        ("Kirchweg 4", &["Kirchwg. 4"][..]),
        ("Vicolo Roma 3", &["Vic. Roma 3", "V.lo Roma 3"][..]),
        ("Hauptstrasse 1", &["Hauptstr. 1", "Hauptstr 1"][..]),
    ];
    for (street, expected) in cases {
        for _ in 0..10 {
            let out = library.apply(
                FieldType::Address,
                ErrorKind::AbbreviationVariation,
                street,
                &mut rng,
            );
            assert_eq!(out.applied, Some(ErrorKind::AbbreviationVariation), "{street}");
            assert!(expected.contains(&out.value.as_str()), "{street} -> {}", out.value);
        }
    }
}

#[test]
fn swiss_phone_layouts_stay_swiss() {
    let library = OperatorLibrary::with_defaults(ProviderLocale::DeCh);
    let layouts = swiss_layouts("791234567");
    let mut rng = run_rng(42);
    for _ in 0..100 {
        let out = library.apply(
            FieldType::Phone,
            ErrorKind::FormatVariation,
            "+41 79 123 45 67",
            &mut rng,
        );
        assert!(layouts.contains(&out.value), "unexpected layout {}", out.value);
        assert!(!out.value.starts_with("+1"));
    }
}
