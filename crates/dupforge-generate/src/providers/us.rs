use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetSuffix, ZipCode};
use fake::faker::name::en::{FirstName, LastName};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use dupforge_core::{PersonFields, PresenceProbabilities, ProviderLocale};

use crate::providers::{BaseValueProvider, present};
use crate::rng::weighted_pick;

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
];

const COMMON_SUFFIXES: &[&str] = &[
    "Street",
    "Avenue",
    "Drive",
    "Road",
    "Boulevard",
    "Lane",
    "Court",
    "Place",
    "Circle",
    "Way",
];

const DIRECTIONS: &[&str] = &["N", "S", "E", "W", "NE", "NW", "SE", "SW"];

const AREA_CODES: &[u16] = &[
    212, 646, 917, 347, 213, 323, 424, 747, 312, 773, 872, 415, 628, 202, 305, 786, 404, 678,
    470, 617, 857, 201, 203, 206, 207, 208, 209, 210, 214, 215, 216, 217, 218, 219, 224, 225,
    228, 229, 231, 234, 239, 240, 248, 251, 252, 253, 254, 256, 260, 262, 267, 269, 270, 276,
    281, 301, 302, 303, 304, 307, 308, 309, 310, 313, 314, 315, 316, 317, 318, 319, 320, 321,
    330, 331, 334, 336, 337, 339, 341, 351, 352, 360, 361, 364, 365, 386, 401, 402, 403, 405,
    406, 407, 408, 409, 410, 412, 413, 414, 417, 419, 423, 425, 430, 432, 434, 435, 440, 443,
    445, 458, 463, 469, 475, 478, 479, 480, 484, 501, 502, 503, 504, 505, 507, 508, 509, 510,
    512, 513, 515, 516, 517, 518, 520, 530, 540, 541, 551, 559, 561, 562, 563, 564, 567, 570,
    571, 573, 574, 575, 580, 585, 586, 601, 602, 603, 605, 606, 607, 608, 609, 610, 612, 614,
    615, 616, 618, 619, 620, 623, 626, 630, 631, 636, 641, 650, 651, 657, 660, 661, 662, 667,
    669, 682, 701, 702, 703, 704, 706, 707, 708, 712, 713, 714, 715, 716, 717, 718, 719, 720,
    724, 725, 727, 731, 732, 734, 737, 740, 743, 754, 757, 760, 762, 763, 765, 770, 772, 774,
    775, 779, 781, 785, 787, 801, 802, 803, 804, 805, 806, 808, 810, 812, 813, 814, 815, 816,
    817, 818, 828, 830, 831, 832, 835, 843, 845, 847, 848, 850, 856, 858, 859, 860, 862, 863,
    864, 865, 870, 878, 901, 903, 904, 906, 907, 908, 909, 910, 912, 913, 914, 915, 916, 918,
    919, 920, 925, 928, 929, 930, 931, 934, 936, 937, 940, 941, 947, 949, 951, 952, 954, 956,
    959, 970, 971, 972, 973, 978, 979, 980, 984, 985, 989,
];

/// US people built on the `fake` English locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsProvider;

impl BaseValueProvider for UsProvider {
    fn locale(&self) -> ProviderLocale {
        ProviderLocale::EnUs
    }

    fn person(&self, presence: &PresenceProbabilities, rng: &mut dyn RngCore) -> PersonFields {
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let email = present(presence.email, rng).then(|| email_for(&first_name, &last_name, rng));
        let phone = present(presence.phone, rng).then(|| phone_number(rng));
        let address_1 = street_line(rng);
        let address_2 =
            present(presence.address_2, rng).then(|| format!("Apt {}", rng.random_range(1..=999)));
        let city: String = CityName().fake_with_rng(rng);
        let state: String = StateAbbr().fake_with_rng(rng);
        let postcode = present(presence.postcode, rng).then(|| ZipCode().fake_with_rng(rng));

        PersonFields {
            first_name,
            last_name,
            email,
            phone,
            address_1,
            address_2,
            city,
            state,
            postcode,
            country_code: "US".to_string(),
        }
    }
}

fn ascii_letters(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphabetic)
        .flat_map(|ch| ch.to_lowercase())
        .collect()
}

/// Local part from one of the common name patterns, sometimes with a number.
pub fn email_for(first_name: &str, last_name: &str, rng: &mut dyn RngCore) -> String {
    let first = ascii_letters(first_name);
    let last = ascii_letters(last_name);
    let first = if first.is_empty() { "user".to_string() } else { first };
    let last = if last.is_empty() { "mail".to_string() } else { last };
    let first_initial = &first[..1];
    let last_initial = &last[..1];

    let mut local = match rng.random_range(0..6) {
        0 => format!("{first}.{last}"),
        1 => format!("{first}{last}"),
        2 => format!("{first_initial}.{last}"),
        3 => format!("{first}.{last_initial}"),
        4 => format!("{first}_{last}"),
        _ => format!("{last}.{first}"),
    };
    if rng.random_bool(0.4) {
        let number = match rng.random_range(0..3) {
            0 => rng.random_range(1..=99),
            1 => rng.random_range(1980..=2005),
            _ => rng.random_range(1..=999),
        };
        local.push_str(&number.to_string());
    }

    let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("gmail.com");
    format!("{local}@{domain}")
}

/// Valid-looking US number in one of the usual layouts.
pub fn phone_number(rng: &mut dyn RngCore) -> String {
    let area = AREA_CODES.choose(rng).copied().unwrap_or(212);
    let exchange = rng.random_range(200..=999);
    let last_four = loop {
        let candidate: u16 = rng.random_range(1000..=9999);
        let text = candidate.to_string();
        if text.chars().any(|ch| Some(ch) != text.chars().next()) {
            break text;
        }
    };

    let layouts = [
        (format!("({area}) {exchange}-{last_four}"), 0.5),
        (format!("{area}-{exchange}-{last_four}"), 0.25),
        (format!("+1 ({area}) {exchange}-{last_four}"), 0.1),
        (format!("1-{area}-{exchange}-{last_four}"), 0.1),
        (format!("{area}.{exchange}.{last_four}"), 0.05),
    ];
    weighted_pick(&layouts, rng)
        .cloned()
        .unwrap_or_else(|| format!("({area}) {exchange}-{last_four}"))
}

fn street_line(rng: &mut dyn RngCore) -> String {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let name: String = LastName().fake_with_rng(rng);
    let suffix: String = if rng.random_bool(0.7) {
        COMMON_SUFFIXES
            .choose(rng)
            .copied()
            .unwrap_or("Street")
            .to_string()
    } else {
        StreetSuffix().fake_with_rng(rng)
    };
    if rng.random_bool(0.15) {
        let direction = DIRECTIONS.choose(rng).copied().unwrap_or("N");
        format!("{number} {direction} {name} {suffix}")
    } else {
        format!("{number} {name} {suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::run_rng;

    #[test]
    fn phone_numbers_have_ten_digits() {
        let mut rng = run_rng(42);
        for _ in 0..200 {
            let phone = phone_number(&mut rng);
            let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
            assert!(digits.len() == 10 || digits.len() == 11, "{phone}");
        }
    }

    #[test]
    fn emails_use_ascii_name_parts() {
        let mut rng = run_rng(3);
        for _ in 0..50 {
            let email = email_for("Mary-Jo", "O'Brien", &mut rng);
            let (local, domain) = email.split_once('@').expect("at sign");
            assert!(EMAIL_DOMAINS.contains(&domain));
            assert!(local.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '.' || ch == '_'));
        }
    }

    #[test]
    fn presence_controls_optional_fields() {
        let mut rng = run_rng(9);
        let never = PresenceProbabilities {
            email: 0.0,
            phone: 0.0,
            address_2: 0.0,
            postcode: 0.0,
        };
        let person = UsProvider.person(&never, &mut rng);
        assert!(person.email.is_none() && person.phone.is_none());
        assert!(person.address_2.is_none() && person.postcode.is_none());
        assert_eq!(person.country_code, "US");
        assert!(!person.first_name.is_empty());
    }
}
