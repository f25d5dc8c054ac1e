use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use dupforge_core::{PersonFields, PresenceProbabilities, ProviderLocale};

use crate::noise::tables::diacritic_fold;
use crate::providers::{BaseValueProvider, present};

const FIRST_NAMES: &[&str] = &[
    "Lukas", "Luca", "Lea", "Leah", "Noah", "Lina", "Mia", "Ben", "Elina", "Finn", "Nina", "Jonas",
    "Leonie", "Fabian", "Matthias", "Matteo", "Michael", "Michi", "Sebastian", "Sebi", "Andreas",
    "Andi", "Thomas", "Tom", "Florian", "Flavio", "Julia", "Julian", "Nadine", "Tobias", "Tobi",
    "Raphael", "Reto", "Urs", "Louis", "Hugo", "Jules", "Léa", "Élise", "Camille", "Chloé", "Emma",
    "Noémie", "Théo", "Mathieu", "Baptiste", "Arthur", "Zoé", "Léo", "Émile", "Anaïs", "François",
    "Guillaume", "Victor", "Lorenzo", "Giorgio", "Giulia", "Martina", "Alessia", "Davide",
    "Nicola", "Simone", "Riccardo", "Elena", "Paolo", "Alexander", "Alex", "Sarah", "Sara",
    "Daniel", "Samuel", "David", "Marco", "Marc", "Martin",
];

const LAST_NAMES: &[&str] = &[
    "Müller", "Meier", "Keller", "Weber", "Schmid", "Schneider", "Hug", "Huber", "Fischer",
    "Schumacher", "Kunz", "Frei", "Schäfer", "Baumann", "Bachmann", "Vogel", "Graf", "Kohler",
    "Brunner", "Ziegler", "Steiner", "Wenger", "Dupont", "Durand", "Morel", "Lambert", "Mercier",
    "Blanc", "Girard", "Roux", "Perrin", "Meyer", "Bianchi", "Rossi", "Russo", "Galli", "Ricci",
    "Lombardi", "Ferrari", "Esposito", "Conti", "Greco", "Martin", "Bernard", "Lehmann",
    "Schmidlin", "Suter",
];

/// Cities with their canton code.
pub const CITY_TO_CANTON: &[(&str, &str)] = &[
    ("Zürich", "ZH"),
    ("Winterthur", "ZH"),
    ("Uster", "ZH"),
    ("Wädenswil", "ZH"),
    ("Bern", "BE"),
    ("Biel/Bienne", "BE"),
    ("Thun", "BE"),
    ("Luzern", "LU"),
    ("Kriens", "LU"),
    ("Altdorf", "UR"),
    ("Schwyz", "SZ"),
    ("Pfäffikon", "SZ"),
    ("Stans", "NW"),
    ("Sarnen", "OW"),
    ("Glarus", "GL"),
    ("Zug", "ZG"),
    ("Fribourg", "FR"),
    ("Freiburg", "FR"),
    ("Solothurn", "SO"),
    ("Basel", "BS"),
    ("Liestal", "BL"),
    ("Schaffhausen", "SH"),
    ("St. Gallen", "SG"),
    ("Rapperswil-Jona", "SG"),
    ("Herisau", "AR"),
    ("Appenzell", "AI"),
    ("Chur", "GR"),
    ("Davos", "GR"),
    ("St. Moritz", "GR"),
    ("Aarau", "AG"),
    ("Baden", "AG"),
    ("Frauenfeld", "TG"),
    ("Lugano", "TI"),
    ("Bellinzona", "TI"),
    ("Locarno", "TI"),
    ("Lausanne", "VD"),
    ("Nyon", "VD"),
    ("Montreux", "VD"),
    ("Vevey", "VD"),
    ("Sion", "VS"),
    ("Sitten", "VS"),
    ("Brig", "VS"),
    ("Neuchâtel", "NE"),
    ("Genève", "GE"),
    ("Geneva", "GE"),
    ("Delémont", "JU"),
    ("Zermatt", "VS"),
    ("Interlaken", "BE"),
    ("Yverdon-les-Bains", "VD"),
];

const GERMAN_STREETS: &[&str] = &[
    "Bahnhofstrasse",
    "Schulstrasse",
    "Hauptstrasse",
    "Seestrasse",
    "Kirchweg",
    "Dorfstrasse",
    "Wiesenweg",
    "Gartenstrasse",
    "Marktgasse",
    "Rathausplatz",
];

const FRENCH_STREETS: &[&str] = &["Rue de", "Rue du", "Avenue de", "Boulevard de", "Route de", "Chemin de"];

const FRENCH_PLACES: &[&str] = &["la Gare", "Lausanne", "Genève", "l'Église", "la Poste", "Berne"];

const ITALIAN_STREETS: &[&str] = &["Via", "Viale", "Vicolo", "Piazza"];

const ITALIAN_PLACES: &[&str] = &["Roma", "Stazione", "Cantonale", "San Gottardo", "Lugano", "Motta"];

const APT_WORDS: &[&str] = &[
    "Wohnung",
    "Whg.",
    "Haus",
    "Nr.",
    "Stg.",
    "Appartement",
    "App.",
    "n°",
    "Bât.",
    "Entrée",
    "Appartamento",
    "Scala",
    "Interno",
    "Piano",
    "Apt",
    "Unit",
    "Suite",
    "Ste",
];

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "outlook.com",
    "icloud.com",
    "proton.me",
    "hotmail.com",
    "aol.com",
    "bluewin.ch",
    "sunrise.ch",
    "gmx.ch",
    "hispeed.ch",
    "yahoo.com",
];

const MOBILE_PREFIXES: &[&str] = &["76", "77", "78", "79"];

/// Swiss people with DE/FR/IT names and street forms, canton codes as
/// region.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwissProvider;

impl BaseValueProvider for SwissProvider {
    fn locale(&self) -> ProviderLocale {
        ProviderLocale::DeCh
    }

    fn person(&self, presence: &PresenceProbabilities, rng: &mut dyn RngCore) -> PersonFields {
        let first_name = pick(FIRST_NAMES, rng).to_string();
        let last_name = pick(LAST_NAMES, rng).to_string();
        let email = present(presence.email, rng).then(|| email_for(&first_name, &last_name, rng));
        let phone = present(presence.phone, rng).then(|| phone_number(rng));
        let address_1 = street_line(rng);
        let address_2 = present(presence.address_2, rng).then(|| apartment(rng));
        let (city, canton) = CITY_TO_CANTON
            .choose(rng)
            .copied()
            .unwrap_or(("Zürich", "ZH"));
        let postcode =
            present(presence.postcode, rng).then(|| rng.random_range(1000..=9999).to_string());

        PersonFields {
            first_name,
            last_name,
            email,
            phone,
            address_1,
            address_2,
            city: city.to_string(),
            state: canton.to_string(),
            postcode,
            country_code: "CH".to_string(),
        }
    }
}

fn pick(pool: &'static [&'static str], rng: &mut dyn RngCore) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Replace every accented letter by its ASCII spelling.
pub fn fold_all(value: &str) -> String {
    value
        .chars()
        .map(|ch| diacritic_fold(ch).map_or_else(|| ch.to_string(), str::to_string))
        .collect()
}

/// `first.last@domain`, lower-cased and ASCII folded.
pub fn email_for(first_name: &str, last_name: &str, rng: &mut dyn RngCore) -> String {
    let local: String = fold_all(&format!("{first_name}.{last_name}").to_lowercase())
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-')
        .collect();
    let domain = pick(EMAIL_DOMAINS, rng);
    format!("{local}@{domain}")
}

fn phone_number(rng: &mut dyn RngCore) -> String {
    let prefix = pick(MOBILE_PREFIXES, rng);
    format!(
        "+41 {prefix} {:03} {:02} {:02}",
        rng.random_range(0..1000),
        rng.random_range(0..100),
        rng.random_range(0..100)
    )
}

fn street_line(rng: &mut dyn RngCore) -> String {
    let number = rng.random_range(1..=299);
    match rng.random_range(0..3) {
        0 => format!("{} {number}", pick(GERMAN_STREETS, rng)),
        1 => format!(
            "{number} {} {}",
            pick(FRENCH_STREETS, rng),
            pick(FRENCH_PLACES, rng)
        ),
        _ => format!(
            "{} {} {number}",
            pick(ITALIAN_STREETS, rng),
            pick(ITALIAN_PLACES, rng)
        ),
    }
}

fn apartment(rng: &mut dyn RngCore) -> String {
    let word = pick(APT_WORDS, rng);
    let separator = [" ", " #", "-"].choose(rng).copied().unwrap_or(" ");
    format!("{word}{separator}{}", rng.random_range(1..=350))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::run_rng;

    #[test]
    fn emails_are_ascii() {
        let mut rng = run_rng(42);
        let email = email_for("Anaïs", "Schäfer", &mut rng);
        assert!(email.starts_with("anais.schaefer@"), "{email}");
        assert!(email.is_ascii());
    }

    #[test]
    fn city_and_canton_are_consistent() {
        let mut rng = run_rng(7);
        for _ in 0..100 {
            let person = SwissProvider.person(&PresenceProbabilities::default(), &mut rng);
            assert!(
                CITY_TO_CANTON
                    .iter()
                    .any(|(city, canton)| *city == person.city && *canton == person.state)
            );
            assert_eq!(person.country_code, "CH");
            if let Some(phone) = &person.phone {
                assert!(phone.starts_with("+41 7"));
            }
        }
    }
}
