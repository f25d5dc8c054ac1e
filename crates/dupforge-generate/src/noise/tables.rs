//! Lookup tables shared by the noise operators.

/// QWERTY neighbours of each lower-case key.
pub const KEYBOARD_NEIGHBOURS: &[(char, &str)] = &[
    ('q', "wa"),
    ('w', "qase"),
    ('e', "wsdr"),
    ('r', "edft"),
    ('t', "rfgy"),
    ('y', "tghu"),
    ('u', "yhji"),
    ('i', "ujko"),
    ('o', "iklp"),
    ('p', "ol"),
    ('a', "qwsz"),
    ('s', "qwazxed"),
    ('d', "wserfcx"),
    ('f', "drtgvc"),
    ('g', "ftyhbv"),
    ('h', "gyujnb"),
    ('j', "huikmn"),
    ('k', "jiolm"),
    ('l', "kop"),
    ('z', "asx"),
    ('x', "zsdc"),
    ('c', "xdfv"),
    ('v', "cfgb"),
    ('b', "vghn"),
    ('n', "bhjm"),
    ('m', "njk"),
    ('1', "2"),
    ('2', "13"),
    ('3', "24"),
    ('4', "35"),
    ('5', "46"),
    ('6', "57"),
    ('7', "68"),
    ('8', "79"),
    ('9', "80"),
    ('0', "9"),
];

pub fn keyboard_neighbours(key: char) -> Option<&'static str> {
    KEYBOARD_NEIGHBOURS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, neighbours)| *neighbours)
}

/// Glyph pairs that scanners confuse. Multi-character sources come first.
pub const OCR_CONFUSIONS: &[(&str, &[&str])] = &[
    ("rn", &["m"]),
    ("cl", &["d"]),
    ("m", &["rn"]),
    ("d", &["cl"]),
    ("0", &["O", "o", "Q"]),
    ("O", &["0", "o", "Q"]),
    ("o", &["0", "O"]),
    ("1", &["l", "I", "|"]),
    ("l", &["1", "I"]),
    ("I", &["1", "l"]),
    ("5", &["S", "s"]),
    ("S", &["5", "s"]),
    ("s", &["S", "5"]),
    ("6", &["G", "g"]),
    ("G", &["6", "g"]),
    ("g", &["G", "6"]),
    ("8", &["B", "b"]),
    ("B", &["8", "b"]),
    ("b", &["B", "8"]),
];

/// Sound-alike spellings, tried in order; the first match is replaced once.
pub const PHONETIC_SWAPS: &[(&str, &str)] = &[
    ("ph", "f"),
    ("f", "ph"),
    ("c", "k"),
    ("k", "c"),
    ("z", "s"),
    ("s", "z"),
    ("i", "y"),
    ("y", "i"),
    ("ei", "ie"),
    ("ie", "ei"),
];

pub const DOMAIN_MISTAKES: &[(&str, &[&str])] = &[
    (
        "gmail.com",
        &["gmai.com", "gmial.com", "gmail.co", "gmaill.com", "gmailcom", "gail.com"],
    ),
    (
        "yahoo.com",
        &["yaho.com", "yahoo.co", "yahooo.com", "yhoo.com", "ymail.com"],
    ),
    (
        "hotmail.com",
        &["hotmai.com", "hotmal.com", "hotmial.com", "hotmailcom", "htmail.com"],
    ),
    ("outlook.com", &["outlok.com", "outlook.co", "outloo.com"]),
    ("aol.com", &["ao.com", "aoll.com", "aol.co"]),
    ("icloud.com", &["iclou.com", "icloud.co", "icoud.com"]),
    (
        "protonmail.com",
        &["protonmai.com", "protonmail.co", "proton.com"],
    ),
];

/// Word tags used for plus aliases; numeric tags are drawn separately.
pub const PLUS_TAG_WORDS: &[&str] = &[
    "work",
    "shop",
    "personal",
    "home",
    "business",
    "spam",
    "newsletter",
];

/// Letters a scanner reads in place of each digit.
pub const DIGIT_LOOKALIKES: &[(char, &[char])] = &[
    ('0', &['O', '9', '1']),
    ('1', &['l', 'I', '7']),
    ('2', &['Z', '3']),
    ('3', &['E', '8']),
    ('4', &['A', '7']),
    ('5', &['S', '6']),
    ('6', &['G', '9']),
    ('7', &['T', '1']),
    ('8', &['B', '3']),
    ('9', &['g', '6', '0']),
];

pub const ADDRESS_ABBREVIATIONS: &[(&str, &[&str])] = &[
    ("Street", &["St", "St.", "Str", "Strt", "street"]),
    ("Avenue", &["Ave", "Ave.", "Av", "Avn", "avenue"]),
    ("Drive", &["Dr", "Dr.", "Drv", "Driv", "drive"]),
    ("Road", &["Rd", "Rd.", "Ro", "road"]),
    ("Boulevard", &["Blvd", "Blvd.", "Bld", "Blv", "boulevard"]),
    ("Lane", &["Ln", "Ln.", "lane"]),
    ("Court", &["Ct", "Ct.", "court"]),
    ("Place", &["Pl", "Pl.", "place"]),
    ("Circle", &["Cir", "Cir.", "circle"]),
    ("Way", &["Wy", "way"]),
    ("Apartment", &["Apt", "Apt.", "#", "Unit", "apartment"]),
    ("Suite", &["Ste", "Ste.", "#", "Su", "suite"]),
    ("Unit", &["Apt", "#", "unit"]),
    ("Building", &["Bldg", "Bldg.", "Bld", "building"]),
    ("North", &["N", "N.", "north"]),
    ("South", &["S", "S.", "south"]),
    ("East", &["E", "E.", "east"]),
    ("West", &["W", "W.", "west"]),
    ("Northeast", &["NE", "N.E.", "northeast"]),
    ("Northwest", &["NW", "N.W.", "northwest"]),
    ("Southeast", &["SE", "S.E.", "southeast"]),
    ("Southwest", &["SW", "S.W.", "southwest"]),
    ("Strasse", &["Str.", "str."]),
    ("Weg", &["Wg.", "weg"]),
    ("Gasse", &["G.", "gasse"]),
    ("Platz", &["Pl.", "platz"]),
    ("Route", &["Rte", "Rte.", "route"]),
    ("Chemin", &["Ch.", "Che.", "chemin"]),
    ("Viale", &["V.le", "Vle."]),
    ("Piazza", &["P.za", "Pza"]),
    ("Vicolo", &["Vic.", "V.lo"]),
];

/// German street suffixes written as the tail of a compound
/// (`Bahnhofstrasse`, `Kirchweg`).
pub const COMPOUND_STREET_SUFFIXES: &[(&str, &[&str])] = &[
    ("strasse", &["str.", "str"]),
    ("weg", &["wg."]),
    ("gasse", &["g.", "gs."]),
    ("platz", &["pl.", "plz."]),
];

pub const DIRECTION_SWAPS: &[(&str, &str)] = &[
    ("N", "S"),
    ("S", "N"),
    ("E", "W"),
    ("W", "E"),
    ("NE", "NW"),
    ("NW", "NE"),
    ("SE", "SW"),
    ("SW", "SE"),
];

pub const NICKNAMES: &[(&str, &[&str])] = &[
    ("Alexander", &["Alex", "Xander", "Al", "Alec"]),
    ("Alexandra", &["Alex", "Alexa", "Sandra", "Sasha"]),
    ("Andrew", &["Andy", "Drew"]),
    ("Andreas", &["Andi", "Andy"]),
    ("Anthony", &["Tony", "Anton"]),
    ("Benjamin", &["Ben", "Benny", "Benji"]),
    ("Catherine", &["Cat", "Cathy", "Kate", "Katie"]),
    ("Christopher", &["Chris", "Christie", "Topher"]),
    ("Daniel", &["Dan", "Danny"]),
    ("David", &["Dave", "Davey"]),
    ("Davide", &["David"]),
    ("Edward", &["Ed", "Eddie", "Ted"]),
    ("Elena", &["Helena"]),
    ("Elizabeth", &["Liz", "Beth", "Betty", "Eliza"]),
    ("Emily", &["Em", "Emmy"]),
    ("François", &["Francois", "Franck"]),
    ("Giulia", &["Julia"]),
    ("Gregory", &["Greg"]),
    ("Guillaume", &["Gui", "William"]),
    ("James", &["Jim", "Jimmy", "Jamie"]),
    ("Jennifer", &["Jen", "Jenny"]),
    ("Jessica", &["Jess", "Jessie"]),
    ("John", &["Johnny", "Jack"]),
    ("Jonathan", &["Jon", "Johnny"]),
    ("Joseph", &["Joe", "Joey"]),
    ("Joshua", &["Josh"]),
    ("Kenneth", &["Ken", "Kenny"]),
    ("Lorenzo", &["Enzo"]),
    ("Luca", &["Luke"]),
    ("Marco", &["Marc"]),
    ("Margaret", &["Maggie", "Meg", "Peggy"]),
    ("Matteo", &["Matt"]),
    ("Matthew", &["Matt", "Matty"]),
    ("Matthias", &["Mat", "Matt", "Matteo"]),
    ("Michael", &["Mike", "Mick", "Mickey", "Michi"]),
    ("Nicholas", &["Nick", "Nicky"]),
    ("Noah", &["Noa"]),
    ("Patricia", &["Pat", "Patty", "Tricia"]),
    ("Rebecca", &["Becky", "Becca"]),
    ("Riccardo", &["Ricky"]),
    ("Richard", &["Rick", "Rich", "Dick"]),
    ("Robert", &["Bob", "Rob", "Bobby"]),
    ("Samuel", &["Sam", "Sammy"]),
    ("Sebastian", &["Sebi", "Bastian"]),
    ("Stephen", &["Steve", "Stevie"]),
    ("Susan", &["Sue", "Susie"]),
    ("Thomas", &["Tom", "Tommy"]),
    ("William", &["Bill", "Will", "Billy"]),
];

pub const CULTURAL_VARIANTS: &[(&str, &[&str])] = &[
    ("John", &["Jon", "Johan", "Juan", "Giovanni"]),
    ("Mary", &["Maria", "Marie"]),
    ("Peter", &["Pedro", "Pietro"]),
    ("Paul", &["Pablo", "Paolo"]),
    ("Michael", &["Miguel", "Michele"]),
    ("David", &["Davide"]),
];

/// Umlaut transliterations and accent drops.
pub const DIACRITIC_FOLDS: &[(char, &str)] = &[
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('Ä', "Ae"),
    ('Ö', "Oe"),
    ('Ü', "Ue"),
    ('é', "e"),
    ('è', "e"),
    ('ê', "e"),
    ('É', "E"),
    ('È', "E"),
    ('Ê', "E"),
    ('à', "a"),
    ('ï', "i"),
    ('ë', "e"),
    ('ç', "c"),
];

pub fn diacritic_fold(ch: char) -> Option<&'static str> {
    DIACRITIC_FOLDS
        .iter()
        .find(|(candidate, _)| *candidate == ch)
        .map(|(_, folded)| *folded)
}

/// Bilingual Swiss city names and canton codes.
pub const SWISS_LOCALITY_ALIASES: &[(&str, &[&str])] = &[
    ("Genève", &["Geneva", "Genf"]),
    ("Geneva", &["Genève"]),
    ("Fribourg", &["Freiburg"]),
    ("Freiburg", &["Fribourg"]),
    ("Sion", &["Sitten"]),
    ("Sitten", &["Sion"]),
    ("Neuchâtel", &["Neuchatel", "Neuenburg"]),
    ("Zürich", &["Zurich", "Zuerich"]),
    ("Luzern", &["Lucerne"]),
    ("Chur", &["Coira"]),
    ("Biel/Bienne", &["Biel", "Bienne"]),
    ("Bern", &["Berne"]),
    ("Basel", &["Bâle", "Basilea"]),
    ("ZH", &["Zürich"]),
    ("BE", &["Bern"]),
    ("LU", &["Luzern"]),
    ("UR", &["Uri"]),
    ("SZ", &["Schwyz"]),
    ("OW", &["Obwalden"]),
    ("NW", &["Nidwalden"]),
    ("GL", &["Glarus"]),
    ("ZG", &["Zug"]),
    ("FR", &["Fribourg"]),
    ("SO", &["Solothurn"]),
    ("BS", &["Basel-Stadt"]),
    ("BL", &["Basel-Landschaft"]),
    ("SH", &["Schaffhausen"]),
    ("AR", &["Appenzell Ausserrhoden"]),
    ("AI", &["Appenzell Innerrhoden"]),
    ("SG", &["St. Gallen"]),
    ("GR", &["Graubünden"]),
    ("AG", &["Aargau"]),
    ("TG", &["Thurgau"]),
    ("TI", &["Ticino"]),
    ("VD", &["Vaud"]),
    ("VS", &["Valais"]),
    ("NE", &["Neuchâtel"]),
    ("GE", &["Genève"]),
    ("JU", &["Jura"]),
];

/// US city nicknames and state codes.
pub const US_LOCALITY_ALIASES: &[(&str, &[&str])] = &[
    ("New York", &["NYC", "New York City"]),
    ("Los Angeles", &["LA"]),
    ("San Francisco", &["SF", "San Fran"]),
    ("Philadelphia", &["Philly"]),
    ("Saint Louis", &["St. Louis", "St Louis"]),
    ("Las Vegas", &["Vegas"]),
    ("AL", &["Alabama"]),
    ("AK", &["Alaska"]),
    ("AZ", &["Arizona"]),
    ("AR", &["Arkansas"]),
    ("CA", &["California", "Calif."]),
    ("CO", &["Colorado"]),
    ("CT", &["Connecticut"]),
    ("DE", &["Delaware"]),
    ("FL", &["Florida", "Fla."]),
    ("GA", &["Georgia"]),
    ("HI", &["Hawaii"]),
    ("ID", &["Idaho"]),
    ("IL", &["Illinois"]),
    ("IN", &["Indiana"]),
    ("IA", &["Iowa"]),
    ("KS", &["Kansas"]),
    ("KY", &["Kentucky"]),
    ("LA", &["Louisiana"]),
    ("ME", &["Maine"]),
    ("MD", &["Maryland"]),
    ("MA", &["Massachusetts", "Mass."]),
    ("MI", &["Michigan"]),
    ("MN", &["Minnesota"]),
    ("MS", &["Mississippi"]),
    ("MO", &["Missouri"]),
    ("MT", &["Montana"]),
    ("NE", &["Nebraska"]),
    ("NV", &["Nevada"]),
    ("NH", &["New Hampshire"]),
    ("NJ", &["New Jersey"]),
    ("NM", &["New Mexico"]),
    ("NY", &["New York"]),
    ("NC", &["North Carolina"]),
    ("ND", &["North Dakota"]),
    ("OH", &["Ohio"]),
    ("OK", &["Oklahoma"]),
    ("OR", &["Oregon"]),
    ("PA", &["Pennsylvania", "Penn."]),
    ("RI", &["Rhode Island"]),
    ("SC", &["South Carolina"]),
    ("SD", &["South Dakota"]),
    ("TN", &["Tennessee"]),
    ("TX", &["Texas"]),
    ("UT", &["Utah"]),
    ("VT", &["Vermont"]),
    ("VA", &["Virginia"]),
    ("WA", &["Washington"]),
    ("WV", &["West Virginia"]),
    ("WI", &["Wisconsin"]),
    ("WY", &["Wyoming"]),
];

pub type AliasTable = &'static [(&'static str, &'static [&'static str])];

/// Exact lookup in a `(key, values)` table.
pub fn lookup(table: AliasTable, key: &str) -> Option<&'static [&'static str]> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, values)| *values)
}

/// Case-insensitive lookup in a `(key, values)` table.
pub fn lookup_ignore_case(table: AliasTable, key: &str) -> Option<&'static [&'static str]> {
    let key = key.to_lowercase();
    table
        .iter()
        .find(|(candidate, _)| candidate.to_lowercase() == key)
        .map(|(_, values)| *values)
}
