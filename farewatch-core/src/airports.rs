//! City gazetteer and IATA code lookup.
//!
//! The table doubles as the gazetteer used by the fallback extractor: every
//! name (aliases like `nyc` and `sf` included) is something we recognise in
//! free text and can print a code for.

/// Known city names (lower-case) and the airport code shown for them.
pub const AIRPORT_CODES: [(&str, &str); 36] = [
    ("new york", "JFK"),
    ("nyc", "JFK"),
    ("london", "LHR"),
    ("paris", "CDG"),
    ("tokyo", "NRT"),
    ("los angeles", "LAX"),
    ("la", "LAX"),
    ("chicago", "ORD"),
    ("miami", "MIA"),
    ("san francisco", "SFO"),
    ("sf", "SFO"),
    ("boston", "BOS"),
    ("seattle", "SEA"),
    ("atlanta", "ATL"),
    ("denver", "DEN"),
    ("dallas", "DFW"),
    ("houston", "IAH"),
    ("phoenix", "PHX"),
    ("philadelphia", "PHL"),
    ("toronto", "YYZ"),
    ("vancouver", "YVR"),
    ("sydney", "SYD"),
    ("melbourne", "MEL"),
    ("dubai", "DXB"),
    ("singapore", "SIN"),
    ("hong kong", "HKG"),
    ("berlin", "BER"),
    ("rome", "FCO"),
    ("madrid", "MAD"),
    ("barcelona", "BCN"),
    ("amsterdam", "AMS"),
    ("bangkok", "BKK"),
    ("beijing", "PEK"),
    ("shanghai", "PVG"),
    ("delhi", "DEL"),
    ("mumbai", "BOM"),
];

/// Gazetteer names in table order.
pub fn gazetteer() -> impl Iterator<Item = &'static str> {
    AIRPORT_CODES.iter().map(|(city, _)| *city)
}

/// Lower-cases and collapses whitespace so `"New  York"` and `"new york"`
/// share a key.
pub fn normalize_city(city: &str) -> String {
    city.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Known code for the city, else a pseudo-code: first letter of the first
/// two words plus the second letter of the first word, or the first three
/// letters of a one-word name.
pub fn airport_code(city: &str) -> String {
    let key = normalize_city(city);

    if let Some((_, code)) = AIRPORT_CODES.iter().find(|(name, _)| *name == key) {
        return (*code).to_string();
    }

    let words: Vec<&str> = key.split(' ').filter(|w| !w.is_empty()).collect();
    let code: String = match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(3).collect(),
        [first, second, ..] => {
            let mut first_chars = first.chars();
            let mut code = String::new();
            code.extend(first_chars.next());
            code.extend(second.chars().next());
            code.extend(first_chars.next());
            code
        }
    };

    code.to_uppercase()
}

/// Capitalise the first letter of every word.
pub fn display_name(city: &str) -> String {
    city.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Card label, e.g. `"Dubai (DXB)"`.
pub fn route_label(city: &str) -> String {
    format!("{} ({})", display_name(city), airport_code(city))
}
