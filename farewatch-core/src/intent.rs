//! Flight-intent detection and the local (regex + gazetteer) field extractor.

use std::sync::LazyLock;

use farewatch_shared::FlightQueryIntent;
use regex::Regex;

use crate::airports;
use crate::{CoreError, CoreResult};

/// Words that make a message worth running through extraction. Matching is
/// substring-based and deliberately loose.
pub const FLIGHT_KEYWORDS: [&str; 13] = [
    "flight", "fly", "travel", "trip", "ticket", "airfare", "airline", "from", "to", "depart",
    "arrive", "airport", "book",
];

static RE_FROM_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+([a-z\s]+)\s+to\s+([a-z\s]+)").unwrap());

static RE_X_TO_Y: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\s]+)\s+to\s+([a-z\s]+)").unwrap());

static RE_X_TO_Y_WHOLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z\s]+)\s+to\s+([a-z\s]+)$").unwrap());

static RE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec|next month|next week|tomorrow|today|in \d+ days)\b",
    )
    .unwrap()
});

static RE_GAZETTEER: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    airports::gazetteer()
        .map(|city| (city, Regex::new(&format!(r"\b{}\b", regex::escape(city))).unwrap()))
        .collect()
});

/// Case-insensitive keyword check.
pub fn is_flight_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    FLIGHT_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// `from X to Y` anywhere in already lower-cased text.
pub fn match_from_to(lower: &str) -> Option<(String, String)> {
    capture_pair(&RE_FROM_TO, lower)
}

/// `X to Y` anywhere in already lower-cased text.
pub fn match_x_to_y(lower: &str) -> Option<(String, String)> {
    capture_pair(&RE_X_TO_Y, lower)
}

/// `X to Y` spanning the whole (trimmed, lower-cased) message.
pub fn match_whole_x_to_y(lower: &str) -> Option<(String, String)> {
    capture_pair(&RE_X_TO_Y_WHOLE, lower.trim())
}

fn capture_pair(re: &Regex, text: &str) -> Option<(String, String)> {
    let caps = re.captures(text)?;
    let from = caps.get(1)?.as_str().trim();
    let to = caps.get(2)?.as_str().trim();
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from.to_string(), to.to_string()))
}

/// First date-ish token (month, abbreviation or relative phrase).
pub fn match_date(lower: &str) -> Option<String> {
    RE_DATE.captures(lower).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}

/// Gazetteer names present in the text, ordered by where they first appear.
pub fn gazetteer_hits(lower: &str) -> Vec<&'static str> {
    let mut hits: Vec<(usize, usize, &'static str)> = RE_GAZETTEER
        .iter()
        .filter_map(|(city, re)| re.find(lower).map(|m| (m.start(), m.len(), *city)))
        .collect();

    // Earlier first; on a tie the longer name wins.
    hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    hits.into_iter().map(|(_, _, city)| city).collect()
}

/// Cities from a caller-provided short list, ordered by first appearance.
/// Plain substring matching.
pub fn find_cities_in<'a>(lower: &str, cities: &[&'a str]) -> Vec<&'a str> {
    let mut hits: Vec<(usize, &'a str)> = cities
        .iter()
        .filter_map(|city| lower.find(city).map(|pos| (pos, *city)))
        .collect();
    hits.sort_by_key(|(pos, _)| *pos);
    hits.into_iter().map(|(_, city)| city).collect()
}

// ============================================================================
// Extractor
// ============================================================================

/// What to do when a message talks about flights but the route is only
/// partly resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillPolicy {
    /// Substitute a fixed route for the missing side(s).
    DefaultRoute { origin: String, destination: String },
    /// Leave the gaps so the caller can ask the user.
    Clarify,
}

impl FillPolicy {
    pub fn default_route(origin: &str, destination: &str) -> CoreResult<Self> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "default route needs both an origin and a destination".to_string(),
            ));
        }
        Ok(FillPolicy::DefaultRoute {
            origin: origin.trim().to_string(),
            destination: destination.trim().to_string(),
        })
    }
}

impl Default for FillPolicy {
    fn default() -> Self {
        FillPolicy::DefaultRoute {
            origin: "New York".to_string(),
            destination: "London".to_string(),
        }
    }
}

/// Pattern and gazetteer based extraction, used whenever the language model
/// is unavailable or its answer cannot be read.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    fill: FillPolicy,
}

impl FieldExtractor {
    pub fn new(fill: FillPolicy) -> Self {
        Self { fill }
    }

    pub fn fill_policy(&self) -> &FillPolicy {
        &self.fill
    }

    pub fn extract(&self, message: &str) -> FlightQueryIntent {
        let lower = message.to_lowercase();

        // 1. Route: "from X to Y", then "X to Y", then the gazetteer
        let (mut from, mut to) = match match_from_to(&lower).or_else(|| match_x_to_y(&lower)) {
            Some((from, to)) => (Some(from), Some(to)),
            None => {
                let mut cities = gazetteer_hits(&lower).into_iter();
                (cities.next().map(String::from), cities.next().map(String::from))
            }
        };

        // 2. Date
        let date = match_date(&lower);

        // 3. Guess-fill
        if lower.contains("flight") && (from.is_none() || to.is_none()) {
            if let FillPolicy::DefaultRoute { origin, destination } = &self.fill {
                tracing::debug!(?from, ?to, "Filling incomplete route with defaults");
                from = from.or_else(|| Some(origin.clone()));
                to = to.or_else(|| Some(destination.clone()));
            }
        }

        FlightQueryIntent::new(from, to, date)
    }
}
