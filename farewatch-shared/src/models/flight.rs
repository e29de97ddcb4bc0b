use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Query Intent
// ============================================================================

/// Structured travel intent pulled out of a free-text message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQueryIntent {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl FlightQueryIntent {
    pub fn new(from: Option<String>, to: Option<String>, date: Option<String>) -> Self {
        Self { from, to, date }.normalized()
    }

    /// Trim every field and drop the blank ones.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
        }

        Self {
            from: clean(self.from),
            to: clean(self.to),
            date: clean(self.date),
        }
    }

    /// Both ends of the route are known.
    pub fn is_complete(&self) -> bool {
        matches!((&self.from, &self.to), (Some(from), Some(to)) if !from.trim().is_empty() && !to.trim().is_empty())
    }

    /// Returns `(from, to)` when the route is complete.
    pub fn route(&self) -> Option<(&str, &str)> {
        if !self.is_complete() {
            return None;
        }
        Some((self.from.as_deref()?, self.to.as_deref()?))
    }
}

// ============================================================================
// Price Analytics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Rising,
    Falling,
    Stable,
}

impl PriceTrend {
    pub const ALL: [PriceTrend; 3] = [PriceTrend::Rising, PriceTrend::Falling, PriceTrend::Stable];

    /// Lenient parse; anything unrecognised is treated as stable.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rising" | "rise" | "up" | "increasing" => PriceTrend::Rising,
            "falling" | "fall" | "down" | "decreasing" => PriceTrend::Falling,
            _ => PriceTrend::Stable,
        }
    }

    /// Force a price delta onto the sign this trend implies.
    pub fn constrain(self, delta: i32) -> i32 {
        match self {
            PriceTrend::Rising => delta.abs(),
            PriceTrend::Falling => -delta.abs(),
            PriceTrend::Stable => delta,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTrend::Rising => "rising",
            PriceTrend::Falling => "falling",
            PriceTrend::Stable => "stable",
        }
    }
}

impl fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PriceTrend {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(PriceTrend::parse(&raw))
    }
}

/// Route-level price analytics, either produced by the language model or
/// synthesized locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStatistics {
    pub average_price: i32,
    pub price_range: String,
    pub best_time_to_book: String,
    pub cheapest_month: String,
    pub price_insight: String,
    pub price_trend: PriceTrend,
}

impl PriceStatistics {
    /// Parse `MIN-MAX` out of the free-form range, e.g. `"400-600 USD"` or
    /// `"$480-$720"`. Bounds come back ordered.
    pub fn range_bounds(&self) -> Option<(i32, i32)> {
        parse_price_range(&self.price_range)
    }
}

/// Splits on the first dash (ASCII or en dash) and reads the number closest
/// to it on each side.
pub fn parse_price_range(raw: &str) -> Option<(i32, i32)> {
    let (left, right) = raw
        .split_once('-')
        .or_else(|| raw.split_once('\u{2013}'))?;

    let min = last_number(left)?;
    let max = first_number(right)?;
    if min <= 0 || max <= 0 {
        return None;
    }

    Some(if min <= max { (min, max) } else { (max, min) })
}

fn first_number(s: &str) -> Option<i32> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn last_number(s: &str) -> Option<i32> {
    let reversed: String = s.chars().rev().collect();
    let digits: String = reversed
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.chars().rev().collect::<String>().parse().ok()
}

// ============================================================================
// Offers
// ============================================================================

/// A synthetic flight listing rendered as a price card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(with = "display_date")]
    pub depart_date: NaiveDate,
    #[serde(with = "display_date")]
    pub return_date: NaiveDate,
    pub price: i32,
    pub previous_price: i32,
    pub airline: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_book: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheapest_month: Option<String>,
}

impl FlightOffer {
    /// Movement since the previous observation; positive means more expensive.
    pub fn price_change(&self) -> i32 {
        self.price - self.previous_price
    }

    pub fn has_annotation(&self) -> bool {
        self.insight.is_some() || self.best_time_to_book.is_some() || self.cheapest_month.is_some()
    }
}

/// Dates travel as `"November 20, 2026"`.
pub mod display_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%B %-d, %Y";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_normalization() {
        let intent = FlightQueryIntent::new(Some("  dubai ".into()), Some("".into()), Some("null".into()));
        assert_eq!(intent.from.as_deref(), Some("dubai"));
        assert_eq!(intent.to, None);
        assert_eq!(intent.date, None);
        assert!(!intent.is_complete());
        assert!(intent.route().is_none());
    }

    #[test]
    fn test_trend_parse_and_constrain() {
        assert_eq!(PriceTrend::parse("Rising"), PriceTrend::Rising);
        assert_eq!(PriceTrend::parse(" falling "), PriceTrend::Falling);
        assert_eq!(PriceTrend::parse("volatile"), PriceTrend::Stable);

        assert_eq!(PriceTrend::Rising.constrain(-12), 12);
        assert_eq!(PriceTrend::Falling.constrain(12), -12);
        assert_eq!(PriceTrend::Stable.constrain(-3), -3);
    }

    #[test]
    fn test_price_range_formats() {
        assert_eq!(parse_price_range("400-600 USD"), Some((400, 600)));
        assert_eq!(parse_price_range("$480-$720"), Some((480, 720)));
        assert_eq!(parse_price_range("$1,200 - $1,500"), Some((1200, 1500)));
        assert_eq!(parse_price_range("900-700"), Some((700, 900)));
        assert_eq!(parse_price_range("around 500 dollars"), None);
        assert_eq!(parse_price_range("-"), None);
    }

    #[test]
    fn test_statistics_wire_format() {
        let json = r#"{
            "averagePrice": 650,
            "priceRange": "550-800 USD",
            "bestTimeToBook": "2 months ahead",
            "cheapestMonth": "February",
            "priceInsight": "Summer is peak season.",
            "priceTrend": "Falling"
        }"#;
        let stats: PriceStatistics = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(stats.price_trend, PriceTrend::Falling);
        assert_eq!(stats.range_bounds(), Some((550, 800)));

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["priceTrend"], "falling");
        assert_eq!(value["bestTimeToBook"], "2 months ahead");
    }

    #[test]
    fn test_offer_serialization() {
        let offer = FlightOffer {
            id: "flight1".to_string(),
            from: "Dubai (DXB)".to_string(),
            to: "London (LHR)".to_string(),
            depart_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2026, 11, 28).unwrap(),
            price: 710,
            previous_price: 695,
            airline: "Emirates".to_string(),
            currency: "USD".to_string(),
            insight: None,
            best_time_to_book: None,
            cheapest_month: Some("March".to_string()),
        };

        let value = serde_json::to_value(&offer).unwrap();
        assert_eq!(value["departDate"], "November 20, 2026");
        assert_eq!(value["previousPrice"], 695);
        assert!(value.get("insight").is_none());
        assert_eq!(offer.price_change(), 15);

        let back: FlightOffer = serde_json::from_value(value).unwrap();
        assert_eq!(back.depart_date, offer.depart_date);
    }
}
