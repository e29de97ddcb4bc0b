use chrono::NaiveDate;
use farewatch_catalog::airlines;
use farewatch_core::airports::display_name;
use farewatch_core::intent::{find_cities_in, match_from_to, match_whole_x_to_y};
use farewatch_core::replies;
use farewatch_shared::{ChatReply, FlightOffer, PriceStatistics};
use rand::Rng;

use crate::generator::{price_delta, travel_dates, OfferError};
use crate::statistics::mock_statistics;

/// Offers produced by the offline fallback.
pub const LOCAL_OFFER_COUNT: usize = 3;

const LOCAL_KEYWORDS: [&str; 4] = ["flight", "from", "to", "travel"];

const COMMON_CITIES: [&str; 11] = [
    "new york",
    "london",
    "paris",
    "tokyo",
    "los angeles",
    "chicago",
    "miami",
    "san francisco",
    "boston",
    "dubai",
    "mumbai",
];

const DEFAULT_ROUTE: (&str, &str) = ("New York", "London");

/// Self-contained answers for a client that cannot reach the service.
/// Needs no configuration and never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFallback;

impl LocalFallback {
    pub fn new() -> Self {
        Self
    }

    pub fn respond<R: Rng + ?Sized>(
        &self,
        message: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<ChatReply, OfferError> {
        let lower = message.to_lowercase();

        if !LOCAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Ok(ChatReply::text(replies::canned_reply_or(message, replies::DEFAULT_SHORT)));
        }

        let (from, to) = route_guess(&lower);
        let stats = mock_statistics(rng);
        let offers = self.offers(&from, &to, &stats, today, rng)?;

        let content = format!(
            "I've analyzed flights from {} to {}. The average price is around ${}, with prices typically ranging from {}. {} The best time to book is {}, and prices are currently {}.",
            from,
            to,
            stats.average_price,
            stats.price_range,
            stats.price_insight,
            stats.best_time_to_book,
            stats.price_trend,
        );

        Ok(ChatReply::text(content).with_offers(offers).with_statistics(stats))
    }

    fn offers<R: Rng + ?Sized>(
        &self,
        from: &str,
        to: &str,
        stats: &PriceStatistics,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<FlightOffer>, OfferError> {
        let from_label = format!("{} ({})", display_name(from), short_code(from));
        let to_label = format!("{} ({})", display_name(to), short_code(to));

        (0..LOCAL_OFFER_COUNT)
            .map(|i| {
                let (depart_date, return_date) = travel_dates(today, rng)?;
                let price = rng.gen_range(300..=999);
                let delta = price_delta(Some(stats.price_trend), rng);

                Ok(FlightOffer {
                    id: format!("flight{}", i + 1),
                    from: from_label.clone(),
                    to: to_label.clone(),
                    depart_date,
                    return_date,
                    price,
                    previous_price: price - delta,
                    airline: airlines::pick(&airlines::COMPACT_ROSTER, rng),
                    currency: "USD".to_string(),
                    insight: None,
                    best_time_to_book: None,
                    cheapest_month: None,
                })
            })
            .collect()
    }
}

/// Route from the lower-cased message, falling back to New York → London.
fn route_guess(lower: &str) -> (String, String) {
    if let Some((from, to)) = match_from_to(lower).or_else(|| match_whole_x_to_y(lower)) {
        return (display_name(&from), display_name(&to));
    }

    // Hits are ordered by where they appear in the message, not by list position.
    match find_cities_in(lower, &COMMON_CITIES)[..] {
        [first, second, ..] => (display_name(first), display_name(second)),
        _ => (DEFAULT_ROUTE.0.to_string(), DEFAULT_ROUTE.1.to_string()),
    }
}

/// First three letters, upper-cased.
fn short_code(city: &str) -> String {
    city.chars().filter(|c| !c.is_whitespace()).take(3).collect::<String>().to_uppercase()
}
