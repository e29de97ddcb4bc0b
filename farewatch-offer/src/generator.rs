use chrono::{Days, NaiveDate};
use farewatch_catalog::{airlines, PricingEngine};
use farewatch_core::airports::route_label;
use farewatch_shared::{FlightOffer, PriceStatistics, PriceTrend};
use rand::Rng;

/// Offers per server-side response.
pub const OFFER_COUNT: usize = 4;

const CURRENCY: &str = "USD";

/// Synthesizes flight listings for a route. Every random draw goes through
/// the caller's `Rng`, so a seeded generator gives repeatable offers.
pub struct OfferGenerator {
    pricing_engine: PricingEngine,
}

impl OfferGenerator {
    pub fn new(pricing_engine: PricingEngine) -> Self {
        Self { pricing_engine }
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing_engine
    }

    /// Offers priced inside the statistics' band, deltas following its trend.
    /// The first three offers each carry one piece of the analysis.
    pub fn generate_from_statistics<R: Rng + ?Sized>(
        &self,
        from: &str,
        to: &str,
        stats: &PriceStatistics,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<FlightOffer>, OfferError> {
        let (min_price, max_price) = self.pricing_engine.statistics_band(stats, from, to, rng);
        let (from_label, to_label) = (route_label(from), route_label(to));

        (0..OFFER_COUNT)
            .map(|i| {
                let (depart_date, return_date) = travel_dates(today, rng)?;

                let raw = min_price as f64 + rng.gen::<f64>() * (max_price - min_price) as f64;
                let price = self.pricing_engine.apply_floor(raw.round() as i32);
                let delta = price_delta(Some(stats.price_trend), rng);

                Ok(FlightOffer {
                    id: format!("flight{}", i + 1),
                    from: from_label.clone(),
                    to: to_label.clone(),
                    depart_date,
                    return_date,
                    price,
                    previous_price: price - delta,
                    airline: airlines::pick(&airlines::FULL_ROSTER, rng),
                    currency: CURRENCY.to_string(),
                    insight: (i == 0).then(|| stats.price_insight.clone()),
                    best_time_to_book: (i == 1).then(|| stats.best_time_to_book.clone()),
                    cheapest_month: (i == 2).then(|| stats.cheapest_month.clone()),
                })
            })
            .collect()
    }

    /// Offers jittered ±75 around the route's base fare; no analysis attached.
    pub fn generate_heuristic<R: Rng + ?Sized>(
        &self,
        from: &str,
        to: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<FlightOffer>, OfferError> {
        let base_price = self.pricing_engine.base_price(from, to, rng);
        let (from_label, to_label) = (route_label(from), route_label(to));

        (0..OFFER_COUNT)
            .map(|i| {
                let (depart_date, return_date) = travel_dates(today, rng)?;

                let variation = rng.gen_range(-75..=75);
                let price = self.pricing_engine.apply_floor(base_price + variation);
                let delta = price_delta(None, rng);

                Ok(FlightOffer {
                    id: format!("flight{}", i + 1),
                    from: from_label.clone(),
                    to: to_label.clone(),
                    depart_date,
                    return_date,
                    price,
                    previous_price: price - delta,
                    airline: airlines::pick(&airlines::STANDARD_ROSTER, rng),
                    currency: CURRENCY.to_string(),
                    insight: None,
                    best_time_to_book: None,
                    cheapest_month: None,
                })
            })
            .collect()
    }
}

/// Departure 30..=39 days out, return 7..=11 days after that.
pub(crate) fn travel_dates<R: Rng + ?Sized>(
    today: NaiveDate,
    rng: &mut R,
) -> Result<(NaiveDate, NaiveDate), OfferError> {
    let depart = today
        .checked_add_days(Days::new(rng.gen_range(30..=39)))
        .ok_or(OfferError::DateOutOfRange(today))?;
    let ret = depart
        .checked_add_days(Days::new(rng.gen_range(7..=11)))
        .ok_or(OfferError::DateOutOfRange(depart))?;
    Ok((depart, ret))
}

/// A delta in -25..=25, forced onto the trend's sign when one is given.
pub(crate) fn price_delta<R: Rng + ?Sized>(trend: Option<PriceTrend>, rng: &mut R) -> i32 {
    let delta = rng.gen_range(-25..=25);
    trend.map_or(delta, |t| t.constrain(delta))
}

#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("Travel date out of range after {0}")]
    DateOutOfRange(NaiveDate),
}
