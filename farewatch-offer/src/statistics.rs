use farewatch_catalog::pricing::spread;
use farewatch_catalog::PricingEngine;
use farewatch_shared::{PriceStatistics, PriceTrend};
use rand::seq::SliceRandom;
use rand::Rng;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const DEFAULT_INSIGHT: &str = "Prices vary based on season and demand";

pub fn random_month<R: Rng + ?Sized>(rng: &mut R) -> String {
    MONTHS.choose(rng).copied().unwrap_or("January").to_string()
}

pub fn random_trend<R: Rng + ?Sized>(rng: &mut R) -> PriceTrend {
    PriceTrend::ALL.choose(rng).copied().unwrap_or(PriceTrend::Stable)
}

/// Route statistics built from the heuristic base fare, used whenever the
/// model's analysis is missing or unreadable.
pub fn local_statistics<R: Rng + ?Sized>(
    pricing: &PricingEngine,
    from: &str,
    to: &str,
    rng: &mut R,
) -> PriceStatistics {
    let base = pricing.base_price(from, to, rng);
    let (low, high) = spread(base);

    PriceStatistics {
        average_price: base,
        price_range: format!("${}-${}", low, high),
        best_time_to_book: "1-3 months in advance".to_string(),
        cheapest_month: random_month(rng),
        price_insight: DEFAULT_INSIGHT.to_string(),
        price_trend: random_trend(rng),
    }
}

/// Placeholder analysis for the offline client; not tied to the route.
pub fn mock_statistics<R: Rng + ?Sized>(rng: &mut R) -> PriceStatistics {
    let average_price = rng.gen_range(300..=800);
    let low = rng.gen_range(250..=450);
    let high = rng.gen_range(450..=750);

    PriceStatistics {
        average_price,
        price_range: format!("${}-${}", low, high),
        best_time_to_book: "2-3 months in advance".to_string(),
        cheapest_month: random_month(rng),
        price_insight: DEFAULT_INSIGHT.to_string(),
        price_trend: random_trend(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farewatch_catalog::PricingConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_local_statistics_for_known_route() {
        let engine = PricingEngine::new(PricingConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let stats = local_statistics(&engine, "dubai", "london", &mut rng);

        assert_eq!(stats.average_price, 700);
        assert_eq!(stats.price_range, "$560-$840");
        assert_eq!(stats.range_bounds(), Some((560, 840)));
        assert!(MONTHS.contains(&stats.cheapest_month.as_str()));
        assert_eq!(stats.price_insight, DEFAULT_INSIGHT);
    }

    #[test]
    fn test_mock_statistics_bounds() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let stats = mock_statistics(&mut rng);
            assert!((300..=800).contains(&stats.average_price));
            let (low, high) = stats.range_bounds().unwrap();
            assert!((250..=450).contains(&low) && (450..=750).contains(&high));
        }
    }
}
