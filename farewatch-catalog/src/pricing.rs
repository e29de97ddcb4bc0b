use std::collections::HashMap;

use farewatch_core::airports::normalize_city;
use farewatch_shared::PriceStatistics;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Coarse regions used to guess whether a route is short-haul.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    UnitedStates,
    Europe,
    Asia,
    Australia,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Known base fares keyed by `"origin-destination"` (lower-case).
    pub route_fares: HashMap<String, i32>,

    /// Cities per region.
    pub regions: Vec<(Region, Vec<String>)>,

    /// Base fare band when both cities share a region.
    pub regional_band: (i32, i32),

    /// Base fare band for everything else.
    pub long_haul_band: (i32, i32),

    /// No synthesized fare goes below this.
    pub min_price: i32,

    /// Model-reported prices above this are ignored.
    pub max_fare: i32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let route_fares = [
            ("new york-london", 600),
            ("new york-paris", 650),
            ("new york-los angeles", 350),
            ("london-paris", 150),
            ("los angeles-tokyo", 900),
            ("new york-miami", 250),
            ("chicago-new york", 200),
            ("san francisco-new york", 400),
            ("dubai-london", 700),
            ("singapore-hong kong", 400),
            ("dubai-mumbai", 300),
            ("dubai-new york", 950),
        ]
        .into_iter()
        .map(|(route, fare)| (route.to_string(), fare))
        .collect();

        let cities = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        let regions = vec![
            (
                Region::UnitedStates,
                cities(&[
                    "new york", "los angeles", "chicago", "miami", "san francisco", "boston", "seattle",
                    "atlanta", "denver", "dallas", "houston", "phoenix", "philadelphia",
                ]),
            ),
            (
                Region::Europe,
                cities(&["london", "paris", "berlin", "rome", "madrid", "barcelona", "amsterdam"]),
            ),
            (
                Region::Asia,
                cities(&["tokyo", "singapore", "hong kong", "beijing", "shanghai", "bangkok", "delhi", "mumbai"]),
            ),
            (Region::Australia, cities(&["sydney", "melbourne"])),
        ];

        Self {
            route_fares,
            regions,
            regional_band: (200, 500),
            long_haul_band: (500, 1200),
            min_price: 150,
            max_fare: 50_000,
        }
    }
}

/// Heuristic route pricing. No real fares are consulted.
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Table fare for the pair, checked in both directions.
    pub fn known_fare(&self, from: &str, to: &str) -> Option<i32> {
        let (from, to) = (normalize_city(from), normalize_city(to));
        self.config
            .route_fares
            .get(&format!("{}-{}", from, to))
            .or_else(|| self.config.route_fares.get(&format!("{}-{}", to, from)))
            .copied()
    }

    pub fn region_of(&self, city: &str) -> Option<Region> {
        let city = normalize_city(city);
        self.config
            .regions
            .iter()
            .find(|(_, members)| members.iter().any(|m| *m == city))
            .map(|(region, _)| *region)
    }

    pub fn same_region(&self, a: &str, b: &str) -> bool {
        matches!((self.region_of(a), self.region_of(b)), (Some(ra), Some(rb)) if ra == rb)
    }

    /// Base fare: table value, else a random draw from the regional or
    /// long-haul band.
    pub fn base_price<R: Rng + ?Sized>(&self, from: &str, to: &str, rng: &mut R) -> i32 {
        if let Some(fare) = self.known_fare(from, to) {
            return fare;
        }

        let (low, high) = if self.same_region(from, to) {
            self.config.regional_band
        } else {
            self.config.long_haul_band
        };
        rng.gen_range(low as f64..high as f64).round() as i32
    }

    /// Band offers are drawn from when statistics are available: the parsed
    /// range, else ±20 % around the average, else ±20 % around the route base.
    /// Values outside `1..=max_fare` are skipped.
    pub fn statistics_band<R: Rng + ?Sized>(
        &self,
        stats: &PriceStatistics,
        from: &str,
        to: &str,
        rng: &mut R,
    ) -> (i32, i32) {
        let plausible = |price: i32| price > 0 && price <= self.config.max_fare;

        if let Some((low, high)) = stats.range_bounds() {
            if plausible(low) && plausible(high) {
                return (low, high);
            }
        }

        let center = if plausible(stats.average_price) {
            stats.average_price
        } else {
            self.base_price(from, to, rng)
        };
        spread(center)
    }

    /// Clamp to the configured minimum.
    pub fn apply_floor(&self, price: i32) -> i32 {
        price.max(self.config.min_price)
    }
}

/// ±20 % around a centre price.
pub fn spread(center: i32) -> (i32, i32) {
    let center = center as f64;
    ((center * 0.8).round() as i32, (center * 1.2).round() as i32)
}
