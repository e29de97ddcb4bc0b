//! Landing-page market data: popular route cards and the live price ticker.

use rand::Rng;
use serde::Serialize;

use farewatch_core::airports::airport_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularRoute {
    pub id: u32,
    pub from: String,
    pub from_code: String,
    pub to: String,
    pub to_code: String,
    pub average_price: i32,
    pub currency: String,
    pub trend: Direction,
    pub percent: u8,
    pub popularity: String,
}

/// Curated route cards.
pub fn popular_routes() -> Vec<PopularRoute> {
    let rows = [
        ("Dubai", "London", 650, Direction::Down, 8, "Very High"),
        ("New York", "Los Angeles", 320, Direction::Up, 5, "High"),
        ("Dubai", "Mumbai", 280, Direction::Down, 12, "Very High"),
        ("London", "New York", 490, Direction::Up, 3, "High"),
        ("Singapore", "Dubai", 420, Direction::Down, 6, "Medium"),
        ("Dubai", "Bangkok", 380, Direction::Down, 4, "High"),
    ];

    rows.into_iter()
        .zip(1..)
        .map(|((from, to, price, trend, percent, popularity), id)| PopularRoute {
            id,
            from: from.to_string(),
            from_code: airport_code(from),
            to: to.to_string(),
            to_code: airport_code(to),
            average_price: price,
            currency: "USD".to_string(),
            trend,
            percent,
            popularity: popularity.to_string(),
        })
        .collect()
}

/// One ticker entry; `change` is the last jitter step.
#[derive(Debug, Clone, Serialize)]
pub struct LiveFare {
    pub id: u32,
    pub from: String,
    pub to: String,
    pub price: i32,
    pub currency: String,
    pub change: i32,
    pub airline: String,
}

const TICKER_FLOOR: i32 = 50;

fn ticker_baseline() -> Vec<LiveFare> {
    let rows = [
        ("NYC", "LAX", 299, -12, "Delta"),
        ("LHR", "JFK", 450, 15, "British Airways"),
        ("SFO", "TYO", 875, -25, "ANA"),
        ("DXB", "SIN", 420, 8, "Emirates"),
        ("CDG", "MAD", 120, -5, "Air France"),
        ("SYD", "HKG", 510, 22, "Cathay Pacific"),
        ("BOS", "ORD", 175, -8, "United"),
        ("MIA", "MEX", 280, 10, "American"),
        ("SEA", "YVR", 110, -3, "Alaska"),
        ("ATL", "DEN", 220, 7, "Southwest"),
    ];

    rows.into_iter()
        .zip(1..)
        .map(|((from, to, price, change, airline), id)| LiveFare {
            id,
            from: from.to_string(),
            to: to.to_string(),
            price,
            currency: "USD".to_string(),
            change,
            airline: airline.to_string(),
        })
        .collect()
}

/// The ticker after one random step of -15..=14 per fare.
pub fn live_board<R: Rng + ?Sized>(rng: &mut R) -> Vec<LiveFare> {
    ticker_baseline()
        .into_iter()
        .map(|mut fare| {
            let step = rng.gen_range(-15..15);
            fare.price = (fare.price + step).max(TICKER_FLOOR);
            fare.change = step;
            fare
        })
        .collect()
}
