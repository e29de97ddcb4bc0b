//! Carrier rosters offers are drawn from.

use rand::seq::SliceRandom;
use rand::Rng;

/// Roster for offers backed by price statistics.
pub const FULL_ROSTER: [&str; 14] = [
    "American Airlines",
    "Delta",
    "United",
    "British Airways",
    "Emirates",
    "Lufthansa",
    "Air France",
    "KLM",
    "Singapore Airlines",
    "Cathay Pacific",
    "Virgin Atlantic",
    "JetBlue",
    "Southwest",
    "Alaska Airlines",
];

/// Roster for heuristic-only offers.
pub const STANDARD_ROSTER: [&str; 10] = [
    "American Airlines",
    "Delta",
    "United",
    "British Airways",
    "Emirates",
    "Lufthansa",
    "Air France",
    "KLM",
    "Singapore Airlines",
    "Cathay Pacific",
];

/// Roster for the offline client.
pub const COMPACT_ROSTER: [&str; 6] = [
    "American Airlines",
    "Delta",
    "United",
    "British Airways",
    "Emirates",
    "Lufthansa",
];

/// Uniform pick; an empty roster yields an empty name.
pub fn pick<R: Rng + ?Sized>(roster: &[&str], rng: &mut R) -> String {
    roster.choose(rng).map(|a| a.to_string()).unwrap_or_default()
}
