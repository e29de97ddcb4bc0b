pub mod airlines;
pub mod market;
pub mod pricing;

pub use market::{LiveFare, PopularRoute};
pub use pricing::{PricingConfig, PricingEngine, Region};
