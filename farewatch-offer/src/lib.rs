pub mod assistant;
pub mod enrichment;
pub mod generator;
pub mod local;
pub mod statistics;

pub use assistant::FlightAssistant;
pub use enrichment::Enricher;
pub use generator::{OfferError, OfferGenerator};
pub use local::LocalFallback;
