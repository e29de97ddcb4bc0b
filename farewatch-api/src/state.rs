use std::sync::Arc;

use farewatch_catalog::{PricingConfig, PricingEngine};
use farewatch_core::FieldExtractor;
use farewatch_offer::{Enricher, FlightAssistant, OfferGenerator};
use farewatch_store::{Config, GeminiClient};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<FlightAssistant>,
    /// Pins every request's random draws when set.
    pub rng_seed: Option<u64>,
}

impl AppState {
    pub fn new(assistant: Arc<FlightAssistant>, rng_seed: Option<u64>) -> Self {
        Self { assistant, rng_seed }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let extractor = FieldExtractor::new(config.assistant.fill_policy()?);
        let generator = OfferGenerator::new(PricingEngine::new(PricingConfig::default()));
        let mut assistant = FlightAssistant::new(extractor, generator)
            .with_history_window(config.assistant.history_window);

        match GeminiClient::from_config(&config.gemini)? {
            Some(client) => {
                let enricher = Enricher::new(Arc::new(client), config.gemini.timeout());
                tracing::info!(model = enricher.model(), "Gemini enrichment enabled");
                assistant = assistant.with_enricher(enricher);
            }
            None => tracing::warn!("Gemini API key not configured. Using fallback method."),
        }

        Ok(Self::new(Arc::new(assistant), config.assistant.rng_seed))
    }

    /// Fresh generator for one request.
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
