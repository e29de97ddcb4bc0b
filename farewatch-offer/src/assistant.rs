use chrono::NaiveDate;
use farewatch_core::airports::display_name;
use farewatch_core::{is_flight_query, replies, FieldExtractor};
use farewatch_shared::{ChatReply, ChatTurn, FlightQueryIntent, PriceStatistics};
use rand::Rng;

use crate::enrichment::Enricher;
use crate::generator::{OfferError, OfferGenerator};
use crate::statistics::local_statistics;

/// Turns kept in the conversational prompt unless configured otherwise.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Chat pipeline: classify the last message, extract a route, price it and
/// phrase the answer. The enrichment backend is optional; without it every
/// stage runs locally.
pub struct FlightAssistant {
    extractor: FieldExtractor,
    generator: OfferGenerator,
    enricher: Option<Enricher>,
    history_window: usize,
}

impl FlightAssistant {
    pub fn new(extractor: FieldExtractor, generator: OfferGenerator) -> Self {
        Self {
            extractor,
            generator,
            enricher: None,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_enricher(mut self, enricher: Enricher) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_history_window(mut self, turns: usize) -> Self {
        self.history_window = turns;
        self
    }

    /// Answer the last turn of `turns`. `today` anchors the synthesized
    /// travel dates; all random draws come from `rng`.
    pub async fn respond<R: Rng + Send + ?Sized>(
        &self,
        turns: &[ChatTurn],
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<ChatReply, OfferError> {
        let Some((last, history)) = turns.split_last() else {
            return Ok(ChatReply::text(replies::UNPROCESSABLE));
        };

        let message = last.content.trim();
        if message.is_empty() {
            return Ok(ChatReply::text(replies::UNPROCESSABLE));
        }

        if is_flight_query(message) {
            let reply = match &self.enricher {
                None => {
                    tracing::info!("No completion backend configured, using local extraction");
                    self.local_offers(message, today, rng)?
                }
                Some(enricher) => self.enriched_offers(enricher, message, today, rng).await?,
            };
            if let Some(reply) = reply {
                return Ok(reply);
            }
            tracing::info!("Flight query without a complete route, answering conversationally");
        }

        Ok(self.converse(history, message).await)
    }

    /// Regex extraction and heuristic pricing. `None` when no route is found.
    fn local_offers<R: Rng + ?Sized>(
        &self,
        message: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Option<ChatReply>, OfferError> {
        let intent = self.extractor.extract(message);
        let Some((from, to)) = intent.route() else {
            return Ok(None);
        };

        let offers = self.generator.generate_heuristic(from, to, today, rng)?;
        let content = format!(
            "I've found some flights from {} to {}{}. Here are the best options I could find:",
            display_name(from),
            display_name(to),
            date_suffix(&intent),
        );
        Ok(Some(ChatReply::text(content).with_offers(offers)))
    }

    async fn enriched_offers<R: Rng + Send + ?Sized>(
        &self,
        enricher: &Enricher,
        message: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<Option<ChatReply>, OfferError> {
        // 1. Extraction: model first, regex when the answer is unreadable
        let intent = match enricher.extract_intent(message).await {
            Ok(Some(intent)) => intent,
            Ok(None) => self.extractor.extract(message),
            Err(e) => {
                tracing::warn!(error = %e, "Extraction call failed, falling back to local offers");
                return self.local_offers(message, today, rng);
            }
        };

        let Some((from, to)) = intent.route() else {
            return Ok(None);
        };

        // 2. Pricing analysis, merged over local statistics
        let local = local_statistics(self.generator.pricing(), from, to, rng);
        let priced = enricher.price_statistics(from, to, intent.date.as_deref(), &local).await;
        let stats = match priced {
            Ok(Some(stats)) => stats,
            Ok(None) => local,
            Err(e) => {
                tracing::warn!(error = %e, "Pricing call failed, using local statistics");
                local
            }
        };

        // 3. Offers and narrative
        let offers = self.generator.generate_from_statistics(from, to, &stats, today, rng)?;
        tracing::info!(from, to, average = stats.average_price, "Priced route");

        let content = analysis_narrative(&intent, &stats);
        Ok(Some(ChatReply::text(content).with_offers(offers).with_statistics(stats)))
    }

    async fn converse(&self, history: &[ChatTurn], message: &str) -> ChatReply {
        if let Some(enricher) = &self.enricher {
            let window = &history[history.len().saturating_sub(self.history_window)..];
            match enricher.converse(window, message).await {
                Ok(text) => return ChatReply::text(text),
                Err(e) => tracing::warn!(error = %e, "Conversational call failed, using canned reply"),
            }
        }
        ChatReply::text(replies::canned_reply(message))
    }
}

fn date_suffix(intent: &FlightQueryIntent) -> String {
    intent.date.as_deref().map(|d| format!(" for {}", d)).unwrap_or_default()
}

fn analysis_narrative(intent: &FlightQueryIntent, stats: &PriceStatistics) -> String {
    let (from, to) = intent.route().unwrap_or_default();
    format!(
        "I've analyzed flights from {} to {}{}. The average price is around ${}, with prices typically ranging from {}. {} The best time to book is {}, and prices are currently {}.",
        display_name(from),
        display_name(to),
        date_suffix(intent),
        stats.average_price,
        stats.price_range,
        stats.price_insight,
        stats.best_time_to_book,
        stats.price_trend,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use farewatch_catalog::{PricingConfig, PricingEngine};
    use farewatch_core::{CompletionError, CompletionRequest, TextCompletion};
    use farewatch_shared::PriceTrend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn local_assistant() -> FlightAssistant {
        FlightAssistant::new(
            FieldExtractor::default(),
            OfferGenerator::new(PricingEngine::new(PricingConfig::default())),
        )
    }

    /// Answers by prompt kind; `None` in a slot means that call fails.
    struct Scripted {
        extraction: Option<&'static str>,
        pricing: Option<&'static str>,
        chat: Option<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(extraction: Option<&'static str>, pricing: Option<&'static str>, chat: Option<&'static str>) -> Self {
            Self { extraction, pricing, chat, prompts: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl TextCompletion for Scripted {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let slot = if request.prompt.starts_with("Extract flight information") {
                self.extraction
            } else if request.prompt.starts_with("You are a flight price prediction expert") {
                self.pricing
            } else {
                self.chat
            };
            slot.map(str::to_string)
                .ok_or_else(|| CompletionError::Transport("connection refused".to_string()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl TextCompletion for Stalled {
        fn model(&self) -> &str {
            "stalled"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(String::new())
        }
    }

    fn enriched(backend: Arc<dyn TextCompletion>) -> FlightAssistant {
        local_assistant().with_enricher(Enricher::new(backend, Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_local_offers_for_known_route() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = local_assistant()
            .respond(&[ChatTurn::user("Find flights from Dubai to London")], today(), &mut rng)
            .await
            .unwrap();

        let offers = reply.flight_prices.unwrap();
        assert_eq!(offers.len(), 4);
        assert!(offers.iter().all(|o| o.from.starts_with("Dubai (DXB)")));
        assert!(offers.iter().all(|o| o.to.starts_with("London (LHR)")));
        assert!(reply.content.starts_with("I've found some flights from Dubai to London."));
        assert!(reply.price_data.is_none());
    }

    #[tokio::test]
    async fn test_greeting_gets_default_reply() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = local_assistant().respond(&[ChatTurn::user("hello")], today(), &mut rng).await.unwrap();

        assert_eq!(reply.content, replies::DEFAULT);
        assert!(reply.flight_prices.is_none());
    }

    #[tokio::test]
    async fn test_empty_conversation() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = local_assistant().respond(&[], today(), &mut rng).await.unwrap();
        assert_eq!(reply.content, replies::UNPROCESSABLE);

        let reply = local_assistant().respond(&[ChatTurn::user("   ")], today(), &mut rng).await.unwrap();
        assert_eq!(reply.content, replies::UNPROCESSABLE);
    }

    #[tokio::test]
    async fn test_incomplete_route_falls_through() {
        let assistant = FlightAssistant::new(
            FieldExtractor::new(farewatch_core::FillPolicy::Clarify),
            OfferGenerator::new(PricingEngine::new(PricingConfig::default())),
        );
        let mut rng = StdRng::seed_from_u64(1);
        let reply = assistant.respond(&[ChatTurn::user("any cheap flight?")], today(), &mut rng).await.unwrap();

        assert_eq!(reply.content, replies::BOOKING_WINDOW);
        assert!(reply.flight_prices.is_none());
    }

    #[tokio::test]
    async fn test_enriched_flow() {
        let backend = Arc::new(Scripted::new(
            Some("```json\n{\"from\": \"Dubai\", \"to\": \"London\", \"date\": \"December\"}\n```"),
            Some(r#"{"averagePrice": 720, "priceRange": "600-850 USD", "bestTimeToBook": "6 weeks ahead",
                    "cheapestMonth": "February", "priceInsight": "Holiday demand peaks.", "priceTrend": "falling"}"#),
            None,
        ));
        let mut rng = StdRng::seed_from_u64(3);
        let reply = enriched(backend)
            .respond(&[ChatTurn::user("flights dubai to london in december")], today(), &mut rng)
            .await
            .unwrap();

        let stats = reply.price_data.unwrap();
        assert_eq!(stats.average_price, 720);
        assert_eq!(stats.price_trend, PriceTrend::Falling);

        let offers = reply.flight_prices.unwrap();
        assert_eq!(offers.len(), 4);
        assert!(offers.iter().all(|o| (600..=850).contains(&o.price) && o.price_change() <= 0));
        assert_eq!(
            reply.content,
            "I've analyzed flights from Dubai to London for December. The average price is around $720, \
             with prices typically ranging from 600-850 USD. Holiday demand peaks. The best time to book is \
             6 weeks ahead, and prices are currently falling."
        );
    }

    #[tokio::test]
    async fn test_malformed_extraction_uses_regex() {
        let backend = Arc::new(Scripted::new(Some("Sorry, I can't do that."), Some("{}"), None));
        let mut rng = StdRng::seed_from_u64(5);
        let reply = enriched(backend)
            .respond(&[ChatTurn::user("Find flights from Paris to Rome")], today(), &mut rng)
            .await
            .unwrap();

        let offers = reply.flight_prices.unwrap();
        assert_eq!(offers.len(), 4);
        assert!(offers[0].from.starts_with("Paris (CDG)"));
        // Empty pricing object: every field comes from the local statistics.
        assert_eq!(reply.price_data.unwrap().best_time_to_book, "1-3 months in advance");
    }

    #[tokio::test]
    async fn test_partial_pricing_is_merged() {
        let backend = Arc::new(Scripted::new(
            Some(r#"{"from": "new york", "to": "london", "date": null}"#),
            Some(r#"{"averagePrice": 640, "priceTrend": "rising"}"#),
            None,
        ));
        let mut rng = StdRng::seed_from_u64(8);
        let reply = enriched(backend)
            .respond(&[ChatTurn::user("flight new york to london")], today(), &mut rng)
            .await
            .unwrap();

        let stats = reply.price_data.unwrap();
        assert_eq!(stats.average_price, 640);
        assert_eq!(stats.price_trend, PriceTrend::Rising);
        assert_eq!(stats.price_range, "$480-$720");
        assert_eq!(stats.best_time_to_book, "1-3 months in advance");
    }

    #[tokio::test]
    async fn test_pricing_failure_keeps_remote_intent() {
        let backend = Arc::new(Scripted::new(
            Some(r#"{"from": "Tokyo", "to": "Sydney", "date": null}"#),
            None,
            None,
        ));
        let mut rng = StdRng::seed_from_u64(13);
        let reply = enriched(backend)
            .respond(&[ChatTurn::user("I want to fly somewhere warm")], today(), &mut rng)
            .await
            .unwrap();

        let offers = reply.flight_prices.unwrap();
        assert!(offers[0].from.starts_with("Tokyo (NRT)"));
        assert!(reply.price_data.is_some());
    }

    #[tokio::test]
    async fn test_extraction_error_takes_local_path() {
        let backend = Arc::new(Scripted::new(None, None, None));
        let mut rng = StdRng::seed_from_u64(2);
        let reply = enriched(backend)
            .respond(&[ChatTurn::user("Find flights from Dubai to London")], today(), &mut rng)
            .await
            .unwrap();

        assert!(reply.content.starts_with("I've found some flights"));
        assert_eq!(reply.flight_prices.unwrap().len(), 4);
        assert!(reply.price_data.is_none());
    }

    #[tokio::test]
    async fn test_timeout_takes_local_path() {
        let assistant = local_assistant().with_enricher(Enricher::new(Arc::new(Stalled), Duration::from_millis(50)));
        let mut rng = StdRng::seed_from_u64(2);
        let reply = assistant
            .respond(&[ChatTurn::user("Find flights from Dubai to London")], today(), &mut rng)
            .await
            .unwrap();

        assert_eq!(reply.flight_prices.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_conversational_reply_with_history() {
        let backend = Arc::new(Scripted::new(None, None, Some("Happy to help with your trip!")));
        let assistant = enriched(backend.clone()).with_history_window(2);
        let turns = vec![
            ChatTurn::user("first"),
            ChatTurn::assistant("second"),
            ChatTurn::user("third"),
            ChatTurn::assistant("fourth"),
            ChatTurn::user("hello"),
        ];
        let mut rng = StdRng::seed_from_u64(2);
        let reply = assistant.respond(&turns, today(), &mut rng).await.unwrap();

        assert_eq!(reply.content, "Happy to help with your trip!");
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("User: third\nAssistant: fourth"));
        assert!(!prompts[0].contains("second"));
    }

    #[tokio::test]
    async fn test_conversational_failure_uses_canned_reply() {
        let backend = Arc::new(Scripted::new(None, None, Some("   ")));
        let mut rng = StdRng::seed_from_u64(2);
        let reply = enriched(backend)
            .respond(&[ChatTurn::user("what about baggage?")], today(), &mut rng)
            .await
            .unwrap();

        assert_eq!(reply.content, replies::BAGGAGE);
    }
}
