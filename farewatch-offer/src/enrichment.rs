//! Language-model enrichment: prompts, bounded calls and best-effort parsing
//! of the model's JSON.

use std::sync::Arc;
use std::time::Duration;

use farewatch_core::airports::display_name;
use farewatch_core::{CompletionError, CompletionRequest, TextCompletion};
use farewatch_shared::{ChatTurn, FlightQueryIntent, PriceStatistics, PriceTrend, Role};
use serde_json::{Map, Value};

pub const EXTRACTION_TEMPERATURE: f32 = 0.1;
pub const PRICING_TEMPERATURE: f32 = 0.2;
pub const CHAT_TEMPERATURE: f32 = 0.7;
pub const CHAT_MAX_OUTPUT_TOKENS: u32 = 500;

const PERSONA: &str = "You are a helpful flight price tracking assistant. You help users find the best flight deals and provide information about air travel.
Keep your responses concise, informative, and focused on helping the user with their travel plans.
If the user is asking about flights but you don't have specific price data, suggest they provide origin and destination cities.";

// ============================================================================
// Prompts
// ============================================================================

pub fn extraction_prompt(message: &str) -> String {
    format!(
        r#"Extract flight information from this message: "{message}"
Return a JSON object with the following fields:
- from: departure city or airport code
- to: destination city or airport code
- date: travel date or period (if mentioned)

If any field is not found, set it to null.
Only return the JSON object, nothing else."#
    )
}

pub fn pricing_prompt(from: &str, to: &str, date: Option<&str>) -> String {
    let period = date.map(|d| format!(" during {}", d)).unwrap_or_default();
    format!(
        r#"You are a flight price prediction expert. Based on historical data and current trends:

What is the average price for flights from {from} to {to}{period}?

Provide the following information in JSON format:
- averagePrice: the average price in USD
- priceRange: the typical price range (e.g. "400-600 USD")
- bestTimeToBook: when is the best time to book this flight
- cheapestMonth: the cheapest month to fly this route
- priceInsight: a brief insight about this route's pricing
- priceTrend: whether prices are "rising", "falling", or "stable"

Only return the JSON object, nothing else."#
    )
}

/// Persona, the tail of the transcript (excluding the message being
/// answered), then the message.
pub fn conversation_prompt(history: &[ChatTurn], message: &str) -> String {
    let mut prompt = String::from(PERSONA);

    if !history.is_empty() {
        prompt.push_str("\n\nConversation so far:");
        for turn in history {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            prompt.push_str(&format!("\n{}: {}", speaker, turn.content));
        }
    }

    prompt.push_str(&format!("\n\nUser: {}", message));
    prompt
}

// ============================================================================
// Parsing
// ============================================================================

/// Drop markdown code-fence markers around a model answer.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```JSON", "").replace("```", "").trim().to_string()
}

/// Read a JSON object out of model text: fences stripped first, then the
/// outermost `{...}` slice as a second try.
pub fn parse_json_object(text: &str) -> Option<Map<String, Value>> {
    let cleaned = strip_code_fences(text);

    let parsed = serde_json::from_str::<Value>(&cleaned).ok().or_else(|| {
        let start = cleaned.find('{')?;
        let end = cleaned.rfind('}')?;
        (start < end).then(|| serde_json::from_str::<Value>(&cleaned[start..=end]).ok()).flatten()
    })?;

    match parsed {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn price_field(map: &Map<String, Value>, key: &str) -> Option<i32> {
    let price = match map.get(key)? {
        Value::Number(n) => n.as_f64().map(|v| v.round() as i32),
        Value::String(s) => {
            let digits: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
                .filter(|c| *c != ',')
                .collect();
            digits.parse::<f64>().ok().map(|v| v.round() as i32)
        }
        _ => None,
    };
    price.filter(|price| *price > 0)
}

fn range_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) if items.len() == 2 => {
            let low = items[0].as_f64()?;
            let high = items[1].as_f64()?;
            Some(format!("{}-{} USD", low.round(), high.round()))
        }
        Value::Object(bounds) => {
            let low = bounds.get("min")?.as_f64()?;
            let high = bounds.get("max")?.as_f64()?;
            Some(format!("{}-{} USD", low.round(), high.round()))
        }
        _ => None,
    }
}

/// `{from, to, date}` out of the extraction answer; `None` when the text is
/// not a JSON object.
pub fn parse_intent(text: &str) -> Option<FlightQueryIntent> {
    let map = parse_json_object(text)?;
    Some(FlightQueryIntent::new(
        string_field(&map, "from"),
        string_field(&map, "to"),
        string_field(&map, "date"),
    ))
}

/// Pricing answer merged over `fallback`: every field the model gave wins,
/// the rest come from `fallback`. `None` when the text is not a JSON object.
pub fn parse_statistics(text: &str, fallback: &PriceStatistics) -> Option<PriceStatistics> {
    let map = parse_json_object(text)?;
    let non_blank = |key: &str| string_field(&map, key).filter(|s| !s.trim().is_empty());

    Some(PriceStatistics {
        average_price: price_field(&map, "averagePrice").unwrap_or(fallback.average_price),
        price_range: range_field(&map, "priceRange").unwrap_or_else(|| fallback.price_range.clone()),
        best_time_to_book: non_blank("bestTimeToBook").unwrap_or_else(|| fallback.best_time_to_book.clone()),
        cheapest_month: non_blank("cheapestMonth").unwrap_or_else(|| fallback.cheapest_month.clone()),
        price_insight: non_blank("priceInsight").unwrap_or_else(|| fallback.price_insight.clone()),
        price_trend: non_blank("priceTrend")
            .map(|t| PriceTrend::parse(&t))
            .unwrap_or(fallback.price_trend),
    })
}

// ============================================================================
// Client
// ============================================================================

/// Wraps a completion backend with a hard per-call timeout.
#[derive(Clone)]
pub struct Enricher {
    backend: Arc<dyn TextCompletion>,
    timeout: Duration,
}

impl Enricher {
    pub fn new(backend: Arc<dyn TextCompletion>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    async fn call(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let text = tokio::time::timeout(self.timeout, self.backend.complete(request))
            .await
            .map_err(|_| CompletionError::Timeout(self.timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// `Ok(None)` means the model answered but not with readable JSON.
    pub async fn extract_intent(&self, message: &str) -> Result<Option<FlightQueryIntent>, CompletionError> {
        let text = self
            .call(CompletionRequest::new(extraction_prompt(message), EXTRACTION_TEMPERATURE))
            .await?;

        let intent = parse_intent(&text);
        if intent.is_none() {
            tracing::warn!(response = %text, "Failed to parse flight info JSON");
        }
        Ok(intent)
    }

    /// `Ok(None)` means the model answered but not with readable JSON.
    pub async fn price_statistics(
        &self,
        from: &str,
        to: &str,
        date: Option<&str>,
        fallback: &PriceStatistics,
    ) -> Result<Option<PriceStatistics>, CompletionError> {
        let prompt = pricing_prompt(&display_name(from), &display_name(to), date);
        let text = self.call(CompletionRequest::new(prompt, PRICING_TEMPERATURE)).await?;

        let stats = parse_statistics(&text, fallback);
        if stats.is_none() {
            tracing::warn!(response = %text, "Failed to parse price JSON");
        }
        Ok(stats)
    }

    pub async fn converse(&self, history: &[ChatTurn], message: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest::new(conversation_prompt(history, message), CHAT_TEMPERATURE)
            .with_max_output_tokens(CHAT_MAX_OUTPUT_TOKENS);
        self.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn fallback() -> PriceStatistics {
        PriceStatistics {
            average_price: 500,
            price_range: "$400-$600".to_string(),
            best_time_to_book: "1-3 months in advance".to_string(),
            cheapest_month: "May".to_string(),
            price_insight: "Prices vary based on season and demand".to_string(),
            price_trend: PriceTrend::Stable,
        }
    }

    struct Recorder {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl TextCompletion for Recorder {
        fn model(&self) -> &str {
            "recorder"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    struct Sleeper;

    #[async_trait]
    impl TextCompletion for Sleeper {
        fn model(&self) -> &str {
            "sleeper"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("{}".to_string())
        }
    }

    #[test]
    fn test_fenced_json_intent() {
        let text = "```json\n{\"from\": \"Dubai\", \"to\": \"London\", \"date\": null}\n```";
        let intent = parse_intent(text).unwrap();
        assert_eq!(intent.from.as_deref(), Some("Dubai"));
        assert_eq!(intent.to.as_deref(), Some("London"));
        assert_eq!(intent.date, None);
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let text = "Sure! Here it is: {\"from\": \"Paris\", \"to\": \"Rome\", \"date\": \"May\"} Hope that helps.";
        let intent = parse_intent(text).unwrap();
        assert!(intent.is_complete());
        assert_eq!(intent.date.as_deref(), Some("May"));
    }

    #[test]
    fn test_non_json_is_rejected() {
        assert!(parse_intent("I could not find any cities.").is_none());
        assert!(parse_intent("[1, 2, 3]").is_none());
        assert!(parse_statistics("no idea", &fallback()).is_none());
    }

    #[test]
    fn test_statistics_merge_missing_fields() {
        let text = r#"{"averagePrice": "$712", "priceTrend": "Rising", "priceInsight": ""}"#;
        let stats = parse_statistics(text, &fallback()).unwrap();

        assert_eq!(stats.average_price, 712);
        assert_eq!(stats.price_trend, PriceTrend::Rising);
        assert_eq!(stats.price_range, "$400-$600");
        assert_eq!(stats.price_insight, "Prices vary based on season and demand");
    }

    #[test]
    fn test_statistics_range_shapes() {
        let stats = parse_statistics(r#"{"priceRange": [450, 900]}"#, &fallback()).unwrap();
        assert_eq!(stats.range_bounds(), Some((450, 900)));

        let stats = parse_statistics(r#"{"priceRange": {"min": 300, "max": 420}}"#, &fallback()).unwrap();
        assert_eq!(stats.range_bounds(), Some((300, 420)));
    }

    #[test]
    fn test_conversation_prompt_layout() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("Hello! Where to?")];
        let prompt = conversation_prompt(&history, "what about baggage?");

        assert!(prompt.starts_with("You are a helpful flight price tracking assistant."));
        assert!(prompt.contains("\nUser: hi\nAssistant: Hello! Where to?"));
        assert!(prompt.ends_with("User: what about baggage?"));
        assert!(!conversation_prompt(&[], "x").contains("Conversation so far"));
    }

    #[tokio::test]
    async fn test_calls_carry_temperatures() {
        let recorder = Arc::new(Recorder {
            reply: r#"{"from": "dubai", "to": "london", "date": null}"#.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let enricher = Enricher::new(recorder.clone(), Duration::from_secs(5));

        enricher.extract_intent("dubai to london").await.unwrap();
        enricher.converse(&[], "hello").await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].temperature, EXTRACTION_TEMPERATURE);
        assert!(seen[0].prompt.contains("\"dubai to london\""));
        assert_eq!(seen[1].temperature, CHAT_TEMPERATURE);
        assert_eq!(seen[1].max_output_tokens, Some(CHAT_MAX_OUTPUT_TOKENS));
    }

    #[tokio::test]
    async fn test_pricing_prompt_uses_display_names() {
        let recorder = Arc::new(Recorder {
            reply: "not json".to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let enricher = Enricher::new(recorder.clone(), Duration::from_secs(5));

        let stats = enricher
            .price_statistics("new york", "london", Some("next month"), &fallback())
            .await
            .unwrap();
        assert!(stats.is_none());

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].temperature, PRICING_TEMPERATURE);
        assert!(seen[0].prompt.contains("from New York to London during next month?"));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let enricher = Enricher::new(Arc::new(Sleeper), Duration::from_millis(50));
        let result = enricher.extract_intent("dubai to london").await;
        assert!(matches!(result, Err(CompletionError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_blank_answer_is_an_error() {
        let enricher = Enricher::new(
            Arc::new(Recorder { reply: "   ".to_string(), seen: Mutex::new(Vec::new()) }),
            Duration::from_secs(5),
        );
        assert!(matches!(enricher.converse(&[], "hi").await, Err(CompletionError::EmptyResponse)));
    }
}
