pub mod models;

pub use models::chat::{ChatMessage, ChatReply, ChatTurn, Conversation, Role};
pub use models::flight::{FlightOffer, FlightQueryIntent, PriceStatistics, PriceTrend};
