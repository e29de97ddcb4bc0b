//! Canned assistant replies for when no model answer is available.

pub const UNPROCESSABLE: &str = "I couldn't process your message. Please try again.";

pub const SERVICE_UNAVAILABLE: &str =
    "I'm having trouble connecting to the flight data service. Please try again later.";

pub const BACKUP_NOTICE: &str =
    "I'm having trouble connecting to the flight data service. I'll use my backup system instead.";

pub const BOOKING_WINDOW: &str = "The best time to book flights is typically 1-3 months in advance for domestic flights and 2-8 months for international flights. Tuesday and Wednesday are often the cheapest days to fly, while Friday and Sunday tend to be more expensive.";

pub const CANCELLATION: &str = "Most airlines allow you to cancel your flight within 24 hours of booking for a full refund. After that, cancellation policies vary by airline and fare type. Some tickets are non-refundable but may be eligible for airline credit.";

pub const BAGGAGE: &str = "Baggage allowances vary by airline and ticket class. Most airlines allow one carry-on bag and one personal item for free. Checked baggage fees typically range from $30-$60 per bag, with weight limits around 50 pounds (23 kg).";

pub const DEFAULT: &str = "I can help you track flight prices. Please let me know your departure city, destination, and approximate travel dates. For example: 'Find flights from New York to London for next month'";

/// Short form used by the offline client.
pub const DEFAULT_SHORT: &str = "I can help you track flight prices. Please let me know your departure city, destination, and approximate travel dates.";

/// Pick a canned reply by keyword; `fallback` covers everything else.
pub fn canned_reply_or(message: &str, fallback: &'static str) -> &'static str {
    let lower = message.to_lowercase();

    if lower.contains("cheap") || lower.contains("best time") {
        BOOKING_WINDOW
    } else if lower.contains("cancel") {
        CANCELLATION
    } else if lower.contains("baggage") || lower.contains("luggage") {
        BAGGAGE
    } else {
        fallback
    }
}

pub fn canned_reply(message: &str) -> &'static str {
    canned_reply_or(message, DEFAULT)
}
