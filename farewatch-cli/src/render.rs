use farewatch_shared::{ChatMessage, FlightOffer, PriceStatistics, Role};

pub fn render(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "farewatch",
    };
    let mut out = format!("{}> {}", speaker, message.content);

    if let Some(offers) = &message.flight_prices {
        for offer in offers {
            out.push('\n');
            out.push_str(&offer_line(offer));
        }
    }
    if let Some(stats) = &message.price_data {
        out.push('\n');
        out.push_str(&statistics_block(stats));
    }
    out
}

fn offer_line(offer: &FlightOffer) -> String {
    let change = offer.price_change();
    let movement = match change {
        0 => "unchanged".to_string(),
        c if c > 0 => format!("up ${}", c),
        c => format!("down ${}", -c),
    };

    let mut line = format!(
        "  {:<18} {} -> {}  {} - {}  ${} {} ({})",
        offer.airline,
        offer.from,
        offer.to,
        offer.depart_date.format("%b %-d"),
        offer.return_date.format("%b %-d, %Y"),
        offer.price,
        offer.currency,
        movement,
    );

    let notes = [&offer.insight, &offer.best_time_to_book, &offer.cheapest_month];
    for note in notes.into_iter().flatten() {
        line.push_str(&format!("\n      * {}", note));
    }
    line
}

fn statistics_block(stats: &PriceStatistics) -> String {
    format!(
        "  average ${} | range {} | book {} | cheapest in {} | trend {}",
        stats.average_price, stats.price_range, stats.best_time_to_book, stats.cheapest_month, stats.price_trend,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use farewatch_shared::ChatReply;

    #[test]
    fn test_offer_rendering() {
        let offer = FlightOffer {
            id: "flight1".to_string(),
            from: "Dubai (DXB)".to_string(),
            to: "London (LHR)".to_string(),
            depart_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2026, 11, 29).unwrap(),
            price: 640,
            previous_price: 660,
            airline: "Emirates".to_string(),
            currency: "USD".to_string(),
            insight: Some("Fares dip midweek".to_string()),
            best_time_to_book: None,
            cheapest_month: None,
        };
        let message = ChatMessage::from_reply(ChatReply::text("Here you go").with_offers(vec![offer]));
        let text = render(&message);

        assert!(text.starts_with("farewatch> Here you go"));
        assert!(text.contains("Dubai (DXB) -> London (LHR)  Nov 20 - Nov 29, 2026  $640 USD (down $20)"));
        assert!(text.contains("* Fares dip midweek"));
    }
}
