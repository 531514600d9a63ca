use crate::analyzer::{SLICE_LEN, Section, head, rank_desc};
use crate::model::EnrichedSnapshot;
use crate::utils::{format_change, to_billions};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketLeader {
    pub symbol: String,
    pub price: f64,
    pub change_24h: Option<f64>,
}

/// Market-wide totals plus the largest assets by market cap.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOverview {
    pub total_market_cap: f64,
    pub average_change_24h: Option<f64>,
    pub leaders: Vec<MarketLeader>,
}

pub fn market_overview(snapshot: &EnrichedSnapshot) -> MarketOverview {
    let total_market_cap = snapshot.assets().iter().map(|a| a.record.market_cap).sum();

    let ranked = rank_desc(snapshot.assets(), |a| Some(a.record.market_cap));
    let leaders = head(&ranked, SLICE_LEN)
        .iter()
        .map(|(asset, _)| MarketLeader {
            symbol: asset.record.symbol.clone(),
            price: asset.record.price,
            change_24h: asset.record.change_24h,
        })
        .collect();

    MarketOverview {
        total_market_cap,
        average_change_24h: snapshot.mean_change_24h(),
        leaders,
    }
}

impl Section for MarketOverview {
    fn render(&self) -> String {
        let mut message = String::from("📊 *MARKET OVERVIEW*\n");
        let _ = writeln!(message, "Total Market Cap: ${:.2}B", to_billions(self.total_market_cap));
        let _ = writeln!(message, "Average 24h Change: {}", format_change(self.average_change_24h));

        message.push_str("\nTop 3 by Market Cap:\n");
        for leader in &self.leaders {
            let _ = writeln!(
                message,
                "• {}: ${:.2} ({})",
                leader.symbol,
                leader.price,
                format_change(leader.change_24h)
            );
        }
        message
    }
}
