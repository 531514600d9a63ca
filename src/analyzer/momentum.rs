use crate::analyzer::{SLICE_LEN, Section, head, rank_desc, tail};
use crate::model::{EnrichedAsset, EnrichedSnapshot};
use std::fmt::Write;

/// Scores beyond ±this value are reported.
pub const STRONG_MOMENTUM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumDirection {
    StrongPositive,
    StrongNegative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumAlert {
    pub symbol: String,
    pub direction: MomentumDirection,
    pub score: f64,
    pub change_1h: f64,
    pub change_24h: f64,
    pub change_7d: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumReport {
    pub alerts: Vec<MomentumAlert>,
}

/// Looks at the three strongest and three weakest momentum scores and keeps
/// those beyond [`STRONG_MOMENTUM`].
pub fn momentum_alerts(snapshot: &EnrichedSnapshot) -> MomentumReport {
    let ranked = rank_desc(snapshot.assets(), |a| a.metrics.momentum_score);

    let positive = head(&ranked, SLICE_LEN)
        .iter()
        .filter(|(_, score)| *score > STRONG_MOMENTUM)
        .filter_map(|(asset, score)| alert(asset, *score, MomentumDirection::StrongPositive));
    let negative = tail(&ranked, SLICE_LEN)
        .iter()
        .filter(|(_, score)| *score < -STRONG_MOMENTUM)
        .filter_map(|(asset, score)| alert(asset, *score, MomentumDirection::StrongNegative));

    MomentumReport {
        alerts: positive.chain(negative).collect(),
    }
}

fn alert(asset: &EnrichedAsset, score: f64, direction: MomentumDirection) -> Option<MomentumAlert> {
    let record = &asset.record;
    Some(MomentumAlert {
        symbol: record.symbol.clone(),
        direction,
        score,
        change_1h: record.change_1h?,
        change_24h: record.change_24h?,
        change_7d: record.change_7d?,
    })
}

impl Section for MomentumReport {
    fn render(&self) -> String {
        let mut message = String::from("🔄 *MOMENTUM ALERTS*\n");
        if self.alerts.is_empty() {
            message.push_str("No significant momentum patterns detected\n");
            return message;
        }

        for alert in &self.alerts {
            let (icon, label) = match alert.direction {
                MomentumDirection::StrongPositive => ("🚀", "Strong positive momentum"),
                MomentumDirection::StrongNegative => ("🔻", "Strong negative momentum"),
            };
            let _ = writeln!(message, "{} *{}*: {} (Score: {:.2})", icon, alert.symbol, label, alert.score);
            let _ = writeln!(
                message,
                "  1h: {:.2}% | 24h: {:.2}% | 7d: {:.2}%",
                alert.change_1h, alert.change_24h, alert.change_7d
            );
        }
        message
    }
}
