use crate::analyzer::{SLICE_LEN, Section, head, rank_desc, tail};
use crate::model::{EnrichedAsset, EnrichedSnapshot};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct StrengthAlert {
    pub symbol: String,
    /// 24h change minus the market mean.
    pub score: f64,
    pub change_24h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelativeStrengthReport {
    pub outperformers: Vec<StrengthAlert>,
    pub underperformers: Vec<StrengthAlert>,
}

/// Top and bottom three by relative strength. With fewer than six ranked
/// assets the two lists overlap; that is kept as is.
pub fn relative_strength_alerts(snapshot: &EnrichedSnapshot) -> RelativeStrengthReport {
    let ranked = rank_desc(snapshot.assets(), |a| a.metrics.relative_strength_score);
    RelativeStrengthReport {
        outperformers: to_alerts(head(&ranked, SLICE_LEN)),
        underperformers: to_alerts(tail(&ranked, SLICE_LEN)),
    }
}

fn to_alerts(slice: &[(&EnrichedAsset, f64)]) -> Vec<StrengthAlert> {
    slice
        .iter()
        .filter_map(|(asset, score)| {
            asset.record.change_24h.map(|change_24h| StrengthAlert {
                symbol: asset.record.symbol.clone(),
                score: *score,
                change_24h,
            })
        })
        .collect()
}

impl Section for RelativeStrengthReport {
    fn render(&self) -> String {
        let mut message = String::from("💪 *RELATIVE STRENGTH ALERTS*\n");
        if self.outperformers.is_empty() && self.underperformers.is_empty() {
            message.push_str("No 24h change data available\n");
            return message;
        }

        for alert in &self.outperformers {
            let _ = writeln!(
                message,
                "📈 *{}*: Outperforming market by {:.2}% (24h change: {:.2}%)",
                alert.symbol, alert.score, alert.change_24h
            );
        }
        for alert in &self.underperformers {
            let _ = writeln!(
                message,
                "📉 *{}*: Underperforming market by {:.2}% (24h change: {:.2}%)",
                alert.symbol,
                alert.score.abs(),
                alert.change_24h
            );
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::enrich;
    use crate::model::asset;

    fn symbols(alerts: &[StrengthAlert]) -> Vec<&str> {
        alerts.iter().map(|a| a.symbol.as_str()).collect()
    }

    #[test]
    fn picks_top_and_bottom_three() {
        let report = relative_strength_alerts(&enrich(vec![
            asset("A", 1.0, (None, Some(1.0), None), 1e9, 1e6),
            asset("B", 1.0, (None, Some(6.0), None), 1e9, 1e6),
            asset("C", 1.0, (None, Some(-3.0), None), 1e9, 1e6),
            asset("D", 1.0, (None, Some(4.0), None), 1e9, 1e6),
            asset("E", 1.0, (None, Some(-8.0), None), 1e9, 1e6),
            asset("F", 1.0, (None, Some(0.0), None), 1e9, 1e6),
            asset("G", 1.0, (None, Some(2.0), None), 1e9, 1e6),
        ]));
        assert_eq!(symbols(&report.outperformers), ["B", "D", "G"]);
        assert_eq!(symbols(&report.underperformers), ["F", "C", "E"]);
    }

    #[test]
    fn single_asset_appears_in_both_lists() {
        let report = relative_strength_alerts(&enrich(vec![asset("SOLO", 1.0, (None, Some(5.0), None), 1e9, 1e6)]));
        assert_eq!(symbols(&report.outperformers), ["SOLO"]);
        assert_eq!(symbols(&report.underperformers), ["SOLO"]);
        assert_eq!(
            report.render(),
            "💪 *RELATIVE STRENGTH ALERTS*\n\
             📈 *SOLO*: Outperforming market by 0.00% (24h change: 5.00%)\n\
             📉 *SOLO*: Underperforming market by 0.00% (24h change: 5.00%)\n"
        );
    }

    #[test]
    fn underperformance_is_shown_as_magnitude() {
        let report = relative_strength_alerts(&enrich(vec![
            asset("AAA", 100.0, (Some(0.5), Some(12.0), Some(5.0)), 1e9, 5e7),
            asset("BBB", 1.0, (Some(-1.0), Some(-10.0), Some(-8.0)), 1e8, 1e8),
        ]));
        let rendered = report.render();
        assert!(rendered.contains("📉 *BBB*: Underperforming market by 11.00% (24h change: -10.00%)"));
        assert!(rendered.contains("📈 *AAA*: Outperforming market by 11.00% (24h change: 12.00%)"));
    }

    #[test]
    fn assets_without_24h_change_are_not_ranked() {
        let report = relative_strength_alerts(&enrich(vec![
            asset("A", 1.0, (None, Some(1.0), None), 1e9, 1e6),
            asset("N", 1.0, (None, None, None), 1e9, 1e6),
        ]));
        assert_eq!(symbols(&report.outperformers), ["A"]);
        assert_eq!(symbols(&report.underperformers), ["A"]);

        let empty = relative_strength_alerts(&enrich(vec![asset("N", 1.0, (None, None, None), 1e9, 1e6)]));
        assert!(empty.render().ends_with("No 24h change data available\n"));
    }
}
