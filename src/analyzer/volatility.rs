use crate::analyzer::Section;
use crate::model::EnrichedSnapshot;
use std::fmt::Write;

/// The 24h threshold is this multiple of the 1h threshold.
pub const DAILY_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolatilitySignal {
    /// Carries the confirming 1h move.
    StrongUpward { change_1h: f64 },
    StabilizingAfterSurge,
    StrongDownward,
    PotentialReversal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityAlert {
    pub symbol: String,
    pub signal: VolatilitySignal,
    pub change_1h: Option<f64>,
    pub change_24h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityReport {
    /// Symbols that crossed either threshold, in snapshot order.
    pub flagged: Vec<String>,
    /// One entry per flagged asset whose 24h move crossed the daily threshold.
    pub alerts: Vec<VolatilityAlert>,
}

/// Flags assets whose 1h move exceeds `threshold` or whose 24h move exceeds
/// three times it, and classifies the 24h movers.
///
/// Assets flagged only by their 1h move get no alert line.
pub fn volatility_alerts(snapshot: &EnrichedSnapshot, threshold: f64) -> VolatilityReport {
    let daily = threshold * DAILY_MULTIPLIER;
    let mut flagged = Vec::new();
    let mut alerts = Vec::new();

    for asset in snapshot.assets() {
        let record = &asset.record;
        let hourly_spike = record.change_1h.is_some_and(|c| c.abs() > threshold);
        let daily_spike = record.change_24h.is_some_and(|c| c.abs() > daily);
        if !(hourly_spike || daily_spike) {
            continue;
        }

        flagged.push(record.symbol.clone());
        if let Some((signal, change_24h)) = record
            .change_24h
            .and_then(|c| classify(record.change_1h, c, daily).map(|s| (s, c)))
        {
            alerts.push(VolatilityAlert {
                symbol: record.symbol.clone(),
                signal,
                change_1h: record.change_1h,
                change_24h,
            });
        }
    }

    VolatilityReport { flagged, alerts }
}

/// A missing 1h change never confirms the 24h direction.
pub fn classify(change_1h: Option<f64>, change_24h: f64, daily: f64) -> Option<VolatilitySignal> {
    if change_24h > daily {
        match change_1h {
            Some(change_1h) if change_1h > 0.0 => Some(VolatilitySignal::StrongUpward { change_1h }),
            _ => Some(VolatilitySignal::StabilizingAfterSurge),
        }
    } else if change_24h < -daily {
        if change_1h.is_some_and(|c| c < 0.0) {
            Some(VolatilitySignal::StrongDownward)
        } else {
            Some(VolatilitySignal::PotentialReversal)
        }
    } else {
        None
    }
}

impl Section for VolatilityReport {
    fn render(&self) -> String {
        let mut message = String::from("🚨 *VOLATILITY ALERTS*\n");
        if self.flagged.is_empty() {
            message.push_str("No significant volatility detected\n");
            return message;
        }

        for alert in &self.alerts {
            let _ = match alert.signal {
                VolatilitySignal::StrongUpward { change_1h } => writeln!(
                    message,
                    "⚠️ *{}*: Strong upward momentum (24h: {:.2}%, 1h: {:.2}%)",
                    alert.symbol, alert.change_24h, change_1h
                ),
                VolatilitySignal::StabilizingAfterSurge => writeln!(
                    message,
                    "👀 *{}*: Price stabilizing after surge (24h: {:.2}%)",
                    alert.symbol, alert.change_24h
                ),
                VolatilitySignal::StrongDownward => writeln!(
                    message,
                    "📉 *{}*: Strong downward momentum (24h: {:.2}%)",
                    alert.symbol, alert.change_24h
                ),
                VolatilitySignal::PotentialReversal => writeln!(
                    message,
                    "💡 *{}*: Potential reversal signal (24h: {:.2}%)",
                    alert.symbol, alert.change_24h
                ),
            };
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::enrich;
    use crate::model::asset;

    #[test]
    fn classification_covers_the_four_cases() {
        assert_eq!(
            classify(Some(0.5), 12.0, 9.0),
            Some(VolatilitySignal::StrongUpward { change_1h: 0.5 })
        );
        assert_eq!(classify(Some(0.0), 12.0, 9.0), Some(VolatilitySignal::StabilizingAfterSurge));
        assert_eq!(classify(Some(-1.0), -10.0, 9.0), Some(VolatilitySignal::StrongDownward));
        assert_eq!(classify(Some(0.0), -10.0, 9.0), Some(VolatilitySignal::PotentialReversal));
        assert_eq!(classify(Some(5.0), 9.0, 9.0), None);
        assert_eq!(classify(None, 12.0, 9.0), Some(VolatilitySignal::StabilizingAfterSurge));
    }

    #[test]
    fn scenario_flags_upward_and_downward_momentum() {
        let report = volatility_alerts(
            &enrich(vec![
                asset("AAA", 100.0, (Some(0.5), Some(12.0), Some(5.0)), 1e9, 5e7),
                asset("BBB", 1.0, (Some(-1.0), Some(-10.0), Some(-8.0)), 1e8, 1e8),
            ]),
            3.0,
        );
        assert_eq!(report.alerts.len(), 2);
        assert_eq!(report.alerts[0].signal, VolatilitySignal::StrongUpward { change_1h: 0.5 });
        assert_eq!(report.alerts[1].signal, VolatilitySignal::StrongDownward);
        assert_eq!(
            report.render(),
            "🚨 *VOLATILITY ALERTS*\n\
             ⚠️ *AAA*: Strong upward momentum (24h: 12.00%, 1h: 0.50%)\n\
             📉 *BBB*: Strong downward momentum (24h: -10.00%)\n"
        );
    }

    #[test]
    fn rendered_line_matches_the_signal() {
        let surge = |signal| VolatilityReport {
            flagged: vec!["X".into()],
            alerts: vec![VolatilityAlert { symbol: "X".into(), signal, change_1h: None, change_24h: 15.0 }],
        };
        assert_eq!(
            surge(VolatilitySignal::StrongUpward { change_1h: 2.0 }).render(),
            "🚨 *VOLATILITY ALERTS*\n⚠️ *X*: Strong upward momentum (24h: 15.00%, 1h: 2.00%)\n"
        );
        assert_eq!(
            surge(VolatilitySignal::StabilizingAfterSurge).render(),
            "🚨 *VOLATILITY ALERTS*\n👀 *X*: Price stabilizing after surge (24h: 15.00%)\n"
        );
    }

    #[test]
    fn hourly_only_movers_are_flagged_without_a_line() {
        let report = volatility_alerts(
            &enrich(vec![
                asset("HOT", 1.0, (Some(4.5), Some(2.0), None), 1e9, 1e6),
                asset("CALM", 1.0, (Some(0.1), Some(0.2), None), 1e9, 1e6),
            ]),
            3.0,
        );
        assert_eq!(report.flagged, ["HOT"]);
        assert!(report.alerts.is_empty());
        assert_eq!(report.render(), "🚨 *VOLATILITY ALERTS*\n");
    }

    #[test]
    fn each_asset_yields_at_most_one_line() {
        let report = volatility_alerts(
            &enrich(vec![
                asset("A", 1.0, (Some(8.0), Some(30.0), None), 1e9, 1e6),
                asset("B", 1.0, (Some(-8.0), Some(30.0), None), 1e9, 1e6),
                asset("C", 1.0, (Some(-8.0), Some(-30.0), None), 1e9, 1e6),
                asset("D", 1.0, (Some(8.0), Some(-30.0), None), 1e9, 1e6),
            ]),
            3.0,
        );
        assert_eq!(report.alerts.len(), report.flagged.len());
        let rendered = report.render();
        for symbol in ["A", "B", "C", "D"] {
            assert_eq!(rendered.matches(&format!("*{}*", symbol)).count(), 1);
        }
    }

    #[test]
    fn missing_changes_never_trigger() {
        let report = volatility_alerts(&enrich(vec![asset("NONE", 1.0, (None, None, None), 1e9, 1e6)]), 3.0);
        assert!(report.flagged.is_empty());
        assert_eq!(report.render(), "🚨 *VOLATILITY ALERTS*\nNo significant volatility detected\n");
    }
}
