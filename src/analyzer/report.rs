use crate::analyzer::Section;
use crate::analyzer::metrics::derive_metrics;
use crate::analyzer::momentum::{MomentumReport, momentum_alerts};
use crate::analyzer::overview::{MarketOverview, market_overview};
use crate::analyzer::relative_strength::{RelativeStrengthReport, relative_strength_alerts};
use crate::analyzer::volatility::{VolatilityReport, volatility_alerts};
use crate::analyzer::volume::{VolumeReport, volume_alerts};
use crate::config::Thresholds;
use crate::model::{Snapshot, SnapshotError};
use crate::utils::format_timestamp;
use chrono::{DateTime, FixedOffset, Utc};
use tracing::debug;

const SECTION_SEPARATOR: &str = "\n\n";

/// The five report sections plus the header timestamp, in report order.
#[derive(Debug, Clone)]
pub struct AlertReport {
    pub timestamp: String,
    pub overview: MarketOverview,
    pub volatility: VolatilityReport,
    pub relative_strength: RelativeStrengthReport,
    pub volume: VolumeReport,
    pub momentum: MomentumReport,
}

impl AlertReport {
    pub fn header(&self) -> String {
        format!("🕒 *Crypto Analysis Report* - {}\n\n", self.timestamp)
    }

    fn sections(&self) -> [&dyn Section; 5] {
        [
            &self.overview,
            &self.volatility,
            &self.relative_strength,
            &self.volume,
            &self.momentum,
        ]
    }

    /// Report text without the header.
    pub fn body(&self) -> String {
        self.sections()
            .iter()
            .map(|section| section.render())
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }

    /// Full message as delivered to the channel.
    pub fn render(&self) -> String {
        let mut report = self.header();
        report.push_str(&self.body());
        report
    }
}

/// Runs metric derivation and every section generator over a snapshot.
pub struct AlertEngine {
    thresholds: Thresholds,
    offset: FixedOffset,
    zone_label: String,
}

impl AlertEngine {
    pub fn new(thresholds: Thresholds, offset: FixedOffset, zone_label: impl Into<String>) -> Self {
        Self {
            thresholds,
            offset,
            zone_label: zone_label.into(),
        }
    }

    pub fn analyze(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<AlertReport, SnapshotError> {
        let enriched = derive_metrics(snapshot)?;
        debug!(
            "Derived metrics for {} assets (mean volume {:.2}, mean 24h change {:?})",
            enriched.assets().len(),
            enriched.mean_volume_24h(),
            enriched.mean_change_24h()
        );

        Ok(AlertReport {
            timestamp: format_timestamp(now, self.offset, &self.zone_label),
            overview: market_overview(&enriched),
            volatility: volatility_alerts(&enriched, self.thresholds.volatility),
            relative_strength: relative_strength_alerts(&enriched),
            volume: volume_alerts(&enriched, self.thresholds.volume_ratio),
            momentum: momentum_alerts(&enriched),
        })
    }
}
