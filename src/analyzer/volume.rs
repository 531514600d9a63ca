use crate::analyzer::{SLICE_LEN, Section, head, rank_desc};
use crate::model::EnrichedSnapshot;
use crate::utils::{format_signed_change, to_millions};
use std::fmt::Write;

/// Volume this many times the market average counts as unusual on its own.
pub const VS_AVERAGE_THRESHOLD: f64 = 3.0;
const EXTREME_VS_AVERAGE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTier {
    ExtremelyHigh,
    VeryHigh,
    High,
}

impl VolumeTier {
    pub fn from_multiple(volume_vs_avg: f64) -> Self {
        if volume_vs_avg > EXTREME_VS_AVERAGE {
            VolumeTier::ExtremelyHigh
        } else if volume_vs_avg > VS_AVERAGE_THRESHOLD {
            VolumeTier::VeryHigh
        } else {
            VolumeTier::High
        }
    }

    fn label(self) -> &'static str {
        match self {
            VolumeTier::ExtremelyHigh => "🔥 *Extremely High Volume*",
            VolumeTier::VeryHigh => "⚡ *Very High Volume*",
            VolumeTier::High => "📈 *High Volume*",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeAlert {
    pub symbol: String,
    pub tier: VolumeTier,
    pub volume_24h: f64,
    pub volume_vs_avg: f64,
    pub volume_to_market_cap: f64,
    pub price: f64,
    pub change_24h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeLeader {
    pub symbol: String,
    pub volume_vs_avg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeReport {
    pub average_volume: f64,
    /// Unusual-volume assets, largest 24h volume first.
    pub alerts: Vec<VolumeAlert>,
    /// Top assets by volume relative to the average, regardless of `alerts`.
    pub leaders: Vec<VolumeLeader>,
}

/// Selects assets whose volume/market-cap ratio exceeds `ratio_threshold` or whose
/// volume is more than three times the market average.
pub fn volume_alerts(snapshot: &EnrichedSnapshot, ratio_threshold: f64) -> VolumeReport {
    let unusual: Vec<_> = snapshot
        .assets()
        .iter()
        .filter(|a| {
            a.metrics.volume_to_market_cap > ratio_threshold || a.metrics.volume_vs_avg > VS_AVERAGE_THRESHOLD
        })
        .cloned()
        .collect();

    let alerts = rank_desc(&unusual, |a| Some(a.record.volume_24h))
        .into_iter()
        .map(|(asset, _)| VolumeAlert {
            symbol: asset.record.symbol.clone(),
            tier: VolumeTier::from_multiple(asset.metrics.volume_vs_avg),
            volume_24h: asset.record.volume_24h,
            volume_vs_avg: asset.metrics.volume_vs_avg,
            volume_to_market_cap: asset.metrics.volume_to_market_cap,
            price: asset.record.price,
            change_24h: asset.record.change_24h,
        })
        .collect();

    let ranked = rank_desc(snapshot.assets(), |a| Some(a.metrics.volume_vs_avg));
    let leaders = head(&ranked, SLICE_LEN)
        .iter()
        .map(|(asset, volume_vs_avg)| VolumeLeader {
            symbol: asset.record.symbol.clone(),
            volume_vs_avg: *volume_vs_avg,
        })
        .collect();

    VolumeReport {
        average_volume: snapshot.mean_volume_24h(),
        alerts,
        leaders,
    }
}

impl Section for VolumeReport {
    fn render(&self) -> String {
        let mut message = String::from("📊 *VOLUME ALERTS*\n");
        let _ = writeln!(message, "Market Average 24h Volume: ${:.2}M\n", to_millions(self.average_volume));

        if self.alerts.is_empty() {
            message.push_str("No unusual volume patterns detected\n");
        }
        for alert in &self.alerts {
            let _ = writeln!(message, "{} {}:", alert.tier.label(), alert.symbol);
            let _ = writeln!(
                message,
                "• Volume: ${:.2}M ({:.1}x market average)",
                to_millions(alert.volume_24h),
                alert.volume_vs_avg
            );
            let _ = writeln!(message, "• Price: ${:.2} ({})", alert.price, format_signed_change(alert.change_24h));
            let _ = writeln!(message, "• Volume/Market Cap Ratio: {:.3}\n", alert.volume_to_market_cap);
        }

        message.push_str("\n*24h Volume Changes*:\n");
        for leader in &self.leaders {
            let _ = writeln!(message, "📈 *{}* volume {:.1}x above average", leader.symbol, leader.volume_vs_avg);
        }
        message
    }
}
