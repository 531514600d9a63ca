// Analyzer module: metric derivation, the five report sections and the assembler.

pub mod metrics;
pub mod momentum;
pub mod overview;
pub mod relative_strength;
pub mod report;
pub mod volatility;
pub mod volume;

pub use report::{AlertEngine, AlertReport};

use crate::model::EnrichedAsset;

/// Number of assets shown in every top/bottom list.
pub const SLICE_LEN: usize = 3;

/// A self-contained, renderable part of the report.
pub trait Section {
    fn render(&self) -> String;
}

/// Orders assets by `key` descending, dropping those without a value.
/// The sort is stable, so ties keep snapshot order.
pub(crate) fn rank_desc<F>(assets: &[EnrichedAsset], key: F) -> Vec<(&EnrichedAsset, f64)>
where
    F: Fn(&EnrichedAsset) -> Option<f64>,
{
    let mut ranked: Vec<_> = assets
        .iter()
        .filter_map(|asset| key(asset).map(|value| (asset, value)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// First `n` entries of a ranking.
pub(crate) fn head<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[..ranked.len().min(n)]
}

/// Last `n` entries of a ranking, still in ranking order.
pub(crate) fn tail<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[ranked.len().saturating_sub(n)..]
}

#[cfg(test)]
pub(crate) fn enrich(rows: Vec<crate::model::AssetRecord>) -> crate::model::EnrichedSnapshot {
    let snapshot = crate::model::Snapshot::new(rows).unwrap();
    metrics::derive_metrics(&snapshot).unwrap()
}
