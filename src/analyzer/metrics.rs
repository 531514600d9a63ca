use crate::model::{DerivedMetrics, EnrichedAsset, EnrichedSnapshot, Snapshot, SnapshotError};

/// Weights of the 1h, 24h and 7d changes in the momentum score.
pub const MOMENTUM_WEIGHTS: [f64; 3] = [0.3, 0.4, 0.3];

/// Computes the derived columns for every asset and returns the enriched table.
///
/// Snapshot-wide means are taken first; the per-asset ratios and scores are
/// computed against them in a second pass. A zero market cap or a non-positive
/// mean volume is reported as [`SnapshotError::DegenerateSnapshot`] instead of
/// leaking non-finite values into the report.
pub fn derive_metrics(snapshot: &Snapshot) -> Result<EnrichedSnapshot, SnapshotError> {
    let assets = snapshot.assets();

    let mean_volume_24h = mean(assets.iter().map(|a| a.volume_24h))
        .ok_or(SnapshotError::EmptySnapshot)?;
    if !(mean_volume_24h > 0.0) {
        return Err(SnapshotError::DegenerateSnapshot(format!(
            "mean 24h volume is {}",
            mean_volume_24h
        )));
    }
    let mean_change_24h = mean(assets.iter().filter_map(|a| a.change_24h));

    let enriched = assets
        .iter()
        .map(|record| {
            if record.market_cap <= 0.0 {
                return Err(SnapshotError::DegenerateSnapshot(format!(
                    "{} has zero market cap",
                    record.symbol
                )));
            }

            let metrics = DerivedMetrics {
                volume_to_market_cap: record.volume_24h / record.market_cap,
                volume_vs_avg: record.volume_24h / mean_volume_24h,
                relative_strength_score: record
                    .change_24h
                    .zip(mean_change_24h)
                    .map(|(change, mean)| change - mean),
                momentum_score: momentum_score(record.change_1h, record.change_24h, record.change_7d),
            };

            Ok(EnrichedAsset {
                record: record.clone(),
                metrics,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EnrichedSnapshot::new(enriched, mean_volume_24h, mean_change_24h))
}

/// Weighted blend of the three horizons; absent if any horizon is missing.
pub fn momentum_score(change_1h: Option<f64>, change_24h: Option<f64>, change_7d: Option<f64>) -> Option<f64> {
    let [w1h, w24h, w7d] = MOMENTUM_WEIGHTS;
    Some(change_1h? * w1h + change_24h? * w24h + change_7d? * w7d)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::asset;

    fn snapshot(rows: Vec<crate::model::AssetRecord>) -> Snapshot {
        Snapshot::new(rows).unwrap()
    }

    #[test]
    fn momentum_is_a_fixed_affine_blend() {
        assert_eq!(momentum_score(Some(10.0), Some(10.0), Some(10.0)), Some(10.0));
        assert_eq!(momentum_score(Some(10.0), None, Some(10.0)), None);
    }

    #[test]
    fn volume_ratios_use_market_cap_and_snapshot_mean() {
        let enriched = derive_metrics(&snapshot(vec![
            asset("AAA", 100.0, (Some(0.5), Some(12.0), Some(5.0)), 1e9, 5e7),
            asset("BBB", 1.0, (Some(-1.0), Some(-10.0), Some(-8.0)), 1e8, 1e8),
        ]))
        .unwrap();

        assert_eq!(enriched.mean_volume_24h(), 7.5e7);
        let bbb = &enriched.assets()[1].metrics;
        assert!((bbb.volume_to_market_cap - 1.0).abs() < 1e-12);
        assert!((bbb.volume_vs_avg - 1e8 / 7.5e7).abs() < 1e-12);
    }

    #[test]
    fn relative_strength_is_mean_centered() {
        let enriched = derive_metrics(&snapshot(vec![
            asset("AAA", 1.0, (None, Some(12.0), None), 1e9, 1e6),
            asset("BBB", 1.0, (None, Some(-10.0), None), 1e9, 1e6),
            asset("CCC", 1.0, (None, Some(3.3), None), 1e9, 1e6),
            asset("DDD", 1.0, (None, Some(0.7), None), 1e9, 1e6),
        ]))
        .unwrap();

        let total: f64 = enriched
            .assets()
            .iter()
            .filter_map(|a| a.metrics.relative_strength_score)
            .sum();
        assert!(total.abs() < 1e-9);
    }

    #[test]
    fn missing_change_is_excluded_from_the_mean() {
        let enriched = derive_metrics(&snapshot(vec![
            asset("AAA", 1.0, (None, Some(4.0), None), 1e9, 1e6),
            asset("BBB", 1.0, (None, None, None), 1e9, 1e6),
            asset("CCC", 1.0, (None, Some(-2.0), None), 1e9, 1e6),
        ]))
        .unwrap();

        assert_eq!(enriched.mean_change_24h(), Some(1.0));
        assert_eq!(enriched.assets()[0].metrics.relative_strength_score, Some(3.0));
        assert_eq!(enriched.assets()[1].metrics.relative_strength_score, None);
    }

    #[test]
    fn zero_market_cap_is_degenerate() {
        let result = derive_metrics(&snapshot(vec![
            asset("AAA", 1.0, (None, None, None), 1e9, 1e6),
            asset("ZERO", 1.0, (None, None, None), 0.0, 1e6),
        ]));
        match result {
            Err(SnapshotError::DegenerateSnapshot(reason)) => assert!(reason.contains("ZERO")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn zero_total_volume_is_degenerate() {
        let result = derive_metrics(&snapshot(vec![
            asset("AAA", 1.0, (None, None, None), 1e9, 0.0),
            asset("BBB", 1.0, (None, None, None), 1e9, 0.0),
        ]));
        assert!(matches!(result, Err(SnapshotError::DegenerateSnapshot(_))));
    }
}
