use crate::model::{AssetRecord, Snapshot, SnapshotError};
use serde_json::Value;

/// Converts raw provider listings into a typed snapshot.
/// The first malformed record aborts the whole snapshot.
pub fn normalize_all(raw: &[Value], convert: &str) -> Result<Snapshot, SnapshotError> {
    if raw.is_empty() {
        return Err(SnapshotError::EmptySnapshot);
    }

    let assets = raw
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record, convert))
        .collect::<Result<Vec<_>, _>>()?;

    Snapshot::new(assets)
}

fn normalize_record(index: usize, record: &Value, convert: &str) -> Result<AssetRecord, SnapshotError> {
    let field = RecordFields { index, record };
    let quote = format!("/quote/{}", convert);

    Ok(AssetRecord {
        name: field.text("/name")?,
        symbol: field.text("/symbol")?,
        price: field.amount(&format!("{}/price", quote))?,
        change_1h: field.change(&format!("{}/percent_change_1h", quote))?,
        change_24h: field.change(&format!("{}/percent_change_24h", quote))?,
        change_7d: field.change(&format!("{}/percent_change_7d", quote))?,
        market_cap: field.amount(&format!("{}/market_cap", quote))?,
        volume_24h: field.amount(&format!("{}/volume_24h", quote))?,
        circulating_supply: field.amount("/circulating_supply")?,
    })
}

struct RecordFields<'a> {
    index: usize,
    record: &'a Value,
}

impl RecordFields<'_> {
    fn malformed(&self, reason: String) -> SnapshotError {
        SnapshotError::MalformedRecord {
            index: self.index,
            reason,
        }
    }

    fn text(&self, path: &str) -> Result<String, SnapshotError> {
        match self.record.pointer(path) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(Value::String(_)) => Err(self.malformed(format!("{} is blank", path))),
            Some(other) => Err(self.malformed(format!("{} is not a string: {}", path, other))),
            None => Err(self.malformed(format!("{} is missing", path))),
        }
    }

    /// Non-negative quantity; must be present and non-null.
    fn amount(&self, path: &str) -> Result<f64, SnapshotError> {
        match self.record.pointer(path) {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v >= 0.0 => Ok(v),
                _ => Err(self.malformed(format!("{} must be a non-negative number, got {}", path, n))),
            },
            Some(Value::Null) | None => Err(self.malformed(format!("{} is missing", path))),
            Some(other) => Err(self.malformed(format!("{} is not a number: {}", path, other))),
        }
    }

    /// Signed percentage; absent and null both mean "not reported".
    fn change(&self, path: &str) -> Result<Option<f64>, SnapshotError> {
        match self.record.pointer(path) {
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.malformed(format!("{} is not representable: {}", path, n))),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(self.malformed(format!("{} is not a number: {}", path, other))),
        }
    }
}
