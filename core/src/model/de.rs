//! Serde helpers for the loosely typed rows a spreadsheet export produces.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

use crate::time::parse_record_date;

/// 3 → 3, 2.6 → 3, "4" → 4, "" → 0, null → 0
pub fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    count_from_value(&value).map_err(D::Error::custom)
}

/// Area name → count, each count as lenient as [`count`].
pub fn area_counts<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(area, v)| count_from_value(&v).map(|n| (area, n)))
        .collect::<Result<_, _>>()
        .map_err(D::Error::custom)
}

pub fn record_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_record_date(&s).map_err(D::Error::custom)
}

fn count_from_value(value: &Value) -> Result<i64, String> {
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(rounded_count))
            .ok_or_else(|| format!("count out of range: {}", n)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(rounded_count)
                .ok_or_else(|| format!("invalid count: '{}'", s))
        }
        other => Err(format!("invalid count: {}", other)),
    }
}

/// None for NaN, infinities and anything that does not fit an i64.
fn rounded_count(f: f64) -> Option<i64> {
    let r = f.round();
    // i64::MAX as f64 is 2^63, one past the largest i64.
    (r.is_finite() && r >= i64::MIN as f64 && r < i64::MAX as f64).then_some(r as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_from_value() {
        assert_eq!(count_from_value(&json!(3)), Ok(3));
        assert_eq!(count_from_value(&json!(2.6)), Ok(3));
        assert_eq!(count_from_value(&json!(" 7 ")), Ok(7));
        assert_eq!(count_from_value(&json!("")), Ok(0));
        assert_eq!(count_from_value(&Value::Null), Ok(0));
        assert!(count_from_value(&json!("many")).is_err());
        assert!(count_from_value(&json!(true)).is_err());
    }

    #[test]
    fn test_count_rejects_non_finite_and_huge() {
        assert!(count_from_value(&json!("inf")).is_err());
        assert!(count_from_value(&json!("-inf")).is_err());
        assert!(count_from_value(&json!("NaN")).is_err());
        assert!(count_from_value(&json!("1e300")).is_err());
        assert!(count_from_value(&json!(1e300)).is_err());
        assert!(count_from_value(&json!(-1e300)).is_err());
        assert_eq!(count_from_value(&json!("1e3")), Ok(1000));
    }
}
