//! Lenient serde helpers for hand-edited JSON files
//!
//! 菜单文件可能被人工编辑，这里的反序列化对缺失或异常的值宽容处理。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize bool that treats null as true
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(true))
}

/// Deserialize a record id, accepting numbers or numeric strings.
///
/// Anything else (null, negative, fractional, garbage text) becomes `0`.
pub fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(id_from_value).unwrap_or(0))
}

/// Deserialize an optional field, a value of the wrong shape reads as `None`.
///
/// 时段等子对象写错时视为未设置，而不是让整个文件解析失败。
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Deserialize weekday indices, keeping only integer entries that fit in a `u8`.
///
/// A non-array value reads as `None`.
pub fn lenient_days<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(entries)) => Some(
            entries
                .iter()
                .filter_map(|v| v.as_u64().and_then(|d| u8::try_from(d).ok()))
                .collect(),
        ),
        _ => None,
    })
}

/// Numeric id carried by a JSON value, `0` when absent or non-numeric
pub fn id_from_value(value: &Value) -> i64 {
    let id = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "flexible_id")]
        id: i64,
        #[serde(default = "default_true", deserialize_with = "bool_true")]
        flag: bool,
    }

    fn default_true() -> bool {
        true
    }

    #[derive(Deserialize)]
    struct Window {
        #[serde(default, deserialize_with = "lenient")]
        start: Option<String>,
        #[serde(default, deserialize_with = "lenient_days")]
        days: Option<Vec<u8>>,
    }

    #[test]
    fn test_id_from_value() {
        assert_eq!(id_from_value(&json!(7)), 7);
        assert_eq!(id_from_value(&json!("12")), 12);
        assert_eq!(id_from_value(&json!(3.0)), 3);
        assert_eq!(id_from_value(&json!(3.5)), 0);
        assert_eq!(id_from_value(&json!("abc")), 0);
        assert_eq!(id_from_value(&json!(-4)), 0);
        assert_eq!(id_from_value(&json!(null)), 0);
    }

    #[test]
    fn test_lenient_fields() {
        let p: Probe = serde_json::from_value(json!({"id": "x", "flag": null})).unwrap();
        assert_eq!(p.id, 0);
        assert!(p.flag);

        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.id, 0);
        assert!(p.flag);

        let p: Probe = serde_json::from_value(json!({"id": 9, "flag": false})).unwrap();
        assert_eq!(p.id, 9);
        assert!(!p.flag);
    }

    #[test]
    fn test_lenient_wrong_types_read_as_none() {
        let w: Window = serde_json::from_value(json!({"start": 900, "days": "mon"})).unwrap();
        assert_eq!(w.start, None);
        assert_eq!(w.days, None);

        let w: Window = serde_json::from_value(json!({"start": "09:00", "days": [1, "tue", 300, 6]}))
            .unwrap();
        assert_eq!(w.start.as_deref(), Some("09:00"));
        assert_eq!(w.days, Some(vec![1, 6]));

        let w: Window = serde_json::from_value(json!({"start": null})).unwrap();
        assert_eq!(w.start, None);
        assert_eq!(w.days, None);
    }
}
