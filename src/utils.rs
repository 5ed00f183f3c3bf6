/// Utility functions
use chrono::NaiveDate;
use serde_json::Value;

/// Extract number from JSON value
pub fn num(v: &Value) -> Option<f64> {
    if let Some(x) = v.as_f64() {
        return Some(x);
    }
    if let Some(s) = v.as_str() {
        return s.trim().parse::<f64>().ok();
    }
    None
}

/// Pick string value from JSON by trying multiple keys
pub fn s_pick(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(x) = v.get(*k) {
            if let Some(s) = x.as_str() {
                if !s.is_empty() {
                    return Some(s.to_string());
                }
            } else if x.is_number() {
                return Some(x.to_string());
            }
        }
    }
    None
}

/// Pick calendar date from JSON by trying multiple keys
pub fn d_pick(v: &Value, keys: &[&str]) -> Option<NaiveDate> {
    for k in keys {
        if let Some(s) = v.get(*k).and_then(|x| x.as_str()) {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(d);
            }
            // "2029-Apr-13 21:46"
            if let Some(day) = s.split_whitespace().next() {
                if let Ok(d) = NaiveDate::parse_from_str(day, "%Y-%b-%d") {
                    return Some(d);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_from_float() {
        let json = serde_json::json!(42.5);
        assert_eq!(num(&json), Some(42.5));
    }

    #[test]
    fn test_num_from_string() {
        let json = serde_json::json!("12.0312345");
        assert_eq!(num(&json), Some(12.0312345));
    }

    #[test]
    fn test_num_from_invalid() {
        let json = serde_json::json!("invalid");
        assert_eq!(num(&json), None);
        assert_eq!(num(&Value::Null), None);
    }

    #[test]
    fn test_s_pick_finds_first() {
        let json = serde_json::json!({"name": "(2024 AB)", "designation": "backup"});
        assert_eq!(
            s_pick(&json, &["name", "designation"]),
            Some("(2024 AB)".to_string())
        );
    }

    #[test]
    fn test_s_pick_numeric_id() {
        let json = serde_json::json!({"id": 2029075});
        assert_eq!(s_pick(&json, &["id"]), Some("2029075".to_string()));
    }

    #[test]
    fn test_s_pick_not_found() {
        let json = serde_json::json!({"other": "value"});
        assert_eq!(s_pick(&json, &["name", "title"]), None);
    }

    #[test]
    fn test_d_pick_iso_date() {
        let json = serde_json::json!({"close_approach_date": "2029-04-13"});
        assert_eq!(
            d_pick(&json, &["close_approach_date"]),
            NaiveDate::from_ymd_opt(2029, 4, 13)
        );
    }

    #[test]
    fn test_d_pick_full_date_fallback() {
        let json = serde_json::json!({"close_approach_date_full": "2029-Apr-13 21:46"});
        assert_eq!(
            d_pick(&json, &["close_approach_date", "close_approach_date_full"]),
            NaiveDate::from_ymd_opt(2029, 4, 13)
        );
    }

    #[test]
    fn test_d_pick_not_found() {
        let json = serde_json::json!({"close_approach_date": "soon"});
        assert_eq!(d_pick(&json, &["close_approach_date"]), None);
    }
}
