use chrono::{DateTime, Utc};

/// Table-cell rendering for optional timestamps.
pub fn fmt_ts(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::fmt_ts;

    #[test]
    fn formats_to_minute_precision() {
        let ts = "2024-05-01T10:30:45Z".parse().unwrap();
        assert_eq!(fmt_ts(Some(ts)), "2024-05-01 10:30");
    }

    #[test]
    fn missing_timestamp_renders_dash() {
        assert_eq!(fmt_ts(None), "-");
    }
}
