use chrono::{DateTime, Utc};

/// Derived lifecycle state of a link; never persisted, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Permanent,
    Active,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub state: Lifecycle,
    pub label: String,
}

/// Cheap state check without label formatting. Used for every visible row;
/// the formatted label is only built for observed rows.
pub fn state_of(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Lifecycle {
    match expires_at {
        None => Lifecycle::Permanent,
        Some(exp) if (exp - now).num_milliseconds() <= 0 => Lifecycle::Expired,
        Some(_) => Lifecycle::Active,
    }
}

/// Pure classification of (`expires_at`, now) into a lifecycle state and a
/// human-readable remaining-time label. Active labels decompose the remaining
/// time into integral hours, minutes and seconds; hours are not folded into
/// days, so long TTLs read like "122h 5m 9s".
pub fn classify(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Countdown {
    let Some(expires_at) = expires_at else {
        return Countdown {
            state: Lifecycle::Permanent,
            label: "Permanent".to_string(),
        };
    };

    let ms = (expires_at - now).num_milliseconds();
    if ms <= 0 {
        return Countdown {
            state: Lifecycle::Expired,
            label: "Expired".to_string(),
        };
    }

    let secs = ms / 1000;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    Countdown {
        state: Lifecycle::Active,
        label: format!("{h}h {m}m {s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn no_expiry_is_permanent_for_any_now() {
        for now in ["1970-01-01T00:00:00Z", "2024-05-01T12:00:00Z", "2099-12-31T23:59:59Z"] {
            let cd = classify(None, at(now));
            assert_eq!(cd.state, Lifecycle::Permanent);
            assert_eq!(cd.label, "Permanent");
        }
    }

    #[test]
    fn past_or_equal_expiry_is_expired() {
        let now = at("2024-05-01T12:00:00Z");
        let past = classify(Some(at("2024-05-01T11:00:00Z")), now);
        assert_eq!(past.state, Lifecycle::Expired);
        assert_eq!(past.label, "Expired");

        let exact = classify(Some(now), now);
        assert_eq!(exact.state, Lifecycle::Expired);
    }

    #[test]
    fn future_expiry_formats_hours_minutes_seconds() {
        let now = at("2024-05-01T12:00:00Z");
        let cd = classify(Some(at("2024-05-01T14:05:09Z")), now);
        assert_eq!(cd.state, Lifecycle::Active);
        assert_eq!(cd.label, "2h 5m 9s");
    }

    #[test]
    fn hours_are_not_folded_into_days() {
        let now = at("2024-05-01T00:00:00Z");
        let cd = classify(Some(at("2024-05-06T02:00:30Z")), now);
        assert_eq!(cd.label, "122h 0m 30s");
    }

    #[test]
    fn label_strictly_decreases_as_now_advances() {
        let exp = at("2024-05-01T13:00:00Z");
        let mut now = at("2024-05-01T12:00:00Z");
        let mut prev = exp - now;
        for _ in 0..5 {
            now += Duration::seconds(7);
            let remaining = exp - now;
            assert!(remaining < prev);
            assert_eq!(classify(Some(exp), now).state, Lifecycle::Active);
            prev = remaining;
        }
    }

    #[test]
    fn subsecond_remainder_is_still_active() {
        let now = at("2024-05-01T12:00:00Z");
        let cd = classify(Some(now + Duration::milliseconds(500)), now);
        assert_eq!(cd.state, Lifecycle::Active);
        assert_eq!(cd.label, "0h 0m 0s");
    }
}
