//! Watch durations offered when adding a product to the watchlist

use chrono::{DateTime, Duration, Utc};

/// How long a product stays on the watchlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchDuration {
    OneDay,
    OneWeek,
    TwoWeeks,
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl WatchDuration {
    /// Every option, in the order they are presented.
    pub const ALL: [Self; 6] = [
        Self::OneDay,
        Self::OneWeek,
        Self::TwoWeeks,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
    ];

    pub fn days(self) -> i64 {
        match self {
            Self::OneDay => 1,
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OneDay => "1 Day",
            Self::OneWeek => "1 Week",
            Self::TwoWeeks => "2 Weeks",
            Self::OneMonth => "1 Month",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(label))
    }

    pub fn end_time(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.days())
    }
}

/// Time left until `end`, clamped at zero.
pub fn remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (end - now).max(Duration::zero())
}

pub fn is_expired(end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn end_time_adds_days() {
        assert_eq!(
            WatchDuration::OneWeek.end_time(now()),
            now() + Duration::days(7)
        );
        assert_eq!(
            WatchDuration::SixMonths.end_time(now()),
            now() + Duration::days(180)
        );
    }

    #[test]
    fn labels_round_trip() {
        for option in WatchDuration::ALL {
            assert_eq!(WatchDuration::from_label(option.label()), Some(option));
        }
        assert_eq!(WatchDuration::from_label(" 1 week "), Some(WatchDuration::OneWeek));
        assert_eq!(WatchDuration::from_label("forever"), None);
    }

    #[test]
    fn remaining_and_expiry() {
        let end = now() + Duration::hours(3);
        assert_eq!(remaining(end, now()), Duration::hours(3));
        assert!(!is_expired(end, now()));

        let later = now() + Duration::hours(4);
        assert_eq!(remaining(end, later), Duration::zero());
        assert!(is_expired(end, later));
    }
}
