//! Entry age in linear time units.

use serde::Serialize;

use crate::error::AgeError;
use crate::unit::TimeUnit;

/// How old an entry is relative to a reference instant, expressed in each
/// duration unit independently.
///
/// There is no implicit summation: a 45 day old entry is 45 days, 6 weeks,
/// 1 month and 0 years old at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeRecord {
    /// Elapsed seconds between the entry and the reference instant.
    pub seconds: f64,
    exact: [f64; 5],
    counts: [u64; 5],
}

impl AgeRecord {
    /// Compute the age of `timestamp` relative to `reference`.
    ///
    /// Both values are seconds since the Unix epoch. Fails if the entry is
    /// later than the reference or if either value is not finite.
    pub fn between(timestamp: f64, reference: f64) -> Result<Self, AgeError> {
        if !timestamp.is_finite() || !reference.is_finite() {
            return Err(AgeError::NotFinite {
                timestamp,
                reference,
            });
        }

        let seconds = reference - timestamp;
        if seconds < 0.0 {
            return Err(AgeError::FutureTimestamp {
                timestamp,
                reference,
            });
        }

        let mut exact = [0.0; 5];
        let mut counts = [0; 5];
        for unit in TimeUnit::DURATIONS {
            let Some(unit_secs) = unit.seconds() else {
                continue;
            };
            let value = seconds / unit_secs as f64;
            exact[unit.index()] = value;
            // Ages are never negative, so floor and truncation agree.
            counts[unit.index()] = value.floor() as u64;
        }

        Ok(Self {
            seconds,
            exact,
            counts,
        })
    }

    /// Exact (fractional) age in `unit`. Always `0.0` for `recent`.
    pub fn exact(&self, unit: TimeUnit) -> f64 {
        self.exact.get(unit.index()).copied().unwrap_or(0.0)
    }

    /// Bucket index (floored age) in `unit`. Always `0` for `recent`.
    pub fn count(&self, unit: TimeUnit) -> u64 {
        self.counts.get(unit.index()).copied().unwrap_or(0)
    }

    /// Younger than one hour.
    pub fn is_recent(&self) -> bool {
        self.count(TimeUnit::Hours) == 0
    }
}

/// Current time as seconds since the Unix epoch.
pub fn now_timestamp() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9
}

/// Format an age in seconds as a human-readable string.
pub fn format_age(seconds: f64) -> String {
    let secs = seconds.max(0.0) as u64;
    let unit_secs = |unit: TimeUnit| unit.seconds().unwrap_or(1);

    if secs < 60 {
        format!("{secs} seconds")
    } else if secs < unit_secs(TimeUnit::Hours) {
        format!("{} minutes", secs / 60)
    } else if secs < unit_secs(TimeUnit::Days) {
        format!("{} hours", secs / unit_secs(TimeUnit::Hours))
    } else if secs < unit_secs(TimeUnit::Months) {
        format!("{} days", secs / unit_secs(TimeUnit::Days))
    } else if secs < unit_secs(TimeUnit::Years) {
        format!("{} months", secs / unit_secs(TimeUnit::Months))
    } else {
        format!("{:.1} years", seconds / unit_secs(TimeUnit::Years) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: f64 = 3600.0;
    const DAY: f64 = 86_400.0;

    #[test]
    fn test_one_year() {
        let age = AgeRecord::between(0.0, 365.0 * DAY).unwrap();
        assert_eq!(age.count(TimeUnit::Years), 1);
        assert_eq!(age.exact(TimeUnit::Years), 1.0);
        assert_eq!(age.count(TimeUnit::Months), 12);
        assert_eq!(age.exact(TimeUnit::Months), 365.0 / 30.0);
        assert_eq!(age.count(TimeUnit::Weeks), 52);
        assert_eq!(age.exact(TimeUnit::Weeks), 365.0 / 7.0);
        assert_eq!(age.count(TimeUnit::Days), 365);
        assert_eq!(age.count(TimeUnit::Hours), 365 * 24);
        assert_eq!(age.exact(TimeUnit::Hours), 365.0 * 24.0);
    }

    #[test]
    fn test_one_hour() {
        let age = AgeRecord::between(0.0, HOUR).unwrap();
        assert_eq!(age.count(TimeUnit::Hours), 1);
        assert_eq!(age.exact(TimeUnit::Hours), 1.0);
        assert_eq!(age.count(TimeUnit::Days), 0);
        assert_eq!(age.exact(TimeUnit::Days), 1.0 / 24.0);
        assert_eq!(age.count(TimeUnit::Years), 0);
        assert!(!age.is_recent());
    }

    #[test]
    fn test_floor_not_round() {
        // 45 days is 1.5 months
        let age = AgeRecord::between(1_000.0, 1_000.0 + 45.0 * DAY).unwrap();
        assert_eq!(age.exact(TimeUnit::Months), 1.5);
        assert_eq!(age.count(TimeUnit::Months), 1);
        assert_eq!(age.count(TimeUnit::Weeks), 6);
    }

    #[test]
    fn test_recent() {
        let age = AgeRecord::between(100.0, 100.0 + HOUR - 0.5).unwrap();
        assert!(age.is_recent());
        assert_eq!(age.count(TimeUnit::Recent), 0);
        assert_eq!(age.exact(TimeUnit::Recent), 0.0);

        let same = AgeRecord::between(5.0, 5.0).unwrap();
        assert!(same.is_recent());
        assert_eq!(same.seconds, 0.0);
    }

    #[test]
    fn test_future_timestamp() {
        let err = AgeRecord::between(1.0, 0.0).unwrap_err();
        assert!(matches!(err, AgeError::FutureTimestamp { .. }));
    }

    #[test]
    fn test_not_finite() {
        assert!(matches!(
            AgeRecord::between(f64::NAN, 0.0),
            Err(AgeError::NotFinite { .. })
        ));
        assert!(matches!(
            AgeRecord::between(0.0, f64::INFINITY),
            Err(AgeError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(30.0), "30 seconds");
        assert_eq!(format_age(120.0), "2 minutes");
        assert_eq!(format_age(7200.0), "2 hours");
        assert_eq!(format_age(172_800.0), "2 days");
        assert_eq!(format_age(45.0 * DAY), "1 months");
        assert_eq!(format_age(365.0 * DAY * 1.5), "1.5 years");
    }

    #[test]
    fn test_now_timestamp_is_recent_epoch() {
        let now = now_timestamp();
        // After 2020-01-01.
        assert!(now > 1_577_836_800.0);
    }
}
