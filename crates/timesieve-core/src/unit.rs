//! Time units used for bucketing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A retention category.
///
/// Variants are declared from oldest to youngest, so the derived ordering
/// and [`TimeUnit::index`] follow that order. All units except
/// [`TimeUnit::Recent`] are strictly linear durations: a month is 30 days
/// and a year is 365 days.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    /// Younger than one hour. Not subdivided into buckets.
    Recent,
}

impl TimeUnit {
    /// Number of units, `recent` included.
    pub const COUNT: usize = 6;

    /// All units, oldest first.
    pub const ALL: [TimeUnit; Self::COUNT] = [
        TimeUnit::Years,
        TimeUnit::Months,
        TimeUnit::Weeks,
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Recent,
    ];

    /// Units with a fixed duration, oldest first.
    pub const DURATIONS: [TimeUnit; 5] = [
        TimeUnit::Years,
        TimeUnit::Months,
        TimeUnit::Weeks,
        TimeUnit::Days,
        TimeUnit::Hours,
    ];

    /// Length of the unit in seconds, `None` for `recent`.
    pub const fn seconds(self) -> Option<u64> {
        match self {
            TimeUnit::Years => Some(365 * 24 * 60 * 60),
            TimeUnit::Months => Some(30 * 24 * 60 * 60),
            TimeUnit::Weeks => Some(7 * 24 * 60 * 60),
            TimeUnit::Days => Some(24 * 60 * 60),
            TimeUnit::Hours => Some(60 * 60),
            TimeUnit::Recent => None,
        }
    }

    /// Position of the unit in the oldest-first ordering.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The label accepted in retention rules, e.g. `"days"`.
    pub fn label(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_unit_order_is_old_to_young() {
        let collected: Vec<TimeUnit> = TimeUnit::iter().collect();
        assert_eq!(collected, TimeUnit::ALL.to_vec());
        assert!(TimeUnit::Years < TimeUnit::Recent);
        assert_eq!(&TimeUnit::ALL[..5], &TimeUnit::DURATIONS[..]);
    }

    #[test]
    fn test_unit_seconds() {
        assert_eq!(TimeUnit::Hours.seconds(), Some(3600));
        assert_eq!(TimeUnit::Days.seconds(), Some(86_400));
        assert_eq!(TimeUnit::Weeks.seconds(), Some(604_800));
        assert_eq!(TimeUnit::Months.seconds(), Some(2_592_000));
        assert_eq!(TimeUnit::Years.seconds(), Some(31_536_000));
        assert_eq!(TimeUnit::Recent.seconds(), None);
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(TimeUnit::Days.label(), "days");
        assert_eq!(TimeUnit::Recent.to_string(), "recent");
        assert_eq!("weeks".parse::<TimeUnit>().unwrap(), TimeUnit::Weeks);
        assert!("fortnights".parse::<TimeUnit>().is_err());
        assert!("Days".parse::<TimeUnit>().is_err());
    }
}
