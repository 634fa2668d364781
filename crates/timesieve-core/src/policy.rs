//! Retention policies.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{PolicyError, RulesParseError};
use crate::unit::TimeUnit;

/// How many buckets to keep per time unit.
///
/// A policy always has at least one positive keep count. Units that were not
/// mentioned keep zero buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Policy {
    counts: [u64; TimeUnit::COUNT],
}

impl Policy {
    /// Build a policy from `(label, count)` rules.
    ///
    /// Labels must be one of `years`, `months`, `weeks`, `days`, `hours`,
    /// `recent`. A label given twice keeps its last count.
    pub fn from_counts<I, K>(rules: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let mut counts = [0u64; TimeUnit::COUNT];
        let mut seen_any = false;

        for (label, count) in rules {
            let label = label.as_ref();
            seen_any = true;
            if count < 0 {
                return Err(PolicyError::NegativeCount {
                    label: label.to_string(),
                    count,
                });
            }
            let unit: TimeUnit = label.parse().map_err(|_| PolicyError::UnknownUnit {
                label: label.to_string(),
            })?;
            counts[unit.index()] = count.unsigned_abs();
        }

        if !seen_any {
            return Err(PolicyError::Empty);
        }
        if counts.iter().all(|&c| c == 0) {
            return Err(PolicyError::AllZero);
        }

        Ok(Self { counts })
    }

    /// Convenience constructor for typed rules.
    pub fn from_units<I>(rules: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (TimeUnit, u64)>,
    {
        let mut counts = [0u64; TimeUnit::COUNT];
        let mut seen_any = false;
        for (unit, count) in rules {
            seen_any = true;
            counts[unit.index()] = count;
        }
        if !seen_any {
            return Err(PolicyError::Empty);
        }
        if counts.iter().all(|&c| c == 0) {
            return Err(PolicyError::AllZero);
        }
        Ok(Self { counts })
    }

    /// Keep count for `unit`.
    pub fn keep(&self, unit: TimeUnit) -> u64 {
        self.counts[unit.index()]
    }

    /// All units with their keep counts, oldest unit first.
    pub fn iter(&self) -> impl Iterator<Item = (TimeUnit, u64)> + '_ {
        TimeUnit::ALL.iter().map(|&unit| (unit, self.keep(unit)))
    }

    /// Upper bound on the number of entries this policy can accept.
    pub fn max_accepted(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }
}

impl FromStr for Policy {
    type Err = RulesParseError;

    /// Parse rules of the form `hours12,days5,weeks4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rules = Vec::new();
        for token in s.split(',') {
            if token.is_empty() {
                return Err(RulesParseError::EmptyToken);
            }
            rules.push(parse_token(token)?);
        }
        Ok(Self::from_counts(rules)?)
    }
}

/// Split `days10` into `("days", 10)`.
fn parse_token(token: &str) -> Result<(&str, i64), RulesParseError> {
    let invalid = || RulesParseError::InvalidToken {
        token: token.to_string(),
    };

    let split = token.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let (label, digits) = token.split_at(split);

    if label.is_empty() || !label.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(invalid());
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let count = digits.parse::<i64>().map_err(|_| invalid())?;

    Ok((label, count))
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (unit, count) in self.iter().filter(|&(_, c)| c > 0) {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{unit}{count}")?;
            first = false;
        }
        Ok(())
    }
}
