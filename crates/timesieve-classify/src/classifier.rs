//! The retention classifier.

use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use timesieve_core::{
    AgeError, AgeRecord, Policy, PolicyError, TimeUnit, TimedEntry, format_age, now_timestamp,
};

/// Configuration for a [`RetentionClassifier`].
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ClassifierConfig {
    /// Keep counts per time unit.
    pub policy: Policy,

    /// Reference time for age calculations, seconds since epoch (default: now).
    #[builder(default = "now_timestamp()")]
    pub reference_time: f64,
}

impl ClassifierConfig {
    /// Create a new config builder.
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::default()
    }
}

/// Where a single entry lands before bucket resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "placement", rename_all = "lowercase")]
pub enum Placement {
    /// Younger than one hour and recent entries are requested.
    Recent,
    /// Filed into the `(unit, index)` bucket.
    Bucket { unit: TimeUnit, index: u64 },
    /// Not requested by any rule. Rejected right away.
    Unmatched,
}

/// Splits entries into accepted and rejected according to a [`Policy`].
///
/// The classifier holds no per-call state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct RetentionClassifier {
    policy: Policy,
    reference_time: f64,
}

impl RetentionClassifier {
    /// Create a classifier measuring ages against `reference_time`.
    pub fn new(policy: Policy, reference_time: f64) -> Self {
        debug!(%policy, reference_time, "retention classifier set up");
        Self {
            policy,
            reference_time,
        }
    }

    /// Create a classifier measuring ages against the current time.
    pub fn now(policy: Policy) -> Self {
        Self::new(policy, now_timestamp())
    }

    /// Create a classifier with custom config.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self::new(config.policy, config.reference_time)
    }

    /// Validate raw `(label, count)` rules and create a classifier.
    pub fn from_rules<I, K>(rules: I, reference_time: Option<f64>) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let policy = Policy::from_counts(rules)?;
        Ok(match reference_time {
            Some(reference_time) => Self::new(policy, reference_time),
            None => Self::now(policy),
        })
    }

    /// The policy in use.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The reference time in use.
    pub fn reference_time(&self) -> f64 {
        self.reference_time
    }

    /// Determine where an entry with the given timestamp is filed.
    pub fn placement(&self, timestamp: f64) -> Result<Placement, AgeError> {
        let age = AgeRecord::between(timestamp, self.reference_time)?;
        Ok(self.place(&age))
    }

    fn place(&self, age: &AgeRecord) -> Placement {
        if age.is_recent() {
            return if self.policy.keep(TimeUnit::Recent) > 0 {
                Placement::Recent
            } else {
                Placement::Unmatched
            };
        }

        // Youngest unit first: a younger unit claims an entry as long as the
        // policy still requests that bucket.
        TimeUnit::DURATIONS
            .iter()
            .rev()
            .find_map(|&unit| {
                let index = age.count(unit);
                (index > 0 && index <= self.policy.keep(unit))
                    .then_some(Placement::Bucket { unit, index })
            })
            .unwrap_or(Placement::Unmatched)
    }

    /// Split `entries` into accepted and rejected entries.
    ///
    /// Fails on the first entry that is newer than the reference time; no
    /// partial result is returned in that case.
    pub fn classify<I, E>(&self, entries: I) -> Result<Classification<E>, AgeError>
    where
        I: IntoIterator<Item = E>,
        E: TimedEntry,
    {
        let mut buckets = BucketSet::new();
        let mut recent: Vec<E> = Vec::new();
        let mut unmatched: Vec<E> = Vec::new();
        let mut total = 0usize;

        for entry in entries {
            total += 1;
            let age = AgeRecord::between(entry.timestamp(), self.reference_time)?;
            match self.place(&age) {
                Placement::Recent => recent.push(entry),
                Placement::Bucket { unit, index } => {
                    trace!(unit = unit.label(), index, age = %format_age(age.seconds), "filed entry");
                    buckets.insert(unit, index, entry);
                }
                Placement::Unmatched => unmatched.push(entry),
            }
        }

        let mut accepted = Vec::new();
        let mut rejected = Rejected::default();
        rejected.push_group(unmatched);

        // Newest `keep` recent entries survive.
        sort_by_timestamp(&mut recent);
        let keep_recent = usize::try_from(self.policy.keep(TimeUnit::Recent)).unwrap_or(usize::MAX);
        if keep_recent > 0 && !recent.is_empty() {
            let split = recent.len().saturating_sub(keep_recent);
            accepted.extend(recent.split_off(split));
        }
        rejected.push_group(recent);

        for (unit, index, mut bucket) in buckets.into_buckets() {
            sort_by_timestamp(&mut bucket);
            if let Some(newest) = bucket.pop() {
                trace!(unit = unit.label(), index, rejected = bucket.len(), "accepted newest in bucket");
                accepted.push(newest);
            }
            rejected.push_group(bucket);
        }

        debug!(
            total,
            accepted = accepted.len(),
            rejected = rejected.len(),
            "classification finished"
        );

        Ok(Classification { accepted, rejected })
    }
}

/// Result of a classification.
#[derive(Debug, Clone, Serialize)]
pub struct Classification<E> {
    /// Entries to keep. At most one per bucket, in no particular order.
    pub accepted: Vec<E>,
    /// Every other entry.
    pub rejected: Rejected<E>,
}

impl<E> Classification<E> {
    /// Number of classified entries.
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    /// Split into accepted entries and a flat list of rejected entries.
    pub fn into_parts(self) -> (Vec<E>, Vec<E>) {
        (self.accepted, self.rejected.into_vec())
    }
}

/// Rejected entries, kept in the groups they were rejected in.
///
/// Iterating yields a single flat sequence without copying the groups.
#[derive(Debug, Clone)]
pub struct Rejected<E> {
    groups: Vec<Vec<E>>,
}

impl<E> Default for Rejected<E> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<E> Rejected<E> {
    fn push_group(&mut self, group: Vec<E>) {
        if !group.is_empty() {
            self.groups.push(group);
        }
    }

    /// Total number of rejected entries.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Check if nothing was rejected.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over all rejected entries.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.groups.iter().flatten()
    }

    /// Materialize into a single vector.
    pub fn into_vec(self) -> Vec<E> {
        self.groups.into_iter().flatten().collect()
    }
}

impl<E> IntoIterator for Rejected<E> {
    type Item = E;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Vec<E>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter().flatten()
    }
}

impl<'a, E> IntoIterator for &'a Rejected<E> {
    type Item = &'a E;
    type IntoIter = std::iter::Flatten<std::slice::Iter<'a, Vec<E>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter().flatten()
    }
}

impl<E: Serialize> Serialize for Rejected<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Per-call bucket storage: one map from bucket index to entries per
/// duration unit, indexed oldest unit first.
struct BucketSet<E> {
    units: [BTreeMap<u64, Vec<E>>; 5],
}

impl<E> BucketSet<E> {
    fn new() -> Self {
        Self {
            units: std::array::from_fn(|_| BTreeMap::new()),
        }
    }

    fn insert(&mut self, unit: TimeUnit, index: u64, entry: E) {
        if let Some(map) = self.units.get_mut(unit.index()) {
            map.entry(index).or_default().push(entry);
        }
    }

    /// Drain all populated buckets: years, months, weeks, days, hours, and
    /// ascending bucket index within a unit.
    fn into_buckets(self) -> impl Iterator<Item = (TimeUnit, u64, Vec<E>)> {
        TimeUnit::DURATIONS
            .into_iter()
            .zip(self.units)
            .flat_map(|(unit, map)| {
                map.into_iter()
                    .map(move |(index, entries)| (unit, index, entries))
            })
    }
}

/// Oldest first. Stable, so equal timestamps keep input order.
fn sort_by_timestamp<E: TimedEntry>(entries: &mut [E]) {
    entries.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));
}
