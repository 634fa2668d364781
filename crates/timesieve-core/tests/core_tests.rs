use std::collections::HashMap;

use timesieve_core::{
    AgeError, AgeRecord, EntryKind, FsEntry, Item, Policy, PolicyError, RulesParseError,
    TextItem, TimeUnit, TimedEntry,
};

const DAY: f64 = 86_400.0;

#[test]
fn test_policy_from_hash_map() {
    let mut rules: HashMap<String, i64> = HashMap::new();
    rules.insert("recent".to_string(), 5);
    rules.insert("years".to_string(), 4);

    let policy = Policy::from_counts(rules).unwrap();
    assert_eq!(policy.keep(TimeUnit::Recent), 5);
    assert_eq!(policy.keep(TimeUnit::Years), 4);
    assert_eq!(policy.keep(TimeUnit::Hours), 0);

    // Internal order is fixed regardless of map iteration order.
    let order: Vec<TimeUnit> = policy.iter().map(|(unit, _)| unit).collect();
    assert_eq!(
        order,
        vec![
            TimeUnit::Years,
            TimeUnit::Months,
            TimeUnit::Weeks,
            TimeUnit::Days,
            TimeUnit::Hours,
            TimeUnit::Recent,
        ]
    );
}

#[test]
fn test_policy_with_explicit_zero_counts() {
    let policy = Policy::from_counts([("years", 1), ("recent", 0)]).unwrap();
    assert_eq!(policy.keep(TimeUnit::Recent), 0);
    assert_eq!(policy.to_string(), "years1");
}

#[test]
fn test_policy_last_duplicate_wins() {
    let policy: Policy = "days3,days7".parse().unwrap();
    assert_eq!(policy.keep(TimeUnit::Days), 7);
}

#[test]
fn test_policy_error_messages() {
    let err = Policy::from_counts([("days", -2)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'days' count must be a non-negative integer, got -2"
    );

    let err = Policy::from_counts([("epochs", 2)]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid time category: 'epochs'");

    let err = "days1,:-)".parse::<Policy>().unwrap_err();
    assert_eq!(err.to_string(), "Invalid token <:-)>");
}

#[test]
fn test_from_units() {
    let policy = Policy::from_units([(TimeUnit::Hours, 48), (TimeUnit::Recent, 5)]).unwrap();
    assert_eq!(policy.keep(TimeUnit::Hours), 48);
    assert_eq!(policy.max_accepted(), 53);

    assert_eq!(
        Policy::from_units([(TimeUnit::Days, 0)]),
        Err(PolicyError::AllZero)
    );
    let none: [(TimeUnit, u64); 0] = [];
    assert_eq!(Policy::from_units(none), Err(PolicyError::Empty));
}

#[test]
fn test_rules_error_kinds() {
    assert!(matches!(
        ",days1".parse::<Policy>(),
        Err(RulesParseError::EmptyToken)
    ));
    assert!(matches!(
        "days1,weeks-2".parse::<Policy>(),
        Err(RulesParseError::InvalidToken { .. })
    ));
}

#[test]
fn test_age_in_every_unit() {
    let reference = 1_700_000_000.0;
    let age = AgeRecord::between(reference - 45.0 * DAY, reference).unwrap();

    assert_eq!(age.count(TimeUnit::Hours), 45 * 24);
    assert_eq!(age.count(TimeUnit::Days), 45);
    assert_eq!(age.count(TimeUnit::Weeks), 6);
    assert_eq!(age.count(TimeUnit::Months), 1);
    assert_eq!(age.count(TimeUnit::Years), 0);
    assert!(!age.is_recent());
}

#[test]
fn test_age_exactly_one_hour_is_not_recent() {
    let age = AgeRecord::between(0.0, 3600.0).unwrap();
    assert_eq!(age.count(TimeUnit::Hours), 1);
    assert!(!age.is_recent());

    let age = AgeRecord::between(0.0, 3599.999).unwrap();
    assert!(age.is_recent());
}

#[test]
fn test_age_future_error() {
    let err = AgeRecord::between(10.0, 9.0).unwrap_err();
    assert_eq!(
        err,
        AgeError::FutureTimestamp {
            timestamp: 10.0,
            reference: 9.0
        }
    );
}

#[test]
fn test_items_expose_timestamp() {
    let items: Vec<Item> = vec![
        FsEntry::new("/srv/backup/a.tar", EntryKind::File, 100.0).into(),
        TextItem::new("20240101", 200.0).into(),
    ];
    let stamps: Vec<f64> = items.iter().map(TimedEntry::timestamp).collect();
    assert_eq!(stamps, vec![100.0, 200.0]);
}

#[test]
fn test_item_serialization() {
    let item = Item::from(FsEntry::new("/a", EntryKind::Symlink, 1.5));
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["type"], "fs");
    assert_eq!(json["kind"], "symlink");
    assert_eq!(json["modified"], 1.5);
}
