// tests/property/deps.rs

use proptest::prelude::*;

use causal_stream::types::{DepRef, EntityKind, Key, parse_dep};

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-z_]{1,12}_id_[0-9]{1,6}",
        "[A-Za-z0-9_:]{1,24}",
        "[a-z]{1,6}:[a-z]{1,6}:[0-9]{1,4}",
    ]
    .prop_map(|raw: String| Key::new(raw))
}

proptest! {
    #[test]
    fn test_dependency_string_round_trips(key in key_strategy(), version in any::<u64>()) {
        let dep = DepRef::new(key, version);
        let parsed = parse_dep(&dep.to_string());
        prop_assert!(parsed.is_ok(), "failed to parse {}", dep);
        prop_assert_eq!(parsed.unwrap(), dep);
    }

    #[test]
    fn test_generator_keys_round_trip(id in any::<u64>(), version in 1..=u64::MAX, post in any::<bool>()) {
        let kind = if post { EntityKind::Post } else { EntityKind::User };
        let dep = DepRef::new(kind.key(id), version);
        let raw = dep.to_string();

        prop_assert!(raw.starts_with(kind.plural()));
        prop_assert_eq!(raw.parse::<DepRef>().unwrap(), dep);
    }
}
