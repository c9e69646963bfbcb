//! Proptest strategies for events and robot line-ups.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Event names as they appear in `X-GitHub-Event`
pub fn event_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,24}"
}

/// Small JSON documents with nested objects and arrays
pub fn payload_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Robot count together with one position in range
pub fn lineup_with_position() -> impl Strategy<Value = (usize, usize)> {
    (1usize..12).prop_flat_map(|count| (Just(count), 0..count))
}
