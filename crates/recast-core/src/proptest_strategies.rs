//! Property-based testing strategies for generating record batches
//!
//! Records produced here only use the `id`, `age`, `name` and `author` fields,
//! matching the formats built by the engine's property tests.

#![cfg(test)]

use crate::record::Record;
use crate::value::Value;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

/// Strategy for raw scalar field values
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-10_000i64..10_000).prop_map(Value::from),
        "[0-9]{1,5}(\\.[0-9]{1,3})?".prop_map(Value::from),
        "[a-zA-Z <>!]{0,24}".prop_map(Value::from),
    ]
}

/// Strategy for author references drawn from a small pool, so batches repeat values
pub fn author_strategy() -> impl Strategy<Value = Value> {
    (1u64..6).prop_map(Value::from)
}

/// Strategy for a single record
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (
        1u64..1_000,
        option::of(scalar_strategy()),
        option::of("[a-zA-Z ]{0,16}"),
        option::of(author_strategy()),
    )
        .prop_map(|(id, age, name, author)| {
            let mut record = Record::new();
            record.insert("id", id);
            if let Some(age) = age {
                record.insert("age", age);
            }
            if let Some(name) = name {
                record.insert("name", name);
            }
            if let Some(author) = author {
                record.insert("author", author);
            }
            record
        })
}

/// Strategy for a batch of records
pub fn batch_strategy(max: usize) -> impl Strategy<Value = Vec<Record>> {
    vec(record_strategy(), 0..max)
}
