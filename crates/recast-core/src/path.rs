//! Dotted path resolution over nested records
//!
//! `user.address.city` walks record keys one segment at a time; list elements
//! are addressed by index (`tags.0`). The walk stops at the first non-container
//! value and returns it, even if segments remain. A segment naming a missing
//! key fails with [`Error::PathNotFound`].
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::record::Record;
use crate::value::Value;

#[derive(Clone, Copy)]
enum Cursor<'a> {
    Record(&'a Record),
    List(&'a [Value]),
}

/// Resolve `path` against `record`
pub fn resolve(record: &Record, path: &str) -> Result<Value> {
    let mut cursor = Cursor::Record(record);

    for segment in path.split('.') {
        let next = match cursor {
            Cursor::Record(record) => record.get(segment),
            Cursor::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        }
        .ok_or_else(|| Error::path_not_found(path, segment))?;

        cursor = match next {
            Value::Record(record) => Cursor::Record(record),
            Value::List(items) => Cursor::List(items),
            leaf => return Ok(leaf.clone()),
        };
    }

    Ok(match cursor {
        Cursor::Record(record) => Value::Record(record.clone()),
        Cursor::List(items) => Value::List(items.to_vec()),
    })
}
