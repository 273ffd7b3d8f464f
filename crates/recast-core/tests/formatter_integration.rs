//! End-to-end tests for the formatting pipeline through the public API
//!
//! Formats are declared as JSON documents, the way a configuration file would
//! supply them, and the formatted batch is checked in its serialized form.

use pretty_assertions::assert_eq;
use recast_core::{
    record, Collective, Error, FormatCatalog, FormatSpec, Formatter, HandlerDescriptor,
    HandlerRegistry, Options, Record, Value,
};
use serde_json::json;

fn post_format() -> FormatSpec {
    FormatSpec::from_json(json!({
        "id": {"type": "identifier"},
        "title": {"type": "text"},
        "price": {"type": "number", "decimal": 2},
        "published": {"type": "date", "timezone": "UTC"},
        "draft": {"type": "boolean", "@rename": "is_draft"},
        "byline": {"type": "join", "fields": ["by ", "$author.name"]},
        "secret": {"type": "delete"}
    }))
    .expect("post format should parse")
}

fn comment_format() -> FormatSpec {
    FormatSpec::from_json(json!({
        "body": {"type": "text"},
        "likes": {"type": "number"}
    }))
    .expect("comment format should parse")
}

fn formatter() -> Formatter {
    let catalog = FormatCatalog::new()
        .with_format("post", post_format())
        .with_format("comment", comment_format())
        .with_format(
            "thread",
            FormatSpec::from_json(json!({
                "comments": {"type": "json", "format": "comment"}
            }))
            .expect("thread format should parse"),
        );
    Formatter::new(catalog, HandlerRegistry::with_builtins())
}

fn post(id: u64) -> Record {
    Record::from_json(json!({
        "id": id,
        "title": format!("Post {id}"),
        "price": "1250.5",
        "published": "2020-12-04 06:31:23",
        "draft": "0",
        "author": {"name": "Khan"},
        "secret": "hunter2"
    }))
    .expect("post fixture is an object")
}

#[test]
fn test_format_many_serializes_typed_fields() {
    let formatter = formatter();
    let posts = formatter
        .format_many("post", vec![post(1), post(2)], &Options::new())
        .expect("formatting should succeed");

    let first = serde_json::to_value(&posts[0]).expect("record serializes");
    assert_eq!(
        first,
        json!({
            "id": {"id": 1},
            "title": "Post 1",
            "price": 1250.5,
            "published": "2020-12-04T06:31:23+00:00",
            "author": {"name": "Khan"},
            "is_draft": false,
            "byline": "by Khan"
        })
    );
    assert_eq!(posts[1].get("title").map(Value::to_text), Some("Post 2".to_string()));
}

#[test]
fn test_format_many_keyed_uses_key_field() {
    let formatter = formatter();
    let keyed = formatter
        .format_many_keyed("post", vec![post(7), post(9)], &Options::new(), "id")
        .expect("formatting should succeed");

    assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["7", "9"]);
    assert_eq!(keyed["9"].get("is_draft"), Some(&Value::Bool(false)));
}

#[test]
fn test_format_one_matches_batch() {
    let formatter = formatter();
    let single = formatter
        .format_one("post", post(3), &Options::new())
        .expect("formatting should succeed")
        .expect("one record in, one record out");
    let many = formatter
        .format_many("post", vec![post(3), post(4)], &Options::new())
        .expect("formatting should succeed");

    assert_eq!(single, many[0]);
}

#[test]
fn test_nested_json_format() {
    let formatter = formatter();
    let thread = record! {
        "comments" => r#"[{"body": "<b>first</b>", "likes": "3"}, {"body": "second", "likes": 0}]"#,
    };

    let thread = formatter
        .format_one("thread", thread, &Options::new())
        .expect("formatting should succeed")
        .expect("one record in, one record out");

    assert_eq!(
        serde_json::to_value(&thread).expect("record serializes"),
        json!({
            "comments": [
                {"body": "<b>first</b>", "likes": 3},
                {"body": "second", "likes": 0}
            ]
        })
    );
}

#[test]
fn test_unknown_format_is_reported() {
    let err = formatter()
        .format_many("missing", vec![post(1)], &Options::new())
        .unwrap_err();
    assert!(matches!(err, Error::FormatNotFound { .. }));
    assert!(err.is_lookup_failure());
}

#[test]
fn test_external_collective_handler() {
    let mut registry = HandlerRegistry::with_builtins();
    registry
        .register(
            "user",
            HandlerDescriptor::function("load_users").collective(Collective::Batch),
        )
        .register_collective_function("load_users", |values, _records, _ctx| {
            Ok(values
                .iter()
                .map(|id| {
                    let user = record! { "id" => id.clone(), "name" => format!("user {}", id.to_text()) };
                    (id.to_text(), Value::Record(user))
                })
                .collect())
        });

    let catalog = FormatCatalog::new().with_format(
        "order",
        FormatSpec::from_json(json!({"customer": {"type": "user"}})).expect("order format should parse"),
    );
    let formatter = Formatter::new(catalog, registry);

    let orders = formatter
        .format_many(
            "order",
            vec![
                record! { "customer" => 10 },
                record! { "customer" => 11 },
                record! { "customer" => 10 },
                record! {},
            ],
            &Options::new(),
        )
        .expect("formatting should succeed");

    let customers: Vec<serde_json::Value> = orders
        .iter()
        .map(|order| order.value_or_null("customer").to_json())
        .collect();
    assert_eq!(
        customers,
        vec![
            json!({"id": 10, "name": "user 10"}),
            json!({"id": 11, "name": "user 11"}),
            json!({"id": 10, "name": "user 10"}),
            json!(null),
        ]
    );
}
