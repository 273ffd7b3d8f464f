use super::*;
use crate::catalog::FormatCatalog;
use crate::objects::{Number, Typed};
use crate::registry::HandlerDescriptor;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn catalog() -> FormatCatalog {
    FormatCatalog::new()
        .with_format(
            "std-test",
            FormatSpec::new()
                .with_rule("age", FieldRule::new("number"))
                .with_rule("name", FieldRule::new("text")),
        )
        .with_format(
            "std-type-not-exists",
            FormatSpec::new()
                .with_rule("name", FieldRule::new("text").cloned_from("age"))
                .with_rule("age", FieldRule::new("non-exists-type")),
        )
        .with_format(
            "std-rest",
            FormatSpec::new()
                .with_rule("@rest", FieldRule::new("number"))
                .with_rule("name", FieldRule::new("text")),
        )
        .with_format(
            "std-rename",
            FormatSpec::new().with_rule("user_name", FieldRule::new("text").renamed("name")),
        )
        .with_format(
            "std-clone",
            FormatSpec::new()
                .with_rule("name", FieldRule::new("text"))
                .with_rule("fullname", FieldRule::new("text").cloned_from("name")),
        )
        .with_format(
            "std-name",
            FormatSpec::new().with_rule("name", FieldRule::new("text")),
        )
}

fn formatter() -> Formatter {
    Formatter::new(catalog(), HandlerRegistry::with_builtins())
}

fn kind(record: &Record, field: &str) -> Option<&'static str> {
    record.get(field).and_then(Value::as_typed).map(Typed::kind)
}

#[test]
fn test_apply_type_number() {
    let formatter = formatter();
    let mut record = Record::new();
    let outcome = formatter
        .apply_type(
            "number",
            Value::from(1),
            "age",
            &mut record,
            &FieldRule::new("number"),
            &FieldOption::Absent,
        )
        .unwrap();
    assert!(outcome.into_value().as_number().is_some());
}

#[test]
fn test_apply_type_unknown() {
    let formatter = formatter();
    let err = formatter
        .apply_type(
            "nope",
            Value::Null,
            "age",
            &mut Record::new(),
            &FieldRule::new("nope"),
            &FieldOption::Absent,
        )
        .unwrap_err();
    assert!(matches!(err, Error::HandlerNotFound { ref handler } if handler == "nope"));
}

#[test]
fn test_format_single() {
    let result = formatter()
        .format_one("std-test", record! { "age" => 12, "name" => "Khan" }, &Options::new())
        .unwrap()
        .unwrap();

    assert_eq!(kind(&result, "age"), Some("number"));
    assert_eq!(kind(&result, "name"), Some("text"));
}

#[test]
fn test_format_many_matches_single() {
    let formatter = formatter();
    let first = record! { "age" => 12, "name" => "Khan" };
    let records = vec![first.clone(), record! { "age" => 13, "name" => "Ikhsan" }];

    let many = formatter.format_many("std-test", records, &Options::new()).unwrap();
    let single = formatter.format_one("std-test", first, &Options::new()).unwrap();

    assert_eq!(many.len(), 2);
    assert_eq!(Some(&many[0]), single.as_ref());
}

#[test]
fn test_format_many_keyed() {
    let formatter = formatter();
    let first = record! { "id" => 1, "age" => 12, "name" => "Khan" };
    let records = vec![first.clone(), record! { "id" => 2, "age" => 13, "name" => "Ikhsan" }];

    let keyed = formatter
        .format_many_keyed("std-test", records, &Options::new(), "id")
        .unwrap();
    let single = formatter
        .format_one("std-test", first, &Options::new())
        .unwrap()
        .unwrap();

    assert_eq!(keyed.keys().collect::<Vec<_>>(), ["1", "2"]);
    assert_eq!(keyed["1"], single);
}

#[test]
fn test_keyed_by_typed_value() {
    let formatter = formatter();
    let records = vec![record! { "age" => "12", "name" => "Khan" }];
    let keyed = formatter
        .format_many_keyed("std-test", records, &Options::new(), "name")
        .unwrap();
    assert!(keyed.contains_key("Khan"));
}

#[test]
fn test_format_not_found() {
    let err = formatter()
        .format_one("std-nont-exists", Record::new(), &Options::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "Format named `std-nont-exists` not exists");
}

#[test]
fn test_type_not_found_leaves_batch_untouched() {
    let formatter = formatter();
    let spec = formatter.resolve_format("std-type-not-exists").unwrap();
    let mut records = vec![record! { "age" => 12 }, record! { "age" => 13 }];
    let before = records.clone();

    let err = formatter
        .apply_format(&spec, &mut records, &Options::new())
        .unwrap_err();

    assert!(matches!(err, Error::HandlerNotFound { .. }));
    assert_eq!(records, before);
}

#[test]
fn test_rest_rule() {
    let result = formatter()
        .format_one(
            "std-rest",
            record! { "age" => 12, "name" => "Khan", "height" => 178, "weight" => 57 },
            &Options::new(),
        )
        .unwrap()
        .unwrap();

    assert_eq!(kind(&result, "name"), Some("text"));
    assert_eq!(kind(&result, "age"), Some("number"));
    assert_eq!(kind(&result, "height"), Some("number"));
    assert_eq!(kind(&result, "weight"), Some("number"));
}

#[test]
fn test_rest_uses_first_record_only() {
    let records = vec![
        record! { "name" => "Khan", "age" => 12 },
        record! { "name" => "Ikhsan", "age" => 13, "height" => 170 },
    ];
    let result = formatter()
        .format_many("std-rest", records, &Options::new())
        .unwrap();

    assert_eq!(kind(&result[1], "age"), Some("number"));
    assert_eq!(result[1].get("height"), Some(&Value::from(170)));
}

#[test]
fn test_rename_directive() {
    let result = formatter()
        .format_one("std-rename", record! { "user_name" => "Khan" }, &Options::new())
        .unwrap()
        .unwrap();

    assert!(!result.contains_key("user_name"));
    assert_eq!(kind(&result, "name"), Some("text"));
    assert_eq!(result.get("name").unwrap().to_text(), "Khan");
}

#[test]
fn test_clone_directive() {
    let result = formatter()
        .format_one("std-clone", record! { "name" => "Khan" }, &Options::new())
        .unwrap()
        .unwrap();

    assert_eq!(kind(&result, "fullname"), Some("text"));
    assert_eq!(result.get("fullname").unwrap().to_text(), "Khan");
}

#[test]
fn test_clone_copies_wrapped_value() {
    let spec = FormatSpec::new().with_rule("copy", FieldRule::new("text").cloned_from("total"));
    let mut records = vec![record! { "total" => Number::new(&Value::from("12.5"), 1) }];

    formatter()
        .apply_format(&spec, &mut records, &Options::new())
        .unwrap();

    let total = records[0].get("total").cloned();
    assert_eq!(kind(&records[0], "copy"), Some("text"));
    assert_eq!(records[0].get("copy").unwrap().to_text(), "12.5");
    assert_eq!(total.as_ref().and_then(Value::as_number).map(Number::value), Some(12.5));
}

#[test]
fn test_missing_field_is_null_input() {
    let spec = FormatSpec::new().with_rule("active", FieldRule::new("bool"));
    let mut records = vec![Record::new()];

    formatter()
        .apply_format(&spec, &mut records, &Options::new())
        .unwrap();

    assert_eq!(records[0].get("active"), Some(&Value::Bool(false)));
}

#[test]
fn test_delete_and_rename_handlers() {
    let spec = FormatSpec::new()
        .with_rule("updated", FieldRule::new("delete"))
        .with_rule("nams", FieldRule::new("rename").with_param("to", json!("name")));
    let mut records = vec![record! { "updated" => "2020-02-01", "nams" => "Khan" }];

    formatter()
        .apply_format(&spec, &mut records, &Options::new())
        .unwrap();

    assert_eq!(records[0], record! { "name" => "Khan" });
}

/// Registry with a collective `author` handler that counts its calls
fn spy_formatter(collective: Collective) -> (Formatter, Arc<AtomicUsize>, Arc<Mutex<Vec<usize>>>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let (call_counter, batch_sizes) = (Arc::clone(&calls), Arc::clone(&sizes));

    let mut registry = HandlerRegistry::with_builtins();
    registry
        .register(
            "author",
            HandlerDescriptor::function("lookup_authors").collective(collective),
        )
        .register_collective_function("lookup_authors", move |values, _records, ctx| {
            call_counter.fetch_add(1, Ordering::SeqCst);
            batch_sizes.lock().unwrap().push(values.len());
            let hashed = matches!(
                ctx.formatter.registry().descriptor("author").map(|d| &d.collective),
                Ok(Collective::BatchByHash)
            );
            Ok(values
                .iter()
                .map(|value| {
                    let key = if hashed { content_hash(value) } else { value.to_text() };
                    let author = record! { "id" => value.clone(), "name" => format!("author-{value}") };
                    (key, Value::Record(author))
                })
                .collect())
        });

    let catalog = FormatCatalog::new().with_format(
        "post",
        FormatSpec::new()
            .with_rule("author", FieldRule::new("author"))
            .with_rule("title", FieldRule::new("text")),
    );
    (Formatter::new(catalog, registry), calls, sizes)
}

#[test]
fn test_collective_handler_runs_once_per_batch() {
    let (formatter, calls, sizes) = spy_formatter(Collective::Batch);
    let records = vec![
        record! { "author" => 1, "title" => "a" },
        record! { "author" => 2, "title" => "b" },
        record! { "author" => 1, "title" => "c" },
        record! { "author" => 1, "title" => "d" },
        record! { "title" => "e" },
    ];

    let result = formatter.format_many("post", records, &Options::new()).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(*sizes.lock().unwrap(), vec![2]);
    let names: Vec<String> = result
        .iter()
        .map(|record| {
            record
                .get("author")
                .and_then(Value::as_record)
                .and_then(|author| author.get("name"))
                .map(Value::to_text)
                .unwrap_or_default()
        })
        .collect();
    assert_eq!(names, ["author-1", "author-2", "author-1", "author-1", ""]);
    assert_eq!(result[4].get("author"), Some(&Value::Null));
}

#[test]
fn test_collective_skipped_without_values() {
    let (formatter, calls, _) = spy_formatter(Collective::Batch);
    let result = formatter
        .format_many("post", vec![record! { "title" => "a" }], &Options::new())
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(result[0].get("author"), Some(&Value::Null));
}

#[test]
fn test_collective_by_content_hash() {
    let (formatter, calls, _) = spy_formatter(Collective::BatchByHash);
    let records = vec![
        record! { "author" => "x", "title" => "a" },
        record! { "author" => "x", "title" => "b" },
        record! { "author" => "y", "title" => "c" },
    ];

    let result = formatter.format_many("post", records, &Options::new()).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let author = result[2].get("author").and_then(Value::as_record).unwrap();
    assert_eq!(author.get("name").unwrap().to_text(), "author-y");
}

#[test]
fn test_collective_by_other_property() {
    let mut registry = HandlerRegistry::with_builtins();
    registry
        .register(
            "user",
            HandlerDescriptor::function("users")
                .collective(Collective::BatchBy("user_id".into()))
                .with_field("user_id"),
        )
        .register_collective_function("users", |values, _, _| {
            Ok(values
                .iter()
                .map(|id| (id.to_text(), Value::from(format!("user #{id}"))))
                .collect())
        });
    let formatter = Formatter::new(FormatCatalog::new(), registry);
    let spec = FormatSpec::new().with_rule("user", FieldRule::new("user"));
    let mut records = vec![record! { "user_id" => 7 }, record! { "user_id" => 8 }];

    formatter
        .apply_format(&spec, &mut records, &Options::new())
        .unwrap();

    assert_eq!(records[0].get("user"), Some(&Value::from("user #7")));
    assert_eq!(records[1].get("user"), Some(&Value::from("user #8")));
}

#[test]
fn test_collective_mismatch_is_rejected() {
    let mut registry = HandlerRegistry::with_builtins();
    registry
        .register("broken", HandlerDescriptor::function("per_record"))
        .register_collective_function("per_record", |_, _, _| Ok(CollectiveValues::new()));
    let formatter = Formatter::new(FormatCatalog::new(), registry);
    let spec = FormatSpec::new().with_rule("x", FieldRule::new("broken"));

    let err = formatter
        .apply_format(&spec, &mut [record! { "x" => 1 }], &Options::new())
        .unwrap_err();
    assert!(matches!(err, Error::HandlerMismatch { expected: "per-record", .. }));
}

#[test]
fn test_switch_with_collective_result() {
    let (formatter, calls, sizes) = spy_formatter(Collective::Batch);
    let spec = FormatSpec::new().with_rule(
        "author",
        FieldRule::new("switch").with_param(
            "case",
            json!([{"field": "kind", "operator": "=", "expected": "user", "result": {"type": "author"}}]),
        ),
    );
    let mut records = vec![
        record! { "author" => 3, "kind" => "user" },
        record! { "author" => 4, "kind" => "bot" },
    ];

    formatter
        .apply_format(&spec, &mut records, &Options::new())
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(*sizes.lock().unwrap(), vec![1]);
    assert!(records[0].get("author").and_then(Value::as_record).is_some());
    assert_eq!(records[1].get("author"), Some(&Value::from(4)));
}

#[test]
fn test_options_forwarded_to_handlers() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let mut registry = HandlerRegistry::with_builtins();
    registry
        .register("probe", HandlerDescriptor::function("probe"))
        .register_function("probe", move |value, _, ctx| {
            recorder.lock().unwrap().push(ctx.option.clone());
            Ok(value.into())
        });
    let formatter = Formatter::new(FormatCatalog::new(), registry);
    let spec = FormatSpec::new()
        .with_rule("a", FieldRule::new("probe"))
        .with_rule("b", FieldRule::new("probe"))
        .with_rule("c", FieldRule::new("probe"));
    let options = Options::new().flag("a").set("b", json!({"depth": 1}));

    formatter
        .apply_format(&spec, &mut [Record::new()], &options)
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            FieldOption::Flag,
            FieldOption::Value(json!({"depth": 1})),
            FieldOption::Absent
        ]
    );
}

#[test]
fn test_handler_errors_propagate() {
    let mut registry = HandlerRegistry::with_builtins();
    registry
        .register("fails", HandlerDescriptor::function("fails"))
        .register_function("fails", |_, _, _| {
            Err(Error::handler("fails", anyhow::anyhow!("backend offline")))
        });
    let formatter = Formatter::new(FormatCatalog::new(), registry);
    let spec = FormatSpec::new().with_rule("x", FieldRule::new("fails"));

    let err = formatter
        .apply_format(&spec, &mut [record! { "x" => 1 }], &Options::new())
        .unwrap_err();
    assert!(err.to_string().contains("backend offline"));
}
