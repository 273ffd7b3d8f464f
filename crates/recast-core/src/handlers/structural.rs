//! Handlers that reshape records, derive values from other fields or re-enter
//! the engine

use crate::error::{Error, Result};
use crate::objects::Text;
use crate::path;
use crate::record::Record;
use crate::registry::{HandlerContext, HandlerFn, Outcome, RecordMutation};
use crate::rule::FieldRule;
use crate::value::Value;

const DEFAULT_SEPARATOR: &str = "\n";

pub(super) fn delete() -> Outcome {
    Outcome::Mutate(RecordMutation::Remove)
}

pub(super) fn rename(ctx: &HandlerContext<'_>) -> Result<Outcome> {
    let to = ctx
        .rule
        .str_param("to")
        .ok_or_else(|| Error::invalid_rule(ctx.field, "`rename` requires a `to` field name"))?;
    Ok(Outcome::Mutate(RecordMutation::MoveTo(to.to_string())))
}

pub(super) fn multiple_text(value: Value, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    let separator = ctx.rule.str_param("separator").unwrap_or(DEFAULT_SEPARATOR);
    if separator.is_empty() {
        return Err(Error::invalid_rule(ctx.field, "`separator` must not be empty"));
    }

    let items: Vec<String> = match &value {
        Value::Null => Vec::new(),
        Value::List(items) => items.iter().map(Value::to_text).collect(),
        _ if separator == "json" => {
            let raw = value.to_text();
            let parsed: Vec<serde_json::Value> = serde_json::from_str(&raw)
                .map_err(|e| Error::invalid_value("json list", raw.as_str(), e.to_string()))?;
            parsed.into_iter().map(|item| Value::from(item).to_text()).collect()
        }
        _ => value.to_text().split(separator).map(str::to_string).collect(),
    };

    let texts = items
        .iter()
        .map(|item| Value::from(Text::new(item.trim())))
        .collect::<Vec<_>>();
    Ok(Value::List(texts).into())
}

pub(super) fn join(record: &Record, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    let fields = ctx
        .rule
        .param("fields")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| Error::invalid_rule(ctx.field, "`join` requires a `fields` list"))?;
    let separator = ctx.rule.str_param("separator").unwrap_or_default();

    let mut parts = Vec::with_capacity(fields.len());
    for entry in fields {
        let entry = entry
            .as_str()
            .ok_or_else(|| Error::invalid_rule(ctx.field, "`fields` entries must be strings"))?;
        match entry.strip_prefix('$') {
            Some(field_path) => parts.push(path::resolve(record, field_path)?.to_text()),
            None => parts.push(entry.to_string()),
        }
    }
    Ok(Value::from(parts.join(separator)).into())
}

/// Read one `source` entry: a path, optionally pushed through another type
fn clone_entry(entry: &serde_json::Value, record: &mut Record, ctx: &HandlerContext<'_>) -> Result<Value> {
    let field_path = entry
        .get("field")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| Error::invalid_rule(ctx.field, "clone sources require a `field` path"))?;
    let value = path::resolve(record, field_path)?;

    if entry.get("type").is_none() {
        return Ok(value);
    }
    let rule = FieldRule::from_json(entry.clone())?;
    match ctx
        .formatter
        .apply_type(&rule.type_name, value, ctx.field, record, &rule, ctx.option)?
    {
        Outcome::Value(value) => Ok(value),
        Outcome::Mutate(_) => Err(Error::invalid_rule(
            ctx.field,
            format!("clone source `{field_path}` cannot use the record-reshaping type `{}`", rule.type_name),
        )),
    }
}

pub(super) fn clone(record: &mut Record, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    if let Some(source) = ctx.rule.param("source") {
        return Ok(clone_entry(source, record, ctx)?.into());
    }

    let Some(sources) = ctx.rule.param("sources") else {
        return Ok(Outcome::none());
    };
    let sources = sources
        .as_object()
        .ok_or_else(|| Error::invalid_rule(ctx.field, "`sources` must map names to sources"))?;

    let mut cloned = Record::new();
    for (name, entry) in sources {
        let value = clone_entry(entry, record, ctx)?;
        cloned.insert(name.as_str(), value);
    }
    Ok(Value::Record(cloned).into())
}

pub(super) fn custom(value: Value, record: &mut Record, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    let name = ctx
        .rule
        .str_param("handler")
        .ok_or_else(|| Error::invalid_rule(ctx.field, "`custom` requires a `handler` name"))?;

    match ctx.formatter.registry().function(name)? {
        HandlerFn::Record(function) => (**function)(value, record, ctx),
        HandlerFn::Batch(_) => Err(Error::handler_mismatch(name, "per-record")),
    }
}

pub(super) fn json(value: Value, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    let parsed = match &value {
        Value::Null => return Ok(Outcome::none()),
        Value::Record(_) | Value::List(_) => value.to_json(),
        other => match serde_json::from_str::<serde_json::Value>(&other.to_text()) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(Outcome::none()),
        },
    };

    let Some(format) = ctx.rule.str_param("format") else {
        return Ok(Value::from(parsed).into());
    };
    let options = ctx.option.to_options();

    match parsed {
        serde_json::Value::Array(items) => {
            let records = items
                .into_iter()
                .map(|item| {
                    let raw = item.to_string();
                    Record::from_json(item).ok_or_else(|| {
                        Error::invalid_value("record", raw, "nested formats apply to objects only")
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let formatted = ctx.formatter.format_many(format, records, &options)?;
            Ok(Value::List(formatted.into_iter().map(Value::Record).collect()).into())
        }
        serde_json::Value::Object(map) => {
            let record: Record = map.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
            Ok(Value::from(ctx.formatter.format_one(format, record, &options)?).into())
        }
        scalar => Ok(Value::from(scalar).into()),
    }
}
