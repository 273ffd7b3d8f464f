//! Handlers that wrap a single value
//!
//! Each handler leaves a value that already holds its own wrapper type alone.

use crate::error::{Error, Result};
use crate::objects::{DateTime, Identifier, Interval, MediaEmbed, Number, Text, Typed};
use crate::registry::{HandlerContext, Outcome};
use crate::value::Value;

pub(super) fn boolean(value: Value) -> Outcome {
    Value::Bool(value.is_truthy()).into()
}

pub(super) fn text(value: Value) -> Outcome {
    match value {
        Value::Typed(Typed::Text(_)) => value.into(),
        other => Value::from(Text::new(other.to_text())).into(),
    }
}

pub(super) fn number(value: Value, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    let decimal = match ctx.rule.param("decimal") {
        None | Some(serde_json::Value::Null) => 0,
        Some(raw) => raw
            .as_u64()
            .and_then(|d| u32::try_from(d).ok())
            .ok_or_else(|| Error::invalid_rule(ctx.field, "`decimal` must be a non-negative integer"))?,
    };

    if let Some(existing) = value.as_number() {
        if existing.decimal() == decimal {
            return Ok(value.into());
        }
    }
    Ok(Value::from(Number::new(&value, decimal)).into())
}

pub(super) fn date(value: Value, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    if value.as_datetime().is_some() {
        return Ok(value.into());
    }

    let raw = value.to_text();
    if raw.trim().is_empty() {
        return Ok(Value::from(DateTime::empty()).into());
    }
    let date = DateTime::parse(&raw, ctx.rule.str_param("timezone"))?;
    Ok(Value::from(date).into())
}

pub(super) fn interval(value: Value) -> Result<Outcome> {
    if value.as_interval().is_some() {
        return Ok(value.into());
    }

    let raw = value.to_text();
    if raw.trim().is_empty() {
        return Ok(Value::from(Interval::empty()).into());
    }
    Ok(Value::from(Interval::parse(&raw)?).into())
}

pub(super) fn identifier(value: Value) -> Outcome {
    match value {
        Value::Typed(Typed::Identifier(_)) => value.into(),
        other => Value::from(Identifier::new(other)).into(),
    }
}

pub(super) fn embed(value: Value, ctx: &HandlerContext<'_>) -> Outcome {
    match value {
        Value::Null | Value::Typed(Typed::Embed(_)) => value.into(),
        other => {
            let embed = MediaEmbed::new(other.to_text(), ctx.formatter.media_resolver());
            Value::from(embed).into()
        }
    }
}
