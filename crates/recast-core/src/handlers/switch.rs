//! Conditional dispatch
//!
//! `case` holds an ordered list (or an ordered map of named entries) of
//! conditions. The first case whose condition holds decides which rule the
//! value goes through; with no match the value passes through unchanged.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::path;
use crate::record::Record;
use crate::registry::{HandlerContext, Outcome};
use crate::rule::FieldRule;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison between a record value and a case's expected value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "!in")]
    NotIn,
}

/// One `switch` branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Property to compare; a leading `$` makes it a dotted path
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub expected: serde_json::Value,
    /// Rule applied to the value when this case matches
    pub result: FieldRule,
}

impl Case {
    fn subject(&self, record: &Record) -> Result<Value> {
        match self.field.strip_prefix('$') {
            Some(field_path) => path::resolve(record, field_path),
            None => Ok(record.value_or_null(&self.field)),
        }
    }

    fn matches(&self, subject: &Value, field: &str) -> Result<bool> {
        let expected = Value::from(self.expected.clone());
        let ordering = || loose_cmp(subject, &expected);

        Ok(match self.operator {
            Operator::Eq => loose_eq(subject, &expected),
            Operator::Ne => !loose_eq(subject, &expected),
            Operator::Gt => ordering() == Some(Ordering::Greater),
            Operator::Lt => ordering() == Some(Ordering::Less),
            Operator::Ge => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
            Operator::Le => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            Operator::In | Operator::NotIn => {
                let candidates = expected.as_list().ok_or_else(|| {
                    Error::invalid_rule(field, "`in` and `!in` expect a list of values")
                })?;
                let found = candidates.iter().any(|candidate| loose_eq(subject, candidate));
                found == (self.operator == Operator::In)
            }
        })
    }
}

/// Equality across representations: numbers compare numerically, booleans and
/// null by truthiness, everything else by textual form
fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(_) | Value::Null, _) | (_, Value::Bool(_) | Value::Null) => {
            left.is_truthy() == right.is_truthy()
        }
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => left.to_text() == right.to_text(),
        },
    }
}

fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => Some(left.to_text().cmp(&right.to_text())),
    }
}

fn parse_cases(ctx: &HandlerContext<'_>) -> Result<Vec<Case>> {
    let raw = ctx
        .rule
        .param("case")
        .ok_or_else(|| Error::invalid_rule(ctx.field, "`switch` requires `case` entries"))?;

    let entries: Vec<&serde_json::Value> = match raw {
        serde_json::Value::Array(items) => items.iter().collect(),
        serde_json::Value::Object(named) => named.values().collect(),
        _ => return Err(Error::invalid_rule(ctx.field, "`case` must be a list or a map")),
    };

    entries
        .into_iter()
        .map(|entry| {
            Case::deserialize(entry)
                .map_err(|e| Error::invalid_rule(ctx.field, format!("malformed case: {e}")))
        })
        .collect()
}

pub(super) fn switch(value: Value, record: &mut Record, ctx: &HandlerContext<'_>) -> Result<Outcome> {
    for case in parse_cases(ctx)? {
        let subject = case.subject(record)?;
        if !case.matches(&subject, ctx.field)? {
            continue;
        }
        return ctx.formatter.apply_type(
            &case.result.type_name,
            value,
            ctx.field,
            record,
            &case.result,
            ctx.option,
        );
    }
    Ok(value.into())
}
