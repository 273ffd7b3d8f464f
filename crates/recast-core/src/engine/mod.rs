//! Formatting engine
//!
//! [`Formatter`] runs a [`FormatSpec`] over a batch of records in place. Fields
//! whose handler is collective are resolved with one handler call per batch,
//! however many records share a value; all other fields are dispatched per
//! record. Handlers may re-enter the formatter for nested data.
//!
//! ```
//! use recast_core::{record, FieldRule, FormatCatalog, FormatSpec, Formatter, HandlerRegistry, Options};
//!
//! let catalog = FormatCatalog::new().with_format(
//!     "user",
//!     FormatSpec::new()
//!         .with_rule("name", FieldRule::new("text"))
//!         .with_rule("age", FieldRule::new("number")),
//! );
//! let formatter = Formatter::new(catalog, HandlerRegistry::with_builtins());
//!
//! let user = formatter
//!     .format_one("user", record! { "name" => "Khan", "age" => "31" }, &Options::new())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(user.get("age").unwrap().as_number().unwrap().value(), 31.0);
//! ```
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::catalog::FormatSource;
use crate::error::{Error, Result};
use crate::handlers::Builtin;
use crate::objects::{MediaResolver, ProviderResolver};
use crate::options::{FieldOption, Options};
use crate::record::Record;
use crate::registry::{
    content_hash, BatchFn, Collective, CollectiveValues, HandlerContext, HandlerDescriptor,
    HandlerFn, HandlerRef, HandlerRegistry, Outcome, RecordFn, RecordMutation,
};
use crate::rule::{FieldRule, FormatSpec};
use crate::value::Value;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A handler resolved to something callable
#[derive(Clone)]
enum Executable {
    Builtin(Builtin),
    Record(Arc<RecordFn>),
    Batch(Arc<BatchFn>),
}

/// A classified field, ready to run
struct FieldPlan<'s> {
    field: &'s str,
    rule: &'s FieldRule,
    descriptor: HandlerDescriptor,
    executable: Executable,
}

impl FieldPlan<'_> {
    /// Property whose values are collected for batch dispatch
    fn source(&self) -> &str {
        self.descriptor.field.as_deref().unwrap_or(self.field)
    }

    /// Key under which this record's batch result is looked up
    fn lookup_key(&self, record: &Record) -> String {
        match &self.descriptor.collective {
            Collective::BatchByHash => content_hash(&record.value_or_null(self.field)),
            Collective::BatchBy(property) => record.value_or_null(property).to_text(),
            Collective::Batch | Collective::PerRecord => record.value_or_null(self.source()).to_text(),
        }
    }
}

/// The engine entry point
#[derive(Clone)]
pub struct Formatter {
    formats: Arc<dyn FormatSource>,
    registry: Arc<HandlerRegistry>,
    media: Arc<dyn MediaResolver>,
}

impl Formatter {
    pub fn new(formats: impl FormatSource + 'static, registry: HandlerRegistry) -> Self {
        Self::from_shared(Arc::new(formats), Arc::new(registry))
    }

    /// Build from a format source and registry shared with other formatters
    pub fn from_shared(formats: Arc<dyn FormatSource>, registry: Arc<HandlerRegistry>) -> Self {
        Self {
            formats,
            registry,
            media: Arc::new(ProviderResolver),
        }
    }

    /// Replace the resolver used by the `embed` handler
    pub fn with_media_resolver(mut self, resolver: impl MediaResolver + 'static) -> Self {
        self.media = Arc::new(resolver);
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn media_resolver(&self) -> &dyn MediaResolver {
        self.media.as_ref()
    }

    /// Look up a format by name
    pub fn resolve_format(&self, name: &str) -> Result<FormatSpec> {
        let spec = self
            .formats
            .format(name)
            .ok_or_else(|| Error::format_not_found(name))?;
        debug!(format = name, fields = spec.len(), "resolved format");
        Ok(spec)
    }

    /// Format a single record
    ///
    /// Equivalent to [`format_many`](Self::format_many) over a one-record batch.
    pub fn format_one(&self, format: &str, record: Record, options: &Options) -> Result<Option<Record>> {
        Ok(self.format_many(format, vec![record], options)?.into_iter().next())
    }

    pub fn format_many(&self, format: &str, mut records: Vec<Record>, options: &Options) -> Result<Vec<Record>> {
        let spec = self.resolve_format(format)?;
        self.apply_format(&spec, &mut records, options)?;
        Ok(records)
    }

    /// Format a batch and key the result by each record's `key_by` value
    pub fn format_many_keyed(
        &self,
        format: &str,
        records: Vec<Record>,
        options: &Options,
        key_by: &str,
    ) -> Result<IndexMap<String, Record>> {
        let spec = self.resolve_format(format)?;
        self.apply_format_keyed(&spec, records, options, key_by)
    }

    pub fn apply_format_keyed(
        &self,
        spec: &FormatSpec,
        mut records: Vec<Record>,
        options: &Options,
        key_by: &str,
    ) -> Result<IndexMap<String, Record>> {
        self.apply_format(spec, &mut records, options)?;
        Ok(key_records(records, key_by))
    }

    /// Run `spec` over `records` in place
    ///
    /// Every handler the format names is resolved before any record is touched, so
    /// an unknown type leaves the whole batch unchanged.
    pub fn apply_format(&self, spec: &FormatSpec, records: &mut [Record], options: &Options) -> Result<()> {
        let spec = expand_rest(spec, records);
        let plans = self.classify(&spec)?;

        debug!(
            fields = plans.len(),
            records = records.len(),
            collective = plans.iter().filter(|p| p.descriptor.is_collective()).count(),
            "applying format"
        );

        for plan in &plans {
            if let Some(source) = &plan.rule.clone_from {
                for record in records.iter_mut() {
                    let value = record.value_or_null(source);
                    record.insert(plan.field, value);
                }
            }
        }

        let batches = self.dispatch_batches(&plans, records, options)?;

        for plan in &plans {
            let option = options.get(plan.field);
            let ctx = HandlerContext {
                formatter: self,
                field: plan.field,
                rule: plan.rule,
                option,
            };

            for record in records.iter_mut() {
                match &plan.executable {
                    Executable::Batch(_) => {
                        let key = plan.lookup_key(record);
                        let value = batches
                            .get(plan.field)
                            .and_then(|results| results.get(&key))
                            .cloned()
                            .unwrap_or_default();
                        record.insert(plan.field, value);
                    }
                    executable => {
                        let value = record.value_or_null(plan.field);
                        match self.run(executable, &plan.rule.type_name, value, record, &ctx)? {
                            Outcome::Value(Value::Null) => {}
                            Outcome::Value(value) => {
                                record.insert(plan.field, value);
                            }
                            Outcome::Mutate(mutation) => mutation.apply(plan.field, record),
                        }
                    }
                }

                if let Some(to) = &plan.rule.rename {
                    RecordMutation::MoveTo(to.clone()).apply(plan.field, record);
                }
            }
        }

        Ok(())
    }

    /// Dispatch a single value through the handler registered as `type_name`
    ///
    /// A collective handler is called with a one-value batch; when its result
    /// has no entry for the value, the value comes back unchanged.
    pub fn apply_type(
        &self,
        type_name: &str,
        value: Value,
        field: &str,
        record: &mut Record,
        rule: &FieldRule,
        option: &FieldOption,
    ) -> Result<Outcome> {
        let (descriptor, executable) = self.resolve(type_name)?;
        let ctx = HandlerContext {
            formatter: self,
            field,
            rule,
            option,
        };

        match &executable {
            Executable::Batch(function) => {
                let key = match descriptor.collective {
                    Collective::BatchByHash => content_hash(&value),
                    _ => value.to_text(),
                };
                let results = (**function)(std::slice::from_ref(&value), std::slice::from_ref(&*record), &ctx)?;
                Ok(results.get(&key).cloned().unwrap_or(value).into())
            }
            other => self.run(other, type_name, value, record, &ctx),
        }
    }

    fn run(
        &self,
        executable: &Executable,
        type_name: &str,
        value: Value,
        record: &mut Record,
        ctx: &HandlerContext<'_>,
    ) -> Result<Outcome> {
        match executable {
            Executable::Builtin(builtin) => builtin.apply(value, record, ctx),
            Executable::Record(function) => (**function)(value, record, ctx),
            Executable::Batch(_) => Err(Error::handler_mismatch(type_name, "per-record")),
        }
    }

    /// Resolve a type name to its descriptor and a callable matching the
    /// descriptor's collectivity
    fn resolve(&self, type_name: &str) -> Result<(HandlerDescriptor, Executable)> {
        let descriptor = self.registry.descriptor(type_name)?.clone();
        let executable = match &descriptor.handler {
            HandlerRef::Builtin(builtin) => Executable::Builtin(*builtin),
            HandlerRef::Function(name) => match self.registry.function(name)? {
                HandlerFn::Record(function) => Executable::Record(Arc::clone(function)),
                HandlerFn::Batch(function) => Executable::Batch(Arc::clone(function)),
            },
        };

        match (&executable, descriptor.is_collective()) {
            (Executable::Batch(_), false) => Err(Error::handler_mismatch(type_name, "per-record")),
            (Executable::Builtin(_) | Executable::Record(_), true) => {
                Err(Error::handler_mismatch(type_name, "collective"))
            }
            _ => Ok((descriptor, executable)),
        }
    }

    fn classify<'s>(&self, spec: &'s FormatSpec) -> Result<Vec<FieldPlan<'s>>> {
        spec.iter()
            .map(|(field, rule)| {
                let (descriptor, executable) = self.resolve(&rule.type_name)?;
                Ok(FieldPlan {
                    field: field.as_str(),
                    rule,
                    descriptor,
                    executable,
                })
            })
            .collect()
    }

    /// Call every collective handler once with the unique values of its field
    fn dispatch_batches<'s>(
        &self,
        plans: &[FieldPlan<'s>],
        records: &[Record],
        options: &Options,
    ) -> Result<IndexMap<&'s str, CollectiveValues>> {
        let mut batches = IndexMap::new();

        for plan in plans {
            let Executable::Batch(function) = &plan.executable else {
                continue;
            };

            let source = plan.source();
            let mut seen = HashSet::new();
            let values: Vec<Value> = records
                .iter()
                .filter_map(|record| record.get(source))
                .filter(|value| !value.is_null() && seen.insert(value.to_text()))
                .cloned()
                .collect();

            trace!(field = plan.field, source, unique = values.len(), "collective dispatch");
            if values.is_empty() {
                continue;
            }

            let ctx = HandlerContext {
                formatter: self,
                field: plan.field,
                rule: plan.rule,
                option: options.get(plan.field),
            };
            let results = (**function)(&values, records, &ctx)?;
            batches.insert(plan.field, results);
        }

        Ok(batches)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Give every property of the first record that the format does not name a copy
/// of the `@rest` rule
///
/// Properties that only appear on later records are not covered.
fn expand_rest<'s>(spec: &'s FormatSpec, records: &[Record]) -> Cow<'s, FormatSpec> {
    if !spec.contains(FormatSpec::REST_KEY) {
        return Cow::Borrowed(spec);
    }

    let mut expanded = spec.clone();
    let Some(rest) = expanded.take_rest() else {
        return Cow::Owned(expanded);
    };

    if let Some(first) = records.first() {
        let missing: Vec<String> = first
            .keys()
            .filter(|field| !expanded.contains(field))
            .cloned()
            .collect();
        trace!(fields = missing.len(), "expanding @rest");
        for field in missing {
            expanded.insert(field, rest.clone());
        }
    }
    Cow::Owned(expanded)
}

/// Key records by the textual form of their `key_by` value; a missing value
/// keys as the empty string and later records win on collision
fn key_records(records: Vec<Record>, key_by: &str) -> IndexMap<String, Record> {
    records
        .into_iter()
        .map(|record| (record.value_or_null(key_by).to_text(), record))
        .collect()
}

#[cfg(test)]
mod tests;
