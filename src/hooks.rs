//! Caller-supplied conversions that replace default construction for a kind.
use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

use crate::annotation::{is_builtin_head, is_identifier};
use crate::error::ArgumentError;
use crate::ir::Kind;
use crate::value::Value;

/// Raw value in, instance of the hooked kind out.
pub type HookFn = dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync;

/// Read-only for the whole cast tree; clones share the same functions.
#[derive(Clone, Default)]
pub struct Hooks {
    table: IndexMap<Kind, Arc<HookFn>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with<F>(mut self, kind: Kind, hook: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.insert(kind, hook);
        self
    }

    /// Registers `hook` for `kind`, replacing any previous one.
    pub fn insert<F>(&mut self, kind: Kind, hook: F)
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.table.insert(kind, Arc::new(hook));
    }

    pub fn get(&self, kind: &Kind) -> Option<&HookFn> {
        self.table.get(kind).map(|h| &**h)
    }

    pub fn contains(&self, kind: &Kind) -> bool {
        self.table.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.table.keys()
    }

    /// Every key must name a concrete type that some annotation can reach.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        for kind in self.table.keys() {
            let Kind::Named(name) = kind else { continue };
            let reason = if !is_identifier(name) {
                "not a type name".to_string()
            } else if is_builtin_head(name) {
                format!("`{name}` is a builtin annotation; key the hook by its builtin kind")
            } else {
                continue;
            };
            return Err(ArgumentError::InvalidHook { key: kind.clone(), reason });
        }
        Ok(())
    }
}

/// Hook body for `Kind::DateTime`: ISO-8601 text (`2023-10-11T00:00:00`, with
/// optional fractional seconds, or a bare date at midnight) to a datetime.
pub fn iso_datetime(value: &Value) -> anyhow::Result<Value> {
    let Some(text) = value.as_str() else {
        anyhow::bail!("expected an ISO-8601 string, got {}", value.kind());
    };
    let text = text.trim();
    if let Ok(dt) = text.parse::<NaiveDateTime>() {
        return Ok(Value::DateTime(dt));
    }
    let date = text
        .parse::<NaiveDate>()
        .with_context(|| format!("invalid ISO-8601 datetime {text:?}"))?;
    Ok(Value::DateTime(date.and_time(NaiveTime::MIN)))
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}
