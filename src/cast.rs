//! Recursive caster: raw maps in, schema records out.
//!
//! For each input key the field's descriptor is looked up and the raw value
//! converted by trying the descriptor's candidates in declaration order:
//!
//! - a value whose kind already is a candidate is returned untouched;
//! - otherwise a registered hook wins over everything else for its kind;
//! - a candidate naming a registered schema recurses into `cast_to_schema`;
//! - anything else goes through the kind's default constructor.
//!
//! The first candidate to succeed wins. Only when all of them fail does the
//! cast fail, naming every kind it tried.
pub mod container;
pub mod scalar;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::config::{CastOptions, FailurePolicy};
use crate::error::{ArgumentError, CastError, ConversionError, ConvertError, Result};
use crate::hooks::Hooks;
use crate::ir::{Descriptor, Kind};
use crate::resolve::resolve_schema_types;
use crate::schema::{Record, SchemaRegistry};
use crate::value::{Map, Value};

static NO_HOOKS: Lazy<Hooks> = Lazy::new(Hooks::default);

// ----------------------------- Construction ------------------------------- //

/// Default single-argument construction of `kind` from `value`.
pub fn construct(kind: &Kind, value: &Value) -> Result<Value, ConvertError> {
    match kind {
        Kind::Str => Ok(scalar::to_str(value)),
        Kind::Int => scalar::to_int(value),
        Kind::Float => scalar::to_float(value),
        Kind::Bool => Ok(scalar::to_bool(value)),
        Kind::List => container::to_list(value),
        Kind::Tuple => container::to_tuple(value),
        Kind::Set => container::to_set(value),
        Kind::Dict => container::to_dict(value),
        // only identity or a hook produces these
        Kind::NoneType | Kind::DateTime | Kind::Named(_) => {
            Err(ConvertError::Unsupported { from: value.kind(), to: kind.clone() })
        }
    }
}

// ------------------------------- Front API -------------------------------- //

/// One configured cast context. Cheap to build; holds only borrows.
#[derive(Debug, Clone)]
pub struct Caster<'a> {
    registry: &'a SchemaRegistry,
    hooks: &'a Hooks,
    options: CastOptions,
}

enum Attempt {
    /// Try the next candidate.
    Skip(String),
    /// Stop the whole cast.
    Abort(CastError),
}

impl<'a> Caster<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry, hooks: &NO_HOOKS, options: CastOptions::default() }
    }

    pub fn with_hooks(mut self, hooks: &'a Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_options(mut self, options: CastOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CastOptions {
        &self.options
    }

    /// Cast `input` (a mapping) into a record of the schema named `schema`.
    pub fn cast_to_schema(&self, schema: &str, input: &Value) -> Result<Record> {
        self.hooks.validate()?;
        self.cast_record(schema, input)
    }

    /// Cast one value to `descriptor`.
    pub fn cast_value(&self, value: &Value, descriptor: &Descriptor) -> Result<Value> {
        self.hooks.validate()?;
        self.cast_any(value, descriptor)
    }

    /// Cast, then deserialize the record into a native struct.
    pub fn cast_into<T: DeserializeOwned>(&self, schema: &str, input: &Value) -> anyhow::Result<T> {
        let record = self.cast_to_schema(schema, input)?;
        Ok(crate::path_de::from_record(&record)?)
    }

    fn cast_record(&self, schema_name: &str, input: &Value) -> Result<Record> {
        let schema = self
            .registry
            .get(schema_name)
            .ok_or_else(|| ArgumentError::UnknownSchema { name: schema_name.to_string() })?;
        let Value::Dict(map) = input else {
            return Err(ArgumentError::NotAMapping { found: input.kind() }.into());
        };
        tracing::debug!(schema = schema_name, keys = map.len(), "casting record");

        let types = resolve_schema_types(schema);
        let mut kwargs = Map::with_capacity(map.len());
        for (key, raw) in map {
            // undeclared keys go through untouched; construct() rejects them
            let value = match types.get(key) {
                Some(descriptor) => self.cast_any(raw, descriptor)?,
                None => raw.clone(),
            };
            kwargs.insert(key.clone(), value);
        }
        Ok(schema.construct(kwargs)?)
    }

    fn cast_any(&self, value: &Value, descriptor: &Descriptor) -> Result<Value> {
        let candidates = descriptor.candidates();
        let kind = value.kind();
        if candidates.contains(&kind) && !self.impersonates_schema(value) {
            tracing::trace!(%kind, "already a candidate type");
            return Ok(value.clone());
        }

        let mut reasons = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.attempt(value, candidate) {
                Ok(out) => {
                    tracing::trace!(from = %kind, to = %candidate, "cast");
                    return Ok(out);
                }
                Err(Attempt::Abort(err)) => return Err(err),
                Err(Attempt::Skip(reason)) => {
                    tracing::debug!(from = %kind, to = %candidate, %reason, "candidate failed");
                    reasons.push(reason);
                }
            }
        }

        tracing::debug!(%value, %descriptor, "no candidate succeeded");
        Err(ConversionError { value: value.clone(), attempted: candidates.to_vec(), reasons }.into())
    }

    // An opaque value carrying a schema's name is not an instance of that schema.
    fn impersonates_schema(&self, value: &Value) -> bool {
        matches!(value, Value::Opaque(o) if self.registry.contains(&o.type_name))
    }

    fn attempt(&self, value: &Value, candidate: &Kind) -> std::result::Result<Value, Attempt> {
        if let Some(hook) = self.hooks.get(candidate) {
            return hook(value).map_err(|source| match self.options.failure_policy {
                FailurePolicy::SwallowAll => Attempt::Skip(format!("hook failed: {source:#}")),
                FailurePolicy::SurfaceHookErrors => {
                    Attempt::Abort(CastError::Hook { kind: candidate.clone(), source })
                }
            });
        }
        if let Kind::Named(name) = candidate {
            if self.registry.contains(name) {
                return self.cast_record(name, value).map(Value::Record).map_err(|err| match err {
                    // only produced under SurfaceHookErrors; keep unwinding
                    err @ CastError::Hook { .. } => Attempt::Abort(err),
                    other => Attempt::Skip(other.to_string()),
                });
            }
        }
        construct(candidate, value).map_err(|e| Attempt::Skip(e.to_string()))
    }
}

/// Cast `input` into the schema named `schema`, using `hooks` at every depth.
pub fn cast_to_schema(
    registry: &SchemaRegistry,
    schema: &str,
    input: &Value,
    hooks: &Hooks,
) -> Result<Record> {
    Caster::new(registry).with_hooks(hooks).cast_to_schema(schema, input)
}

pub fn cast_value(
    registry: &SchemaRegistry,
    value: &Value,
    descriptor: &Descriptor,
    hooks: &Hooks,
) -> Result<Value> {
    Caster::new(registry).with_hooks(hooks).cast_value(value, descriptor)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeExpr;
    use crate::schema::SchemaDef;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with(
                SchemaDef::new("Class2")
                    .field("foo", TypeExpr::Str)
                    .field_with_default("bar", TypeExpr::Int, 2),
            )
            .unwrap()
            .with(
                SchemaDef::new("Class4")
                    .field("foo", TypeExpr::named("Class2"))
                    .field("bar", TypeExpr::Bool),
            )
            .unwrap()
    }

    fn ty(src: &str) -> Descriptor {
        crate::resolve::resolve_field_type(&src.parse().unwrap())
    }

    fn cast(v: serde_json::Value, src: &str) -> Result<Value> {
        cast_value(&registry(), &Value::from(v), &ty(src), &Hooks::new())
    }

    #[test]
    fn identity_short_circuits_union() {
        assert_eq!(cast(json!(10), "Union[int, str]").unwrap(), Value::Int(10));
        assert_eq!(cast(json!(10), "Union[str, int]").unwrap(), Value::Int(10));
        assert_eq!(cast(json!([1, 2, 3]), "List[int]").unwrap(), Value::from(json!([1, 2, 3])));
    }

    #[test]
    fn first_successful_candidate_wins() {
        assert_eq!(cast(json!(true), "Union[str, int]").unwrap(), Value::from("true"));
        assert_eq!(cast(json!(true), "Union[int, str]").unwrap(), Value::Int(1));
        assert_eq!(cast(json!([12]), "Union[int, str]").unwrap(), Value::from("[12]"));
        assert_eq!(cast(json!("7"), "Union[float, int]").unwrap(), Value::float(7.0));
    }

    #[test]
    fn exhaustion_names_every_candidate_in_order() {
        let err = cast(json!("abc"), "Union[int, float, Class2]").unwrap_err();
        let conv = err.as_conversion().expect("conversion error");
        assert_eq!(conv.attempted, vec![Kind::Int, Kind::Float, Kind::named("Class2")]);
        assert_eq!(conv.reasons.len(), 3);
        assert_eq!(err.to_string(), "unable to cast 'abc' to any of: int, float, Class2");
    }

    #[test]
    fn opaque_named_types_need_a_hook() {
        let err = cast(json!(5), "Money").unwrap_err();
        assert_eq!(err.as_conversion().unwrap().attempted, vec![Kind::named("Money")]);

        let hooks = Hooks::new().with(Kind::named("Money"), |v| Ok(Value::opaque("Money", v.clone())));
        let out = cast_value(&registry(), &Value::Int(5), &ty("Money"), &hooks).unwrap();
        assert_eq!(out, Value::opaque("Money", Value::Int(5)));
        // already a Money: identity
        let again = cast_value(&registry(), &out, &ty("Money"), &hooks).unwrap();
        assert_eq!(again, out);
    }

    #[test]
    fn opaque_values_named_like_a_schema_are_not_records() {
        let fake = Value::opaque("Class2", Value::Int(5));
        let err = cast_value(&registry(), &fake, &ty("Class2"), &Hooks::new()).unwrap_err();
        assert_eq!(err.as_conversion().unwrap().attempted, vec![Kind::named("Class2")]);

        let reg = registry();
        let input = Value::Dict(
            [("foo".to_string(), fake), ("bar".to_string(), Value::Bool(true))].into_iter().collect(),
        );
        assert!(Caster::new(&reg).cast_to_schema("Class4", &input).unwrap_err().as_conversion().is_some());
    }

    #[test]
    fn nested_records_cast_recursively() {
        let reg = registry();
        let input = Value::from(json!({"foo": {"foo": 10, "bar": 10}, "bar": false}));
        let r = Caster::new(&reg).cast_to_schema("Class4", &input).unwrap();
        let inner = r.get("foo").and_then(Value::as_record).unwrap();
        assert_eq!(inner.get("foo"), Some(&Value::from("10")));
        assert_eq!(inner.get("bar"), Some(&Value::Int(10)));
        assert_eq!(r.get("bar"), Some(&Value::Bool(false)));

        // a record already of the right schema is kept as-is
        let again = Caster::new(&reg)
            .cast_value(&Value::Record(r.clone()), &Descriptor::Single(Kind::named("Class4")))
            .unwrap();
        assert_eq!(again, Value::Record(r));
    }

    #[test]
    fn nested_failure_is_a_failed_candidate() {
        let reg = registry();
        let input = Value::from(json!({"foo": 3, "bar": true}));
        let err = Caster::new(&reg).cast_to_schema("Class4", &input).unwrap_err();
        let conv = err.as_conversion().unwrap();
        assert_eq!(conv.attempted, vec![Kind::named("Class2")]);
        assert!(conv.reasons[0].contains("mapping"));
    }

    #[test]
    fn hooks_take_precedence_over_default_construction() {
        let hooks = Hooks::new().with(Kind::Int, |_| Ok(Value::Int(99)));
        let out = cast_value(&registry(), &Value::from("5"), &ty("int"), &hooks).unwrap();
        assert_eq!(out, Value::Int(99));
    }

    #[test]
    fn failing_hook_falls_through_to_next_candidate() {
        let hooks = Hooks::new().with(Kind::Int, |_| anyhow::bail!("boom"));
        let out = cast_value(&registry(), &Value::from("5"), &ty("Union[int, float]"), &hooks).unwrap();
        assert_eq!(out, Value::float(5.0));
    }

    #[test]
    fn surfaced_hook_errors_abort_at_any_depth() {
        let reg = registry();
        let hooks = Hooks::new().with(Kind::Str, |_| anyhow::bail!("boom"));
        let caster = Caster::new(&reg)
            .with_hooks(&hooks)
            .with_options(CastOptions::default().with_failure_policy(FailurePolicy::SurfaceHookErrors));
        let input = Value::from(json!({"foo": {"foo": 10}, "bar": true}));
        let err = caster.cast_to_schema("Class4", &input).unwrap_err();
        assert!(matches!(err, CastError::Hook { kind: Kind::Str, .. }), "{err}");
    }

    #[test]
    fn invalid_arguments_fail_before_conversion() {
        let reg = registry();
        let caster = Caster::new(&reg);
        assert!(matches!(
            caster.cast_to_schema("Nope", &Value::from(json!({}))),
            Err(CastError::InvalidArgument(ArgumentError::UnknownSchema { .. }))
        ));
        assert!(matches!(
            caster.cast_to_schema("Class2", &Value::from(json!([1]))),
            Err(CastError::InvalidArgument(ArgumentError::NotAMapping { found: Kind::List }))
        ));

        let bad = Hooks::new().with(Kind::named("bad key"), |v| Ok(v.clone()));
        let err = Caster::new(&reg)
            .with_hooks(&bad)
            .cast_to_schema("Class2", &Value::from(json!({"foo": "x"})))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn construction_errors_pass_through() {
        let reg = registry();
        let err = Caster::new(&reg)
            .cast_to_schema("Class2", &Value::from(json!({"foo": 1, "extra": 2})))
            .unwrap_err();
        assert!(matches!(err, CastError::Construct(crate::error::ConstructError::UnexpectedField { .. })));

        let err = Caster::new(&reg)
            .cast_to_schema("Class2", &Value::from(json!({"bar": 1})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Class2() missing required field `foo`");
    }

    #[test]
    fn cast_context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Hooks>();
        assert_send_sync::<SchemaRegistry>();
        assert_send_sync::<Caster<'static>>();
    }

    #[test]
    fn construct_has_no_default_for_datetime_or_none() {
        assert!(construct(&Kind::DateTime, &Value::from("2023-10-11T00:00:00")).is_err());
        assert!(construct(&Kind::NoneType, &Value::Int(0)).is_err());
    }
}
