//! Dynamic values: the raw input of a cast and the shape of its result.
//!
//! Parsed JSON enters through `From<serde_json::Value>`. Casting produces the
//! same enum with richer variants filled in (tuples, sets, datetimes, records,
//! opaque hook results).
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ir::Kind;
use crate::schema::Record;

pub type Map = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Map),
    /// Insertion-ordered, duplicate-free.
    Set(Vec<Value>),
    Record(Record),
    Opaque(Opaque),
}

/// A value of a user type that only hooks know how to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub type_name: String,
    pub inner: Box<Value>,
}

// Map equality ignores entry order, so maps contribute only their length.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::None => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(x) => x.hash(state),
            Value::Str(s) => s.hash(state),
            Value::DateTime(dt) => dt.hash(state),
            Value::List(xs) | Value::Tuple(xs) | Value::Set(xs) => xs.hash(state),
            Value::Dict(m) => m.len().hash(state),
            Value::Record(r) => {
                r.schema_name().hash(state);
                r.fields().len().hash(state);
            }
            Value::Opaque(o) => {
                o.type_name.hash(state);
                o.inner.hash(state);
            }
        }
    }
}

impl Value {
    pub fn float(x: f64) -> Self {
        Value::Float(OrderedFloat(x))
    }

    pub fn opaque(type_name: impl Into<String>, inner: Value) -> Self {
        Value::Opaque(Opaque { type_name: type_name.into(), inner: Box::new(inner) })
    }

    /// Builds a set, dropping repeated elements.
    pub fn set_from<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let unique: IndexSet<Value> = items.into_iter().collect();
        Value::Set(unique.into_iter().collect())
    }

    /// The concrete type of this value, compared against descriptor candidates.
    pub fn kind(&self) -> Kind {
        match self {
            Value::None => Kind::NoneType,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::DateTime(_) => Kind::DateTime,
            Value::List(_) => Kind::List,
            Value::Tuple(_) => Kind::Tuple,
            Value::Dict(_) => Kind::Dict,
            Value::Set(_) => Kind::Set,
            Value::Record(r) => Kind::Named(r.schema_name().to_string()),
            Value::Opaque(o) => Kind::Named(o.type_name.clone()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(x.0),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Map> {
        match self {
            Value::Dict(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Elements of a list, tuple, or set.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::List(xs) | Value::Tuple(xs) | Value::Set(xs) => Some(xs),
            _ => None,
        }
    }
}

// ------------------------------ From impls -------------------------------- //

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(xs) => Value::List(xs.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(m) => {
                Value::Dict(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(xs: Vec<Value>) -> Self {
        Value::List(xs)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Dict(m)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

// ------------------------------- Display ---------------------------------- //

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Strings render verbatim at the top level; nested ones are quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => write_repr(f, other),
        }
    }
}

fn write_repr(f: &mut fmt::Formatter<'_>, v: &Value) -> fmt::Result {
    match v {
        Value::None => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(i) => write!(f, "{i}"),
        Value::Float(x) => write_float(f, x.0),
        Value::Str(s) => write!(f, "{s:?}"),
        Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        Value::List(xs) => write_items(f, "[", xs, "]"),
        Value::Tuple(xs) => write_items(f, "(", xs, ")"),
        Value::Set(xs) => write_items(f, "{", xs, "}"),
        Value::Dict(m) => {
            f.write_str("{")?;
            for (i, (k, v)) in m.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{k:?}: ")?;
                write_repr(f, v)?;
            }
            f.write_str("}")
        }
        Value::Record(r) => {
            write!(f, "{}(", r.schema_name())?;
            for (i, (k, v)) in r.fields().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{k}=")?;
                write_repr(f, v)?;
            }
            f.write_str(")")
        }
        Value::Opaque(o) => write_repr(f, &o.inner),
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: &str, xs: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, x) in xs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_repr(f, x)?;
    }
    f.write_str(close)
}

// keep whole floats distinguishable from ints: 1.0, not 1
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

// -------------------------------- Serde ----------------------------------- //

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(x.0),
            Value::Str(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => serializer.collect_str(&dt.format(DATETIME_FORMAT)),
            Value::List(xs) | Value::Tuple(xs) | Value::Set(xs) => {
                let mut seq = serializer.serialize_seq(Some(xs.len()))?;
                for x in xs {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Value::Dict(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Record(r) => r.serialize(serializer),
            Value::Opaque(o) => o.inner.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ------------------------------- Tests ------------------------------------ //
