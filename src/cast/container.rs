use crate::error::ConvertError;
use crate::ir::Kind;
use crate::value::{Map, Value};

/// Iterate a value the way container constructors consume it.
fn items(v: &Value) -> Option<Vec<Value>> {
    match v {
        Value::List(xs) | Value::Tuple(xs) | Value::Set(xs) => Some(xs.clone()),
        Value::Dict(m) => Some(m.keys().cloned().map(Value::Str).collect()),
        Value::Str(s) => Some(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        _ => None,
    }
}

pub fn to_list(v: &Value) -> Result<Value, ConvertError> {
    items(v)
        .map(Value::List)
        .ok_or_else(|| ConvertError::Unsupported { from: v.kind(), to: Kind::List })
}

pub fn to_tuple(v: &Value) -> Result<Value, ConvertError> {
    items(v)
        .map(Value::Tuple)
        .ok_or_else(|| ConvertError::Unsupported { from: v.kind(), to: Kind::Tuple })
}

pub fn to_set(v: &Value) -> Result<Value, ConvertError> {
    items(v)
        .map(Value::set_from)
        .ok_or_else(|| ConvertError::Unsupported { from: v.kind(), to: Kind::Set })
}

/// From a mapping, a record, or a sequence of `[key, value]` pairs.
pub fn to_dict(v: &Value) -> Result<Value, ConvertError> {
    match v {
        Value::Dict(m) => Ok(Value::Dict(m.clone())),
        Value::Record(r) => Ok(Value::Dict(r.fields().clone())),
        Value::List(xs) | Value::Tuple(xs) | Value::Set(xs) => {
            let mut out = Map::with_capacity(xs.len());
            for pair in xs {
                match pair.as_items() {
                    Some([Value::Str(k), val]) if !matches!(pair, Value::Set(_)) => {
                        out.insert(k.clone(), val.clone());
                    }
                    _ => {
                        return Err(ConvertError::InvalidLiteral {
                            to: Kind::Dict,
                            input: pair.to_string(),
                        })
                    }
                }
            }
            Ok(Value::Dict(out))
        }
        other => Err(ConvertError::Unsupported { from: other.kind(), to: Kind::Dict }),
    }
}
