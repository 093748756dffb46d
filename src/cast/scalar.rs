use std::num::IntErrorKind;

use crate::error::ConvertError;
use crate::ir::Kind;
use crate::value::Value;

// i64::MAX + 1 as an exact f64
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

pub fn to_str(v: &Value) -> Value {
    Value::Str(v.to_string())
}

pub fn to_int(v: &Value) -> Result<Value, ConvertError> {
    match v {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(x) => {
            let t = x.0.trunc();
            if !t.is_finite() || t < -I64_BOUND || t >= I64_BOUND {
                return Err(ConvertError::OutOfRange { to: Kind::Int, value: v.to_string() });
            }
            Ok(Value::Int(t as i64))
        }
        Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                ConvertError::OutOfRange { to: Kind::Int, value: s.clone() }
            }
            _ => ConvertError::InvalidLiteral { to: Kind::Int, input: s.clone() },
        }),
        other => Err(ConvertError::Unsupported { from: other.kind(), to: Kind::Int }),
    }
}

pub fn to_float(v: &Value) -> Result<Value, ConvertError> {
    match v {
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Int(i) => Ok(Value::float(*i as f64)),
        Value::Bool(b) => Ok(Value::float(if *b { 1.0 } else { 0.0 })),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::float)
            .map_err(|_| ConvertError::InvalidLiteral { to: Kind::Float, input: s.clone() }),
        other => Err(ConvertError::Unsupported { from: other.kind(), to: Kind::Float }),
    }
}

/// Truthiness: null, false, zero, and empty text/containers are false.
pub fn to_bool(v: &Value) -> Value {
    let b = match v {
        Value::None => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(x) => x.0 != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::List(xs) | Value::Tuple(xs) | Value::Set(xs) => !xs.is_empty(),
        Value::Dict(m) => !m.is_empty(),
        Value::DateTime(_) | Value::Record(_) | Value::Opaque(_) => true,
    };
    Value::Bool(b)
}
