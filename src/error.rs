use std::fmt;

use thiserror::Error;

use crate::ir::Kind;
use crate::value::Value;

/// Top-level failure of a cast.
#[derive(Error, Debug)]
pub enum CastError {
    /// Bad call: nothing was converted.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Record construction failed after all fields cast; passed through unchanged.
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// A hook failed while hook errors are surfaced rather than skipped.
    #[error("hook for `{kind}` failed: {source}")]
    Hook {
        kind: Kind,
        #[source]
        source: anyhow::Error,
    },
}

impl CastError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CastError::InvalidArgument(_))
    }

    pub fn as_conversion(&self) -> Option<&ConversionError> {
        match self {
            CastError::Conversion(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("`{name}` is not a registered schema")]
    UnknownSchema { name: String },

    #[error("input must be a mapping, but instead is {found}")]
    NotAMapping { found: Kind },

    #[error("invalid hook key `{key}`: {reason}")]
    InvalidHook { key: Kind, reason: String },
}

/// Every candidate for a value failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unable to cast '{value}' to any of: {}", KindList(.attempted))]
pub struct ConversionError {
    pub value: Value,
    /// Candidates in the order they were tried.
    pub attempted: Vec<Kind>,
    /// One entry per attempted candidate.
    pub reasons: Vec<String>,
}

struct KindList<'a>(&'a [Kind]);

impl fmt::Display for KindList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, k) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}")?;
        }
        Ok(())
    }
}

/// Raised by `SchemaDef::construct`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructError {
    #[error("{schema}() got an unexpected field `{field}`")]
    UnexpectedField { schema: String, field: String },

    #[error("{schema}() missing required field `{field}`")]
    MissingField { schema: String, field: String },
}

/// Raised when declaring or registering schemas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("`{0}` is not a valid schema name")]
    InvalidName(String),

    #[error("`{0}` is a builtin annotation and cannot name a schema")]
    ReservedName(String),

    #[error("schema `{schema}`: `{field}` is not a valid field name")]
    InvalidFieldName { schema: String, field: String },

    #[error("schema `{schema}` declares field `{field}` more than once")]
    DuplicateField { schema: String, field: String },

    #[error("schema `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("at JSON path {path} → {message}")]
    Load { path: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid annotation at offset {offset}: {message}")]
pub struct AnnotationError {
    pub offset: usize,
    pub message: String,
}

/// Default construction of a builtin kind failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("{to} cannot be constructed from {from}")]
    Unsupported { from: Kind, to: Kind },

    #[error("invalid literal for {to}: {input:?}")]
    InvalidLiteral { to: Kind, input: String },

    #[error("{value} is out of range for {to}")]
    OutOfRange { to: Kind, value: String },
}

/// Deserializing a cast record into a native struct failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("at JSON path {path} → {message}")]
pub struct ExtractError {
    pub path: String,
    pub message: String,
}

pub type Result<T, E = CastError> = std::result::Result<T, E>;
