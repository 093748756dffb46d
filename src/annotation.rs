//! Annotation strings → `TypeExpr`.
//!
//! Grammar:
//!
//! ```text
//! expr := term ('|' term)*
//! term := IDENT ('[' expr (',' expr)* ']')?
//! ```
//!
//! Builtin heads (`str`, `int`, `Optional`, `List`, ...) map to their variants;
//! any other identifier becomes `TypeExpr::Named`.
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AnnotationError;
use crate::ir::TypeExpr;

static IDENT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());
static IDENT_FULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Heads that always parse to a builtin variant, never to `TypeExpr::Named`.
pub const BUILTIN_HEADS: &[&str] = &[
    "str", "int", "float", "bool", "None", "NoneType", "datetime", "list", "List", "tuple",
    "Tuple", "dict", "Dict", "set", "Set", "Sequence", "Optional", "Union",
];

/// True for names usable as schema, field, or opaque type names.
pub fn is_identifier(s: &str) -> bool {
    IDENT_FULL.is_match(s)
}

/// A name no annotation can resolve to `Named`.
pub fn is_builtin_head(s: &str) -> bool {
    BUILTIN_HEADS.contains(&s)
}

impl FromStr for TypeExpr {
    type Err = AnnotationError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let mut p = Parser { src, pos: 0 };
        let expr = p.expr()?;
        p.skip_ws();
        if p.pos < src.len() {
            return Err(p.error("unexpected trailing input"));
        }
        Ok(expr)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn expr(&mut self) -> Result<TypeExpr, AnnotationError> {
        let mut alts = vec![self.term()?];
        while self.eat('|') {
            alts.push(self.term()?);
        }
        if alts.len() == 1 {
            Ok(alts.remove(0))
        } else {
            Ok(TypeExpr::Union(alts))
        }
    }

    fn term(&mut self) -> Result<TypeExpr, AnnotationError> {
        self.skip_ws();
        let start = self.pos;
        let head = self.ident()?;
        let params = if self.eat('[') { Some(self.params()?) } else { None };
        build(head, params).map_err(|message| AnnotationError { offset: start, message })
    }

    fn params(&mut self) -> Result<Vec<TypeExpr>, AnnotationError> {
        let mut out = vec![self.expr()?];
        while self.eat(',') {
            out.push(self.expr()?);
        }
        if !self.eat(']') {
            return Err(self.error("expected `,` or `]`"));
        }
        Ok(out)
    }

    fn ident(&mut self) -> Result<&'a str, AnnotationError> {
        let rest = &self.src[self.pos..];
        match IDENT_PREFIX.find(rest) {
            Some(m) => {
                self.pos += m.end();
                Ok(&rest[..m.end()])
            }
            None if rest.is_empty() => Err(self.error("expected a type name, found end of input")),
            None => Err(self.error("expected a type name")),
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.src[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, message: &str) -> AnnotationError {
        AnnotationError { offset: self.pos, message: message.to_string() }
    }
}

fn build(head: &str, params: Option<Vec<TypeExpr>>) -> Result<TypeExpr, String> {
    let leaf = match head {
        "str" => Some(TypeExpr::Str),
        "int" => Some(TypeExpr::Int),
        "float" => Some(TypeExpr::Float),
        "bool" => Some(TypeExpr::Bool),
        "None" | "NoneType" => Some(TypeExpr::NoneType),
        "datetime" => Some(TypeExpr::DateTime),
        _ => None,
    };
    if let Some(ty) = leaf {
        return match params {
            None => Ok(ty),
            Some(_) => Err(format!("`{head}` does not take type parameters")),
        };
    }
    match head {
        "list" | "List" => Ok(TypeExpr::List(params.unwrap_or_default())),
        "tuple" | "Tuple" => Ok(TypeExpr::Tuple(params.unwrap_or_default())),
        "dict" | "Dict" => Ok(TypeExpr::Dict(params.unwrap_or_default())),
        "set" | "Set" => Ok(TypeExpr::Set(params.unwrap_or_default())),
        "Sequence" => Ok(TypeExpr::Sequence(params.unwrap_or_default())),
        "Optional" => match params {
            Some(mut ps) if ps.len() == 1 => Ok(TypeExpr::Optional(Box::new(ps.remove(0)))),
            _ => Err("`Optional` takes exactly one type parameter".to_string()),
        },
        "Union" => match params {
            Some(ps) => Ok(TypeExpr::Union(ps)),
            None => Err("`Union` requires type parameters".to_string()),
        },
        name => match params {
            None => Ok(TypeExpr::Named(name.to_string())),
            Some(_) => Err(format!("`{name}` does not take type parameters")),
        },
    }
}

// ------------------------------- Serde ------------------------------------ //

impl Serialize for TypeExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let src = String::deserialize(deserializer)?;
        src.parse().map_err(serde::de::Error::custom)
    }
}

// ------------------------------- Tests ------------------------------------ //
