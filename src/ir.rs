//! Type IR: declared field annotations, the concrete kinds they resolve to,
//! and the normalized descriptors the caster consumes.
use std::fmt;

// ————————————————————————————————————————————————————————————————————————————
// ANNOTATIONS
// ————————————————————————————————————————————————————————————————————————————

/// A field's declared type, as written in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Str,
    Int,
    Float,
    Bool,
    NoneType,
    DateTime,
    /// `List[..]`; parameters are kept for display but never enforced.
    List(Vec<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Dict(Vec<TypeExpr>),
    Set(Vec<TypeExpr>),
    /// Abstract "any sequence" alias.
    Sequence(Vec<TypeExpr>),
    /// Shorthand for `Union[inner, None]`.
    Optional(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    /// Anything that isn't a builtin: another schema or an opaque user type.
    Named(String),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Optional(Box::new(inner))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn generic(f: &mut fmt::Formatter<'_>, head: &str, params: &[TypeExpr]) -> fmt::Result {
            f.write_str(head)?;
            if params.is_empty() {
                return Ok(());
            }
            f.write_str("[")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{p}")?;
            }
            f.write_str("]")
        }
        match self {
            TypeExpr::Str => f.write_str("str"),
            TypeExpr::Int => f.write_str("int"),
            TypeExpr::Float => f.write_str("float"),
            TypeExpr::Bool => f.write_str("bool"),
            TypeExpr::NoneType => f.write_str("None"),
            TypeExpr::DateTime => f.write_str("datetime"),
            TypeExpr::List(ps) => generic(f, "List", ps),
            TypeExpr::Tuple(ps) => generic(f, "Tuple", ps),
            TypeExpr::Dict(ps) => generic(f, "Dict", ps),
            TypeExpr::Set(ps) => generic(f, "Set", ps),
            TypeExpr::Sequence(ps) => generic(f, "Sequence", ps),
            TypeExpr::Optional(inner) => write!(f, "Optional[{inner}]"),
            TypeExpr::Union(alts) => generic(f, "Union", alts),
            TypeExpr::Named(name) => f.write_str(name),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONCRETE KINDS
// ————————————————————————————————————————————————————————————————————————————

/// A concrete, constructible runtime type. Hook tables are keyed by this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    DateTime,
    List,
    Tuple,
    Dict,
    Set,
    /// A registered schema or an opaque user type, by name.
    Named(String),
}

impl Kind {
    pub fn named(name: impl Into<String>) -> Self {
        Kind::Named(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Kind::NoneType => "NoneType",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Str => "str",
            Kind::DateTime => "datetime",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::Dict => "dict",
            Kind::Set => "set",
            Kind::Named(name) => name,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DESCRIPTORS
// ————————————————————————————————————————————————————————————————————————————

/// Normalized field type. Never empty: a lone alternative is always `Single`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Single(Kind),
    /// Union alternatives in declaration order.
    Candidates(Vec<Kind>),
}

impl Descriptor {
    /// Ordered candidates; a single kind is a one-element slice.
    pub fn candidates(&self) -> &[Kind] {
        match self {
            Descriptor::Single(kind) => std::slice::from_ref(kind),
            Descriptor::Candidates(kinds) => kinds,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Descriptor::Candidates(_))
    }
}

impl From<Kind> for Descriptor {
    fn from(kind: Kind) -> Self {
        Descriptor::Single(kind)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Single(kind) => write!(f, "{kind}"),
            Descriptor::Candidates(kinds) => {
                f.write_str("[")?;
                for (i, k) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}")?;
                }
                f.write_str("]")
            }
        }
    }
}
