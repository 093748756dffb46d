//! Type resolver: lowers declared annotations to casting descriptors.
use indexmap::IndexMap;

use crate::ir::{Descriptor, Kind, TypeExpr};
use crate::schema::SchemaDef;

/// Resolve every declared field of `schema` to its descriptor.
pub fn resolve_schema_types(schema: &SchemaDef) -> IndexMap<String, Descriptor> {
    schema
        .fields()
        .iter()
        .map(|f| (f.name.clone(), resolve_field_type(&f.annotation)))
        .collect()
}

pub fn resolve_field_type(annotation: &TypeExpr) -> Descriptor {
    match annotation {
        TypeExpr::Str => Descriptor::Single(Kind::Str),
        TypeExpr::Int => Descriptor::Single(Kind::Int),
        TypeExpr::Float => Descriptor::Single(Kind::Float),
        TypeExpr::Bool => Descriptor::Single(Kind::Bool),
        TypeExpr::NoneType => Descriptor::Single(Kind::NoneType),
        TypeExpr::DateTime => Descriptor::Single(Kind::DateTime),
        TypeExpr::Named(name) => Descriptor::Single(Kind::Named(name.clone())),

        // Only the outer container shape is cast; parameters are ignored.
        TypeExpr::List(_) | TypeExpr::Sequence(_) => Descriptor::Single(Kind::List),
        TypeExpr::Tuple(_) => Descriptor::Single(Kind::Tuple),
        TypeExpr::Dict(_) => Descriptor::Single(Kind::Dict),
        TypeExpr::Set(_) => Descriptor::Single(Kind::Set),

        TypeExpr::Optional(inner) => lower_union(std::slice::from_ref(&**inner)),
        TypeExpr::Union(alts) => lower_union(alts),
    }
}

fn lower_union(alts: &[TypeExpr]) -> Descriptor {
    let mut arms: Vec<Kind> = Vec::with_capacity(alts.len());
    for alt in alts {
        // nested unions flatten into this one
        match resolve_field_type(alt) {
            Descriptor::Single(kind) => arms.push(kind),
            Descriptor::Candidates(kinds) => arms.extend(kinds),
        }
    }
    simplify_unions(arms)
}

// Drop null arms and duplicates, then collapse a lone survivor: Optional[X] → X
fn simplify_unions(arms: Vec<Kind>) -> Descriptor {
    let mut out: Vec<Kind> = Vec::with_capacity(arms.len());
    for arm in arms {
        if arm == Kind::NoneType || out.contains(&arm) {
            continue;
        }
        out.push(arm);
    }
    match out.len() {
        0 => Descriptor::Single(Kind::NoneType),
        1 => Descriptor::Single(out.remove(0)),
        _ => Descriptor::Candidates(out),
    }
}

// ------------------------------- Tests ------------------------------------ //
