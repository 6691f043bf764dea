//! Schema → declarations ready for a target language.
//!
//! Everything name- and type-related is settled here, so the per-language renderers in
//! `codegen` only format strings.
use crate::codegen::Dialect;
use crate::error::NamingError;
use crate::ir::{Primitive, SchemaId, SchemaSet, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub json_key: String,  // serialization name, verbatim
    pub ident: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

/// Class identifiers of one [`SchemaSet`], indexed by schema. Two schemas can sanitize to
/// the same name (`first_name`, `firstName`; or `a_b`, `a/b` under path identity); later ones
/// in discovery order get a numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    pub fn new(set: &SchemaSet, dialect: &dyn Dialect) -> Result<Self, NamingError> {
        let mut names = Vec::<String>::with_capacity(set.len());
        for (_, schema) in set.iter() {
            let name = unique(dialect.class_ident(schema.class_name()?), &names);
            names.push(name);
        }
        Ok(Self(names))
    }

    pub fn get(&self, id: SchemaId) -> &str {
        &self.0[id.index()]
    }
}

pub fn lower_class(set: &SchemaSet, names: &ClassNames, id: SchemaId, dialect: &dyn Dialect) -> ClassDecl {
    let schema = set.get(id);
    let name = names.get(id).to_string();

    let mut taken = Vec::<String>::with_capacity(schema.fields().len() + 1);
    if dialect.member_may_not_repeat_class_name() {
        taken.push(name.clone());
    }

    let mut fields = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let ident = unique(dialect.field_ident(field.identifier(dialect.field_case())), &taken);
        taken.push(ident.clone());
        fields.push(FieldDecl {
            json_key: field.raw_name.clone(),
            ident,
            ty: type_token(set, names, id, &field.kind, dialect),
        });
    }
    ClassDecl { name, fields }
}

/// Type token of a field of `owner`.
pub fn type_token(set: &SchemaSet, names: &ClassNames, owner: SchemaId, kind: &ValueKind, dialect: &dyn Dialect) -> String {
    match *kind {
        ValueKind::Integer => dialect.primitive(Primitive::Integer).to_string(),
        ValueKind::Float => dialect.primitive(Primitive::Float).to_string(),
        ValueKind::String => dialect.primitive(Primitive::String).to_string(),
        ValueKind::Boolean => dialect.primitive(Primitive::Boolean).to_string(),
        ValueKind::Unknown => dialect.primitive(Primitive::Unknown).to_string(),
        ValueKind::Object(target) => dialect.reference(names.get(target), reaches(set, target, owner)),
        ValueKind::ObjectList(target) => dialect.list(names.get(target)),
        ValueKind::PrimitiveList(p) => dialect.list(dialect.primitive(p)),
    }
}

/// Two JSON keys can normalize to the same identifier (`firstName`, `first_name`).
/// Later ones get a numeric suffix.
fn unique(ident: String, taken: &[String]) -> String {
    if !taken.contains(&ident) {
        return ident;
    }
    (2..)
        .map(|n| format!("{ident}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(ident)
}

/// Whether `to` is reachable from `from` through direct (non-list) object references.
/// Such a cycle has infinite size in value-typed targets.
fn reaches(set: &SchemaSet, from: SchemaId, to: SchemaId) -> bool {
    let mut seen = vec![false; set.len()];
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
        if id == to {
            return true;
        }
        if std::mem::replace(&mut seen[id.index()], true) {
            continue;
        }
        stack.extend(set.get(id).fields().filter_map(|f| match f.kind {
            ValueKind::Object(next) => Some(next),
            _ => None,
        }));
    }
    false
}
