use crate::ir::Primitive;
use crate::parse::JsonValue;

/// JSON scalar → value kind. `None` for objects and arrays, which need a schema walk.
pub fn primitive_of(v: &JsonValue) -> Option<Primitive> {
    match v {
        JsonValue::Integer(_) => Some(Primitive::Integer),
        JsonValue::Float(_) => Some(Primitive::Float),
        JsonValue::String(_) => Some(Primitive::String),
        JsonValue::Bool(_) => Some(Primitive::Boolean),
        JsonValue::Null => Some(Primitive::Unknown),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Element kind of an array holding no objects: the kind every element shares,
/// `Unknown` when empty, mixed or nested.
pub fn element_kind(items: &[JsonValue]) -> Primitive {
    let mut kinds = items.iter().map(primitive_of);
    let Some(Some(first)) = kinds.next() else {
        return Primitive::Unknown;
    };
    if kinds.all(|k| k == Some(first)) { first } else { Primitive::Unknown }
}
