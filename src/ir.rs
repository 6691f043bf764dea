// Schema model shared by inference and codegen. No JSON values in here.
use indexmap::IndexMap;

use crate::error::NamingError;
use crate::naming;

/// Index of a schema inside its [`SchemaSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) usize);

impl SchemaId {
    pub const ROOT: SchemaId = SchemaId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Element kinds a list of scalars can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Integer,
    Float,
    String,
    Boolean,
    Unknown,               // null, empty or mixed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    String,
    Boolean,
    Unknown,
    Object(SchemaId),
    ObjectList(SchemaId),
    PrimitiveList(Primitive),
}

impl ValueKind {
    pub fn is_list(&self) -> bool {
        matches!(self, ValueKind::ObjectList(_) | ValueKind::PrimitiveList(_))
    }

    /// Referenced schema, for object and object-list fields.
    pub fn schema(&self) -> Option<SchemaId> {
        match self {
            ValueKind::Object(id) | ValueKind::ObjectList(id) => Some(*id),
            _ => None,
        }
    }

    /// Short human label, used in diagnostics.
    pub fn describe(&self, set: &SchemaSet) -> String {
        let schema_name = |id: &SchemaId| set.get(*id).raw_name.clone();
        match self {
            ValueKind::Integer => "integer".into(),
            ValueKind::Float => "float".into(),
            ValueKind::String => "string".into(),
            ValueKind::Boolean => "boolean".into(),
            ValueKind::Unknown => "unknown".into(),
            ValueKind::Object(id) => format!("object `{}`", schema_name(id)),
            ValueKind::ObjectList(id) => format!("list of object `{}`", schema_name(id)),
            ValueKind::PrimitiveList(p) => format!("list of {p:?}").to_lowercase(),
        }
    }
}

impl From<Primitive> for ValueKind {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Integer => ValueKind::Integer,
            Primitive::Float => ValueKind::Float,
            Primitive::String => ValueKind::String,
            Primitive::Boolean => ValueKind::Boolean,
            Primitive::Unknown => ValueKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub raw_name: String,  // JSON key, verbatim
    pub kind: ValueKind,
}

impl Field {
    pub fn identifier(&self, case: naming::Case) -> String {
        naming::field_name(&self.raw_name, self.kind.is_list(), case)
    }
}

/// One inferred class. Field keys are unique; the first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub raw_name: String,
    fields: IndexMap<String, Field>,
}

impl Schema {
    pub fn new(raw_name: impl Into<String>) -> Self {
        Self { raw_name: raw_name.into(), fields: IndexMap::new() }
    }

    /// Computed on demand so renaming policy never invalidates a stored schema.
    pub fn class_name(&self) -> Result<String, NamingError> {
        naming::class_name(&self.raw_name)
    }

    /// Returns `false` (and leaves the schema untouched) when the key is already present.
    pub fn add_field(&mut self, field: Field) -> bool {
        if self.fields.contains_key(&field.raw_name) {
            return false;
        }
        self.fields.insert(field.raw_name.clone(), field);
        true
    }

    pub fn field(&self, raw_name: &str) -> Option<&Field> {
        self.fields.get(raw_name)
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

/// Append-only arena of the schemas of one inference run, in discovery order.
/// The first entry is always the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSet {
    schemas: Vec<Schema>,
    by_key: IndexMap<String, SchemaId>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the schema registered under `key`, creating it (named `raw_name`) if absent.
    /// The flag is `true` when the schema was created by this call.
    pub fn resolve_or_create(&mut self, key: &str, raw_name: &str) -> (SchemaId, bool) {
        if let Some(id) = self.by_key.get(key) {
            return (*id, false);
        }
        let id = SchemaId(self.schemas.len());
        self.schemas.push(Schema::new(raw_name));
        self.by_key.insert(key.to_string(), id);
        (id, true)
    }

    pub fn get(&self, id: SchemaId) -> &Schema {
        &self.schemas[id.0]
    }

    pub fn get_mut(&mut self, id: SchemaId) -> &mut Schema {
        &mut self.schemas[id.0]
    }

    pub fn lookup(&self, key: &str) -> Option<&Schema> {
        self.by_key.get(key).map(|id| self.get(*id))
    }

    pub fn root(&self) -> Option<&Schema> {
        self.schemas.first()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (SchemaId, &Schema)> {
        self.schemas.iter().enumerate().map(|(i, s)| (SchemaId(i), s))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_field_wins() {
        let mut s = Schema::new("root");
        assert!(s.add_field(Field { raw_name: "v".into(), kind: ValueKind::Integer }));
        assert!(!s.add_field(Field { raw_name: "v".into(), kind: ValueKind::String }));
        assert_eq!(s.fields().len(), 1);
        assert_eq!(s.field("v").map(|f| f.kind), Some(ValueKind::Integer));
    }

    #[test]
    fn resolve_or_create_reuses_by_key() {
        let mut set = SchemaSet::new();
        let (root, created) = set.resolve_or_create("root", "root");
        assert!(created);
        assert_eq!(root, SchemaId::ROOT);
        let (a1, _) = set.resolve_or_create("a", "a");
        let (a2, created) = set.resolve_or_create("a", "a");
        assert_eq!(a1, a2);
        assert!(!created);
        assert_eq!(set.len(), 2);
        assert_eq!(set.root().map(|s| s.raw_name.as_str()), Some("root"));
    }

    #[test]
    fn list_fields_are_pluralized() {
        let f = Field { raw_name: "topping".into(), kind: ValueKind::ObjectList(SchemaId(1)) };
        assert_eq!(f.identifier(naming::Case::UpperCamel), "Toppings");
        let f = Field { raw_name: "topping".into(), kind: ValueKind::Object(SchemaId(1)) };
        assert_eq!(f.identifier(naming::Case::UpperCamel), "Topping");
    }
}
