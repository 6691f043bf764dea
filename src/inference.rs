//! Schema inference over a single JSON document.
//!
//! Walk the parsed tree once, depth first, and register one [`Schema`](crate::ir::Schema) per distinct
//! property name that holds an object (or a list of objects). Objects reached through
//! the same name merge into the same schema, wherever they sit in the document:
//!
//! - `{"a":{"x":1},"b":{"a":{"y":2}}}` yields `root`, `a {x, y}`, `b {a}`;
//! - every object element of an array contributes to one schema;
//! - a key already present on a schema keeps its first kind.
//!
//! The [`SchemaSet`] is owned by one run and handed back to the caller; nothing is
//! remembered between runs.
pub mod arr;
pub mod obj;
pub mod prim;

use serde::{Deserialize, Serialize};

use crate::error::{InferError, Result};
use crate::ir::{Field, SchemaId, SchemaSet, ValueKind};
use crate::naming;
use crate::parse::{self, JsonValue};

// ------------------------------- Policy ---------------------------------- //

const DEFAULT_MAX_DEPTH: usize = 128;

/// How nested objects are matched to an existing schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaIdentity {
    /// Same property name anywhere in the document → same schema.
    #[default]
    PropertyName,
    /// Same chain of property names from the root → same schema.
    /// Class names join the chain with `_` (`b.a` → `BA`).
    PropertyPath,
}

/// What to do when a key shows up again on a schema that already has it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence, ignore the rest.
    #[default]
    FirstWins,
    /// Keep the first occurrence, but fail if a later one has an incompatible kind.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InferOptions {
    pub identity: SchemaIdentity,
    pub duplicates: DuplicatePolicy,
    pub max_depth: usize,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            identity: SchemaIdentity::default(),
            duplicates: DuplicatePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ------------------------------- Front API -------------------------------- //

#[derive(Debug, Clone, Default)]
pub struct Inference {
    options: InferOptions,
}

impl Inference {
    pub fn new(options: InferOptions) -> Self {
        Self { options }
    }

    /// Parse `src` and infer its schemas. The root schema is always [`SchemaId::ROOT`].
    pub fn infer(&self, src: &str, root_alias: &str) -> Result<(SchemaId, SchemaSet)> {
        let document = parse::parse_document(src)?;
        self.infer_value(&document, root_alias)
    }

    /// Same as [`Inference::infer`] for an already parsed document.
    pub fn infer_value(&self, document: &JsonValue, root_alias: &str) -> Result<(SchemaId, SchemaSet)> {
        // no alias, no root class
        naming::class_name(root_alias)?;
        let mut walker = Walker { options: &self.options, set: SchemaSet::new() };
        let root_key = match self.options.identity {
            SchemaIdentity::PropertyName => root_alias.to_string(),
            SchemaIdentity::PropertyPath => String::new(),
        };
        let (root, _) = walker.set.resolve_or_create(&root_key, root_alias);
        tracing::debug!(schema = root_alias, "created root schema");

        match document {
            JsonValue::Object(entries) => walker.object(entries, root, &root_key, 0)?,
            JsonValue::Array(items) => walker.elements(items, root, &root_key, 0)?,
            // parse_document already rejects these; a hand-built tree just yields an empty root
            _ => tracing::debug!("top-level value is not an object or array"),
        }

        tracing::debug!(schemas = walker.set.len(), "inference finished");
        Ok((root, walker.set))
    }
}

/// Infer with default options.
pub fn infer(src: &str, root_alias: &str) -> Result<(SchemaId, SchemaSet)> {
    Inference::default().infer(src, root_alias)
}

// ------------------------------- Walker ----------------------------------- //

/// State of one run: the options and the arena being filled.
pub(crate) struct Walker<'o> {
    pub(super) options: &'o InferOptions,
    pub(super) set: SchemaSet,
}

impl Walker<'_> {
    /// Lookup key and raw name of the schema for `prop`, nested under the schema `parent`
    /// registered as `parent_key`.
    pub(super) fn child_identity(&self, parent: SchemaId, parent_key: &str, prop: &str) -> (String, String) {
        match self.options.identity {
            SchemaIdentity::PropertyName => (prop.to_string(), prop.to_string()),
            SchemaIdentity::PropertyPath => {
                let key = format!("{parent_key}/{prop}");
                let raw = if parent == SchemaId::ROOT {
                    prop.to_string()
                } else {
                    format!("{}_{prop}", self.set.get(parent).raw_name)
                };
                (key, raw)
            }
        }
    }

    pub(super) fn resolve_child(&mut self, parent: SchemaId, parent_key: &str, prop: &str) -> (SchemaId, String) {
        let (key, raw) = self.child_identity(parent, parent_key, prop);
        let (id, created) = self.set.resolve_or_create(&key, &raw);
        if created {
            tracing::debug!(schema = %raw, "created schema");
        } else {
            tracing::trace!(schema = %raw, "merging into existing schema");
        }
        (id, key)
    }

    pub(super) fn enter(&self, depth: usize) -> Result<usize> {
        let next = depth + 1;
        if next > self.options.max_depth {
            return Err(InferError::TooDeep { limit: self.options.max_depth }.into());
        }
        Ok(next)
    }

    /// Add `field` to `target` unless its key is already there.
    pub(super) fn record(&mut self, target: SchemaId, field: Field) -> Result<()> {
        let existing = self.set.get(target).field(&field.raw_name).map(|f| f.kind);
        let Some(existing) = existing else {
            self.set.get_mut(target).add_field(field);
            return Ok(());
        };
        let schema = &self.set.get(target).raw_name;
        tracing::trace!(schema = %schema, field = %field.raw_name, "duplicate key ignored");
        if self.options.duplicates == DuplicatePolicy::Strict && !compatible(existing, field.kind) {
            return Err(InferError::ConflictingField {
                schema: schema.clone(),
                field: field.raw_name,
                first: existing.describe(&self.set),
                second: field.kind.describe(&self.set),
            }
            .into());
        }
        Ok(())
    }
}

/// Kinds that may share a key under [`DuplicatePolicy::Strict`]. `null` and empty lists
/// carry no evidence, so they agree with anything of their shape.
fn compatible(first: ValueKind, second: ValueKind) -> bool {
    use crate::ir::Primitive;
    match (first, second) {
        (a, b) if a == b => true,
        (ValueKind::Unknown, _) | (_, ValueKind::Unknown) => true,
        (ValueKind::PrimitiveList(Primitive::Unknown), b) => b.is_list(),
        (a, ValueKind::PrimitiveList(Primitive::Unknown)) => a.is_list(),
        _ => false,
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, NamingError, ParseError};
    use crate::ir::Primitive;

    fn names(set: &SchemaSet) -> Vec<&str> {
        set.iter().map(|(_, s)| s.raw_name.as_str()).collect()
    }

    fn fields<'a>(set: &'a SchemaSet, key: &str) -> Vec<&'a str> {
        set.lookup(key).map(|s| s.field_names()).unwrap_or_default()
    }

    #[test]
    fn same_name_merges_across_branches() {
        let (root, set) = infer(r#"{"a":{"x":1},"b":{"a":{"x":1,"y":2}}}"#, "root").unwrap();
        assert_eq!(root, SchemaId::ROOT);
        assert_eq!(names(&set), ["root", "a", "b"]);
        assert_eq!(fields(&set, "a"), ["x", "y"]);
        assert_eq!(fields(&set, "b"), ["a"]);
        assert_eq!(fields(&set, "root"), ["a", "b"]);
    }

    #[test]
    fn duplicate_key_keeps_first_kind() {
        let (_, set) = infer(r#"{"v":1,"v":"s"}"#, "root").unwrap();
        let root = set.root().unwrap();
        assert_eq!(root.fields().len(), 1);
        assert_eq!(root.field("v").map(|f| f.kind), Some(ValueKind::Integer));
    }

    #[test]
    fn list_of_scalars_is_not_a_class() {
        let (_, set) = infer(r#"{"tags":["a","b"]}"#, "root").unwrap();
        assert_eq!(set.len(), 1);
        let tags = set.root().unwrap().field("tags").unwrap();
        assert_eq!(tags.kind, ValueKind::PrimitiveList(Primitive::String));
    }

    #[test]
    fn list_elements_merge_into_one_schema() {
        let (_, set) = infer(r#"{"items":[{"id":1},{"id":1,"name":"x"}]}"#, "root").unwrap();
        assert_eq!(names(&set), ["root", "items"]);
        assert_eq!(fields(&set, "items"), ["id", "name"]);
        let items = set.root().unwrap().field("items").unwrap();
        assert_eq!(items.kind, ValueKind::ObjectList(SchemaId(1)));
    }

    #[test]
    fn array_root_is_a_single_schema() {
        let (_, set) = infer(r#"[{"k":1},{"k":2}, 3, "x"]"#, "root").unwrap();
        assert_eq!(names(&set), ["root"]);
        assert_eq!(fields(&set, "root"), ["k"]);
    }

    #[test]
    fn class_count_matches_distinct_object_names() {
        let src = r#"{
            "id": "0001",
            "batters": {"batter": [{"id": "1001", "type": "Regular"}]},
            "topping": [{"id": "5001"}, {"id": "5002", "type": "Glazed"}],
            "more": {"batters": {"extra": true}, "topping": []},
            "tags": [1, 2]
        }"#;
        let (_, set) = infer(src, "donut").unwrap();
        assert_eq!(names(&set), ["donut", "batters", "batter", "topping", "more"]);
        assert_eq!(fields(&set, "batters"), ["batter", "extra"]);
    }

    #[test]
    fn primitive_kinds_follow_the_table() {
        let (_, set) = infer(r#"{"i":1,"f":1.5,"s":"x","b":true,"n":null,"e":[],"m":[1,"a"]}"#, "r").unwrap();
        let root = set.root().unwrap();
        let kind = |k: &str| root.field(k).map(|f| f.kind);
        assert_eq!(kind("i"), Some(ValueKind::Integer));
        assert_eq!(kind("f"), Some(ValueKind::Float));
        assert_eq!(kind("s"), Some(ValueKind::String));
        assert_eq!(kind("b"), Some(ValueKind::Boolean));
        assert_eq!(kind("n"), Some(ValueKind::Unknown));
        assert_eq!(kind("e"), Some(ValueKind::PrimitiveList(Primitive::Unknown)));
        assert_eq!(kind("m"), Some(ValueKind::PrimitiveList(Primitive::Unknown)));
    }

    #[test]
    fn nested_key_matching_root_alias_merges_into_root() {
        let (_, set) = infer(r#"{"a":1,"root":{"b":2}}"#, "root").unwrap();
        assert_eq!(names(&set), ["root"]);
        // nested fields land before the key that led to them
        assert_eq!(fields(&set, "root"), ["a", "b", "root"]);
    }

    #[test]
    fn path_identity_keeps_same_names_apart() {
        let options = InferOptions { identity: SchemaIdentity::PropertyPath, ..Default::default() };
        let (_, set) = Inference::new(options)
            .infer(r#"{"a":{"x":1},"b":{"a":{"y":2}},"list":[{"a":{"z":3}},{"a":{"w":4}}]}"#, "root")
            .unwrap();
        assert_eq!(names(&set), ["root", "a", "b", "b_a", "list", "list_a"]);
        assert_eq!(fields(&set, "/a"), ["x"]);
        assert_eq!(fields(&set, "/b/a"), ["y"]);
        assert_eq!(fields(&set, "/list/a"), ["z", "w"]);
    }

    #[test]
    fn strict_mode_rejects_conflicting_kinds() {
        let options = InferOptions { duplicates: DuplicatePolicy::Strict, ..Default::default() };
        let err = Inference::new(options.clone()).infer(r#"[{"k":1},{"k":"x"}]"#, "root").unwrap_err();
        assert_eq!(
            err,
            Error::Infer(InferError::ConflictingField {
                schema: "root".into(),
                field: "k".into(),
                first: "integer".into(),
                second: "string".into(),
            })
        );
        // null and empty lists agree with anything
        let ok = Inference::new(options).infer(r#"[{"k":null,"l":[]},{"k":"x","l":[{"a":1}]}]"#, "root");
        assert!(ok.is_ok());
    }

    #[test]
    fn depth_limit_is_enforced() {
        let options = InferOptions { max_depth: 2, ..Default::default() };
        let inference = Inference::new(options);
        assert!(inference.infer(r#"{"a":{"b":{"c":1}}}"#, "root").is_ok());
        let err = inference.infer(r#"{"a":{"b":{"c":{"d":1}}}}"#, "root").unwrap_err();
        assert_eq!(err, Error::Infer(InferError::TooDeep { limit: 2 }));
    }

    #[test]
    fn invalid_input_is_a_parse_error() {
        assert!(matches!(infer("not json", "root"), Err(Error::Parse(ParseError::UnsupportedShape { .. }))));
        assert!(matches!(infer(r#"{"a": }"#, "root"), Err(Error::Parse(ParseError::Syntax { .. }))));
        assert!(matches!(infer("\"str\"", "root"), Err(Error::Parse(_))));
    }

    #[test]
    fn blank_root_alias_is_a_naming_error() {
        assert_eq!(
            infer("{}", "  ").unwrap_err(),
            Error::Naming(NamingError::Empty { raw: "  ".into() })
        );
    }
}
