use super::{prim, Walker};
use crate::error::Result;
use crate::ir::{SchemaId, ValueKind};
use crate::parse::JsonValue;

impl Walker<'_> {
    /// Array under property `prop` of `parent`. A schema exists only once an object shows up.
    pub(super) fn array(
        &mut self,
        items: &[JsonValue],
        parent: SchemaId,
        parent_key: &str,
        prop: &str,
        depth: usize,
    ) -> Result<ValueKind> {
        if !items.iter().any(|v| matches!(v, JsonValue::Object(_))) {
            return Ok(ValueKind::PrimitiveList(prim::element_kind(items)));
        }
        let depth = self.enter(depth)?;
        let (child, child_key) = self.resolve_child(parent, parent_key, prop);
        self.elements(items, child, &child_key, depth)?;
        Ok(ValueKind::ObjectList(child))
    }

    /// Every object element merges into `target`; other elements are skipped.
    pub(super) fn elements(
        &mut self,
        items: &[JsonValue],
        target: SchemaId,
        key: &str,
        depth: usize,
    ) -> Result<()> {
        for item in items {
            if let JsonValue::Object(entries) = item {
                self.object(entries, target, key, depth)?;
            }
        }
        Ok(())
    }
}
