use super::{prim, Walker};
use crate::error::Result;
use crate::ir::{Field, SchemaId, ValueKind};
use crate::parse::JsonValue;

impl Walker<'_> {
    /// Interpret one JSON object against `target`, registered under `key`.
    pub(super) fn object(
        &mut self,
        entries: &[(String, JsonValue)],
        target: SchemaId,
        key: &str,
        depth: usize,
    ) -> Result<()> {
        for (prop, value) in entries {
            let kind = match value {
                JsonValue::Object(nested) => {
                    let depth = self.enter(depth)?;
                    let (child, child_key) = self.resolve_child(target, key, prop);
                    self.object(nested, child, &child_key, depth)?;
                    ValueKind::Object(child)
                }
                JsonValue::Array(items) => self.array(items, target, key, prop, depth)?,
                scalar => prim::primitive_of(scalar).map_or(ValueKind::Unknown, ValueKind::from),
            };
            // recursion first, so a repeated key still merges its nested fields
            self.record(target, Field { raw_name: prop.clone(), kind })?;
        }
        Ok(())
    }
}
