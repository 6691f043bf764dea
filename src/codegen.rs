//! Schema set → source text.
//!
//! One class per schema, in discovery order (root first), fields in insertion order,
//! all in one flat namespace so classes can reference each other in any order.
//! Rendering is pure: the same [`SchemaSet`] always produces the same text.
pub mod csharp;
pub mod rust;

use serde::{Deserialize, Serialize};

use crate::error::NamingError;
use crate::ir::{Primitive, SchemaId, SchemaSet};
use crate::lower::{self, ClassDecl, ClassNames};
use crate::naming::Case;

/// Namespace used when the caller could not resolve one.
pub const DEFAULT_NAMESPACE: &str = "None";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// C# classes with Newtonsoft.Json `[JsonProperty]` attributes.
    #[default]
    #[serde(rename = "csharp")]
    CSharp,
    /// Rust structs deriving serde traits.
    #[serde(rename = "rust")]
    Rust,
}

/// Everything a target language decides: spelling of types and names, and the
/// templates around them.
pub trait Dialect: Sync {
    fn field_case(&self) -> Case;

    /// Final spelling of a class name derived from a schema.
    fn class_ident(&self, name: String) -> String {
        name
    }

    /// Final spelling of a sanitized field name (keyword escaping and the like).
    fn field_ident(&self, ident: String) -> String {
        ident
    }

    /// Languages where a member may not be named like its enclosing class.
    fn member_may_not_repeat_class_name(&self) -> bool {
        false
    }

    fn primitive(&self, p: Primitive) -> &'static str;

    /// Reference to another class; `recursive` when it leads back to the owner.
    fn reference(&self, class: &str, recursive: bool) -> String;

    fn list(&self, element: &str) -> String;

    fn render_class(&self, class: &ClassDecl) -> String;

    fn render_module(&self, namespace: &str, imports: &[String], classes: &[String]) -> String;

    fn default_imports(&self) -> Vec<String>;

    fn file_name(&self, class: &str) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EmitOptions {
    pub target: Target,
    pub namespace: String,
    /// `None` → the target's default set.
    pub imports: Option<Vec<String>>,
}

/// One class rendered as a standalone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedClass {
    pub name: String,
    pub file_name: String,
    pub source: String,
}

pub struct Codegen {
    options: EmitOptions,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Target {
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Target::CSharp => &csharp::CSharp,
            Target::Rust => &rust::Rust,
        }
    }
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            target: Target::default(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            imports: None,
        }
    }
}

impl Codegen {
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    fn dialect(&self) -> &'static dyn Dialect {
        self.options.target.dialect()
    }

    pub fn imports(&self) -> Vec<String> {
        self.options
            .imports
            .clone()
            .unwrap_or_else(|| self.dialect().default_imports())
    }

    /// A single class declaration, exactly as it appears inside [`Codegen::emit`]'s output.
    pub fn emit_class(&self, set: &SchemaSet, id: SchemaId) -> Result<String, NamingError> {
        let names = ClassNames::new(set, self.dialect())?;
        Ok(self.class_source(set, &names, id))
    }

    fn class_source(&self, set: &SchemaSet, names: &ClassNames, id: SchemaId) -> String {
        let decl = lower::lower_class(set, names, id, self.dialect());
        self.dialect().render_class(&decl)
    }

    /// All classes in one namespace block.
    pub fn emit(&self, set: &SchemaSet) -> Result<String, NamingError> {
        let names = ClassNames::new(set, self.dialect())?;
        let classes = set
            .iter()
            .map(|(id, _)| self.class_source(set, &names, id))
            .collect::<Vec<_>>();
        tracing::debug!(classes = classes.len(), target = ?self.options.target, "emitted module");
        Ok(self.dialect().render_module(&self.options.namespace, &self.imports(), &classes))
    }

    /// One file per class, each wrapped in its own namespace block.
    pub fn emit_each(&self, set: &SchemaSet) -> Result<Vec<EmittedClass>, NamingError> {
        let dialect = self.dialect();
        let imports = self.imports();
        let names = ClassNames::new(set, dialect)?;
        let files = set
            .iter()
            .map(|(id, _)| {
                let class = self.class_source(set, &names, id);
                let name = names.get(id).to_string();
                EmittedClass {
                    file_name: dialect.file_name(&name),
                    source: dialect.render_module(&self.options.namespace, &imports, std::slice::from_ref(&class)),
                    name,
                }
            })
            .collect();
        Ok(files)
    }
}
