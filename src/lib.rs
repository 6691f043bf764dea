//! Infer class definitions from a JSON document.
//!
//! ```
//! use json_clazz::{convert, EmitOptions, InferOptions};
//!
//! let src = convert(
//!     r#"{"id": 1, "tags": ["a"], "owner": {"name": "x"}}"#,
//!     "thing",
//!     &InferOptions::default(),
//!     &EmitOptions::default(),
//! ).unwrap();
//! assert!(src.contains("public class Thing"));
//! assert!(src.contains("public IList<string> Tags {get; set;}"));
//! assert!(src.contains("public class Owner"));
//! ```
//!
//! The pipeline is `parse` → `inference` → `codegen`; each step is usable on its own.
pub mod codegen;
pub mod error;
pub mod inference;
pub mod ir;
pub mod lower;
pub mod naming;
pub mod parse;

pub use codegen::{Codegen, EmitOptions, EmittedClass, Target};
pub use error::{Error, InferError, NamingError, ParseError, Result};
pub use inference::{infer, DuplicatePolicy, InferOptions, Inference, SchemaIdentity};
pub use ir::{Field, Primitive, Schema, SchemaId, SchemaSet, ValueKind};

/// Infer and emit all classes as one source text.
pub fn convert(src: &str, root_alias: &str, infer: &InferOptions, emit: &EmitOptions) -> Result<String> {
    let (_, set) = Inference::new(infer.clone()).infer(src, root_alias)?;
    Ok(Codegen::new(emit.clone()).emit(&set)?)
}

/// Infer and emit one standalone source text per class.
pub fn convert_each(
    src: &str,
    root_alias: &str,
    infer: &InferOptions,
    emit: &EmitOptions,
) -> Result<Vec<EmittedClass>> {
    let (_, set) = Inference::new(infer.clone()).infer(src, root_alias)?;
    Ok(Codegen::new(emit.clone()).emit_each(&set)?)
}
