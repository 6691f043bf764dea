//! Rust structs deriving serde traits.
//!
//! Every field is optional: merged schemas carry the union of keys seen across many
//! objects, and any single object may lack some of them.
use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::{Dialect, DEFAULT_NAMESPACE};
use crate::ir::Primitive;
use crate::lower::ClassDecl;
use crate::naming::{self, Case};

const DERIVES: &str = "Debug, Clone, Default, PartialEq, Serialize, Deserialize";

const INDENT: &str = "    ";

/// Strict, reserved and weak keywords (2024 edition).
static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "try", "type", "unsafe", "use", "where", "while", "abstract", "become",
        "box", "do", "final", "macro", "override", "priv", "typeof", "unsized", "virtual",
        "yield", "union",
    ]
    .into_iter()
    .collect()
});

/// Type names the generated module itself relies on.
static TAKEN_TYPE_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Self", "Option", "Some", "None", "Box", "Vec", "String", "Result", "Ok", "Err",
        "Debug", "Clone", "Default", "PartialEq", "Serialize", "Deserialize",
    ]
    .into_iter()
    .collect()
});

pub struct Rust;

impl Dialect for Rust {
    fn field_case(&self) -> Case {
        Case::Snake
    }

    fn class_ident(&self, name: String) -> String {
        if TAKEN_TYPE_NAMES.contains(name.as_str()) { format!("{name}_") } else { name }
    }

    fn field_ident(&self, ident: String) -> String {
        escape_keyword(ident)
    }

    fn primitive(&self, p: Primitive) -> &'static str {
        match p {
            Primitive::Integer => "i64",
            Primitive::Float => "f64",
            Primitive::String => "String",
            Primitive::Boolean => "bool",
            Primitive::Unknown => "serde_json::Value",
        }
    }

    fn reference(&self, class: &str, recursive: bool) -> String {
        // a by-value cycle would have infinite size
        if recursive { format!("Box<{class}>") } else { class.to_string() }
    }

    fn list(&self, element: &str) -> String {
        format!("Vec<{element}>")
    }

    fn render_class(&self, class: &ClassDecl) -> String {
        let mut out = format!("{INDENT}#[derive({DERIVES})]\n{INDENT}pub struct {}", class.name);
        if class.fields.is_empty() {
            out.push_str(" {}");
            return out;
        }
        out.push_str(" {\n");
        for field in &class.fields {
            out.push_str(&format!(
                "{INDENT}{INDENT}#[serde(rename = {:?}, default)]\n{INDENT}{INDENT}pub {}: Option<{}>,\n",
                field.json_key, field.ident, field.ty,
            ));
        }
        out.push_str(INDENT);
        out.push('}');
        out
    }

    fn render_module(&self, namespace: &str, imports: &[String], classes: &[String]) -> String {
        let mut out = format!("pub mod {} {{\n", module_ident(namespace));
        if !imports.is_empty() {
            for import in imports {
                out.push_str(&format!("{INDENT}use {import};\n"));
            }
            out.push('\n');
        }
        out.push_str(&classes.join("\n\n"));
        out.push_str("\n}\n");
        out
    }

    fn default_imports(&self) -> Vec<String> {
        vec!["serde::{Deserialize, Serialize}".to_string()]
    }

    fn file_name(&self, class: &str) -> String {
        let stem = naming::sanitize(class, Case::Snake).unwrap_or_else(|| class.to_lowercase());
        format!("{stem}.rs")
    }
}

fn escape_keyword(ident: String) -> String {
    if KEYWORDS.contains(ident.as_str()) { format!("{ident}_") } else { ident }
}

/// `Company.Api.Models` → `company_api_models`.
fn module_ident(namespace: &str) -> String {
    let ident = naming::sanitize(namespace, Case::Snake)
        .or_else(|| naming::sanitize(DEFAULT_NAMESPACE, Case::Snake))
        .unwrap_or_default();
    escape_keyword(ident)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::FieldDecl;

    #[test]
    fn keywords_and_reserved_type_names_are_escaped() {
        assert_eq!(Rust.field_ident("type".into()), "type_");
        assert_eq!(Rust.field_ident("kind".into()), "kind");
        assert_eq!(Rust.class_ident("Option".into()), "Option_");
        assert_eq!(Rust.class_ident("Self".into()), "Self_");
        assert_eq!(Rust.class_ident("Topping".into()), "Topping");
    }

    #[test]
    fn module_names() {
        assert_eq!(module_ident("Company.Api.Models"), "company_api_models");
        assert_eq!(module_ident(DEFAULT_NAMESPACE), "none");
        assert_eq!(module_ident("!!"), "none");
        assert_eq!(module_ident("mod"), "mod_");
    }

    #[test]
    fn json_keys_become_string_literals() {
        let class = ClassDecl {
            name: "Q".into(),
            fields: vec![FieldDecl { json_key: "say \"hi\"".into(), ident: "say_hi".into(), ty: "String".into() }],
        };
        let out = Rust.render_class(&class);
        assert!(out.contains(r#"#[serde(rename = "say \"hi\"", default)]"#), "{out}");
    }

    #[test]
    fn empty_struct() {
        let class = ClassDecl { name: "Unit".into(), fields: vec![] };
        assert_eq!(
            Rust.render_class(&class),
            "    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]\n    pub struct Unit {}"
        );
    }
}
