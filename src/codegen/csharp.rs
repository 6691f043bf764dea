//! C# classes with Newtonsoft.Json attributes.
use super::Dialect;
use crate::ir::Primitive;
use crate::lower::ClassDecl;
use crate::naming::Case;

const DEFAULT_IMPORTS: &[&str] = &[
    "System",
    "System.Collections.Generic",
    "System.Globalization",
    "Newtonsoft.Json",
    "Newtonsoft.Json.Converters",
];

const INDENT: &str = "    ";

pub struct CSharp;

impl Dialect for CSharp {
    fn field_case(&self) -> Case {
        Case::UpperCamel
    }

    fn member_may_not_repeat_class_name(&self) -> bool {
        true
    }

    fn primitive(&self, p: Primitive) -> &'static str {
        match p {
            Primitive::Integer => "int",
            Primitive::Float => "float",
            Primitive::String => "string",
            Primitive::Boolean => "bool",
            Primitive::Unknown => "object",
        }
    }

    fn reference(&self, class: &str, _recursive: bool) -> String {
        // reference types: self-reference is fine
        class.to_string()
    }

    fn list(&self, element: &str) -> String {
        format!("IList<{element}>")
    }

    fn render_class(&self, class: &ClassDecl) -> String {
        let mut out = format!("{INDENT}public class {}\n{INDENT}{{\n", class.name);
        for field in &class.fields {
            out.push_str(&format!(
                "{INDENT}{INDENT}[JsonProperty({})]\n{INDENT}{INDENT}public {} {} {{get; set;}}\n",
                string_literal(&field.json_key),
                field.ty,
                field.ident,
            ));
        }
        out.push_str(INDENT);
        out.push('}');
        out
    }

    fn render_module(&self, namespace: &str, imports: &[String], classes: &[String]) -> String {
        let mut out = format!("namespace {namespace}\n{{\n");
        if !imports.is_empty() {
            for import in imports {
                out.push_str(&format!("{INDENT}using {import};\n"));
            }
            out.push('\n');
        }
        out.push_str(&classes.join("\n\n"));
        out.push_str("\n}\n");
        out
    }

    fn default_imports(&self) -> Vec<String> {
        DEFAULT_IMPORTS.iter().map(|s| s.to_string()).collect()
    }

    fn file_name(&self, class: &str) -> String {
        format!("{class}.cs")
    }
}

/// Regular (non-verbatim) C# string literal.
fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::FieldDecl;

    #[test]
    fn escapes_json_keys() {
        assert_eq!(string_literal("plain"), r#""plain""#);
        assert_eq!(string_literal(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(string_literal("tab\there"), r#""tab\there""#);
        assert_eq!(string_literal("\u{7}"), r#""\u0007""#);
    }

    #[test]
    fn renders_an_empty_class() {
        let class = ClassDecl { name: "Empty".into(), fields: vec![] };
        assert_eq!(CSharp.render_class(&class), "    public class Empty\n    {\n    }");
    }

    #[test]
    fn renders_a_field() {
        let class = ClassDecl {
            name: "Thing".into(),
            fields: vec![FieldDecl { json_key: "first name".into(), ident: "Firstname".into(), ty: "string".into() }],
        };
        assert_eq!(
            CSharp.render_class(&class),
            "    public class Thing\n    {\n        [JsonProperty(\"first name\")]\n        public string Firstname {get; set;}\n    }"
        );
    }
}
