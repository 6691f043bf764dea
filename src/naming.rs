//! JSON key → identifier.
//!
//! Keys are arbitrary strings (`"first name"`, `"2fa"`, `"@id"`, `""`), identifiers are not.
//! Everything here is pure and idempotent: feeding an identifier produced by this module
//! back through the same function returns it unchanged.
use crate::error::NamingError;

/// Casing convention for a derived identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    /// `first_name` → `FirstName`. Used for every type name.
    #[default]
    UpperCamel,
    /// `firstName` → `first_name`.
    Snake,
}

/// Suffix appended to list-valued field identifiers that lack it.
const PLURAL_SUFFIX: char = 's';

/// Prefix of the synthetic field identifier when a key carries no letters at all.
const FALLBACK_PREFIX: &str = "P";

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_ascii_digit() || (c.is_alphabetic() && unicode_ident::is_xid_continue(c))
}

/// Letters that may open an identifier. Combining marks are alphabetic but may only continue one.
fn is_leading_char(c: char) -> bool {
    c.is_alphabetic() && unicode_ident::is_xid_start(c)
}

/// Characters that survive filtering, minus the leading run that cannot start an identifier.
fn retained(raw: &str) -> impl Iterator<Item = char> + '_ {
    raw.chars()
        .filter(|c| is_word_char(*c))
        .skip_while(|c| !is_leading_char(*c))
}

/// Derive an identifier, or `None` when nothing usable is left.
pub fn sanitize(raw: &str, case: Case) -> Option<String> {
    let out = match case {
        Case::UpperCamel => upper_camel(raw),
        Case::Snake => snake(raw),
    };
    if out.is_empty() { None } else { Some(out) }
}

fn upper_camel(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut next_upper = true;
    for c in retained(raw) {
        if c == '_' {
            next_upper = true;
            continue;
        }
        if next_upper {
            out.extend(c.to_uppercase().filter(|c| is_word_char(*c)));
            next_upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn snake(raw: &str) -> String {
    words(raw)
        .iter()
        .map(|w| {
            w.chars()
                .flat_map(char::to_lowercase)
                .filter(|c| is_word_char(*c) && *c != '_')
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Split at underscores, at lower/digit → upper transitions and before the last capital
/// of an acronym run (`HTTPServer` → `HTTP`, `Server`).
fn words(raw: &str) -> Vec<String> {
    let chars = retained(raw).collect::<Vec<_>>();
    let mut out = Vec::<String>::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let after_lower = prev.is_lowercase() || prev.is_ascii_digit();
            let acronym_end = prev.is_uppercase() && next.is_some_and(char::is_lowercase);
            if after_lower || acronym_end {
                out.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Type name for a schema. Classes have no fallback.
pub fn class_name(raw: &str) -> Result<String, NamingError> {
    sanitize(raw, Case::UpperCamel).ok_or_else(|| NamingError::Empty { raw: raw.to_string() })
}

/// Member name for a field. Never fails: keys without letters become `P<digits>`.
pub fn field_name(raw: &str, is_list: bool, case: Case) -> String {
    let mut name = sanitize(raw, case).unwrap_or_else(|| fallback(raw, case));
    if is_list && !name.ends_with(PLURAL_SUFFIX) {
        name.push(PLURAL_SUFFIX);
    }
    name
}

fn fallback(raw: &str, case: Case) -> String {
    let digits = raw.chars().filter(char::is_ascii_digit).collect::<String>();
    let prefix = match case {
        Case::UpperCamel => FALLBACK_PREFIX.to_string(),
        Case::Snake => FALLBACK_PREFIX.to_lowercase(),
    };
    format!("{prefix}{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWKWARD: &[&str] = &[
        "", "_", "__", "a", "A", "first_name", "firstName", "first name", "first-name",
        "__private", "2fa", "123", "@id", "$ref", "HTTPServer", "a__b", "x_y_z", "snake_case_",
        "Already", "ÄrgerÜber", "straße", "a1B2c3", "1-2", "::", "über_größe",
        "\u{093E}x", "\u{0301}name", "ab\u{093E}c",
    ];

    #[test]
    fn upper_camel_examples() {
        assert_eq!(sanitize("first_name", Case::UpperCamel).as_deref(), Some("FirstName"));
        assert_eq!(sanitize("firstName", Case::UpperCamel).as_deref(), Some("FirstName"));
        assert_eq!(sanitize("first name", Case::UpperCamel).as_deref(), Some("Firstname"));
        assert_eq!(sanitize("@id", Case::UpperCamel).as_deref(), Some("Id"));
        assert_eq!(sanitize("2fa", Case::UpperCamel).as_deref(), Some("Fa"));
        assert_eq!(sanitize("a__b", Case::UpperCamel).as_deref(), Some("AB"));
        assert_eq!(sanitize("123", Case::UpperCamel), None);
        assert_eq!(sanitize("", Case::UpperCamel), None);
    }

    #[test]
    fn snake_examples() {
        assert_eq!(sanitize("firstName", Case::Snake).as_deref(), Some("first_name"));
        assert_eq!(sanitize("HTTPServer", Case::Snake).as_deref(), Some("http_server"));
        assert_eq!(sanitize("__private", Case::Snake).as_deref(), Some("private"));
        assert_eq!(sanitize("a1B2c3", Case::Snake).as_deref(), Some("a1_b2c3"));
        assert_eq!(sanitize("x_y_z", Case::Snake).as_deref(), Some("x_y_z"));
    }

    #[test]
    fn sanitize_is_idempotent() {
        for case in [Case::UpperCamel, Case::Snake] {
            for raw in AWKWARD {
                let Some(once) = sanitize(raw, case) else { continue };
                let twice = sanitize(&once, case);
                assert_eq!(twice.as_deref(), Some(once.as_str()), "{raw:?} ({case:?})");
            }
        }
    }

    #[test]
    fn identifiers_start_with_a_letter() {
        for case in [Case::UpperCamel, Case::Snake] {
            for raw in AWKWARD {
                let Some(ident) = sanitize(raw, case) else { continue };
                let mut chars = ident.chars();
                let first = chars.next().unwrap();
                assert!(unicode_ident::is_xid_start(first), "{raw:?} → {ident:?}");
                assert!(chars.all(unicode_ident::is_xid_continue), "{raw:?} → {ident:?}");
            }
        }
        assert_eq!(sanitize("\u{093E}x", Case::UpperCamel).as_deref(), Some("X"));
        assert_eq!(sanitize("\u{0301}", Case::UpperCamel), None);
        assert_eq!(field_name("\u{093E}1", false, Case::UpperCamel), "P1");
        assert_eq!(sanitize("ab\u{093E}c", Case::UpperCamel).as_deref(), Some("Ab\u{093E}c"));
    }

    #[test]
    fn field_fallback_and_plural() {
        assert_eq!(field_name("123", false, Case::UpperCamel), "P123");
        assert_eq!(field_name("1-2", false, Case::UpperCamel), "P12");
        assert_eq!(field_name("$", false, Case::UpperCamel), "P");
        assert_eq!(field_name("7", false, Case::Snake), "p7");
        assert_eq!(field_name("topping", true, Case::UpperCamel), "Toppings");
        assert_eq!(field_name("tags", true, Case::UpperCamel), "Tags");
        assert_eq!(field_name("child", true, Case::Snake), "childs");
    }

    #[test]
    fn class_name_has_no_fallback() {
        assert_eq!(class_name("batters"), Ok("Batters".to_string()));
        assert_eq!(
            class_name("42"),
            Err(NamingError::Empty { raw: "42".to_string() })
        );
    }
}
