use std::collections::HashMap;

pub(crate) fn escape_rust_keyword<T>(string: T) -> String
where
    T: ToString,
{
    let string = string.to_string();
    if RUST_KEYWORDS.iter().any(|s| s.eq(&string)) {
        format!("r#{string}")
    } else if RUST_SPECIAL_KEYWORDS.iter().any(|s| s.eq(&string)) {
        format!("{string}_")
    } else {
        string
    }
}

/// Number every name that occurs more than once, in order of appearance,
/// joining name and number with `separator`. Unique names are left as is.
pub(crate) fn number_duplicates(names: Vec<String>, separator: &str) -> Vec<String> {
    let mut totals: HashMap<String, usize> = HashMap::new();
    for name in names.iter() {
        *totals.entry(name.clone()).or_default() += 1;
    }
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            if totals[&name] < 2 {
                return name;
            }
            let n = seen.entry(name.clone()).or_default();
            *n += 1;
            format!("{name}{separator}{n}")
        })
        .collect()
}

pub(crate) const RUST_KEYWORDS: [&str; 48] = [
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "union", "unsafe", "use", "where",
    "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be written as raw identifiers
pub(crate) const RUST_SPECIAL_KEYWORDS: [&str; 4] = ["crate", "Self", "self", "super"];

/// File stems the writer uses for its own files
pub(crate) const RESERVED_MODULE_NAMES: [&str; 3] = ["lib", "mod", "prelude"];

/// Turn a case-converted schema name into identifier text.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit is prefixed
/// with `_`, and a name with nothing left (empty or a lone `_`) becomes
/// `fallback`. Keywords are left for [`escape_rust_keyword`].
pub(crate) fn sanitize_ident(name: &str, fallback: &str) -> String {
    let ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match ident.chars().next() {
        None => fallback.to_owned(),
        Some('_') if ident.len() == 1 => fallback.to_owned(),
        Some(c) if c.is_ascii_digit() => format!("_{ident}"),
        Some(_) => ident,
    }
}

/// Module name for an entity file: a sanitized name that does not collide with
/// the index or prelude file, and that needs no raw-identifier escaping
pub(crate) fn module_name(name: &str) -> String {
    let escaped = escape_rust_keyword(sanitize_ident(name, "unnamed"));
    let mut module = escaped.trim_start_matches("r#").to_owned();
    if RESERVED_MODULE_NAMES.contains(&module.as_str()) || escaped.starts_with("r#") {
        module.push('_');
    }
    module
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_rust_keyword() {
        assert_eq!(escape_rust_keyword("type"), "r#type");
        assert_eq!(escape_rust_keyword("self"), "self_");
        assert_eq!(escape_rust_keyword("title"), "title");
    }

    #[test]
    fn test_escape_special_keywords() {
        for keyword in RUST_SPECIAL_KEYWORDS {
            assert_eq!(escape_rust_keyword(keyword), format!("{keyword}_"));
        }
    }

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(sanitize_ident("2fa", "unnamed"), "_2fa");
        assert_eq!(sanitize_ident("", "unnamed"), "unnamed");
        assert_eq!(sanitize_ident("_", "Unnamed"), "Unnamed");
        assert_eq!(sanitize_ident("e-mail address", "unnamed"), "e_mail_address");
        assert_eq!(sanitize_ident("gr\u{f6}\u{df}e", "unnamed"), "gr__e");
        assert_eq!(sanitize_ident("parent_id", "unnamed"), "parent_id");
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("user_post"), "user_post");
        assert_eq!(module_name("prelude"), "prelude_");
        assert_eq!(module_name("mod"), "mod_");
        assert_eq!(module_name("type"), "type_");
        assert_eq!(module_name("self"), "self_");
        assert_eq!(module_name("3d"), "_3d");
        assert_eq!(module_name(""), "unnamed");
    }

    #[test]
    fn test_number_duplicates() {
        let names = ["id", "parent_id", "name", "parent_id"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            number_duplicates(names, "_"),
            ["id", "parent_id_1", "name", "parent_id_2"]
        );

        let names = vec!["User".to_owned(), "ChildsPost".to_owned()];
        assert_eq!(number_duplicates(names, ""), ["User", "ChildsPost"]);
    }
}
