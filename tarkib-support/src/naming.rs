//! Name derivation helpers.
//!
//! Default bean references are synthesized from type and member names.
//! These helpers keep that logic in one place so every resolver derives
//! names the same way.

/// Returns the simple name of a fully qualified type name.
///
/// Both `::` and `.` are accepted as path separators, and generic
/// arguments are dropped.
///
/// # Examples
/// ```
/// use tarkib_support::naming::simple_type_name;
///
/// assert_eq!(simple_type_name("app::repo::UserRepo"), "UserRepo");
/// assert_eq!(simple_type_name("java.lang.String"), "String");
/// assert_eq!(simple_type_name("alloc::vec::Vec<app::Item>"), "Vec");
/// ```
pub fn simple_type_name(full_name: &str) -> &str {
    let base = match full_name.find('<') {
        Some(idx) => &full_name[..idx],
        None => full_name,
    };
    let base = base.trim();

    let after_colons = match base.rfind("::") {
        Some(idx) => &base[idx + 2..],
        None => base,
    };
    match after_colons.rfind('.') {
        Some(idx) => &after_colons[idx + 1..],
        None => after_colons,
    }
}

/// Lowercases the first character, leaving the rest untouched.
///
/// ```
/// use tarkib_support::naming::uncapitalize;
///
/// assert_eq!(uncapitalize("UserRepo"), "userRepo");
/// assert_eq!(uncapitalize("URL"), "uRL");
/// assert_eq!(uncapitalize(""), "");
/// ```
pub fn uncapitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits a comma-separated value into trimmed entries.
///
/// A blank value yields no entries at all; blank entries between commas
/// are kept as empty strings so positions stay aligned.
///
/// ```
/// use tarkib_support::naming::split_csv;
///
/// assert_eq!(split_csv(" a , b "), vec!["a", "b"]);
/// assert_eq!(split_csv("a,,c"), vec!["a", "", "c"]);
/// assert!(split_csv("   ").is_empty());
/// ```
pub fn split_csv(value: &str) -> Vec<&str> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::trim).collect()
}

/// Removes the first matching suffix, unless nothing would remain.
///
/// ```
/// use tarkib_support::naming::strip_suffix_word;
///
/// assert_eq!(strip_suffix_word("widgetProvider", &["Provider"]), "widget");
/// assert_eq!(strip_suffix_word("Provider", &["Provider"]), "Provider");
/// assert_eq!(strip_suffix_word("gadget", &["Provider"]), "gadget");
/// ```
pub fn strip_suffix_word<'a>(name: &'a str, suffixes: &[&str]) -> &'a str {
    for suffix in suffixes {
        if let Some(stripped) = name.strip_suffix(suffix) {
            if !stripped.is_empty() {
                return stripped;
            }
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_without_path() {
        assert_eq!(simple_type_name("String"), "String");
    }

    #[test]
    fn simple_name_mixed_separators() {
        assert_eq!(simple_type_name("crate::outer.Inner"), "Inner");
    }

    #[test]
    fn simple_name_of_generic() {
        assert_eq!(
            simple_type_name("std::collections::HashSet<app::Tag>"),
            "HashSet"
        );
    }

    #[test]
    fn uncapitalize_keeps_tail() {
        assert_eq!(uncapitalize("Integer"), "integer");
        assert_eq!(uncapitalize("already"), "already");
    }

    #[test]
    fn uncapitalize_non_ascii() {
        assert_eq!(uncapitalize("Äpfel"), "äpfel");
    }

    #[test]
    fn csv_single_entry() {
        assert_eq!(split_csv("innn1"), vec!["innn1"]);
    }

    #[test]
    fn csv_empty() {
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn suffix_snake_case() {
        assert_eq!(
            strip_suffix_word("widget_provider", &["Provider", "_provider"]),
            "widget"
        );
    }
}
