//! Identifier and naming helpers shared by the language generators

use crate::endpoint::placeholder_name;

/// Casing applied to synthesized identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingConvention {
    /// `getUsersOrders`
    LowerCamel,
    /// `GetUsersOrders`
    UpperCamel,
    /// `get_users_orders`
    Snake,
}

impl NamingConvention {
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingConvention::LowerCamel => camel_case(name),
            NamingConvention::UpperCamel => pascal_case(name),
            NamingConvention::Snake => snake_case(name),
        }
    }
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split an identifier-ish string into words.
///
/// Any non-alphanumeric character is a separator; a lower-case letter or
/// digit followed by an upper-case letter also starts a new word.
pub fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in s.chars() {
        if !ch.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

pub fn pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

pub fn camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_ascii_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub fn snake_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn kebab_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Lower-case alphanumerics only, as used for Go and Java package names
pub fn flat_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect()
}

/// Make `name` a valid identifier under `convention`.
///
/// Empty results become `_`, a leading digit gets a `_` prefix and reserved
/// words get a `_` suffix.
pub fn sanitize_identifier(name: &str, convention: NamingConvention, reserved: &[&str]) -> String {
    let mut ident = convention.apply(name);
    if ident.is_empty() {
        return "_".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if reserved.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Base method name for an endpoint: the lower-cased HTTP method followed by
/// each non-placeholder path segment in PascalCase.
///
/// `GET /users/{id}/orders` becomes `getUsersOrders`.
pub fn method_base_name(method: &str, path: &str) -> String {
    let mut name = camel_case(method);
    for segment in path.split('/') {
        if segment.is_empty() || placeholder_name(segment).is_some() {
            continue;
        }
        name.push_str(&pascal_case(segment));
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_base_name() {
        assert_eq!(method_base_name("GET", "/users/{id}/orders"), "getUsersOrders");
        assert_eq!(method_base_name("post", "/users"), "postUsers");
        assert_eq!(method_base_name("DELETE", "/users/{id}"), "deleteUsers");
        assert_eq!(method_base_name("get", "/"), "get");
        assert_eq!(method_base_name("patch", "/user-profiles/{id}"), "patchUserProfiles");
        assert_eq!(method_base_name("get", "/v1/api.json"), "getV1ApiJson");
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(capitalize("acme"), "Acme");
        assert_eq!(capitalize(""), "");
        assert_eq!(pascal_case("user management"), "UserManagement");
        assert_eq!(pascal_case("my-api"), "MyApi");
        assert_eq!(camel_case("user_id"), "userId");
        assert_eq!(camel_case("ID"), "id");
        assert_eq!(snake_case("getUsersOrders"), "get_users_orders");
        assert_eq!(snake_case("My API Client"), "my_api_client");
        assert_eq!(kebab_case("User Management"), "user-management");
        assert_eq!(flat_case("my-api"), "myapi");
    }

    #[test]
    fn test_sanitize_identifier() {
        let reserved = ["class", "import"];
        assert_eq!(sanitize_identifier("class", NamingConvention::Snake, &reserved), "class_");
        assert_eq!(sanitize_identifier("2fa", NamingConvention::LowerCamel, &reserved), "_2fa");
        assert_eq!(sanitize_identifier("---", NamingConvention::UpperCamel, &reserved), "_");
        assert_eq!(
            sanitize_identifier("user-id", NamingConvention::LowerCamel, &reserved),
            "userId"
        );
    }

    #[test]
    fn test_naming_convention_apply() {
        assert_eq!(NamingConvention::LowerCamel.apply("getUsersOrders"), "getUsersOrders");
        assert_eq!(NamingConvention::UpperCamel.apply("getUsersOrders"), "GetUsersOrders");
        assert_eq!(NamingConvention::Snake.apply("getUsersOrders"), "get_users_orders");
    }
}
