//! Field name to config key derivation.

/// Derives the config key of a camelCase field name.
///
/// A hyphen is inserted before every uppercase ASCII letter and the result is
/// lowercased. A single `_` becomes `.` (a nested section), while a double
/// `__` becomes a literal `_`.
///
/// ```
/// use settings_schema::key::to_config_key;
///
/// assert_eq!(to_config_key("maxShopsPerPlayer"), "max-shops-per-player");
/// assert_eq!(to_config_key("shop_maxPages"), "shop.max-pages");
/// ```
pub fn to_config_key(field_name: &str) -> String {
    let mut key = String::with_capacity(field_name.len() + 4);
    for c in field_name.chars() {
        if c.is_ascii_uppercase() {
            key.push('-');
        }
        key.push(c);
    }
    key.to_lowercase().replace('_', ".").replace("..", "_")
}

/// Derives the config key of a snake_case field name.
///
/// A single `_` becomes `-`, while a double `__` separates nested sections.
///
/// ```
/// use settings_schema::key::snake_case_to_config_key;
///
/// assert_eq!(snake_case_to_config_key("max_shops_per_player"), "max-shops-per-player");
/// assert_eq!(snake_case_to_config_key("shop__max_pages"), "shop.max-pages");
/// ```
pub fn snake_case_to_config_key(field_name: &str) -> String {
    field_name
        .to_lowercase()
        .replace("__", ".")
        .replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_config_key() {
        assert_eq!(to_config_key("ab"), "ab");
        assert_eq!(to_config_key("aBcDe"), "a-bc-de");
        assert_eq!(to_config_key("aBCDe"), "a-b-c-de");
        assert_eq!(to_config_key("textLine1"), "text-line1");
        assert_eq!(to_config_key("1apple"), "1apple");
        assert_eq!(to_config_key("aBc1De2"), "a-bc1-de2");
        assert_eq!(
            to_config_key("someCategory_someValue"),
            "some-category.some-value"
        );
        assert_eq!(
            to_config_key("someCategory__someValue"),
            "some-category_some-value"
        );
    }

    #[test]
    fn test_snake_case_to_config_key() {
        assert_eq!(snake_case_to_config_key("debug"), "debug");
        assert_eq!(snake_case_to_config_key("text_line1"), "text-line1");
        assert_eq!(
            snake_case_to_config_key("some_category__some_value"),
            "some-category.some-value"
        );
    }
}
