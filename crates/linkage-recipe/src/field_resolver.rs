//! Field name normalization and resolution against a record schema.

/// Normalizes a field name by lowercasing, replacing dashes/spaces with
/// underscores, and trimming.
pub fn normalize_field_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Finds the schema field matching `field` after normalization.
pub fn resolve_field_name(field: &str, available_fields: &[String]) -> Option<String> {
    let normalized = normalize_field_name(field);
    available_fields
        .iter()
        .find(|available| normalize_field_name(available) == normalized)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize_field_name("ZipCode"), "zipcode");
    }

    #[test]
    fn normalize_replaces_dashes_and_spaces() {
        assert_eq!(normalize_field_name("zip-code"), "zip_code");
        assert_eq!(normalize_field_name("zip code"), "zip_code");
        assert_eq!(normalize_field_name(" zip "), "zip");
    }

    #[test]
    fn resolve_exact_match() {
        let fields = vec!["zip_code".to_string(), "name".to_string()];
        assert_eq!(resolve_field_name("zip_code", &fields), Some("zip_code".to_string()));
    }

    #[test]
    fn resolve_case_insensitive() {
        let fields = vec!["ZipCode".to_string()];
        assert_eq!(resolve_field_name("zipcode", &fields), Some("ZipCode".to_string()));
    }

    #[test]
    fn resolve_missing_returns_none() {
        let fields = vec!["name".to_string()];
        assert_eq!(resolve_field_name("zip", &fields), None);
    }
}
