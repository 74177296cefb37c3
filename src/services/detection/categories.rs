// Category Tables
// Placeholder tag mapping and classifier label mapping

/// Placeholder tag for a category. Unknown categories fall back to an
/// uppercased form of the category name. This table is the byte-exact
/// contract for placeholder text; downstream restoration depends on it.
pub fn category_tag(category: &str) -> String {
    let tag = match category {
        "email" => "EMAIL",
        "phone" => "PHONE",
        "nationalId" => "SSN",
        "creditCard" => "CREDIT_CARD",
        "ipAddress" => "IP",
        "date" => "DATE",
        "address" => "ADDRESS",
        "city" => "CITY",
        "person" => "NAME",
        "organization" => "ORG",
        other => return other.to_uppercase(),
    };
    tag.to_string()
}

/// Literal placeholder substituted for a masked span. The bracket-and-tag
/// form matches no pattern rule and is rejected by the plausibility filter,
/// so re-running detection over masked text finds nothing.
pub fn placeholder_for(category: &str) -> String {
    format!("[REDACTED_{}]", category_tag(category))
}

/// Map a classifier label (optionally BIO-prefixed) to an internal category.
/// Returns `None` for labels that carry no maskable category.
pub fn label_category(label: &str) -> Option<&'static str> {
    let base = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label);
    match base.to_ascii_uppercase().as_str() {
        "PER" | "PERSON" => Some("person"),
        "LOC" | "LOCATION" | "CITY" | "GPE" => Some("city"),
        "ORG" | "ORGANIZATION" => Some("organization"),
        "EMAIL" => Some("email"),
        "PHONE" | "TEL" => Some("phone"),
        "ID" | "SSN" | "NATIONAL_ID" => Some("nationalId"),
        "DATE" => Some("date"),
        "ADDR" | "ADDRESS" => Some("address"),
        "IP" => Some("ipAddress"),
        _ => None,
    }
}

/// Categories whose values legitimately mix letters and digits, exempt from
/// the tokenization-noise check.
pub fn is_identifier_like(category: &str) -> bool {
    matches!(
        category,
        "email" | "phone" | "nationalId" | "creditCard" | "ipAddress" | "date"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_exact() {
        assert_eq!(category_tag("email"), "EMAIL");
        assert_eq!(category_tag("nationalId"), "SSN");
        assert_eq!(category_tag("person"), "NAME");
        assert_eq!(category_tag("creditCard"), "CREDIT_CARD");
    }

    #[test]
    fn test_unknown_category_uppercased() {
        assert_eq!(category_tag("passport"), "PASSPORT");
        assert_eq!(placeholder_for("passport"), "[REDACTED_PASSPORT]");
    }

    #[test]
    fn test_placeholder_form() {
        assert_eq!(placeholder_for("email"), "[REDACTED_EMAIL]");
        assert_eq!(placeholder_for("phone"), "[REDACTED_PHONE]");
    }

    #[test]
    fn test_label_mapping_strips_bio_prefix() {
        assert_eq!(label_category("B-PER"), Some("person"));
        assert_eq!(label_category("I-PER"), Some("person"));
        assert_eq!(label_category("PER"), Some("person"));
        assert_eq!(label_category("loc"), Some("city"));
    }

    #[test]
    fn test_unmapped_labels_dropped() {
        assert_eq!(label_category("O"), None);
        assert_eq!(label_category("MISC"), None);
        assert_eq!(label_category("B-MISC"), None);
    }

    #[test]
    fn test_identifier_like_set() {
        assert!(is_identifier_like("nationalId"));
        assert!(is_identifier_like("email"));
        assert!(!is_identifier_like("person"));
        assert!(!is_identifier_like("city"));
    }
}
