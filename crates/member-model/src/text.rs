//! Text cleanup for form values and filenames.

/// Collapse whitespace runs to single spaces and trim.
///
/// Missing and whitespace-only values become the empty string, which the
/// renderer treats as "nothing to draw".
pub fn normalize(value: Option<&str>) -> String {
    match value {
        Some(v) => v.split_whitespace().collect::<Vec<_>>().join(" "),
        None => String::new(),
    }
}

/// Lowercase ASCII slug: every run of non-alphanumerics becomes one hyphen,
/// and hyphens at either end are dropped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_missing_is_empty() {
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize(Some("  a   b ")), "a b");
        assert_eq!(normalize(Some("\tJuan\n dela  Cruz")), "Juan dela Cruz");
    }

    #[test]
    fn test_normalize_whitespace_only() {
        assert_eq!(normalize(Some(" \t\n ")), "");
    }

    #[test]
    fn test_slugify_member_id() {
        assert_eq!(slugify("ALU--001 X!"), "alu-001-x");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("--Maria Santos--"), "maria-santos");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("José Peña"), "jos-pe-a");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in ".*") {
            let once = normalize(Some(&s));
            prop_assert_eq!(normalize(Some(&once)), once.clone());
            prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
            prop_assert!(!once.contains("  "));
        }

        #[test]
        fn slug_is_well_formed(s in ".*") {
            let slug = slugify(&s);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
