//! Session cookie lookup
//!
//! The app stores only a username marker in a cookie; it tells the shell
//! whether to offer login or registration. The credential ceremonies
//! themselves happen in the platform's credential provider and are not
//! modeled here.

/// Read the username marker out of a raw `Cookie` header, if present
pub fn username_from_cookies(header: &str) -> Option<String> {
    let pattern = regex_lite::Regex::new(r"(?:^|;\s*)username=([^;]*)").unwrap();
    let value = pattern.captures(header)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cookie() {
        assert_eq!(
            username_from_cookies("username=ada"),
            Some("ada".to_string())
        );
    }

    #[test]
    fn test_among_other_cookies() {
        assert_eq!(
            username_from_cookies("theme=dark; username=ada; seen_tour=1"),
            Some("ada".to_string())
        );
    }

    #[test]
    fn test_absent_or_empty_marker() {
        assert_eq!(username_from_cookies("theme=dark"), None);
        assert_eq!(username_from_cookies("username="), None);
        assert_eq!(username_from_cookies(""), None);
    }

    #[test]
    fn test_does_not_match_suffixed_names() {
        assert_eq!(username_from_cookies("old_username=grace"), None);
    }
}
