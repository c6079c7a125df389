// src/services/sanitize.rs
// DOCUMENTATION: Input sanitization helpers
// PURPOSE: Escape user text before it is stored and normalize query values

use crate::models::ListDestination;

/// Escape the five HTML-significant characters
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Truncate to at most `max_chars` characters (never splits a char)
pub fn limit_length(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((byte_index, _)) => input[..byte_index].to_string(),
        None => input.to_string(),
    }
}

pub fn is_non_empty(input: &str) -> bool {
    !input.trim().is_empty()
}

/// Trim, bound, then escape a free-text field
/// The bound applies to the raw text so entities are never cut in half
pub fn clean_text(input: &str, max_chars: usize) -> String {
    escape_html(&limit_length(input.trim(), max_chars))
}

pub fn clean_optional_text(input: Option<&str>, max_chars: usize) -> Option<String> {
    input
        .filter(|s| is_non_empty(s))
        .map(|s| clean_text(s, max_chars))
}

/// Clean every list entry, dropping entries without a name
pub fn sanitize_destinations(destinations: &[ListDestination]) -> Vec<ListDestination> {
    destinations
        .iter()
        .filter(|d| is_non_empty(&d.name))
        .map(|d| ListDestination {
            name: clean_text(&d.name, 200),
            details: clean_optional_text(d.details.as_deref(), 1000),
        })
        .collect()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Query value for the destinations filter: `<`/`>` escaped, trimmed, lowercased
pub fn filter_value(input: &str) -> String {
    input
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .trim()
        .to_lowercase()
}

/// Query value for prefix search: `<`/`>` escaped, one leading and one
/// trailing quote removed, then trimmed
pub fn search_value(input: &str) -> String {
    let escaped = input.replace('<', "&lt;").replace('>', "&gt;");
    let unquoted = escaped
        .strip_prefix(['"', '\''].as_slice())
        .unwrap_or(&escaped);
    let unquoted = unquoted
        .strip_suffix(['"', '\''].as_slice())
        .unwrap_or(unquoted);
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Lisbon"), "Lisbon");
    }

    #[test]
    fn test_limit_length_is_char_safe() {
        assert_eq!(limit_length("Zürich", 2), "Zü");
        assert_eq!(limit_length("Oslo", 10), "Oslo");
        assert_eq!(limit_length("", 3), "");
    }

    #[test]
    fn test_clean_text_never_splits_entities() {
        let input = format!("{}&", "a".repeat(49));
        let cleaned = clean_text(&input, 50);
        assert!(cleaned.ends_with("&amp;"));
        assert_eq!(cleaned.len(), 54);

        let nickname = clean_text(&"<".repeat(60), 50);
        assert_eq!(nickname, "&lt;".repeat(50));
        assert!(!nickname.ends_with('&'));
    }

    #[test]
    fn test_clean_optional_text_drops_blank() {
        assert_eq!(clean_optional_text(Some("   "), 10), None);
        assert_eq!(clean_optional_text(None, 10), None);
        assert_eq!(clean_optional_text(Some(" hi "), 10), Some("hi".to_string()));
    }

    #[test]
    fn test_sanitize_destinations() {
        let input = vec![
            ListDestination {
                name: " <Rome> ".to_string(),
                details: Some("".to_string()),
            },
            ListDestination {
                name: "  ".to_string(),
                details: Some("ignored".to_string()),
            },
        ];

        let cleaned = sanitize_destinations(&input);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].name, "&lt;Rome&gt;");
        assert_eq!(cleaned[0].details, None);
    }

    #[test]
    fn test_filter_value() {
        assert_eq!(filter_value("  Italy "), "italy");
        assert_eq!(filter_value("<script>"), "&lt;script&gt;");
    }

    #[test]
    fn test_search_value_strips_one_quote_pair() {
        assert_eq!(search_value("\"Paris\""), "Paris");
        assert_eq!(search_value("'Rome"), "Rome");
        assert_eq!(search_value("\"\"Oslo\"\""), "\"Oslo\"");
        assert_eq!(search_value("  Vienna  "), "Vienna");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
