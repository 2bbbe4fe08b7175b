//! Input sanitization helpers

/// Strip angle brackets from user input. Spaces are preserved; callers trim
/// on submit, not on keystroke.
pub fn sanitize_input(input: &str) -> String {
    input.chars().filter(|c| *c != '<' && *c != '>').collect()
}

/// HTML tags allowed in rich text fields
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "a",
    "blockquote",
];

/// Reduce rich text to the allowed tag subset. Disallowed tags are removed
/// entirely; allowed tags keep only `href` and `target` attributes.
pub fn sanitize_html(dirty: &str) -> String {
    let mut out = String::with_capacity(dirty.len());
    let mut rest = dirty;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        match tail.find('>') {
            Some(close) => {
                let inner = &tail[..close];
                if let Some(kept) = keep_tag(inner) {
                    out.push('<');
                    out.push_str(&kept);
                    out.push('>');
                }
                rest = &tail[close + 1..];
            }
            None => {
                // Unterminated tag: drop the remainder
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Returns the rewritten tag body when the tag is allowed
fn keep_tag(inner: &str) -> Option<String> {
    let trimmed = inner.trim();
    let (closing, body) = match trimmed.strip_prefix('/') {
        Some(rest) => (true, rest.trim()),
        None => (false, trimmed),
    };
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }
    if closing {
        return Some(format!("/{}", name));
    }

    // Keep only href/target attributes
    let mut kept = name.clone();
    let attrs = &body[name.len()..];
    for attr in ["href", "target"] {
        if let Some(value) = extract_attr(attrs, attr) {
            kept.push_str(&format!(" {}=\"{}\"", attr, value));
        }
    }
    Some(kept)
}

fn extract_attr(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_lowercase();
    let pos = lower.find(&format!("{}=", name))?;
    let after = &attrs[pos + name.len() + 1..];
    let quote = after.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let end = after[1..].find(quote)?;
    Some(after[1..1 + end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_input_strips_brackets() {
        assert_eq!(sanitize_input("<script>hi</script>"), "scripthi/script");
        assert_eq!(sanitize_input("  plain text  "), "  plain text  ");
    }

    #[test]
    fn test_sanitize_html_keeps_allowed_tags() {
        assert_eq!(
            sanitize_html("<p>Hello <strong>world</strong></p>"),
            "<p>Hello <strong>world</strong></p>"
        );
    }

    #[test]
    fn test_sanitize_html_drops_script() {
        assert_eq!(sanitize_html("<script>alert(1)</script>ok"), "alert(1)ok");
    }

    #[test]
    fn test_sanitize_html_strips_event_attrs() {
        assert_eq!(
            sanitize_html(r#"<a href="https://example.com" onclick="evil()">x</a>"#),
            r#"<a href="https://example.com">x</a>"#
        );
    }
}
