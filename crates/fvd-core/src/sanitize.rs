//! Per-field validation used by the resolver. Every function here is
//! idempotent: feeding its output back in returns the same value.

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// `#rgb` or `#rrggbb`, normalized to lowercase `#rrggbb`.
pub(crate) fn hex_color(input: &str) -> Option<String> {
    let digits = input.trim().strip_prefix('#')?;
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }

    let digits = digits.to_ascii_lowercase();
    match digits.len() {
        6 => Some(format!("#{digits}")),
        3 => Some(digits.chars().fold(String::from("#"), |mut out, ch| {
            out.push(ch);
            out.push(ch);
            out
        })),
        _ => None,
    }
}

/// Lowercase identifier limited to `[a-z0-9_-]`.
pub(crate) fn key(input: &str) -> Option<String> {
    let key: String = input
        .chars()
        .map(|ch| ch.to_ascii_lowercase())
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect();
    (!key.is_empty()).then_some(key)
}

/// A link target: relative (`/`, `#`, `?`, or no scheme) or one of the
/// allowed schemes. Whitespace and control characters inside are rejected.
pub(crate) fn url(input: &str) -> Option<String> {
    let url = input.trim();
    if url.is_empty() || url.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return None;
    }

    let scheme_end = url.find(':');
    let path_start = url.find(['/', '?', '#']);
    let scheme = match (scheme_end, path_start) {
        (Some(colon), Some(path)) if colon < path => Some(&url[..colon]),
        (Some(colon), None) => Some(&url[..colon]),
        _ => None,
    };

    match scheme {
        Some(scheme)
            if !ALLOWED_SCHEMES
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(scheme)) =>
        {
            None
        }
        _ => Some(url.to_string()),
    }
}

/// Plain text: tags removed, control characters dropped, whitespace collapsed.
pub(crate) fn text(input: &str) -> String {
    collapse_whitespace(&strip_tags(input))
}

/// Selector list: control characters dropped, whitespace collapsed. May be
/// empty. Combinators and quoted attribute values pass through; the renderer
/// escapes them.
pub(crate) fn selector(input: &str) -> String {
    collapse_whitespace(input)
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('>') {
            Some(close) => rest = &after[close + 1..],
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(input: &str) -> String {
    input
        .split(|ch: char| ch.is_whitespace() || ch.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_accepts_short_and_long_forms() {
        assert_eq!(hex_color("#A1B2C3").as_deref(), Some("#a1b2c3"));
        assert_eq!(hex_color(" #fff ").as_deref(), Some("#ffffff"));
        assert_eq!(hex_color("#0b0f19").as_deref(), Some("#0b0f19"));
    }

    #[test]
    fn hex_color_rejects_malformed_values() {
        for input in ["red", "", "#12", "#1234", "123456", "#ggg", "#12345z"] {
            assert_eq!(hex_color(input), None, "{input}");
        }
    }

    #[test]
    fn key_keeps_safe_characters_only() {
        assert_eq!(key("Admin-Home").as_deref(), Some("admin-home"));
        assert_eq!(key("cart<script>").as_deref(), Some("cartscript"));
        assert_eq!(key("  "), None);
        assert_eq!(key("!!"), None);
    }

    #[test]
    fn url_accepts_relative_and_allowed_schemes() {
        for input in [
            "#",
            "/shop/",
            "?s=term",
            "shop/cart",
            "https://example.com/a?b=c#d",
            "HTTP://example.com",
            "mailto:hello@example.com",
            "tel:+34600000000",
            "//cdn.example.com/x",
            "/path:with-colon",
        ] {
            assert_eq!(url(input).as_deref(), Some(input), "{input}");
        }
    }

    #[test]
    fn url_rejects_unsafe_values() {
        for input in [
            "",
            "   ",
            "javascript:alert(1)",
            "data:text/html,hi",
            "https://exa mple.com",
            "/line\nbreak",
        ] {
            assert_eq!(url(input), None, "{input:?}");
        }
    }

    #[test]
    fn text_strips_tags_and_collapses_whitespace() {
        assert_eq!(text("  <b>My</b>   Cart \n"), "My Cart");
        assert_eq!(text("a < b"), "a < b");
        assert_eq!(text("<<b>>x"), ">x");
        assert_eq!(text("<img src=x>"), "");
    }

    #[test]
    fn text_is_idempotent() {
        for input in ["<<b>>x", "a <i>b</i>  c", "x < y > z", "tab\there", "<unclosed"] {
            let once = text(input);
            assert_eq!(text(&once), once, "{input}");
        }
    }

    #[test]
    fn selector_keeps_combinators_and_attribute_values() {
        assert_eq!(
            selector(" .menu  >  .toggle, a[href=\"#x\"] "),
            ".menu > .toggle, a[href=\"#x\"]"
        );
        assert_eq!(selector("#header > .menu-toggle"), "#header > .menu-toggle");
        assert_eq!(selector("li + li ~ a"), "li + li ~ a");
    }

    #[test]
    fn selector_drops_control_characters() {
        assert_eq!(selector("#a\u{0}\n.b\t"), "#a .b");
        assert_eq!(selector(" \r\n "), "");
    }
}
