//! HTML utility functions.
//!
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `escape_script_json()` - JSON safe to inline inside `<script>`
//! - `first_start_tag()` - locate the first element start tag in a fragment

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape HTML attribute values.
///
/// Identical to `escape()` but semantically indicates attribute context.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Make serialized JSON safe to place between `<script>` and `</script>`.
///
/// Only `</` and `<!--` can terminate or confuse the raw text element, so
/// those are the sequences rewritten. The result is still valid JSON.
pub fn escape_script_json(json: &str) -> Cow<'_, str> {
    if !json.contains("</") && !json.contains("<!--") {
        return Cow::Borrowed(json);
    }
    Cow::Owned(json.replace("</", "<\\/").replace("<!--", "\\u003c!--"))
}

// =============================================================================
// Fragment Scanning
// =============================================================================

/// Locate the first element start tag in an HTML fragment.
///
/// Returns the byte offset just past the tag name, which is where extra
/// attributes can be inserted. Comments, doctypes and closing tags are skipped.
pub fn first_start_tag(html: &str) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut i = 0;

    while let Some(rel) = html[i..].find('<') {
        let start = i + rel;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            i = match rest.find("-->") {
                Some(end) => start + end + 3,
                None => return None,
            };
            continue;
        }

        match bytes.get(start + 1) {
            Some(b) if b.is_ascii_alphabetic() => {
                let mut end = start + 2;
                while end < bytes.len()
                    && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'-')
                {
                    end += 1;
                }
                return Some(end);
            }
            // `</x>`, `<!doctype>`, `<?x>` and stray `<`
            _ => i = start + 1,
        }
    }

    None
}
