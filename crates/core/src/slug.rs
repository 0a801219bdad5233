//! Slug and tag helpers
//!
//! `to_mekanismi_uri` turns a human title into the URL-safe key used for
//! sites and pages. Tag helpers normalize tag strings before they reach the
//! tag index: every stored tag is lowercase, trimmed and unique.

/// Slugify a name into a document key
///
/// Every character that is not alphanumeric becomes `-`, runs of `-`
/// collapse into one, leading and trailing `-` are stripped and the result
/// is lowercased. Non-ASCII letters (`ä`, `ö`, ...) are kept.
///
/// # Examples
///
/// ```
/// use pelilauta_core::slug::to_mekanismi_uri;
///
/// assert_eq!(to_mekanismi_uri("  12 3  "), "12-3");
/// assert_eq!(to_mekanismi_uri("Hello, World!"), "hello-world");
/// assert_eq!(to_mekanismi_uri("Äänipää"), "äänipää");
/// ```
pub fn to_mekanismi_uri(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;

    for c in s.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Normalize a single tag: trim and lowercase
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Normalize a tag list: trim, lowercase, drop empties, dedupe
///
/// The first occurrence of each tag wins, so the caller's ordering is kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = normalize_tag(tag.as_ref());
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Collect `#hashtag` tokens from markdown content
///
/// A tag starts with `#` at the beginning of the text or after whitespace and
/// runs over alphanumerics, `-` and `_`. Markdown headings (`# Title`) yield
/// nothing because the `#` is followed by a space.
pub fn extract_tags(markdown: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut prev_is_space = true;
    let mut chars = markdown.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '#' && prev_is_space {
            let mut tag = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_alphanumeric() || next == '-' || next == '_' {
                    tag.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if !tag.is_empty() {
                found.push(tag);
            }
            prev_is_space = false;
            continue;
        }
        prev_is_space = c.is_whitespace();
    }

    normalize_tags(found)
}
