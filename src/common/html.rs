/// Decodes the HTML character references that show up inside attribute values.
///
/// Handles the five XML named entities plus decimal and hexadecimal numeric
/// references. Unknown or malformed references are kept verbatim.
pub fn unescape_html(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match tail.find(';').filter(|&end| end <= 12) {
            Some(end) => match decode_entity(&tail[1..end]) {
                Some(c) => {
                    out.push(c);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Text between the first `start` marker and the next `end` marker after it.
pub fn extract_between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let len = haystack[from..].find(end)?;
    Some(&haystack[from..from + len])
}

/// Value of the `name="..."` attribute inside a single tag.
///
/// The match must start an attribute, so `data-content` never answers for
/// `content`.
pub fn tag_attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let mut from = 0;

    while let Some(pos) = tag[from..].find(&needle) {
        let at = from + pos;
        let value_start = at + needle.len();
        if tag[..at].ends_with(|c: char| c.is_ascii_whitespace()) {
            let len = tag[value_start..].find('"')?;
            return Some(&tag[value_start..value_start + len]);
        }
        from = value_start;
    }

    None
}

/// Raw `content` attribute of `<meta name="{name}" ...>`, still HTML-escaped.
pub fn meta_content<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = html;

    while let Some(open) = rest.find("<meta") {
        let tag_start = &rest[open..];
        let tag_len = tag_start.find('>')?;
        let tag = &tag_start[..tag_len];
        if tag_attribute(tag, "name") == Some(name) {
            return tag_attribute(tag, "content");
        }
        rest = &tag_start[tag_len..];
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_between_markers() {
        let html = r#"<div id="js-initial-watch-data" data-api-data="{&quot;a&quot;:1}" data-environment="{}">"#;
        assert_eq!(
            extract_between(html, "data-api-data=\"", "\""),
            Some("{&quot;a&quot;:1}")
        );
        assert_eq!(extract_between(html, "data-missing=\"", "\""), None);
    }

    #[test]
    fn finds_meta_content_by_name() {
        let html = r#"<head><meta property="og:title" content="t"><meta content="{&quot;x&quot;:2}" name="server-response"/></head>"#;
        assert_eq!(meta_content(html, "server-response"), Some("{&quot;x&quot;:2}"));
        assert_eq!(meta_content(html, "missing"), None);
    }

    #[test]
    fn meta_content_ignores_attributes_sharing_a_suffix() {
        let html = r#"<meta data-name="server-response" content="wrong"><meta data-content="x" name="server-response" content="{}">"#;
        assert_eq!(meta_content(html, "server-response"), Some("{}"));
        assert_eq!(tag_attribute(r#"<meta data-content="x">"#, "content"), None);
    }

    #[test]
    fn decodes_named_entities() {
        assert_eq!(
            unescape_html("{&quot;a&quot;:&quot;x &amp; y&quot;}"),
            r#"{"a":"x & y"}"#
        );
        assert_eq!(unescape_html("&lt;b&gt; &apos;q&apos;"), "<b> 'q'");
    }

    #[test]
    fn decodes_numeric_entities() {
        assert_eq!(unescape_html("&#34;&#x27;&#X41;"), "\"'A");
    }

    #[test]
    fn keeps_unknown_or_dangling_ampersands() {
        assert_eq!(unescape_html("a & b"), "a & b");
        assert_eq!(unescape_html("&nbsp;x"), "&nbsp;x");
        assert_eq!(unescape_html("tail &"), "tail &");
        assert_eq!(unescape_html("q=1&r=2;"), "q=1&r=2;");
    }
}
