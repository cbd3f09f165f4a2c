use url::Url;

/// Splits an HLS attribute list (`KEY=VALUE,KEY="VALUE"`) into ordered pairs.
///
/// Quoted values keep embedded commas and lose their quotes. Items without an
/// `=` (for example the duration in `#EXTINF:10.0,`) are skipped.
pub fn split_attribute_list(list: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = list.trim();

    while !rest.is_empty() {
        let item_end = next_item_end(rest);
        let item = &rest[..item_end];

        if let Some((key, value)) = item.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .map(|v| v.strip_suffix('"').unwrap_or(v))
                .unwrap_or(value);
            if !key.is_empty() {
                pairs.push((key.to_string(), value.to_string()));
            }
        }

        rest = rest[item_end..].strip_prefix(',').unwrap_or("").trim_start();
    }

    pairs
}

/// Byte index of the comma ending the current item, ignoring commas in quotes.
fn next_item_end(s: &str) -> usize {
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => return i,
            _ => {}
        }
    }
    s.len()
}

/// Resolves a playlist URI against the playlist it was found in.
///
/// Follows RFC 3986 reference resolution, so protocol-relative and `../`
/// references work and relative paths drop the base query string.
pub fn resolve_url(base: &str, maybe_relative: &str) -> String {
    match Url::parse(base).and_then(|base| base.join(maybe_relative)) {
        Ok(url) => url.to_string(),
        Err(_) => maybe_relative.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn splits_quoted_and_bare_values() {
        assert_eq!(
            split_attribute_list(r#"TYPE=AUDIO,GROUP-ID="aac,64",DEFAULT=YES"#),
            owned(&[("TYPE", "AUDIO"), ("GROUP-ID", "aac,64"), ("DEFAULT", "YES")])
        );
    }

    #[test]
    fn skips_items_without_key() {
        assert!(split_attribute_list("10.000,").is_empty());
        assert_eq!(split_attribute_list("=x,URI=\"a\""), owned(&[("URI", "a")]));
    }

    #[test]
    fn resolves_relative_uris() {
        let base = "https://delivery.domand.nicovideo.jp/hlsbid/abc/playlists/variants/master.m3u8?session=1";
        assert_eq!(
            resolve_url(base, "audio/aac.m3u8"),
            "https://delivery.domand.nicovideo.jp/hlsbid/abc/playlists/variants/audio/aac.m3u8"
        );
        assert_eq!(
            resolve_url(base, "/root/aac.m3u8"),
            "https://delivery.domand.nicovideo.jp/root/aac.m3u8"
        );
        assert_eq!(resolve_url(base, "https://x/a.m3u8"), "https://x/a.m3u8");
    }

    #[test]
    fn resolves_protocol_relative_and_parent_references() {
        let base = "https://cdn.example/a/b/master.m3u8?token=1";
        assert_eq!(
            resolve_url(base, "//other.example/audio.m3u8"),
            "https://other.example/audio.m3u8"
        );
        assert_eq!(resolve_url(base, "../audio.m3u8"), "https://cdn.example/a/audio.m3u8");
        assert_eq!(resolve_url("not a url", "audio.m3u8"), "audio.m3u8");
    }
}
