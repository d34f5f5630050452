//! Small string transforms shared by the extractor and the aggregator:
//! collection-name normalization, HTML entity decoding for API-escaped
//! URLs, and the URL extension checks the classification rules rely on.

/// Split a free-text query into collection names.
///
/// Tokens are comma-separated, trimmed, and may carry a leading `r/`
/// marker which is stripped case-insensitively. Empty tokens are dropped.
/// Order and duplicates are preserved so callers can reason about the last
/// token the user typed.
pub fn normalize_collections(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|tok| strip_marker(tok.trim()).to_string())
        .filter(|tok| !tok.is_empty())
        .collect()
}

fn strip_marker(tok: &str) -> &str {
    match tok.as_bytes() {
        [b'r' | b'R', b'/', ..] => &tok[2..],
        _ => tok,
    }
}

/// Decode the HTML entities the content API escapes in URL fields.
/// With `raw_json=1` the API only produces these three forms.
pub fn decode_html_entities(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Rewrite a legacy `.gifv` suffix to the equivalent direct-video URL.
/// Must run before any extension classification.
pub fn gifv_to_mp4(url: &str) -> String {
    if ends_with_ignore_case(url, ".gifv") {
        format!("{}.mp4", &url[..url.len() - 5])
    } else {
        url.to_string()
    }
}

pub fn has_video_ext(url: &str) -> bool {
    ends_with_ignore_case(url, ".mp4") || ends_with_ignore_case(url, ".webm")
}

pub fn has_animated_image_ext(url: &str) -> bool {
    ends_with_ignore_case(url, ".gif")
}

pub fn has_static_image_ext(url: &str) -> bool {
    ends_with_ignore_case(url, ".jpg")
        || ends_with_ignore_case(url, ".jpeg")
        || ends_with_ignore_case(url, ".png")
        || ends_with_ignore_case(url, ".webp")
}

fn ends_with_ignore_case(url: &str, suffix: &str) -> bool {
    let (u, s) = (url.as_bytes(), suffix.as_bytes());
    u.len() >= s.len() && u[u.len() - s.len()..].eq_ignore_ascii_case(s)
}
