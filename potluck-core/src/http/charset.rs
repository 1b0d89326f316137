//! Charset detection and transcoding for fetched pages.
//!
//! Older recipe blogs still serve windows-1252 or iso-8859-1, which would
//! otherwise reach the model as replacement characters.

use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::bytes::Regex;

/// How far into the document to look for a `<meta>` charset declaration.
const META_SCAN_BYTES: usize = 1024;

/// `<meta charset="...">` and `<meta http-equiv=... content="...; charset=...">`.
static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9._:\-]+)"#)
        .expect("Invalid meta charset regex")
});

/// Decode a response body to UTF-8.
///
/// Detection priority:
/// 1. `charset=` parameter of the Content-Type header
/// 2. `<meta>` charset declaration near the top of the document
/// 3. UTF-8, lossily if the bytes are not valid UTF-8
pub fn decode_bytes_to_utf8(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_html_meta(bytes));

    if let Some(encoding) = declared.filter(|e| *e != encoding_rs::UTF_8) {
        let (decoded, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::debug!(encoding = encoding.name(), "malformed bytes while decoding");
        }
        return decoded.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(e) => {
            tracing::debug!("falling back to lossy UTF-8 conversion: {}", e);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// e.g. "text/html; charset=iso-8859-1" -> windows-1252 (per the WHATWG mapping)
fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches(|c| c == '"' || c == '\'');
        if label.is_empty() {
            return None;
        }
        Encoding::for_label(label.as_bytes())
    })
}

fn charset_from_html_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SCAN_BYTES)];
    let label = META_CHARSET_REGEX.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}
