//! Byte decoding helpers for page templates.

use std::borrow::Cow;

/// Decode page bytes to a string.
///
/// Tries UTF-8 first (BOM aware), then the hinted encoding, then
/// Windows-1252, which covers most legacy Latin-1 pages.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the charset from a `<meta charset="...">` declaration.
///
/// Only the first 1024 bytes are checked, matching where browsers look for
/// the encoding prescan.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let charset_pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let after = &prefix[charset_pos + 8..];

    let (start, terminators): (usize, &[u8]) = match after.first()? {
        b'"' => (1, b"\""),
        b'\'' => (1, b"'"),
        _ => (0, b"\"'; >/"),
    };
    let value = &after[start..];
    let end = value
        .iter()
        .position(|b| terminators.contains(b))
        .unwrap_or(value.len());

    std::str::from_utf8(&value[..end])
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("héllo".as_bytes(), None), "héllo");
    }

    #[test]
    fn test_decode_falls_back_to_hint() {
        let bytes = b"\xe9t\xe9";
        assert_eq!(decode_text(bytes, Some("iso-8859-1")), "été");
    }

    #[test]
    fn test_extract_meta_charset() {
        assert_eq!(
            extract_meta_charset(br#"<html><head><meta charset="windows-1252">"#),
            Some("windows-1252")
        );
        assert_eq!(
            extract_meta_charset(
                br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#
            ),
            Some("ISO-8859-1")
        );
        assert_eq!(extract_meta_charset(b"<html><body></body></html>"), None);
    }
}
