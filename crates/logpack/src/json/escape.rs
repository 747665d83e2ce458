//! JSON string escaping.
//!
//! Byte-oriented: quote, backslash and control bytes are escaped, every other
//! byte (including multi-byte UTF-8 sequences) is copied through unchanged.

const HEX: &[u8; 16] = b"0123456789abcdef";

fn escape_for(byte: u8) -> Option<&'static str> {
    Some(match byte {
        b'"' => "\\\"",
        b'\\' => "\\\\",
        0x08 => "\\b",
        0x0c => "\\f",
        b'\n' => "\\n",
        b'\r' => "\\r",
        b'\t' => "\\t",
        _ => return None,
    })
}

/// Appends the escaped form of `s` to `out`, without surrounding quotes.
pub fn escape_into(out: &mut String, s: &str) {
    let bytes = s.as_bytes();
    let mut last = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b >= 0x20 && b != b'"' && b != b'\\' {
            continue;
        }
        // Escaped bytes are ASCII, so `i` is always a char boundary.
        out.push_str(&s[last..i]);
        match escape_for(b) {
            Some(seq) => out.push_str(seq),
            None => {
                out.push_str("\\u00");
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0f) as usize] as char);
            }
        }
        last = i + 1;
    }
    out.push_str(&s[last..]);
}

/// Returns `s` escaped for use inside a JSON string literal.
///
/// ```
/// use logpack::json::escape;
///
/// assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
/// assert_eq!(escape("a\u{1}b"), "a\\u0001b");
/// ```
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}
