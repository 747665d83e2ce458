use std::fmt::Write as _;

/// Renders bytes as uppercase two-digit hex separated by single spaces.
///
/// ```
/// assert_eq!(logpack::hexify(&[0x0a, 0xff, 0x00]), "0A FF 00");
/// assert_eq!(logpack::hexify(&[]), "");
/// ```
pub fn hexify(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02X}");
    }
    out
}
