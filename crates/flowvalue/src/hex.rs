use std::fmt::Write;

/// Renders bytes as uppercase hex, two digits per byte.
pub fn to_hex_string(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Renders a number as uppercase hex, zero-padded to `width` digits.
pub fn int_to_hex_string(number: i64, width: usize) -> String {
    format!("{:0width$X}", number, width = width)
}
