//! Stateless JSON encoder for [`Value`] trees.
//!
//! A pure function of the input tree: no shared state, safe to call
//! concurrently on distinct trees, and value-equal trees always encode to
//! byte-identical output (struct keys iterate in sorted order). Encoding
//! never fails for any tree. Two sinks are offered, text and bytes, fed by
//! the same recursive core.
//!
//! Type-specific rules: binary data becomes a JSON string of uppercase
//! hex; non-finite floats become `null` (JSON has no representation for
//! them); finite floats always carry a decimal point or exponent so they
//! stay distinguishable from integers.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use crate::hex;
use crate::value::Value;

/// Encodes a value tree as a JSON string.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    let _ = encode_value(value, &mut out);
    out
}

/// Encodes a value tree as a JSON byte buffer. Produces exactly the bytes
/// of [`to_string`].
pub fn to_vec(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    let _ = encode_value(value, &mut ByteSink(&mut out));
    out
}

/// Applies JSON string escaping to `text` without adding surrounding
/// quotes: `"`, `\`, the named control escapes, and `\u00XX` for the
/// remaining control characters. Non-ASCII text passes through as UTF-8.
pub fn encode_string(text: &str) -> String {
    let mut out = String::new();
    let _ = write_escaped(text, &mut out);
    out
}

/// Byte-buffer sink; the encoder only ever emits UTF-8 text.
struct ByteSink<'a>(&'a mut Vec<u8>);

impl Write for ByteSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

fn encode_value<W: Write>(value: &Value, out: &mut W) -> fmt::Result {
    match value {
        Value::Void => out.write_str("null"),
        Value::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => write!(out, "{}", n),
        Value::Integer64(n) => write!(out, "{}", n),
        Value::Float(n) => encode_float(*n, out),
        Value::String(s) => write_quoted(s, out),
        Value::Binary(bytes) => {
            // Hex needs no escaping, the quotes are enough
            out.write_char('"')?;
            out.write_str(&hex::to_hex_string(bytes))?;
            out.write_char('"')
        }
        Value::Array(items) => encode_array(items, out),
        Value::Struct(map) => encode_struct(map, out),
    }
}

fn encode_array<W: Write>(items: &[Value], out: &mut W) -> fmt::Result {
    out.write_char('[')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        encode_value(item, out)?;
    }
    out.write_char(']')
}

fn encode_struct<W: Write>(map: &BTreeMap<String, Value>, out: &mut W) -> fmt::Result {
    out.write_char('{')?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write_quoted(key, out)?;
        out.write_char(':')?;
        encode_value(value, out)?;
    }
    out.write_char('}')
}

fn encode_float<W: Write>(number: f64, out: &mut W) -> fmt::Result {
    if !number.is_finite() {
        return out.write_str("null");
    }
    // Shortest round-trippable form; force a decimal point when the
    // formatter produced a bare integer
    let mut repr = number.to_string();
    if !repr.contains('.') && !repr.contains('e') && !repr.contains('E') {
        repr.push_str(".0");
    }
    out.write_str(&repr)
}

fn write_quoted<W: Write>(text: &str, out: &mut W) -> fmt::Result {
    out.write_char('"')?;
    write_escaped(text, out)?;
    out.write_char('"')
}

fn write_escaped<W: Write>(text: &str, out: &mut W) -> fmt::Result {
    for c in text.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\u{0008}' => out.write_str("\\b")?,
            '\u{000C}' => out.write_str("\\f")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}
