use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ValueError;
use crate::hex;

/// The nine variants a [`Value`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Void,
    Bool,
    Integer,
    Integer64,
    Float,
    String,
    Binary,
    Array,
    Struct,
}

impl ValueKind {
    /// Short lowercase label for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Void => "void",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "int",
            ValueKind::Integer64 => "int64",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Binary => "binary",
            ValueKind::Array => "array",
            ValueKind::Struct => "struct",
        }
    }

    /// Parses one of the labels accepted by typed construction:
    /// `bool`, `int`, `float`, `string`, `array` or `struct`.
    pub fn from_label(label: &str) -> Result<ValueKind, ValueError> {
        match label {
            "bool" => Ok(ValueKind::Bool),
            "int" => Ok(ValueKind::Integer),
            "float" => Ok(ValueKind::Float),
            "string" => Ok(ValueKind::String),
            "array" => Ok(ValueKind::Array),
            "struct" => Ok(ValueKind::Struct),
            _ => Err(ValueError::InvalidTypeLabel(label.to_string())),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dynamic value passed between nodes and the hosting flow engine.
///
/// A tagged union over the JSON-compatible types plus 32/64-bit integers
/// and raw binary data. Struct keys are kept in a `BTreeMap`, so iteration
/// order is sorted, not insertion order; lookups are exact-match.
///
/// Values have plain value semantics: `Clone` is a deep copy and mutation
/// goes through `&mut`. Equality is variant-strict, so
/// `Value::Integer(3) != Value::Float(3.0)`; use [`Value::try_cmp`] for
/// checked numeric comparison across integer widths and floats.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Void,
    Bool(bool),
    Integer(i32),
    Integer64(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Struct(BTreeMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Void
    }
}

impl Value {
    /// Returns the kind of the active variant.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Void => ValueKind::Void,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Integer64(_) => ValueKind::Integer64,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Binary(_) => ValueKind::Binary,
            Value::Array(_) => ValueKind::Array,
            Value::Struct(_) => ValueKind::Struct,
        }
    }

    /// Creates the default value of the given kind (empty containers,
    /// zero numbers, empty string, false).
    pub fn of_kind(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Void => Value::Void,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Integer => Value::Integer(0),
            ValueKind::Integer64 => Value::Integer64(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::String => Value::String(String::new()),
            ValueKind::Binary => Value::Binary(Vec::new()),
            ValueKind::Array => Value::Array(Vec::new()),
            ValueKind::Struct => Value::Struct(BTreeMap::new()),
        }
    }

    /// Typed construction from a type label and a value string.
    ///
    /// `label` must be one of `bool`, `int`, `float`, `string`, `array` or
    /// `struct`. `bool` accepts `true` or `1` as true and anything else as
    /// false. `int` narrows to `Integer` when the parsed number fits 32
    /// bits. `string` takes the text verbatim. `array` and `struct` parse
    /// the text as JSON and fail when the result is not the requested
    /// container.
    pub fn from_label(label: &str, text: &str) -> Result<Value, ValueError> {
        let kind = ValueKind::from_label(label)?;
        match kind {
            ValueKind::Bool => Ok(Value::Bool(text == "true" || text == "1")),
            ValueKind::Integer => {
                let number: i64 =
                    text.trim().parse().map_err(|_| ValueError::InvalidLiteral {
                        kind,
                        text: text.to_string(),
                    })?;
                Ok(Value::from_widest(number))
            }
            ValueKind::Float => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| ValueError::InvalidLiteral {
                    kind,
                    text: text.to_string(),
                }),
            ValueKind::String => Ok(Value::String(text.to_string())),
            ValueKind::Array | ValueKind::Struct => {
                let parsed: serde_json::Value = serde_json::from_str(text)?;
                let value = Value::from(parsed);
                if value.kind() == kind {
                    Ok(value)
                } else {
                    Err(ValueError::TypeMismatch {
                        expected: kind,
                        actual: value.kind(),
                    })
                }
            }
            // Not reachable through from_label, which only returns the six
            // labels above; kept exhaustive for the compiler.
            ValueKind::Void | ValueKind::Integer64 | ValueKind::Binary => {
                Err(ValueError::InvalidTypeLabel(label.to_string()))
            }
        }
    }

    /// Narrows an i64 to `Integer` when it fits, else `Integer64`.
    pub fn from_widest(number: i64) -> Value {
        i32::try_from(number)
            .map(Value::Integer)
            .unwrap_or(Value::Integer64(number))
    }

    /// Builds the conventional error struct carrying `faultCode` and
    /// `faultString`. Errors travel as values, never as panics; callers
    /// check [`Value::is_error`] after calls that may fail.
    pub fn error(fault_code: i32, fault_string: impl Into<String>) -> Value {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::Integer(fault_code));
        map.insert("faultString".to_string(), Value::String(fault_string.into()));
        Value::Struct(map)
    }

    /// True when this value is an error struct built by [`Value::error`].
    pub fn is_error(&self) -> bool {
        match self {
            Value::Struct(map) => {
                matches!(map.get("faultCode"), Some(Value::Integer(_)))
                    && matches!(map.get("faultString"), Some(Value::String(_)))
            }
            _ => false,
        }
    }

    /// Fault code of an error struct.
    pub fn fault_code(&self) -> Option<i32> {
        if let Value::Struct(map) = self {
            if let Some(Value::Integer(code)) = map.get("faultCode") {
                return Some(*code);
            }
        }
        None
    }

    /// Fault message of an error struct.
    pub fn fault_string(&self) -> Option<&str> {
        if let Value::Struct(map) = self {
            if let Some(Value::String(message)) = map.get("faultString") {
                return Some(message);
            }
        }
        None
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(i64::from(*n)),
            Value::Integer64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Struct(map) => Some(map),
            _ => None,
        }
    }

    /// Boolean-context coercion used by message routing: void is false,
    /// numbers are true when nonzero, strings, binaries and containers
    /// when nonempty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Void => false,
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Integer64(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Binary(bytes) => !bytes.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Struct(map) => !map.is_empty(),
        }
    }

    /// Checked comparison. Orders booleans, strings and numbers; numeric
    /// comparison promotes across integer widths and floats, so
    /// `Integer(3)` compares equal to `Float(3.0)` here even though `==`
    /// is variant-strict. Any other pairing is an
    /// [`ValueError::IncomparableVariants`] error, never a silent result.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering, ValueError> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Integer(a), Value::Integer64(b)) => Ok(i64::from(*a).cmp(b)),
            (Value::Integer64(a), Value::Integer(b)) => Ok(a.cmp(&i64::from(*b))),
            (Value::Integer64(a), Value::Integer64(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(a.total_cmp(b)),
            (Value::Integer(a), Value::Float(b)) => Ok(f64::from(*a).total_cmp(b)),
            (Value::Float(a), Value::Integer(b)) => Ok(a.total_cmp(&f64::from(*b))),
            (Value::Integer64(a), Value::Float(b)) => Ok((*a as f64).total_cmp(b)),
            (Value::Float(a), Value::Integer64(b)) => Ok(a.total_cmp(&(*b as f64))),
            (left, right) => Err(ValueError::IncomparableVariants {
                left: left.kind(),
                right: right.kind(),
            }),
        }
    }

    /// Multi-line, indented dump of the tree for log output.
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.print_into(&mut out, 0);
        out
    }

    fn print_into(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        match self {
            Value::Array(items) => {
                out.push_str(&format!("{}(array length={})\n{}{{\n", pad, items.len(), pad));
                for item in items {
                    item.print_into(out, indent + 1);
                }
                out.push_str(&format!("{}}}\n", pad));
            }
            Value::Struct(map) => {
                out.push_str(&format!("{}(struct length={})\n{}{{\n", pad, map.len(), pad));
                for (key, value) in map {
                    out.push_str(&format!("{}  [{}]\n", pad, key));
                    value.print_into(out, indent + 1);
                }
                out.push_str(&format!("{}}}\n", pad));
            }
            scalar => {
                out.push_str(&format!("{}({}) {}\n", pad, scalar.kind(), scalar));
            }
        }
    }
}

/// Renders scalars plainly, binary as uppercase hex and containers as
/// their kind name, the way the frontend shows condensed values. Void
/// renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => Ok(()),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Integer64(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Binary(bytes) => f.write_str(&hex::to_hex_string(bytes)),
            Value::Array(_) => f.write_str("array"),
            Value::Struct(_) => f.write_str("struct"),
        }
    }
}

/// Ordering exists only within the same variant (elementwise for
/// containers); cross-variant pairs have no order, matching the
/// variant-strict equality. Use [`Value::try_cmp`] when cross-width
/// numeric comparison is wanted.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Void, Value::Void) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Integer64(a), Value::Integer64(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Binary(a), Value::Binary(b)) => a.partial_cmp(b),
            (Value::Array(a), Value::Array(b)) => a.partial_cmp(b),
            (Value::Struct(a), Value::Struct(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Integer(i32::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer64(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer64(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer64(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Binary(bytes.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::Array(items.into_iter().map(Value::String).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Struct(map)
    }
}

/// JSON numbers decode as the narrowest integer type that fits, else
/// float; objects become structs, arrays stay arrays.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Void,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(number) => {
                if let Some(n) = number.as_i64() {
                    Value::from_widest(n)
                } else if let Some(n) = number.as_u64() {
                    // Larger than i64::MAX, representable only as float
                    Value::Float(n as f64)
                } else {
                    Value::Float(number.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Struct(
                map.into_iter().map(|(key, value)| (key, Value::from(value))).collect(),
            ),
        }
    }
}

/// Mirrors the wire codec: binary becomes an uppercase hex string and
/// non-finite floats become null.
impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Void => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(n) => serde_json::Value::from(*n),
            Value::Integer64(n) => serde_json::Value::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Binary(bytes) => serde_json::Value::String(hex::to_hex_string(bytes)),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Struct(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(json))
    }
}
