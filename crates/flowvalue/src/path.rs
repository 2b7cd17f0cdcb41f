//! Accessor paths into [`Value`] trees.
//!
//! Parses frontend property strings such as `payload.items[2].name` and
//! applies them to a tree for lookup, assignment or deletion. Bare names
//! address struct keys; bracketed segments always address array indices,
//! never map keys, regardless of the data they meet.

use std::collections::BTreeMap;

use crate::value::Value;

/// One parsed step: a bare field name or a bracketed array index.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    text: String,
    bracketed: bool,
}

impl Step {
    /// Array index of a bracketed step: the leading decimal digits of the
    /// segment text, 0 when there are none.
    fn index(&self) -> usize {
        let digits: String = self
            .text
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(0)
    }
}

/// A parsed accessor path, applied against a value tree for read, write
/// or delete.
///
/// Lookup failures are data, not errors: [`find`](PropertyPath::find)
/// returns `None` and [`erase`](PropertyPath::erase) returns `false` when
/// any step misses; neither leaves partial changes behind.
/// [`set`](PropertyPath::set) instead creates missing intermediate
/// containers, shaped by the following step (struct for a bare name,
/// array for a bracketed index).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPath {
    steps: Vec<Step>,
}

impl PropertyPath {
    /// Scans the accessor string into steps. Parsing never fails: empty
    /// name segments (leading or doubled dots) are dropped, while a
    /// bracket segment always commits a step, even when empty.
    pub fn parse(property: &str) -> Self {
        let mut steps = Vec::new();
        let mut current = String::new();
        let mut in_brackets = false;
        for c in property.chars() {
            if c == '[' {
                if !current.is_empty() {
                    steps.push(Step {
                        text: std::mem::take(&mut current),
                        bracketed: false,
                    });
                }
                in_brackets = true;
            } else if c == ']' {
                in_brackets = false;
                steps.push(Step {
                    text: std::mem::take(&mut current),
                    bracketed: true,
                });
            } else if in_brackets {
                current.push(c);
            } else if c == '.' {
                if !current.is_empty() {
                    steps.push(Step {
                        text: std::mem::take(&mut current),
                        bracketed: false,
                    });
                }
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            steps.push(Step {
                text: current,
                bracketed: false,
            });
        }
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Read-only lookup. Fails to `None` on the first missing key,
    /// out-of-range index or non-container in the way; an empty path
    /// yields the root itself.
    pub fn find<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for step in &self.steps {
            current = step_into(current, step)?;
        }
        Some(current)
    }

    /// Mutable variant of [`find`](PropertyPath::find); no vivification.
    pub fn find_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = root;
        for step in &self.steps {
            current = step_into_mut(current, step)?;
        }
        Some(current)
    }

    /// Stores `value` at the path, creating missing intermediate
    /// containers on the way down. Arrays grow exactly to the requested
    /// index, padding any gap with void elements; a non-container found
    /// mid-path is replaced by the container shape the descent needs. An
    /// empty path stores nothing.
    pub fn set(&self, root: &mut Value, value: Value) {
        let (last, intermediate) = match self.steps.split_last() {
            Some(parts) => parts,
            None => return,
        };
        let mut current = root;
        for (i, step) in intermediate.iter().enumerate() {
            let next = intermediate.get(i + 1).unwrap_or(last);
            current = descend_vivify(current, step, next.bracketed);
        }
        if last.bracketed {
            let index = last.index();
            let items = force_array(current);
            if index >= items.len() {
                items.resize(index, Value::Void);
                items.push(value);
            } else {
                items[index] = value;
            }
        } else {
            force_struct(current).insert(last.text.clone(), value);
        }
    }

    /// Deletes the addressed element: removes the key from a struct or
    /// removes the element from an array, shifting the rest down. Returns
    /// `false` without touching the tree when any step misses. An empty
    /// path erases nothing and reports success.
    pub fn erase(&self, root: &mut Value) -> bool {
        let (last, intermediate) = match self.steps.split_last() {
            Some(parts) => parts,
            None => return true,
        };
        let mut current = root;
        for step in intermediate {
            match step_into_mut(current, step) {
                Some(next) => current = next,
                None => return false,
            }
        }
        match current {
            Value::Array(items) if last.bracketed => {
                let index = last.index();
                if index >= items.len() {
                    return false;
                }
                items.remove(index);
                true
            }
            Value::Struct(map) if !last.bracketed => map.remove(&last.text).is_some(),
            _ => false,
        }
    }
}

impl From<&str> for PropertyPath {
    fn from(property: &str) -> Self {
        Self::parse(property)
    }
}

fn step_into<'a>(value: &'a Value, step: &Step) -> Option<&'a Value> {
    if step.bracketed {
        match value {
            Value::Array(items) => items.get(step.index()),
            _ => None,
        }
    } else {
        match value {
            Value::Struct(map) => map.get(&step.text),
            _ => None,
        }
    }
}

fn step_into_mut<'a>(value: &'a mut Value, step: &Step) -> Option<&'a mut Value> {
    if step.bracketed {
        match value {
            Value::Array(items) => items.get_mut(step.index()),
            _ => None,
        }
    } else {
        match value {
            Value::Struct(map) => map.get_mut(&step.text),
            _ => None,
        }
    }
}

/// One vivifying descent: forces `current` into the container shape this
/// step addresses, then returns the child, creating it when missing. A
/// freshly created child takes the shape the next step needs.
fn descend_vivify<'a>(current: &'a mut Value, step: &Step, next_bracketed: bool) -> &'a mut Value {
    let child_shape = if next_bracketed {
        Value::Array(Vec::new())
    } else {
        Value::Struct(BTreeMap::new())
    };
    if step.bracketed {
        let index = step.index();
        let items = force_array(current);
        if index >= items.len() {
            items.resize(index, Value::Void);
            items.push(child_shape);
        }
        &mut items[index]
    } else {
        force_struct(current)
            .entry(step.text.clone())
            .or_insert(child_shape)
    }
}

fn force_array(value: &mut Value) -> &mut Vec<Value> {
    if !matches!(value, Value::Array(_)) {
        *value = Value::Array(Vec::new());
    }
    match value {
        Value::Array(items) => items,
        // just replaced above
        _ => unreachable!(),
    }
}

fn force_struct(value: &mut Value) -> &mut BTreeMap<String, Value> {
    if !matches!(value, Value::Struct(_)) {
        *value = Value::Struct(BTreeMap::new());
    }
    match value {
        Value::Struct(map) => map,
        // just replaced above
        _ => unreachable!(),
    }
}
