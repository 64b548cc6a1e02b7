//! Attribute value types.
//!
//! Every spec (fixed, property reference or deferred computation) resolves to an
//! [`AttrValue`]. Keys and values are coerced to strings with
//! [`AttrValue::to_attr_string`]; guards are coerced with [`AttrValue::is_truthy`].

use std::fmt;

/// Runtime representation of a resolved spec.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Absence of a value. Renders as an empty string and is falsy.
    Null,

    Bool(bool),

    Int(i64),

    Float(f64),

    Str(String),

    /// Arrays and objects, rendered as compact JSON (Stimulus parses these back).
    Json(serde_json::Value),
}

impl AttrValue {
    /// Truthiness used when a value gates a rule.
    ///
    /// - Null: false
    /// - Bool: the boolean itself
    /// - everything else (including `""` and `0`): true
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Null => false,
            AttrValue::Bool(v) => *v,
            _ => true,
        }
    }

    /// String coercion used for attribute keys and values.
    pub fn to_attr_string(&self) -> String {
        match self {
            AttrValue::Null => String::new(),
            AttrValue::Bool(v) => v.to_string(),
            AttrValue::Int(v) => v.to_string(),
            AttrValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(|n| n.to_string())
                .unwrap_or_else(|| v.to_string()),
            AttrValue::Str(s) => s.clone(),
            AttrValue::Json(v) => v.to_string(),
        }
    }

    /// A value is blank when its string form is empty or whitespace only.
    ///
    /// Blank contributions are dropped when rules merge into the same key.
    pub fn is_blank(&self) -> bool {
        match self {
            AttrValue::Null => true,
            AttrValue::Str(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attr_string())
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Str(value.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(value: $t) -> Self {
                    AttrValue::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_uint {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                /// Values beyond `i64::MAX` keep their exact digits as a string.
                fn from(value: $t) -> Self {
                    i64::try_from(value)
                        .map(AttrValue::Int)
                        .unwrap_or_else(|_| AttrValue::Str(value.to_string()))
                }
            }
        )*
    };
}

impl_from_wide_uint!(u64, usize);

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Float(value as f64)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttrValue::Null)
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => AttrValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => AttrValue::Str(s),
            other @ (Value::Array(_) | Value::Object(_)) => AttrValue::Json(other),
        }
    }
}
