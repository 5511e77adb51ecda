// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converted setting values and their runtime types.
//!
//! Raw settings are strings. Converting them produces a [`Value`], tagged with a [`ValueType`]
//! that the cache uses for its consistency check. The [`Setting`] trait maps Rust types onto
//! these runtime types so callers can ask for `i32`, `Vec<Url>` or `Color` directly.

use crate::domain::color::Color;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::type_registry::TypeDescriptor;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// The scalar conversions the engine supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Unmodified string
    String,
    /// `true`/`false` (also `yes`/`no`, `on`/`off`, `1`/`0`)
    Bool,
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// Single-precision float
    F32,
    /// Double-precision float
    F64,
    /// Exactly one character
    Char,
    /// Date and time with offset (RFC 3339, or a naive date/time taken as UTC)
    DateTime,
    /// Absolute URL
    Url,
    /// File system path
    Path,
    /// Compiled regular expression
    Regex,
    /// RGB color
    Color,
    /// Reference to a registered type, by name
    Type,
}

impl ScalarType {
    /// All scalar types, in declaration order.
    pub const ALL: [ScalarType; 15] = [
        ScalarType::String,
        ScalarType::Bool,
        ScalarType::I8,
        ScalarType::I16,
        ScalarType::I32,
        ScalarType::I64,
        ScalarType::F32,
        ScalarType::F64,
        ScalarType::Char,
        ScalarType::DateTime,
        ScalarType::Url,
        ScalarType::Path,
        ScalarType::Regex,
        ScalarType::Color,
        ScalarType::Type,
    ];

    /// The canonical name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Char => "char",
            ScalarType::DateTime => "datetime",
            ScalarType::Url => "url",
            ScalarType::Path => "path",
            ScalarType::Regex => "regex",
            ScalarType::Color => "color",
            ScalarType::Type => "type",
        }
    }

    /// Looks up a type by its canonical name or a common alias (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let scalar = match name.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => ScalarType::String,
            "bool" | "boolean" => ScalarType::Bool,
            "i8" | "byte" => ScalarType::I8,
            "i16" | "short" => ScalarType::I16,
            "i32" | "int" | "integer" => ScalarType::I32,
            "i64" | "long" => ScalarType::I64,
            "f32" | "float" => ScalarType::F32,
            "f64" | "double" => ScalarType::F64,
            "char" | "character" => ScalarType::Char,
            "datetime" | "date" => ScalarType::DateTime,
            "url" | "uri" => ScalarType::Url,
            "path" | "file" => ScalarType::Path,
            "regex" | "pattern" => ScalarType::Regex,
            "color" | "colour" => ScalarType::Color,
            "type" | "class" => ScalarType::Type,
            _ => return None,
        };
        Some(scalar)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A conversion target: a scalar or an array of scalars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A single value
    Scalar(ScalarType),
    /// Any number of values of the same scalar type
    Array(ScalarType),
}

impl ValueType {
    /// The element type.
    pub fn scalar(&self) -> ScalarType {
        match self {
            ValueType::Scalar(t) | ValueType::Array(t) => *t,
        }
    }

    /// Returns `true` for array targets.
    pub fn is_array(&self) -> bool {
        matches!(self, ValueType::Array(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Scalar(t) => write!(f, "{}", t),
            ValueType::Array(t) => write!(f, "{}[]", t),
        }
    }
}

/// A converted setting value.
#[derive(Debug, Clone)]
pub enum Value {
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// 8-bit integer
    I8(i8),
    /// 16-bit integer
    I16(i16),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// Single-precision float
    F32(f32),
    /// Double-precision float
    F64(f64),
    /// Single character
    Char(char),
    /// Date and time
    DateTime(DateTime<FixedOffset>),
    /// URL
    Url(Url),
    /// File path
    Path(PathBuf),
    /// Compiled regular expression
    Regex(Regex),
    /// Color
    Color(Color),
    /// Registered type
    Type(Arc<TypeDescriptor>),
    /// Homogeneous array with its element type
    Array(ScalarType, Vec<Value>),
}

impl Value {
    /// The runtime type of this value.
    pub fn value_type(&self) -> ValueType {
        let scalar = match self {
            Value::String(_) => ScalarType::String,
            Value::Bool(_) => ScalarType::Bool,
            Value::I8(_) => ScalarType::I8,
            Value::I16(_) => ScalarType::I16,
            Value::I32(_) => ScalarType::I32,
            Value::I64(_) => ScalarType::I64,
            Value::F32(_) => ScalarType::F32,
            Value::F64(_) => ScalarType::F64,
            Value::Char(_) => ScalarType::Char,
            Value::DateTime(_) => ScalarType::DateTime,
            Value::Url(_) => ScalarType::Url,
            Value::Path(_) => ScalarType::Path,
            Value::Regex(_) => ScalarType::Regex,
            Value::Color(_) => ScalarType::Color,
            Value::Type(_) => ScalarType::Type,
            Value::Array(element, _) => return ValueType::Array(*element),
        };
        ValueType::Scalar(scalar)
    }

    /// Extracts a typed value.
    pub fn into_setting<T: Setting>(self) -> Result<T> {
        T::from_value(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Url(a), Value::Url(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a.as_str() == b.as_str(),
            (Value::Color(a), Value::Color(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a.name() == b.name(),
            (Value::Array(ta, a), Value::Array(tb, b)) => ta == tb && a == b,
            _ => false,
        }
    }
}

/// Rust types that settings can be converted into.
///
/// Implemented for every supported scalar and for `Vec<T>` of those scalars.
pub trait Setting: Sized {
    /// The conversion target for this type.
    fn value_type() -> ValueType;

    /// Extracts `Self` from a converted value.
    fn from_value(value: Value) -> Result<Self>;

    /// Wraps `self` as a value.
    fn into_value(self) -> Value;
}

/// Scalar settings, usable as array elements.
pub trait ScalarSetting: Setting {
    /// The scalar conversion for this type.
    const SCALAR: ScalarType;
}

fn mismatch<T: Setting>(found: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        expected: T::value_type().to_string(),
        found: found.value_type().to_string(),
    }
}

macro_rules! scalar_setting {
    ($ty:ty, $variant:ident) => {
        impl Setting for $ty {
            fn value_type() -> ValueType {
                ValueType::Scalar(ScalarType::$variant)
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl ScalarSetting for $ty {
            const SCALAR: ScalarType = ScalarType::$variant;
        }
    };
}

scalar_setting!(String, String);
scalar_setting!(bool, Bool);
scalar_setting!(i8, I8);
scalar_setting!(i16, I16);
scalar_setting!(i32, I32);
scalar_setting!(i64, I64);
scalar_setting!(f32, F32);
scalar_setting!(f64, F64);
scalar_setting!(char, Char);
scalar_setting!(DateTime<FixedOffset>, DateTime);
scalar_setting!(Url, Url);
scalar_setting!(PathBuf, Path);
scalar_setting!(Regex, Regex);
scalar_setting!(Color, Color);
scalar_setting!(Arc<TypeDescriptor>, Type);

impl<T: ScalarSetting> Setting for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::Array(T::SCALAR)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(element, items) if element == T::SCALAR => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Array(T::SCALAR, self.into_iter().map(T::into_value).collect())
    }
}
