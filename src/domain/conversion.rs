// SPDX-License-Identifier: MIT OR Apache-2.0

//! String ↔ value conversion.
//!
//! Conversions are stateless per call. The only shared state is the
//! [type registry](crate::domain::type_registry) consulted for [`ScalarType::Type`] values.
//! Every function takes the settings key for error context, the way the rest of the crate
//! reports which entry a malformed value came from.
//!
//! Parsing is locale-independent. Surrounding whitespace is ignored for every type except
//! strings, characters, paths and regular expressions, where it is part of the value.

use crate::domain::color::Color;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::escape::Escaper;
use crate::domain::type_registry;
use crate::domain::value::{ScalarType, Value, ValueType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::path::PathBuf;
use url::Url;

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Converts one raw string to a scalar value.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::conversion::convert_scalar;
/// use hexsettings::domain::{ScalarType, Value};
///
/// let value = convert_scalar("server.port", " 8080 ", ScalarType::I32).unwrap();
/// assert_eq!(value, Value::I32(8080));
/// assert!(convert_scalar("server.port", "http", ScalarType::I32).is_err());
/// ```
pub fn convert_scalar(key: &str, raw: &str, target: ScalarType) -> Result<Value> {
    let trimmed = raw.trim();
    let name = target.name();

    let value = match target {
        ScalarType::String => Value::String(raw.to_string()),
        ScalarType::Bool => Value::Bool(parse_bool(key, trimmed)?),
        ScalarType::I8 => Value::I8(
            trimmed
                .parse()
                .map_err(|e| ConfigError::from_parse_int_error(key, raw, name, e))?,
        ),
        ScalarType::I16 => Value::I16(
            trimmed
                .parse()
                .map_err(|e| ConfigError::from_parse_int_error(key, raw, name, e))?,
        ),
        ScalarType::I32 => Value::I32(
            trimmed
                .parse()
                .map_err(|e| ConfigError::from_parse_int_error(key, raw, name, e))?,
        ),
        ScalarType::I64 => Value::I64(
            trimmed
                .parse()
                .map_err(|e| ConfigError::from_parse_int_error(key, raw, name, e))?,
        ),
        ScalarType::F32 => Value::F32(
            trimmed
                .parse()
                .map_err(|e| ConfigError::from_parse_float_error(key, raw, name, e))?,
        ),
        ScalarType::F64 => Value::F64(
            trimmed
                .parse()
                .map_err(|e| ConfigError::from_parse_float_error(key, raw, name, e))?,
        ),
        ScalarType::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Value::Char(c),
                _ => {
                    return Err(ConfigError::conversion_msg(
                        key,
                        raw,
                        name,
                        "expected exactly one character",
                    ))
                }
            }
        }
        ScalarType::DateTime => Value::DateTime(parse_date_time(key, trimmed)?),
        ScalarType::Url => Value::Url(
            Url::parse(trimmed).map_err(|e| ConfigError::conversion(key, raw, name, e))?,
        ),
        ScalarType::Path => {
            if raw.is_empty() {
                return Err(ConfigError::conversion_msg(key, raw, name, "empty path"));
            }
            Value::Path(PathBuf::from(raw))
        }
        ScalarType::Regex => Value::Regex(
            Regex::new(raw).map_err(|e| ConfigError::conversion(key, raw, name, e))?,
        ),
        ScalarType::Color => Value::Color(
            trimmed
                .parse::<Color>()
                .map_err(|e| ConfigError::conversion(key, raw, name, e))?,
        ),
        ScalarType::Type => Value::Type(
            type_registry::resolve(trimmed)
                .ok_or_else(|| ConfigError::conversion_msg(key, raw, name, "unknown type name"))?,
        ),
    };
    Ok(value)
}

/// Converts every element of a raw array.
pub fn convert_array<S: AsRef<str>>(key: &str, raw: &[S], element: ScalarType) -> Result<Value> {
    let items = raw
        .iter()
        .map(|r| convert_scalar(key, r.as_ref(), element))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Array(element, items))
}

/// Converts a raw entry to the requested type.
///
/// A scalar target requires exactly one raw element: an empty entry is
/// [`ConfigError::NoValue`], more than one is [`ConfigError::TooManyValues`].
pub fn convert<S: AsRef<str>>(key: &str, raw: &[S], target: ValueType) -> Result<Value> {
    match target {
        ValueType::Array(element) => convert_array(key, raw, element),
        ValueType::Scalar(scalar) => match raw {
            [] => Err(ConfigError::NoValue {
                keys: vec![key.to_string()],
            }),
            [single] => convert_scalar(key, single.as_ref(), scalar),
            many => Err(ConfigError::TooManyValues {
                key: key.to_string(),
                count: many.len(),
            }),
        },
    }
}

/// Converts a raw entry to a type given by name, e.g. `"i64"` or `"color[]"`.
///
/// Names that do not resolve, or resolve to a registered type without an associated conversion,
/// fail with [`ConfigError::UnsupportedType`].
pub fn convert_named<S: AsRef<str>>(key: &str, raw: &[S], type_name: &str) -> Result<Value> {
    let target = type_registry::resolve(type_name)
        .and_then(|descriptor| descriptor.value_type())
        .ok_or_else(|| ConfigError::UnsupportedType {
            type_name: type_name.to_string(),
        })?;
    convert(key, raw, target)
}

/// Serializes a value to its raw string form.
///
/// Arrays are joined with the default [`Escaper`]; use [`serialize_array`] to choose another.
pub fn serialize(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::I8(n) => n.to_string(),
        Value::I16(n) => n.to_string(),
        Value::I32(n) => n.to_string(),
        Value::I64(n) => n.to_string(),
        Value::F32(n) => n.to_string(),
        Value::F64(n) => n.to_string(),
        Value::Char(c) => c.to_string(),
        Value::DateTime(dt) => dt.to_rfc3339(),
        Value::Url(url) => url.as_str().to_string(),
        Value::Path(path) => path.to_string_lossy().into_owned(),
        Value::Regex(re) => re.as_str().to_string(),
        Value::Color(color) => color.to_string(),
        Value::Type(descriptor) => descriptor.name().to_string(),
        Value::Array(..) => serialize_array(value, &Escaper::default()),
    }
}

/// Serializes a value to a single escaped line.
///
/// Array elements are escaped and joined with the escaper's separator; a scalar is escaped as a
/// one-element array so it always splits back to exactly one element.
pub fn serialize_array(value: &Value, escaper: &Escaper) -> String {
    match value {
        Value::Array(_, items) => escaper.join(items.iter().map(serialize)),
        scalar => escaper.escape(&serialize(scalar)),
    }
}

/// Serializes a value to the raw elements stored under a key.
pub fn to_raw(value: &Value) -> Vec<String> {
    match value {
        Value::Array(_, items) => items.iter().map(serialize).collect(),
        scalar => vec![serialize(scalar)],
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => raw
            .parse::<bool>()
            .map_err(|e| ConfigError::conversion(key, raw, ScalarType::Bool.name(), e)),
    }
}

fn parse_date_time(key: &str, raw: &str) -> Result<DateTime<chrono::FixedOffset>> {
    let rfc_error = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => return Ok(dt),
        Err(e) => e,
    };

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc().fixed_offset());
    }

    Err(ConfigError::conversion(
        key,
        raw,
        ScalarType::DateTime.name(),
        rfc_error,
    ))
}
