// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check that values survive storage in their raw form and that escaping and the
//! properties format are lossless for arbitrary input.

use chrono::{DateTime, FixedOffset};
use hexsettings::domain::conversion::{convert_array, serialize_array};
use hexsettings::domain::type_registry::{self, TypeDescriptor};
use hexsettings::domain::Escaper;
use hexsettings::prelude::*;
use proptest::prelude::*;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

fn store_and_read<T: Setting + Clone>(value: T) -> T {
    let store = ValueStore::new();
    store.put_value("key", value).unwrap();
    store.get_as(&["key"]).unwrap()
}

// Integers of every width survive serialization
proptest! {
    #[test]
    fn test_integer_round_trip(a in any::<i8>(), b in any::<i16>(), c in any::<i32>(), d in any::<i64>()) {
        prop_assert_eq!(store_and_read(a), a);
        prop_assert_eq!(store_and_read(b), b);
        prop_assert_eq!(store_and_read(c), c);
        prop_assert_eq!(store_and_read(d), d);
    }
}

proptest! {
    #[test]
    fn test_float_round_trip(x in -1.0e300f64..1.0e300f64, y in -1.0e30f32..1.0e30f32) {
        prop_assert_eq!(store_and_read(x), x);
        prop_assert_eq!(store_and_read(y), y);
    }
}

proptest! {
    #[test]
    fn test_text_round_trip(s in "\\PC*", c in any::<char>(), b in any::<bool>()) {
        prop_assert_eq!(store_and_read(s.clone()), s);
        prop_assert_eq!(store_and_read(c), c);
        prop_assert_eq!(store_and_read(b), b);
    }
}

proptest! {
    #[test]
    fn test_color_round_trip(rgb in 0u32..=0xFF_FFFF) {
        let color = Color::from_rgb(rgb);
        prop_assert_eq!(store_and_read(color), color);
    }
}

proptest! {
    #[test]
    fn test_date_time_round_trip(
        secs in 0i64..4_000_000_000,
        nanos in 0u32..1_000_000_000,
        offset_minutes in -720i32..=840
    ) {
        let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
        let dt: DateTime<FixedOffset> =
            DateTime::from_timestamp(secs, nanos).unwrap().with_timezone(&offset);
        let back = store_and_read(dt);
        prop_assert_eq!(back, dt);
        prop_assert_eq!(back.offset(), dt.offset());
    }
}

proptest! {
    #[test]
    fn test_url_round_trip(
        scheme in prop::sample::select(vec!["http", "https", "ftp"]),
        host in "[a-z]{1,10}\\.(com|org|net)",
        path in "(/[a-z0-9_-]{0,6}){0,3}",
        query in prop::option::of("[a-z]{1,4}=[a-z0-9]{0,4}")
    ) {
        let text = match query {
            Some(q) => format!("{scheme}://{host}{path}?{q}"),
            None => format!("{scheme}://{host}{path}"),
        };
        let url = Url::parse(&text).unwrap();
        prop_assert_eq!(store_and_read(url.clone()), url);
    }
}

// Paths and regexes keep surrounding whitespace
proptest! {
    #[test]
    fn test_path_and_regex_round_trip(path in "\\PC{1,20}", literal in "\\PC{0,12}") {
        let path = PathBuf::from(path);
        let back = store_and_read(path.clone());
        prop_assert_eq!(back.as_os_str(), path.as_os_str());

        let re = Regex::new(&regex::escape(&literal)).unwrap();
        let back = store_and_read(re.clone());
        prop_assert_eq!(back.as_str(), re.as_str());
        prop_assert!(back.is_match(&literal));
    }
}

proptest! {
    #[test]
    fn test_type_reference_round_trip(name in "[a-z]{1,8}(\\.[A-Z][a-z]{0,6}){1,2}") {
        let name = format!("proptest.{name}");
        let registered = type_registry::register(TypeDescriptor::new(name.as_str()));
        let back: Arc<TypeDescriptor> = store_and_read(registered);
        prop_assert_eq!(back.name(), name.as_str());
    }
}

proptest! {
    #[test]
    fn test_array_round_trip(items in prop::collection::vec(any::<i64>(), 0..8)) {
        prop_assert_eq!(store_and_read(items.clone()), items);
    }
}

// A whole array survives one escaped line, including no elements and empty elements
proptest! {
    #[test]
    fn test_array_line_round_trip(
        texts in prop::collection::vec("\\PC{0,6}", 0..5),
        numbers in prop::collection::vec(any::<i64>(), 0..5),
        colors in prop::collection::vec(0u32..=0xFF_FFFF, 0..5),
        separator in prop::sample::select(vec!['|', ',', ';'])
    ) {
        let escaper = Escaper::new(separator);
        let arrays = [
            Value::Array(ScalarType::String, texts.into_iter().map(Value::String).collect()),
            Value::Array(ScalarType::I64, numbers.into_iter().map(Value::I64).collect()),
            Value::Array(
                ScalarType::Color,
                colors.into_iter().map(|c| Value::Color(Color::from_rgb(c))).collect(),
            ),
        ];
        for value in arrays {
            let ValueType::Array(element) = value.value_type() else {
                unreachable!("arrays only");
            };
            let line = serialize_array(&value, &escaper);
            let parsed = convert_array("key", &escaper.split(&line), element).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}

// Splitting a joined array gives back the elements, whatever characters they contain
proptest! {
    #[test]
    fn test_escaping_is_lossless(
        items in prop::collection::vec("[a-z|,\\\\ ]{0,6}", 1..6),
        separator in prop::sample::select(vec!['|', ',', ';'])
    ) {
        let escaper = Escaper::new(separator);
        let joined = escaper.join(&items);
        prop_assert_eq!(escaper.split(&joined), items);
    }
}

proptest! {
    #[test]
    fn test_escape_then_unescape_is_identity(s in "\\PC*") {
        let escaper = Escaper::default().escaping(['=', ':']);
        prop_assert_eq!(escaper.unescape(&escaper.escape(&s)), s);
    }
}

// Writing a document and reading it back is lossless for keys and values
proptest! {
    #[test]
    fn test_properties_document_round_trip(
        entries in prop::collection::btree_map(
            "[a-z][a-z0-9._=:#!\\\\]{0,8}",
            prop::collection::vec("[a-z0-9|=:#!\\\\]{1,6}", 0..4),
            0..6
        )
    ) {
        let format = PropertiesFormat::new();
        let document = SourceDocument::from(entries.clone());
        let text = format.write(&document).unwrap();
        let parsed = format.read(&text).unwrap();
        prop_assert_eq!(parsed.to_entries(), entries);
    }
}
