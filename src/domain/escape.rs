// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backslash escaping for multi-valued settings.
//!
//! Multi-valued entries are written as a single line with elements joined by a separator. The
//! separator, the escape character itself and any configured extra characters are prefixed with
//! a backslash when joining, and splitting reverses that. The default separator is
//! [`DEFAULT_SEPARATOR`] (`|`) rather than a comma because elements such as URLs, regexes and
//! free text commonly contain commas.
//!
//! The empty line is a single empty element, so a hand-written `key =` reads as `[""]`. An array
//! with no elements is written as a lone backslash ([`EMPTY_ARRAY`]), which escaping never
//! produces on its own.

/// The separator used between array elements unless configured otherwise.
pub const DEFAULT_SEPARATOR: char = '|';

/// The encoded form of an array with no elements.
pub const EMPTY_ARRAY: &str = "\\";

const ESCAPE: char = '\\';

/// Joins and splits array elements with backslash escaping.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::Escaper;
///
/// let escaper = Escaper::default();
/// let joined = escaper.join(["a|b", "c"]);
/// assert_eq!(joined, "a\\|b|c");
/// assert_eq!(escaper.split(&joined), vec!["a|b", "c"]);
///
/// // No elements and one empty element stay distinct
/// assert_eq!(escaper.split(&escaper.join(Vec::<String>::new())), Vec::<String>::new());
/// assert_eq!(escaper.split(&escaper.join([""])), vec![""]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaper {
    separator: char,
    escaped: Vec<char>,
}

impl Escaper {
    /// Creates an escaper with a custom separator and no extra escaped characters.
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            escaped: Vec::new(),
        }
    }

    /// Adds characters that must be escaped besides the separator and the backslash.
    pub fn escaping(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        for c in chars {
            if !self.escaped.contains(&c) {
                self.escaped.push(c);
            }
        }
        self
    }

    /// Returns the separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    fn must_escape(&self, c: char) -> bool {
        c == ESCAPE || c == self.separator || self.escaped.contains(&c)
    }

    /// Escapes a single element.
    pub fn escape(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            if self.must_escape(c) {
                out.push(ESCAPE);
            }
            out.push(c);
        }
        out
    }

    /// Removes escaping from a single element. A trailing lone backslash is kept.
    pub fn unescape(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c == ESCAPE {
                match chars.next() {
                    Some(next) => out.push(next),
                    None => out.push(ESCAPE),
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Escapes every element and joins them with the separator.
    ///
    /// No elements at all are written as [`EMPTY_ARRAY`].
    pub fn join<I, S>(&self, values: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = String::new();
        let mut count = 0;
        for value in values {
            if count > 0 {
                out.push(self.separator);
            }
            out.push_str(&self.escape(value.as_ref()));
            count += 1;
        }
        if count == 0 {
            return EMPTY_ARRAY.to_string();
        }
        out
    }

    /// Splits on unescaped separators and unescapes each element.
    ///
    /// An empty input yields a single empty element and [`EMPTY_ARRAY`] yields none, so both
    /// `split(join([""]))` and `split(join([]))` round-trip.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text == EMPTY_ARRAY {
            return Vec::new();
        }
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == ESCAPE {
                match chars.next() {
                    Some(next) => current.push(next),
                    None => current.push(ESCAPE),
                }
            } else if c == self.separator {
                parts.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }
        parts.push(current);
        parts
    }
}

impl Default for Escaper {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separator_is_pipe() {
        assert_eq!(Escaper::default().separator(), '|');
    }

    #[test]
    fn test_commas_are_not_split() {
        let escaper = Escaper::default();
        assert_eq!(escaper.split("a,b|c"), vec!["a,b", "c"]);
    }

    #[test]
    fn test_separator_inside_value_yields_one_element() {
        let escaper = Escaper::default();
        let joined = escaper.join(["x|y|z"]);
        assert_eq!(escaper.split(&joined), vec!["x|y|z"]);
    }

    #[test]
    fn test_backslash_round_trip() {
        let escaper = Escaper::default();
        let values = ["C:\\temp\\", "\\|"];
        let joined = escaper.join(values);
        assert_eq!(escaper.split(&joined), values);
    }

    #[test]
    fn test_custom_separator_and_extra_chars() {
        let escaper = Escaper::new(',').escaping(['=', ':']);
        assert_eq!(escaper.escape("a=b:c,d"), "a\\=b\\:c\\,d");
        assert_eq!(escaper.unescape("a\\=b\\:c\\,d"), "a=b:c,d");
        assert_eq!(escaper.split("1,2\\,3"), vec!["1", "2,3"]);
    }

    #[test]
    fn test_empty_elements() {
        let escaper = Escaper::default();
        assert_eq!(escaper.split(""), vec![""]);
        assert_eq!(escaper.split("|"), vec!["", ""]);
        assert_eq!(escaper.join([""]), "");
    }

    #[test]
    fn test_no_elements_differs_from_one_empty_element() {
        let escaper = Escaper::default();
        let none = escaper.join(Vec::<String>::new());
        assert_eq!(none, EMPTY_ARRAY);
        assert!(escaper.split(&none).is_empty());

        // A literal backslash element is escaped and never mistaken for the marker
        assert_eq!(escaper.join(["\\"]), "\\\\");
        assert_eq!(escaper.split(&escaper.join(["\\"])), vec!["\\"]);
    }

    #[test]
    fn test_trailing_backslash_kept() {
        let escaper = Escaper::default();
        assert_eq!(escaper.unescape("abc\\"), "abc\\");
    }
}
