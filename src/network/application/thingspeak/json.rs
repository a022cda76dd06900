//! String lookup in the flat JSON objects the feed endpoints return.
//!
//! Only `"key":"value"` pairs are understood. Escapes, nesting, numbers,
//! booleans and `null` are not, and a missing key cannot be told apart from
//! one whose value could not be read: both yield `""`.

use core::fmt::Write as _;
use heapless::String;

/// Longest key that can be looked up.
pub const MAX_KEY_LEN: usize = 58;

/// Returns the string value stored under `key`, or `""`.
///
/// ```rust
/// use tsfeed::network::application::thingspeak::json::value_by_key;
///
/// let feed = r#"{"created_at":"2024-05-01T10:00:00Z","field1":"10","field3":"20"}"#;
/// assert_eq!(value_by_key(feed, "field1"), "10");
/// assert_eq!(value_by_key(feed, "field3"), "20");
/// assert_eq!(value_by_key(feed, "field2"), "");
/// ```
pub fn value_by_key<'a>(text: &'a str, key: &str) -> &'a str {
    let mut needle: String<{ MAX_KEY_LEN + 5 }> = String::new();
    if write!(needle, "\"{}\":\"", key).is_err() {
        return "";
    }
    let Some(start) = text.find(needle.as_str()) else {
        return "";
    };
    let value = &text[start + needle.len()..];
    match value.find('"') {
        Some(end) => &value[..end],
        None => "",
    }
}
