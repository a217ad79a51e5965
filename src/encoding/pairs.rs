//! Key-value pair codec for the delimited settings format

use tracing::debug;

/// Codec for the flat delimited settings format
///
/// Both separators are arbitrary non-empty strings. There is no escaping:
/// a separator occurring inside a key or value makes that segment split
/// into the wrong number of parts, and the segment is dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCodec {
    kv_separator: String,
    pair_separator: String,
}

impl PairCodec {
    /// Create a codec with explicit separators
    pub fn new(kv_separator: impl Into<String>, pair_separator: impl Into<String>) -> Self {
        Self {
            kv_separator: kv_separator.into(),
            pair_separator: pair_separator.into(),
        }
    }

    /// Separator between a key and its value
    pub fn kv_separator(&self) -> &str {
        &self.kv_separator
    }

    /// Separator between consecutive pairs
    pub fn pair_separator(&self) -> &str {
        &self.pair_separator
    }

    /// Decode text into an ordered sequence of key-value pairs
    ///
    /// Empty segments are discarded. A segment is kept only when splitting
    /// it on the key-value separator yields exactly two non-empty parts;
    /// anything else is dropped without error.
    pub fn decode(&self, text: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for segment in text.split(&self.pair_separator) {
            if segment.is_empty() {
                continue;
            }
            let parts: Vec<&str> = segment
                .split(&self.kv_separator)
                .filter(|part| !part.is_empty())
                .collect();
            match parts.as_slice() {
                [key, value] => pairs.push((key.to_string(), value.to_string())),
                _ => debug!("dropping malformed settings segment: {:?}", segment),
            }
        }
        pairs
    }

    /// Encode pairs into a single text blob
    ///
    /// Pairs with an empty key or empty value are skipped. No leading or
    /// trailing pair separator is emitted.
    pub fn encode<'a>(&self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
        let mut text = String::new();
        for (key, value) in pairs {
            if key.is_empty() || value.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push_str(&self.pair_separator);
            }
            text.push_str(key);
            text.push_str(&self.kv_separator);
            text.push_str(value);
        }
        text
    }
}

impl Default for PairCodec {
    fn default() -> Self {
        Self::new(super::DEFAULT_KV_SEPARATOR, super::DEFAULT_PAIR_SEPARATOR)
    }
}
