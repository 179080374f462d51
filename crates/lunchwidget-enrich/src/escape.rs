use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in query values and path-like arguments.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes `value` as UTF-8, keeping only ASCII alphanumerics and
/// `-_.~/` literal.
#[must_use]
pub fn escape(value: &str) -> String {
    utf8_percent_encode(value, URL_SAFE).to_string()
}
