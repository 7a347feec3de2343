//! Building the request URL for the mobile translation page.

use crate::config::DEFAULT_ENDPOINT;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left literal in the `q` parameter: RFC 3986 unreserved plus `/`.
const QUERY_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode the UTF-8 bytes of `text`.
pub fn encode_text(text: &str) -> String {
    utf8_percent_encode(text, QUERY_TEXT).to_string()
}

/// URL for translating `text` from `source_language` to `target_language`.
///
/// Language codes are inserted as given; the endpoint is the only judge of
/// whether they are valid.
pub fn format_url(text: &str, source_language: &str, target_language: &str) -> String {
    format_url_with_endpoint(DEFAULT_ENDPOINT, text, source_language, target_language)
}

pub fn format_url_with_endpoint(
    endpoint: &str,
    text: &str,
    source_language: &str,
    target_language: &str,
) -> String {
    format!(
        "{}?tl={}&sl={}&q={}",
        endpoint,
        target_language,
        source_language,
        encode_text(text)
    )
}
