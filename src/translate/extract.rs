use crate::error::{Result, TranslateError};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Text inside an element whose class is one of the two known markers, up to the next `<`.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="(?:t0|result-container)">(.*?)<"#).expect("Invalid regex")
});

/// Pull the translated string out of a response page.
///
/// The first marker in the page wins, whichever of the two class names it
/// carries. The captured text is HTML-entity decoded.
pub fn extract_translation(body: &str) -> Result<String> {
    let Some(captures) = MARKER.captures(body) else {
        debug!("No translation marker in {} byte response", body.len());
        return Err(TranslateError::UnparseableResponse {
            body: body.to_string(),
        });
    };

    let raw = captures.get(1).map_or("", |m| m.as_str());
    Ok(html_escape::decode_html_entities(raw).into_owned())
}
