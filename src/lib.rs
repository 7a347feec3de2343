//! Client for the Google Translate mobile web page.
//!
//! Builds the request URL, fetches the page and pulls the translated text out
//! of the returned HTML. Several target languages are translated concurrently.

pub mod config;
pub mod error;
pub mod translate;

pub use config::{EffectiveConfig, ProxySettings, Target, TranslateOptions, TranslatorConfig};
pub use error::{ErrorKind, Result, TranslateError};
pub use translate::{
    extract_translation, fetch_translation, format_url, GoogleTranslator, HttpTransport,
    TargetOutcome, Translation, TranslationRequest, Transport, MAX_TEXT_CHARS,
};
