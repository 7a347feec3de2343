pub mod extract;
pub mod fanout;
pub mod google;
pub mod http;
pub mod url;

pub use extract::extract_translation;
pub use fanout::{FanoutCoordinator, FanoutStats};
pub use google::{GoogleTranslator, MAX_TEXT_CHARS};
pub use http::HttpTransport;
pub use url::{format_url, format_url_with_endpoint};

use crate::config::{EffectiveConfig, ProxySettings};
use crate::error::{Result, TranslateError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Performs the GET against the translation page and returns the body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration, proxies: &ProxySettings) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// A fully resolved request for one target language.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub timeout: Duration,
    pub proxies: ProxySettings,
    pub endpoint: String,
}

impl TranslationRequest {
    pub fn new(text: &str, target_language: &str, effective: &EffectiveConfig) -> Self {
        Self {
            text: text.to_string(),
            source_language: effective.source_language.clone(),
            target_language: target_language.to_string(),
            timeout: effective.timeout,
            proxies: effective.proxies.clone(),
            endpoint: effective.endpoint.clone(),
        }
    }

    pub fn url(&self) -> String {
        format_url_with_endpoint(
            &self.endpoint,
            &self.text,
            &self.source_language,
            &self.target_language,
        )
    }
}

/// Outcome of one branch of a multi-target translation.
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: String,
    pub result: Result<String>,
    pub duration_ms: u64,
}

impl TargetOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// What a `translate` call produced.
///
/// `Multi` holds exactly one outcome per requested target, in the order the
/// requests completed.
#[derive(Debug)]
pub enum Translation {
    Single(String),
    Multi(Vec<TargetOutcome>),
}

impl Translation {
    pub fn is_multi(&self) -> bool {
        matches!(self, Translation::Multi(_))
    }

    pub fn into_single(self) -> Option<String> {
        match self {
            Translation::Single(text) => Some(text),
            Translation::Multi(_) => None,
        }
    }

    pub fn outcomes(&self) -> &[TargetOutcome] {
        match self {
            Translation::Single(_) => &[],
            Translation::Multi(outcomes) => outcomes,
        }
    }

    /// `(target, translation)` pairs of the branches that succeeded.
    pub fn successes(&self) -> Vec<(&str, &str)> {
        self.outcomes()
            .iter()
            .filter_map(|o| match &o.result {
                Ok(text) => Some((o.target.as_str(), text.as_str())),
                Err(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(&str, &TranslateError)> {
        self.outcomes()
            .iter()
            .filter_map(|o| match &o.result {
                Ok(_) => None,
                Err(e) => Some((o.target.as_str(), e)),
            })
            .collect()
    }
}

/// Fetch `url` and pull the translated string out of the returned page.
pub async fn fetch_translation(
    transport: &dyn Transport,
    url: &str,
    timeout: Duration,
    proxies: &ProxySettings,
) -> Result<String> {
    debug!("GET {} via {}", url, transport.name());
    let body = transport.get(url, timeout, proxies).await?;
    extract_translation(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TranslateOptions, TranslatorConfig};
    use crate::error::ErrorKind;

    struct FixedTransport {
        body: &'static str,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, _url: &str, _timeout: Duration, _proxies: &ProxySettings) -> Result<String> {
            Ok(self.body.to_string())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_request_url() {
        let effective = TranslatorConfig::default()
            .with_source_language("en")
            .resolve(&TranslateOptions::new());
        let request = TranslationRequest::new("Hello world", "fr", &effective);
        assert_eq!(
            request.url(),
            "https://translate.google.com/m?tl=fr&sl=en&q=Hello%20world"
        );
        assert_eq!(request.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fetch_translation_extracts() {
        let transport = FixedTransport {
            body: r#"<div class="result-container">Merhaba d&#252;nya</div>"#,
        };
        let text = fetch_translation(&transport, "http://x", Duration::from_secs(1), &ProxySettings::new())
            .await
            .unwrap();
        assert_eq!(text, "Merhaba dünya");
    }

    #[tokio::test]
    async fn test_fetch_translation_unparseable() {
        let transport = FixedTransport {
            body: "<html>nothing here</html>",
        };
        let err = fetch_translation(&transport, "http://x", Duration::from_secs(1), &ProxySettings::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnparseableResponse);
        assert_eq!(err.raw_body(), Some("<html>nothing here</html>"));
    }

    #[test]
    fn test_translation_helpers() {
        let translation = Translation::Multi(vec![
            TargetOutcome {
                target: "fr".to_string(),
                result: Ok("Bonjour".to_string()),
                duration_ms: 12,
            },
            TargetOutcome {
                target: "de".to_string(),
                result: Err(TranslateError::Status {
                    status: 503,
                    url: "http://x".to_string(),
                }),
                duration_ms: 30,
            },
        ]);

        assert!(translation.is_multi());
        assert_eq!(translation.successes(), vec![("fr", "Bonjour")]);
        let failures = translation.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "de");
        assert!(translation.into_single().is_none());

        let single = Translation::Single("Hallo".to_string());
        assert!(single.outcomes().is_empty());
        assert_eq!(single.into_single().as_deref(), Some("Hallo"));
    }
}
