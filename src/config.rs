use crate::error::{Result, TranslateError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default endpoint of the mobile translation page.
pub const DEFAULT_ENDPOINT: &str = "https://translate.google.com/m";

/// Source language used when none is configured; the endpoint auto-detects it.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "auto";

pub const DEFAULT_TARGET_LANGUAGE: &str = "tr";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on concurrent requests during a multi-target fan-out.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// One target language or several of them.
///
/// A `Multi` target always fans out, even with a single entry, and yields one
/// outcome per code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Single(String),
    Multi(Vec<String>),
}

impl Target {
    pub fn single(code: impl Into<String>) -> Self {
        Target::Single(code.into())
    }

    pub fn multi<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Target::Multi(codes.into_iter().map(Into::into).collect())
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Target::Multi(_))
    }

    /// All language codes, in the order they were given.
    pub fn codes(&self) -> Vec<&str> {
        match self {
            Target::Single(code) => vec![code.as_str()],
            Target::Multi(codes) => codes.iter().map(String::as_str).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Target::Single(code) => code.is_empty(),
            Target::Multi(codes) => codes.is_empty(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Single(code) => write!(f, "{}", code),
            Target::Multi(codes) => write!(f, "[{}]", codes.join(", ")),
        }
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    /// `"fr"` is a single target, `"tr,fr,de"` a multi target.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Target language must not be empty".to_string());
        }
        if s.contains(',') {
            let codes: Vec<String> = s
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            if codes.is_empty() {
                return Err(format!("No language codes in target list: {}", s));
            }
            Ok(Target::Multi(codes))
        } else {
            Ok(Target::Single(s.to_string()))
        }
    }
}

/// Proxy URLs keyed by the scheme of the request they apply to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl ProxySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http(mut self, url: impl Into<String>) -> Self {
        self.http = Some(url.into());
        self
    }

    pub fn with_https(mut self, url: impl Into<String>) -> Self {
        self.https = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

/// Translator defaults. Immutable once handed to a translator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub source_language: String,
    #[serde(rename = "target_language")]
    pub target: Target,
    #[serde(rename = "timeout_secs", deserialize_with = "duration_secs::deserialize")]
    pub timeout: Duration,
    pub proxies: ProxySettings,
    pub endpoint: String,
    pub concurrency: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target: Target::Single(DEFAULT_TARGET_LANGUAGE.to_string()),
            timeout: DEFAULT_TIMEOUT,
            proxies: ProxySettings::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl TranslatorConfig {
    pub fn with_source_language(mut self, code: impl Into<String>) -> Self {
        self.source_language = code.into();
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxies(mut self, proxies: ProxySettings) -> Self {
        self.proxies = proxies;
        self
    }

    /// Point the translator at another base URL (a mirror or a local test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Defaults, then the user config file, then environment variables.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str::<TranslatorConfig>(&contents).map_err(|e| {
            TranslateError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Overlay `EASY_TRANSLATE_*` variables as returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup("EASY_TRANSLATE_SOURCE") {
            self.source_language = source;
        }
        if let Some(target) = lookup("EASY_TRANSLATE_TARGET") {
            self.target = target.parse().map_err(TranslateError::Config)?;
        }
        if let Some(timeout) = lookup("EASY_TRANSLATE_TIMEOUT") {
            let secs: f64 = timeout.trim().parse().map_err(|_| {
                TranslateError::Config(format!("EASY_TRANSLATE_TIMEOUT is not a number: {}", timeout))
            })?;
            self.timeout = duration_secs::from_secs(secs)?;
        }
        if let Some(proxy) = lookup("EASY_TRANSLATE_HTTP_PROXY") {
            self.proxies.http = Some(proxy);
        }
        if let Some(proxy) = lookup("EASY_TRANSLATE_HTTPS_PROXY") {
            self.proxies.https = Some(proxy);
        }
        if let Some(concurrency) = lookup("EASY_TRANSLATE_CONCURRENCY") {
            self.concurrency = concurrency.trim().parse().map_err(|_| {
                TranslateError::Config(format!(
                    "EASY_TRANSLATE_CONCURRENCY is not a positive integer: {}",
                    concurrency
                ))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_language.is_empty() {
            return Err(TranslateError::Config(
                "Source language must not be empty".to_string(),
            ));
        }
        if self.target.is_empty() {
            return Err(TranslateError::Config(
                "At least one target language is required".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(TranslateError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(TranslateError::Config(
                "Concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Combine the stored defaults with per-call options.
    ///
    /// Options that are absent or empty (empty string, empty target list, zero
    /// timeout, no proxy) fall back to the stored default.
    pub fn resolve(&self, options: &TranslateOptions) -> EffectiveConfig {
        let source_language = options
            .source_language
            .as_ref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.source_language)
            .clone();
        let target = options
            .target
            .as_ref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.target)
            .clone();
        let timeout = options
            .timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(self.timeout);
        let proxies = options
            .proxies
            .as_ref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.proxies)
            .clone();

        EffectiveConfig {
            source_language,
            target,
            timeout,
            proxies,
            endpoint: self.endpoint.clone(),
            concurrency: self.concurrency.max(1),
        }
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("easy-translate").join("config.toml"))
    }
}

/// Per-call overrides. Every field left as `None` uses the translator default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOptions {
    pub target: Option<Target>,
    pub source_language: Option<String>,
    pub timeout: Option<Duration>,
    pub proxies: Option<ProxySettings>,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn source_language(mut self, code: impl Into<String>) -> Self {
        self.source_language = Some(code.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn proxies(mut self, proxies: ProxySettings) -> Self {
        self.proxies = Some(proxies);
        self
    }
}

/// Fully resolved parameters for one `translate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub source_language: String,
    pub target: Target,
    pub timeout: Duration,
    pub proxies: ProxySettings,
    pub endpoint: String,
    pub concurrency: usize,
}

mod duration_secs {
    use crate::error::{Result, TranslateError};
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        from_secs(secs).map_err(serde::de::Error::custom)
    }

    pub fn from_secs(secs: f64) -> Result<Duration> {
        Duration::try_from_secs_f64(secs)
            .map_err(|_| TranslateError::Config(format!("Invalid timeout: {}", secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TranslatorConfig::default();
        assert_eq!(config.source_language, "auto");
        assert_eq!(config.target, Target::Single("tr".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.proxies.is_empty());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("fr".parse::<Target>().unwrap(), Target::single("fr"));
        assert_eq!(
            "tr, fr,de".parse::<Target>().unwrap(),
            Target::multi(["tr", "fr", "de"])
        );
        assert!("".parse::<Target>().is_err());
        assert!(" , ".parse::<Target>().is_err());
    }

    #[test]
    fn test_target_codes_keep_order() {
        assert_eq!(Target::single("fr").codes(), vec!["fr"]);
        assert_eq!(Target::multi(["tr", "fr", "de"]).codes(), vec!["tr", "fr", "de"]);
        assert!(!Target::single("fr").is_multi());
        assert!(Target::multi(["fr"]).is_multi());
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::single("de").to_string(), "de");
        assert_eq!(Target::multi(["tr", "fr"]).to_string(), "[tr, fr]");
    }

    #[test]
    fn test_resolve_uses_defaults() {
        let config = TranslatorConfig::default().with_source_language("en");
        let effective = config.resolve(&TranslateOptions::new());
        assert_eq!(effective.source_language, "en");
        assert_eq!(effective.target, Target::single("tr"));
        assert_eq!(effective.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_overrides_without_mutation() {
        let config = TranslatorConfig::default().with_target(Target::single("de"));
        let options = TranslateOptions::new()
            .target(Target::single("fr"))
            .source_language("en")
            .timeout(Duration::from_secs(10))
            .proxies(ProxySettings::new().with_https("http://proxy:8080"));

        let effective = config.resolve(&options);
        assert_eq!(effective.target, Target::single("fr"));
        assert_eq!(effective.source_language, "en");
        assert_eq!(effective.timeout, Duration::from_secs(10));
        assert_eq!(effective.proxies.https.as_deref(), Some("http://proxy:8080"));

        assert_eq!(config.target, Target::single("de"));
        assert_eq!(config.source_language, "auto");
    }

    #[test]
    fn test_resolve_empty_overrides_fall_back() {
        let config = TranslatorConfig::default();
        let options = TranslateOptions::new()
            .target(Target::Multi(vec![]))
            .source_language("")
            .timeout(Duration::ZERO)
            .proxies(ProxySettings::new());

        let effective = config.resolve(&options);
        assert_eq!(effective.target, Target::single("tr"));
        assert_eq!(effective.source_language, "auto");
        assert_eq!(effective.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_apply_env() {
        let mut config = TranslatorConfig::default();
        config
            .apply_env(env(&[
                ("EASY_TRANSLATE_SOURCE", "en"),
                ("EASY_TRANSLATE_TARGET", "tr,fr"),
                ("EASY_TRANSLATE_TIMEOUT", "2.5"),
                ("EASY_TRANSLATE_HTTPS_PROXY", "http://proxy:3128"),
                ("EASY_TRANSLATE_CONCURRENCY", "2"),
            ]))
            .unwrap();

        assert_eq!(config.source_language, "en");
        assert_eq!(config.target, Target::multi(["tr", "fr"]));
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.proxies.https.as_deref(), Some("http://proxy:3128"));
        assert!(config.proxies.http.is_none());
        assert_eq!(config.concurrency, 2);
    }

    #[test]
    fn test_apply_env_rejects_garbage() {
        let mut config = TranslatorConfig::default();
        assert!(config
            .apply_env(env(&[("EASY_TRANSLATE_TIMEOUT", "soon")]))
            .is_err());
        assert!(config
            .apply_env(env(&[("EASY_TRANSLATE_CONCURRENCY", "-1")]))
            .is_err());
    }

    #[test]
    fn test_validate() {
        assert!(TranslatorConfig::default()
            .with_concurrency(0)
            .validate()
            .is_err());
        assert!(TranslatorConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(TranslatorConfig::default()
            .with_target(Target::Multi(vec![]))
            .validate()
            .is_err());
    }

    #[test]
    fn test_toml_round_trip_fields() {
        let toml_str = r#"
            source_language = "en"
            target_language = ["tr", "fr", "de"]
            timeout_secs = 10

            [proxies]
            http = "http://proxy:8080"
        "#;
        let config: TranslatorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source_language, "en");
        assert_eq!(config.target, Target::multi(["tr", "fr", "de"]));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.proxies.http.as_deref(), Some("http://proxy:8080"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }
}
