//! Google Translate client built on the mobile web page.

use crate::config::{Target, TranslateOptions, TranslatorConfig};
use crate::error::{Result, TranslateError};
use crate::translate::{
    fetch_translation, FanoutCoordinator, HttpTransport, Translation, TranslationRequest,
    Transport,
};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Longest text, in characters, the endpoint accepts in one request.
pub const MAX_TEXT_CHARS: usize = 5000;

fn check_length(text: &str) -> Result<()> {
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(TranslateError::TextTooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}

/// Text-mode reading: `\r\n` and lone `\r` become `\n`.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Translator holding immutable defaults and a shared transport.
pub struct GoogleTranslator {
    config: TranslatorConfig,
    transport: Arc<dyn Transport>,
    show_progress: bool,
}

impl GoogleTranslator {
    /// Create a translator that talks to the endpoint over HTTP.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(HttpTransport::new()?))
    }

    pub fn with_transport(config: TranslatorConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            show_progress: false,
        })
    }

    /// Show a progress bar while a multi-target call is running.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate `text`.
    ///
    /// A single target returns [`Translation::Single`] or the error of that
    /// request. A multi target returns [`Translation::Multi`] with one outcome
    /// per code in completion order; individual failures stay inside their
    /// outcome.
    pub async fn translate(&self, text: &str, options: &TranslateOptions) -> Result<Translation> {
        let effective = self.config.resolve(options);
        check_length(text)?;

        match effective.target {
            Target::Single(ref code) => {
                let request = TranslationRequest::new(text, code, &effective);
                Ok(Translation::Single(self.translate_one(&request).await?))
            }
            Target::Multi(_) => {
                let requests = effective
                    .target
                    .codes()
                    .into_iter()
                    .map(|code| TranslationRequest::new(text, code, &effective))
                    .collect();
                let coordinator =
                    FanoutCoordinator::new(self.transport.clone(), effective.concurrency)
                        .with_progress(self.show_progress);
                let (outcomes, _stats) = coordinator.run(requests).await;
                Ok(Translation::Multi(outcomes))
            }
        }
    }

    /// Translate `text` to a single language using every other default.
    pub async fn translate_to(&self, text: &str, target_language: &str) -> Result<String> {
        let effective = self.config.resolve(&TranslateOptions::new());
        check_length(text)?;
        let request = TranslationRequest::new(text, target_language, &effective);
        self.translate_one(&request).await
    }

    async fn translate_one(&self, request: &TranslationRequest) -> Result<String> {
        debug!(
            "Translating {} chars {} -> {}",
            request.text.chars().count(),
            request.source_language,
            request.target_language
        );
        fetch_translation(
            self.transport.as_ref(),
            &request.url(),
            request.timeout,
            &request.proxies,
        )
        .await
    }

    /// Translate the whole content of a UTF-8 text file.
    pub async fn translate_file(
        &self,
        path: impl AsRef<Path>,
        options: &TranslateOptions,
    ) -> Result<Translation> {
        let path = path.as_ref();
        match fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => {}
            _ => return Err(TranslateError::FileNotFound(path.to_path_buf())),
        }

        let text = normalize_newlines(&fs::read_to_string(path).await?);
        debug!("Read {} chars from {}", text.chars().count(), path.display());
        self.translate(&text, options).await
    }
}
