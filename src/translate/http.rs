//! reqwest-backed transport.

use crate::config::ProxySettings;
use crate::error::{Result, TranslateError};
use crate::translate::Transport;
use async_trait::async_trait;
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("easy-translate/", env!("CARGO_PKG_VERSION"));

/// Issues plain GET requests with reqwest.
///
/// Only the given proxy settings are used; proxy environment variables are
/// ignored. Calls without proxy settings share one client. Proxies are fixed
/// at client construction in reqwest, so a call with proxy settings gets its
/// own client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).no_proxy().build()?;
        Ok(Self { client })
    }

    fn client_for(&self, proxies: &ProxySettings) -> Result<Client> {
        if proxies.is_empty() {
            return Ok(self.client.clone());
        }

        let mut builder = Client::builder().user_agent(USER_AGENT).no_proxy();
        if let Some(ref url) = proxies.http {
            builder = builder.proxy(Proxy::http(url).map_err(|e| proxy_error(url, e))?);
        }
        if let Some(ref url) = proxies.https {
            builder = builder.proxy(Proxy::https(url).map_err(|e| proxy_error(url, e))?);
        }
        Ok(builder.build()?)
    }
}

fn proxy_error(url: &str, err: reqwest::Error) -> TranslateError {
    TranslateError::Proxy(format!("{}: {}", url, err))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration, proxies: &ProxySettings) -> Result<String> {
        let client = self.client_for(proxies)?;

        let response = client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        debug!("Translate endpoint response status: {}", status);

        if !status.is_success() {
            return Err(TranslateError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.name(), "http");
    }

    #[test]
    fn test_client_with_proxies() {
        let transport = HttpTransport::new().unwrap();
        let proxies = ProxySettings::new()
            .with_http("http://127.0.0.1:8080")
            .with_https("http://127.0.0.1:8443");
        assert!(transport.client_for(&proxies).is_ok());
    }

    #[test]
    fn test_invalid_proxy_url() {
        let transport = HttpTransport::new().unwrap();
        let proxies = ProxySettings::new().with_https("http://[::1");
        let err = transport.client_for(&proxies).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(err, TranslateError::Proxy(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = HttpTransport::new().unwrap();
        // Port 9 (discard) is not expected to be listening locally.
        let err = transport
            .get(
                "http://127.0.0.1:9/m?tl=fr&sl=auto&q=x",
                Duration::from_secs(2),
                &ProxySettings::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
