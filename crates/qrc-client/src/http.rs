//! `reqwest` implementation of [`QrCodeApi`]

use crate::api::QrCodeApi;
use crate::error::{ClientError, ResponseExt};
use async_trait::async_trait;
use qrc_model::{QrCode, QrCodeBody, QrCodeId};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use url::Url;

/// HTTP client for `/api/qrcodes`
#[derive(Debug, Clone)]
pub struct HttpQrCodeClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpQrCodeClient {
    /// Client for the API rooted at `base_url`, with a request timeout
    ///
    /// # Errors
    /// - [`ClientError::InvalidBaseUrl`] if `base_url` cannot take a path
    /// - [`ClientError::Transport`] if the HTTP client cannot be built
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Self::with_client(base_url, client)
    }

    /// Client reusing a preconfigured `reqwest::Client`
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` cannot take a path
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url, client })
    }

    /// Collection endpoint, `{base}/api/qrcodes`
    #[must_use]
    pub fn collection_url(&self) -> Url {
        self.endpoint(&["api", "qrcodes"])
    }

    /// Item endpoint, `{base}/api/qrcodes/{id}`
    #[must_use]
    pub fn item_url(&self, id: &QrCodeId) -> Url {
        self.endpoint(&["api", "qrcodes", id.as_str()])
    }

    /// Rendered QR image, `{base}/qrcodes/{id}/image`
    #[must_use]
    pub fn image_url(&self, id: &QrCodeId) -> Url {
        self.endpoint(&["qrcodes", id.as_str(), "image"])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn decode(response: reqwest::Response) -> Result<QrCode, ClientError> {
        let body = response.map_client_error().await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QrCodeApi for HttpQrCodeClient {
    #[tracing::instrument(skip(self, body), err)]
    async fn create(&self, body: &QrCodeBody) -> Result<QrCode, ClientError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, body), err)]
    async fn update(&self, id: &QrCodeId, body: &QrCodeBody) -> Result<QrCode, ClientError> {
        let response = self
            .client
            .patch(self.item_url(id))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete(&self, id: &QrCodeId) -> Result<(), ClientError> {
        self.client
            .delete(self.item_url(id))
            .send()
            .await?
            .map_client_error()
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpQrCodeClient {
        HttpQrCodeClient::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoints_follow_api_layout() {
        let client = client("https://app.example.com");
        let id = QrCodeId::new("42").unwrap();

        assert_eq!(client.collection_url().as_str(), "https://app.example.com/api/qrcodes");
        assert_eq!(client.item_url(&id).as_str(), "https://app.example.com/api/qrcodes/42");
        assert_eq!(client.image_url(&id).as_str(), "https://app.example.com/qrcodes/42/image");
    }

    #[test]
    fn base_path_is_preserved() {
        let client = client("https://proxy.example.com/apps/qr/");
        assert_eq!(
            client.collection_url().as_str(),
            "https://proxy.example.com/apps/qr/api/qrcodes"
        );
    }

    #[test]
    fn opaque_base_is_rejected() {
        let err = HttpQrCodeClient::new(
            Url::parse("mailto:ops@example.com").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = client("http://127.0.0.1:1");
        let id = QrCodeId::new("1").unwrap();

        let err = client.delete(&id).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(err.is_retryable());
    }
}
