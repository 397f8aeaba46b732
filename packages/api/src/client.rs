//! HTTP plumbing shared by every fetcher.
//!
//! [`ApiClient`] owns the `reqwest` client, the API base URL and a
//! [`SessionHandle`]. Each request reads the current token from the handle and,
//! when there is one, attaches it under the configured auth header. A missing
//! token is not an error here; the server decides what anonymous callers may do.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::image::{ImageBlob, ImageFetch, ImageUpload};
use crate::session::SessionHandle;
use crate::settings::ApiSettings;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, session: SessionHandle) -> Result<Self, FetchError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(settings.timeout_secs));

        Ok(Self {
            http: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            auth_header: settings.auth_header.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a request, attaching the session token when there is one.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.header(self.auth_header.as_str(), token),
            None => builder,
        }
    }

    /// Send and reject any non-2xx status.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("Unknown status").to_string()
        } else {
            body.trim().to_string()
        };
        tracing::debug!("Request rejected with {status}: {message}");
        Err(FetchError::Status { status, message })
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        let bytes = self.send(request).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), FetchError> {
        self.send(request).await.map(|_| ())
    }

    pub(crate) fn with_image(request: RequestBuilder, upload: &ImageUpload) -> RequestBuilder {
        request
            .header(CONTENT_TYPE, upload.kind.mime())
            .body(upload.bytes.clone())
    }

    /// Download an image. Any failure, including "no image set", is `NoImage`.
    pub(crate) async fn fetch_image(&self, path: &str) -> ImageFetch {
        match self.try_fetch_image(path).await {
            Ok(blob) => ImageFetch::Found(blob),
            Err(e) => {
                tracing::debug!("No image at {path}: {e}");
                ImageFetch::NoImage
            }
        }
    }

    async fn try_fetch_image(&self, path: &str) -> Result<ImageBlob, FetchError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?;
        Ok(ImageBlob {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
