//! HTTP client implementation

use std::sync::Arc;

use reqwest::{header, Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::config::KuduClientSettings;
use crate::encoding::TextEncoding;
use crate::errors::{ensure_not_blank, KuduError};
use crate::utils::{Clock, SystemClock};

/// Body of an outgoing request
enum RequestBody {
    Empty,
    Bytes(Vec<u8>),
    Text(Vec<u8>, TextEncoding),
    Json(serde_json::Value),
}

/// HTTP client for a Kudu scm site
///
/// Every request is authenticated with the site's deployment credentials
/// and carries `If-Match: *` so VFS writes overwrite existing files.
pub struct KuduClient {
    client: Client,
    base_url: String,
    user_name: String,
    password: SecretString,
    clock: Arc<dyn Clock>,
}

impl KuduClient {
    /// Create a new client from validated settings
    pub fn new(settings: KuduClientSettings) -> Result<Self, KuduError> {
        settings.validate()?;
        Url::parse(&settings.base_uri).map_err(|e| {
            KuduError::ConfigError(format!("invalid base uri {}: {}", settings.base_uri, e))
        })?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::IF_MATCH, header::HeaderValue::from_static("*"));

        let client = Client::builder()
            .timeout(settings.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_uri.trim_end_matches('/').to_string(),
            user_name: settings.user_name,
            password: settings.password,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used to stamp deployments
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Absolute URL for a path relative to the site root
    pub fn request_url(&self, relative_uri: &str) -> String {
        format!("{}/{}", self.base_url, relative_uri.trim_start_matches('/'))
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, relative_uri: &str) -> Result<T, KuduError> {
        let response = self.send(Method::GET, relative_uri, RequestBody::Empty).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// GET the raw response body
    pub async fn get_bytes(&self, relative_uri: &str) -> Result<Vec<u8>, KuduError> {
        let response = self.send(Method::GET, relative_uri, RequestBody::Empty).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// PUT raw bytes, `None` sends an empty body
    pub async fn put_bytes(
        &self,
        relative_uri: &str,
        body: Option<Vec<u8>>,
    ) -> Result<(), KuduError> {
        let body = body.map_or(RequestBody::Empty, RequestBody::Bytes);
        self.send(Method::PUT, relative_uri, body).await?;
        Ok(())
    }

    /// PUT text in the given encoding
    pub async fn put_string(
        &self,
        relative_uri: &str,
        value: &str,
        encoding: TextEncoding,
    ) -> Result<(), KuduError> {
        let body = RequestBody::Text(encoding.encode(value), encoding);
        self.send(Method::PUT, relative_uri, body).await?;
        Ok(())
    }

    /// POST raw bytes
    pub async fn post_bytes(&self, relative_uri: &str, body: Vec<u8>) -> Result<(), KuduError> {
        self.send(Method::POST, relative_uri, RequestBody::Bytes(body))
            .await?;
        Ok(())
    }

    /// POST a JSON document and parse the JSON response
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        relative_uri: &str,
        body: &B,
    ) -> Result<T, KuduError> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.send(Method::POST, relative_uri, body).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// POST a JSON document, ignoring the response body
    pub async fn post_json_unit<B: Serialize>(
        &self,
        relative_uri: &str,
        body: &B,
    ) -> Result<(), KuduError> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.send(Method::POST, relative_uri, body).await?;
        Ok(())
    }

    /// DELETE a resource
    pub async fn delete(&self, relative_uri: &str) -> Result<(), KuduError> {
        self.send(Method::DELETE, relative_uri, RequestBody::Empty)
            .await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        relative_uri: &str,
        body: RequestBody,
    ) -> Result<Response, KuduError> {
        ensure_not_blank(relative_uri, "relative_uri")?;

        let url = self.request_url(relative_uri);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .basic_auth(&self.user_name, Some(self.password.expose_secret()));

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Bytes(bytes) => request.body(bytes),
            RequestBody::Text(bytes, encoding) => request
                .header(
                    header::CONTENT_TYPE,
                    format!("text/plain; charset={}", encoding.charset()),
                )
                .body(bytes),
            RequestBody::Json(value) => request.json(&value),
        };

        let response = request.send().await?;
        ensure_success(&method, response)
    }
}

/// Log the outcome and turn any non-2xx status into an error
fn ensure_success(method: &Method, response: Response) -> Result<Response, KuduError> {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown").to_string();

    if status.is_success() {
        debug!("{} successful: {} ({})", method, status.as_u16(), reason);
        return Ok(response);
    }

    error!("{} failed: {} ({})", method, status.as_u16(), reason);
    let url = if status == StatusCode::NOT_FOUND {
        debug!("Url: {}", response.url());
        Some(response.url().to_string())
    } else {
        None
    };

    Err(KuduError::RemoteRequestFailed {
        method: method.clone(),
        status,
        reason,
        url,
    })
}
