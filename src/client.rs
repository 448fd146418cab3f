use std::sync::Arc;

use chrono::Utc;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::Timestamp;
use crate::auth::{self, Credentials, Nonce, NonceSource, SignedRequest, ThreadRngNonces};
use crate::certificates::{self, CertificateStore};
use crate::config::{CERTIFICATES_PATH, Config, ORDER_PATH};
use crate::types::{ApiResponse, CertificateRecord, Order, OrderResult};
use crate::webhook::{self, WebhookHeaders};

/// Merchant API client.
///
/// Cloning is cheap; clones share credentials, HTTP connection pool and the
/// certificate cache.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: Config,
    credentials: Credentials,
    nonces: Box<dyn NonceSource>,
    certificates: CertificateStore,
    client: ReqwestClient,
}

/// Configures a [`Client`] beyond the defaults of [`Client::new`].
#[derive(Debug)]
pub struct ClientBuilder {
    credentials: Credentials,
    config: Config,
    client: Option<ReqwestClient>,
    nonces: Option<Box<dyn NonceSource>>,
}

impl ClientBuilder {
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Uses a preconfigured HTTP client (timeouts, proxies, TLS roots).
    #[must_use]
    pub fn http_client(mut self, client: ReqwestClient) -> Self {
        self.client = Some(client);
        self
    }

    #[must_use]
    pub fn nonce_source<N: NonceSource + 'static>(mut self, nonces: N) -> Self {
        self.nonces = Some(Box::new(nonces));
        self
    }

    #[must_use]
    pub fn build(self) -> Client {
        Client {
            inner: Arc::new(ClientInner {
                config: self.config,
                credentials: self.credentials,
                nonces: self
                    .nonces
                    .unwrap_or_else(|| Box::new(ThreadRngNonces::default())),
                certificates: CertificateStore::new(),
                client: self.client.unwrap_or_default(),
            }),
        }
    }
}

impl Client {
    /// Creates a client against the production host.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::builder(credentials).build()
    }

    /// Creates a client with a custom endpoint configuration.
    #[must_use]
    pub fn with_config(credentials: Credentials, config: Config) -> Self {
        Self::builder(credentials).config(config).build()
    }

    /// Creates a client with a custom endpoint configuration and HTTP client.
    #[must_use]
    pub fn with_config_and_client(
        credentials: Credentials,
        config: Config,
        client: ReqwestClient,
    ) -> Self {
        Self::builder(credentials)
            .config(config)
            .http_client(client)
            .build()
    }

    #[must_use]
    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder {
            credentials,
            config: Config::default(),
            client: None,
            nonces: None,
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Signs `payload` with the current time and a fresh nonce.
    ///
    /// Send [`SignedRequest::body`] as the request body; it is the exact text
    /// the signature covers.
    pub fn sign<T: Serialize + ?Sized>(&self, payload: &T) -> Result<SignedRequest> {
        let timestamp = Utc::now().timestamp_millis();
        let nonce = self.inner.nonces.next_nonce();

        self.sign_at(payload, timestamp, nonce)
    }

    /// Deterministic variant of [`Client::sign`].
    pub fn sign_at<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        timestamp: Timestamp,
        nonce: Nonce,
    ) -> Result<SignedRequest> {
        auth::sign(&self.inner.credentials, payload, timestamp, nonce)
    }

    /// `POST /binancepay/openapi/v2/order`
    pub async fn create_order(&self, order: &Order) -> Result<ApiResponse<OrderResult>> {
        self.post(ORDER_PATH, order).await
    }

    /// `POST /binancepay/openapi/certificates`
    pub async fn get_certificates(&self) -> Result<ApiResponse<Vec<CertificateRecord>>> {
        self.post(CERTIFICATES_PATH, &serde_json::Map::new()).await
    }

    /// The certificate cache backing webhook verification.
    #[must_use]
    pub fn certificates(&self) -> &CertificateStore {
        &self.inner.certificates
    }

    /// Fetches certificates unless the cache already holds some.
    ///
    /// A failed fetch leaves the cache empty, so the next call tries again.
    pub async fn ensure_certificates(&self) -> Result<()> {
        if self.inner.certificates.is_populated() {
            return Ok(());
        }

        self.refresh_certificates().await
    }

    /// Fetches certificates unconditionally and swaps them into the cache.
    ///
    /// On error the previously cached set stays in place.
    pub async fn refresh_certificates(&self) -> Result<()> {
        let response = self.get_certificates().await?;
        let certificates = certificates::parse_response(response)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            count = certificates.len(),
            "caching counterparty certificates"
        );

        self.inner.certificates.replace(certificates);
        Ok(())
    }

    /// Checks an inbound webhook, fetching certificates first if none are cached.
    ///
    /// `raw_body` must be the request body exactly as received. Unknown
    /// certificate serials and signature mismatches return `Ok(false)`; only
    /// failing to obtain certificates is an error.
    pub async fn verify_webhook(&self, headers: &WebhookHeaders, raw_body: &[u8]) -> Result<bool> {
        self.ensure_certificates().await?;

        Ok(self.verify_webhook_cached(headers, raw_body))
    }

    /// Same as [`Client::verify_webhook`], reading the protocol headers from `headers`.
    ///
    /// Deliveries missing any protocol header are rejected without a certificate fetch.
    pub async fn verify_webhook_headers(&self, headers: &HeaderMap, raw_body: &[u8]) -> Result<bool> {
        let headers = match WebhookHeaders::from_header_map(headers) {
            Ok(headers) => headers,
            #[cfg(feature = "tracing")]
            Err(e) => {
                tracing::warn!(error = %e, "rejecting webhook with incomplete headers");
                return Ok(false);
            }
            #[cfg(not(feature = "tracing"))]
            Err(_) => return Ok(false),
        };

        self.verify_webhook(&headers, raw_body).await
    }

    /// Checks an inbound webhook against the certificates already cached.
    ///
    /// Never performs I/O; with an empty cache every delivery is rejected.
    #[must_use]
    pub fn verify_webhook_cached(&self, headers: &WebhookHeaders, raw_body: &[u8]) -> bool {
        webhook::verify(&self.inner.certificates, headers, raw_body)
    }

    async fn post<T: Serialize + ?Sized, Response: DeserializeOwned>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response> {
        let signed = self.sign(payload)?;
        let headers = signed.headers.to_header_map()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path,
            nonce = %signed.headers.nonce,
            timestamp = %signed.headers.timestamp,
            "sending signed request"
        );

        let request = self
            .inner
            .client
            .request(Method::POST, self.inner.config.endpoint(path)?)
            .body(signed.body)
            .build()?;

        crate::request::<Response>(&self.inner.client, request, Some(headers)).await
    }
}
