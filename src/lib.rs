#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod certificates;
pub mod client;
pub mod config;
pub mod error;
pub mod serde_helpers;
pub mod types;
pub mod webhook;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};
use serde::de::DeserializeOwned;

pub use crate::client::{Client, ClientBuilder};
pub use crate::config::Config;
pub use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub const BINANCE_PAY_HOST: &str = "https://bpay.binanceapi.com";

pub(crate) async fn request<Response: DeserializeOwned>(
    client: &ReqwestClient,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(h) = headers {
        *request.headers_mut() = h;
    }

    let response = client.execute(request).await?;
    let status_code = response.status();

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let bytes = response.bytes().await?;
    serde_helpers::deserialize_with_warnings(&bytes)
}
