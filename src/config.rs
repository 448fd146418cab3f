use bon::Builder;
use url::Url;

use crate::error::Error;
use crate::{BINANCE_PAY_HOST, Result};

pub(crate) const ORDER_PATH: &str = "binancepay/openapi/v2/order";
pub(crate) const CERTIFICATES_PATH: &str = "binancepay/openapi/certificates";

/// Endpoint configuration for [`Client`](crate::Client).
///
/// Endpoint paths are appended to `base_url`, so a base such as
/// `https://proxy.example/gateway` keeps its `/gateway` prefix.
#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    #[builder(default = default_base_url())]
    base_url: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Parses `base_url` and rejects anything that cannot carry a path.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "`{base_url}` cannot be used as a base URL"
            )));
        }

        Ok(Self {
            base_url: as_directory(base_url),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(as_directory(self.base_url.clone()).join(path)?)
    }
}

/// `Url::join` replaces the last path segment unless the path ends in `/`.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[expect(
    clippy::unwrap_used,
    reason = "the production host is a valid URL literal"
)]
fn default_base_url() -> Url {
    Url::parse(BINANCE_PAY_HOST).unwrap()
}
