//! Inbound webhook signature checks.
//!
//! Verification works on the raw request body exactly as received. Parsing
//! and re-serializing the JSON first would change key order or whitespace and
//! break every signature.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::HeaderMap;

use crate::Result;
use crate::auth::{self, CERTIFICATE_SN, NONCE, SIGNATURE, TIMESTAMP};
use crate::certificates::CertificateStore;
use crate::error::Error;

/// The protocol headers of one webhook delivery.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub timestamp: String,
    pub nonce: String,
    /// Base64 RSA signature.
    pub signature: String,
    pub certificate_sn: String,
}

impl WebhookHeaders {
    #[must_use]
    pub fn new(timestamp: String, nonce: String, signature: String, certificate_sn: String) -> Self {
        Self {
            timestamp,
            nonce,
            signature,
            certificate_sn,
        }
    }

    /// Reads the four `binancepay-*` headers. Lookup is case-insensitive.
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self> {
        let get = |name: &str| -> Result<String> {
            let value = headers
                .get(name)
                .ok_or_else(|| Error::validation(format!("missing header {name}")))?;
            let value = value
                .to_str()
                .map_err(|e| Error::validation(format!("header {name} is not ASCII: {e}")))?;
            Ok(value.to_owned())
        };

        Ok(Self {
            timestamp: get(TIMESTAMP)?,
            nonce: get(NONCE)?,
            signature: get(SIGNATURE)?,
            certificate_sn: get(CERTIFICATE_SN)?,
        })
    }

    /// The bytes the sender signed for `raw_body`.
    #[must_use]
    pub fn canonical_message(&self, raw_body: &[u8]) -> Vec<u8> {
        auth::to_message(&self.timestamp, &self.nonce, raw_body)
    }
}

/// Checks one delivery against the cached certificates without any I/O.
///
/// Only the certificate named by `certificate_sn` is tried. Unknown serials,
/// undecodable signatures and mismatches all yield `false`.
#[must_use]
pub fn verify(store: &CertificateStore, headers: &WebhookHeaders, raw_body: &[u8]) -> bool {
    let Some(certificate) = store.get(&headers.certificate_sn) else {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            serial = %headers.certificate_sn,
            known = ?store.serials(),
            "unknown certificate serial"
        );
        return false;
    };

    let Ok(signature) = STANDARD.decode(headers.signature.trim()) else {
        #[cfg(feature = "tracing")]
        tracing::warn!(serial = %headers.certificate_sn, "webhook signature is not base64");
        return false;
    };

    let verified = certificate.verify(&headers.canonical_message(raw_body), &signature);

    if !verified {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            serial = %headers.certificate_sn,
            nonce = %headers.nonce,
            "webhook signature mismatch"
        );
    }

    verified
}
