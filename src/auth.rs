use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use hmac::{Hmac, Mac as _};
use rand::{Rng, RngCore};
use reqwest::header::{self, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use sha2::Sha512;

use crate::error::Error;
use crate::{Result, Timestamp};

pub const TIMESTAMP: &str = "binancepay-timestamp";
pub const NONCE: &str = "binancepay-nonce";
pub const CERTIFICATE_SN: &str = "binancepay-certificate-sn";
pub const SIGNATURE: &str = "binancepay-signature";

pub const NONCE_LEN: usize = 32;
const NONCE_ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Merchant API key pair. The key doubles as the certificate serial on outbound requests.
#[derive(Clone, Debug)]
pub struct Credentials {
    key: String,
    secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(key: String, secret: SecretString) -> Self {
        Self { key, secret }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Single-use 32 letter token mixed into every signed message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Nonce(String);

impl Nonce {
    /// Draws each character independently and uniformly from `[a-zA-Z]`.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let nonce = (0..NONCE_LEN)
            .map(|_| char::from(NONCE_ALPHABET[rng.random_range(0..NONCE_ALPHABET.len())]))
            .collect();
        Self(nonce)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Nonce {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != NONCE_LEN || !s.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::validation(format!(
                "nonce must be {NONCE_LEN} ASCII letters, got `{s}`"
            )));
        }
        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies the nonce for each outbound request.
pub trait NonceSource: fmt::Debug + Send + Sync {
    fn next_nonce(&self) -> Nonce;
}

/// Default source backed by the thread-local CSPRNG.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngNonces;

impl NonceSource for ThreadRngNonces {
    fn next_nonce(&self) -> Nonce {
        Nonce::generate(&mut rand::rng())
    }
}

/// Wraps a caller-provided generator, e.g. a seeded `StdRng` for reproducible nonces.
#[derive(Debug)]
pub struct SeededNonces<R> {
    rng: Mutex<R>,
}

impl<R: RngCore + Send> SeededNonces<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R: RngCore + Send + fmt::Debug> NonceSource for SeededNonces<R> {
    fn next_nonce(&self) -> Nonce {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Nonce::generate(&mut *rng)
    }
}

/// Authentication headers for one outbound request.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedHeaders {
    pub timestamp: String,
    pub nonce: Nonce,
    pub certificate_sn: String,
    pub signature: String,
}

impl SignedHeaders {
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();

        map.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        map.insert(TIMESTAMP, self.timestamp.parse()?);
        map.insert(NONCE, self.nonce.as_str().parse()?);
        map.insert(CERTIFICATE_SN, self.certificate_sn.parse()?);
        map.insert(SIGNATURE, self.signature.parse()?);

        Ok(map)
    }
}

/// A payload serialized exactly once, together with the headers that sign those bytes.
///
/// `body` is what goes on the wire. Sending anything else invalidates `headers`.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct SignedRequest {
    pub headers: SignedHeaders,
    pub body: String,
}

/// Serializes `payload` and signs it for the given timestamp and nonce.
pub fn sign<T: Serialize + ?Sized>(
    credentials: &Credentials,
    payload: &T,
    timestamp: Timestamp,
    nonce: Nonce,
) -> Result<SignedRequest> {
    let body = serde_json::to_string(payload)
        .map_err(|e| Error::validation(format!("unable to serialize payload: {e}")))?;

    sign_body(credentials, body, timestamp, nonce)
}

/// Signs an already serialized body verbatim.
pub fn sign_body(
    credentials: &Credentials,
    body: String,
    timestamp: Timestamp,
    nonce: Nonce,
) -> Result<SignedRequest> {
    let timestamp = timestamp.to_string();
    let message = to_message(&timestamp, nonce.as_str(), body.as_bytes());
    let signature = hmac(&credentials.secret, &message)?;

    Ok(SignedRequest {
        headers: SignedHeaders {
            timestamp,
            nonce,
            certificate_sn: credentials.key.clone(),
            signature,
        },
        body,
    })
}

/// `timestamp \n nonce \n body \n`, shared by outbound signing and webhook verification.
pub(crate) fn to_message(timestamp: &str, nonce: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(timestamp.len() + nonce.len() + body.len() + 3);
    message.extend_from_slice(timestamp.as_bytes());
    message.push(b'\n');
    message.extend_from_slice(nonce.as_bytes());
    message.push(b'\n');
    message.extend_from_slice(body);
    message.push(b'\n');
    message
}

/// Uppercase hex HMAC-SHA512 of `message` keyed by the API secret.
pub(crate) fn hmac(secret: &SecretString, message: &[u8]) -> Result<String> {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| Error::validation(format!("unusable API secret: {e}")))?;
    mac.update(message);

    Ok(hex::encode_upper(mac.finalize().into_bytes()))
}
