//! Counterparty certificates used to check webhook signatures.
//!
//! The store starts empty, is filled from one successful certificate fetch and
//! is only ever replaced wholesale afterwards. It never transitions back to
//! empty, so a failed refresh keeps serving the previous set.

use dashmap::DashMap;
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey as _;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey as _;
use rsa::signature::Verifier as _;
use sha2::Sha256;

use crate::Result;
use crate::error::Error;
use crate::types::{ApiResponse, CertificateRecord};

/// A parsed counterparty public key and the serial it is published under.
#[derive(Clone, Debug)]
pub struct Certificate {
    serial: String,
    verifying_key: VerifyingKey<Sha256>,
}

impl Certificate {
    /// Accepts SPKI (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`) PEM.
    pub fn from_pem(serial: String, pem: &str) -> Result<Self> {
        let pem = format!("{}\n", pem.trim());
        let key = RsaPublicKey::from_public_key_pem(&pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(&pem))
            .map_err(|e| Error::auth(format!("certificate {serial} is not an RSA key: {e}")))?;

        Ok(Self {
            serial,
            verifying_key: VerifyingKey::new(key),
        })
    }

    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        self.verifying_key.as_ref()
    }

    /// RSASSA-PKCS1-v1_5 with SHA-256 over `message`.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::try_from(signature) else {
            return false;
        };

        self.verifying_key.verify(message, &signature).is_ok()
    }
}

impl TryFrom<&CertificateRecord> for Certificate {
    type Error = Error;

    fn try_from(record: &CertificateRecord) -> Result<Self> {
        Self::from_pem(record.cert_serial.clone(), &record.cert_public)
    }
}

#[derive(Debug, Default)]
pub struct CertificateStore {
    certificates: DashMap<String, Certificate>,
}

impl CertificateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.certificates.is_empty()
    }

    #[must_use]
    pub fn get(&self, serial: &str) -> Option<Certificate> {
        self.certificates.get(serial).map(|entry| entry.value().clone())
    }

    #[must_use]
    pub fn serials(&self) -> Vec<String> {
        let mut serials: Vec<_> = self
            .certificates
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        serials.sort_unstable();
        serials
    }

    /// Installs `certificates` and drops every serial not among them.
    ///
    /// New entries go in before stale ones are removed, so concurrent readers
    /// never observe an empty store.
    pub fn replace(&self, certificates: Vec<Certificate>) {
        let serials: Vec<String> = certificates.iter().map(|c| c.serial.clone()).collect();
        for certificate in certificates {
            self.certificates
                .insert(certificate.serial.clone(), certificate);
        }
        self.certificates
            .retain(|serial, _| serials.contains(serial));
    }
}

/// Turns a certificate endpoint response into parsed keys, or an `Auth` error.
///
/// All records must parse; a partially usable response is rejected as a whole.
pub fn parse_response(response: ApiResponse<Vec<CertificateRecord>>) -> Result<Vec<Certificate>> {
    if !response.is_success() {
        return Err(Error::auth(format!(
            "status {} (code {}): {}",
            response.status,
            response.code,
            response.error_message.as_deref().unwrap_or("no error message")
        )));
    }

    let records = response.data.unwrap_or_default();
    if records.is_empty() {
        return Err(Error::auth("response contained no certificates"));
    }

    records.iter().map(Certificate::try_from).collect()
}
