use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{TimestampMilliSeconds, serde_as};
use strum_macros::Display;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Fail,
    /// Any status the gateway adds later; treated like `Fail`.
    #[serde(other)]
    Unknown,
}

/// Envelope shared by every merchant API response.
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub code: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub prepay_id: String,
    pub terminal_type: String,
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    pub expire_time: DateTime<Utc>,
    pub qrcode_link: String,
    pub qr_content: String,
    pub checkout_url: String,
    pub deeplink: String,
    pub universal_url: String,
}

/// One entry of `POST /binancepay/openapi/certificates`.
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// PEM encoded RSA public key.
    pub cert_public: String,
    pub cert_serial: String,
}

impl CertificateRecord {
    #[must_use]
    pub fn new(cert_serial: String, cert_public: String) -> Self {
        Self {
            cert_public,
            cert_serial,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use serde_json::json;

    use super::*;

    #[test]
    fn order_response_should_deserialize() -> anyhow::Result<()> {
        let response: ApiResponse<OrderResult> = serde_json::from_value(json!({
            "status": "SUCCESS",
            "code": "000000",
            "data": {
                "prepayId": "29383937493038367292",
                "terminalType": "APP",
                "expireTime": 1_700_000_600_000_i64,
                "qrcodeLink": "https://public.bnbstatic.com/static/payment/qr.jpg",
                "qrContent": "https://qrservice.dev.com/en/qr/dplkb005181944f84b84aba2430e1177012b.jpg",
                "checkoutUrl": "https://pay.binance.com/checkout/dplk12121112b",
                "deeplink": "bnc://app.binance.com/payment/secpay/xxxxxx",
                "universalUrl": "https://app.binance.com/payment/secpay?_dp=xxx=&linkToken=xxx"
            }
        }))?;

        assert!(response.is_success(), "expected SUCCESS");
        let data = response.data.expect("order data");
        assert_eq!(data.prepay_id, "29383937493038367292");
        assert_eq!(
            data.expire_time,
            Utc.timestamp_millis_opt(1_700_000_600_000).unwrap()
        );
        Ok(())
    }

    #[test]
    fn failed_response_without_data_should_deserialize() -> anyhow::Result<()> {
        let response: ApiResponse<Vec<CertificateRecord>> = serde_json::from_value(json!({
            "status": "FAIL",
            "code": "400002",
            "errorMessage": "Signature for this request is not valid."
        }))?;

        assert!(!response.is_success(), "expected FAIL");
        assert_eq!(response.data, None);
        assert_eq!(
            response.error_message.as_deref(),
            Some("Signature for this request is not valid.")
        );
        Ok(())
    }
}
