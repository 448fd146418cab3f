#![allow(dead_code, reason = "each test binary uses a different subset")]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use binance_merchant_sdk::auth::Credentials;
use binance_merchant_sdk::webhook::WebhookHeaders;
use binance_merchant_sdk::{Client, Config};
use httpmock::MockServer;
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey as _;
use rsa::signature::{SignatureEncoding as _, Signer as _};
use sha2::Sha256;

pub const API_KEY: &str = "merchant-api-key";
pub const API_SECRET: &str = "merchant-api-secret";

pub const CERTIFICATES_PATH: &str = "/binancepay/openapi/certificates";
pub const ORDER_PATH: &str = "/binancepay/openapi/v2/order";

pub const MERCHANT_SERIAL: &str = "5c7a2a7a8e0fd0a2b0d1";
pub const ROTATED_SERIAL: &str = "7d91f3a04b6c1e2a9f33";

pub const MERCHANT_PUBLIC_PEM: &str = include_str!("../fixtures/merchant_cert_public.pem");
pub const MERCHANT_PRIVATE_PEM: &str = include_str!("../fixtures/merchant_cert_private.pem");
pub const ROTATED_PUBLIC_PEM: &str = include_str!("../fixtures/rotated_cert_public.pem");
pub const ROTATED_PRIVATE_PEM: &str = include_str!("../fixtures/rotated_cert_private.pem");

pub const WEBHOOK_BODY: &str = r#"{"bizType":"PAY","data":"{\"merchantTradeNo\":\"9825382937292\",\"totalFee\":0.88000000,\"transactTime\":1619508939664,\"currency\":\"USDT\",\"openUserId\":\"1211HS10K81f4273ac031\"}","bizIdStr":"29383937493038367292","bizId":29383937493038367292,"bizStatus":"PAY_SUCCESS"}"#;

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY.to_owned(), API_SECRET.into())
}

pub fn client(server: &MockServer) -> anyhow::Result<Client> {
    Ok(Client::with_config(
        credentials(),
        Config::with_base_url(&server.base_url())?,
    ))
}

pub fn certificates_body(certs: &[(&str, &str)]) -> serde_json::Value {
    let data: Vec<_> = certs
        .iter()
        .map(|(serial, pem)| serde_json::json!({"certSerial": serial, "certPublic": pem}))
        .collect();

    serde_json::json!({
        "status": "SUCCESS",
        "code": "000000",
        "data": data,
        "errorMessage": ""
    })
}

/// Signs a webhook the way the payment gateway does.
pub fn sign_webhook(private_pem: &str, serial: &str, body: &str) -> WebhookHeaders {
    let key = RsaPrivateKey::from_pkcs8_pem(private_pem).expect("fixture private key");
    let signing_key = SigningKey::<Sha256>::new(key);

    let timestamp = "1619508939664".to_owned();
    let nonce = "QFxgNoqyFLyPZyXhGsYdBGwBBlodVkOe".to_owned();
    let message = format!("{timestamp}\n{nonce}\n{body}\n");
    let signature = STANDARD.encode(signing_key.sign(message.as_bytes()).to_bytes());

    WebhookHeaders::new(timestamp, nonce, signature, serial.to_owned())
}
