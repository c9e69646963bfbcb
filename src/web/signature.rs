//! HMAC-SHA256 webhook signatures, in the `sha256=<hex>` header form.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::TransportError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PREFIX: &str = "sha256=";

fn keyed(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}

/// Signature header value for `payload` under `secret`
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = keyed(secret);
    mac.update(payload);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

/// Check a signature header value against `payload`.
///
/// The comparison is constant-time.
pub fn verify(secret: &str, payload: &[u8], header: Option<&str>) -> Result<(), TransportError> {
    let header = header.ok_or(TransportError::MissingSignature)?;
    let digest = header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or(TransportError::InvalidSignature)?;
    let expected = hex::decode(digest).map_err(|_| TransportError::InvalidSignature)?;

    let mut mac = keyed(secret);
    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| TransportError::InvalidSignature)
}
