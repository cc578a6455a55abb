//! LINE webhook signature verification.
//!
//! LINE signs every webhook delivery with HMAC-SHA256 over the raw request
//! body, keyed by the channel secret, and sends the base64 digest in the
//! `x-line-signature` header.
//! Reference: https://developers.line.biz/en/docs/messaging-api/receiving-messages/#verify-signature

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header missing")]
    Missing,
    #[error("signature header is not valid base64")]
    Malformed,
    #[error("signature does not match body")]
    Mismatch,
}

/// Verify a LINE webhook signature.
///
/// `body` must be the bytes exactly as received. Re-serializing a parsed
/// payload changes its layout and will not verify.
///
/// # Arguments
///
/// * `channel_secret` - The channel secret from the LINE console
/// * `body` - Raw request body
/// * `signature` - Value of the `x-line-signature` header, if present
pub fn verify_line_signature(
    channel_secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), SignatureError> {
    let signature = match signature.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            warn!(body_length = body.len(), "line_signature_missing");
            return Err(SignatureError::Missing);
        }
    };

    let provided = STANDARD.decode(signature).map_err(|_| {
        warn!(signature_length = signature.len(), "line_signature_malformed");
        SignatureError::Malformed
    })?;

    let mut mac = keyed_mac(channel_secret);
    mac.update(body);

    // verify_slice compares in constant time
    mac.verify_slice(&provided).map_err(|_| {
        warn!(
            body_length = body.len(),
            decoded_length = provided.len(),
            "line_signature_mismatch"
        );
        SignatureError::Mismatch
    })
}

fn keyed_mac(channel_secret: &str) -> HmacSha256 {
    // HMAC takes keys of any length, including empty
    HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts keys of any length")
}

#[cfg(test)]
pub(crate) fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = keyed_mac(channel_secret);
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}
