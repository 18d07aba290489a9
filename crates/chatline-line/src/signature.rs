// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `X-Line-Signature` verification.
//!
//! LINE signs each webhook delivery with HMAC-SHA256 over the raw request
//! body, keyed by the channel secret, and sends the digest base64-encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chatline_core::ChatlineError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verifies webhook bodies against the channel secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    /// HMAC state keyed with the channel secret, cloned per request.
    keyed: HmacSha256,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl WebhookVerifier {
    pub fn new(channel_secret: &str) -> Result<Self, ChatlineError> {
        if channel_secret.is_empty() {
            return Err(ChatlineError::Config(
                "line.channel_secret is required to verify webhooks".into(),
            ));
        }
        let keyed = HmacSha256::new_from_slice(channel_secret.as_bytes())
            .map_err(|e| ChatlineError::Config(format!("invalid channel secret: {e}")))?;
        Ok(Self { keyed })
    }

    /// Checks `signature` against the raw `body`.
    ///
    /// The digest comparison is constant-time.
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<(), ChatlineError> {
        let expected = STANDARD
            .decode(signature.trim())
            .map_err(|_| ChatlineError::InvalidSignature)?;
        self.mac(body)
            .verify_slice(&expected)
            .map_err(|_| ChatlineError::InvalidSignature)
    }

    /// Computes the base64 signature LINE would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        STANDARD.encode(self.mac(body).finalize().into_bytes())
    }

    fn mac(&self, body: &[u8]) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(body);
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trips() {
        let verifier = WebhookVerifier::new("channel-secret").unwrap();
        let body = br#"{"destination":"U0","events":[]}"#;
        let sig = verifier.sign(body);
        assert!(verifier.verify(body, &sig).is_ok());
    }

    #[test]
    fn known_vector() {
        // echo -n 'hello' | openssl dgst -sha256 -hmac 'secret' -binary | base64
        let verifier = WebhookVerifier::new("secret").unwrap();
        assert_eq!(
            verifier.sign(b"hello"),
            "iKqz7ejTrflNJquQ07r9SiCDBww7zOnAFO4EpEOEfAs="
        );
    }

    #[test]
    fn tampered_body_is_rejected() {
        let verifier = WebhookVerifier::new("channel-secret").unwrap();
        let sig = verifier.sign(b"original");
        let err = verifier.verify(b"tampered", &sig).unwrap_err();
        assert!(matches!(err, ChatlineError::InvalidSignature));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let sig = WebhookVerifier::new("a").unwrap().sign(b"body");
        assert!(WebhookVerifier::new("b").unwrap().verify(b"body", &sig).is_err());
    }

    #[test]
    fn non_base64_signature_is_rejected() {
        let verifier = WebhookVerifier::new("s").unwrap();
        assert!(matches!(
            verifier.verify(b"body", "not base64!!"),
            Err(ChatlineError::InvalidSignature)
        ));
    }

    #[test]
    fn empty_secret_is_config_error() {
        assert!(matches!(
            WebhookVerifier::new(""),
            Err(ChatlineError::Config(_))
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let verifier = WebhookVerifier::new("super-secret").unwrap();
        assert!(!format!("{verifier:?}").contains("super-secret"));
    }
}
