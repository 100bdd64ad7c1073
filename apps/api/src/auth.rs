//! Install tokens — stateless, HMAC-signed client credentials.
//!
//! Token format: `base64url(claims JSON) "." base64url(HMAC-SHA256(claims JSON))`,
//! both segments unpadded. There is no server-side token store and no revocation
//! list: verification is a pure function of the token string, the signing secret,
//! and the clock. Clients persist the token and re-register on 401.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: u8 = 1;
const TOKEN_TTL_DAYS: i64 = 90;
/// Tolerated forward clock drift between issuer and verifier.
const MAX_CLOCK_SKEW_SECS: i64 = 60;
const NONCE_BYTES: usize = 16;
/// Entropy floor: nonces below 8 bytes (16 hex chars) are rejected.
const MIN_NONCE_HEX_CHARS: usize = 16;

/// Why a token was rejected. The gateway maps every variant to HTTP 401 and
/// logs only `reason_code()` — never the token or the secret.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header missing or not a bearer token")]
    Missing,

    #[error("token is not two base64url segments")]
    Format,

    #[error("token signature mismatch")]
    Signature,

    #[error("token claims are malformed")]
    Payload,

    #[error("token expired")]
    Expired,

    #[error("token issued too far in the future")]
    IssuedInFuture,

    #[error("token nonce below entropy floor")]
    WeakNonce,
}

impl AuthError {
    /// Short machine-readable reason for structured logs.
    pub fn reason_code(&self) -> &'static str {
        match self {
            AuthError::Missing => "missing",
            AuthError::Format => "format",
            AuthError::Signature => "sig",
            AuthError::Payload => "payload",
            AuthError::Expired => "expired",
            AuthError::IssuedInFuture => "iat",
            AuthError::WeakNonce => "jti",
        }
    }
}

/// Signed token claims. Field names follow JWT registered-claim conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub v: u8,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Random per-token nonce, hex. Doubles as the rate-limit identity.
    pub jti: String,
}

/// A freshly issued token plus its expiry for the client response.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Issues and verifies install tokens against a single HMAC-SHA256 secret.
#[derive(Clone)]
pub struct TokenAuthenticator {
    secret: Vec<u8>,
}

impl TokenAuthenticator {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issues a new token valid for 90 days.
    pub fn issue(&self) -> IssuedToken {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            v: TOKEN_VERSION,
            iat: now,
            exp: now + TOKEN_TTL_DAYS * 24 * 60 * 60,
            jti: random_nonce_hex(),
        };
        IssuedToken {
            expires_at: claims.exp,
            token: self.encode(&claims),
        }
    }

    /// Verifies a token string, returning its claims or a typed rejection.
    ///
    /// Check order: format → signature → claims parse → expiry → clock skew →
    /// nonce entropy. The signature is checked before the payload is parsed so
    /// unauthenticated bytes never reach the JSON parser's error paths, and the
    /// comparison is constant-time.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (payload_b64, sig_b64) = token.split_once('.').ok_or(AuthError::Format)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::Format)?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| AuthError::Format)?;

        let expected = self.sign(&payload);
        let sig_ok: bool = expected.as_slice().ct_eq(sig.as_slice()).into();
        if !sig_ok {
            return Err(AuthError::Signature);
        }

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::Payload)?;

        if claims.v != TOKEN_VERSION {
            return Err(AuthError::Payload);
        }

        let now = Utc::now().timestamp();
        if claims.exp < now {
            return Err(AuthError::Expired);
        }
        if claims.iat > now + MAX_CLOCK_SKEW_SECS {
            return Err(AuthError::IssuedInFuture);
        }
        if claims.jti.len() < MIN_NONCE_HEX_CHARS {
            return Err(AuthError::WeakNonce);
        }

        Ok(claims)
    }

    fn encode(&self, claims: &TokenClaims) -> String {
        let payload = serde_json::to_vec(claims).expect("token claims serialize to JSON");
        let sig = self.sign(&payload);
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(sig)
        )
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

fn random_nonce_hex() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> TokenAuthenticator {
        TokenAuthenticator::new("test-signing-secret-not-for-production")
    }

    fn claims_with(iat: i64, exp: i64, jti: &str) -> TokenClaims {
        TokenClaims {
            v: TOKEN_VERSION,
            iat,
            exp,
            jti: jti.to_string(),
        }
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let auth = authenticator();
        let issued = auth.issue();
        let claims = auth.verify(&issued.token).expect("fresh token verifies");
        assert_eq!(claims.v, TOKEN_VERSION);
        assert_eq!(claims.exp, issued.expires_at);
        assert_eq!(claims.jti.len(), NONCE_BYTES * 2);
    }

    #[test]
    fn test_expiry_is_90_days_out() {
        let auth = authenticator();
        let issued = auth.issue();
        let now = Utc::now().timestamp();
        let ninety_days = 90 * 24 * 60 * 60;
        assert!((issued.expires_at - now - ninety_days).abs() <= 5);
    }

    #[test]
    fn test_tokens_have_unique_nonces() {
        let auth = authenticator();
        let a = auth.verify(&auth.issue().token).unwrap();
        let b = auth.verify(&auth.issue().token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_missing_dot_rejected_as_format() {
        let auth = authenticator();
        assert_eq!(auth.verify("nodothere"), Err(AuthError::Format));
    }

    #[test]
    fn test_garbage_base64_rejected_as_format() {
        let auth = authenticator();
        assert_eq!(auth.verify("!!!.???"), Err(AuthError::Format));
    }

    #[test]
    fn test_empty_string_rejected() {
        let auth = authenticator();
        assert!(auth.verify("").is_err());
    }

    #[test]
    fn test_tampered_payload_rejected_as_sig() {
        let auth = authenticator();
        let token = auth.issue().token;
        let (_, sig) = token.split_once('.').unwrap();
        let forged_payload =
            URL_SAFE_NO_PAD.encode(br#"{"v":1,"iat":0,"exp":99999999999,"jti":"aaaabbbbccccdddd"}"#);
        let forged = format!("{forged_payload}.{sig}");
        assert_eq!(auth.verify(&forged), Err(AuthError::Signature));
    }

    #[test]
    fn test_tampered_signature_rejected_as_sig() {
        let auth = authenticator();
        let token = auth.issue().token;
        let (payload, _) = token.split_once('.').unwrap();
        let forged = format!("{payload}.{}", URL_SAFE_NO_PAD.encode(b"not-a-real-signature"));
        assert_eq!(auth.verify(&forged), Err(AuthError::Signature));
    }

    #[test]
    fn test_token_from_other_secret_rejected_as_sig() {
        let auth = authenticator();
        let other = TokenAuthenticator::new("a-different-secret");
        let token = other.issue().token;
        assert_eq!(auth.verify(&token), Err(AuthError::Signature));
    }

    #[test]
    fn test_signed_non_json_payload_rejected_as_payload() {
        let auth = authenticator();
        let token = auth_encode_raw(&auth, b"this is not json");
        assert_eq!(auth.verify(&token), Err(AuthError::Payload));
    }

    #[test]
    fn test_wrong_version_rejected_as_payload() {
        let auth = authenticator();
        let now = Utc::now().timestamp();
        let mut claims = claims_with(now, now + 3600, "aaaabbbbccccdddd");
        claims.v = 2;
        assert_eq!(auth.verify(&auth.encode(&claims)), Err(AuthError::Payload));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = authenticator();
        let now = Utc::now().timestamp();
        let claims = claims_with(now - 7200, now - 3600, "aaaabbbbccccdddd");
        assert_eq!(auth.verify(&auth.encode(&claims)), Err(AuthError::Expired));
    }

    #[test]
    fn test_future_iat_beyond_skew_rejected() {
        let auth = authenticator();
        let now = Utc::now().timestamp();
        let claims = claims_with(now + 3600, now + 7200, "aaaabbbbccccdddd");
        assert_eq!(
            auth.verify(&auth.encode(&claims)),
            Err(AuthError::IssuedInFuture)
        );
    }

    #[test]
    fn test_iat_within_skew_accepted() {
        let auth = authenticator();
        let now = Utc::now().timestamp();
        let claims = claims_with(now + 30, now + 7200, "aaaabbbbccccdddd");
        assert!(auth.verify(&auth.encode(&claims)).is_ok());
    }

    #[test]
    fn test_short_nonce_rejected() {
        let auth = authenticator();
        let now = Utc::now().timestamp();
        let claims = claims_with(now, now + 3600, "abcd1234");
        assert_eq!(auth.verify(&auth.encode(&claims)), Err(AuthError::WeakNonce));
    }

    #[test]
    fn test_reason_codes_are_stable() {
        assert_eq!(AuthError::Missing.reason_code(), "missing");
        assert_eq!(AuthError::Format.reason_code(), "format");
        assert_eq!(AuthError::Signature.reason_code(), "sig");
        assert_eq!(AuthError::Payload.reason_code(), "payload");
        assert_eq!(AuthError::Expired.reason_code(), "expired");
        assert_eq!(AuthError::IssuedInFuture.reason_code(), "iat");
        assert_eq!(AuthError::WeakNonce.reason_code(), "jti");
    }

    /// Signs an arbitrary payload with the authenticator's secret, bypassing
    /// claims serialization. Lets tests exercise the payload-parse rejection.
    fn auth_encode_raw(auth: &TokenAuthenticator, payload: &[u8]) -> String {
        let sig = auth.sign(payload);
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(sig)
        )
    }
}
