use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::SessionClaims;
use super::errors::AuthError;
use super::errors::SigningError;

const EXPECTED_ALGORITHM: &str = "HS256";

/// Only the `alg` field matters before the signature is checked.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Session token issuer and verifier.
///
/// Signs `SessionClaims` with HS256 using a process-wide secret. Holds no
/// session state: everything a verifier needs is in the token itself.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `ttl` - Validity window of issued tokens
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, SigningError> {
        if secret.is_empty() {
            return Err(SigningError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_claims_at`.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
            validation,
        })
    }

    /// Issue a token for `user_id`, valid from now until now + ttl.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, user_id: i64) -> Result<String, SigningError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, SigningError> {
        let claims = SessionClaims::new(user_id, now, self.ttl);
        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| SigningError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    /// * `Malformed` - Token structure or claims are invalid
    /// * `UnexpectedAlgorithm` - Header declares anything other than HS256
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `Expired` - Token is past its `exp`
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Validate a token against an explicit Unix timestamp.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<i64, AuthError> {
        self.verify_claims_at(token, now)
            .map(|claims| claims.user_id)
    }

    /// Validate a token against an explicit Unix timestamp and return its claims.
    ///
    /// The declared algorithm is checked before the signing key is touched.
    pub fn verify_claims_at(&self, token: &str, now: i64) -> Result<SessionClaims, AuthError> {
        let declared = declared_algorithm(token)?;
        if declared != EXPECTED_ALGORITHM {
            return Err(AuthError::UnexpectedAlgorithm(declared));
        }

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => AuthError::UnexpectedAlgorithm(declared.clone()),
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now) {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

/// Read the `alg` field of a compact token without verifying anything.
fn declared_algorithm(token: &str) -> Result<String, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments[0].is_empty() || segments[1].is_empty() {
        return Err(AuthError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|e| AuthError::Malformed(format!("header is not base64url: {}", e)))?;

    let header: RawHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| AuthError::Malformed(format!("header is not valid JSON: {}", e)))?;

    Ok(header.alg)
}
