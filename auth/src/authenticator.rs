use std::sync::OnceLock;

use chrono::Duration;

use crate::bearer::extract_bearer;
use crate::jwt::AuthError;
use crate::jwt::JwtHandler;
use crate::jwt::SigningError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Built once at startup and shared read-only between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    // Hash of a fixed throwaway password, produced by `password_hasher`.
    dummy_hash: OnceLock<Option<String>>,
}

const DUMMY_PASSWORD: &str = "no-such-account";

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Signing error: {0}")]
    SigningError(#[from] SigningError),
}

impl Authenticator {
    /// Create a new authenticator with the default password work factor.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Validity window of issued tokens
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Result<Self, SigningError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret, token_ttl)?,
            dummy_hash: OnceLock::new(),
        })
    }

    /// Replace the password hasher, e.g. to apply a configured work factor.
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self.dummy_hash = OnceLock::new();
        self
    }

    /// Token issuer and verifier.
    pub fn jwt_handler(&self) -> &JwtHandler {
        &self.jwt_handler
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate a session token for `user_id`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `SigningError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(user_id)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Spend one password verification when there is no stored hash to check.
    ///
    /// Always ends in `InvalidCredentials`, after the same Argon2 work as a
    /// real mismatch, so a rejected login does not reveal whether the
    /// account exists.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let dummy_hash = self
            .dummy_hash
            .get_or_init(|| self.password_hasher.hash(DUMMY_PASSWORD).ok());

        if let Some(hash) = dummy_hash {
            let _ = self.password_hasher.verify(password, hash);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Generate a session token without password verification.
    pub fn generate_token(&self, user_id: i64) -> Result<String, SigningError> {
        self.jwt_handler.issue(user_id)
    }

    /// Validate a session token and return its subject.
    pub fn validate_token(&self, token: &str) -> Result<i64, AuthError> {
        self.jwt_handler.verify(token)
    }

    /// Validate the value of an `Authorization` header.
    ///
    /// # Errors
    /// * `MissingCredential` - No bearer token was presented
    /// * any other `AuthError` from token validation
    pub fn authorize(&self, authorization: Option<&str>) -> Result<i64, AuthError> {
        let token = extract_bearer(authorization)?;
        self.jwt_handler.verify(token)
    }
}
