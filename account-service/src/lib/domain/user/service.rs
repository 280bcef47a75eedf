use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use secrecy::ExposeSecret;
use secrecy::SecretString;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AccountServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
/// Password hashing and verification run on the blocking thread pool.
pub struct AccountService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AccountService<UR>
where
    UR: UserRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

impl<UR> AccountService<UR>
where
    UR: UserRepository,
{
    /// Fail a login with no stored hash after the same hashing work as a
    /// wrong password.
    async fn reject_unknown(&self, password: SecretString) -> UserError {
        let authenticator = Arc::clone(&self.authenticator);

        if let Err(e) = tokio::task::spawn_blocking(move || {
            authenticator.reject_unknown(password.expose_secret())
        })
        .await
        {
            tracing::error!(error = %e, "Verification task failed");
        }

        UserError::InvalidCredentials
    }
}

#[async_trait]
impl<UR> AccountServicePort for AccountService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<PublicUser, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;

        let password_hash = tokio::task::spawn_blocking(move || {
            authenticator.hash_password(password.expose_secret())
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))??;

        let user = self
            .repository
            .insert(NewUser {
                username: command.username,
                email: command.email,
                password_hash: PasswordHash::new(password_hash),
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "New user registered"
        );

        Ok(user.into())
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let password = command.password;

        let Ok(email) = EmailAddress::new(command.email) else {
            tracing::debug!("Login rejected: email is not well-formed");
            return Err(self.reject_unknown(password).await);
        };

        let Some(user) = self.repository.find_by_email(&email).await? else {
            tracing::warn!(email = %email, "Login rejected: no matching account");
            return Err(self.reject_unknown(password).await);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let user_id = user.id;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(
                password.expose_secret(),
                stored_hash.as_str(),
                user_id.0,
            )
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?;

        let authenticated = result.map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::warn!(user_id = %user_id, "Login rejected: password mismatch");
                UserError::InvalidCredentials
            }
            AuthenticationError::PasswordError(err) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %err,
                    "Stored password hash is unusable"
                );
                UserError::Hashing(err)
            }
            AuthenticationError::SigningError(err) => {
                tracing::error!(user_id = %user_id, error = %err, "Token generation failed");
                UserError::Signing(err)
            }
        })?;

        tracing::info!(user_id = %user_id, "Login successful, token issued");

        Ok(LoginOutcome {
            token: authenticated.access_token,
            user: user.into(),
        })
    }

    async fn current_user(&self, id: &UserId) -> Result<PublicUser, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn check_store(&self) -> Result<(), UserError> {
        self.repository.ping().await
    }
}
