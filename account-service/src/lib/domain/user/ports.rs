use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created user without its password hash
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username or email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<PublicUser, UserError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Session token and the authenticated user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Hashing` - Stored hash is malformed
    /// * `Signing` - Token generation failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError>;

    /// Retrieve the account of an authenticated principal.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn current_user(&self, id: &UserId) -> Result<PublicUser, UserError>;

    /// Check that the credential store is reachable.
    async fn check_store(&self) -> Result<(), UserError>;
}

/// Persistence operations for credential records.
///
/// Uniqueness of username and email is the store's responsibility.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new credential record.
    ///
    /// # Arguments
    /// * `user` - Record to insert
    ///
    /// # Returns
    /// Stored record with its assigned id and creation timestamp
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username or email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve a record by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve a record by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Round-trip to the store without touching any record.
    ///
    /// # Errors
    /// * `DatabaseError` - Store is unreachable
    async fn ping(&self) -> Result<(), UserError>;
}
