pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::SessionClaims;
pub use errors::AuthError;
pub use errors::SigningError;
pub use handler::JwtHandler;
