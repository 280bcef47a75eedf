use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token payload.
///
/// The schema is closed: tokens carrying unknown fields or missing any of the
/// three fields fail to decode. There are no scopes or roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SessionClaims {
    /// Principal identifier
    pub user_id: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for `user_id` valid for `ttl` starting at `now`.
    pub fn new(user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expiration = now + ttl;

        Self {
            user_id,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is still valid during the second equal to `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_validity_window() {
        let now = Utc::now();
        let claims = SessionClaims::new(42, now, Duration::hours(24));

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let claims = SessionClaims {
            user_id: 1,
            iat: 0,
            exp: 1000,
        };

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_wire_field_names() {
        let claims = SessionClaims {
            user_id: 7,
            iat: 10,
            exp: 20,
        };

        let value = serde_json::to_value(claims).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "user_id": 7, "iat": 10, "exp": 20 })
        );
    }

    #[test]
    fn test_rejects_unknown_and_missing_fields() {
        let extra = r#"{"user_id":1,"iat":0,"exp":10,"role":"admin"}"#;
        assert!(serde_json::from_str::<SessionClaims>(extra).is_err());

        let missing = r#"{"user_id":1,"iat":0}"#;
        assert!(serde_json::from_str::<SessionClaims>(missing).is_err());

        let wrong_type = r#"{"user_id":"1","iat":0,"exp":10}"#;
        assert!(serde_json::from_str::<SessionClaims>(wrong_type).is_err());
    }
}
