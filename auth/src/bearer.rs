use crate::jwt::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// # Errors
/// * `MissingCredential` - Header absent, not a bearer credential, or empty token
pub fn extract_bearer(authorization: Option<&str>) -> Result<&str, AuthError> {
    let token = authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingCredential)?;

    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_rejects_other_carriers() {
        for header in [
            None,
            Some(""),
            Some("Bearer "),
            Some("Basic dXNlcjpwdw=="),
            Some("abc.def.ghi"),
            Some("bearer abc"),
        ] {
            assert_eq!(
                extract_bearer(header),
                Err(AuthError::MissingCredential),
                "header {:?}",
                header
            );
        }
    }
}
