//! API key authentication.
//!
//! Policy:
//! - No key configured (unset or blank `API_KEY`): every request is allowed.
//!   This "auth disabled" mode is intentional but leaves the trigger endpoint
//!   open to anyone who can reach it; a warning is logged at startup.
//! - Key configured: the caller must present it in the API key header or, as
//!   a fallback, in the `api_key` query parameter. When both are present the
//!   header wins, even if only the query parameter holds the right value.

pub mod middleware;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::{ConfigError, SecurityConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("API key is missing")]
    Missing,

    #[error("Invalid API key")]
    Invalid,
}

#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    api_key: Option<String>,
    header_name: HeaderName,
}

impl ApiKeyAuth {
    pub fn new(api_key: Option<String>, header_name: &str) -> Result<Self, ConfigError> {
        let header_name = HeaderName::from_bytes(header_name.trim().as_bytes())
            .map_err(|_| ConfigError::HeaderName(header_name.to_string()))?;
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Ok(Self { api_key, header_name })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.effective_api_key().map(str::to_string),
            &config.api_key_name,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// Decide whether the presented credentials are acceptable.
    ///
    /// The header is taken as raw bytes so a value that is not visible ASCII
    /// still counts as presented (and fails the comparison). Empty values
    /// count as absent.
    pub fn authorize(&self, header: Option<&[u8]>, query: Option<&str>) -> Result<(), AuthError> {
        let Some(expected) = self.api_key.as_deref() else {
            return Ok(());
        };

        let presented = header
            .filter(|value| !value.is_empty())
            .or_else(|| query.map(str::as_bytes).filter(|value| !value.is_empty()))
            .ok_or(AuthError::Missing)?;

        if constant_time_eq(presented, expected.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::Invalid)
        }
    }
}

/// Byte comparison whose running time does not depend on where the inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> ApiKeyAuth {
        ApiKeyAuth::new(Some("s3cret".to_string()), "X-API-Key").unwrap()
    }

    fn check(auth: &ApiKeyAuth, header: Option<&str>, query: Option<&str>) -> Result<(), AuthError> {
        auth.authorize(header.map(str::as_bytes), query)
    }

    #[test]
    fn test_disabled_allows_everything() {
        let auth = ApiKeyAuth::new(None, "X-API-Key").unwrap();
        assert!(!auth.is_enabled());
        assert_eq!(check(&auth, None, None), Ok(()));
        assert_eq!(check(&auth, Some("anything"), Some("else")), Ok(()));

        let blank = ApiKeyAuth::new(Some("  ".to_string()), "X-API-Key").unwrap();
        assert!(!blank.is_enabled());
    }

    #[test]
    fn test_header_or_query() {
        let auth = enabled();
        assert_eq!(check(&auth, Some("s3cret"), None), Ok(()));
        assert_eq!(check(&auth, None, Some("s3cret")), Ok(()));
    }

    #[test]
    fn test_missing_and_wrong_keys() {
        let auth = enabled();
        assert_eq!(check(&auth, None, None), Err(AuthError::Missing));
        assert_eq!(check(&auth, Some(""), Some("")), Err(AuthError::Missing));
        assert_eq!(check(&auth, Some("nope"), None), Err(AuthError::Invalid));
        assert_eq!(check(&auth, None, Some("s3cre")), Err(AuthError::Invalid));
    }

    #[test]
    fn test_header_takes_precedence() {
        let auth = enabled();
        assert_eq!(check(&auth, Some("wrong"), Some("s3cret")), Err(AuthError::Invalid));
        assert_eq!(check(&auth, Some("s3cret"), Some("wrong")), Ok(()));
    }

    #[test]
    fn test_non_ascii_header_still_wins() {
        let auth = enabled();
        assert_eq!(
            auth.authorize(Some(b"wr\xffong".as_slice()), Some("s3cret")),
            Err(AuthError::Invalid)
        );
    }

    #[test]
    fn test_key_compared_verbatim() {
        let auth = ApiKeyAuth::new(Some(" s3cret ".to_string()), "X-API-Key").unwrap();
        assert_eq!(check(&auth, Some(" s3cret "), None), Ok(()));
        assert_eq!(check(&auth, Some("s3cret"), None), Err(AuthError::Invalid));
    }

    #[test]
    fn test_invalid_header_name() {
        let err = ApiKeyAuth::new(None, "not a header").unwrap_err();
        assert!(matches!(err, ConfigError::HeaderName(_)));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
