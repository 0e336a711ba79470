//! Session validation
//!
//! Decides whether the local token is the session of the user whose record
//! was fetched. The default compares the token embedded in the record; a
//! server exposing a validation endpoint can answer the question directly.

use async_trait::async_trait;

use super::normalize_token;
use crate::api::{ApiClient, ApiError, User};

/// Outcome of a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// The token belongs to this user id
    Valid(i64),
    /// Stale or foreign token
    Invalid,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }
}

/// Checks a local token against a fetched user record
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    async fn validate(
        &self,
        api: &ApiClient,
        token: &str,
        record: &User,
    ) -> Result<Validation, ApiError>;
}

/// Compares the local token with the token embedded in the record
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTokenValidator;

#[async_trait]
impl SessionValidator for EmbeddedTokenValidator {
    fn name(&self) -> &str {
        "embedded-token"
    }

    async fn validate(
        &self,
        _api: &ApiClient,
        token: &str,
        record: &User,
    ) -> Result<Validation, ApiError> {
        let local = normalize_token(token);
        let embedded = record.token.as_deref().map(normalize_token);

        Ok(match embedded {
            Some(embedded) if !local.is_empty() && embedded == local => Validation::Valid(record.id),
            _ => Validation::Invalid,
        })
    }
}

/// Asks a server endpoint which user the token belongs to
#[derive(Debug, Clone)]
pub struct EndpointValidator {
    path: String,
}

impl EndpointValidator {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl SessionValidator for EndpointValidator {
    fn name(&self) -> &str {
        "endpoint"
    }

    async fn validate(
        &self,
        api: &ApiClient,
        token: &str,
        record: &User,
    ) -> Result<Validation, ApiError> {
        match api.validate_token(&self.path, &normalize_token(token)).await {
            Ok(principal) if principal.id == record.id => Ok(Validation::Valid(principal.id)),
            Ok(_) => Ok(Validation::Invalid),
            Err(e) if e.is_unauthorized() => Ok(Validation::Invalid),
            Err(e) => Err(e),
        }
    }
}
