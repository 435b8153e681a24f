//! Request identity
//!
//! Authentication itself is an external collaborator: an upstream gateway
//! authenticates the caller and injects the resulting identity as request
//! headers. This module only lifts those headers into a typed [`Principal`];
//! requests without one are rejected with 401 by the extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::Error;

/// Header carrying the authenticated user id, set by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's email, set by the gateway.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated identity associated with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }

    /// Default display name derived from the email local-part:
    /// `lemoncake@example.com` becomes `lemoncake`.
    pub fn default_display_name(&self) -> String {
        local_part(&self.email).to_string()
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (header(USER_ID_HEADER), header(USER_EMAIL_HEADER)) {
            (Some(user_id), Some(email)) => Ok(Self { user_id, email }),
            _ => Err(Error::Unauthorized("Authorization required".to_string())),
        }
    }
}
