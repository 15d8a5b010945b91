//! Authentication provider for the EduLake client.
//!
//! Attaches the appropriate Authorization header to remote store requests.
//! The provider is read-only after construction and safe to share across
//! concurrent query executions.

use base64::{engine::general_purpose, Engine as _};

/// Credentials for the remote columnar store.
///
/// # Examples
///
/// ```rust
/// use edulake_link::AuthProvider;
///
/// // API token (Authorization: Bearer)
/// let auth = AuthProvider::bearer_token("sk-...".to_string());
///
/// // HTTP Basic Auth
/// let auth = AuthProvider::basic_auth("analyst".to_string(), "secret".to_string());
///
/// // No authentication (local development)
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// HTTP Basic Auth (username, password)
    BasicAuth(String, String),

    /// Bearer token authentication
    BearerToken(String),

    /// No authentication
    None,
}

impl AuthProvider {
    /// Create HTTP Basic Auth credentials.
    pub fn basic_auth(username: String, password: String) -> Self {
        Self::BasicAuth(username, password)
    }

    /// Create bearer token credentials.
    pub fn bearer_token(token: String) -> Self {
        Self::BearerToken(token)
    }

    /// No authentication.
    pub fn none() -> Self {
        Self::None
    }

    /// Attach the Authorization header to an HTTP request builder.
    ///
    /// - BasicAuth: `Authorization: Basic <base64(username:password)>` (RFC 7617)
    /// - BearerToken: `Authorization: Bearer <token>`
    /// - None: no header
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::BasicAuth(username, password) => {
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                request.header("Authorization", format!("Basic {}", encoded))
            }
            Self::BearerToken(token) => request.bearer_auth(token),
            Self::None => request,
        }
    }

    /// Check if authentication is configured.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_creation() {
        let basic = AuthProvider::basic_auth("analyst".to_string(), "secret".to_string());
        assert!(basic.is_authenticated());

        let token = AuthProvider::bearer_token("sk-test".to_string());
        assert!(token.is_authenticated());

        let none = AuthProvider::none();
        assert!(!none.is_authenticated());
    }

    #[test]
    fn test_basic_auth_base64_format() {
        let credentials = format!("{}:{}", "analyst", "secret123");
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        assert_eq!(encoded, "YW5hbHlzdDpzZWNyZXQxMjM=");
    }
}
