use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;

/// Password half of the Basic auth pair when authenticating with an API token.
const API_TOKEN_PASSWORD: &str = "api_token";

/// An API token for the Toggl v8 API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_token: String,
}

impl Credentials {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// Value for the `Authorization` header: the token is the username and
    /// the literal `api_token` is the password.
    pub fn as_authorization_header(&self) -> String {
        let pair = format!("{}:{}", self.api_token, API_TOKEN_PASSWORD);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

// Keep the token out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_header_uses_token_as_username() {
        let credentials = Credentials::new("abc123");
        // base64("abc123:api_token")
        assert_eq!(
            credentials.as_authorization_header(),
            "Basic YWJjMTIzOmFwaV90b2tlbg=="
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let credentials = Credentials::new("secret-token");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret-token"));
    }
}
