use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderValue;
use reqwest::header::{AUTHORIZATION, HeaderName};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur while turning credentials into a header.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthenticationError {
    /// Bearer token contains invalid characters for HTTP headers.
    #[display("Bearer token contains invalid characters: {message}")]
    InvalidBearerToken {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// Basic authentication username contains invalid characters.
    #[display("Basic auth username contains invalid characters: {message}")]
    InvalidUsername {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// Tenant identifier contains invalid characters.
    #[display("Tenant id contains invalid characters: {message}")]
    InvalidTenant {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// Basic authentication password contains invalid characters.
    #[display("Basic auth password contains invalid characters: {message}")]
    InvalidPassword {
        /// Description of the invalid characters or format issue.
        message: String,
    },
}

/// Secure wrapper for sensitive string data that zeroes its memory on drop.
///
/// Never printed in full: `Debug` shows `[REDACTED]`, `Display` a masked form.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn mask_sensitive(value: &str) -> String {
        let chars = value.chars().collect::<Vec<_>>();
        if chars.len() <= 8 {
            return "***".to_string();
        }
        let head = chars.iter().take(4).collect::<String>();
        let tail = chars.iter().skip(chars.len() - 4).collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Credentials sent with every request.
///
/// # Examples
///
/// ```rust
/// use c8y_core::Authentication;
///
/// // Bearer token (e.g. an OAI-Secure token or a device token)
/// let auth = Authentication::Bearer("my-api-token".into());
///
/// // Basic authentication, tenant qualified: `t12345/alice`
/// let auth = Authentication::Basic {
///     tenant: Some("t12345".to_string()),
///     username: "alice".to_string(),
///     password: "secret".into(),
/// };
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authentication {
    /// Adds `Authorization: Bearer <token>`.
    Bearer(SecureString),

    /// Adds `Authorization: Basic <base64([tenant/]username:password)>`.
    Basic {
        /// Tenant id prefixed to the username, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tenant: Option<String>,
        /// The username.
        username: String,
        /// The password.
        password: SecureString,
    },
}

impl Authentication {
    /// Converts the credentials into an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError` if the credentials contain characters
    /// that cannot appear in the header.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), AuthenticationError> {
        match self {
            Self::Bearer(token) => {
                let header_value = format!("Bearer {}", token.as_str());
                let value = HeaderValue::from_str(&header_value).map_err(|err| {
                    AuthenticationError::InvalidBearerToken {
                        message: err.to_string(),
                    }
                })?;
                Ok((AUTHORIZATION, value))
            }

            Self::Basic {
                tenant,
                username,
                password,
            } => {
                if username.contains(':') {
                    return Err(AuthenticationError::InvalidUsername {
                        message: "Username cannot contain colon (:) character".to_string(),
                    });
                }

                let login = match tenant {
                    Some(tenant) if tenant.contains(['/', ':']) => {
                        return Err(AuthenticationError::InvalidTenant {
                            message: "Tenant id cannot contain '/' or ':'".to_string(),
                        });
                    }
                    Some(tenant) => format!("{tenant}/{username}"),
                    None => username.clone(),
                };

                let credentials = STANDARD.encode(format!("{login}:{}", password.as_str()));

                let value = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(
                    |err| AuthenticationError::InvalidPassword {
                        message: err.to_string(),
                    },
                )?;
                Ok((AUTHORIZATION, value))
            }
        }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::Basic {
                tenant, username, ..
            } => f
                .debug_struct("Basic")
                .field("tenant", tenant)
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer {token}"),
            Self::Basic {
                tenant: Some(tenant),
                username,
                ..
            } => write!(f, "Basic (username: {tenant}/{username})"),
            Self::Basic { username, .. } => write!(f, "Basic (username: {username})"),
        }
    }
}
