use std::fmt::Debug;

use http::Uri;
use http::uri::{PathAndQuery, Scheme};
use url::Url;

use super::{ApiClient, ApiClientError, Authentication, ProcessingMode};

/// Builder for [`ApiClient`].
///
/// Defaults to `https://127.0.0.1` without credentials.
///
/// # Example
///
/// ```rust
/// use c8y_core::{ApiClient, Authentication, ProcessingMode};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_host("t12345.cumulocity.com")
///     .with_authentication(Authentication::Basic {
///         tenant: Some("t12345".to_string()),
///         username: "alice".to_string(),
///         password: "secret".into(),
///     })
///     .with_processing_mode(ProcessingMode::Transient)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    client: reqwest::Client,
    scheme: Scheme,
    host: String,
    port: Option<u16>,
    base_path: Option<PathAndQuery>,
    authentication: Option<Authentication>,
    processing_mode: Option<ProcessingMode>,
}

impl ApiClientBuilder {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheme, host and port do not form a valid URI.
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            client,
            scheme,
            host,
            port,
            base_path,
            authentication,
            processing_mode,
        } = self;

        let authority = match port {
            Some(port) => format!("{host}:{port}"),
            None => host,
        };
        let builder = Uri::builder().scheme(scheme).authority(authority);
        let builder = if let Some(path) = &base_path {
            builder.path_and_query(path.path())
        } else {
            builder.path_and_query("/")
        };
        let base_uri = builder.build()?;

        Ok(ApiClient {
            client,
            base_uri,
            authentication,
            processing_mode,
        })
    }

    /// Sets scheme, host, port and base path from a tenant URL such as
    /// `https://t12345.cumulocity.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed, has no host, or uses a
    /// scheme other than `http` and `https`.
    pub fn with_base_url(self, base_url: &str) -> Result<Self, ApiClientError> {
        let url = base_url.parse::<Url>()?;
        let Some(host) = url.host_str() else {
            return Err(ApiClientError::InvalidBasePath {
                error: format!("missing host in '{base_url}'"),
            });
        };
        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(ApiClientError::InvalidBasePath {
                    error: format!("unsupported scheme '{other}' in '{base_url}'"),
                });
            }
        };

        let builder = self.with_scheme(scheme).with_host(host);
        let builder = match url.port() {
            Some(port) => builder.with_port(port),
            None => builder,
        };
        match url.path() {
            "/" | "" => Ok(builder),
            path => builder.with_base_path(path.to_string()),
        }
    }

    /// Sets the scheme. Defaults to `https`.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the host name, e.g. the tenant domain.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port. Without it, the scheme default is used.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets a path prefix for every request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::InvalidBasePath`] if the path cannot be
    /// parsed as a URI path.
    pub fn with_base_path<P>(mut self, base_path: P) -> Result<Self, ApiClientError>
    where
        P: TryInto<PathAndQuery>,
        P::Error: Debug + 'static,
    {
        let base_path = base_path
            .try_into()
            .map_err(|err| ApiClientError::InvalidBasePath {
                error: format!("{err:?}"),
            })?;
        self.base_path = Some(base_path);
        Ok(self)
    }

    /// Sets the credentials sent with every request.
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Sets the default processing mode of every request.
    pub fn with_processing_mode(mut self, mode: ProcessingMode) -> Self {
        self.processing_mode = Some(mode);
        self
    }

    /// Uses a preconfigured HTTP client (timeouts, proxies, TLS, ...).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            scheme: Scheme::HTTPS,
            host: "127.0.0.1".to_string(),
            port: None,
            base_path: None,
            authentication: None,
            processing_mode: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let client = ApiClientBuilder::default()
            .build()
            .expect("should build client");

        insta::assert_snapshot!(client.base_uri.to_string(), @"https://127.0.0.1/");
    }

    #[test]
    fn test_builder_with_all_parts() {
        let client = ApiClientBuilder::default()
            .with_scheme(Scheme::HTTP)
            .with_host("localhost")
            .with_port(8080)
            .with_base_path("/c8y")
            .expect("valid base path")
            .build()
            .expect("should build client");

        assert_eq!(client.base_uri.to_string(), "http://localhost:8080/c8y");
    }

    #[test]
    fn test_builder_with_base_url() {
        let client = ApiClientBuilder::default()
            .with_base_url("https://t12345.eu-latest.cumulocity.com")
            .expect("valid url")
            .build()
            .expect("should build client");

        assert_eq!(
            client.base_uri.to_string(),
            "https://t12345.eu-latest.cumulocity.com/"
        );
    }

    #[test]
    fn test_builder_with_base_url_port_and_path() {
        let client = ApiClientBuilder::default()
            .with_base_url("http://127.0.0.1:8111/tenant")
            .expect("valid url")
            .build()
            .expect("should build client");

        assert_eq!(client.base_uri.to_string(), "http://127.0.0.1:8111/tenant");
    }

    #[test]
    fn test_builder_rejects_invalid_base_path() {
        let result = ApiClientBuilder::default().with_base_path("/invalid path");

        let error = result.expect_err("space in path");
        assert!(matches!(error, ApiClientError::InvalidBasePath { .. }));
    }

    #[test]
    fn test_builder_rejects_url_without_host() {
        let result = ApiClientBuilder::default().with_base_url("mailto:alice@example.com");

        assert!(matches!(
            result,
            Err(ApiClientError::InvalidBasePath { .. })
        ));
    }

    #[test]
    fn test_builder_rejects_unsupported_scheme() {
        let result = ApiClientBuilder::default().with_base_url("ftp://t12345.cumulocity.com");

        let error = result.expect_err("ftp is not supported");
        assert!(matches!(error, ApiClientError::InvalidBasePath { .. }));
        assert!(error.to_string().contains("ftp"));
    }

    #[test]
    fn test_builder_keeps_processing_mode_and_authentication() {
        let client = ApiClientBuilder::default()
            .with_authentication(Authentication::Bearer("token".into()))
            .with_processing_mode(ProcessingMode::Quiescent)
            .build()
            .expect("should build client");

        assert_eq!(client.processing_mode, Some(ProcessingMode::Quiescent));
        assert!(client.authentication.is_some());
    }
}
