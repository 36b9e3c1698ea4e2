//! Remote repository transports.
//!
//! A remote repository serves raw bytes by relative path. Absence is a valid
//! outcome (`Ok(None)`), distinct from transport failure; callers decide what
//! to do with either. Transports never retry internally: retry policy belongs
//! to the caller at the repository-iteration level.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use reqwest::{Client, ClientBuilder, StatusCode};
use url::Url;

use truss_core::error::TrussError;

use crate::RegistryResult;

/// Boxed future returned by [`RemoteRepository::fetch`]
pub type RemoteFetch<'a> = Pin<Box<dyn Future<Output = RegistryResult<Option<Vec<u8>>>> + Send + 'a>>;

/// A source of raw repository bytes, addressed by relative path.
///
/// `Ok(None)` means the repository does not publish that path; errors are
/// reserved for failures of the lookup itself.
pub trait RemoteRepository: Send + Sync + std::fmt::Debug {
    fn fetch<'a>(&'a self, path: &'a Utf8Path) -> RemoteFetch<'a>;
}

/// Authentication configuration for repository access
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token for authentication
    pub token: Option<String>,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
}

/// HTTP-backed repository with connection pooling
#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
}

impl HttpRepository {
    /// Create a repository client for the given base URL
    pub fn new(base_url: &Url) -> RegistryResult<Self> {
        Self::with_auth(base_url, AuthConfig::default())
    }

    /// Create a repository client with authentication
    pub fn with_auth(base_url: &Url, auth: AuthConfig) -> RegistryResult<Self> {
        let mut builder = ClientBuilder::new()
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .user_agent("truss/0.1.0");

        if let Some(header) = auth_header(&auth)? {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(reqwest::header::AUTHORIZATION, header);
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| TrussError::resource_access("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }
}

fn auth_header(auth: &AuthConfig) -> RegistryResult<Option<reqwest::header::HeaderValue>> {
    let value = if let Some(token) = &auth.token {
        format!("Bearer {token}")
    } else if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
        use base64::{engine::general_purpose, Engine as _};
        format!(
            "Basic {}",
            general_purpose::STANDARD.encode(format!("{username}:{password}"))
        )
    } else {
        return Ok(None);
    };
    value
        .parse()
        .map(Some)
        .map_err(|e| TrussError::resource_access("Invalid repository credentials", e))
}

impl RemoteRepository for HttpRepository {
    fn fetch<'a>(&'a self, path: &'a Utf8Path) -> RemoteFetch<'a> {
        Box::pin(async move {
            let url = format!("{}/{}", self.base_url, path);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| TrussError::resource_access(format!("Failed to fetch {url}"), e))?;

            match response.status() {
                status if status.is_success() => {
                    let bytes = response
                        .bytes()
                        .await
                        .map_err(|e| {
                            TrussError::resource_access(format!("Failed to read body of {url}"), e)
                        })?
                        .to_vec();
                    Ok(Some(bytes))
                }
                StatusCode::NOT_FOUND | StatusCode::GONE => Ok(None),
                status => Err(TrussError::ResourceAccess {
                    message: format!("Repository returned status {status} for {url}"),
                    source: None,
                }),
            }
        })
    }
}

/// Directory-backed repository, used for `file://` repository URLs
#[derive(Debug, Clone)]
pub struct DirRepository {
    root: Utf8PathBuf,
}

impl DirRepository {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Build from a `file://` URL
    pub fn from_file_url(url: &Url) -> RegistryResult<Self> {
        let path = url
            .to_file_path()
            .map_err(|_| TrussError::ConfigValidation {
                field: "repository.url".to_string(),
                reason: format!("'{url}' is not a usable file URL"),
            })?;
        let root = Utf8PathBuf::from_path_buf(path).map_err(|path| TrussError::ConfigValidation {
            field: "repository.url".to_string(),
            reason: format!("'{}' is not valid UTF-8", path.display()),
        })?;
        Ok(Self::new(root))
    }
}

impl RemoteRepository for DirRepository {
    fn fetch<'a>(&'a self, path: &'a Utf8Path) -> RemoteFetch<'a> {
        Box::pin(async move {
            let full_path = self.root.join(path);
            match tokio::fs::read(&full_path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(TrussError::resource_access(
                    format!("Failed to read {full_path}"),
                    e,
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests;
