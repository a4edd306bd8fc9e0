//! Asset retrieval backends.
//!
//! A fetcher turns a locator into a byte count or an error. It must always
//! resolve: the tracker treats both outcomes as settled, but a future that
//! never completes stalls the gate for good.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use futures_util::StreamExt;
use thiserror::Error;
use url::Url;

use preloader_types::{AssetLocator, LocatorKind};

/// Fetch future type alias.
pub type FetchFut<'a> = Pin<Box<dyn Future<Output = Result<u64, FetchError>> + Send + 'a>>;

const USER_AGENT: &str = concat!("preloader/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub trait AssetFetcher: Send + Sync {
    fn fetch<'a>(&'a self, locator: &'a AssetLocator) -> FetchFut<'a>;
}

/// Retrieves `http`/`https` locators and drains the body.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, locator: &'a AssetLocator) -> FetchFut<'a> {
        Box::pin(async move {
            let url = Url::parse(locator.as_str()).map_err(|err| FetchError::InvalidLocator {
                locator: locator.to_string(),
                reason: err.to_string(),
            })?;

            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let mut bytes = 0u64;
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                bytes += chunk?.len() as u64;
            }
            Ok(bytes)
        })
    }
}

/// Reads local files. Relative paths resolve against `root`.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a locator to a filesystem path.
    pub fn resolve(&self, locator: &AssetLocator) -> Result<PathBuf, FetchError> {
        let raw = locator.as_str();
        let invalid = |reason: &str| FetchError::InvalidLocator {
            locator: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw
            .get(..7)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file://"))
        {
            let url = Url::parse(raw).map_err(|err| invalid(&err.to_string()))?;
            return url
                .to_file_path()
                .map_err(|()| invalid("not a local file URL"));
        }

        let path = Path::new(raw);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.root.join(path))
        }
    }
}

impl AssetFetcher for FileFetcher {
    fn fetch<'a>(&'a self, locator: &'a AssetLocator) -> FetchFut<'a> {
        Box::pin(async move {
            let path = self.resolve(locator)?;
            match tokio::fs::read(&path).await {
                Ok(contents) => Ok(contents.len() as u64),
                Err(source) => Err(FetchError::Io { path, source }),
            }
        })
    }
}

/// Dispatches on locator kind: network URLs to HTTP, everything else to disk.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpFetcher::new()?,
            file: FileFetcher::new(root),
        })
    }

    #[must_use]
    pub fn from_parts(http: HttpFetcher, file: FileFetcher) -> Self {
        Self { http, file }
    }
}

impl AssetFetcher for DefaultFetcher {
    fn fetch<'a>(&'a self, locator: &'a AssetLocator) -> FetchFut<'a> {
        match locator.kind() {
            LocatorKind::Http => self.http.fetch(locator),
            LocatorKind::File => self.file.fetch(locator),
        }
    }
}
