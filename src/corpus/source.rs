// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Where fragment JSON comes from.
//!
//! The viewer serves the corpus as static files, so a source only needs one
//! operation: fetch an endpoint path like `/ocr/lines.json` and decode it.
//! "Not there" is its own error variant because it is not really a failure;
//! it is how an old deployment tells us to use the legacy combined file.

use crate::error::FetchError;
use crate::types::Fragment;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Read-only access to corpus endpoints.
pub trait CorpusSource: Send + Sync {
    /// Fetch and decode the fragment array at `endpoint`.
    fn fetch(&self, endpoint: &str) -> Result<Vec<Fragment>, FetchError>;

    /// Human-readable location, for logs and CLI output.
    fn describe(&self) -> String;
}

fn decode(endpoint: &str, bytes: &[u8]) -> Result<Vec<Fragment>, FetchError> {
    serde_json::from_slice(bytes).map_err(|source| FetchError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// A directory laid out like the web root (`<root>/ocr/lines.json`, ...).
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, endpoint: &str) -> PathBuf {
        self.root.join(endpoint.trim_start_matches('/'))
    }
}

impl CorpusSource for DirSource {
    fn fetch(&self, endpoint: &str) -> Result<Vec<Fragment>, FetchError> {
        let path = self.resolve(endpoint);
        debug!(path = %path.display(), "reading corpus file");
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::Unavailable(endpoint.to_string()))
            }
            Err(e) => return Err(FetchError::Io(e)),
        };
        decode(endpoint, &bytes)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpSource;

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use super::{decode, CorpusSource};
    use crate::error::FetchError;
    use crate::types::Fragment;
    use reqwest::blocking::Client;
    use reqwest::{StatusCode, Url};
    use tracing::debug;

    /// A deployed viewer, fetched over HTTP(S).
    #[derive(Debug, Clone)]
    pub struct HttpSource {
        base: Url,
        client: Client,
    }

    impl HttpSource {
        pub fn new(base: Url) -> Self {
            Self {
                base,
                client: Client::new(),
            }
        }

        fn resolve(&self, endpoint: &str) -> Result<Url, FetchError> {
            self.base.join(endpoint).map_err(|e| FetchError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        }
    }

    impl CorpusSource for HttpSource {
        fn fetch(&self, endpoint: &str) -> Result<Vec<Fragment>, FetchError> {
            let url = self.resolve(endpoint)?;
            debug!(%url, "fetching corpus endpoint");
            let transport = |e: reqwest::Error| FetchError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            };

            let response = self.client.get(url).send().map_err(transport)?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::Unavailable(endpoint.to_string()));
            }
            if !status.is_success() {
                return Err(FetchError::Status {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                });
            }
            let bytes = response.bytes().map_err(transport)?;
            decode(endpoint, &bytes)
        }

        fn describe(&self) -> String {
            self.base.to_string()
        }
    }
}

/// Open a source from a CLI-style location: `http(s)://...` or a directory.
pub fn open_source(location: &str) -> Result<Arc<dyn CorpusSource>, FetchError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return open_http(location);
    }

    let root = PathBuf::from(location);
    if !root.is_dir() {
        return Err(FetchError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("corpus directory not found: {location}"),
        )));
    }
    Ok(Arc::new(DirSource::new(root)))
}

#[cfg(not(target_arch = "wasm32"))]
fn open_http(location: &str) -> Result<Arc<dyn CorpusSource>, FetchError> {
    let base = reqwest::Url::parse(location).map_err(|e| FetchError::Transport {
        endpoint: location.to_string(),
        message: e.to_string(),
    })?;
    Ok(Arc::new(HttpSource::new(base)))
}

#[cfg(target_arch = "wasm32")]
fn open_http(location: &str) -> Result<Arc<dyn CorpusSource>, FetchError> {
    Err(FetchError::Transport {
        endpoint: location.to_string(),
        message: "HTTP sources are not available on wasm32".to_string(),
    })
}
