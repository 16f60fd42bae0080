// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Only hard failures live here. The soft ones (a lazy tier that never
//! arrives, a flag store that refuses reads, a stale worker reply) degrade
//! quietly inside the component that sees them.

use thiserror::Error;

/// Corpus fetch failure for one endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Endpoint does not exist (HTTP 404, missing file). Triggers legacy fallback.
    #[error("endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("transport error for {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("invalid fragment JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether this failure should send the loader to the legacy endpoint.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchError::Unavailable(_))
    }
}

/// Offline ingestion failure.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("TSV input is empty")]
    EmptyTsv,

    #[error("TSV header is missing column `{0}`")]
    MissingColumn(&'static str),

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value flag storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage access denied: {0}")]
    Denied(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration file failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
