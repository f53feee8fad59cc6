//! Error types for fetching and collection cycles.

use thiserror::Error;

use screeps_decode::DecodeError;
use screeps_metrics::MetricError;

use crate::fetcher::Resource;

pub type FetchResult<T> = Result<T, FetchError>;

pub type CollectResult<T> = Result<T, CollectError>;

/// Failure to retrieve a resource from the upstream API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },
}

/// Reason a collection cycle was aborted.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("fetching {resource} failed: {source}")]
    Fetch {
        resource: Resource,
        #[source]
        source: FetchError,
    },

    #[error("decoding {resource} failed: {source}")]
    Decode {
        resource: Resource,
        #[source]
        source: DecodeError,
    },

    #[error("publishing metrics failed: {0}")]
    Publish(#[from] MetricError),
}

impl CollectError {
    /// The upstream resource that caused the abort, if any.
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            CollectError::Fetch { resource, .. } | CollectError::Decode { resource, .. } => {
                Some(resource)
            }
            CollectError::Publish(_) => None,
        }
    }
}
