use std::path::PathBuf;
use thiserror::Error;

/// Error type shared by the crawl, persistence, and query paths.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("document path is empty")]
    EmptyPath,

    #[error("query contains no words")]
    EmptyQuery,

    #[error("no index shards supplied")]
    NoShards,

    #[error("shard {shard}: {reason}")]
    ShardCorrupt { shard: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("metadata error: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
