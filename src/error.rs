use std::path::PathBuf;
use thiserror::Error;

/// Categorized pipeline errors. Decoder failure and user-cache corruption are
/// deliberately absent: the decoder degrades to empty PCM and the cache
/// self-heals by recomputing.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Precompiled data is developer-controlled; a version drift means the
    /// bundled assets were not regenerated and must not be routed around.
    #[error(
        "precompiled level data {path} has schema version {found}, expected {expected}; \
         regenerate the bundled data"
    )]
    StalePrecompiled {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    #[error("precompiled level data {path} is corrupt")]
    CorruptPrecompiled {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
