//! Error types for the fallible edges of the simulator (config and reports).
//!
//! The simulation core itself never fails: collisions and empty rays are data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Reading or writing a file failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A config or report could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A config value would make the simulation degenerate.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
