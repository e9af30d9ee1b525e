use thiserror::Error;

/// Errors surfaced by the library.
///
/// Term normalization, stemming, indexing and ranking are total and never
/// fail; only configuration loading, stop-word files and bounded fuzzy
/// generation can.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fuzzy distance {distance} exceeds the configured bound of {max}")]
    DistanceExceedsBound { distance: usize, max: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
