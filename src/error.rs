use thiserror::Error;

/// Hard failures: the call itself is malformed.
///
/// Sparse or noisy detections never produce an `Error`; they yield a zero score
/// with a [`ScoreStatus`](crate::ScoreStatus) describing why.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid frame: {width}x{height} has a zero dimension")]
    InvalidFrame { width: u32, height: u32 },

    #[error("Invalid scoring config: {0}")]
    InvalidConfig(String),

    #[error("Landmark detector failed: {0}")]
    Detector(String),
}

pub type Result<T> = std::result::Result<T, Error>;
