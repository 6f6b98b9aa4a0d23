/// Error types for game setup and configuration.
///
/// Losing a life or the whole game is a status change on the session,
/// never one of these.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// The host had no drawing surface when the game was initialized
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error while reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON config
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
