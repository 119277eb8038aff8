//! Error types
//!
//! Configuration errors are fatal at construction. Persistence errors are
//! recovered by the game controller and never reach the caller.

/// Invalid variant configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Highway configured without lanes
    #[error("lane count must be at least 1")]
    ZeroLanes,

    /// An entity pool configured empty
    #[error("{0} count must be at least 1")]
    ZeroEntities(&'static str),

    /// Arena bounds not strictly positive
    #[error("bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    /// Geometry that cannot fit the arena
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// Config document could not be parsed
    #[error("malformed config: {0}")]
    Malformed(String),
}

/// Best-score store failure
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Backing storage is not reachable (no window, storage disabled)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data exists but cannot be decoded
    #[error("corrupt score record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the game controller
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Start requested before every required asset resolved
    #[error("assets still loading: {}", .0.join(", "))]
    AssetsPending(Vec<String>),
}
