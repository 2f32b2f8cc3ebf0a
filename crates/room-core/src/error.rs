use thiserror::Error;

/// Errors reported by the simulation pipeline.
///
/// Geometric absence (disabled surfaces, rays that miss a surface) is not an
/// error; those candidate paths are dropped.
#[derive(Debug, Error)]
pub enum Error {
    /// Transform length must be a power of two.
    #[error("transform length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// A configuration value is out of range.
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    /// The run cannot start: no speakers or a room without extent.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The real-valued inverse transform failed.
    #[error("transform failed: {0}")]
    Transform(String),
}

pub type Result<T> = std::result::Result<T, Error>;
