/// Result alias used throughout the crate.
pub type PanoglobeResult<T> = Result<T, PanoglobeError>;

/// Crate error type.
///
/// Asset failures are reported through this type but the pipeline treats them as non-fatal; target
/// allocation failures surface at construction time.
#[derive(thiserror::Error, Debug)]
pub enum PanoglobeError {
    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Texture read or decode failure.
    #[error("asset error: {0}")]
    Asset(String),

    /// Render target allocation or resize failure.
    #[error("render target error: {0}")]
    Target(String),

    /// Failure inside a render or compositor pass.
    #[error("render error: {0}")]
    Render(String),

    /// Config (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanoglobeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn target(msg: impl Into<String>) -> Self {
        Self::Target(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
