/// Convenience result type used across layerline.
pub type LayerlineResult<T> = Result<T, LayerlineError>;

/// Top-level error taxonomy used by diagram, render and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum LayerlineError {
    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A layer, event or connection reference that does not resolve.
    #[error("reference error: {0}")]
    Reference(String),

    /// A bounded collection is already full.
    #[error("capacity error: {0}")]
    Capacity(String),

    /// An editor action that is not valid in the current interaction state.
    #[error("invalid transition: {0}")]
    Transition(String),

    /// Errors while building or rasterizing a scene.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding an export artifact.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayerlineError {
    /// Build a [`LayerlineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayerlineError::Reference`] value.
    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference(msg.into())
    }

    /// Build a [`LayerlineError::Capacity`] value.
    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }

    /// Build a [`LayerlineError::Transition`] value.
    pub fn transition(msg: impl Into<String>) -> Self {
        Self::Transition(msg.into())
    }

    /// Build a [`LayerlineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LayerlineError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`LayerlineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LayerlineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
