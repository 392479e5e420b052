/// Convenience result type used across telop.
pub type TelopResult<T> = Result<T, TelopError>;

/// Top-level error taxonomy used by the style, inference, render and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum TelopError {
    /// Empty, unreadable or undecodable image input to inference, or an operation that needs a
    /// style when none is loaded.
    #[error("input error: {0}")]
    Input(String),

    /// Malformed interchange text, a missing or mistyped field, or an out-of-range value.
    #[error("format error: {0}")]
    Format(String),

    /// The external production tool could not be located.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// The external tool ran (or failed to run) and the expected artifact is absent.
    #[error("export failed: {0}")]
    ExportFailed(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TelopError {
    /// Build a [`TelopError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`TelopError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`TelopError::ToolNotFound`] value.
    pub fn tool_not_found(msg: impl Into<String>) -> Self {
        Self::ToolNotFound(msg.into())
    }

    /// Build a [`TelopError::ExportFailed`] value.
    pub fn export_failed(msg: impl Into<String>) -> Self {
        Self::ExportFailed(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
