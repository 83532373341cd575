/// Convenience result type used across the crate.
pub type SvgaResult<T> = Result<T, SvgaError>;

/// Which decoding stage rejected the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeKind {
    /// Zip container could not be opened or extracted.
    Zip,
    /// Compressed stream failed to inflate.
    Stream,
    /// Structured binary payload failed to parse.
    Structured,
    /// JSON specification failed to parse.
    Json,
}

impl DecodeKind {
    fn label(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Stream => "stream",
            Self::Structured => "structured",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for DecodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Top-level error taxonomy reported through load and playback callbacks.
///
/// Errors are cheap to clone so one failure can be delivered to every caller that was coalesced
/// onto the same resource.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SvgaError {
    /// Resource or file is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Container, stream, binary or JSON decoding failed.
    #[error("{kind} decode error: {message}")]
    Decode {
        /// Failing decode stage.
        kind: DecodeKind,
        /// Human-readable detail.
        message: String,
    },

    /// Disk read, write or move failure.
    #[error("io error: {0}")]
    Io(String),

    /// Transport failure while downloading.
    #[error("network error: {0}")]
    Network(String),

    /// Rejected caller input.
    #[error("validation error: {0}")]
    Validation(String),
}

impl SvgaError {
    /// Build a [`SvgaError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`SvgaError::Decode`] value.
    pub fn decode(kind: DecodeKind, msg: impl Into<String>) -> Self {
        Self::Decode {
            kind,
            message: msg.into(),
        }
    }

    /// Build a [`SvgaError::Io`] value from a context string and the underlying error.
    pub fn io(context: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::Io(format!("{context}: {err}"))
    }

    /// Build a [`SvgaError::Network`] value.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Build a [`SvgaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Decode stage for [`SvgaError::Decode`] errors.
    pub fn decode_kind(&self) -> Option<DecodeKind> {
        match self {
            Self::Decode { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
