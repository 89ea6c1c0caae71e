use thiserror::Error;

/// Failures remapping an attribute between views of different cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("cardinality {source_count} -> {target_count} is not an integer ratio")]
    CardinalityMismatch {
        source_count: usize,
        target_count: usize,
    },
    #[error("attribute widths differ: {source_components} vs {target_components} components")]
    ComponentMismatch {
        source_components: usize,
        target_components: usize,
    },
    #[error("cannot link an empty attribute array")]
    Empty,
    #[error("a view cannot be linked to itself")]
    SelfLink,
}

/// Failures reported by a GPU surface implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("shader compilation failed for {pass} pass: {log}")]
    Compile { pass: &'static str, log: String },
    #[error("program link failed for {pass} pass: {log}")]
    Link { pass: &'static str, log: String },
    #[error("buffer allocation failed")]
    Buffer,
    #[error("surface unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown view {0}")]
    UnknownView(usize),
    #[error("view role {0} is already registered")]
    DuplicateRole(String),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("point {index}: {reason}")]
    Dataset { index: usize, reason: &'static str },
    #[error("{what} exceeds limit of {max}")]
    Limit { what: &'static str, max: usize },
}

impl EngineError {
    /// Stable machine-readable code, used by the JS bindings.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::UnknownView(_) => "unknown_view",
            EngineError::DuplicateRole(_) => "duplicate_role",
            EngineError::Link(LinkError::CardinalityMismatch { .. }) => "cardinality_mismatch",
            EngineError::Link(_) => "invalid_link",
            EngineError::Surface(_) => "surface",
            EngineError::Config(_) => "config",
            EngineError::Dataset { .. } => "invalid_points",
            EngineError::Limit { .. } => "limit",
        }
    }
}
