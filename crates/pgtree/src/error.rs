use thiserror::Error;

/// Errors raised while parsing, inspecting or rewriting parse trees.
///
/// `Syntax` comes straight from the grammar. `InvalidNode` and `MalformedTree`
/// signal a tree that a well-formed parse never produces. `Usage` is reserved
/// for callers asking for something the operation does not support.
#[derive(Debug, Error)]
pub enum AstError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Invalid node: {0}")]
    InvalidNode(String),

    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parser task failed: {0}")]
    Task(String),
}

impl AstError {
    /// True for errors caused by the caller rather than by the input tree.
    pub fn is_usage(&self) -> bool {
        matches!(self, AstError::Usage(_))
    }
}

impl From<tokio::task::JoinError> for AstError {
    fn from(err: tokio::task::JoinError) -> Self {
        AstError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AstError>;
