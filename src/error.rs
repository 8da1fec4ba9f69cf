use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid survey JSON: {0}")]
    InputParse(#[from] serde_json::Error),

    #[error("question \"{question}\": percentage {value} is outside 0..=100")]
    InvalidPercentage { question: String, value: f32 },

    #[error("category \"{category}\" has {questions} questions and does not fit in two adjacent columns")]
    CategoryTooLarge { category: String, questions: usize },

    #[error("layout needs {required} columns but the page holds at most 3")]
    ColumnBudgetExceeded { required: u32 },

    #[error("no word boundary to split \"{0}\" on")]
    NoSplitPoint(String),

    #[error("placement produced {actual} positions for {expected} nodes")]
    PositionCountMismatch { expected: usize, actual: usize },

    #[error("image error: {0}")]
    Image(String),

    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    /// I/O error for `path`. Not-found and permission errors carry the path in
    /// their message, since the bare OS message does not say which file.
    pub(crate) fn io_at(e: std::io::Error, path: &Path) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
                std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        }
    }
}
