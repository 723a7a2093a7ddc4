use thiserror::Error;

/// Domain errors raised by the table layer and the frame pipeline.
///
/// Plumbing code wraps these in `anyhow::Error` with file/row context;
/// callers that care about the kind can still `downcast_ref::<Error>()`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("unsupported {kind}: '{name}'")]
    UnsupportedStyle { kind: &'static str, name: String },

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("no frames to assemble")]
    EmptyFrameSet,

    #[error("animation duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("group values '{first}' and '{second}' both map to frame file '{stem}.png'")]
    FrameNameCollision {
        first: String,
        second: String,
        stem: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
