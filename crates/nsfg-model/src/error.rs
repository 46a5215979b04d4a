use thiserror::Error;

/// Errors raised when a column layout violates its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("dictionary has no columns")]
    EmptyDictionary,

    #[error("column '{name}' has zero width")]
    ZeroWidth { name: String },

    #[error("column name '{name}' appears more than once")]
    DuplicateColumn { name: String },

    /// Column starts before the end of the previous column.
    #[error("column '{name}' at offset {start} overlaps '{previous}' ending at {previous_end}")]
    Overlap {
        name: String,
        start: usize,
        previous: String,
        previous_end: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
