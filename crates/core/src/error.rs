use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("tile vocabulary is empty")]
    EmptyVocabulary,
    #[error("tile vocabulary has {0} kinds, too many to index")]
    TooManyKinds(usize),
    #[error("board dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: usize, height: usize },
    #[error("row {row} has {len} cells, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },
    #[error("cell ({x}, {y}) holds a kind outside the vocabulary")]
    UnknownKind { x: usize, y: usize },
    #[error("cell ({x}, {y}) holds a placeholder")]
    PlaceholderCell { x: usize, y: usize },
}

pub type Result<T> = core::result::Result<T, GameError>;
