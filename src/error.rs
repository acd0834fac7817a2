use thiserror::Error;

/// Everything a command can fail with.
///
/// All variants surface at the command-loop boundary; none of them end the
/// session, and a failed command leaves the game state untouched.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("coordinates are outside the board")]
    OutOfRange,

    #[error("that cell is already occupied")]
    CellOccupied,

    #[error("invalid move: no discs would be flipped")]
    IllegalMove,

    #[error("corrupted save data: {0}")]
    CorruptData(String),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidCommand(String),
}
