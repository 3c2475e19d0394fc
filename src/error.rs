//! Error types
//!
//! Nothing here escapes a single game session: storage errors are recovered by
//! falling back to defaults, host errors disable one game instance, and move
//! errors only surface through the explicit checkers API.

use thiserror::Error;

use crate::checkers::Cell;

/// Failure reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to encode or decode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("record version {found} is newer than supported version {latest}")]
    UnsupportedVersion { found: u32, latest: u32 },
}

/// Failure setting up a browser host for a game.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("no browser window")]
    NoWindow,
    #[error("canvas element `{0}` not found")]
    NoCanvas(String),
    #[error("2d drawing context unavailable")]
    NoContext,
    #[error("failed to register {0} callback")]
    Callback(&'static str),
}

/// Rejected checkers move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell ({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },
    #[error("no piece at {0}")]
    NoPiece(Cell),
    #[error("piece at {0} does not belong to the player to move")]
    NotYourPiece(Cell),
    #[error("{to} is not a legal destination from {from}")]
    IllegalDestination { from: Cell, to: Cell },
}
