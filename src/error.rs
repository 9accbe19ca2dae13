//////////////////////////
// error.rs
//////////////////////////

use thiserror::Error;

use crate::types::{Color, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid move format: {0}")]
    InvalidFormat(String),

    #[error("No piece at starting square")]
    NoPieceAtSource,

    #[error("That's not your piece, it is {0}'s turn")]
    WrongColor(Color),

    #[error("Illegal move from {from:?} to {to:?}")]
    IllegalMove { from: Square, to: Square },

    #[error("The game is already over")]
    GameOver,

    #[error("Invalid number of kings: white={white}, black={black}")]
    KingCount { white: usize, black: usize },

    #[error("Piece at {cell:?} believes it stands on {stored:?}")]
    MisplacedPiece { cell: Square, stored: Square },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Peer channel is closed")]
    Closed,

    #[error("Timed out connecting to {0}")]
    Timeout(String),

    #[error("Invite link has no room: {0}")]
    InvalidLink(String),

    #[error("Could not bind listener: {0}")]
    Bind(#[from] warp::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bad value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}
