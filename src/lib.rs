//////////////////////////
// lib.rs
//////////////////////////

//! Two-player chess on a 10×10 board between two peers. Each peer runs the
//! same rules engine and ships the full game state to the other after every
//! move or reset.

pub mod types;
pub mod error;
pub mod board;
pub mod movegen;
pub mod check;
pub mod legal;
pub mod game;
pub mod protocol;
pub mod transport;
pub mod session;
pub mod config;
pub mod server;
pub mod client;

pub use types::*;
pub use board::Board;
pub use game::GameState;
pub use session::Session;
pub use config::Config;
pub use server::host;
pub use client::join;
