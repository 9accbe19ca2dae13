//////////////////////////
// session.rs
//////////////////////////

use colored::Colorize;
use log::{debug, info, warn};
use std::fmt;

use crate::board::Board;
use crate::game::{square_name, GameState};
use crate::legal::legal_moves;
use crate::protocol::PeerMessage;
use crate::transport::{ChannelEvent, PeerChannel, PeerSink};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Idle,
    Waiting,
    Connected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    AwaitingSelection,
    PieceSelected { piece: Piece, targets: Vec<Square> },
}

/// What a square click did. Rejected input is `Ignored`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected,
    Deselected,
    Moved,
}

/// Read-only snapshot handed to whatever draws the game.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub board: &'a Board,
    pub turn: Color,
    pub selection: Option<&'a Piece>,
    pub legal_targets: &'a [Square],
    pub in_check: bool,
    pub result: Option<GameResult>,
}

/// One peer's side of a game: the current snapshot, the local selection, and
/// the outbound half of the peer channel.
pub struct Session<S: PeerSink = PeerChannel> {
    state: GameState,
    local_color: Option<Color>,
    selection: Selection,
    status: ConnectionStatus,
    peer: Option<S>,
}

impl<S: PeerSink> Session<S> {
    /// Hot-seat play: no peer, both sides move.
    pub fn local() -> Self {
        Session {
            state: GameState::new(),
            local_color: None,
            selection: Selection::AwaitingSelection,
            status: ConnectionStatus::Idle,
            peer: None,
        }
    }

    /// `color` is the side this peer plays; the host is white, the joiner black.
    pub fn with_peer(color: Color, peer: S) -> Self {
        Session {
            state: GameState::new(),
            local_color: Some(color),
            selection: Selection::AwaitingSelection,
            status: ConnectionStatus::Waiting,
            peer: Some(peer),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn local_color(&self) -> Option<Color> {
        self.local_color
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mark_waiting(&mut self) {
        self.status = ConnectionStatus::Waiting;
    }

    /// The channel is gone or never came up. Play continues on this peer alone.
    pub fn mark_offline(&mut self) {
        if self.status != ConnectionStatus::Error {
            warn!("Peer channel unavailable, continuing offline");
        }
        self.status = ConnectionStatus::Error;
    }

    /// Turn ownership is only enforced while a peer could be playing the
    /// other side.
    pub fn owns_turn(&self) -> bool {
        match self.local_color {
            None => true,
            Some(_) if self.status == ConnectionStatus::Error => true,
            Some(color) => color == self.state.turn,
        }
    }

    pub fn select_or_move(&mut self, square: Square) -> ClickOutcome {
        if self.state.is_over() || !self.owns_turn() || !Board::is_within_bounds(square) {
            return ClickOutcome::Ignored;
        }

        if let Selection::PieceSelected { piece, targets } = &self.selection {
            if targets.contains(&square) {
                let piece = *piece;
                self.commit_move(&piece, square);
                return ClickOutcome::Moved;
            }
        }

        match self.state.board.get(square) {
            Some(piece) if piece.color == self.state.turn => {
                let targets = legal_moves(piece, &self.state.board);
                debug!(
                    "Selected {:?} on {} with {} targets",
                    piece.piece_type,
                    square_name(square),
                    targets.len()
                );
                self.selection = Selection::PieceSelected {
                    piece: *piece,
                    targets,
                };
                ClickOutcome::Selected
            }
            _ => {
                self.selection = Selection::AwaitingSelection;
                ClickOutcome::Deselected
            }
        }
    }

    fn commit_move(&mut self, piece: &Piece, target: Square) {
        let next = self.state.apply_move(piece, target);
        if let Some(record) = next.history.first() {
            info!("{} played {}", self.state.turn, record);
        }
        if let Some(result) = next.result {
            info!("{}", result);
        }
        self.state = next;
        self.selection = Selection::AwaitingSelection;
        self.broadcast(PeerMessage::Move {
            state: self.state.clone(),
        });
    }

    /// Starts over from the initial position and tells the peer.
    pub fn reset(&mut self) {
        self.state = self.state.reset();
        self.selection = Selection::AwaitingSelection;
        info!("Game reset");
        self.broadcast(PeerMessage::Reset {
            state: self.state.clone(),
        });
    }

    fn broadcast(&mut self, msg: PeerMessage) {
        let Some(peer) = &self.peer else {
            return;
        };
        if let Err(e) = peer.send(&msg) {
            warn!("Could not send {} to peer: {}", msg.kind(), e);
            self.mark_offline();
        }
    }

    /// Incoming snapshots replace the local state. Nothing is rejected; a
    /// snapshot that fails the sanity check is only logged. Stored piece
    /// positions are rebuilt from the grid so the rules never index off it.
    pub fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Open => {
                info!("Peer connected");
                self.status = ConnectionStatus::Connected;
            }
            ChannelEvent::Close => {
                warn!("Peer disconnected");
                self.mark_offline();
            }
            ChannelEvent::Data(msg) => {
                debug!("Received {} from peer", msg.kind());
                if let Err(e) = msg.state().validate_board_state() {
                    warn!("Applying suspicious {} snapshot: {}", msg.kind(), e);
                }
                let mut state = msg.into_state();
                state.board = state.board.normalize_positions();
                self.state = state;
                self.selection = Selection::AwaitingSelection;
            }
        }
    }

    pub fn view(&self) -> View<'_> {
        let (selection, legal_targets) = match &self.selection {
            Selection::AwaitingSelection => (None, &[][..]),
            Selection::PieceSelected { piece, targets } => (Some(piece), targets.as_slice()),
        };
        View {
            board: &self.state.board,
            turn: self.state.turn,
            selection,
            legal_targets,
            in_check: self.state.in_check,
            result: self.state.result,
        }
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        if let Some(piece) = self.selection {
            let targets: Vec<String> = self.legal_targets.iter().map(|&sq| square_name(sq)).collect();
            writeln!(
                f,
                "Selected {:?} on {}: {}",
                piece.piece_type,
                square_name(piece.position).green(),
                if targets.is_empty() {
                    "no legal moves".to_string()
                } else {
                    targets.join(" ")
                }
            )?;
        }
        match self.result {
            Some(result) => write!(f, "{}", result.to_string().bright_yellow().bold()),
            None if self.in_check => write!(
                f,
                "Turn: {} {}",
                self.turn,
                "(in check!)".bright_red().bold()
            ),
            None => write!(f, "Turn: {}", self.turn),
        }
    }
}
