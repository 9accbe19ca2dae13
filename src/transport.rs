//////////////////////////
// transport.rs
//////////////////////////

use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::protocol::PeerMessage;

/// What the peer channel pushes at the session. Delivered in send order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    Open,
    Data(PeerMessage),
    Close,
}

pub type EventReceiver = mpsc::UnboundedReceiver<ChannelEvent>;

/// Outbound half of a peer channel, as seen by the session.
pub trait PeerSink {
    fn send(&self, msg: &PeerMessage) -> Result<(), TransportError>;
}

/// Socket-backed sink. Messages queue on an unbounded channel drained by the
/// connection's writer task, so order is preserved and `send` never blocks.
#[derive(Clone, Debug)]
pub struct PeerChannel {
    outbound: mpsc::UnboundedSender<PeerMessage>,
}

impl PeerChannel {
    pub(crate) fn new(outbound: mpsc::UnboundedSender<PeerMessage>) -> Self {
        PeerChannel { outbound }
    }
}

impl PeerSink for PeerChannel {
    fn send(&self, msg: &PeerMessage) -> Result<(), TransportError> {
        self.outbound
            .send(msg.clone())
            .map_err(|_| TransportError::Closed)
    }
}

/// In-process channel: sending puts a `Data` event straight on the other
/// side's queue. Dropping one end delivers `Close` to the other.
#[derive(Debug)]
pub struct MemoryChannel {
    peer_events: mpsc::UnboundedSender<ChannelEvent>,
}

impl PeerSink for MemoryChannel {
    fn send(&self, msg: &PeerMessage) -> Result<(), TransportError> {
        self.peer_events
            .send(ChannelEvent::Data(msg.clone()))
            .map_err(|_| TransportError::Closed)
    }
}

impl Drop for MemoryChannel {
    fn drop(&mut self) {
        let _ = self.peer_events.send(ChannelEvent::Close);
    }
}

/// Two already-open ends. Each receiver starts with an `Open` event.
pub fn memory_pair() -> ((MemoryChannel, EventReceiver), (MemoryChannel, EventReceiver)) {
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();
    let _ = a_tx.send(ChannelEvent::Open);
    let _ = b_tx.send(ChannelEvent::Open);
    (
        (MemoryChannel { peer_events: b_tx }, a_rx),
        (MemoryChannel { peer_events: a_tx }, b_rx),
    )
}
