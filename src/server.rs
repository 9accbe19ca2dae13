//////////////////////////
// server.rs
//////////////////////////

use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use uuid::Uuid;
use warp::ws::{Message, WebSocket, Ws};
use warp::{Filter, Rejection};

use crate::config::Config;
use crate::error::TransportError;
use crate::protocol::PeerMessage;
use crate::transport::{ChannelEvent, EventReceiver, PeerChannel};

/// The hosting peer's listener. Dropping it stops accepting connections.
pub struct HostedRoom {
    pub room_id: Uuid,
    pub addr: SocketAddr,
    invite_host: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl HostedRoom {
    /// Link the other player passes to `join`.
    pub fn invite_link(&self) -> String {
        format!(
            "ws://{}:{}/chess?room={}",
            self.invite_host,
            self.addr.port(),
            self.room_id
        )
    }
}

impl Drop for HostedRoom {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Deserialize)]
struct RoomQuery {
    room: String,
}

/// Channel ends waiting for the one peer the room admits.
struct PeerSlot {
    outbound: mpsc::UnboundedReceiver<PeerMessage>,
    events: mpsc::UnboundedSender<ChannelEvent>,
}

type Slot = Arc<Mutex<Option<PeerSlot>>>;

/// Opens a room on `config.bind_addr` and waits in the background for a peer
/// to connect to `/chess?room=<id>`. The host plays white.
pub async fn host(config: &Config) -> Result<(HostedRoom, PeerChannel, EventReceiver), TransportError> {
    let room_id = Uuid::new_v4();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let slot: Slot = Arc::new(Mutex::new(Some(PeerSlot {
        outbound: outbound_rx,
        events: events_tx,
    })));
    let slot = warp::any().map(move || slot.clone());
    let room = room_id.to_string();

    let routes = warp::path("chess")
        .and(warp::path::end())
        .and(warp::ws())
        .and(warp::query::<RoomQuery>())
        .and(slot)
        .and_then(move |ws: Ws, query: RoomQuery, slot: Slot| {
            let room = room.clone();
            async move {
                if query.room != room {
                    warn!("Rejected connection for unknown room {}", query.room);
                    return Err(warp::reject::not_found());
                }
                Ok::<_, Rejection>(ws.on_upgrade(move |socket| serve_peer(socket, slot)))
            }
        });

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(
        config.bind_addr,
        async move {
            let _ = shutdown_rx.await;
        },
    )?;
    tokio::spawn(server);
    info!("Room {} open on ws://{}/chess", room_id, addr);

    let hosted = HostedRoom {
        room_id,
        addr,
        invite_host: config.invite_host.clone(),
        shutdown: Some(shutdown_tx),
    };
    Ok((hosted, PeerChannel::new(outbound_tx), events_rx))
}

async fn serve_peer(socket: WebSocket, slot: Slot) {
    let Some(PeerSlot { mut outbound, events }) = slot.lock().await.take() else {
        warn!("Room already has a peer, closing extra connection");
        return;
    };
    info!("Peer joined");
    let _ = events.send(ChannelEvent::Open);

    let (mut ws_tx, mut ws_rx) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let text = match msg.encode() {
                Ok(text) => text,
                Err(e) => {
                    error!("Could not encode {}: {}", msg.kind(), e);
                    continue;
                }
            };
            if ws_tx.send(Message::text(text)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(result) = ws_rx.next().await {
        let msg = match result {
            Ok(m) => m,
            Err(e) => {
                warn!("WebSocket error: {}", e);
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        let text = match msg.to_str() {
            Ok(s) => s,
            Err(_) => continue,
        };
        match PeerMessage::decode(text) {
            Ok(peer_msg) => {
                if events.send(ChannelEvent::Data(peer_msg)).is_err() {
                    break;
                }
            }
            Err(e) => warn!("Skipping malformed frame: {}", e),
        }
    }

    info!("Peer left");
    let _ = events.send(ChannelEvent::Close);
    writer.abort();
}
