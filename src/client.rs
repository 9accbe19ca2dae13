//////////////////////////
// client.rs
//////////////////////////

use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::Config;
use crate::error::TransportError;
use crate::protocol::PeerMessage;
use crate::transport::{ChannelEvent, EventReceiver, PeerChannel};

/// Pulls the `room` query parameter out of an invite link.
pub fn room_from_link(link: &str) -> Result<String, TransportError> {
    link.split_once('?')
        .and_then(|(_, query)| {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("room="))
        })
        .filter(|room| !room.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TransportError::InvalidLink(link.to_string()))
}

/// Connects to a hosting peer. Gives up after `config.connect_timeout()`.
/// The joiner plays black.
pub async fn join(link: &str, config: &Config) -> Result<(PeerChannel, EventReceiver), TransportError> {
    let room = room_from_link(link)?;
    info!("Joining room {}", room);

    let (socket, _) = tokio::time::timeout(config.connect_timeout(), connect_async(link))
        .await
        .map_err(|_| TransportError::Timeout(link.to_string()))??;

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let _ = events_tx.send(ChannelEvent::Open);
    tokio::spawn(pump(socket, outbound_rx, events_tx));

    Ok((PeerChannel::new(outbound_tx), events_rx))
}

async fn pump(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut outbound: mpsc::UnboundedReceiver<PeerMessage>,
    events: mpsc::UnboundedSender<ChannelEvent>,
) {
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
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(result) = ws_rx.next().await {
        let text = match result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("WebSocket error: {}", e);
                break;
            }
        };
        match PeerMessage::decode(&text) {
            Ok(peer_msg) => {
                if events.send(ChannelEvent::Data(peer_msg)).is_err() {
                    break;
                }
            }
            Err(e) => warn!("Skipping malformed frame: {}", e),
        }
    }

    info!("Connection to host closed");
    let _ = events.send(ChannelEvent::Close);
    writer.abort();
}
