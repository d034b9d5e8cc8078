//! WebSocket transport, grounded in the teacher's accept-loop shape
//! (`protocol/ws.rs`): one task per accepted connection, split into a
//! write half fed by an unbounded channel and a read half pumping
//! decoded frames into the shared event channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use super::error::{TransportError, TransportResult};
use super::transport::{PeerId, SendFlags, Transport, TransportEvent};

struct PeerHandle {
    outbound: UnboundedSender<Vec<u8>>,
}

pub struct WsTransport {
    peers: Arc<RwLock<HashMap<PeerId, PeerHandle>>>,
    next_id: AtomicU64,
    events_tx: async_channel::Sender<TransportEvent>,
    events_rx: async_channel::Receiver<TransportEvent>,
}

impl WsTransport {
    /// Binds `addr` and spawns the accept loop on the current tokio
    /// runtime. Returns immediately; connections arrive as
    /// `TransportEvent::Connected` on `events()`.
    pub async fn bind(addr: &str) -> TransportResult<Arc<Self>> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;

        let (events_tx, events_rx) = async_channel::unbounded();
        let transport = Arc::new(Self {
            peers: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            events_tx,
            events_rx,
        });

        let accept_transport = Arc::clone(&transport);
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => {
                        let transport = Arc::clone(&accept_transport);
                        tokio::spawn(async move {
                            transport.handle_connection(stream).await;
                        });
                    }
                    Err(err) => {
                        log::warn!("accept() failed: {err}");
                    }
                }
            }
        });

        Ok(transport)
    }

    async fn handle_connection(self: Arc<Self>, stream: tokio::net::TcpStream) {
        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(err) => {
                log::warn!("websocket handshake failed: {err}");
                return;
            }
        };

        let peer_id = PeerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();

        self.peers
            .write()
            .expect("peer map lock poisoned")
            .insert(peer_id, PeerHandle { outbound: outbound_tx });
        let _ = self.events_tx.send(TransportEvent::Connected(peer_id)).await;

        let writer_task = tokio::spawn(async move {
            while let Some(bytes) = outbound_rx.recv().await {
                if write.send(Message::Binary(bytes.into())).await.is_err() {
                    break;
                }
            }
        });

        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Binary(bytes)) => {
                    let _ = self
                        .events_tx
                        .send(TransportEvent::Message(peer_id, bytes.into()))
                        .await;
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }

        writer_task.abort();
        self.peers.write().expect("peer map lock poisoned").remove(&peer_id);
        let _ = self.events_tx.send(TransportEvent::Disconnected(peer_id)).await;
    }

}

impl Transport for WsTransport {
    fn events(&self) -> async_channel::Receiver<TransportEvent> {
        self.events_rx.clone()
    }

    fn send(&self, peer: PeerId, _flags: SendFlags, bytes: Vec<u8>) -> TransportResult<()> {
        let peers = self.peers.read().expect("peer map lock poisoned");
        let handle = peers.get(&peer).ok_or(TransportError::Closed)?;
        handle.outbound.send(bytes).map_err(|_| TransportError::Closed)
    }

    fn disconnect(&self, peer: PeerId) {
        self.peers.write().expect("peer map lock poisoned").remove(&peer);
    }
}
