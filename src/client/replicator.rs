//! Connects to a room server over WebSocket and shuttles messages to/from
//! a background task, the way the teacher's `client/protocol/ws.rs` does
//! (`connect_async`, split reader/writer, one task owning both halves).

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;

use crate::protocol::{ClientMessage, ServerMessage};

use super::error::{ClientError, ClientResult};

/// A connected replicator: `send` queues an outbound message, `inbox`
/// yields decoded inbound ones in arrival order.
pub struct Replicator {
    outbound: UnboundedSender<Vec<u8>>,
    inbox: async_channel::Receiver<ServerMessage>,
}

impl Replicator {
    pub async fn connect(url: &str) -> ClientResult<Self> {
        let request = url
            .into_client_request()
            .map_err(|e| ClientError::ConnectionFailure(e.to_string()))?;
        let (stream, _) = connect_async(request)
            .await
            .map_err(|e| ClientError::ConnectionFailure(e.to_string()))?;

        let (mut writer, mut reader) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let (inbox_tx, inbox_rx) = async_channel::unbounded();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outgoing = outbound_rx.recv() => {
                        match outgoing {
                            Some(bytes) => {
                                if writer.send(Message::Binary(bytes.into())).await.is_err() {
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                    incoming = reader.next() => {
                        match incoming {
                            Some(Ok(Message::Binary(bytes))) => {
                                match ServerMessage::decode(&bytes) {
                                    Ok(message) => {
                                        if inbox_tx.send(message).await.is_err() {
                                            break;
                                        }
                                    }
                                    Err(err) => log::warn!("dropped malformed server message: {err}"),
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Ok(_)) => continue,
                            Some(Err(err)) => {
                                log::warn!("websocket read error: {err}");
                                break;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self { outbound: outbound_tx, inbox: inbox_rx })
    }

    pub fn send(&self, message: &ClientMessage) -> ClientResult<()> {
        self.outbound.send(message.encode()).map_err(|_| ClientError::NotConnected)
    }

    pub async fn recv(&self) -> Option<ServerMessage> {
        self.inbox.recv().await.ok()
    }

    /// Non-blocking drain of one pending inbound message, for callers
    /// driving their own fixed-tick loop rather than awaiting.
    pub fn try_recv(&self) -> Result<ServerMessage, async_channel::TryRecvError> {
        self.inbox.try_recv()
    }
}
