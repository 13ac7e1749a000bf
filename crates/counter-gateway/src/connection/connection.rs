//! A single gateway connection
//!
//! Opens the socket, performs the handshake, then reads frames until the
//! connection ends. Dispatches are handled inline, one at a time.

use std::sync::Arc;
use std::time::Duration;

use counter_service::BotContext;
use futures_util::{SinkExt, Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, trace, warn};

use super::heartbeat::{spawn_heartbeat, HeartbeatMonitor};
use super::session::Session;
use crate::error::{GatewayError, GatewayResult};
use crate::events::{DispatchEvent, EventHandler};
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload, IdentifyPayload, OpCode};

/// Channel buffer size for outgoing messages
const OUTBOUND_BUFFER_SIZE: usize = 32;

/// How long the server may take to send Hello
const HELLO_TIMEOUT: Duration = Duration::from_secs(30);

/// How long the writer may take to flush and close the socket
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a connection ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    /// Connect again and resume if the session allows it
    Resume,
    /// The session is gone; connect again and identify
    Reidentify,
}

/// Run one connection to the end
///
/// Returns how to continue, or an error if the bot must stop.
pub async fn run_connection(
    ctx: &BotContext,
    token: &str,
    url: &str,
    session: &mut Session,
) -> GatewayResult<Disconnect> {
    info!(resume = session.can_resume(), "Connecting to gateway");
    let (socket, _) = connect_async(url).await?;
    let (mut sink, mut stream) = socket.split();

    let hello = tokio::time::timeout(HELLO_TIMEOUT, wait_for_hello(&mut stream))
        .await
        .map_err(|_| GatewayError::Protocol("timed out waiting for Hello".to_string()))??;
    debug!(heartbeat_interval_ms = hello.heartbeat_interval, "Hello received");

    // Writer task owns the sink
    let (outbound, mut outbound_rx) = mpsc::channel::<GatewayMessage>(OUTBOUND_BUFFER_SIZE);
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let json = match msg.to_json() {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to encode gateway message");
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(json)).await {
                warn!(error = %e, "Failed to send gateway message");
                break;
            }
        }
        let _ = sink.close().await;
    });

    let monitor = HeartbeatMonitor::new(session.sequence());
    let mut heartbeat = spawn_heartbeat(hello.interval(), Arc::clone(&monitor), outbound.clone());

    let handshake = match session.resume_payload(token) {
        Some(resume) => {
            info!(seq = resume.seq, "Resuming gateway session");
            GatewayMessage::resume(&resume)
        }
        None => {
            info!("Identifying with gateway");
            GatewayMessage::identify(&IdentifyPayload::new(token))
        }
    };

    let outcome = if outbound.send(handshake).await.is_err() {
        Err(GatewayError::Protocol("socket closed before handshake".to_string()))
    } else {
        let mut reader = Reader {
            ctx,
            session,
            monitor: &monitor,
            outbound: &outbound,
        };

        loop {
            tokio::select! {
                frame = stream.next() => match reader.on_frame(frame).await {
                    Ok(Some(end)) => break Ok(end),
                    Ok(None) => {}
                    Err(e) => break Err(e),
                },
                _ = &mut heartbeat => break Ok(Disconnect::Resume),
            }
        }
    };

    heartbeat.abort();
    drop(outbound);
    let _ = tokio::time::timeout(CLOSE_TIMEOUT, writer).await;

    outcome
}

/// Read frames until Hello arrives
async fn wait_for_hello<S>(stream: &mut S) -> GatewayResult<HelloPayload>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => {
                let msg = GatewayMessage::from_json(&text)
                    .map_err(|e| GatewayError::Protocol(format!("undecodable first message: {e}")))?;
                return msg.as_hello().ok_or_else(|| {
                    GatewayError::Protocol(format!("expected Hello, got {msg}"))
                });
            }
            Message::Close(frame) => {
                return Err(GatewayError::Protocol(format!(
                    "closed before Hello: {frame:?}"
                )));
            }
            _ => {}
        }
    }
    Err(GatewayError::Protocol("stream ended before Hello".to_string()))
}

/// Read-side state of a live connection
struct Reader<'a> {
    ctx: &'a BotContext,
    session: &'a mut Session,
    monitor: &'a HeartbeatMonitor,
    outbound: &'a mpsc::Sender<GatewayMessage>,
}

impl Reader<'_> {
    /// Handle one frame; `Some` ends the connection
    async fn on_frame(
        &mut self,
        frame: Option<Result<Message, tungstenite::Error>>,
    ) -> GatewayResult<Option<Disconnect>> {
        match frame {
            None => {
                warn!("Gateway stream ended");
                Ok(Some(Disconnect::Resume))
            }
            Some(Err(e)) => {
                warn!(error = %e, "Gateway socket error");
                Ok(Some(Disconnect::Resume))
            }
            Some(Ok(Message::Text(text))) => self.on_text(&text).await,
            Some(Ok(Message::Close(frame))) => {
                let (code, reason) = match frame {
                    Some(frame) => (Some(u16::from(frame.code)), frame.reason.into_owned()),
                    None => (None, String::new()),
                };
                info!(code = ?code, reason = %reason, "Gateway closed the connection");
                disconnect_for_close(code, reason, self.session).map(Some)
            }
            // Pings are answered by tungstenite; the JSON encoding never sends binary
            Some(Ok(_)) => Ok(None),
        }
    }

    async fn on_text(&mut self, text: &str) -> GatewayResult<Option<Disconnect>> {
        let msg = match GatewayMessage::from_json(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "Skipping undecodable gateway message");
                return Ok(None);
            }
        };

        match msg.op {
            OpCode::Dispatch => {
                self.on_dispatch(msg).await?;
                Ok(None)
            }
            OpCode::Heartbeat => {
                trace!("Server requested a heartbeat");
                let _ = self.outbound.send(self.monitor.heartbeat()).await;
                Ok(None)
            }
            OpCode::HeartbeatAck => {
                if let Some(latency) = self.monitor.ack() {
                    trace!(latency_ms = latency.as_millis() as u64, "Heartbeat acknowledged");
                }
                Ok(None)
            }
            OpCode::Reconnect => {
                info!("Gateway requested a reconnect");
                Ok(Some(Disconnect::Resume))
            }
            OpCode::InvalidSession => {
                let resumable = msg.as_invalid_session().unwrap_or(false);
                warn!(resumable, "Gateway session invalidated");
                if resumable {
                    Ok(Some(Disconnect::Resume))
                } else {
                    self.session.invalidate();
                    Ok(Some(Disconnect::Reidentify))
                }
            }
            other => {
                debug!(op = %other, "Ignoring unexpected op code");
                Ok(None)
            }
        }
    }

    async fn on_dispatch(&mut self, msg: GatewayMessage) -> GatewayResult<()> {
        let GatewayMessage { t, s, d, .. } = msg;

        if let Some(sequence) = s {
            self.session.record_sequence(sequence);
            self.monitor.set_sequence(sequence);
        }
        let Some(name) = t else {
            return Ok(());
        };

        let event = match DispatchEvent::parse(&name, d.unwrap_or(Value::Null)) {
            Ok(Some(event)) => event,
            Ok(None) => {
                trace!(event = %name, "Skipping dispatch");
                return Ok(());
            }
            Err(e) => {
                warn!(event = %name, error = %e, "Skipping malformed dispatch");
                return Ok(());
            }
        };

        if let DispatchEvent::Ready(ready) = &event {
            self.session
                .start(ready.session_id.clone(), ready.resume_gateway_url.clone());
        }

        EventHandler::new(self.ctx).handle(event).await?;
        Ok(())
    }
}

/// Decide how to continue after the server closed the socket
fn disconnect_for_close(
    code: Option<u16>,
    reason: String,
    session: &mut Session,
) -> GatewayResult<Disconnect> {
    match code.and_then(CloseCode::from_u16) {
        Some(code) if !code.should_reconnect() => Err(GatewayError::Closed { code, reason }),
        Some(code) if !code.can_resume() => {
            session.invalidate();
            Ok(Disconnect::Reidentify)
        }
        _ => Ok(Disconnect::Resume),
    }
}
