//! Heartbeating
//!
//! The bot beats at the interval announced by Hello. A beat that is still
//! unacknowledged when the next one is due marks the connection as zombied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::GatewayMessage;

/// Heartbeat bookkeeping shared by the heartbeat task and the read loop
#[derive(Debug)]
pub struct HeartbeatMonitor {
    /// Last dispatch sequence, echoed in every beat
    sequence: Mutex<Option<u64>>,

    /// Whether the last beat was acknowledged
    acked: AtomicBool,

    /// When the last beat was sent
    last_sent: Mutex<Option<Instant>>,
}

impl HeartbeatMonitor {
    pub fn new(sequence: Option<u64>) -> Arc<Self> {
        Arc::new(Self {
            sequence: Mutex::new(sequence),
            acked: AtomicBool::new(true),
            last_sent: Mutex::new(None),
        })
    }

    pub fn set_sequence(&self, sequence: u64) {
        *self.sequence.lock() = Some(sequence);
    }

    pub fn sequence(&self) -> Option<u64> {
        *self.sequence.lock()
    }

    /// Heartbeat carrying the last sequence
    pub fn heartbeat(&self) -> GatewayMessage {
        GatewayMessage::heartbeat(self.sequence())
    }

    /// Start a scheduled beat
    ///
    /// Returns false if the previous beat was never acknowledged.
    pub fn begin_beat(&self) -> bool {
        if !self.acked.swap(false, Ordering::AcqRel) {
            return false;
        }
        *self.last_sent.lock() = Some(Instant::now());
        true
    }

    /// Record an ACK, returning the round trip of the last beat
    pub fn ack(&self) -> Option<Duration> {
        self.acked.store(true, Ordering::Release);
        let last_sent = *self.last_sent.lock();
        last_sent.map(|sent| sent.elapsed())
    }
}

/// Delay before the first beat: a random fraction of the interval
pub fn first_beat_delay(interval: Duration) -> Duration {
    interval.mul_f64(rand::thread_rng().gen_range(0.0..1.0))
}

/// Spawn the heartbeat task
///
/// The task ends when the connection zombies or the outbound channel closes.
pub fn spawn_heartbeat(
    interval: Duration,
    monitor: Arc<HeartbeatMonitor>,
    outbound: mpsc::Sender<GatewayMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(first_beat_delay(interval)).await;

        loop {
            if !monitor.begin_beat() {
                tracing::warn!(
                    interval_ms = interval.as_millis() as u64,
                    "Heartbeat not acknowledged, connection zombied"
                );
                return;
            }

            tracing::trace!(sequence = ?monitor.sequence(), "Sending heartbeat");
            if outbound.send(monitor.heartbeat()).await.is_err() {
                return;
            }

            tokio::time::sleep(interval).await;
        }
    })
}
