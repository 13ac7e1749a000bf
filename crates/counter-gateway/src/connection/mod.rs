//! Gateway connection management
//!
//! Session state kept across reconnects, heartbeating, and the read loop of
//! a single connection.

mod connection;
mod heartbeat;
mod session;

pub use connection::{run_connection, Disconnect};
pub use heartbeat::{first_beat_delay, spawn_heartbeat, HeartbeatMonitor};
pub use session::Session;
