//! Data transfer objects
//!
//! - Inbound message events as handed over by the gateway
//! - Replies produced by commands, including the leaderboard embed

pub mod replies;
pub mod requests;

pub use replies::{render_leaderboard, Embed, Reply, LEADERBOARD_COLOR};
pub use requests::IncomingMessage;
