//! Reply DTOs
//!
//! Embeds serialize to the platform's embed JSON shape.

use std::fmt::Write as _;

use counter_core::{rank_marker, LeaderboardEntry};
use serde::Serialize;

/// Accent colour of leaderboard embeds
pub const LEADERBOARD_COLOR: u32 = 0x008a_2be2;

/// Something a command sends back to the invoking channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

/// Rich embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

/// Render the scoreboard embed of a channel
///
/// `entries` are the ranked rows in display order. `requester` is the
/// invoking user's own row when it is not among them.
#[must_use]
pub fn render_leaderboard(
    channel_name: &str,
    entries: &[LeaderboardEntry],
    requester: Option<&LeaderboardEntry>,
) -> Embed {
    let mut description = String::new();

    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            description,
            "{}: {} - **{}**",
            rank_marker(index + 1),
            entry.user_id.user_mention(),
            entry.score
        );
    }

    if let Some(own) = requester {
        let _ = write!(description, "Your score: {}", own.score);
    }

    Embed {
        title: format!("Scoreboard for {channel_name}"),
        description,
        color: LEADERBOARD_COLOR,
    }
}
