//! # counter-service
//!
//! Application layer of the counting bot: command parsing and execution,
//! the message adapter around the game engine, permission checks, and the
//! port through which the bot talks to the chat platform.

pub mod cache;
pub mod commands;
pub mod dto;
pub mod platform;
pub mod services;

pub use cache::{CachedChannel, CachedGuild, GuildCache};
pub use commands::{parse_command, ChannelArg, Command, CommandContext, ParseOutcome};
pub use dto::{render_leaderboard, Embed, IncomingMessage, Reply};
pub use platform::{ChatPlatform, PlatformError, PlatformResult};
pub use services::{
    BotContext, BotContextBuilder, CounterService, MessageService, PermissionService,
    ServiceError, ServiceResult,
};
