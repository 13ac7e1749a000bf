//! Gateway events
//!
//! Decoding of the dispatch events the bot handles and their effect on the
//! bot's state.

mod dispatch;
mod event_types;
mod handler;
mod payloads;

pub use dispatch::DispatchEvent;
pub use event_types::GatewayEventType;
pub use handler::EventHandler;
pub use payloads::{
    role_map, ChannelPayload, GuildCreateEvent, GuildDeleteEvent, GuildRoleDeleteEvent,
    GuildRoleEvent, GuildUpdateEvent, MemberPayload, MessageCreateEvent, ReadyEvent, RolePayload,
    UserPayload,
};
