//! Typed dispatch events

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::event_types::GatewayEventType;
use super::payloads::{
    ChannelPayload, GuildCreateEvent, GuildDeleteEvent, GuildRoleDeleteEvent, GuildRoleEvent,
    GuildUpdateEvent, MessageCreateEvent, ReadyEvent,
};

/// A dispatch event the bot acts on
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    Ready(ReadyEvent),
    Resumed,
    GuildCreate(GuildCreateEvent),
    GuildUpdate(GuildUpdateEvent),
    GuildDelete(GuildDeleteEvent),
    GuildRoleCreate(GuildRoleEvent),
    GuildRoleUpdate(GuildRoleEvent),
    GuildRoleDelete(GuildRoleDeleteEvent),
    ChannelCreate(ChannelPayload),
    ChannelUpdate(ChannelPayload),
    ChannelDelete(ChannelPayload),
    MessageCreate(MessageCreateEvent),
}

impl DispatchEvent {
    /// Decode the data of a dispatch named `name`
    ///
    /// Returns `Ok(None)` for events the bot does not handle.
    pub fn parse(name: &str, data: Value) -> Result<Option<Self>, serde_json::Error> {
        let Some(kind) = GatewayEventType::from_str(name) else {
            return Ok(None);
        };

        let event = match kind {
            GatewayEventType::Ready => Self::Ready(decode(data)?),
            GatewayEventType::Resumed => Self::Resumed,
            GatewayEventType::GuildCreate => Self::GuildCreate(decode(data)?),
            GatewayEventType::GuildUpdate => Self::GuildUpdate(decode(data)?),
            GatewayEventType::GuildDelete => Self::GuildDelete(decode(data)?),
            GatewayEventType::GuildRoleCreate => Self::GuildRoleCreate(decode(data)?),
            GatewayEventType::GuildRoleUpdate => Self::GuildRoleUpdate(decode(data)?),
            GatewayEventType::GuildRoleDelete => Self::GuildRoleDelete(decode(data)?),
            GatewayEventType::ChannelCreate => Self::ChannelCreate(decode(data)?),
            GatewayEventType::ChannelUpdate => Self::ChannelUpdate(decode(data)?),
            GatewayEventType::ChannelDelete => Self::ChannelDelete(decode(data)?),
            GatewayEventType::MessageCreate => Self::MessageCreate(decode(data)?),
        };
        Ok(Some(event))
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(data)
}
