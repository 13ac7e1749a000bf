//! Gateway intents
//!
//! Intents select which dispatch events the gateway delivers to a session.

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// Gateway intent flags, sent as a plain integer in Identify
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        /// Guild, role and channel lifecycle events
        const GUILDS          = 1;
        /// Member events (privileged)
        const GUILD_MEMBERS   = 1 << 1;
        /// Messages created in guild channels
        const GUILD_MESSAGES  = 1 << 9;
        /// Message content in message events (privileged)
        const MESSAGE_CONTENT = 1 << 15;
    }
}

impl Intents {
    /// Everything the counting bot subscribes to
    #[must_use]
    pub const fn counting_bot() -> Self {
        Self::GUILDS
            .union(Self::GUILD_MEMBERS)
            .union(Self::GUILD_MESSAGES)
            .union(Self::MESSAGE_CONTENT)
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_bot_intents() {
        let intents = Intents::counting_bot();
        assert_eq!(intents.bits(), 1 | 2 | 512 | 32768);
        assert!(intents.contains(Intents::MESSAGE_CONTENT));
    }

    #[test]
    fn test_serialized_as_number() {
        let json = serde_json::to_string(&Intents::GUILD_MESSAGES).unwrap();
        assert_eq!(json, "512");
    }
}
