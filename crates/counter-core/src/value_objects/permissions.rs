//! Permission bitflags mirroring the platform's access control bits
//!
//! Only the bits the bot reasons about are named; unknown bits are kept
//! through `from_bits_retain` so that round-trips stay lossless.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Platform permission flags
    ///
    /// Serialized as a decimal string in JSON, as the platform does.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        /// Kick members from guild
        const KICK_MEMBERS     = 1 << 1;
        /// Ban members from guild
        const BAN_MEMBERS      = 1 << 2;
        /// Bypass all permission checks
        const ADMINISTRATOR    = 1 << 3;
        /// Create, edit, delete channels (includes slowmode)
        const MANAGE_CHANNELS  = 1 << 4;
        /// Edit guild settings
        const MANAGE_GUILD     = 1 << 5;
        /// Add emoji reactions
        const ADD_REACTIONS    = 1 << 6;
        /// View channel and read messages
        const VIEW_CHANNEL     = 1 << 10;
        /// Send messages in text channels
        const SEND_MESSAGES    = 1 << 11;
        /// Delete other users' messages
        const MANAGE_MESSAGES  = 1 << 13;
        /// Send embeds
        const EMBED_LINKS      = 1 << 14;
        /// Read message history
        const READ_MESSAGE_HISTORY = 1 << 16;
        /// Create, edit, delete, assign roles
        const MANAGE_ROLES     = 1 << 28;

        /// All permissions (for server owners)
        const ALL = u64::MAX;
    }
}

impl Permissions {
    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.contains(permission)
    }

    /// Combine permissions from multiple roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Parse from string representation (decimal number)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse::<u64>().map(Permissions::from_bits_retain)
    }

    /// Get a list of the named permissions that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names()
            .filter(|(name, _)| *name != "ALL")
            .map(|(name, _)| name)
            .collect()
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PermissionsVisitor;

        impl Visitor<'_> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing permission bits")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Ok(Permissions::from_bits_retain(value as u64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Ok(Permissions::from_bits_retain(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Permissions::parse(value).map_err(|_| de::Error::custom("invalid permission bits"))
            }
        }

        deserializer.deserialize_any(PermissionsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_bypasses() {
        let admin = Permissions::ADMINISTRATOR;
        assert!(admin.has(Permissions::MANAGE_MESSAGES));
        assert!(admin.has(Permissions::MANAGE_CHANNELS));
    }

    #[test]
    fn test_has_requires_bit() {
        let perms = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        assert!(perms.has(Permissions::SEND_MESSAGES));
        assert!(!perms.has(Permissions::MANAGE_MESSAGES));
    }

    #[test]
    fn test_combine() {
        let combined = Permissions::combine([
            Permissions::VIEW_CHANNEL,
            Permissions::MANAGE_MESSAGES,
        ]);
        assert!(combined.contains(Permissions::VIEW_CHANNEL | Permissions::MANAGE_MESSAGES));
        assert_eq!(Permissions::combine([]), Permissions::empty());
    }

    #[test]
    fn test_platform_bit_values() {
        assert_eq!(Permissions::MANAGE_MESSAGES.bits(), 8192);
        assert_eq!(Permissions::ADMINISTRATOR.bits(), 8);
    }

    #[test]
    fn test_parse_keeps_unknown_bits() {
        let perms = Permissions::parse("2147483648").unwrap();
        assert_eq!(perms.bits(), 2147483648);
        assert!(Permissions::parse("abc").is_err());
    }

    #[test]
    fn test_list() {
        let perms = Permissions::MANAGE_MESSAGES | Permissions::VIEW_CHANNEL;
        let names = perms.list();
        assert!(names.contains(&"MANAGE_MESSAGES"));
        assert!(names.contains(&"VIEW_CHANNEL"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_json_roundtrip_as_string() {
        let json = serde_json::to_string(&Permissions::MANAGE_MESSAGES).unwrap();
        assert_eq!(json, "\"8192\"");
        let perms: Permissions = serde_json::from_str("\"8200\"").unwrap();
        assert!(perms.contains(Permissions::MANAGE_MESSAGES | Permissions::ADMINISTRATOR));
    }
}
