//! Permission service
//!
//! Computes member permissions in a channel from the guild cache.

use counter_core::{apply_overwrites, Permissions, Snowflake};
use tracing::{debug, instrument};

use crate::commands::CommandContext;

use super::context::BotContext;
use super::error::{ServiceError, ServiceResult};

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a BotContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Check the invoker of a command holds `permission` in the invoking
    /// channel, or fail
    #[instrument(skip(self, cmd), fields(channel_id = %cmd.channel_id, user_id = %cmd.author_id))]
    pub fn require_permission(
        &self,
        cmd: &CommandContext,
        permission: Permissions,
    ) -> ServiceResult<()> {
        let granted = match cmd.guild_id {
            Some(guild_id) => self.channel_permissions(
                guild_id,
                cmd.channel_id,
                cmd.author_id,
                &cmd.member_role_ids,
            ),
            // Nothing to manage in direct messages
            None => Permissions::empty(),
        };

        if !granted.has(permission) {
            let perm_names = permission.list().join(", ");
            return Err(ServiceError::permission_denied(perm_names));
        }
        Ok(())
    }

    /// Get all permissions for a member in a guild channel
    ///
    /// The owner and administrators hold everything. Otherwise the @everyone
    /// role is combined with the member's roles, then the channel's
    /// overwrites are applied. An uncached guild grants nothing; an uncached
    /// channel leaves the guild-level permissions as they are.
    pub fn channel_permissions(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> Permissions {
        let Some(guild) = self.ctx.guilds().get(guild_id) else {
            debug!(guild_id = %guild_id, "Guild not cached, granting no permissions");
            return Permissions::empty();
        };

        // Guild owners have all permissions
        if guild.owner_id == user_id {
            return Permissions::ALL;
        }

        let base = Permissions::combine(
            std::iter::once(guild.everyone_permissions())
                .chain(role_ids.iter().filter_map(|id| guild.roles.get(id).copied())),
        );
        if base.contains(Permissions::ADMINISTRATOR) {
            return Permissions::ALL;
        }

        let permissions = match guild.channels.get(&channel_id) {
            Some(channel) => apply_overwrites(base, guild_id, user_id, role_ids, &channel.overwrites),
            None => base,
        };

        debug!(
            user_id = %user_id,
            guild_id = %guild_id,
            channel_id = %channel_id,
            permissions = %permissions,
            "Computed member permissions"
        );

        permissions
    }
}
