//! Channel permission overwrites
//!
//! A channel may adjust the guild-level permissions of a role or of a single
//! member. Overwrites apply in a fixed order: @everyone, then all of the
//! member's roles together, then the member itself.

use super::{Permissions, Snowflake};

/// Whom an overwrite targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverwriteTarget {
    /// A role; the @everyone role shares the guild's ID
    Role,
    Member,
}

/// Permission adjustment of one role or member on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    pub target: OverwriteTarget,
    pub allow: Permissions,
    pub deny: Permissions,
}

impl PermissionOverwrite {
    #[must_use]
    pub fn role(id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id,
            target: OverwriteTarget::Role,
            allow,
            deny,
        }
    }

    #[must_use]
    pub fn member(id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id,
            target: OverwriteTarget::Member,
            allow,
            deny,
        }
    }
}

/// Apply a channel's overwrites to a member's guild-level permissions
///
/// `guild_id` identifies the @everyone role. Administrator rights cannot be
/// granted through an overwrite; callers handle administrators and owners
/// before getting here.
#[must_use]
pub fn apply_overwrites(
    base: Permissions,
    guild_id: Snowflake,
    user_id: Snowflake,
    role_ids: &[Snowflake],
    overwrites: &[PermissionOverwrite],
) -> Permissions {
    let mut permissions = base;
    let mut apply = |allow: Permissions, deny: Permissions| {
        permissions.remove(deny);
        permissions.insert(allow.difference(Permissions::ADMINISTRATOR));
    };

    if let Some(everyone) = overwrites
        .iter()
        .find(|o| o.target == OverwriteTarget::Role && o.id == guild_id)
    {
        apply(everyone.allow, everyone.deny);
    }

    let (role_allow, role_deny) = overwrites
        .iter()
        .filter(|o| o.target == OverwriteTarget::Role && o.id != guild_id && role_ids.contains(&o.id))
        .fold((Permissions::empty(), Permissions::empty()), |(allow, deny), o| {
            (allow | o.allow, deny | o.deny)
        });
    apply(role_allow, role_deny);

    if let Some(member) = overwrites
        .iter()
        .find(|o| o.target == OverwriteTarget::Member && o.id == user_id)
    {
        apply(member.allow, member.deny);
    }

    permissions
}
