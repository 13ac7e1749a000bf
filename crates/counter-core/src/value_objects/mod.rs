//! Value objects - immutable types that represent domain concepts

mod overwrite;
mod permissions;
mod snowflake;

pub use overwrite::{apply_overwrites, OverwriteTarget, PermissionOverwrite};
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
