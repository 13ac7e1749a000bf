//! Business logic services
//!
//! Command handling, the counting game adapter and permission checks,
//! all operating on a shared [`BotContext`].

pub mod context;
pub mod counter;
pub mod error;
pub mod message;
pub mod permission;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export all services for convenience
pub use context::{BotContext, BotContextBuilder};
pub use counter::CounterService;
pub use error::{ServiceError, ServiceResult};
pub use message::MessageService;
pub use permission::PermissionService;
