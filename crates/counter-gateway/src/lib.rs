//! # counter-gateway
//!
//! Connects the counting bot to the chat platform: the gateway WebSocket
//! client that receives events, and the REST client the services use to act.

pub mod bot;
pub mod client;
pub mod connection;
pub mod error;
pub mod events;
pub mod protocol;
pub mod rest;

pub use bot::run;
pub use client::GatewayClient;
pub use error::{GatewayError, GatewayResult};
pub use rest::RestClient;
