//! REST adapter for the chat platform

mod client;

pub use client::RestClient;
