//! Discord Integration for Runic Babble
//!
//! This crate wires the relay core into Discord: a serenity-backed
//! [`ChatPlatform`](runic::ChatPlatform), the `/mdj` slash command and the
//! gateway event handler.
//!
//! # Usage
//!
//! ```rust,ignore
//! use runic_integration_discord::{run, DiscordClient, DiscordConfig};
//!
//! let config = DiscordConfig::new("your-bot-token").with_home_guild(1234);
//! let platform = Arc::new(DiscordClient::new(&config));
//! let dispatcher = Arc::new(RelayDispatcher::new(platform, pipeline, options));
//! run(config, dispatcher).await?;
//! ```

mod client;
pub mod commands;
mod config;
mod handler;

pub use client::DiscordClient;
pub use config::DiscordConfig;
pub use handler::{run, RelayHandler, PRESENCE};
