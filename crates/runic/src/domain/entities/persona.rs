//! PersonaEndpoint - Per-channel impersonation webhook
//!
//! A persona endpoint lets the bot publish a message that renders with an
//! arbitrary display name and avatar. Exactly one is tracked per channel.

use std::fmt;

use super::{ChannelId, EndpointId};

/// Name prefix shared by every endpoint this bot creates
pub const PERSONA_PREFIX: &str = "persona-";

/// Deterministic endpoint name for a channel
///
/// Used both when creating an endpoint and when adopting one that survived
/// a restart, so the match is exact and case-sensitive.
pub fn persona_name(channel_id: ChannelId) -> String {
    format!("{PERSONA_PREFIX}{channel_id}")
}

/// A remote impersonation endpoint bound to one channel
#[derive(Clone, PartialEq, Eq)]
pub struct PersonaEndpoint {
    pub id: EndpointId,
    pub channel_id: ChannelId,
    pub name: String,
    /// Execute URL; carries the endpoint credentials
    pub url: String,
}

impl PersonaEndpoint {
    pub fn new(
        id: EndpointId,
        channel_id: ChannelId,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            name: name.into(),
            url: url.into(),
        }
    }

    /// Whether this endpoint carries the persona name for its channel
    pub fn is_persona_for(&self, channel_id: ChannelId) -> bool {
        self.name == persona_name(channel_id)
    }
}

impl fmt::Debug for PersonaEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonaEndpoint")
            .field("id", &self.id)
            .field("channel_id", &self.channel_id)
            .field("name", &self.name)
            .field("url", &"<redacted>")
            .finish()
    }
}
