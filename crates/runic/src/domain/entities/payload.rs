//! Payloads - Rendered output and the outgoing message shape

use serde::{Deserialize, Serialize};

use super::{ChannelId, MessageId, UserId};

/// A binary file attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Result of a render: text content or an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedPayload {
    /// Token-substituted message text
    Text { content: String },
    /// Rendered image with an optional caption
    Attachment {
        attachment: Attachment,
        caption: Option<String>,
    },
}

impl RenderedPayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn attachment(attachment: Attachment) -> Self {
        Self::Attachment {
            attachment,
            caption: None,
        }
    }

    /// Get the text content or caption if available
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::Attachment { caption, .. } => caption.as_deref(),
        }
    }
}

/// Minimal embed; only used to attribute direct fallback posts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub author_name: Option<String>,
    pub author_icon_url: Option<String>,
    pub description: Option<String>,
}

/// Display name and avatar of a platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// The visual identity a message is published under
///
/// Either given explicitly, or as a user reference resolved once through
/// the platform when the name or avatar is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl Identity {
    /// Identity of a user that still has to be fetched
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Identity taken from an already known profile
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            user_id: Some(profile.id),
            username: Some(profile.username.clone()),
            avatar_url: profile.avatar_url.clone(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// A user reference is known but the name or avatar is not
    pub fn needs_lookup(&self) -> bool {
        self.user_id.is_some() && (self.username.is_none() || self.avatar_url.is_none())
    }

    /// Fill the missing fields from a fetched profile; explicit values win
    pub fn resolve_with(mut self, profile: UserProfile) -> Self {
        if self.username.is_none() {
            self.username = Some(profile.username);
        }
        if self.avatar_url.is_none() {
            self.avatar_url = profile.avatar_url;
        }
        self
    }
}

/// Everything that crosses into a publish call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub attachment: Option<Attachment>,
    pub embeds: Vec<Embed>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl OutgoingMessage {
    pub fn from_payload(payload: &RenderedPayload) -> Self {
        match payload {
            RenderedPayload::Text { content } => Self {
                content: Some(content.clone()),
                ..Self::default()
            },
            RenderedPayload::Attachment {
                attachment,
                caption,
            } => Self {
                content: caption.clone(),
                attachment: Some(attachment.clone()),
                ..Self::default()
            },
        }
    }

    /// Publish under the given identity (persona path)
    pub fn with_identity(mut self, identity: &Identity) -> Self {
        self.username = identity.username.clone();
        self.avatar_url = identity.avatar_url.clone();
        self
    }

    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// At least one of content, attachment or embeds is set
    pub fn has_body(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
            || self.attachment.is_some()
            || !self.embeds.is_empty()
    }
}

/// A message the platform accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostedMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
}
