//! Chat Platform Port
//!
//! Abstract interface over the remote operations the relay needs from a
//! messaging platform such as Discord.
//!
//! Implementations should live in separate crates
//! (e.g., runic-integration-discord) and map their transport errors onto
//! [`PlatformError`] so that not-found and forbidden can be told apart.

use async_trait::async_trait;

use crate::domain::entities::{
    ChannelId, GuildId, MessageId, OutgoingMessage, PersonaEndpoint, PostedMessage,
    ReferenceToken, UserId, UserProfile,
};
use crate::domain::errors::PlatformError;

/// Remote operations of a chat platform
///
/// # Example
///
/// ```rust,ignore
/// use runic::ports::ChatPlatform;
///
/// struct DiscordClient { /* serenity http */ }
///
/// #[async_trait]
/// impl ChatPlatform for DiscordClient {
///     async fn list_endpoints(&self, channel_id: ChannelId)
///         -> Result<Vec<PersonaEndpoint>, PlatformError>
///     {
///         // GET /channels/{id}/webhooks
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// List the impersonation endpoints registered on a channel
    ///
    /// Channels that cannot hold endpoints at all (threads) report
    /// `NotFound` or `Unsupported`.
    async fn list_endpoints(
        &self,
        channel_id: ChannelId,
    ) -> Result<Vec<PersonaEndpoint>, PlatformError>;

    /// Create an impersonation endpoint with the given name
    async fn create_endpoint(
        &self,
        channel_id: ChannelId,
        name: &str,
    ) -> Result<PersonaEndpoint, PlatformError>;

    /// Publish through an endpoint, under the message's username and avatar
    async fn execute_endpoint(
        &self,
        endpoint: &PersonaEndpoint,
        message: &OutgoingMessage,
    ) -> Result<PostedMessage, PlatformError>;

    /// Post as the bot itself
    async fn create_message(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> Result<PostedMessage, PlatformError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError>;

    async fn fetch_user(&self, user_id: UserId) -> Result<UserProfile, PlatformError>;

    /// Fetch the named tokens of the reference symbol source
    async fn fetch_reference_tokens(
        &self,
        source: GuildId,
    ) -> Result<Vec<ReferenceToken>, PlatformError>;
}
