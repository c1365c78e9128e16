//! Discord API client wrapper
//!
//! Implements the [`ChatPlatform`] port over serenity's HTTP client. Each
//! channel's persona is an incoming webhook; execution goes through the
//! webhook token carried in the endpoint's execute URL.

use async_trait::async_trait;
use serenity::builder::{
    CreateAttachment, CreateEmbed, CreateEmbedAuthor, CreateMessage, CreateWebhook, ExecuteWebhook,
};
use serenity::http::{Http, HttpError};
use serenity::model::channel::Message as SerenityMessage;
use serenity::model::id::{
    ChannelId as DiscordChannelId, GuildId as DiscordGuildId, MessageId as DiscordMessageId,
    UserId as DiscordUserId, WebhookId,
};
use serenity::model::webhook::{Webhook, WebhookType};
use std::sync::Arc;
use tracing::{debug, error};

use runic::{
    Attachment, ChannelId, ChatPlatform, Embed, EndpointId, GuildId, MessageId, OutgoingMessage,
    PersonaEndpoint, PlatformError, PostedMessage, ReferenceToken, UserId, UserProfile,
};

use crate::config::DiscordConfig;

/// Discord API client
pub struct DiscordClient {
    http: Arc<Http>,
}

impl DiscordClient {
    /// Create a new Discord client
    pub fn new(config: &DiscordConfig) -> Self {
        Self {
            http: Arc::new(Http::new(&config.bot_token)),
        }
    }
}

/// Discord JSON error: "Cannot execute action on this channel type"
const CHANNEL_TYPE_UNSUPPORTED: i64 = 50024;
/// Discord JSON error: "Unknown Webhook"
const UNKNOWN_WEBHOOK: i64 = 10015;

/// Classify a failed request into the platform error taxonomy
///
/// The JSON error code, when Discord sent one, wins over the HTTP status.
pub(crate) fn classify(status: u16, code: Option<i64>, context: impl Into<String>) -> PlatformError {
    let context = context.into();
    match (code, status) {
        (Some(CHANNEL_TYPE_UNSUPPORTED), _) => PlatformError::Unsupported(context),
        (Some(UNKNOWN_WEBHOOK), _) | (_, 404) => PlatformError::NotFound(context),
        (_, 403) => PlatformError::Forbidden(context),
        (Some(code), _) => PlatformError::Request(format!("{context}: HTTP {status} (code {code})")),
        (None, _) => PlatformError::Request(format!("{context}: HTTP {status}")),
    }
}

fn map_error(err: serenity::Error, context: &str) -> PlatformError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => classify(
            response.status_code.as_u16(),
            Some(response.error.code as i64),
            context,
        ),
        serenity::Error::Http(http_err) => match http_err.status_code() {
            Some(status) => classify(status.as_u16(), None, context),
            None => PlatformError::Request(format!("{context}: {err}")),
        },
        _ => PlatformError::Request(format!("{context}: {err}")),
    }
}

/// Token segment of a webhook execute URL (`.../webhooks/<id>/<token>`)
pub(crate) fn webhook_token(url: &str) -> Option<&str> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let token = segments.next()?;
    let id = segments.next()?;
    if token.is_empty() || id.parse::<u64>().is_err() {
        return None;
    }
    Some(token)
}

fn to_endpoint(channel_id: ChannelId, webhook: &Webhook) -> Option<PersonaEndpoint> {
    if webhook.kind != WebhookType::Incoming {
        return None;
    }
    let name = webhook.name.clone()?;
    // Webhooks created by other applications carry no token
    let url = webhook.url().ok()?;
    Some(PersonaEndpoint::new(
        EndpointId(webhook.id.get()),
        channel_id,
        name,
        url,
    ))
}

fn to_posted(message: &SerenityMessage) -> PostedMessage {
    PostedMessage {
        id: MessageId(message.id.get()),
        channel_id: ChannelId(message.channel_id.get()),
    }
}

fn build_embed(embed: &Embed) -> CreateEmbed {
    let mut built = CreateEmbed::new();
    if let Some(name) = &embed.author_name {
        let mut author = CreateEmbedAuthor::new(name);
        if let Some(icon) = &embed.author_icon_url {
            author = author.icon_url(icon);
        }
        built = built.author(author);
    }
    if let Some(description) = &embed.description {
        built = built.description(description);
    }
    built
}

fn build_attachment(attachment: &Attachment) -> CreateAttachment {
    CreateAttachment::bytes(attachment.bytes.clone(), attachment.filename.clone())
}

#[async_trait]
impl ChatPlatform for DiscordClient {
    async fn list_endpoints(
        &self,
        channel_id: ChannelId,
    ) -> Result<Vec<PersonaEndpoint>, PlatformError> {
        debug!(channel_id = %channel_id, "Listing channel webhooks");

        let webhooks = DiscordChannelId::new(channel_id.get())
            .webhooks(&self.http)
            .await
            .map_err(|e| map_error(e, "list webhooks"))?;

        Ok(webhooks
            .iter()
            .filter_map(|webhook| to_endpoint(channel_id, webhook))
            .collect())
    }

    async fn create_endpoint(
        &self,
        channel_id: ChannelId,
        name: &str,
    ) -> Result<PersonaEndpoint, PlatformError> {
        debug!(channel_id = %channel_id, name = %name, "Creating webhook");

        let webhook = DiscordChannelId::new(channel_id.get())
            .create_webhook(&self.http, CreateWebhook::new(name))
            .await
            .map_err(|e| map_error(e, "create webhook"))?;

        to_endpoint(channel_id, &webhook).ok_or_else(|| {
            PlatformError::Request(format!("webhook {} came back without a token", webhook.id))
        })
    }

    async fn execute_endpoint(
        &self,
        endpoint: &PersonaEndpoint,
        message: &OutgoingMessage,
    ) -> Result<PostedMessage, PlatformError> {
        let token = webhook_token(&endpoint.url).ok_or_else(|| {
            PlatformError::Request(format!("webhook {} has a malformed url", endpoint.id))
        })?;

        let mut builder = ExecuteWebhook::new();
        if let Some(content) = &message.content {
            builder = builder.content(content);
        }
        if let Some(username) = &message.username {
            builder = builder.username(username);
        }
        if let Some(avatar_url) = &message.avatar_url {
            builder = builder.avatar_url(avatar_url);
        }
        if !message.embeds.is_empty() {
            builder = builder.embeds(message.embeds.iter().map(build_embed).collect());
        }
        let files = message.attachment.iter().map(build_attachment).collect();

        debug!(
            endpoint_id = %endpoint.id,
            channel_id = %endpoint.channel_id,
            "Executing webhook"
        );

        let posted = self
            .http
            .execute_webhook(
                WebhookId::new(endpoint.id.get()),
                None,
                token,
                true,
                files,
                &builder,
            )
            .await
            .map_err(|e| map_error(e, "execute webhook"))?;

        posted.as_ref().map(to_posted).ok_or_else(|| {
            PlatformError::Request(format!("webhook {} returned no message", endpoint.id))
        })
    }

    async fn create_message(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> Result<PostedMessage, PlatformError> {
        let mut builder = CreateMessage::new();
        if let Some(content) = &message.content {
            builder = builder.content(content);
        }
        if !message.embeds.is_empty() {
            builder = builder.embeds(message.embeds.iter().map(build_embed).collect());
        }
        if let Some(attachment) = &message.attachment {
            builder = builder.add_file(build_attachment(attachment));
        }

        debug!(channel_id = %channel_id, "Sending message to Discord");

        let posted = DiscordChannelId::new(channel_id.get())
            .send_message(&self.http, builder)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to send Discord message"))
            .map_err(|e| map_error(e, "send message"))?;

        Ok(to_posted(&posted))
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        debug!(channel_id = %channel_id, message_id = %message_id, "Deleting message");

        DiscordChannelId::new(channel_id.get())
            .delete_message(&self.http, DiscordMessageId::new(message_id.get()))
            .await
            .map_err(|e| map_error(e, "delete message"))
    }

    async fn fetch_user(&self, user_id: UserId) -> Result<UserProfile, PlatformError> {
        let user = DiscordUserId::new(user_id.get())
            .to_user(&self.http)
            .await
            .map_err(|e| map_error(e, "fetch user"))?;

        Ok(UserProfile {
            id: user_id,
            username: user.name.clone(),
            avatar_url: Some(user.face()),
        })
    }

    async fn fetch_reference_tokens(
        &self,
        source: GuildId,
    ) -> Result<Vec<ReferenceToken>, PlatformError> {
        let emojis = DiscordGuildId::new(source.get())
            .emojis(&self.http)
            .await
            .map_err(|e| map_error(e, "list guild emojis"))?;

        debug!(guild_id = %source, count = %emojis.len(), "Fetched guild emojis");

        Ok(emojis
            .iter()
            .map(|emoji| ReferenceToken::new(emoji.name.clone(), emoji.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            classify(404, None, "execute webhook"),
            PlatformError::NotFound("execute webhook".to_string())
        );
        assert_eq!(
            classify(403, Some(50013), "list webhooks"),
            PlatformError::Forbidden("list webhooks".to_string())
        );
        assert!(matches!(
            classify(500, None, "send message"),
            PlatformError::Request(msg) if msg.contains("500")
        ));
        assert!(matches!(
            classify(429, None, "send message"),
            PlatformError::Request(_)
        ));
    }

    #[test]
    fn test_thread_channels_are_unsupported() {
        assert_eq!(
            classify(400, Some(50024), "list webhooks"),
            PlatformError::Unsupported("list webhooks".to_string())
        );
        assert_eq!(
            classify(403, Some(50024), "create webhook"),
            PlatformError::Unsupported("create webhook".to_string())
        );
    }

    #[test]
    fn test_unknown_webhook_is_not_found() {
        assert_eq!(
            classify(400, Some(10015), "execute webhook"),
            PlatformError::NotFound("execute webhook".to_string())
        );
    }

    #[test]
    fn test_other_json_errors_keep_their_code() {
        assert!(matches!(
            classify(400, Some(50035), "send message"),
            PlatformError::Request(msg) if msg.contains("50035")
        ));
    }

    #[test]
    fn test_non_http_errors_are_requests() {
        let err = serenity::Error::Other("gateway closed");
        assert!(matches!(
            map_error(err, "send message"),
            PlatformError::Request(msg) if msg.starts_with("send message")
        ));
    }

    #[test]
    fn test_webhook_token_from_url() {
        assert_eq!(
            webhook_token("https://discord.com/api/webhooks/1234/abc-DEF_1"),
            Some("abc-DEF_1")
        );
        assert_eq!(
            webhook_token("https://discord.com/api/webhooks/1234/abc/"),
            Some("abc")
        );
    }

    #[test]
    fn test_webhook_token_rejects_malformed_urls() {
        assert_eq!(webhook_token("https://discord.com/api/webhooks/1234/"), None);
        assert_eq!(webhook_token("https://discord.com/api/webhooks/x/abc"), None);
        assert_eq!(webhook_token("abc"), None);
    }
}
