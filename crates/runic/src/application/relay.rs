//! Relay Dispatcher
//!
//! Orchestrates a relay: detect a trigger, render it, remove the original,
//! republish under the author's persona and fall back to a plain bot post
//! when impersonation is unavailable.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::{PersonaCache, RenderPipeline};
use crate::domain::{
    ChannelId, Embed, GlyphTable, GuildId, Identity, MessageId, OutgoingMessage, PlatformError,
    PostedMessage, RelayError, RenderedPayload, WrapMode,
};
use crate::ports::ChatPlatform;

/// Behaviour switches for the relay
#[derive(Debug, Clone, Default)]
pub struct RelayOptions {
    /// Add an embed naming the author when falling back to a bot post
    pub attribute_fallback: bool,
}

/// A chat message as delivered by the gateway
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author: Identity,
    pub content: String,
}

/// An invocation of the `mdj` command
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub channel_id: ChannelId,
    pub user: Identity,
    pub content: String,
    pub wrap: WrapMode,
    pub line_width: u32,
}

/// What happened to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Nothing to relay
    Ignored,
    /// Published under the author's persona
    Impersonated(PostedMessage),
    /// Posted as the bot itself; attribution is lost
    Direct(PostedMessage),
}

pub struct RelayDispatcher<P: ChatPlatform> {
    platform: Arc<P>,
    pipeline: RenderPipeline,
    personas: PersonaCache<P>,
    options: RelayOptions,
}

impl<P: ChatPlatform> RelayDispatcher<P> {
    pub fn new(platform: Arc<P>, pipeline: RenderPipeline, options: RelayOptions) -> Self {
        let personas = PersonaCache::new(platform.clone());
        Self {
            platform,
            pipeline,
            personas,
            options,
        }
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Build the glyph table from the reference symbol source and install it
    ///
    /// On failure the previously installed table, if any, stays in place.
    pub async fn load_glyph_table(&self, source: GuildId) -> Result<usize, RelayError> {
        let tokens = self.platform.fetch_reference_tokens(source).await?;
        let table = GlyphTable::build(&tokens)?;
        let glyphs = table.len();
        self.pipeline.install_table(table).await;
        info!(source = %source, glyphs = %glyphs, "Reloaded glyph tokens from the reference source");
        Ok(glyphs)
    }

    /// Relay an inbound chat message if it holds a trigger span
    pub async fn on_message(&self, message: InboundMessage) -> Result<RelayOutcome, RelayError> {
        let Some(payload) = self.pipeline.render_inline(&message.content).await? else {
            return Ok(RelayOutcome::Ignored);
        };

        if !OutgoingMessage::from_payload(&payload).has_body() {
            debug!(message_id = %message.id, "Rendered message is empty, leaving original");
            return Ok(RelayOutcome::Ignored);
        }

        match self
            .platform
            .delete_message(message.channel_id, message.id)
            .await
        {
            Ok(()) => {}
            Err(PlatformError::NotFound(_)) => {
                debug!(message_id = %message.id, "Original message already deleted");
            }
            Err(e) => return Err(e.into()),
        }

        self.publish(message.channel_id, &payload, message.author)
            .await
    }

    /// Render a command's text as an image and publish it
    pub async fn on_command(
        &self,
        command: CommandInvocation,
    ) -> Result<RelayOutcome, RelayError> {
        let payload = self
            .pipeline
            .render_command(&command.content, command.wrap, command.line_width)
            .await?;

        self.publish(command.channel_id, &payload, command.user)
            .await
    }

    async fn publish(
        &self,
        channel_id: ChannelId,
        payload: &RenderedPayload,
        identity: Identity,
    ) -> Result<RelayOutcome, RelayError> {
        if let Some(posted) = self
            .personas
            .publish_via(channel_id, payload, identity.clone())
            .await?
        {
            return Ok(RelayOutcome::Impersonated(posted));
        }

        warn!(channel_id = %channel_id, "Persona unavailable, posting as the bot");
        let mut direct = OutgoingMessage::from_payload(payload);
        if self.options.attribute_fallback {
            direct = direct.with_embed(attribution(&identity));
        }

        let posted = self.platform.create_message(channel_id, &direct).await?;
        Ok(RelayOutcome::Direct(posted))
    }
}

fn attribution(identity: &Identity) -> Embed {
    Embed {
        author_name: identity.username.clone(),
        author_icon_url: identity.avatar_url.clone(),
        description: identity.user_id.map(|id| format!("on behalf of <@{id}>")),
    }
}
