//! Gateway event handler
//!
//! Bridges serenity events into the relay dispatcher. Every event runs on
//! its own task, so handlers only log failures and never bubble them up.

use async_trait::async_trait;
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::client::{Context, EventHandler};
use serenity::gateway::ActivityData;
use serenity::model::application::{Command, CommandInteraction, Interaction};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::id::GuildId as DiscordGuildId;
use serenity::model::user::OnlineStatus;
use serenity::Client;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use runic::{
    ChannelId, CommandInvocation, GuildId, Identity, InboundMessage, MessageId, RelayDispatcher,
    RelayOutcome, UserId,
};

use crate::client::DiscordClient;
use crate::commands::{self, OptionValue, COMMAND_NAME, HELP_COMMAND_NAME};
use crate::config::DiscordConfig;

/// Presence shown while the bot is connected
pub const PRESENCE: &str = "the whispers of the otherworld";

/// Relays trigger spans and `/mdj` invocations through persona webhooks
pub struct RelayHandler {
    dispatcher: Arc<RelayDispatcher<DiscordClient>>,
    config: DiscordConfig,
}

impl RelayHandler {
    pub fn new(dispatcher: Arc<RelayDispatcher<DiscordClient>>, config: DiscordConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Intents needed to read message content in guild channels
    pub fn intents() -> GatewayIntents {
        GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT
    }

    async fn load_glyph_table(&self) {
        let Some(home_guild) = self.config.home_guild else {
            error!("No home guild configured, inline relay stays disabled");
            return;
        };

        if let Err(e) = self.dispatcher.load_glyph_table(GuildId(home_guild)).await {
            if self.dispatcher.pipeline().is_ready().await {
                error!(error = %e, "Glyph table reload failed, keeping the previous table");
            } else {
                error!(error = %e, "Glyph table could not be built, inline relay stays disabled");
            }
        }
    }

    async fn register_commands(&self, ctx: &Context) {
        let definitions = commands::definitions();

        if self.config.registers_globally() {
            match Command::set_global_commands(&ctx.http, definitions).await {
                Ok(registered) => info!(count = %registered.len(), "Registered global commands"),
                Err(e) => error!(error = %e, "Failed to register global commands"),
            }
            return;
        }

        for guild in &self.config.slash_command_guilds {
            match DiscordGuildId::new(*guild)
                .set_commands(&ctx.http, definitions.clone())
                .await
            {
                Ok(registered) => {
                    info!(guild_id = %guild, count = %registered.len(), "Registered guild commands")
                }
                Err(e) => error!(guild_id = %guild, error = %e, "Failed to register guild commands"),
            }
        }
    }

    async fn handle_mdj(&self, ctx: &Context, command: &CommandInteraction) {
        let resolved = command.data.options();
        let parsed = commands::parse_options(
            resolved
                .iter()
                .map(|option| (option.name, OptionValue::from(&option.value))),
        );

        let options = match parsed {
            Ok(options) => options,
            Err(e) => {
                let response = CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(e.to_string())
                        .ephemeral(true),
                );
                if let Err(e) = command.create_response(&ctx.http, response).await {
                    warn!(error = %e, "Failed to reject command");
                }
                return;
            }
        };

        if let Err(e) = command.defer_ephemeral(&ctx.http).await {
            warn!(error = %e, "Failed to acknowledge command");
            return;
        }

        let user = &command.user;
        let invocation = CommandInvocation {
            channel_id: ChannelId(command.channel_id.get()),
            user: Identity::user(UserId(user.id.get()))
                .with_username(user.name.clone())
                .with_avatar_url(user.face()),
            content: options.content,
            wrap: options.wrap,
            line_width: options.line_width,
        };

        match self.dispatcher.on_command(invocation).await {
            Ok(outcome) => {
                debug!(?outcome, "Command relayed");
                if let Err(e) = command.delete_response(&ctx.http).await {
                    warn!(error = %e, "Failed to clear command acknowledgement");
                }
            }
            Err(e) => {
                error!(error = %e, "Command relay failed");
                let edit = EditInteractionResponse::new().content(format!("Could not relay: {e}"));
                if let Err(e) = command.edit_response(&ctx.http, edit).await {
                    warn!(error = %e, "Failed to report command failure");
                }
            }
        }
    }
}

#[async_trait]
impl EventHandler for RelayHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = %ready.guilds.len(),
            "🔮 Logged on"
        );

        self.load_glyph_table().await;

        if self.config.sync_slash {
            self.register_commands(&ctx).await;
        }
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        // Bot and webhook authors never trigger, which also covers our own posts
        if msg.author.bot || msg.webhook_id.is_some() || msg.guild_id.is_none() {
            return;
        }

        let inbound = InboundMessage {
            id: MessageId(msg.id.get()),
            channel_id: ChannelId(msg.channel_id.get()),
            author: Identity::user(UserId(msg.author.id.get()))
                .with_username(msg.author.name.clone())
                .with_avatar_url(msg.author.face()),
            content: msg.content,
        };
        let message_id = inbound.id;

        match self.dispatcher.on_message(inbound).await {
            Ok(RelayOutcome::Ignored) => {}
            Ok(outcome) => debug!(message_id = %message_id, ?outcome, "Message relayed"),
            Err(e) if e.is_fatal() => {
                warn!(message_id = %message_id, error = %e, "Inline relay unavailable")
            }
            Err(e) => error!(message_id = %message_id, error = %e, "Message relay failed"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        match command.data.name.as_str() {
            COMMAND_NAME => self.handle_mdj(&ctx, &command).await,
            HELP_COMMAND_NAME => {
                if let Err(e) = command.create_response(&ctx.http, commands::help_response()).await {
                    warn!(error = %e, "Failed to send help");
                }
            }
            other => debug!(command = %other, "Ignoring unknown command"),
        }
    }
}

/// Connect to the gateway and relay until the session ends
pub async fn run(
    config: DiscordConfig,
    dispatcher: Arc<RelayDispatcher<DiscordClient>>,
) -> Result<(), serenity::Error> {
    let handler = RelayHandler::new(dispatcher, config.clone());

    let mut client = Client::builder(&config.bot_token, RelayHandler::intents())
        .event_handler(handler)
        .activity(ActivityData::listening(PRESENCE))
        .status(OnlineStatus::Online)
        .await?;

    info!("Starting Discord gateway session");
    client.start().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intents_include_message_content() {
        let intents = RelayHandler::intents();
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(intents.contains(GatewayIntents::GUILD_MESSAGES));
        assert!(!intents.contains(GatewayIntents::GUILD_PRESENCES));
    }
}
