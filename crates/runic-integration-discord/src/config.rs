//! Discord configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Discord integration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token
    pub bot_token: String,
    /// Guild whose custom emoji back the glyph table
    pub home_guild: Option<u64>,
    /// Guilds that receive the slash command when not registered globally
    pub slash_command_guilds: Vec<u64>,
    /// Register the slash command for every guild instead
    pub global_slash_commands: bool,
    /// Push command definitions to Discord on ready
    pub sync_slash: bool,
}

impl DiscordConfig {
    /// Create a new Discord configuration with just a token
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            ..Self::default()
        }
    }

    /// Set the guild that provides the glyph emoji
    pub fn with_home_guild(mut self, guild_id: u64) -> Self {
        self.home_guild = Some(guild_id);
        self
    }

    /// Add a guild for guild-scoped command registration
    pub fn with_slash_command_guild(mut self, guild_id: u64) -> Self {
        self.slash_command_guilds.push(guild_id);
        self
    }

    /// Register commands globally
    pub fn with_global_slash_commands(mut self, enable: bool) -> Self {
        self.global_slash_commands = enable;
        self
    }

    /// Sync command definitions on ready
    pub fn with_sync_slash(mut self, enable: bool) -> Self {
        self.sync_slash = enable;
        self
    }

    /// Commands go global when asked to, or when no guild is listed
    pub fn registers_globally(&self) -> bool {
        self.global_slash_commands || self.slash_command_guilds.is_empty()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            home_guild: None,
            slash_command_guilds: Vec::new(),
            global_slash_commands: false,
            sync_slash: true,
        }
    }
}
