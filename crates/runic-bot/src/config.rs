//! Configuration management for the bot
//!
//! Layers, lowest precedence first:
//! built-in defaults, `<dir>/*.toml`, `<dir>/deploy/*.toml`, then the
//! process environment (which `.env` feeds without overriding).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

use runic::DEFAULT_GLYPH_SIZE;
use runic_integration_discord::DiscordConfig;

const DEPLOY_DIR: &str = "deploy";

/// Image backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Endpoint that turns glyph lines into a PNG; `/mdj` is disabled without it
    pub url: Option<String>,
    pub glyph_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            url: None,
            glyph_size: DEFAULT_GLYPH_SIZE,
        }
    }
}

/// Relay behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Name the author in an embed when falling back to a bot post
    pub attribute_fallback: bool,
}

/// Bot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub discord: DiscordConfig,
    pub render: RenderConfig,
    pub relay: RelayConfig,
}

impl BotConfig {
    /// Load every layer using the process environment
    pub fn load(config_dir: &Path) -> Result<Self> {
        Self::load_with_env(config_dir, |key| std::env::var(key).ok())
    }

    /// Load every layer, reading overrides through `env`
    pub fn load_with_env(config_dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut merged = Value::Table(Default::default());

        for path in layer_files(config_dir)?
            .into_iter()
            .chain(layer_files(&config_dir.join(DEPLOY_DIR))?)
        {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            let layer: Value = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {:?}", path))?;
            merge(&mut merged, layer);
        }

        let mut config: BotConfig = merged
            .try_into()
            .context("Configuration does not match the expected shape")?;
        config.apply_env(env)?;
        config.validate()?;

        Ok(config)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(token) = env("BOT_TOKEN") {
            self.discord.bot_token = token;
        }
        if let Some(guild) = env("HOME_GUILD") {
            let guild = guild
                .trim()
                .parse()
                .with_context(|| format!("HOME_GUILD is not a guild id: {guild}"))?;
            self.discord.home_guild = Some(guild);
        }
        if let Some(sync) = env("SYNC_SLASH") {
            self.discord.sync_slash = parse_flag(&sync)
                .with_context(|| format!("SYNC_SLASH is not a boolean: {sync}"))?;
        }
        if let Some(url) = env("RENDER_URL") {
            self.render.url = Some(url).filter(|url| !url.trim().is_empty());
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.discord.bot_token.trim().is_empty() {
            bail!("No bot token configured (set BOT_TOKEN or discord.bot_token)");
        }
        if self.render.glyph_size == 0 {
            bail!("render.glyph_size must be positive");
        }
        Ok(())
    }
}

/// `*.toml` files directly inside `dir`, in name order
fn layer_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to list config directory {:?}", dir))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Deep-merge `layer` into `base`; tables merge key by key, anything else is replaced
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Table(base), Value::Table(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_defaults_need_a_token() {
        let dir = tempfile::tempdir().unwrap();
        let err = BotConfig::load_with_env(dir.path(), no_env).unwrap_err();
        assert!(err.to_string().contains("bot token"));
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let config = BotConfig::load_with_env(&missing, |key| {
            (key == "BOT_TOKEN").then(|| "token".to_string())
        })
        .unwrap();

        assert_eq!(config.discord.bot_token, "token");
        assert_eq!(config.render.glyph_size, 32);
        assert!(config.render.url.is_none());
        assert!(!config.relay.attribute_fallback);
        assert!(config.discord.sync_slash);
    }

    #[test]
    fn test_deploy_layer_overrides_base() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "base.toml",
            r#"
            [discord]
            bot_token = "base-token"
            home_guild = 10
            slash_command_guilds = [1, 2]

            [render]
            glyph_size = 48
            "#,
        );
        write(
            &dir.path().join(DEPLOY_DIR),
            "prod.toml",
            r#"
            [discord]
            home_guild = 20

            [relay]
            attribute_fallback = true
            "#,
        );

        let config = BotConfig::load_with_env(dir.path(), no_env).unwrap();
        assert_eq!(config.discord.bot_token, "base-token");
        assert_eq!(config.discord.home_guild, Some(20));
        assert_eq!(config.discord.slash_command_guilds, vec![1, 2]);
        assert_eq!(config.render.glyph_size, 48);
        assert!(config.relay.attribute_fallback);
    }

    #[test]
    fn test_files_apply_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.toml", "[discord]\nbot_token = \"first\"\n");
        write(dir.path(), "b.toml", "[discord]\nbot_token = \"second\"\n");
        write(dir.path(), "notes.txt", "[discord]\nbot_token = \"ignored\"\n");

        let config = BotConfig::load_with_env(dir.path(), no_env).unwrap();
        assert_eq!(config.discord.bot_token, "second");
    }

    #[test]
    fn test_environment_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "base.toml",
            "[discord]\nbot_token = \"file\"\nhome_guild = 1\n\n[render]\nurl = \"http://file\"\n",
        );

        let env: HashMap<&str, &str> = [
            ("BOT_TOKEN", "env-token"),
            ("HOME_GUILD", " 99 "),
            ("SYNC_SLASH", "false"),
            ("RENDER_URL", "http://render.test/mdj"),
        ]
        .into_iter()
        .collect();

        let config =
            BotConfig::load_with_env(dir.path(), |key| env.get(key).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.discord.bot_token, "env-token");
        assert_eq!(config.discord.home_guild, Some(99));
        assert!(!config.discord.sync_slash);
        assert_eq!(config.render.url.as_deref(), Some("http://render.test/mdj"));
    }

    #[test]
    fn test_invalid_environment_values() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "base.toml", "[discord]\nbot_token = \"file\"\n");

        let err = BotConfig::load_with_env(dir.path(), |key| {
            (key == "HOME_GUILD").then(|| "general".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("HOME_GUILD"));

        let err = BotConfig::load_with_env(dir.path(), |key| {
            (key == "SYNC_SLASH").then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("SYNC_SLASH"));
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.toml", "[discord\n");

        let err = BotConfig::load_with_env(dir.path(), no_env).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_merge_replaces_scalars_and_arrays() {
        let mut base: Value = toml::from_str("a = [1, 2]\n[t]\nx = 1\ny = 2\n").unwrap();
        let layer: Value = toml::from_str("a = [3]\n[t]\ny = 5\n").unwrap();
        merge(&mut base, layer);

        assert_eq!(base["a"].as_array().unwrap().len(), 1);
        assert_eq!(base["t"]["x"].as_integer(), Some(1));
        assert_eq!(base["t"]["y"].as_integer(), Some(5));
    }
}
