//! Slash command definition and option parsing

use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use serenity::model::application::{CommandOptionType, ResolvedValue};

use runic::{RelayError, WrapMode};

pub const COMMAND_NAME: &str = "mdj";
pub const HELP_COMMAND_NAME: &str = "help";

pub const HELP_TEXT: &str = "**Runic Babble** converts ASCII text into the constructed writing \
system Madouji, created by the Cult of 74.\n\n\
To learn more, visit the official server: https://discord.gg/mg4mCZGFq9";

/// Characters per line when `line_width` is omitted
pub const DEFAULT_LINE_WIDTH: u32 = 8;

/// The `/mdj` command as registered with Discord
pub fn definition() -> CreateCommand {
    let wrap = WrapMode::ALL.iter().fold(
        CreateCommandOption::new(
            CommandOptionType::String,
            "wrap",
            "What line wrapping model to use",
        ),
        |option, mode| option.add_string_choice(mode.as_str(), mode.as_str()),
    );

    CreateCommand::new(COMMAND_NAME)
        .description("Render the entire message as Madouji")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "content",
                "The message to be rendered",
            )
            .required(true),
        )
        .add_option(wrap)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "line_width",
                "Max amount of characters in a line",
            )
            .min_int_value(0),
        )
}

/// Every command the bot registers
pub fn definitions() -> Vec<CreateCommand> {
    vec![definition(), help_definition()]
}

pub fn help_definition() -> CreateCommand {
    CreateCommand::new(HELP_COMMAND_NAME).description("What Runic Babble is and where to learn more")
}

pub fn help_response() -> CreateInteractionResponse {
    CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().content(HELP_TEXT))
}

/// Option value as far as `/mdj` cares
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue<'a> {
    String(&'a str),
    Integer(i64),
    Other,
}

impl<'a> From<&ResolvedValue<'a>> for OptionValue<'a> {
    fn from(value: &ResolvedValue<'a>) -> Self {
        match value {
            ResolvedValue::String(s) => OptionValue::String(*s),
            ResolvedValue::Integer(i) => OptionValue::Integer(*i),
            _ => OptionValue::Other,
        }
    }
}

/// Validated `/mdj` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdjOptions {
    pub content: String,
    pub wrap: WrapMode,
    pub line_width: u32,
}

/// Parse and validate the options of an `/mdj` invocation
pub fn parse_options<'a>(
    options: impl IntoIterator<Item = (&'a str, OptionValue<'a>)>,
) -> Result<MdjOptions, RelayError> {
    let mut content = None;
    let mut wrap = WrapMode::default();
    let mut line_width = DEFAULT_LINE_WIDTH;

    for (name, value) in options {
        match (name, value) {
            ("content", OptionValue::String(s)) => content = Some(s.to_string()),
            ("wrap", OptionValue::String(s)) => {
                wrap = s.parse().map_err(RelayError::Validation)?;
            }
            ("line_width", OptionValue::Integer(width)) => {
                line_width = u32::try_from(width).map_err(|_| {
                    RelayError::Validation(format!(
                        "line_width must be between 0 and {}, got {width}",
                        u32::MAX
                    ))
                })?;
            }
            (name, value) => {
                return Err(RelayError::Validation(format!(
                    "Unexpected option {name}: {value:?}"
                )));
            }
        }
    }

    let content =
        content.ok_or_else(|| RelayError::Validation("content is required".to_string()))?;

    Ok(MdjOptions {
        content,
        wrap,
        line_width,
    })
}
