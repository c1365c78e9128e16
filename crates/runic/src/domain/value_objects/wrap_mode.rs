//! WrapMode - Line layout for image rendering

use serde::{Deserialize, Serialize};

/// How command-mode text is broken into lines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Only explicit newlines break lines
    #[default]
    None,
    /// Break between words; overlong words stay whole
    Flow,
    /// Break every `line_width` glyphs, words or not
    Force,
}

impl WrapMode {
    pub const ALL: [WrapMode; 3] = [WrapMode::None, WrapMode::Flow, WrapMode::Force];

    pub fn as_str(&self) -> &'static str {
        match self {
            WrapMode::None => "none",
            WrapMode::Flow => "flow",
            WrapMode::Force => "force",
        }
    }
}

impl std::fmt::Display for WrapMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WrapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(WrapMode::None),
            "flow" => Ok(WrapMode::Flow),
            "force" => Ok(WrapMode::Force),
            _ => Err(format!("Unknown wrap mode: {}", s)),
        }
    }
}
