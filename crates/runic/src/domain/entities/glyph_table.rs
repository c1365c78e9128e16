//! GlyphTable - Symbol to emoji token mapping
//!
//! Every Madouji glyph is rendered as a custom emoji of the home guild.
//! The table is resolved in one go from the guild's emoji list; a table
//! with gaps is never handed out.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use crate::domain::errors::RelayError;

/// Prefix of every glyph emoji name
pub const TOKEN_PREFIX: &str = "mdj_";

/// Letters that have an emoji named after themselves (`mdj_<char>`)
pub const STANDARD_CHARACTERS: &str = "uoaeyiwUOAEYIWpbtdkgmnqjrlRfFsSxhvVzZ";

/// Symbols whose emoji name uses a spelled-out suffix (`mdj_<suffix>`)
pub const SPECIAL_SYMBOLS: &[(char, &str)] = &[
    ('ú', "u_"),
    ('ó', "o_"),
    ('á', "a_"),
    ('é', "e_"),
    ('ý', "y_"),
    ('í', "i_"),
    ('\u{b5}', "w_"),
    (' ', "space"),
    ('.', "dot"),
    (',', "comma"),
    ('?', "question"),
    ('#', "direction"),
];

/// A named, renderable token from the reference symbol source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceToken {
    /// Emoji name, e.g. `mdj_a`
    pub name: String,
    /// Renderable form, e.g. `<:mdj_a:123>`
    pub token: String,
}

impl ReferenceToken {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }
}

/// Every (symbol, token name) pair the table has to resolve
pub fn required_names() -> impl Iterator<Item = (char, String)> {
    STANDARD_CHARACTERS
        .chars()
        .map(|c| (c, format!("{TOKEN_PREFIX}{c}")))
        .chain(
            SPECIAL_SYMBOLS
                .iter()
                .map(|(c, suffix)| (*c, format!("{TOKEN_PREFIX}{suffix}"))),
        )
}

/// Fully populated mapping from glyph to renderable token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    tokens: HashMap<char, String>,
}

impl GlyphTable {
    /// Resolve every required name against the reference tokens
    ///
    /// Fails with [`RelayError::GlyphTableIncomplete`] naming all missing
    /// tokens at once.
    pub fn build(reference: &[ReferenceToken]) -> Result<Self, RelayError> {
        // First token wins when a name is duplicated in the source
        let mut by_name: HashMap<&str, &str> = HashMap::with_capacity(reference.len());
        for entry in reference {
            by_name
                .entry(entry.name.as_str())
                .or_insert(entry.token.as_str());
        }

        let mut tokens = HashMap::new();
        let mut missing = BTreeSet::new();

        for (symbol, name) in required_names() {
            match by_name.get(name.as_str()) {
                Some(token) => {
                    tokens.insert(symbol, (*token).to_string());
                }
                None => {
                    missing.insert(name);
                }
            }
        }

        if !missing.is_empty() {
            return Err(RelayError::GlyphTableIncomplete {
                missing: missing.into_iter().collect(),
            });
        }

        Ok(Self { tokens })
    }

    /// Token for a symbol, or the symbol itself when it has none
    pub fn lookup(&self, symbol: char) -> Cow<'_, str> {
        match self.tokens.get(&symbol) {
            Some(token) => Cow::Borrowed(token.as_str()),
            None => Cow::Owned(symbol.to_string()),
        }
    }

    /// Substitute every mapped symbol of `text`
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 8);
        for symbol in text.chars() {
            match self.tokens.get(&symbol) {
                Some(token) => out.push_str(token),
                None => out.push(symbol),
            }
        }
        out
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.tokens.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
