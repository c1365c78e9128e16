//! Platform identifiers
//!
//! Thin newtypes over snowflake ids so a channel id can never be passed
//! where a message id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// A text channel
    ChannelId
);
snowflake!(
    /// A posted message
    MessageId
);
snowflake!(
    /// A platform user
    UserId
);
snowflake!(
    /// A guild (server); the home guild doubles as the reference symbol source
    GuildId
);
snowflake!(
    /// A remote impersonation endpoint (webhook)
    EndpointId
);
