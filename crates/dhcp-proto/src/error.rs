//! Error types for packet parsing, serialization and reply validation.

use crate::Tag;

/// A reply violates one of the RFC 2131 table 3 rules for its message type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("packet MUST have option {0}")]
    MustHave(Tag),

    #[error("packet MUST NOT have option {0}")]
    MustNotHave(Tag),
}

impl ValidationError {
    /// The option the rule was checking
    pub fn tag(&self) -> Tag {
        match self {
            Self::MustHave(tag) | Self::MustNotHave(tag) => *tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Buffer shorter than the fixed header, or an option region ended
    /// before its End tag.
    #[error("dhcpv4: short packet")]
    ShortPacket,

    #[error("dhcpv4: invalid magic cookie {0:?}")]
    InvalidCookie([u8; 4]),

    #[error("dhcpv4: not a request packet")]
    NotARequest,

    #[error("dhcpv4: not a reply packet")]
    NotAReply,

    #[error("dhcpv4: packet has no message type option")]
    MissingMessageType,

    #[error("dhcpv4: option {tag} is {len} bytes long, the maximum is 255")]
    OptionTooLong { tag: Tag, len: usize },

    /// Options do not fit in the space allowed by the maximum message size,
    /// even after overloading `file` and `sname`.
    #[error("dhcpv4: packet needs {needed} bytes but at most {max} are allowed")]
    TooLarge { needed: usize, max: usize },

    #[error("dhcpv4: {0}")]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, Error>;
