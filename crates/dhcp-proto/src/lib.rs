//! DHCPv4 packet parsing, serialization and reply construction
//!
//! This library implements the RFC 2131 / RFC 2132 wire format without any
//! I/O or lease logic. It can be used by any DHCP server implementation.
//!
//! - [`Frame`] gives typed slice views over the fixed BOOTP header.
//! - [`OptionMap`] holds decoded options with typed accessors.
//! - [`codec`] moves options between the map and the three option regions.
//! - [`Packet`] ties a frame and its options together.
//! - [`Offer`], [`Ack`] and [`Nak`] build replies and check them against
//!   RFC 2131 table 3 before they are sent.

pub mod codec;
pub mod error;
pub mod frame;
pub mod mac;
pub mod message_type;
pub mod option;
pub mod packet;
pub mod reply;
pub mod tag;
pub mod validation;

pub use codec::EncodeOptions;
pub use error::{Error, Result, ValidationError};
pub use frame::Frame;
pub use mac::{MacAddress, ParseMacError};
pub use message_type::MessageType;
pub use option::{DecodeField, FromOptions, OptionMap, OptionValue};
pub use packet::{OpCode, Packet};
pub use reply::{Ack, Nak, Offer, Reply};
pub use tag::Tag;
pub use validation::Validation;
