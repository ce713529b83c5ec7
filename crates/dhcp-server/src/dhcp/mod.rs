//! Request dispatch: read datagrams, classify them, hand them to a
//! [`Handler`] with a writer that sends replies to the right address.

pub mod request;
pub mod responder;
pub mod server;
pub mod transport;
pub mod writer;

#[cfg(test)]
pub mod test_helpers;

pub use request::{classify, Discard, DhcpDiscover, DhcpInform, DhcpRequest, Incoming, Replyable, Terminal};
pub use responder::InformResponder;
pub use server::{serve, DhcpServer, Handler};
pub use transport::Transport;
pub use writer::{destination, ReplyWriter, TransportWriter};

// Re-export types from dhcp-proto
pub use dhcp_proto::{Ack, MacAddress, MessageType, Nak, Offer, Packet, Reply, Tag};
