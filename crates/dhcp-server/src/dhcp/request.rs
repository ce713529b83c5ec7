use super::writer::ReplyWriter;
use crate::error::Result;
use dhcp_proto::{Ack, MessageType, Nak, Offer, Packet, Reply};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

/// A client request the server may answer, bound to the writer that sends
/// the answer back to where the request came from.
#[derive(Clone)]
pub struct Replyable {
    packet: Packet,
    source: SocketAddr,
    writer: Arc<dyn ReplyWriter>,
}

impl Replyable {
    pub fn new(packet: Packet, source: SocketAddr, writer: Arc<dyn ReplyWriter>) -> Self {
        Self {
            packet,
            source,
            writer,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn source(&self) -> SocketAddr {
        self.source
    }

    pub fn writer(&self) -> &Arc<dyn ReplyWriter> {
        &self.writer
    }

    /// Validate and send `reply`, returning the number of bytes written
    pub async fn write_reply(&self, reply: &dyn Reply) -> Result<usize> {
        self.writer.write_reply(reply, self.source).await
    }
}

impl fmt::Debug for Replyable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replyable")
            .field("packet", &self.packet)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

macro_rules! replyable {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(Replyable);

        impl std::ops::Deref for $name {
            type Target = Replyable;

            fn deref(&self) -> &Replyable {
                &self.0
            }
        }
    };
}

replyable! {
    /// DHCPDISCOVER, answered with an OFFER
    DhcpDiscover
}

replyable! {
    /// DHCPREQUEST, answered with an ACK or a NAK
    DhcpRequest
}

replyable! {
    /// DHCPINFORM, answered with an ACK carrying no lease
    DhcpInform
}

impl DhcpDiscover {
    pub fn create_offer(&self) -> Offer<'_> {
        Offer::new(&self.0.packet)
    }
}

impl DhcpRequest {
    pub fn create_ack(&self) -> Ack<'_> {
        Ack::new(&self.0.packet)
    }

    pub fn create_nak(&self) -> Nak<'_> {
        Nak::new(&self.0.packet)
    }
}

impl DhcpInform {
    pub fn create_ack(&self) -> Ack<'_> {
        Ack::new(&self.0.packet)
    }
}

/// A client message that never gets an answer
#[derive(Debug, Clone)]
pub struct Terminal {
    packet: Packet,
    source: SocketAddr,
}

impl Terminal {
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn source(&self) -> SocketAddr {
        self.source
    }
}

/// A classified client request
#[derive(Debug, Clone)]
pub enum Incoming {
    Discover(DhcpDiscover),
    Request(DhcpRequest),
    Decline(Terminal),
    Release(Terminal),
    Inform(DhcpInform),
}

impl Incoming {
    pub fn message_type(&self) -> MessageType {
        match self {
            Incoming::Discover(_) => MessageType::Discover,
            Incoming::Request(_) => MessageType::Request,
            Incoming::Decline(_) => MessageType::Decline,
            Incoming::Release(_) => MessageType::Release,
            Incoming::Inform(_) => MessageType::Inform,
        }
    }

    pub fn packet(&self) -> &Packet {
        match self {
            Incoming::Discover(r) => r.packet(),
            Incoming::Request(r) => r.packet(),
            Incoming::Inform(r) => r.packet(),
            Incoming::Decline(t) | Incoming::Release(t) => t.packet(),
        }
    }

    pub fn source(&self) -> SocketAddr {
        match self {
            Incoming::Discover(r) => r.source(),
            Incoming::Request(r) => r.source(),
            Incoming::Inform(r) => r.source(),
            Incoming::Decline(t) | Incoming::Release(t) => t.source(),
        }
    }
}

/// Why a datagram was dropped without reaching the handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Discard {
    #[error("malformed packet: {0}")]
    Malformed(#[from] dhcp_proto::Error),

    #[error("unexpected message type {0:?}")]
    MessageType(Option<u8>),
}

/// Turn a received datagram into a request variant.
///
/// Anything that does not parse, is not a BOOTREQUEST, or carries a message
/// type other than DISCOVER, REQUEST, DECLINE, RELEASE or INFORM is
/// discarded.
pub fn classify(
    buf: &[u8],
    source: SocketAddr,
    writer: &Arc<dyn ReplyWriter>,
) -> std::result::Result<Incoming, Discard> {
    let packet = Packet::request_from_bytes(buf)?;

    let replyable = |packet| Replyable::new(packet, source, Arc::clone(writer));
    let terminal = |packet| Terminal { packet, source };

    let incoming = match packet.message_type() {
        Some(MessageType::Discover) => Incoming::Discover(DhcpDiscover(replyable(packet))),
        Some(MessageType::Request) => Incoming::Request(DhcpRequest(replyable(packet))),
        Some(MessageType::Inform) => Incoming::Inform(DhcpInform(replyable(packet))),
        Some(MessageType::Decline) => Incoming::Decline(terminal(packet)),
        Some(MessageType::Release) => Incoming::Release(terminal(packet)),
        _ => {
            let raw = packet.get_u8(dhcp_proto::Tag::DHCP_MSG_TYPE);
            return Err(Discard::MessageType(raw));
        }
    };
    Ok(incoming)
}
