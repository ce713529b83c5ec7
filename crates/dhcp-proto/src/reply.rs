//! Server replies: DHCPOFFER, DHCPACK and DHCPNAK.
//!
//! Each reply owns its packet and borrows the request it answers. The request
//! decides which RFC 2131 table 3 rules apply and, for ACKs, how large the
//! serialized reply may grow.

use crate::codec::EncodeOptions;
use crate::error::Result;
use crate::validation::{validate, Validation};
use crate::{MessageType, Packet, Tag};
use std::ops::{Deref, DerefMut};

/// A reply that can be checked and serialized, independent of its type
pub trait Reply: Send + Sync {
    /// Check the reply against the rules for its message type
    fn validate(&self) -> Result<()>;

    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// The request this reply answers
    fn request(&self) -> &Packet;

    fn packet(&self) -> &Packet;
}

/// Options a server never sends back in OFFER or ACK
const CLIENT_ONLY: [Validation; 4] = [
    Validation::MustNot(Tag::ADDRESS_REQUEST),
    Validation::MustNot(Tag::PARAMETER_LIST),
    Validation::MustNot(Tag::CLIENT_ID),
    Validation::MustNot(Tag::DHCP_MAX_MSG_SIZE),
];

const OFFER_RULES: [Validation; 6] = [
    Validation::Must(Tag::ADDRESS_TIME),
    Validation::Must(Tag::DHCP_SERVER_ID),
    CLIENT_ONLY[0],
    CLIENT_ONLY[1],
    CLIENT_ONLY[2],
    CLIENT_ONLY[3],
];

const NAK_ALLOWED: &[Tag] = &[
    Tag::DHCP_MSG_TYPE,
    Tag::DHCP_SERVER_ID,
    Tag::DHCP_MESSAGE,
    Tag::CLASS_ID,
    Tag::CLIENT_ID,
];

const NAK_RULES: [Validation; 2] = [
    Validation::Must(Tag::DHCP_SERVER_ID),
    Validation::AllowedSet(NAK_ALLOWED),
];

macro_rules! reply_type {
    ($(#[$meta:meta])* $name:ident, $message_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name<'a> {
            packet: Packet,
            request: &'a Packet,
        }

        impl<'a> $name<'a> {
            pub fn new(request: &'a Packet) -> Self {
                let mut packet = Packet::new_reply(request);
                packet.set_message_type($message_type);
                Self { packet, request }
            }

            pub fn into_packet(self) -> Packet {
                self.packet
            }
        }

        impl Deref for $name<'_> {
            type Target = Packet;

            fn deref(&self) -> &Packet {
                &self.packet
            }
        }

        impl DerefMut for $name<'_> {
            fn deref_mut(&mut self) -> &mut Packet {
                &mut self.packet
            }
        }
    };
}

reply_type! {
    /// DHCPOFFER, answering a DHCPDISCOVER
    Offer, MessageType::Offer
}

reply_type! {
    /// DHCPACK, answering a DHCPREQUEST or a DHCPINFORM
    Ack, MessageType::Ack
}

reply_type! {
    /// DHCPNAK, answering a DHCPREQUEST
    Nak, MessageType::Nak
}

impl Offer<'_> {
    pub fn rules(&self) -> &'static [Validation] {
        &OFFER_RULES
    }
}

impl Reply for Offer<'_> {
    fn validate(&self) -> Result<()> {
        Ok(validate(self.packet.options(), self.rules())?)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.packet.to_bytes()
    }

    fn request(&self) -> &Packet {
        self.request
    }

    fn packet(&self) -> &Packet {
        &self.packet
    }
}

impl Ack<'_> {
    /// Common rules, then the lease time rule for the request type
    pub fn rules(&self) -> Vec<Validation> {
        let mut rules = vec![Validation::Must(Tag::DHCP_SERVER_ID)];
        rules.extend_from_slice(&CLIENT_ONLY);

        match self.request.message_type() {
            Some(MessageType::Request) => rules.push(Validation::Must(Tag::ADDRESS_TIME)),
            Some(MessageType::Inform) => rules.push(Validation::MustNot(Tag::ADDRESS_TIME)),
            _ => {}
        }
        rules
    }

    /// Encoder settings honoring the client's Maximum Message Size
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            max_len: self.request.get_u16(Tag::DHCP_MAX_MSG_SIZE),
            ..EncodeOptions::default()
        }
    }
}

impl Reply for Ack<'_> {
    fn validate(&self) -> Result<()> {
        Ok(validate(self.packet.options(), &self.rules())?)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.packet.to_bytes_with(&self.encode_options())
    }

    fn request(&self) -> &Packet {
        self.request
    }

    fn packet(&self) -> &Packet {
        &self.packet
    }
}

impl Nak<'_> {
    pub fn rules(&self) -> &'static [Validation] {
        &NAK_RULES
    }

    /// `sname` and `file` must not carry options in a NAK (RFC 2131 4.3.2)
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            allow_overload: false,
            ..EncodeOptions::default()
        }
    }
}

impl Reply for Nak<'_> {
    fn validate(&self) -> Result<()> {
        Ok(validate(self.packet.options(), self.rules())?)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut packet = self.packet.clone();
        packet.clear_sname_and_file();
        packet.to_bytes_with(&self.encode_options())
    }

    fn request(&self) -> &Packet {
        self.request
    }

    fn packet(&self) -> &Packet {
        &self.packet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};
    use crate::frame::MIN_LEN;
    use crate::{MacAddress, OpCode};
    use std::net::Ipv4Addr;
    use std::time::Duration;

    const SERVER: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);

    fn request(message_type: MessageType) -> Packet {
        let mut packet = Packet::new(OpCode::BootRequest);
        packet.set_xid(0x3903f326);
        packet.set_flags(0x8000);
        packet.set_giaddr(Ipv4Addr::new(10, 1, 0, 1));
        packet.set_client_mac(MacAddress::new([0x00, 0x05, 0x3c, 0x04, 0x8d, 0x59]));
        packet.set_message_type(message_type);
        packet.set_u8(Tag::PARAMETER_LIST, 1);
        packet
    }

    #[test]
    fn test_offer_copies_request_fields() {
        let request = request(MessageType::Discover);
        let offer = Offer::new(&request);

        assert_eq!(offer.op(), Some(OpCode::BootReply));
        assert_eq!(offer.xid(), request.xid());
        assert_eq!(offer.flags(), request.flags());
        assert_eq!(offer.chaddr(), request.chaddr());
        assert_eq!(offer.giaddr(), request.giaddr());
        assert_eq!(offer.message_type(), Some(MessageType::Offer));
        assert!(!offer.contains(Tag::PARAMETER_LIST));
        assert_eq!(Reply::request(&offer), &request);
    }

    #[test]
    fn test_offer_validation() {
        let request = request(MessageType::Discover);
        let mut offer = Offer::new(&request);
        offer.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);

        assert_eq!(
            offer.validate(),
            Err(Error::Validation(ValidationError::MustHave(Tag::ADDRESS_TIME)))
        );

        offer.set_duration(Tag::ADDRESS_TIME, Duration::from_secs(3600));
        assert_eq!(offer.validate(), Ok(()));

        offer.set_u16(Tag::DHCP_MAX_MSG_SIZE, 1500);
        assert_eq!(
            offer.validate(),
            Err(Error::Validation(ValidationError::MustNotHave(
                Tag::DHCP_MAX_MSG_SIZE
            )))
        );
    }

    #[test]
    fn test_ack_on_request() {
        let request = request(MessageType::Request);
        let mut ack = Ack::new(&request);
        ack.set_duration(Tag::ADDRESS_TIME, Duration::from_secs(86400));
        ack.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        assert_eq!(ack.validate(), Ok(()));

        ack.remove(Tag::ADDRESS_TIME);
        let err = ack.validate().unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::MustHave(Tag::ADDRESS_TIME)));
        assert!(err.to_string().contains("51"));
    }

    #[test]
    fn test_ack_on_inform_rejects_lease_time() {
        let request = request(MessageType::Inform);
        let mut ack = Ack::new(&request);
        ack.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        assert_eq!(ack.validate(), Ok(()));

        ack.set_duration(Tag::ADDRESS_TIME, Duration::from_secs(60));
        assert_eq!(
            ack.validate(),
            Err(Error::Validation(ValidationError::MustNotHave(Tag::ADDRESS_TIME)))
        );
    }

    #[test]
    fn test_ack_on_other_request_uses_common_rules() {
        let request = request(MessageType::Decline);
        let mut ack = Ack::new(&request);
        assert_eq!(
            ack.validate(),
            Err(Error::Validation(ValidationError::MustHave(Tag::DHCP_SERVER_ID)))
        );
        ack.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        assert_eq!(ack.validate(), Ok(()));
    }

    #[test]
    fn test_ack_honors_max_message_size() {
        let mut request = request(MessageType::Request);
        let ack = Ack::new(&request);
        assert_eq!(ack.encode_options().max_len, None);

        request.set_u16(Tag::DHCP_MAX_MSG_SIZE, 0x0200);
        let ack = Ack::new(&request);
        assert_eq!(ack.encode_options().max_len, Some(512));
        assert!(ack.encode_options().allow_overload);
    }

    #[test]
    fn test_ack_large_max_size_avoids_overload() {
        let mut request = request(MessageType::Request);
        request.set_u16(Tag::DHCP_MAX_MSG_SIZE, 1500);

        let mut ack = Ack::new(&request);
        ack.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        ack.set_duration(Tag::ADDRESS_TIME, Duration::from_secs(600));
        ack.set(Tag::VENDOR_SPECIFIC, vec![7u8; 250]);
        ack.set(Tag::URL, vec![b'u'; 250]);

        let bytes = ack.to_bytes().unwrap();
        let parsed = Packet::reply_from_bytes(&bytes).unwrap();
        assert!(!parsed.contains(Tag::OVERLOAD));
        assert_eq!(parsed.get(Tag::URL), Some(&[b'u'; 250][..]));
    }

    #[test]
    fn test_nak_validation() {
        let request = request(MessageType::Request);
        let mut nak = Nak::new(&request);
        nak.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        nak.set_string(Tag::DHCP_MESSAGE, "address not available");
        assert_eq!(nak.validate(), Ok(()));

        nak.set_duration(Tag::ADDRESS_TIME, Duration::from_secs(60));
        let err = nak.validate().unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::MustNotHave(Tag::ADDRESS_TIME)));
        assert!(err.to_string().contains("51"));
    }

    #[test]
    fn test_nak_clears_sname_and_file() {
        let request = request(MessageType::Request);
        let mut nak = Nak::new(&request);
        nak.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        nak.set_sname("server");
        nak.set_file("boot.img");

        let bytes = nak.to_bytes().unwrap();
        assert!(bytes[44..236].iter().all(|b| *b == 0));

        let parsed = Packet::reply_from_bytes(&bytes).unwrap();
        assert_eq!(parsed.message_type(), Some(MessageType::Nak));
        assert_eq!(parsed.get_ipv4(Tag::DHCP_SERVER_ID), Some(SERVER));
    }

    #[test]
    fn test_nak_never_overloads() {
        let request = request(MessageType::Request);
        let mut nak = Nak::new(&request);
        nak.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        nak.set(Tag::DHCP_MESSAGE, vec![b'x'; 255]);
        nak.set(Tag::CLASS_ID, vec![b'c'; 255]);

        assert!(matches!(nak.to_bytes(), Err(Error::TooLarge { .. })));
    }

    #[test]
    fn test_reply_trait_object() {
        let request = request(MessageType::Discover);
        let mut offer = Offer::new(&request);
        offer.set_ipv4(Tag::DHCP_SERVER_ID, SERVER);
        offer.set_duration(Tag::ADDRESS_TIME, Duration::from_secs(3600));
        offer.set_yiaddr(Ipv4Addr::new(192, 168, 1, 100));

        let reply: &dyn Reply = &offer;
        reply.validate().unwrap();
        let bytes = reply.to_bytes().unwrap();
        assert!(bytes.len() > MIN_LEN);
        assert_eq!(reply.packet().yiaddr(), Ipv4Addr::new(192, 168, 1, 100));
    }
}
