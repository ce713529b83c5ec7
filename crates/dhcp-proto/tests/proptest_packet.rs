use proptest::prelude::*;

use dhcp_proto::codec::{self, EncodeOptions};
use dhcp_proto::{Error, MessageType, OpCode, OptionMap, Packet, Tag};
use std::net::Ipv4Addr;
use std::time::Duration;

const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const HEADER_SIZE: usize = 240;

fn valid_header() -> Vec<u8> {
    let mut packet = vec![0u8; HEADER_SIZE];
    packet[0] = 1;
    packet[1] = 1;
    packet[2] = 6;
    packet[236..240].copy_from_slice(&MAGIC_COOKIE);
    packet
}

/// Any tag the encoder writes verbatim
fn data_tag() -> impl Strategy<Value = Tag> {
    (1u8..=254)
        .prop_filter("overload is computed by the encoder", |tag| *tag != 52)
        .prop_map(Tag)
}

fn option_map(max_options: usize, max_len: usize) -> impl Strategy<Value = OptionMap> {
    prop::collection::btree_map(
        data_tag(),
        prop::collection::vec(any::<u8>(), 0..=max_len),
        0..=max_options,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn parse_never_panics_on_arbitrary_bytes(data: Vec<u8>) {
        let _ = Packet::from_bytes(&data);
    }

    #[test]
    fn parse_never_panics_on_valid_header_with_random_options(
        options_data in prop::collection::vec(any::<u8>(), 0..512)
    ) {
        let mut packet = valid_header();
        packet.extend_from_slice(&options_data);
        let _ = Packet::from_bytes(&packet);
    }

    #[test]
    fn parse_never_panics_on_overloaded_fields(
        overload_flag in 0u8..=255,
        sname_data in prop::collection::vec(any::<u8>(), 64..=64),
        file_data in prop::collection::vec(any::<u8>(), 128..=128)
    ) {
        let mut packet = valid_header();
        packet[44..108].copy_from_slice(&sname_data);
        packet[108..236].copy_from_slice(&file_data);
        packet.extend_from_slice(&[52, 1, overload_flag, 255]);
        let _ = Packet::from_bytes(&packet);
    }

    #[test]
    fn short_buffers_are_rejected(data in prop::collection::vec(any::<u8>(), 0..HEADER_SIZE)) {
        prop_assert_eq!(Packet::from_bytes(&data), Err(Error::ShortPacket));
    }

    #[test]
    fn option_map_survives_encode_and_decode(options in option_map(8, 32)) {
        let bytes = codec::encode(&options, &valid_header(), &EncodeOptions::default()).unwrap();
        let parsed = Packet::from_bytes(&bytes).unwrap();
        prop_assert_eq!(parsed.options(), &options);
    }

    #[test]
    fn large_option_maps_survive_overload(options in option_map(12, 60)) {
        let opts = EncodeOptions::default();
        match codec::encode(&options, &valid_header(), &opts) {
            Ok(bytes) => {
                prop_assert!(bytes.len() <= opts.limit());
                let mut parsed = Packet::from_bytes(&bytes).unwrap().options().clone();
                parsed.remove(Tag::OVERLOAD);
                prop_assert_eq!(parsed, options);
            }
            Err(err) => prop_assert!(matches!(err, Error::TooLarge { .. }), "{err}"),
        }
    }

    #[test]
    fn packet_fields_survive_serialization(
        xid: u32,
        secs: u16,
        flags: u16,
        yiaddr: [u8; 4],
        chaddr: [u8; 16],
        message_type in 1u8..=8,
    ) {
        let mut packet = Packet::new(OpCode::BootReply);
        packet.set_xid(xid);
        packet.set_secs(secs);
        packet.set_flags(flags);
        packet.set_yiaddr(Ipv4Addr::from(yiaddr));
        packet.set_chaddr(chaddr);
        packet.set_u8(Tag::DHCP_MSG_TYPE, message_type);

        let parsed = Packet::reply_from_bytes(&packet.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(parsed.xid(), xid);
        prop_assert_eq!(parsed.secs(), secs);
        prop_assert_eq!(parsed.flags(), flags);
        prop_assert_eq!(parsed.yiaddr(), Ipv4Addr::from(yiaddr));
        prop_assert_eq!(parsed.chaddr(), chaddr);
        prop_assert_eq!(parsed.message_type(), MessageType::from_u8(message_type));
    }

    #[test]
    fn typed_setters_read_back(value: u32, millis in 0u64..=u64::from(u32::MAX) * 1000) {
        let mut options = OptionMap::new();

        options.set_u32(Tag::RENEWAL_TIME, value);
        prop_assert_eq!(options.get_u32(Tag::RENEWAL_TIME), Some(value));

        options.set_ipv4(Tag::ROUTER, Ipv4Addr::from(value));
        prop_assert_eq!(options.get_ipv4(Tag::ROUTER), Some(Ipv4Addr::from(value)));

        options.set_duration(Tag::ADDRESS_TIME, Duration::from_millis(millis));
        prop_assert_eq!(
            options.get_duration(Tag::ADDRESS_TIME),
            Some(Duration::from_secs(millis / 1000))
        );
    }
}

#[test]
fn discover_round_trip() {
    let mut buf = valid_header();
    buf[4..8].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    buf.extend_from_slice(&[53, 1, 1, 55, 2, 1, 3, 255]);

    let packet = Packet::request_from_bytes(&buf).unwrap();
    assert_eq!(packet.xid(), 0x01020304);
    assert_eq!(packet.message_type(), Some(MessageType::Discover));
    assert_eq!(packet.get(Tag::PARAMETER_LIST), Some(&[1, 3][..]));
    assert_eq!(packet.to_bytes().unwrap(), buf);
}

#[test]
fn overloaded_regions_merge() {
    let mut buf = valid_header();
    buf[108..112].copy_from_slice(&[1, 1, 0x12, 255]);
    buf[44..48].copy_from_slice(&[3, 1, 0x56, 255]);
    buf.extend_from_slice(&[52, 1, 0x03, 255]);

    let packet = Packet::from_bytes(&buf).unwrap();
    let tags: Vec<Tag> = packet.tags().collect();
    assert_eq!(tags, vec![Tag::SUBNET_MASK, Tag::ROUTER, Tag::OVERLOAD]);
    assert_eq!(packet.get(Tag::SUBNET_MASK), Some(&[0x12][..]));
    assert_eq!(packet.get(Tag::ROUTER), Some(&[0x56][..]));
}
