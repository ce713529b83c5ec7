use crate::{MessageType, Tag};
use std::collections::btree_map::{self, BTreeMap};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Option values keyed by tag.
///
/// Values are opaque byte strings; the typed accessors interpret them on
/// demand and report a value as absent when its length does not fit the
/// requested type. Iteration is in ascending tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap(BTreeMap<Tag, Vec<u8>>);

impl OptionMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains_key(&tag)
    }

    pub fn get(&self, tag: Tag) -> Option<&[u8]> {
        self.0.get(&tag).map(Vec::as_slice)
    }

    /// Store a value, replacing any previous one. Pad and End are framing
    /// tags and are never stored.
    pub fn set(&mut self, tag: Tag, value: impl Into<Vec<u8>>) {
        if tag == Tag::PAD || tag == Tag::END {
            return;
        }
        self.0.insert(tag, value.into());
    }

    pub fn remove(&mut self, tag: Tag) -> Option<Vec<u8>> {
        self.0.remove(&tag)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter(self.0.iter())
    }

    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.0.keys().copied()
    }

    /// Interpret the value under `tag` as `T`
    pub fn get_as<T: OptionValue>(&self, tag: Tag) -> Option<T> {
        self.get(tag).and_then(T::from_option)
    }

    pub fn get_u8(&self, tag: Tag) -> Option<u8> {
        self.get_as(tag)
    }

    pub fn set_u8(&mut self, tag: Tag, value: u8) {
        self.set(tag, [value]);
    }

    pub fn get_u16(&self, tag: Tag) -> Option<u16> {
        self.get_as(tag)
    }

    pub fn set_u16(&mut self, tag: Tag, value: u16) {
        self.set(tag, value.to_be_bytes());
    }

    pub fn get_u32(&self, tag: Tag) -> Option<u32> {
        self.get_as(tag)
    }

    pub fn set_u32(&mut self, tag: Tag, value: u32) {
        self.set(tag, value.to_be_bytes());
    }

    pub fn get_ipv4(&self, tag: Tag) -> Option<Ipv4Addr> {
        self.get_as(tag)
    }

    pub fn set_ipv4(&mut self, tag: Tag, addr: Ipv4Addr) {
        self.set(tag, addr.octets());
    }

    /// Address lists such as Router or DomainServer
    pub fn get_ipv4_list(&self, tag: Tag) -> Option<Vec<Ipv4Addr>> {
        self.get_as(tag)
    }

    pub fn set_ipv4_list(&mut self, tag: Tag, addrs: &[Ipv4Addr]) {
        self.set(tag, addrs.iter().flat_map(Ipv4Addr::octets).collect::<Vec<_>>());
    }

    /// The value bytes as text. No trailing NUL is added or stripped.
    pub fn get_string(&self, tag: Tag) -> Option<String> {
        self.get_as(tag)
    }

    pub fn set_string(&mut self, tag: Tag, value: &str) {
        self.set(tag, value.as_bytes());
    }

    /// Whole seconds, big-endian u32
    pub fn get_duration(&self, tag: Tag) -> Option<Duration> {
        self.get_as(tag)
    }

    /// Sub-second precision is dropped; durations beyond `u32::MAX` seconds
    /// saturate (0xffffffff is "infinity" for lease times).
    pub fn set_duration(&mut self, tag: Tag, value: Duration) {
        let secs = u32::try_from(value.as_secs()).unwrap_or(u32::MAX);
        self.set_u32(tag, secs);
    }

    /// `None` when option 53 is absent, malformed, or out of range
    pub fn message_type(&self) -> Option<MessageType> {
        self.get_as(Tag::DHCP_MSG_TYPE)
    }

    pub fn set_message_type(&mut self, message_type: MessageType) {
        self.set_u8(Tag::DHCP_MSG_TYPE, message_type.to_u8());
    }

    /// Populate a struct declared with [`option_struct!`](crate::option_struct)
    pub fn decode<T: FromOptions>(&self) -> T {
        T::from_options(self)
    }
}

pub struct Iter<'a>(btree_map::Iter<'a, Tag, Vec<u8>>);

impl<'a> Iterator for Iter<'a> {
    type Item = (Tag, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(tag, value)| (*tag, value.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a OptionMap {
    type Item = (Tag, &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Into<Vec<u8>>> FromIterator<(Tag, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (Tag, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (tag, value) in iter {
            map.set(tag, value);
        }
        map
    }
}

/// A type an option value can be read as
pub trait OptionValue: Sized {
    fn from_option(value: &[u8]) -> Option<Self>;
}

impl OptionValue for u8 {
    fn from_option(value: &[u8]) -> Option<Self> {
        match value {
            [b] => Some(*b),
            _ => None,
        }
    }
}

impl OptionValue for u16 {
    fn from_option(value: &[u8]) -> Option<Self> {
        value.try_into().ok().map(u16::from_be_bytes)
    }
}

impl OptionValue for u32 {
    fn from_option(value: &[u8]) -> Option<Self> {
        value.try_into().ok().map(u32::from_be_bytes)
    }
}

/// Flag options (IP forwarding, trailers, ...) are a single 0/1 octet
impl OptionValue for bool {
    fn from_option(value: &[u8]) -> Option<Self> {
        u8::from_option(value).map(|b| b != 0)
    }
}

impl OptionValue for Ipv4Addr {
    fn from_option(value: &[u8]) -> Option<Self> {
        <[u8; 4]>::try_from(value).ok().map(Ipv4Addr::from)
    }
}

impl OptionValue for Vec<Ipv4Addr> {
    fn from_option(value: &[u8]) -> Option<Self> {
        if value.is_empty() || value.len() % 4 != 0 {
            return None;
        }
        Some(
            value
                .chunks_exact(4)
                .map(|c| Ipv4Addr::new(c[0], c[1], c[2], c[3]))
                .collect(),
        )
    }
}

impl OptionValue for String {
    fn from_option(value: &[u8]) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        String::from_utf8(value.to_vec()).ok()
    }
}

impl OptionValue for Duration {
    fn from_option(value: &[u8]) -> Option<Self> {
        u32::from_option(value).map(|secs| Duration::from_secs(secs.into()))
    }
}

impl OptionValue for MessageType {
    fn from_option(value: &[u8]) -> Option<Self> {
        u8::from_option(value).and_then(MessageType::from_u8)
    }
}

impl OptionValue for Vec<u8> {
    fn from_option(value: &[u8]) -> Option<Self> {
        Some(value.to_vec())
    }
}

/// How a struct field is filled from a possibly missing option value.
///
/// Plain types fall back to their default when the option is missing or
/// unreadable; `Option<T>` fields stay `None`.
pub trait DecodeField: Sized {
    fn decode_field(value: Option<&[u8]>) -> Self;
}

macro_rules! decode_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DecodeField for $ty {
                fn decode_field(value: Option<&[u8]>) -> Self {
                    value.and_then(<$ty>::from_option).unwrap_or_default()
                }
            }

            impl DecodeField for Option<$ty> {
                fn decode_field(value: Option<&[u8]>) -> Self {
                    value.and_then(<$ty>::from_option)
                }
            }
        )*
    };
}

decode_field!(u8, u16, u32, bool, String, Duration, Vec<u8>, Vec<Ipv4Addr>);

impl DecodeField for Ipv4Addr {
    fn decode_field(value: Option<&[u8]>) -> Self {
        value
            .and_then(Ipv4Addr::from_option)
            .unwrap_or(Ipv4Addr::UNSPECIFIED)
    }
}

impl DecodeField for Option<Ipv4Addr> {
    fn decode_field(value: Option<&[u8]>) -> Self {
        value.and_then(Ipv4Addr::from_option)
    }
}

impl DecodeField for Option<MessageType> {
    fn decode_field(value: Option<&[u8]>) -> Self {
        value.and_then(MessageType::from_option)
    }
}

/// Structs that can be filled from an [`OptionMap`]
pub trait FromOptions {
    fn from_options(options: &OptionMap) -> Self;
}

/// Declare a struct whose fields are each bound to an option tag, and
/// implement [`FromOptions`] for it.
///
/// ```
/// use dhcp_proto::{option_struct, OptionMap, Tag};
/// use std::net::Ipv4Addr;
/// use std::time::Duration;
///
/// option_struct! {
///     #[derive(Debug)]
///     pub struct Lease {
///         pub mask: Ipv4Addr = Tag::SUBNET_MASK,
///         pub lease_time: Option<Duration> = Tag::ADDRESS_TIME,
///     }
/// }
///
/// let mut options = OptionMap::new();
/// options.set_ipv4(Tag::SUBNET_MASK, Ipv4Addr::new(255, 255, 255, 0));
/// let lease: Lease = options.decode();
/// assert_eq!(lease.mask, Ipv4Addr::new(255, 255, 255, 0));
/// assert_eq!(lease.lease_time, None);
/// ```
#[macro_export]
macro_rules! option_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty = $tag:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::FromOptions for $name {
            fn from_options(options: &$crate::OptionMap) -> Self {
                Self {
                    $(
                        $field: <$ty as $crate::DecodeField>::decode_field(options.get($tag)),
                    )*
                }
            }
        }
    };
}
