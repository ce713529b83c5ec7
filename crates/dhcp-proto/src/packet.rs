use crate::codec::{self, EncodeOptions};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::{MacAddress, OptionMap, Tag};
use std::net::Ipv4Addr;
use std::ops::{Deref, DerefMut};

/// BOOTP message op codes (RFC 2131 section 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    BootRequest = 1,
    BootReply = 2,
}

impl OpCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::BootRequest),
            2 => Some(Self::BootReply),
            _ => None,
        }
    }
}

/// Broadcast flag, most significant bit of the first `flags` octet
pub const BROADCAST_FLAG: u8 = 0x80;

/// Hardware type for Ethernet (RFC 1700)
pub const HTYPE_ETHERNET: u8 = 1;

/// DHCP packet: the fixed frame plus its decoded options.
///
/// After parsing, the option map is the only source of truth for options;
/// the option regions of the frame are rewritten from it by [`to_bytes`].
///
/// The packet dereferences to its [`OptionMap`], so option accessors can be
/// called on it directly.
///
/// [`to_bytes`]: Packet::to_bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    frame: Frame<Vec<u8>>,
    options: OptionMap,
}

impl Packet {
    /// A blank 240-byte packet with `op` and the magic cookie set
    pub fn new(op: OpCode) -> Self {
        let mut frame = Frame::new_zeroed();
        frame.op_mut()[0] = op as u8;
        frame.set_magic_cookie();
        Self {
            frame,
            options: OptionMap::new(),
        }
    }

    /// A reply to `request`, with the fields RFC 2131 table 3 says are
    /// copied from the request: `xid`, `flags`, `giaddr` and `chaddr`.
    /// Hardware type is Ethernet with 6-octet addresses.
    pub fn new_reply(request: &Packet) -> Self {
        let mut reply = Self::new(OpCode::BootReply);
        let frame = &mut reply.frame;

        frame.htype_mut()[0] = HTYPE_ETHERNET;
        frame.hlen_mut()[0] = 6;
        frame.xid_mut().copy_from_slice(request.frame.xid());
        frame.flags_mut().copy_from_slice(request.frame.flags());
        frame.giaddr_mut().copy_from_slice(request.frame.giaddr());
        frame.chaddr_mut().copy_from_slice(request.frame.chaddr());

        reply
    }

    /// Parse a received buffer
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let frame = Frame::new_checked(buf.to_vec())?;
        if !frame.has_magic_cookie() {
            let mut cookie = [0u8; 4];
            cookie.copy_from_slice(frame.cookie());
            return Err(Error::InvalidCookie(cookie));
        }
        let options = codec::decode(&frame)?;
        Ok(Self { frame, options })
    }

    /// Parse a buffer that must be a BOOTREQUEST
    pub fn request_from_bytes(buf: &[u8]) -> Result<Self> {
        let packet = Self::from_bytes(buf)?;
        if packet.op() != Some(OpCode::BootRequest) {
            return Err(Error::NotARequest);
        }
        Ok(packet)
    }

    /// Parse a buffer that must be a BOOTREPLY
    pub fn reply_from_bytes(buf: &[u8]) -> Result<Self> {
        let packet = Self::from_bytes(buf)?;
        if packet.op() != Some(OpCode::BootReply) {
            return Err(Error::NotAReply);
        }
        Ok(packet)
    }

    /// Serialize with default encoder settings
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&EncodeOptions::default())
    }

    /// Serialize; the packet must carry a message type
    pub fn to_bytes_with(&self, opts: &EncodeOptions) -> Result<Vec<u8>> {
        if !self.options.contains(Tag::DHCP_MSG_TYPE) {
            return Err(Error::MissingMessageType);
        }
        codec::encode(&self.options, self.frame.as_bytes(), opts)
    }

    pub fn frame(&self) -> &Frame<Vec<u8>> {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame<Vec<u8>> {
        &mut self.frame
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionMap {
        &mut self.options
    }

    /// `None` for op codes other than 1 and 2
    pub fn op(&self) -> Option<OpCode> {
        OpCode::from_u8(self.frame.op()[0])
    }

    pub fn htype(&self) -> u8 {
        self.frame.htype()[0]
    }

    pub fn hlen(&self) -> u8 {
        self.frame.hlen()[0]
    }

    pub fn hops(&self) -> u8 {
        self.frame.hops()[0]
    }

    pub fn set_hops(&mut self, hops: u8) {
        self.frame.hops_mut()[0] = hops;
    }

    pub fn xid(&self) -> u32 {
        u32::from_be_bytes(to_array(self.frame.xid()))
    }

    pub fn set_xid(&mut self, xid: u32) {
        self.frame.xid_mut().copy_from_slice(&xid.to_be_bytes());
    }

    pub fn secs(&self) -> u16 {
        u16::from_be_bytes(to_array(self.frame.secs()))
    }

    pub fn set_secs(&mut self, secs: u16) {
        self.frame.secs_mut().copy_from_slice(&secs.to_be_bytes());
    }

    pub fn flags(&self) -> u16 {
        u16::from_be_bytes(to_array(self.frame.flags()))
    }

    pub fn set_flags(&mut self, flags: u16) {
        self.frame.flags_mut().copy_from_slice(&flags.to_be_bytes());
    }

    /// Whether the client asked for replies to be broadcast
    pub fn broadcast(&self) -> bool {
        self.frame.flags()[0] & BROADCAST_FLAG != 0
    }

    pub fn set_broadcast(&mut self, broadcast: bool) {
        let flags = &mut self.frame.flags_mut()[0];
        if broadcast {
            *flags |= BROADCAST_FLAG;
        } else {
            *flags &= !BROADCAST_FLAG;
        }
    }

    pub fn ciaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(to_array(self.frame.ciaddr()))
    }

    pub fn set_ciaddr(&mut self, addr: Ipv4Addr) {
        self.frame.ciaddr_mut().copy_from_slice(&addr.octets());
    }

    pub fn yiaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(to_array(self.frame.yiaddr()))
    }

    pub fn set_yiaddr(&mut self, addr: Ipv4Addr) {
        self.frame.yiaddr_mut().copy_from_slice(&addr.octets());
    }

    pub fn siaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(to_array(self.frame.siaddr()))
    }

    pub fn set_siaddr(&mut self, addr: Ipv4Addr) {
        self.frame.siaddr_mut().copy_from_slice(&addr.octets());
    }

    pub fn giaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(to_array(self.frame.giaddr()))
    }

    pub fn set_giaddr(&mut self, addr: Ipv4Addr) {
        self.frame.giaddr_mut().copy_from_slice(&addr.octets());
    }

    /// The raw 16-octet client hardware address
    pub fn chaddr(&self) -> [u8; 16] {
        to_array(self.frame.chaddr())
    }

    pub fn set_chaddr(&mut self, chaddr: [u8; 16]) {
        self.frame.chaddr_mut().copy_from_slice(&chaddr);
    }

    /// The client MAC, when the hardware address is Ethernet
    pub fn client_mac(&self) -> Option<MacAddress> {
        if self.htype() != HTYPE_ETHERNET || self.hlen() != 6 {
            return None;
        }
        MacAddress::from_slice(self.frame.chaddr())
    }

    pub fn set_client_mac(&mut self, mac: MacAddress) {
        self.frame.htype_mut()[0] = HTYPE_ETHERNET;
        self.frame.hlen_mut()[0] = 6;
        self.set_chaddr(mac.to_chaddr());
    }

    /// `sname` up to its first NUL, when it holds a name rather than options
    pub fn sname(&self) -> Option<&str> {
        field_str(self.frame.sname(), self.overloads(codec::OVERLOAD_SNAME))
    }

    /// Store a server name, truncated to 63 bytes to keep a terminating NUL
    pub fn set_sname(&mut self, name: &str) {
        write_str(self.frame.sname_mut(), name);
    }

    /// `file` up to its first NUL, when it holds a name rather than options
    pub fn file(&self) -> Option<&str> {
        field_str(self.frame.file(), self.overloads(codec::OVERLOAD_FILE))
    }

    /// Store a boot file name, truncated to 127 bytes
    pub fn set_file(&mut self, name: &str) {
        write_str(self.frame.file_mut(), name);
    }

    /// Zero `sname` and `file`, dropping any Overload option with them
    pub fn clear_sname_and_file(&mut self) {
        self.frame.sname_mut().fill(0);
        self.frame.file_mut().fill(0);
        self.options.remove(Tag::OVERLOAD);
    }

    fn overloads(&self, bit: u8) -> bool {
        codec::overload_flags(&self.options) & bit != 0
    }
}

impl Deref for Packet {
    type Target = OptionMap;

    fn deref(&self) -> &OptionMap {
        &self.options
    }
}

impl DerefMut for Packet {
    fn deref_mut(&mut self) -> &mut OptionMap {
        &mut self.options
    }
}

fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut array = [0u8; N];
    array.copy_from_slice(bytes);
    array
}

fn field_str(bytes: &[u8], overloaded: bool) -> Option<&str> {
    if overloaded {
        return None;
    }
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    if end == 0 {
        return None;
    }
    std::str::from_utf8(&bytes[..end]).ok()
}

fn write_str(dest: &mut [u8], value: &str) {
    dest.fill(0);
    let len = value.len().min(dest.len() - 1);
    dest[..len].copy_from_slice(&value.as_bytes()[..len]);
}
