//! Zero-copy view over a BOOTP/DHCP frame.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +---------------+---------------+---------------+---------------+
//! |     op (1)    |   htype (1)   |   hlen (1)    |   hops (1)    |
//! +---------------+---------------+---------------+---------------+
//! |                            xid (4)                            |
//! +-------------------------------+-------------------------------+
//! |           secs (2)            |           flags (2)           |
//! +-------------------------------+-------------------------------+
//! |           ciaddr (4) / yiaddr (4) / siaddr (4) / giaddr (4)   |
//! +---------------------------------------------------------------+
//! |                          chaddr (16)                          |
//! +---------------------------------------------------------------+
//! |                          sname (64)                           |
//! +---------------------------------------------------------------+
//! |                          file (128)                           |
//! +---------------------------------------------------------------+
//! |                 cookie (4) = 99, 130, 83, 99                  |
//! +---------------------------------------------------------------+
//! |                       options (variable)                      |
//! +---------------------------------------------------------------+
//! ```

use crate::error::{Error, Result};
use std::ops::Range;

/// Length of the fixed BOOTP header, up to and excluding the cookie
pub const HEADER_LEN: usize = 236;

/// Offset of the options region; the smallest acceptable frame
pub const MIN_LEN: usize = 240;

pub const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

pub mod field {
    use std::ops::Range;

    pub const OP: Range<usize> = 0..1;
    pub const HTYPE: Range<usize> = 1..2;
    pub const HLEN: Range<usize> = 2..3;
    pub const HOPS: Range<usize> = 3..4;
    pub const XID: Range<usize> = 4..8;
    pub const SECS: Range<usize> = 8..10;
    pub const FLAGS: Range<usize> = 10..12;
    pub const CIADDR: Range<usize> = 12..16;
    pub const YIADDR: Range<usize> = 16..20;
    pub const SIADDR: Range<usize> = 20..24;
    pub const GIADDR: Range<usize> = 24..28;
    pub const CHADDR: Range<usize> = 28..44;
    pub const SNAME: Range<usize> = 44..108;
    pub const FILE: Range<usize> = 108..236;
    pub const COOKIE: Range<usize> = 236..240;
}

/// Read and write access to the named fields of a frame held in `T`.
///
/// The buffer length is checked once, at construction; every accessor after
/// that indexes within the first 240 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<T> {
    buffer: T,
}

macro_rules! fields {
    ($( $(#[$meta:meta])* $get:ident, $get_mut:ident => $range:expr; )*) => {
        impl<T: AsRef<[u8]>> Frame<T> {
            $(
                $(#[$meta])*
                pub fn $get(&self) -> &[u8] {
                    &self.buffer.as_ref()[$range]
                }
            )*
        }

        impl<T: AsRef<[u8]> + AsMut<[u8]>> Frame<T> {
            $(
                pub fn $get_mut(&mut self) -> &mut [u8] {
                    &mut self.buffer.as_mut()[$range]
                }
            )*
        }
    };
}

fields! {
    op, op_mut => field::OP;
    htype, htype_mut => field::HTYPE;
    hlen, hlen_mut => field::HLEN;
    hops, hops_mut => field::HOPS;
    xid, xid_mut => field::XID;
    secs, secs_mut => field::SECS;
    /// The most significant bit of the first octet is the broadcast flag
    flags, flags_mut => field::FLAGS;
    ciaddr, ciaddr_mut => field::CIADDR;
    yiaddr, yiaddr_mut => field::YIADDR;
    siaddr, siaddr_mut => field::SIADDR;
    giaddr, giaddr_mut => field::GIADDR;
    chaddr, chaddr_mut => field::CHADDR;
    /// Server host name, or options when Overload bit 1 is set
    sname, sname_mut => field::SNAME;
    /// Boot file name, or options when Overload bit 0 is set
    file, file_mut => field::FILE;
    cookie, cookie_mut => field::COOKIE;
    options, options_mut => MIN_LEN..;
}

impl<T> Frame<T> {
    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<T: AsRef<[u8]>> Frame<T> {
    /// Wrap a buffer, failing with `ShortPacket` below 240 bytes
    pub fn new_checked(buffer: T) -> Result<Self> {
        if buffer.as_ref().len() < MIN_LEN {
            return Err(Error::ShortPacket);
        }
        Ok(Self { buffer })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub fn has_magic_cookie(&self) -> bool {
        self.cookie() == MAGIC_COOKIE
    }

    pub fn region(&self, range: Range<usize>) -> &[u8] {
        &self.buffer.as_ref()[range]
    }
}

impl Frame<Vec<u8>> {
    /// A zeroed 240-byte frame
    pub fn new_zeroed() -> Self {
        Self {
            buffer: vec![0u8; MIN_LEN],
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Frame<T> {
    pub fn set_magic_cookie(&mut self) {
        self.cookie_mut().copy_from_slice(&MAGIC_COOKIE);
    }
}
