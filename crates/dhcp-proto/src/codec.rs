//! TLV option codec.
//!
//! Options live in up to three regions of a frame: the `options` tail, and,
//! when the Overload option (52) says so, the `file` and `sname` fields
//! (RFC 2132 section 9.3). Decoding merges all regions into one
//! [`OptionMap`]; encoding writes the map back, spilling into `file` and
//! then `sname` when the options tail would exceed the message size limit.

use crate::error::{Error, Result};
use crate::frame::{field, Frame, MIN_LEN};
use crate::{OptionMap, Tag};
use std::ops::Range;

/// Overload bit: `file` carries options
pub const OVERLOAD_FILE: u8 = 0x1;

/// Overload bit: `sname` carries options
pub const OVERLOAD_SNAME: u8 = 0x2;

/// Smallest message every DHCP participant must accept (RFC 2131 section 2)
pub const MIN_MESSAGE_SIZE: usize = 576;

/// Largest value a single TLV can carry
pub const MAX_OPTION_LEN: usize = 255;

/// Parse one region into `options`.
///
/// Pad octets are skipped; End terminates the region. Running out of bytes
/// before End, or in the middle of an option, is `ShortPacket`. A repeated
/// tag replaces the earlier value.
pub fn decode_region(mut region: &[u8], options: &mut OptionMap) -> Result<()> {
    loop {
        let (&tag, rest) = region.split_first().ok_or(Error::ShortPacket)?;
        region = rest;

        match Tag(tag) {
            Tag::END => return Ok(()),
            Tag::PAD => continue,
            tag => {
                let (&len, rest) = region.split_first().ok_or(Error::ShortPacket)?;
                let len = usize::from(len);
                if rest.len() < len {
                    return Err(Error::ShortPacket);
                }
                // Duplicates are not allowed by the RFC, but some clients
                // send them anyway. The later value wins.
                options.set(tag, &rest[..len]);
                region = &rest[len..];
            }
        }
    }
}

/// Overload bits announced by option 52, zero when absent
pub fn overload_flags(options: &OptionMap) -> u8 {
    options
        .get(Tag::OVERLOAD)
        .and_then(<[u8]>::first)
        .map_or(0, |flags| flags & (OVERLOAD_FILE | OVERLOAD_SNAME))
}

/// Parse every option region of a frame into one map
pub fn decode<T: AsRef<[u8]>>(frame: &Frame<T>) -> Result<OptionMap> {
    let mut options = OptionMap::new();

    decode_region(frame.options(), &mut options)?;

    if overload_flags(&options) & OVERLOAD_FILE != 0 {
        decode_region(frame.file(), &mut options)?;
    }
    if overload_flags(&options) & OVERLOAD_SNAME != 0 {
        decode_region(frame.sname(), &mut options)?;
    }

    Ok(options)
}

/// Knobs for [`encode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Maximum message size the receiver accepts (option 57). Values below
    /// [`MIN_MESSAGE_SIZE`] are raised to it; `None` means the minimum.
    pub max_len: Option<u16>,

    /// Whether options may spill into `file` and `sname`
    pub allow_overload: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_len: None,
            allow_overload: true,
        }
    }
}

impl EncodeOptions {
    /// The message size limit actually enforced
    pub fn limit(&self) -> usize {
        self.max_len
            .map_or(MIN_MESSAGE_SIZE, |max| usize::from(max).max(MIN_MESSAGE_SIZE))
    }
}

/// A region options are written into, with the bytes left before its End
struct Region<'a> {
    entries: Vec<(Tag, &'a [u8])>,
    room: usize,
}

impl<'a> Region<'a> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            // one octet is always kept for End
            room: capacity.saturating_sub(1),
        }
    }

    fn try_push(&mut self, tag: Tag, value: &'a [u8]) -> bool {
        let size = 2 + value.len();
        if size > self.room {
            return false;
        }
        self.room -= size;
        self.entries.push((tag, value));
        true
    }

    fn write(&self, out: &mut Vec<u8>) {
        for (tag, value) in &self.entries {
            out.push(tag.to_u8());
            // fits: checked against MAX_OPTION_LEN before placement
            out.push(value.len() as u8);
            out.extend_from_slice(value);
        }
        out.push(Tag::END.to_u8());
    }
}

/// Options in wire order: message type first, then ascending tags.
/// Overload is recomputed by the encoder and never copied from the map.
fn wire_order(options: &OptionMap) -> Result<Vec<(Tag, &[u8])>> {
    let mut entries = Vec::with_capacity(options.len());

    if let Some(value) = options.get(Tag::DHCP_MSG_TYPE) {
        entries.push((Tag::DHCP_MSG_TYPE, value));
    }
    entries.extend(
        options
            .iter()
            .filter(|(tag, _)| *tag != Tag::DHCP_MSG_TYPE && *tag != Tag::OVERLOAD),
    );

    if let Some((tag, value)) = entries
        .iter()
        .find(|(_, value)| value.len() > MAX_OPTION_LEN)
    {
        return Err(Error::OptionTooLong {
            tag: *tag,
            len: value.len(),
        });
    }

    Ok(entries)
}

static OVERLOAD_VALUES: [[u8; 1]; 4] = [[0], [1], [2], [3]];

fn is_zeroed(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| *b == 0)
}

fn write_field(out: &mut [u8], range: Range<usize>, region: &Region<'_>) {
    let mut bytes = Vec::with_capacity(range.len());
    region.write(&mut bytes);
    let dest = &mut out[range];
    dest.fill(0);
    dest[..bytes.len()].copy_from_slice(&bytes);
}

/// Serialize `options` behind the fixed header of `frame`.
///
/// The first 240 bytes of `frame` are copied as-is, except that `file` and
/// `sname` are cleared when the map's own Overload option marks them as
/// option space. Spilling only uses a field that is entirely zero, so a
/// boot file or server name set by the caller is never overwritten.
pub fn encode(options: &OptionMap, frame: &[u8], opts: &EncodeOptions) -> Result<Vec<u8>> {
    if frame.len() < MIN_LEN {
        return Err(Error::ShortPacket);
    }

    let limit = opts.limit();
    let entries = wire_order(options)?;

    let mut out = Vec::with_capacity(limit);
    out.extend_from_slice(&frame[..MIN_LEN]);

    let inherited = overload_flags(options);
    if inherited & OVERLOAD_FILE != 0 {
        out[field::FILE].fill(0);
    }
    if inherited & OVERLOAD_SNAME != 0 {
        out[field::SNAME].fill(0);
    }

    let main_capacity = limit - MIN_LEN;
    let needed: usize = entries.iter().map(|(_, value)| 2 + value.len()).sum::<usize>() + 1;

    let mut main = Region::new(main_capacity);
    if needed <= main_capacity {
        for &(tag, value) in &entries {
            main.try_push(tag, value);
        }
        main.write(&mut out);
        return Ok(out);
    }

    let too_large = Error::TooLarge {
        needed: MIN_LEN + needed,
        max: limit,
    };
    if !opts.allow_overload {
        return Err(too_large);
    }

    // Room for the Overload option itself
    let mut main = Region::new(main_capacity - 3);
    let mut file = Region::new(if is_zeroed(&out[field::FILE]) { field::FILE.len() } else { 0 });
    let mut sname = Region::new(if is_zeroed(&out[field::SNAME]) { field::SNAME.len() } else { 0 });

    for &(tag, value) in &entries {
        let placed = main.try_push(tag, value)
            || file.try_push(tag, value)
            || sname.try_push(tag, value);
        if !placed {
            return Err(too_large);
        }
    }

    let mut flags = 0;
    if !file.entries.is_empty() {
        flags |= OVERLOAD_FILE;
        write_field(&mut out, field::FILE, &file);
    }
    if !sname.entries.is_empty() {
        flags |= OVERLOAD_SNAME;
        write_field(&mut out, field::SNAME, &sname);
    }

    if flags != 0 {
        main.entries
            .push((Tag::OVERLOAD, &OVERLOAD_VALUES[usize::from(flags)][..]));
        main.entries
            .sort_by_key(|(tag, _)| (*tag != Tag::DHCP_MSG_TYPE, *tag));
    }
    main.write(&mut out);

    Ok(out)
}
