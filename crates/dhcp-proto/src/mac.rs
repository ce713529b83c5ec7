use std::fmt;
use std::str::FromStr;

/// MAC-48 hardware address, the first six octets of `chaddr` for Ethernet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Take the leading six octets of a slice, `None` if it is shorter
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 6] = slice.get(..6)?.try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// The 16-octet `chaddr` form, zero padded
    pub fn to_chaddr(&self) -> [u8; 16] {
        let mut chaddr = [0u8; 16];
        chaddr[..6].copy_from_slice(&self.0);
        chaddr
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MAC address: {0:?}")]
pub struct ParseMacError(String);

impl FromStr for MacAddress {
    type Err = ParseMacError;

    /// Accepts `XX:XX:XX:XX:XX:XX` and `XX-XX-XX-XX-XX-XX`, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMacError(s.to_string());
        let mut bytes = [0u8; 6];
        let mut parts = s.split([':', '-']);

        for byte in bytes.iter_mut() {
            let part = parts.next().filter(|p| p.len() == 2).ok_or_else(invalid)?;
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(bytes))
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}
