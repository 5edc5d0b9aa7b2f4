//! Address-family abstraction: the tagged v4/v6 address representation and
//! the `AddressFamily` trait that lets the rest of the engine (§4.5, §4.6)
//! stay generic over IPv4 and IPv6 instead of duplicating the trie code.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A canonicalizable, bit-addressable network address.
///
/// `IPv4` and `IPv6` wrap their native integer form (`u32`/`u128`) so the
/// trie's octet-walk can be expressed as plain shifts and masks instead of
/// byte-slice indexing.
pub trait AddressFamily:
    Copy + Clone + PartialEq + Eq + fmt::Debug + 'static
{
    /// Number of address bits (32 for v4, 128 for v6).
    const BITS: u8;

    /// Number of stride-node levels a full-length prefix occupies.
    const MAX_DEPTH: u8 = Self::BITS / 8;

    /// The big-endian octet at `depth` (0-indexed from the most
    /// significant octet).
    fn octet(&self, depth: u8) -> u8;

    /// Mask off every bit beyond `len`, producing the canonical form.
    #[must_use]
    fn mask(&self, len: u8) -> Self;

    fn fmt_net(&self) -> String;
}

/// An IPv4 address, stored host-endian as a `u32` for cheap shifting.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IPv4(pub u32);

/// An IPv6 address, stored host-endian as a `u128`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IPv6(pub u128);

impl IPv4 {
    #[must_use]
    pub fn from_ipaddr(addr: Ipv4Addr) -> Self {
        IPv4(u32::from(addr))
    }

    #[must_use]
    pub fn into_ipaddr(self) -> Ipv4Addr {
        Ipv4Addr::from(self.0)
    }
}

impl IPv6 {
    #[must_use]
    pub fn from_ipaddr(addr: Ipv6Addr) -> Self {
        IPv6(u128::from(addr))
    }

    #[must_use]
    pub fn into_ipaddr(self) -> Ipv6Addr {
        Ipv6Addr::from(self.0)
    }
}

impl AddressFamily for IPv4 {
    const BITS: u8 = 32;

    fn octet(&self, depth: u8) -> u8 {
        debug_assert!(depth < 4, "IPv4 octet depth out of range: {depth}");
        (self.0 >> (24 - depth as u32 * 8)) as u8
    }

    fn mask(&self, len: u8) -> Self {
        debug_assert!(len <= 32);
        if len == 0 {
            IPv4(0)
        } else {
            IPv4(self.0 & (u32::MAX << (32 - len as u32)))
        }
    }

    fn fmt_net(&self) -> String {
        self.into_ipaddr().to_string()
    }
}

impl AddressFamily for IPv6 {
    const BITS: u8 = 128;

    fn octet(&self, depth: u8) -> u8 {
        debug_assert!(depth < 16, "IPv6 octet depth out of range: {depth}");
        (self.0 >> (120 - depth as u32 * 8)) as u8
    }

    fn mask(&self, len: u8) -> Self {
        debug_assert!(len <= 128);
        if len == 0 {
            IPv6(0)
        } else {
            IPv6(self.0 & (u128::MAX << (128 - len as u32)))
        }
    }

    fn fmt_net(&self) -> String {
        self.into_ipaddr().to_string()
    }
}

impl fmt::Debug for IPv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_ipaddr())
    }
}

impl fmt::Debug for IPv6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_ipaddr())
    }
}
