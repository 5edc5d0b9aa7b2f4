//! The public address and prefix types (spec.md §3 "Address", "Prefix").

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::af::{AddressFamily, IPv4, IPv6};

/// A tagged v4/v6 address, exposing a big-endian octet view.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    V4(IPv4),
    V6(IPv6),
}

impl Address {
    #[must_use]
    pub fn v4(addr: Ipv4Addr) -> Self {
        Address::V4(IPv4::from_ipaddr(addr))
    }

    #[must_use]
    pub fn v6(addr: Ipv6Addr) -> Self {
        Address::V6(IPv6::from_ipaddr(addr))
    }

    /// Number of octets this address's family uses (4 or 16).
    #[must_use]
    pub fn max_depth(&self) -> u8 {
        match self {
            Address::V4(_) => IPv4::MAX_DEPTH,
            Address::V6(_) => IPv6::MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn max_bits(&self) -> u8 {
        match self {
            Address::V4(_) => IPv4::BITS,
            Address::V6(_) => IPv6::BITS,
        }
    }

    /// The big-endian octet at `depth` (0-indexed).
    #[must_use]
    pub fn octet(&self, depth: u8) -> u8 {
        match self {
            Address::V4(a) => a.octet(depth),
            Address::V6(a) => a.octet(depth),
        }
    }

    #[must_use]
    pub fn is_v4(&self) -> bool {
        matches!(self, Address::V4(_))
    }

    /// Masks off every bit beyond `bits`, in this address's own family.
    #[must_use]
    pub fn masked(&self, bits: u8) -> Self {
        match self {
            Address::V4(a) => Address::V4(a.mask(bits)),
            Address::V6(a) => Address::V6(a.mask(bits)),
        }
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => Address::v4(a),
            IpAddr::V6(a) => Address::v6(a),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::v4(addr)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address::v6(addr)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::V4(a) => write!(f, "{}", a.fmt_net()),
            Address::V6(a) => write!(f, "{}", a.fmt_net()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A `(address, bits)` pair. A *canonical* prefix has every bit beyond
/// `bits` set to zero; all prefixes stored in the trie are canonical
/// (spec.md §3 invariants). Callers' inputs are canonicalized on entry by
/// every public `Table` method, so this type does not enforce
/// canonicalization itself — it is a plain value carrying whatever the
/// caller or the trie put into it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    pub addr: Address,
    pub bits: u8,
}

impl Prefix {
    /// Builds a prefix, rejecting a `bits` value that exceeds the address
    /// family's width (spec.md §7 "Invalid prefix"). Does *not*
    /// canonicalize; call [`Prefix::canonicalize`] explicitly.
    #[must_use]
    pub fn new(addr: Address, bits: u8) -> Option<Self> {
        if bits > addr.max_bits() {
            None
        } else {
            Some(Prefix { addr, bits })
        }
    }

    /// Like [`Prefix::new`], but reports the rejected `bits` value instead
    /// of discarding it, for callers at a crate boundary who want to
    /// surface why a prefix was refused.
    pub fn try_new(addr: Address, bits: u8) -> Result<Self, crate::error::InvalidPrefixLength> {
        Self::new(addr, bits).ok_or(crate::error::InvalidPrefixLength {
            bits,
            max_bits: addr.max_bits(),
        })
    }

    /// Masks off every bit beyond `self.bits`, producing the canonical
    /// prefix (spec.md §8 property 1: idempotent).
    #[must_use]
    pub fn canonicalize(&self) -> Self {
        let addr = match self.addr {
            Address::V4(a) => Address::V4(a.mask(self.bits)),
            Address::V6(a) => Address::V6(a.mask(self.bits)),
        };
        Prefix {
            addr,
            bits: self.bits,
        }
    }

    /// `max_depth = bits >> 3` — depth of the node that holds this prefix
    /// as an inner prefix or fringe (spec.md §3 "Derived quantities").
    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.bits >> 3
    }

    /// `last_bits = bits & 7` — significant bits within that node's
    /// stride.
    #[must_use]
    pub fn last_bits(&self) -> u8 {
        self.bits & 7
    }

    /// True when this prefix's length lands exactly on the stride
    /// boundary one level below `depth` — the fringe predicate of
    /// spec.md §3/§4.5.
    #[must_use]
    pub fn is_fringe_at(&self, depth: u8) -> bool {
        depth == self.max_depth().wrapping_sub(1) && self.last_bits() == 0
    }

    /// Address-prefix containment test: does `self` cover `addr`?
    #[must_use]
    pub fn contains(&self, addr: &Address) -> bool {
        if self.addr.is_v4() != addr.is_v4() {
            return false;
        }
        match (self.addr, addr) {
            (Address::V4(p), Address::V4(a)) => {
                self.bits == 0 || (p.0 ^ a.0) >> (32 - self.bits as u32) == 0
            }
            (Address::V6(p), Address::V6(a)) => {
                self.bits == 0 || (p.0 ^ a.0) >> (128 - self.bits as u32) == 0
            }
            _ => unreachable!("address family mismatch already filtered"),
        }
    }

    /// Does `self`'s octet range fully contain `other`'s, i.e. is `other`
    /// at least as specific and nested within `self`?
    #[must_use]
    pub fn covers(&self, other: &Prefix) -> bool {
        self.addr.is_v4() == other.addr.is_v4()
            && self.bits <= other.bits
            && self.contains(&other.addr)
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.addr, self.bits)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_idempotent() {
        let p = Prefix::new(Address::v4(Ipv4Addr::new(10, 1, 2, 3)), 8).unwrap();
        let c1 = p.canonicalize();
        let c2 = c1.canonicalize();
        assert_eq!(c1, c2);
        assert_eq!(c1.addr, Address::v4(Ipv4Addr::new(10, 0, 0, 0)));
    }

    #[test]
    fn contains_basic() {
        let p = Prefix::new(Address::v4(Ipv4Addr::new(10, 0, 0, 0)), 8)
            .unwrap()
            .canonicalize();
        assert!(p.contains(&Address::v4(Ipv4Addr::new(10, 1, 2, 3))));
        assert!(!p.contains(&Address::v4(Ipv4Addr::new(11, 0, 0, 0))));
    }

    #[test]
    fn default_route_contains_everything() {
        let p = Prefix::new(Address::v4(Ipv4Addr::new(0, 0, 0, 0)), 0).unwrap();
        assert!(p.contains(&Address::v4(Ipv4Addr::new(255, 255, 255, 255))));
    }

    #[test]
    fn rejects_oversized_bits() {
        assert!(Prefix::new(Address::v4(Ipv4Addr::new(0, 0, 0, 0)), 33).is_none());
    }

    #[test]
    fn try_new_reports_the_rejected_length() {
        let err = Prefix::try_new(Address::v4(Ipv4Addr::new(0, 0, 0, 0)), 40).unwrap_err();
        assert_eq!(err.bits, 40);
        assert_eq!(err.max_bits, 32);
    }
}
