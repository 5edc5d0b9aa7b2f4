//! End-to-end scenarios straight out of spec.md §8 ("Concrete end-to-end
//! scenarios"), driven purely through the public `Table` API.

use std::net::{Ipv4Addr, Ipv6Addr};

use bart_store::prelude::*;

fn v4(a: u8, b: u8, c: u8, d: u8, bits: u8) -> Prefix {
    Prefix::new(Address::v4(Ipv4Addr::new(a, b, c, d)), bits).unwrap()
}

fn addr4(a: u8, b: u8, c: u8, d: u8) -> Address {
    Address::v4(Ipv4Addr::new(a, b, c, d))
}

#[test]
fn scenario_a_path_compression_and_expansion() {
    let mut t: Table<u32> = Table::new();

    t.insert(&v4(192, 168, 0, 1, 32), 1);
    assert_eq!(t.lookup(&addr4(192, 168, 0, 3)), None);

    t.insert(&v4(192, 168, 0, 2, 32), 2);
    assert_eq!(t.lookup(&addr4(192, 168, 0, 3)), None);

    t.insert(&v4(192, 168, 0, 0, 26), 7);

    let (p, v) = t.lookup(&addr4(192, 168, 0, 3)).unwrap();
    assert_eq!(*v, 7);
    assert_eq!(p, v4(192, 168, 0, 0, 26));

    let (p, v) = t.lookup(&addr4(192, 168, 0, 1)).unwrap();
    assert_eq!(*v, 1);
    assert_eq!(p, v4(192, 168, 0, 1, 32));

    assert_eq!(t.lookup(&addr4(192, 168, 0, 64)), None);
}

#[test]
fn scenario_b_fringe_promotion() {
    let mut t: Table<u32> = Table::new();

    t.insert(&v4(10, 0, 0, 0, 8), 100);
    let (p, v) = t.lookup(&addr4(10, 1, 2, 3)).unwrap();
    assert_eq!(*v, 100);
    assert_eq!(p, v4(10, 0, 0, 0, 8));

    t.insert(&v4(10, 1, 0, 0, 16), 101);

    let (_, v) = t.lookup(&addr4(10, 2, 3, 4)).unwrap();
    assert_eq!(*v, 100, "default route under the promoted node still serves unrelated octets");

    let (_, v) = t.lookup(&addr4(10, 1, 5, 6)).unwrap();
    assert_eq!(*v, 101);
}

#[test]
fn scenario_c_default_route() {
    let mut t: Table<u32> = Table::new();
    let default = v4(0, 0, 0, 0, 0);
    t.insert(&default, 42);

    for addr in [
        addr4(1, 2, 3, 4),
        addr4(255, 255, 255, 255),
        addr4(0, 0, 0, 0),
    ] {
        let (_, v) = t.lookup(&addr).unwrap();
        assert_eq!(*v, 42);
    }

    assert_eq!(t.get(&default), Some(&42));
    assert_eq!(t.delete(&default), Some(42));
    assert_eq!(t.lookup(&addr4(1, 2, 3, 4)), None);
}

#[test]
fn scenario_d_ipv6() {
    let mut t: Table<u32> = Table::new();
    let net: Ipv6Addr = "2001:db8::".parse().unwrap();
    t.insert(&Prefix::new(Address::v6(net), 32).unwrap(), 200);

    let hit: Ipv6Addr = "2001:db8::1".parse().unwrap();
    let (p, v) = t.lookup(&Address::v6(hit)).unwrap();
    assert_eq!(*v, 200);
    assert_eq!(p, Prefix::new(Address::v6(net), 32).unwrap());

    let miss: Ipv6Addr = "2001:db9::1".parse().unwrap();
    assert_eq!(t.lookup(&Address::v6(miss)), None);
}

#[test]
fn scenario_e_exact_vs_lpm_distinction() {
    let mut t: Table<u32> = Table::new();
    t.insert(&v4(10, 0, 0, 0, 8), 1);
    t.insert(&v4(10, 0, 0, 0, 24), 2);

    assert_eq!(t.get(&v4(10, 0, 0, 0, 16)), None);

    let (p, v) = t.lookup(&addr4(10, 0, 0, 5)).unwrap();
    assert_eq!(*v, 2);
    assert_eq!(p, v4(10, 0, 0, 0, 24));

    let (p, v) = t.lookup(&addr4(10, 1, 1, 1)).unwrap();
    assert_eq!(*v, 1);
    assert_eq!(p, v4(10, 0, 0, 0, 8));
}

#[test]
fn scenario_f_persistent_isolation() {
    let mut t: Table<u32> = Table::new();
    t.insert(&v4(1, 0, 0, 0, 8), 1);

    let t_prime = t.insert_persist(&v4(2, 0, 0, 0, 8), 2);

    assert_eq!(t.lookup(&addr4(2, 0, 0, 1)), None);
    let (p, v) = t_prime.lookup(&addr4(2, 0, 0, 1)).unwrap();
    assert_eq!(*v, 2);
    assert_eq!(p, v4(2, 0, 0, 0, 8));

    // The original prefix survives untouched in the new snapshot too.
    let (p, v) = t_prime.lookup(&addr4(1, 2, 3, 4)).unwrap();
    assert_eq!(*v, 1);
    assert_eq!(p, v4(1, 0, 0, 0, 8));
}

#[test]
fn contains_matches_lookup_presence() {
    let mut t: Table<u32> = Table::new();
    t.insert(&v4(198, 51, 100, 0, 24), 1);
    assert!(t.contains(&addr4(198, 51, 100, 5)));
    assert!(!t.contains(&addr4(198, 51, 101, 5)));
}

#[test]
fn ipv4_and_ipv6_entries_coexist_without_cross_talk() {
    let mut t: Table<u32> = Table::new();
    t.insert(&v4(10, 0, 0, 0, 8), 1);
    let v6_net: Ipv6Addr = "::ffff:0:0".parse().unwrap();
    t.insert(&Prefix::new(Address::v6(v6_net), 96).unwrap(), 2);

    assert_eq!(t.size_v4(), 1);
    assert_eq!(t.size_v6(), 1);
    assert_eq!(t.size(), 2);
}
