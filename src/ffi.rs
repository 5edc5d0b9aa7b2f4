//! C-compatible shim exposing insert/lookup/destroy for network-byte-order
//! integer addresses (spec.md §4.7, §6). Signatures are bit-exact with the
//! header spec.md documents:
//!
//! ```c
//! Table* bart_create(void);
//! void   bart_destroy(Table*);
//! int    bart_insert4(Table*, uint32_t ip_be, uint8_t prefix_len, uintptr_t value);
//! int    bart_insert6(Table*, const uint8_t addr[16], uint8_t prefix_len, uintptr_t value);
//! uintptr_t bart_lookup4(Table*, uint32_t ip_be, int* found);
//! uintptr_t bart_lookup6(Table*, const uint8_t addr[16], int* found);
//! ```
//!
//! The payload is a machine-word integer (`usize`/`uintptr_t`); the table
//! stored behind the opaque pointer is `Table<usize>`. The shim owns its
//! table: its lifetime is bounded by `bart_create`/`bart_destroy`, the
//! conventional "caller holds the raw pointer, library owns the box" shape.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::slice;

use crate::addr::{Address, Prefix};
use crate::table::Table;

/// Opaque handle for the C side; never constructed or inspected there.
pub struct BartTable(Table<usize>);

/// Allocates a new, empty table and returns an owning pointer to it.
#[no_mangle]
pub extern "C" fn bart_create() -> *mut BartTable {
    Box::into_raw(Box::new(BartTable(Table::new())))
}

/// Frees a table created by [`bart_create`]. `table` may be null, in which
/// case this is a no-op.
///
/// # Safety
/// `table` must be either null or a pointer previously returned by
/// [`bart_create`] and not yet destroyed.
#[no_mangle]
pub unsafe extern "C" fn bart_destroy(table: *mut BartTable) {
    if !table.is_null() {
        drop(Box::from_raw(table));
    }
}

/// Inserts a v4 prefix. `ip_be` is the address in network byte order.
/// `prefix_len` outside `0..=32` is a no-op that still returns success
/// (spec.md §6). Returns `0` on success, `-1` on allocation failure.
///
/// # Safety
/// `table` must be a live pointer from [`bart_create`].
#[no_mangle]
pub unsafe extern "C" fn bart_insert4(
    table: *mut BartTable,
    ip_be: u32,
    prefix_len: u8,
    value: usize,
) -> i32 {
    if prefix_len > 32 {
        return 0;
    }
    let table = &mut (*table).0;
    let addr = Address::v4(Ipv4Addr::from(u32::from_be(ip_be)));
    let prefix = Prefix::new(addr, prefix_len).expect("prefix_len already range-checked");
    match table.try_insert(&prefix, value) {
        Ok(_) => 0,
        Err(_) => -1,
    }
}

/// Inserts a v6 prefix from a 16-byte big-endian address buffer.
/// `prefix_len` outside `0..=128` is a no-op returning success.
///
/// # Safety
/// `table` must be a live pointer from [`bart_create`]; `addr` must point
/// to at least 16 readable bytes.
#[no_mangle]
pub unsafe extern "C" fn bart_insert6(
    table: *mut BartTable,
    addr: *const u8,
    prefix_len: u8,
    value: usize,
) -> i32 {
    if prefix_len > 128 {
        return 0;
    }
    let table = &mut (*table).0;
    let bytes: [u8; 16] = slice::from_raw_parts(addr, 16)
        .try_into()
        .expect("exactly 16 bytes requested");
    let addr = Address::v6(Ipv6Addr::from(bytes));
    let prefix = Prefix::new(addr, prefix_len).expect("prefix_len already range-checked");
    match table.try_insert(&prefix, value) {
        Ok(_) => 0,
        Err(_) => -1,
    }
}

/// Longest-prefix-match lookup for a v4 address. Sets `*found` to `1` on a
/// hit and `0` on a miss; the return value is undefined when `*found == 0`
/// (spec.md §6).
///
/// # Safety
/// `table` must be a live pointer from [`bart_create`]; `found` must point
/// to a writable `i32`.
#[no_mangle]
pub unsafe extern "C" fn bart_lookup4(table: *mut BartTable, ip_be: u32, found: *mut i32) -> usize {
    let table = &(*table).0;
    let addr = Address::v4(Ipv4Addr::from(u32::from_be(ip_be)));
    match table.lookup(&addr) {
        Some((_, value)) => {
            *found = 1;
            *value
        }
        None => {
            *found = 0;
            0
        }
    }
}

/// Longest-prefix-match lookup for a v6 address, from a 16-byte big-endian
/// buffer. See [`bart_lookup4`] for the `found` contract.
///
/// # Safety
/// `table` must be a live pointer from [`bart_create`]; `addr` must point
/// to at least 16 readable bytes; `found` must point to a writable `i32`.
#[no_mangle]
pub unsafe extern "C" fn bart_lookup6(
    table: *mut BartTable,
    addr: *const u8,
    found: *mut i32,
) -> usize {
    let table = &(*table).0;
    let bytes: [u8; 16] = slice::from_raw_parts(addr, 16)
        .try_into()
        .expect("exactly 16 bytes requested");
    let addr = Address::v6(Ipv6Addr::from(bytes));
    match table.lookup(&addr) {
        Some((_, value)) => {
            *found = 1;
            *value
        }
        None => {
            *found = 0;
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_insert_lookup_destroy_round_trip() {
        unsafe {
            let table = bart_create();
            let ip = u32::from(Ipv4Addr::new(10, 0, 0, 0)).to_be();
            assert_eq!(bart_insert4(table, ip, 8, 42), 0);

            let query = u32::from(Ipv4Addr::new(10, 1, 2, 3)).to_be();
            let mut found: i32 = 0;
            let value = bart_lookup4(table, query, &mut found);
            assert_eq!(found, 1);
            assert_eq!(value, 42);

            let miss = u32::from(Ipv4Addr::new(192, 0, 2, 1)).to_be();
            let value = bart_lookup4(table, miss, &mut found);
            assert_eq!(found, 0);
            let _ = value;

            bart_destroy(table);
        }
    }

    #[test]
    fn insert6_and_lookup6_round_trip() {
        unsafe {
            let table = bart_create();
            let addr: Ipv6Addr = "2001:db8::".parse().unwrap();
            let octets = addr.octets();
            assert_eq!(bart_insert6(table, octets.as_ptr(), 32, 7), 0);

            let query: Ipv6Addr = "2001:db8::1".parse().unwrap();
            let query_octets = query.octets();
            let mut found: i32 = 0;
            let value = bart_lookup6(table, query_octets.as_ptr(), &mut found);
            assert_eq!(found, 1);
            assert_eq!(value, 7);

            bart_destroy(table);
        }
    }

    #[test]
    fn out_of_range_prefix_len_is_a_no_op_success() {
        unsafe {
            let table = bart_create();
            assert_eq!(bart_insert4(table, 0, 33, 1), 0);
            let mut found: i32 = 1;
            bart_lookup4(table, 0, &mut found);
            assert_eq!(found, 0);
            bart_destroy(table);
        }
    }

    #[test]
    fn null_destroy_is_a_no_op() {
        unsafe {
            bart_destroy(std::ptr::null_mut());
        }
    }
}
