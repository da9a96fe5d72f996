//! Machine identity derivation for anonymous reporting.
//!
//! This module handles:
//! - Network interface enumeration (loopback and virtual included)
//! - Hardware (MAC) address extraction per interface
//! - Stable anonymous identifier derivation via SHA-1
//!
//! The identifier fingerprints the physical host, never an individual user:
//! the set of distinct non-zero MACs is deduplicated, sorted, joined and
//! hashed, so the output is invariant to OS enumeration order and identical
//! across calls on an unchanged host.

use if_addrs::get_if_addrs;
use mac_address::mac_address_by_name;
use sha1::{Digest, Sha1};
use std::collections::BTreeSet;
use tracing::debug;

/// "No real hardware address" sentinel reported by some interfaces.
const NULL_MAC: &str = "00:00:00:00:00:00";

/// Compute the stable anonymous machine identifier for this host.
///
/// No error path: enumeration failures and hosts with zero qualifying
/// interfaces both degrade to the hash of the empty string, which is a
/// well-defined (if less distinctive) identifier.
pub fn compute_machine_id() -> String {
    machine_id_from_macs(collect_macs())
}

/// Enumerate every address of every interface and extract the hardware
/// identifiers, formatted lowercase `aa:bb:cc:dd:ee:ff`.
fn collect_macs() -> Vec<String> {
    let interfaces = match get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(err) => {
            debug!("interface enumeration failed: {}", err);
            return Vec::new();
        }
    };

    let mut macs = Vec::new();
    for iface in interfaces {
        match mac_address_by_name(&iface.name) {
            Ok(Some(mac)) => {
                let b = mac.bytes();
                macs.push(format!(
                    "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                    b[0], b[1], b[2], b[3], b[4], b[5]
                ));
            }
            Ok(None) => {}
            Err(err) => {
                debug!("no MAC for interface {}: {}", iface.name, err);
            }
        }
    }
    macs
}

/// Deduplicate, drop the all-zero sentinel, sort ascending, join with commas
/// and hash. Split out from the OS query so the pipeline is deterministic
/// under test.
pub(crate) fn machine_id_from_macs<I>(macs: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = macs.into_iter().filter(|mac| mac != NULL_MAC).collect();
    let joined = unique.into_iter().collect::<Vec<_>>().join(",");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-1 of the empty string.
    const EMPTY_ID: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    fn macs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_hashes_empty_string() {
        assert_eq!(machine_id_from_macs(Vec::new()), EMPTY_ID);
    }

    #[test]
    fn all_zero_macs_are_excluded() {
        assert_eq!(
            machine_id_from_macs(macs(&["00:00:00:00:00:00"])),
            EMPTY_ID
        );
    }

    #[test]
    fn dedup_sort_and_filter_before_hashing() {
        // Hashed input must be "a,b" regardless of duplicates, ordering and
        // the all-zero entry.
        let id = machine_id_from_macs(macs(&["b", "a", "a", "00:00:00:00:00:00"]));
        // SHA-1 of "a,b".
        assert_eq!(id, "5d8b1241b0484dd20c2cfeca6f692becfbab5d18");
    }

    #[test]
    fn invariant_to_enumeration_order() {
        let forward = machine_id_from_macs(macs(&["00:11:22:33:44:55", "aa:bb:cc:dd:ee:ff"]));
        let reverse = machine_id_from_macs(macs(&["aa:bb:cc:dd:ee:ff", "00:11:22:33:44:55"]));
        assert_eq!(forward, reverse);
        // SHA-1 of "00:11:22:33:44:55,aa:bb:cc:dd:ee:ff".
        assert_eq!(forward, "8970d09867cbc2a9a10ad7f86443b7be76763f88");
    }

    #[test]
    fn single_mac_known_digest() {
        let id = machine_id_from_macs(macs(&["aa:bb:cc:dd:ee:ff"]));
        // SHA-1 of "aa:bb:cc:dd:ee:ff".
        assert_eq!(id, "317060aa70a5a9e8460261106ff8bc05a2f162b4");
    }

    #[test]
    fn deterministic_on_real_host() {
        assert_eq!(compute_machine_id(), compute_machine_id());
    }
}
