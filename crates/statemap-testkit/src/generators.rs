//! Proptest generators and random helpers.

use proptest::prelude::*;
use rand::distributions::Alphanumeric;
use rand::Rng;

use statemap_core::{Capability, CapabilitySet, Principal};

/// Generate an application key: printable, non-empty, never colliding with
/// the reserved singleton slots.
pub fn app_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9:_-]{0,31}".prop_filter("reserved key", |k| {
        k != "permissionRequest" && k != "lastGrantedUser" && k != "bootstrapPrincipal"
    })
}

/// Generate arbitrary value bytes.
pub fn value_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate raw identity bytes, including invalid UTF-8.
pub fn raw_identity() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=64)
}

/// Generate a principal from printable identity bytes.
pub fn principal() -> impl Strategy<Value = Principal> {
    "[a-zA-Z0-9=/+-]{4,40}".prop_map(|s| Principal::from(s.as_str()))
}

/// Generate a single capability.
pub fn capability() -> impl Strategy<Value = Capability> {
    prop_oneof![
        Just(Capability::Read),
        Just(Capability::Write),
        Just(Capability::Admin),
    ]
}

/// Generate any capability set, including empty.
pub fn capability_set() -> impl Strategy<Value = CapabilitySet> {
    prop::collection::vec(capability(), 0..=3).prop_map(|caps| {
        caps.into_iter()
            .fold(CapabilitySet::empty(), |set, cap| set.with(cap))
    })
}

/// A random alphanumeric key outside proptest, for ad-hoc fixtures.
pub fn random_key(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        /// Principals built from the same raw bytes are always equal, even
        /// when the bytes are invalid UTF-8.
        #[test]
        fn prop_normalization_is_deterministic(raw in raw_identity()) {
            prop_assert_eq!(Principal::from_raw(&raw), Principal::from_raw(&raw));
        }

        /// Generated app keys never shadow the reserved singleton slots.
        #[test]
        fn prop_app_keys_avoid_reserved_slots(key in app_key()) {
            prop_assert_ne!(key.as_str(), "permissionRequest");
            prop_assert_ne!(key.as_str(), "lastGrantedUser");
        }
    }

    #[test]
    fn test_random_key_has_requested_length() {
        assert_eq!(random_key(12).len(), 12);
    }
}
