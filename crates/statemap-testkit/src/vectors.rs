//! Golden wire vectors.
//!
//! The namespace written by this engine must stay readable by external
//! consumers that predate it: the capability wire encoding and the
//! composite-key layout are fixed formats. These vectors pin them.

use statemap_core::CapabilitySet;

/// A golden wire-encoding vector.
#[derive(Debug, Clone)]
pub struct WireVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The capability set under test.
    pub set: CapabilitySet,
    /// Expected namespace bytes.
    pub expected: &'static str,
}

/// All capability-set wire vectors.
pub fn capability_vectors() -> Vec<WireVector> {
    vec![
        WireVector {
            name: "bootstrap grant",
            set: CapabilitySet::all(),
            expected: "['read','write','admin']",
        },
        WireVector {
            name: "read-write approval",
            set: CapabilitySet::read_write(),
            expected: "['read','write']",
        },
        WireVector {
            name: "read-only approval",
            set: CapabilitySet::read_only(),
            expected: "['read']",
        },
    ]
}

/// Composite-key layout vectors: (index, parts, expected key).
pub fn composite_key_vectors() -> Vec<(&'static str, Vec<&'static str>, &'static str)> {
    vec![
        ("compositeKeyTest", vec!["mykey"], "\u{0}compositeKeyTest\u{0}mykey\u{0}"),
        ("compositeKeyTest", vec![], "\u{0}compositeKeyTest\u{0}"),
        ("idx", vec!["a", "b"], "\u{0}idx\u{0}a\u{0}b\u{0}"),
    ]
}
