//! Deterministic account address derivation.
//!
//! Addresses are pure functions of the owning program's identity, a
//! namespace tag, and an optional record index. No network access is
//! involved. Distinct (program, tag, index) triples never collide because
//! every component is fed through a single domain-separated hash with
//! unambiguous framing.

use crate::types::{Address, ProgramId};

/// Namespace tag for the registry singleton
pub const REGISTRY_TAG: &str = "registry";

/// Namespace tag for per-agent record accounts
pub const AGENT_TAG: &str = "agent";

/// Derive the address for (program, tag, index).
///
/// Framing: `tag_len || tag || presence_byte || index_le || program_id`.
/// The length prefix and presence byte keep `("agent", None)` and
/// `("agen", Some(t..))`-style ambiguities impossible. The index is
/// little-endian, matching the on-ledger seed layout.
pub fn derive(program: &ProgramId, tag: &str, index: Option<u64>) -> Address {
    let mut hasher = blake3::Hasher::new_derive_key("agentdir account address v1");
    hasher.update(&(tag.len() as u64).to_le_bytes());
    hasher.update(tag.as_bytes());
    match index {
        Some(i) => {
            hasher.update(&[1u8]);
            hasher.update(&i.to_le_bytes());
        }
        None => {
            hasher.update(&[0u8]);
        }
    }
    hasher.update(program.as_bytes());
    Address(*hasher.finalize().as_bytes())
}

/// Address of the registry singleton for a program
pub fn registry_address(program: &ProgramId) -> Address {
    derive(program, REGISTRY_TAG, None)
}

/// Address of the agent record registered at `index`
pub fn agent_record_address(program: &ProgramId, index: u64) -> Address {
    derive(program, AGENT_TAG, Some(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PROGRAM: ProgramId = ProgramId([7u8; 32]);

    #[test]
    fn test_derivation_is_deterministic() {
        assert_eq!(
            agent_record_address(&PROGRAM, 42),
            agent_record_address(&PROGRAM, 42)
        );
        assert_eq!(registry_address(&PROGRAM), registry_address(&PROGRAM));
    }

    #[test]
    fn test_distinct_indices_distinct_addresses() {
        assert_ne!(
            agent_record_address(&PROGRAM, 0),
            agent_record_address(&PROGRAM, 1)
        );
    }

    #[test]
    fn test_registry_distinct_from_index_zero() {
        assert_ne!(registry_address(&PROGRAM), agent_record_address(&PROGRAM, 0));
    }

    #[test]
    fn test_programs_do_not_share_address_space() {
        let other = ProgramId([8u8; 32]);
        assert_ne!(
            agent_record_address(&PROGRAM, 0),
            agent_record_address(&other, 0)
        );
        assert_ne!(registry_address(&PROGRAM), registry_address(&other));
    }

    #[test]
    fn test_tag_framing_is_unambiguous() {
        // A tag that swallows the presence byte must not alias an
        // indexed derivation of a shorter tag.
        let a = derive(&PROGRAM, "agent", Some(0));
        let b = derive(&PROGRAM, "agent\u{1}", None);
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_no_index_collisions(a in any::<u64>(), b in any::<u64>()) {
            prop_assume!(a != b);
            prop_assert_ne!(
                agent_record_address(&PROGRAM, a),
                agent_record_address(&PROGRAM, b)
            );
        }

        #[test]
        fn prop_program_salts_every_index(seed in any::<[u8; 32]>(), idx in any::<u64>()) {
            prop_assume!(seed != [7u8; 32]);
            let other = ProgramId(seed);
            prop_assert_ne!(
                agent_record_address(&PROGRAM, idx),
                agent_record_address(&other, idx)
            );
        }
    }
}
