//! On-ledger account schemas and their binary codec.
//!
//! Accounts carry an 8-byte discriminator identifying the account kind,
//! followed by a bincode-encoded body. Decoding is strict: wrong
//! discriminator or truncation fails. The external
//! program owns these accounts; this crate only ever decodes them (encode
//! exists for fixtures and write-side tooling against local ledgers).

use crate::error::LedgerError;
use crate::types::Address;
use serde::{Deserialize, Serialize};

/// Account discriminator: first 8 bytes of a domain-separated hash of the
/// account kind name.
pub fn discriminator(kind: &str) -> [u8; 8] {
    let hash = blake3::Hasher::new_derive_key("agentdir account kind v1")
        .update(kind.as_bytes())
        .finalize();
    let mut tag = [0u8; 8];
    tag.copy_from_slice(&hash.as_bytes()[..8]);
    tag
}

/// Registry singleton: tracks how many agents have ever registered.
/// `agent_count` is incremented by the external program on each
/// registration and is authoritative for how many indices to probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub authority: Address,
    pub agent_count: u64,
}

/// One registered agent's on-ledger record. Created once at registration;
/// mutated only by the external program's stake/feedback instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent_id: u64,
    pub name: String,
    pub description: String,
    /// Blob reference for the off-ledger metadata document; may be empty
    pub metadata_uri: String,
    pub owner: Address,
    pub total_staked: u64,
    pub reputation_score: i64,
    pub feedback_count: u64,
    pub is_active: bool,
    /// Unix timestamp (seconds) of registration
    pub created_at: i64,
}

const REGISTRY_KIND: &str = "Registry";
const AGENT_RECORD_KIND: &str = "AgentRecord";

fn decode_account<T: for<'de> Deserialize<'de>>(kind: &str, bytes: &[u8]) -> Result<T, LedgerError> {
    let tag = discriminator(kind);
    if bytes.len() < 8 {
        return Err(LedgerError::Decode(format!(
            "{} account too short: {} bytes",
            kind,
            bytes.len()
        )));
    }
    if bytes[..8] != tag {
        return Err(LedgerError::Decode(format!(
            "not a {} account (discriminator mismatch)",
            kind
        )));
    }
    bincode::deserialize(&bytes[8..])
        .map_err(|e| LedgerError::Decode(format!("{} body: {}", kind, e)))
}

fn encode_account<T: Serialize>(kind: &str, value: &T) -> Vec<u8> {
    let mut out = discriminator(kind).to_vec();
    // bincode serialization of these schemas cannot fail
    out.extend(bincode::serialize(value).unwrap_or_default());
    out
}

impl Registry {
    pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        decode_account(REGISTRY_KIND, bytes)
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_account(REGISTRY_KIND, self)
    }
}

impl AgentRecord {
    pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        decode_account(AGENT_RECORD_KIND, bytes)
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_account(AGENT_RECORD_KIND, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(index: u64) -> AgentRecord {
        AgentRecord {
            agent_id: index,
            name: format!("agent-{}", index),
            description: "test agent".to_string(),
            metadata_uri: String::new(),
            owner: Address([3u8; 32]),
            total_staked: 100,
            reputation_score: 0,
            feedback_count: 0,
            is_active: true,
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_registry_codec() {
        let registry = Registry {
            authority: Address([1u8; 32]),
            agent_count: 7,
        };
        let decoded = Registry::decode(&registry.encode()).unwrap();
        assert_eq!(decoded, registry);
    }

    #[test]
    fn test_discriminator_mismatch_is_decode_error() {
        let record = sample_record(0);
        let err = Registry::decode(&record.encode()).unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[test]
    fn test_truncated_account_is_decode_error() {
        let bytes = sample_record(0).encode();
        let err = AgentRecord::decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[test]
    fn test_short_buffer_is_decode_error() {
        let err = Registry::decode(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[test]
    fn test_discriminators_differ_per_kind() {
        assert_ne!(discriminator("Registry"), discriminator("AgentRecord"));
    }
}
