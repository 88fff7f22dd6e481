//! Off-ledger agent metadata documents.
//!
//! The document schema is caller-defined beyond a few well-known fields;
//! `properties` is an open string-keyed map and is passed through without
//! validation.

use crate::error::BlobError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single display attribute, e.g. `{"trait_type": "category", "value": "trading"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: Value,
}

/// Metadata document pinned to the blob store and referenced by an agent
/// record's `metadata_uri`. Every field is optional; an empty document is
/// valid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentMetadataDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image URL, typically a gateway URL for a pinned file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,

    /// Open mapping of caller-defined properties
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, Value>,
}

impl AgentMetadataDocument {
    /// Decode raw blob bytes as a metadata document.
    pub fn decode(bytes: &[u8]) -> Result<Self, BlobError> {
        serde_json::from_slice(bytes).map_err(|e| BlobError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_document() {
        let body = br#"{
            "name": "Bot C",
            "description": "a trading agent",
            "image": "https://x/img2.png",
            "attributes": [{"trait_type": "category", "value": "trading"}],
            "properties": {"creator": "alice", "version": 2}
        }"#;
        let doc = AgentMetadataDocument::decode(body).unwrap();
        assert_eq!(doc.image.as_deref(), Some("https://x/img2.png"));
        assert_eq!(doc.attributes[0].trait_type, "category");
        assert_eq!(doc.properties["version"], serde_json::json!(2));
    }

    #[test]
    fn test_missing_fields_default() {
        let doc = AgentMetadataDocument::decode(b"{}").unwrap();
        assert!(doc.name.is_none());
        assert!(doc.image.is_none());
        assert!(doc.properties.is_empty());
    }

    #[test]
    fn test_unknown_top_level_fields_tolerated() {
        let doc = AgentMetadataDocument::decode(br#"{"image": "u", "external_url": "e"}"#).unwrap();
        assert_eq!(doc.image.as_deref(), Some("u"));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = AgentMetadataDocument::decode(b"<html>504</html>").unwrap_err();
        assert!(matches!(err, BlobError::Decode(_)));
    }
}
