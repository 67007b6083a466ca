//! Collection and token metadata

use candid::{CandidType, Deserialize, Int, Nat};

/// A single token metadata value
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Nat(Nat),
    Int(Int),
    Text(String),
    Blob(Vec<u8>),
}

impl MetadataValue {
    /// Variant name as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataValue::Nat(_) => "Nat",
            MetadataValue::Int(_) => "Int",
            MetadataValue::Text(_) => "Text",
            MetadataValue::Blob(_) => "Blob",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Ordered `(key, value)` metadata attached to a token at mint time.
pub type TokenMetadata = Vec<(String, MetadataValue)>;

/// Collection-level metadata returned by `icrc7_collection_metadata`
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CollectionMetadata {
    /// Collection name
    pub name: String,

    /// Collection symbol
    pub symbol: String,

    /// Optional description
    pub description: Option<String>,

    /// Number of tokens currently minted
    #[serde(rename = "totalSupply")]
    pub total_supply: Nat,

    /// Optional collection image
    pub image: Option<String>,

    /// Maximum number of tokens, when the ledger enforces one
    #[serde(rename = "supplyCap")]
    pub supply_cap: Option<Nat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_kind() {
        assert_eq!(MetadataValue::Text("x".into()).kind(), "Text");
        assert_eq!(MetadataValue::Blob(vec![1]).kind(), "Blob");
        assert_eq!(MetadataValue::Nat(Nat::from(1u64)).kind(), "Nat");
        assert_eq!(MetadataValue::Text("x".into()).as_text(), Some("x"));
        assert_eq!(MetadataValue::Blob(vec![]).as_text(), None);
    }

    #[test]
    fn test_collection_metadata_decodes_camel_case_fields() {
        #[derive(CandidType)]
        #[allow(non_snake_case)]
        struct Wire {
            name: String,
            symbol: String,
            description: Option<String>,
            totalSupply: Nat,
            image: Option<String>,
        }

        let wire = Wire {
            name: "Collection".into(),
            symbol: "COL".into(),
            description: Some("test".into()),
            totalSupply: Nat::from(4u64),
            image: None,
        };
        let bytes = candid::encode_one(&wire).unwrap();
        let decoded: CollectionMetadata = candid::decode_one(&bytes).unwrap();

        assert_eq!(decoded.name, "Collection");
        assert_eq!(decoded.total_supply, Nat::from(4u64));
        assert_eq!(decoded.description.as_deref(), Some("test"));
        // Absent optional fields decode as None
        assert!(decoded.supply_cap.is_none());
    }
}
