//! Endpoint descriptor as read from the catalog

use serde::{Deserialize, Serialize};

/// One RPC endpoint under test.
///
/// Field names follow the catalog file (`rpcn`, `type`, `network`,
/// `address`); the plainer names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Unique identity, e.g. a provider and location
    #[serde(rename = "rpcn", alias = "name")]
    pub name: String,

    /// Category tags, possibly several joined together ("distributed+secured")
    #[serde(rename = "type", alias = "category")]
    pub category: String,

    /// Network the endpoint serves
    #[serde(default)]
    pub network: String,

    /// URI the probe is POSTed to
    #[serde(rename = "address", alias = "target")]
    pub target: String,
}

impl EndpointDescriptor {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        network: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            network: network.into(),
            target: target.into(),
        }
    }

    /// Substring match against the category tag field
    pub fn has_tag(&self, tag: &str) -> bool {
        self.category.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_field_names() {
        let json = r#"{
            "rpcn": "frankfurt",
            "type": "centralized",
            "network": "mainnet-beta",
            "address": "https://fra.example.net"
        }"#;

        let endpoint: EndpointDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(endpoint.name, "frankfurt");
        assert_eq!(endpoint.category, "centralized");
        assert_eq!(endpoint.network, "mainnet-beta");
        assert_eq!(endpoint.target, "https://fra.example.net");
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{"name": "anycast", "category": "distributed", "target": "https://rpc.example.net"}"#;

        let endpoint: EndpointDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(endpoint.name, "anycast");
        assert!(endpoint.network.is_empty());
    }

    #[test]
    fn test_tag_matching_is_substring_based() {
        let endpoint = EndpointDescriptor::new("waf", "distributed+secured", "mainnet", "https://x");
        assert!(endpoint.has_tag("distributed"));
        assert!(endpoint.has_tag("secured"));
        assert!(!endpoint.has_tag("centralized"));
    }
}
