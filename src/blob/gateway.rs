//! Gateway URL helpers.
//!
//! Pinned content is addressed by CID; gateways expose it at
//! `<gateway>/<cid>`. These helpers shape URLs in both directions.

/// Default public gateway base (no trailing slash)
pub const DEFAULT_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs";

/// Build a gateway URL for a CID.
pub fn gateway_url(gateway_base: &str, cid: &str) -> String {
    format!("{}/{}", gateway_base.trim_end_matches('/'), cid)
}

/// Extract the CID from a gateway URL, if it has the `/ipfs/<cid>` shape.
pub fn extract_cid(url: &str) -> Option<&str> {
    let rest = url.split("/ipfs/").nth(1)?;
    let cid = rest.split(['/', '?', '#']).next()?;
    if !cid.is_empty() && cid.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(cid)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_url_joins_cid() {
        assert_eq!(
            gateway_url(DEFAULT_GATEWAY, "QmAbc123"),
            "https://gateway.pinata.cloud/ipfs/QmAbc123"
        );
        // trailing slash on the base is tolerated
        assert_eq!(gateway_url("https://g/ipfs/", "Qm1"), "https://g/ipfs/Qm1");
    }

    #[test]
    fn test_extract_cid_from_gateway_url() {
        let url = gateway_url(DEFAULT_GATEWAY, "QmAbc123");
        assert_eq!(extract_cid(&url), Some("QmAbc123"));
    }

    #[test]
    fn test_extract_cid_ignores_suffix() {
        assert_eq!(
            extract_cid("https://g/ipfs/QmAbc123?filename=meta.json"),
            Some("QmAbc123")
        );
    }

    #[test]
    fn test_extract_cid_rejects_non_gateway_urls() {
        assert_eq!(extract_cid("https://example.com/meta.json"), None);
        assert_eq!(extract_cid("https://g/ipfs/"), None);
    }
}
