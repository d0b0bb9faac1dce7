use std::sync::Arc;

use ens_client::EnsClient;

use crate::traits::NameResolver;

/// Whether name candidates can be turned into addresses in this run.
#[derive(Clone)]
pub enum Resolution {
    WithResolution(Arc<dyn NameResolver>),
    NoResolution,
}

/// Result of looking up one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLookup {
    Found(String),
    /// Not registered, or the lookup failed. Failures are logged, never raised.
    Miss,
    /// No resolver configured.
    Skipped,
}

impl Resolution {
    /// Build from an optional JSON-RPC endpoint.
    pub fn from_endpoint(rpc_url: Option<&str>) -> Self {
        match rpc_url {
            Some(url) => Resolution::WithResolution(Arc::new(EnsClient::new(url))),
            None => Resolution::NoResolution,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Resolution::WithResolution(_))
    }

    /// Look up `name`, lower-casing it first. ENS labels are hashed byte-wise,
    /// so `Vitalik.ETH` only resolves once normalized.
    pub async fn lookup(&self, name: &str) -> NameLookup {
        let Resolution::WithResolution(resolver) = self else {
            tracing::debug!(name, "No resolution endpoint, dropping name");
            return NameLookup::Skipped;
        };

        let normalized = name.to_lowercase();
        match resolver.resolve(&normalized).await {
            Ok(Some(address)) => {
                tracing::debug!(name = normalized.as_str(), address = address.as_str(), "Name resolved");
                NameLookup::Found(address)
            }
            Ok(None) => {
                tracing::info!(name = normalized.as_str(), "Name has no address record");
                NameLookup::Miss
            }
            Err(e) => {
                tracing::warn!(name = normalized.as_str(), error = %e, "Name resolution failed");
                NameLookup::Miss
            }
        }
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::WithResolution(_) => f.write_str("WithResolution"),
            Resolution::NoResolution => f.write_str("NoResolution"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockResolver;

    #[tokio::test]
    async fn no_resolution_skips_without_calling() {
        let resolution = Resolution::NoResolution;
        assert_eq!(resolution.lookup("vitalik.eth").await, NameLookup::Skipped);
        assert!(!resolution.is_enabled());
    }

    #[tokio::test]
    async fn name_is_lowercased_before_lookup() {
        let resolver = Arc::new(
            MockResolver::new().on_name("vitalik.eth", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
        );
        let resolution = Resolution::WithResolution(resolver.clone());

        let got = resolution.lookup("Vitalik.ETH").await;

        assert_eq!(
            got,
            NameLookup::Found("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into())
        );
        assert_eq!(resolver.calls(), vec!["vitalik.eth".to_string()]);
    }

    #[tokio::test]
    async fn resolver_error_is_a_miss() {
        let resolver = Arc::new(MockResolver::new().failing_on("broken.eth"));
        let resolution = Resolution::WithResolution(resolver);

        assert_eq!(resolution.lookup("broken.eth").await, NameLookup::Miss);
    }

    #[tokio::test]
    async fn unknown_name_is_a_miss() {
        let resolution = Resolution::WithResolution(Arc::new(MockResolver::new()));
        assert_eq!(resolution.lookup("nobody.eth").await, NameLookup::Miss);
    }

    #[test]
    fn endpoint_presence_selects_variant() {
        assert!(Resolution::from_endpoint(Some("http://localhost:8545")).is_enabled());
        assert!(!Resolution::from_endpoint(None).is_enabled());
    }
}
