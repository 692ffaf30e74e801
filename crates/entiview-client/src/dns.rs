//! DNS resolution with a literal-address fallback
//!
//! Hosts listed in the fallback table are first resolved through the system
//! resolver. Only when that fails or yields nothing are the configured
//! addresses used. Unlisted hosts behave exactly like system resolution.

use crate::config::DnsFallback;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Resolver plugged into the HTTP client
#[derive(Debug, Clone, Default)]
pub struct FallbackResolver {
    table: Arc<HashMap<String, Vec<IpAddr>>>,
}

impl FallbackResolver {
    /// Build from configuration entries
    #[must_use]
    pub fn new(entries: &[DnsFallback]) -> Self {
        let table = entries
            .iter()
            .filter(|entry| !entry.addrs.is_empty())
            .map(|entry| (entry.host.to_ascii_lowercase(), entry.addrs.clone()))
            .collect();
        Self {
            table: Arc::new(table),
        }
    }

    /// Fallback addresses for `host`, if any
    #[must_use]
    pub fn fallback_for(&self, host: &str) -> Option<&[IpAddr]> {
        self.table
            .get(&host.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// Resolve `host`, falling back to the table on failure
    ///
    /// Ports are left at zero; the connector applies the URL's port.
    ///
    /// # Errors
    /// The system resolver's error when `host` has no fallback entry.
    pub async fn lookup(&self, host: &str) -> io::Result<Vec<SocketAddr>> {
        let system = tokio::net::lookup_host((host, 0))
            .await
            .map(Iterator::collect::<Vec<_>>);

        match system {
            Ok(addrs) if !addrs.is_empty() => Ok(addrs),
            outcome => {
                let Some(fallback) = self.fallback_for(host) else {
                    return match outcome {
                        Err(err) => Err(err),
                        Ok(_) => Err(io::Error::new(
                            io::ErrorKind::NotFound,
                            format!("no addresses for {host}"),
                        )),
                    };
                };
                if let Err(err) = &outcome {
                    tracing::warn!(%host, error = %err, "system DNS failed, using fallback addresses");
                } else {
                    tracing::warn!(%host, "system DNS returned nothing, using fallback addresses");
                }
                Ok(fallback.iter().map(|ip| SocketAddr::new(*ip, 0)).collect())
            }
        }
    }
}

impl Resolve for FallbackResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let addrs = resolver.lookup(name.as_str()).await?;
            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok(addrs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn resolver() -> FallbackResolver {
        FallbackResolver::new(&[
            DnsFallback::new("Fallback.Invalid", vec![IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3))]),
            DnsFallback::new("empty.invalid", vec![]),
        ])
    }

    #[test]
    fn table_lookup_ignores_case_and_empty_entries() {
        let resolver = resolver();
        assert_eq!(resolver.fallback_for("fallback.invalid").map(<[IpAddr]>::len), Some(1));
        assert!(resolver.fallback_for("empty.invalid").is_none());
        assert!(resolver.fallback_for("other.invalid").is_none());
    }

    #[tokio::test]
    async fn unresolvable_listed_host_uses_fallback() {
        let addrs = resolver().lookup("fallback.invalid").await.unwrap();
        assert_eq!(addrs, vec![SocketAddr::from(([10, 1, 2, 3], 0))]);
    }

    #[tokio::test]
    async fn unresolvable_unlisted_host_fails() {
        assert!(resolver().lookup("other.invalid").await.is_err());
    }

    #[tokio::test]
    async fn resolvable_host_uses_system_answer() {
        let addrs = resolver().lookup("localhost").await.unwrap();
        assert!(addrs.iter().all(|addr| addr.ip().is_loopback()));
    }
}
