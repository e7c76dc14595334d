//! Sequential reference-time resolution with local-clock fallback.

use super::http::{HttpTimeProvider, TimeProvider};
use super::provider::ProviderInfo;
use super::ReferenceTime;
use chrono::Local;
use std::time::Duration;

/// A provider that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub reference: ReferenceTime,
    pub failures: Vec<ProviderFailure>,
}

impl Resolution {
    /// Every provider failed and the device clock was used.
    pub fn is_degraded(&self) -> bool {
        self.reference.is_local_fallback()
    }
}

/// Asks each provider in order; the first usable answer wins.
///
/// Providers are awaited one at a time. A failed provider is skipped, never
/// retried, so the worst case is `providers × per-request timeout`.
pub struct ReferenceTimeResolver {
    providers: Vec<Box<dyn TimeProvider>>,
}

impl ReferenceTimeResolver {
    pub fn new(providers: Vec<Box<dyn TimeProvider>>) -> Self {
        Self { providers }
    }

    /// HTTP providers for a catalogue, sharing one client.
    pub fn from_catalogue(catalogue: &[ProviderInfo], timeout: Duration) -> Self {
        let client = reqwest::Client::new();
        let providers = catalogue
            .iter()
            .cloned()
            .map(|info| {
                Box::new(HttpTimeProvider::with_client(info, client.clone(), timeout))
                    as Box<dyn TimeProvider>
            })
            .collect();
        Self::new(providers)
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Never fails; degrades to the local clock.
    pub async fn resolve(&self) -> ReferenceTime {
        self.resolve_detailed().await.reference
    }

    pub async fn resolve_detailed(&self) -> Resolution {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let start = std::time::Instant::now();
            match provider.fetch().await {
                Ok(at) => {
                    log::info!(
                        "[TIME] {} answered {} in {}ms",
                        provider.id(),
                        at,
                        start.elapsed().as_millis()
                    );
                    return Resolution {
                        reference: ReferenceTime::from_datetime(at, provider.id()),
                        failures,
                    };
                }
                Err(e) => {
                    log::warn!(
                        "[TIME] {} failed after {}ms: {}",
                        provider.id(),
                        start.elapsed().as_millis(),
                        e
                    );
                    failures.push(ProviderFailure {
                        provider: provider.id().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        log::warn!(
            "[TIME] All {} providers failed, using local device clock",
            self.providers.len()
        );
        Resolution {
            reference: ReferenceTime::local_fallback(Local::now().naive_local()),
            failures,
        }
    }
}
