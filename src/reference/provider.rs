//! Time service catalogue.
//!
//! Order matters: the resolver asks each provider in turn and stops at the
//! first usable answer.

use serde::{Deserialize, Serialize};

/// Zone the DVR is expected to display, used by zone-aware services.
pub const DEFAULT_TIME_ZONE: &str = "America/Santiago";

/// How to read a date-time string that carries no UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NaiveZone {
    /// Wall-clock time of the zone the provider was asked for.
    ProviderLocal,
    Utc,
}

/// One time service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub url: String,
    pub naive_zone: NaiveZone,
}

/// Built-in providers, most trusted first.
pub fn default_providers(time_zone: &str) -> Vec<ProviderInfo> {
    vec![
        ProviderInfo {
            id: "worldtimeapi".to_string(),
            url: format!("https://worldtimeapi.org/api/timezone/{}", time_zone),
            naive_zone: NaiveZone::ProviderLocal,
        },
        ProviderInfo {
            id: "timeapi.io".to_string(),
            url: format!(
                "https://timeapi.io/api/Time/current/zone?timeZone={}",
                time_zone
            ),
            naive_zone: NaiveZone::ProviderLocal,
        },
        ProviderInfo {
            id: "timeapi.io-utc".to_string(),
            url: "https://www.timeapi.io/utc/now".to_string(),
            naive_zone: NaiveZone::Utc,
        },
    ]
}

/// Build a provider list from a comma-separated URL list.
///
/// Each provider is named after its host. Invalid URLs are skipped.
pub fn providers_from_urls(list: &str) -> Vec<ProviderInfo> {
    list.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .filter_map(|raw| match reqwest::Url::parse(raw) {
            Ok(url) => {
                let id = url.host_str().unwrap_or(raw).to_string();
                let naive_zone = if url.path().to_lowercase().contains("utc") {
                    NaiveZone::Utc
                } else {
                    NaiveZone::ProviderLocal
                };
                Some(ProviderInfo {
                    id,
                    url: raw.to_string(),
                    naive_zone,
                })
            }
            Err(e) => {
                log::warn!("[SETTINGS] Skipping invalid provider URL {:?}: {}", raw, e);
                None
            }
        })
        .collect()
}
