//! Environment-driven configuration.
//!
//! Every value has a default; an invalid value is logged and ignored.
//!
//! | Variable                  | Default                                      |
//! |---------------------------|----------------------------------------------|
//! | `DVR_TIME_ZONE`           | `America/Santiago`                           |
//! | `DVR_TIME_PROVIDERS`      | built-in catalogue                           |
//! | `DVR_DATE_ORDER`          | `day-first`                                  |
//! | `DVR_PROVIDER_TIMEOUT_MS` | `5000`                                       |
//! | `DVR_OCR_TIMEOUT_MS`      | `30000`                                      |
//! | `DVR_HISTORY_FILE`        | `<config dir>/dvr-clock-check/history.json`  |

use crate::history::HistoryStore;
use crate::reference::provider::{default_providers, providers_from_urls, DEFAULT_TIME_ZONE};
use crate::reference::ProviderInfo;
use crate::timestamp::DateOrder;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_OCR_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub time_zone: String,
    pub providers: Vec<ProviderInfo>,
    pub date_order: DateOrder,
    pub provider_timeout: Duration,
    pub ocr_timeout: Duration,
    /// `None` keeps history in memory only.
    pub history_file: Option<PathBuf>,
}

/// Read every setting from the process environment.
pub fn resolve_settings() -> Settings {
    resolve_settings_with(|key| std::env::var(key).ok())
}

/// Same as [`resolve_settings`] with an injectable lookup.
pub fn resolve_settings_with(lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let time_zone = resolve_time_zone(lookup("DVR_TIME_ZONE"));
    let settings = Settings {
        providers: resolve_providers(lookup("DVR_TIME_PROVIDERS"), &time_zone),
        date_order: resolve_date_order(lookup("DVR_DATE_ORDER")),
        provider_timeout: resolve_millis(
            "DVR_PROVIDER_TIMEOUT_MS",
            lookup("DVR_PROVIDER_TIMEOUT_MS"),
            DEFAULT_PROVIDER_TIMEOUT_MS,
        ),
        ocr_timeout: resolve_millis(
            "DVR_OCR_TIMEOUT_MS",
            lookup("DVR_OCR_TIMEOUT_MS"),
            DEFAULT_OCR_TIMEOUT_MS,
        ),
        history_file: lookup("DVR_HISTORY_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .or_else(HistoryStore::default_path),
        time_zone,
    };
    log::info!(
        "[SETTINGS] zone={} providers={} order={:?} provider_timeout={}ms ocr_timeout={}ms",
        settings.time_zone,
        settings.providers.len(),
        settings.date_order,
        settings.provider_timeout.as_millis(),
        settings.ocr_timeout.as_millis()
    );
    settings
}

fn resolve_time_zone(value: Option<String>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(zone) if !zone.is_empty() => zone,
        _ => DEFAULT_TIME_ZONE.to_string(),
    }
}

/// An override that yields no usable URL falls back to the catalogue.
fn resolve_providers(value: Option<String>, time_zone: &str) -> Vec<ProviderInfo> {
    if let Some(list) = value.filter(|v| !v.trim().is_empty()) {
        let providers = providers_from_urls(&list);
        if !providers.is_empty() {
            log::info!("[SETTINGS] Provider override: {} entries", providers.len());
            return providers;
        }
        log::warn!("[SETTINGS] DVR_TIME_PROVIDERS has no valid URL, using defaults");
    }
    default_providers(time_zone)
}

fn resolve_date_order(value: Option<String>) -> DateOrder {
    let Some(value) = value else {
        return DateOrder::default();
    };
    value.parse().unwrap_or_else(|_| {
        log::warn!("[SETTINGS] Unknown DVR_DATE_ORDER {:?}, using day-first", value);
        DateOrder::default()
    })
}

fn resolve_millis(name: &str, value: Option<String>, default_ms: u64) -> Duration {
    let ms = match value {
        None => default_ms,
        Some(v) => match v.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => ms,
            _ => {
                log::warn!("[SETTINGS] Invalid {} {:?}, using {}ms", name, v, default_ms);
                default_ms
            }
        },
    };
    Duration::from_millis(ms)
}
