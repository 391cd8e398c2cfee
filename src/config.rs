//! Benchmark configuration.
//!
//! The suite is a fixed, ordered list of [`TestConfig`] entries created at
//! compile time and never mutated. Build-time knobs (target URL, WiFi
//! credentials, regulatory country) come from environment variables at
//! compile time, with defaults suitable for bench use.

/// TLS protocol version requested for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVersion {
    V1_2,
    V1_3,
}

impl TlsVersion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
        }
    }
}

/// How the radio subsystem arbitrates airtime between WiFi and BLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoexPreference {
    Wifi,
    Bt,
    Balanced,
}

impl CoexPreference {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wifi => "WiFi",
            Self::Bt => "BT",
            Self::Balanced => "Balance",
        }
    }
}

/// One immutable benchmark configuration.
#[derive(Debug, Clone, Copy)]
pub struct TestConfig {
    pub name: &'static str,
    pub tls_version: TlsVersion,
    pub ble_enabled: bool,
    pub wifi_ps_enabled: bool,
    pub coex_pref: CoexPreference,
    /// BLE advertising interval in milliseconds (ignored when BLE is off).
    pub ble_adv_interval_ms: u16,
}

/// The fixed suite, in declaration order: a WiFi-only baseline followed by
/// the BLE coexistence case.
pub const SUITE: &[TestConfig] = &[
    TestConfig {
        name: "WiFi only",
        tls_version: TlsVersion::V1_2,
        ble_enabled: false,
        wifi_ps_enabled: false,
        coex_pref: CoexPreference::Balanced,
        ble_adv_interval_ms: 0,
    },
    TestConfig {
        name: "BLE coex",
        tls_version: TlsVersion::V1_2,
        ble_enabled: true,
        wifi_ps_enabled: false,
        coex_pref: CoexPreference::Balanced,
        ble_adv_interval_ms: 100,
    },
];

// ── Build-time knobs ──────────────────────────────────────────
//
// Override with e.g. `SPEEDTEST_URL=https://… cargo build --features espidf`.

pub const DEFAULT_URL: &str = match option_env!("SPEEDTEST_URL") {
    Some(url) => url,
    None => "https://speed.cloudflare.com/__down?bytes=10000000",
};

pub const WIFI_SSID: &str = match option_env!("SPEEDTEST_WIFI_SSID") {
    Some(s) => s,
    None => "coexbench",
};

pub const WIFI_PASSWORD: &str = match option_env!("SPEEDTEST_WIFI_PASSWORD") {
    Some(s) => s,
    None => "",
};

/// Two-letter regulatory country code, applied before WiFi start.
pub const WIFI_COUNTRY: &str = match option_env!("SPEEDTEST_WIFI_COUNTRY") {
    Some(s) => s,
    None => "01",
};

/// HTTP User-Agent sent with every probe request.
pub const USER_AGENT: &str = "coexbench/0.1 esp32";

/// Runner timing and retry parameters.
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Pause after applying a radio configuration, before probing.
    pub settle_delay_ms: u32,
    /// Pause between consecutive tests (not after the last).
    pub inter_test_delay_ms: u32,
    /// Bounded retry policy for SNTP time sync.
    pub sntp_retry: crate::retry::RetryPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            inter_test_delay_ms: 3000,
            sntp_retry: crate::retry::RetryPolicy {
                max_attempts: 2,
                backoff_ms: 0,
            },
        }
    }
}
