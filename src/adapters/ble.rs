//! BLE advertising beacon adapter.
//!
//! Implements [`Beacon`] — a connectable-undirected advertiser whose only
//! job is to keep the BLE radio busy at a configurable interval while a
//! probe runs, exercising coexistence arbitration. No GATT services, no
//! connections are serviced.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid controller + GAP advertising via
//!   `esp_idf_svc::sys`. The stack is initialised once on first `start()`;
//!   later starts restart advertising with the new interval.
//! - **all other targets**: simulation stubs recording beacon state for
//!   host-side tests.

use log::info;

#[cfg(target_os = "espidf")]
use log::error;

use crate::ports::Beacon;

/// Advertised device name.
pub const DEVICE_NAME: &str = "ESP32-SpeedTest";

/// Minimum advertising interval in native 0.625 ms units (≈20 ms).
pub const ADV_INTERVAL_UNITS_MIN: u16 = 32;
/// Maximum advertising interval in native units (≈10.24 s).
pub const ADV_INTERVAL_UNITS_MAX: u16 = 16384;

/// Convert an advertising interval from milliseconds to the controller's
/// native 0.625 ms units, clamped to the controller's legal range.
///
/// Boundary contract: `0 → 32`, `20 → 32`, `10240 → 16384`, `20000 → 16384`.
pub fn adv_interval_units(interval_ms: u16) -> u16 {
    let units = (u32::from(interval_ms) * 1000) / 625;
    units.clamp(
        u32::from(ADV_INTERVAL_UNITS_MIN),
        u32::from(ADV_INTERVAL_UNITS_MAX),
    ) as u16
}

// ───────────────────────────────────────────────────────────────
// Beacon state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconState {
    Idle,
    Advertising,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// BLE beacon
// ───────────────────────────────────────────────────────────────

pub struct BleBeacon {
    state: BeaconState,
    /// Whether the host stack has been brought up (init happens once).
    initialized: bool,
    current_interval_ms: u16,
    #[cfg(not(target_os = "espidf"))]
    sim_start_count: u32,
}

impl Default for BleBeacon {
    fn default() -> Self {
        Self::new()
    }
}

impl BleBeacon {
    pub fn new() -> Self {
        Self {
            state: BeaconState::Idle,
            initialized: false,
            current_interval_ms: 100,
            #[cfg(not(target_os = "espidf"))]
            sim_start_count: 0,
        }
    }

    pub fn state(&self) -> BeaconState {
        self.state
    }

    /// Interval the beacon is (or was last) advertising at.
    pub fn current_interval_ms(&self) -> u16 {
        self.current_interval_ms
    }

    /// Number of advertising (re)starts issued (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_start_count(&self) -> u32 {
        self.sim_start_count
    }

    // ── Platform-specific ─────────────────────────────────────

    /// Bring up the Bluedroid stack. Called at most once.
    #[cfg(target_os = "espidf")]
    fn platform_init(&mut self) -> bool {
        use esp_idf_svc::sys::*;
        unsafe {
            // BLE-only: release classic BT controller memory.
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            let ret = esp_bt_controller_init(&mut bt_cfg);
            if ret != ESP_OK as i32 {
                error!("BLE: bt_controller_init failed ({ret})");
                return false;
            }
            let ret = esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE);
            if ret != ESP_OK as i32 {
                error!("BLE: bt_controller_enable failed ({ret})");
                return false;
            }
            let ret = esp_bluedroid_init();
            if ret != ESP_OK as i32 {
                error!("BLE: bluedroid_init failed ({ret})");
                return false;
            }
            let ret = esp_bluedroid_enable();
            if ret != ESP_OK as i32 {
                error!("BLE: bluedroid_enable failed ({ret})");
                return false;
            }

            // GAP expects a NUL-terminated C string.
            esp_ble_gap_set_device_name(c"ESP32-SpeedTest".as_ptr().cast());
        }
        true
    }

    #[cfg(target_os = "espidf")]
    fn platform_start_advertising(&mut self, interval_ms: u16) {
        use esp_idf_svc::sys::*;
        let units = adv_interval_units(interval_ms);
        unsafe {
            let mut adv_params = esp_ble_adv_params_t {
                adv_int_min: units,
                adv_int_max: units,
                adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
                own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_RANDOM,
                channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
                adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
                ..core::mem::zeroed()
            };
            esp_ble_gap_start_advertising(&mut adv_params);
        }
        info!("BLE advertising started (interval: {interval_ms} ms)");
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop_advertising(&mut self) {
        unsafe {
            esp_idf_svc::sys::esp_ble_gap_stop_advertising();
        }
        info!("BLE advertising stopped");
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_init(&mut self) -> bool {
        info!("BLE(sim): stack initialised as '{DEVICE_NAME}'");
        true
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start_advertising(&mut self, interval_ms: u16) {
        self.sim_start_count += 1;
        info!(
            "BLE(sim): advertising at {} ms ({} units)",
            interval_ms,
            adv_interval_units(interval_ms)
        );
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop_advertising(&mut self) {
        info!("BLE(sim): advertising stopped");
    }
}

// ───────────────────────────────────────────────────────────────
// Beacon implementation
// ───────────────────────────────────────────────────────────────

impl Beacon for BleBeacon {
    fn start(&mut self, interval_ms: u16) {
        self.current_interval_ms = interval_ms;

        if self.initialized {
            // Already up: restart advertising with the new interval.
            if self.state == BeaconState::Advertising {
                self.platform_stop_advertising();
                self.state = BeaconState::Idle;
            }
            self.platform_start_advertising(interval_ms);
            self.state = BeaconState::Advertising;
            return;
        }

        info!("Initializing BLE stack...");
        if !self.platform_init() {
            self.state = BeaconState::Failed;
            return;
        }
        self.initialized = true;
        self.platform_start_advertising(interval_ms);
        self.state = BeaconState::Advertising;
    }

    fn stop(&mut self) {
        if self.state == BeaconState::Advertising {
            self.platform_stop_advertising();
            self.state = BeaconState::Idle;
        }
    }

    fn is_advertising(&self) -> bool {
        self.state == BeaconState::Advertising
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Interval conversion (boundary contract) ───────────────

    #[test]
    fn interval_clamps_at_lower_bound() {
        assert_eq!(adv_interval_units(0), 32);
        assert_eq!(adv_interval_units(10), 32);
        assert_eq!(adv_interval_units(20), 32);
    }

    #[test]
    fn interval_clamps_at_upper_bound() {
        assert_eq!(adv_interval_units(10240), 16384);
        assert_eq!(adv_interval_units(20000), 16384);
        assert_eq!(adv_interval_units(u16::MAX), 16384);
    }

    #[test]
    fn interval_converts_in_range() {
        // 100 ms / 0.625 ms = 160 units
        assert_eq!(adv_interval_units(100), 160);
        assert_eq!(adv_interval_units(25), 40);
        assert_eq!(adv_interval_units(1000), 1600);
    }

    #[test]
    fn interval_is_monotonic() {
        let mut prev = adv_interval_units(0);
        for ms in (0..=20000u16).step_by(25) {
            let cur = adv_interval_units(ms);
            assert!(cur >= prev, "non-monotonic at {ms} ms");
            prev = cur;
        }
    }

    // ── Beacon lifecycle ──────────────────────────────────────

    #[test]
    fn start_stop_lifecycle() {
        let mut b = BleBeacon::new();
        assert_eq!(b.state(), BeaconState::Idle);
        assert!(!b.is_advertising());
        b.start(100);
        assert_eq!(b.state(), BeaconState::Advertising);
        assert!(b.is_advertising());
        b.stop();
        assert_eq!(b.state(), BeaconState::Idle);
    }

    #[test]
    fn restart_with_new_interval_reuses_stack() {
        let mut b = BleBeacon::new();
        b.start(100);
        assert_eq!(b.current_interval_ms(), 100);
        b.start(250);
        assert_eq!(b.current_interval_ms(), 250);
        assert!(b.is_advertising());
        // Two advertising starts, one stack init.
        assert_eq!(b.sim_start_count(), 2);
    }

    #[test]
    fn stop_when_idle_is_a_noop() {
        let mut b = BleBeacon::new();
        b.stop();
        assert_eq!(b.state(), BeaconState::Idle);
    }

    #[test]
    fn stop_after_suite_leaves_interval_readable() {
        let mut b = BleBeacon::new();
        b.start(50);
        b.stop();
        assert_eq!(b.current_interval_ms(), 50);
    }
}
