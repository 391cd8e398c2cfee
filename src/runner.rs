//! Suite runner: configuration applier, test loop and summary reporter.
//!
//! The runner owns the results collection and composes the applier and the
//! prober sequentially for each entry of the fixed suite. No component runs
//! concurrently with another; everything happens on the single worker task.

use log::info;

use crate::config::{RunnerConfig, TestConfig};
use crate::ports::{Beacon, Clock, Delay, HeapStats, ProbeConnector, RadioControl};
use crate::probe::{run_probe, TestResult};
use crate::request::HttpRequest;

/// Bounded capacity of the results collection.
pub const MAX_RESULTS: usize = 16;

// ───────────────────────────────────────────────────────────────
// Configuration applier
// ───────────────────────────────────────────────────────────────

/// Apply one test configuration to the radios.
///
/// Ordered side effects: power-save mode, then beacon state (start at the
/// configured interval + coexistence preference, or stop), then a settle
/// delay so the driver can absorb the changes. Radio failures are handled
/// inside the adapters (logged, latched); nothing is returned here.
pub fn apply_config(
    cfg: &TestConfig,
    radio: &mut impl RadioControl,
    beacon: &mut impl Beacon,
    delay: &impl Delay,
    settle_delay_ms: u32,
) {
    info!("Applying config: {}", cfg.name);

    radio.set_power_save(cfg.wifi_ps_enabled);
    info!(
        "  WiFi PS: {}",
        if cfg.wifi_ps_enabled { "enabled" } else { "disabled" }
    );

    if cfg.ble_enabled {
        beacon.start(cfg.ble_adv_interval_ms);
        radio.set_coex_preference(cfg.coex_pref);
        info!("  Coex preference: {}", cfg.coex_pref.as_str());
        info!("  BLE adv interval: {} ms", cfg.ble_adv_interval_ms);
    } else {
        beacon.stop();
    }

    info!("  TLS version: {}", cfg.tls_version.as_str());

    delay.delay_ms(settle_delay_ms);
}

// ───────────────────────────────────────────────────────────────
// Suite runner
// ───────────────────────────────────────────────────────────────

/// Run the whole suite and return the ordered results.
///
/// One [`TestResult`] per configuration, in declaration order, up to
/// [`MAX_RESULTS`]. The beacon is stopped before returning regardless of
/// the final configuration.
#[allow(clippy::too_many_arguments)]
pub fn run_suite<C, K>(
    suite: &[TestConfig],
    runner_cfg: &RunnerConfig,
    request: &HttpRequest,
    radio: &mut impl RadioControl,
    beacon: &mut impl Beacon,
    connector: &mut C,
    clock: &K,
    delay: &impl Delay,
) -> heapless::Vec<TestResult, MAX_RESULTS>
where
    C: ProbeConnector,
    K: Clock,
{
    info!("Starting speed test suite ({} tests)", suite.len());

    let mut results: heapless::Vec<TestResult, MAX_RESULTS> = heapless::Vec::new();
    for (i, cfg) in suite.iter().enumerate() {
        if results.is_full() {
            break;
        }
        apply_config(cfg, radio, beacon, delay, runner_cfg.settle_delay_ms);
        let result = run_probe(cfg, request, connector, clock);
        // Capacity checked above.
        let _ = results.push(result);

        if i < suite.len() - 1 {
            info!("Waiting before next test...");
            delay.delay_ms(runner_cfg.inter_test_delay_ms);
        }
    }

    // Leave the BLE radio quiet once the suite is done.
    beacon.stop();
    results
}

// ───────────────────────────────────────────────────────────────
// Reporter
// ───────────────────────────────────────────────────────────────

/// Render the fixed-width summary table.
///
/// Pure function over the results so host tests can assert on the exact
/// rows; the caller logs the returned lines.
pub fn render_summary(results: &[TestResult], min_free_heap: u32) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "========================================");
    let _ = writeln!(out, "           TEST SUMMARY");
    let _ = writeln!(out, "========================================");
    let _ = writeln!(out, "{:<30} {:>10} {:>10}", "Test", "Mbit/s", "Status");
    let _ = writeln!(out, "----------------------------------------");
    for r in results {
        if r.success {
            let _ = writeln!(out, "{:<30} {:>10.2} {:>10}", r.name, r.speed_mbps, "OK");
        } else {
            let _ = writeln!(out, "{:<30} {:>10} {:>10}", r.name, "-", "FAIL");
        }
    }
    let _ = writeln!(out, "========================================");
    let _ = writeln!(out, "Minimum free heap: {min_free_heap} bytes");
    out
}

/// Log the summary table line by line.
pub fn report(results: &[TestResult], heap: &impl HeapStats) {
    info!("");
    for line in render_summary(results, heap.min_free_bytes()).lines() {
        info!("{line}");
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoexPreference, TlsVersion};
    use core::cell::RefCell;

    // ── Recording mock ports ──────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        PowerSave(bool),
        CoexPref(CoexPreference),
        BeaconStart(u16),
        BeaconStop,
        Delay(u32),
    }

    #[derive(Default)]
    struct CallLog(std::rc::Rc<RefCell<Vec<Call>>>);

    struct MockRadio(std::rc::Rc<RefCell<Vec<Call>>>);
    struct MockBeacon {
        calls: std::rc::Rc<RefCell<Vec<Call>>>,
        advertising: bool,
    }
    struct MockDelay(std::rc::Rc<RefCell<Vec<Call>>>);

    impl RadioControl for MockRadio {
        fn set_power_save(&mut self, enabled: bool) {
            self.0.borrow_mut().push(Call::PowerSave(enabled));
        }
        fn set_coex_preference(&mut self, pref: CoexPreference) {
            self.0.borrow_mut().push(Call::CoexPref(pref));
        }
    }

    impl Beacon for MockBeacon {
        fn start(&mut self, interval_ms: u16) {
            self.calls.borrow_mut().push(Call::BeaconStart(interval_ms));
            self.advertising = true;
        }
        fn stop(&mut self) {
            self.calls.borrow_mut().push(Call::BeaconStop);
            self.advertising = false;
        }
        fn is_advertising(&self) -> bool {
            self.advertising
        }
    }

    impl Delay for MockDelay {
        fn delay_ms(&self, ms: u32) {
            self.0.borrow_mut().push(Call::Delay(ms));
        }
    }

    fn rig() -> (CallLog, MockRadio, MockBeacon, MockDelay) {
        let log = CallLog::default();
        let radio = MockRadio(log.0.clone());
        let beacon = MockBeacon {
            calls: log.0.clone(),
            advertising: false,
        };
        let delay = MockDelay(log.0.clone());
        (log, radio, beacon, delay)
    }

    const BLE_CFG: TestConfig = TestConfig {
        name: "ble",
        tls_version: TlsVersion::V1_2,
        ble_enabled: true,
        wifi_ps_enabled: true,
        coex_pref: CoexPreference::Bt,
        ble_adv_interval_ms: 250,
    };

    const WIFI_CFG: TestConfig = TestConfig {
        name: "wifi",
        tls_version: TlsVersion::V1_3,
        ble_enabled: false,
        wifi_ps_enabled: false,
        coex_pref: CoexPreference::Balanced,
        ble_adv_interval_ms: 0,
    };

    // ── Applier ───────────────────────────────────────────────

    #[test]
    fn applier_orders_ps_then_beacon_then_settle() {
        let (log, mut radio, mut beacon, delay) = rig();
        apply_config(&BLE_CFG, &mut radio, &mut beacon, &delay, 100);
        assert_eq!(
            &*log.0.borrow(),
            &[
                Call::PowerSave(true),
                Call::BeaconStart(250),
                Call::CoexPref(CoexPreference::Bt),
                Call::Delay(100),
            ]
        );
    }

    #[test]
    fn applier_stops_beacon_when_ble_disabled() {
        let (log, mut radio, mut beacon, delay) = rig();
        apply_config(&WIFI_CFG, &mut radio, &mut beacon, &delay, 100);
        assert_eq!(
            &*log.0.borrow(),
            &[Call::PowerSave(false), Call::BeaconStop, Call::Delay(100)]
        );
    }

    // ── Reporter ──────────────────────────────────────────────

    #[test]
    fn summary_renders_one_row_per_result_in_order() {
        let results = [
            TestResult {
                name: "WiFi only",
                success: true,
                bytes_downloaded: 1_000_000,
                duration_ms: 500,
                speed_kbps: 16000.0,
                speed_mbps: 16.0,
            },
            TestResult::failed("BLE coex"),
        ];
        let text = render_summary(&results, 123_456);
        let lines: Vec<&str> = text.lines().collect();

        let wifi_row = lines.iter().find(|l| l.contains("WiFi only")).unwrap();
        let ble_row = lines.iter().find(|l| l.contains("BLE coex")).unwrap();
        assert!(wifi_row.contains("16.00"));
        assert!(wifi_row.trim_end().ends_with("OK"));
        assert!(ble_row.trim_end().ends_with("FAIL"));

        // Row order matches result order.
        let wifi_idx = lines.iter().position(|l| l.contains("WiFi only")).unwrap();
        let ble_idx = lines.iter().position(|l| l.contains("BLE coex")).unwrap();
        assert!(wifi_idx < ble_idx);

        assert!(text.contains("Minimum free heap: 123456 bytes"));
    }

    #[test]
    fn summary_rows_are_fixed_width() {
        let results = [TestResult {
            name: "x",
            success: true,
            bytes_downloaded: 1,
            duration_ms: 1,
            speed_kbps: 8.0,
            speed_mbps: 0.008,
        }];
        let text = render_summary(&results, 0);
        let row = text.lines().find(|l| l.starts_with('x')).unwrap();
        // name(30) + space + speed(10) + space + status(10)
        assert_eq!(row.len(), 52);
    }
}
