//! End-to-end suite runs over a loopback TCP server.
//!
//! Uses the real prober, runner, request builder and host transport; only
//! the radios and delays are mocked.

use coexbench::adapters::time::MonotonicClock;
use coexbench::adapters::tls::PlainTcpConnector;
use coexbench::config::{self, RunnerConfig, SUITE};
use coexbench::ports::Beacon;
use coexbench::request::HttpRequest;
use coexbench::runner::{render_summary, run_suite};

use crate::http_server;
use crate::mock_ports::{self, InstantDelay, MockBeacon, MockRadio, PortCall};

const BODY_LEN: usize = 64 * 1024;

fn loopback_request() -> HttpRequest {
    HttpRequest::parse("https://127.0.0.1/down", config::USER_AGENT).expect("valid URL")
}

#[test]
fn full_suite_over_loopback_succeeds() {
    let (port, server) = http_server::serve(BODY_LEN, SUITE.len());

    let log = mock_ports::new_log();
    let mut radio = MockRadio::new(log.clone());
    let mut beacon = MockBeacon::new(log.clone());
    let delay = InstantDelay::new(log.clone());
    let mut connector = PlainTcpConnector::with_port_override(port);
    let clock = MonotonicClock::new();
    let request = loopback_request();
    let runner_cfg = RunnerConfig::default();

    let results = run_suite(
        SUITE,
        &runner_cfg,
        &request,
        &mut radio,
        &mut beacon,
        &mut connector,
        &clock,
        &delay,
    );
    server.join().expect("server thread");

    assert_eq!(results.len(), SUITE.len());
    for (result, cfg) in results.iter().zip(SUITE) {
        assert_eq!(result.name, cfg.name);
        assert!(result.success, "{} should succeed", cfg.name);
        assert_eq!(result.bytes_downloaded, BODY_LEN);
        assert!(result.speed_kbps > 0.0);
    }

    // The beacon must be quiet once the suite returns.
    assert!(!beacon.is_advertising());

    let calls = log.borrow();
    // One settle delay per test, one inter-test pause between the two.
    let settles = calls
        .iter()
        .filter(|c| **c == PortCall::Delay(runner_cfg.settle_delay_ms))
        .count();
    let pauses = calls
        .iter()
        .filter(|c| **c == PortCall::Delay(runner_cfg.inter_test_delay_ms))
        .count();
    assert_eq!(settles, SUITE.len());
    assert_eq!(pauses, SUITE.len() - 1);

    // BLE coex config starts the beacon at its declared interval; the
    // runner's final stop comes after everything else.
    assert!(calls.contains(&PortCall::BeaconStart(SUITE[1].ble_adv_interval_ms)));
    assert_eq!(calls.last(), Some(&PortCall::BeaconStop));
}

#[test]
fn unreachable_server_yields_failed_results() {
    let log = mock_ports::new_log();
    let mut radio = MockRadio::new(log.clone());
    let mut beacon = MockBeacon::new(log.clone());
    let delay = InstantDelay::new(log.clone());
    // Port 1 is essentially never listening.
    let mut connector = PlainTcpConnector::with_port_override(1);
    let clock = MonotonicClock::new();
    let request = loopback_request();
    let runner_cfg = RunnerConfig::default();

    let results = run_suite(
        SUITE,
        &runner_cfg,
        &request,
        &mut radio,
        &mut beacon,
        &mut connector,
        &clock,
        &delay,
    );

    assert_eq!(results.len(), SUITE.len());
    for result in &results {
        assert!(!result.success);
        assert_eq!(result.bytes_downloaded, 0);
    }
    // Radio configuration still ran and the beacon was still cleaned up.
    assert!(!beacon.is_advertising());
    assert_eq!(log.borrow().last(), Some(&PortCall::BeaconStop));
}

#[test]
fn summary_reflects_mixed_outcomes() {
    let (port, server) = http_server::serve(BODY_LEN, 1);

    let log = mock_ports::new_log();
    let mut radio = MockRadio::new(log.clone());
    let mut beacon = MockBeacon::new(log.clone());
    let delay = InstantDelay::new(log.clone());
    let clock = MonotonicClock::new();
    let request = loopback_request();
    let runner_cfg = RunnerConfig::default();

    // Only the first probe finds a listener; the second connects to a
    // dead port.
    let mut ok_connector = PlainTcpConnector::with_port_override(port);
    let first = run_suite(
        &SUITE[..1],
        &runner_cfg,
        &request,
        &mut radio,
        &mut beacon,
        &mut ok_connector,
        &clock,
        &delay,
    );
    server.join().expect("server thread");

    let mut dead_connector = PlainTcpConnector::with_port_override(1);
    let second = run_suite(
        &SUITE[1..],
        &runner_cfg,
        &request,
        &mut radio,
        &mut beacon,
        &mut dead_connector,
        &clock,
        &delay,
    );

    let mut results = Vec::new();
    results.extend(first.iter().copied());
    results.extend(second.iter().copied());

    let text = render_summary(&results, 42_000);
    let lines: Vec<&str> = text.lines().collect();
    let ok_row = lines.iter().find(|l| l.contains("WiFi only")).unwrap();
    let fail_row = lines.iter().find(|l| l.contains("BLE coex")).unwrap();
    assert!(ok_row.trim_end().ends_with("OK"));
    assert!(fail_row.trim_end().ends_with("FAIL"));
    assert!(text.contains("Minimum free heap: 42000 bytes"));
}
