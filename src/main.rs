//! CoexBench Firmware — Main Entry Point
//!
//! Startup sequence:
//!
//! 1. ESP-IDF bootstrap (link patches + logger).
//! 2. Parse the benchmark URL once into an immutable request context.
//! 3. Bring up NVS, the system event loop and the WiFi station; block
//!    until an IP address is acquired (the one-shot startup rendezvous).
//! 4. Sync wall-clock time over SNTP under a bounded retry policy —
//!    certificate validity checks need a plausible clock.
//! 5. Run the whole suite on a dedicated worker task, then print the
//!    summary table.
//!
//! Failures in steps 2-3 are fatal; the suite itself degrades per probe.

use anyhow::{Context, Result};
use log::{info, warn};

use coexbench::adapters::ble::BleBeacon;
use coexbench::adapters::heap::HeapMonitor;
use coexbench::adapters::sntp::SntpSync;
use coexbench::adapters::time::{MonotonicClock, TaskDelay};
use coexbench::adapters::tls::EspTlsConnector;
use coexbench::adapters::wifi::WifiStation;
use coexbench::config::{self, RunnerConfig, SUITE};
use coexbench::ports::TimeSync;
use coexbench::request::HttpRequest;
use coexbench::runner;

/// Worker task stack. TLS handshakes dominate the depth.
const WORKER_STACK_BYTES: usize = 16 * 1024;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  CoexBench v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── URL context (computed once, shared read-only) ─────────
    let request = HttpRequest::parse(config::DEFAULT_URL, config::USER_AGENT)
        .map_err(coexbench::Error::from)
        .context("speed test URL rejected")?;
    info!("Speed test URL: {}", config::DEFAULT_URL);
    info!("Host: {}, Path: {}", request.host(), request.path());

    // ── Foundational services (fatal tier) ────────────────────
    let peripherals =
        esp_idf_svc::hal::peripherals::Peripherals::take().context("peripherals unavailable")?;
    let sysloop =
        esp_idf_svc::eventloop::EspSystemEventLoop::take().context("system event loop")?;
    let nvs = esp_idf_svc::nvs::EspDefaultNvsPartition::take().context("NVS flash init")?;

    let mut wifi = WifiStation::connect(
        peripherals.modem,
        sysloop,
        nvs,
        config::WIFI_SSID,
        config::WIFI_PASSWORD,
        config::WIFI_COUNTRY,
    )?;

    // ── Time sync (bounded retry, then proceed regardless) ────
    let runner_cfg = RunnerConfig::default();
    info!("Syncing time from SNTP...");
    let mut sntp = SntpSync::new();
    let delay = TaskDelay::new();
    if let Err(e) = runner_cfg
        .sntp_retry
        .run(&delay, "time sync", || sntp.sync())
    {
        warn!("Time sync failed ({e}) - certificate validation may fail");
    }

    // ── Worker task ───────────────────────────────────────────
    let worker = std::thread::Builder::new()
        .name("speedtest".into())
        .stack_size(WORKER_STACK_BYTES)
        .spawn(move || {
            let mut beacon = BleBeacon::new();
            let mut connector = EspTlsConnector::new();
            let clock = MonotonicClock::new();
            let delay = TaskDelay::new();
            let heap = HeapMonitor::new();

            let results = runner::run_suite(
                SUITE,
                &runner_cfg,
                &request,
                &mut wifi,
                &mut beacon,
                &mut connector,
                &clock,
                &delay,
            );
            runner::report(&results, &heap);
            info!("Test suite complete.");
        })
        .context("worker task spawn")?;

    worker
        .join()
        .map_err(|_| anyhow::anyhow!("worker task panicked"))?;
    Ok(())
}
