//! Throughput prober.
//!
//! One probe = one blocking HTTPS GET against the configured endpoint with
//! byte counting. The prober is pure logic over the [`ProbeConnector`],
//! [`ProbeStream`] and [`Clock`] ports, so the whole measurement path runs
//! on the host against scripted streams.
//!
//! ## Measurement protocol
//!
//! 1. Connect (TLS version restriction is the connector's concern).
//! 2. Write the prebuilt request, retrying on transient would-block
//!    conditions without advancing the write offset.
//! 3. Read into a 4 KiB buffer. Header bytes are discarded; accounting
//!    (byte total + start timestamp) begins exactly once, at the first
//!    body byte after the `\r\n\r\n` boundary. The boundary scanner keeps
//!    match state across reads, so a boundary split between two chunks is
//!    still found.
//! 4. The loop ends when the stream reports closed — read errors are folded
//!    into the same end-of-stream outcome, never surfaced separately.
//! 5. Success requires a positive byte count and a positive elapsed time;
//!    speed is `bytes * 8000 / elapsed_us` kbit/s.
//!
//! Failures before the read phase (allocation, connect, write) produce a
//! failed result with zero measurements; the suite moves on.

use log::{error, info};

use crate::config::TestConfig;
use crate::ports::{
    Clock, ConnectError, ProbeConnector, ProbeStream, ReadOutcome, WriteOutcome,
};
use crate::request::HttpRequest;

/// Read chunk size in bytes.
pub const READ_BUF_LEN: usize = 4096;

/// Progress is logged roughly every this many body bytes.
const PROGRESS_STRIDE: usize = 200 * 1024;

// ───────────────────────────────────────────────────────────────
// TestResult
// ───────────────────────────────────────────────────────────────

/// Measurement outcome for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub name: &'static str,
    pub success: bool,
    pub bytes_downloaded: usize,
    pub duration_ms: u64,
    pub speed_kbps: f32,
    pub speed_mbps: f32,
}

impl TestResult {
    /// A failed result with zero measurements.
    pub const fn failed(name: &'static str) -> Self {
        Self {
            name,
            success: false,
            bytes_downloaded: 0,
            duration_ms: 0,
            speed_kbps: 0.0,
            speed_mbps: 0.0,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Header/body boundary scanner
// ───────────────────────────────────────────────────────────────

/// Streaming `\r\n\r\n` detector.
///
/// Tracks how many bytes of the boundary sequence have matched so far, so
/// the boundary is found even when it spans read chunks.
#[derive(Debug, Default)]
pub struct BoundaryScanner {
    matched: usize,
}

const BOUNDARY: [u8; 4] = *b"\r\n\r\n";

impl BoundaryScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk. Returns the offset of the first body byte within
    /// this chunk once the boundary completes, else `None`.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<usize> {
        for (i, &b) in chunk.iter().enumerate() {
            if b == BOUNDARY[self.matched] {
                self.matched += 1;
                if self.matched == BOUNDARY.len() {
                    self.matched = 0;
                    return Some(i + 1);
                }
            } else if b == b'\r' {
                self.matched = 1;
            } else {
                self.matched = 0;
            }
        }
        None
    }
}

// ───────────────────────────────────────────────────────────────
// Probe
// ───────────────────────────────────────────────────────────────

/// Run one throughput probe for `cfg`.
///
/// Only the TLS-version field of `cfg` is consumed here; power-save, BLE
/// and coexistence settings were already applied by the runner.
pub fn run_probe<C, K>(
    cfg: &TestConfig,
    request: &HttpRequest,
    connector: &mut C,
    clock: &K,
) -> TestResult
where
    C: ProbeConnector,
    K: Clock,
{
    info!("----------------------------------------");
    info!("Running: {}", cfg.name);
    info!("----------------------------------------");

    let connect_start = clock.now_us();
    let mut stream = match connector.connect(request, cfg.tls_version) {
        Ok(s) => s,
        Err(ConnectError::Alloc) => {
            error!("Failed to allocate TLS handle");
            return TestResult::failed(cfg.name);
        }
        Err(ConnectError::Connect) => {
            error!("Connection failed");
            return TestResult::failed(cfg.name);
        }
    };
    info!("Connected in {} ms", (clock.now_us() - connect_start) / 1000);

    // ── Send request ──────────────────────────────────────────
    //
    // Would-block outcomes retry without advancing; there is deliberately
    // no backoff here (the TLS layer only reports want-read/want-write
    // transiently during renegotiation).
    let req = request.text().as_bytes();
    let mut written = 0usize;
    while written < req.len() {
        match stream.write(&req[written..]) {
            WriteOutcome::Written(n) => written += n,
            WriteOutcome::WouldBlock => {}
            WriteOutcome::Failed => {
                error!("Write failed");
                return TestResult::failed(cfg.name);
            }
        }
    }

    // ── Read response ─────────────────────────────────────────
    let mut buf = [0u8; READ_BUF_LEN];
    let mut scanner = BoundaryScanner::new();
    let mut headers_done = false;
    let mut total_bytes = 0usize;
    let mut start_time_us = 0u64;

    loop {
        let n = match stream.read(&mut buf) {
            ReadOutcome::Data(n) => n,
            ReadOutcome::WouldBlock => continue,
            // Closed and read errors end the measurement identically.
            ReadOutcome::Closed => break,
        };

        if !headers_done {
            if let Some(body_off) = scanner.feed(&buf[..n]) {
                headers_done = true;
                total_bytes = n - body_off;
                start_time_us = clock.now_us();
            }
            continue;
        }

        total_bytes += n;

        // Progress roughly every 200 KiB of body. The modulo condition is
        // approximate on purpose: it fires on the first chunk that crosses
        // each stride boundary.
        if total_bytes % PROGRESS_STRIDE < READ_BUF_LEN {
            let elapsed_us = clock.now_us() - start_time_us;
            if elapsed_us > 0 {
                info!(
                    "  {:>8} bytes | {:.1} Kbit/s",
                    total_bytes,
                    (total_bytes as f32 * 8000.0) / elapsed_us as f32
                );
            }
        }
    }

    // ── Compute result ────────────────────────────────────────
    if !headers_done {
        return TestResult::failed(cfg.name);
    }
    let total_us = clock.now_us() - start_time_us;
    if total_us == 0 || total_bytes == 0 {
        return TestResult::failed(cfg.name);
    }

    let speed_kbps = (total_bytes as f32 * 8000.0) / total_us as f32;
    let result = TestResult {
        name: cfg.name,
        success: true,
        bytes_downloaded: total_bytes,
        duration_ms: total_us / 1000,
        speed_kbps,
        speed_mbps: speed_kbps / 1000.0,
    };
    info!(
        "RESULT: {} bytes in {} ms = {:.2} Mbit/s",
        result.bytes_downloaded, result.duration_ms, result.speed_mbps
    );
    result
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
