//! Port traits — the hexagonal boundary between the benchmark logic and the
//! vendor radio/TLS/clock services.
//!
//! The runner and prober are written purely against these traits; the
//! `adapters` module provides the ESP-IDF implementations (cfg-gated) and
//! host-side simulations for testing.

use core::fmt;

use crate::config::{CoexPreference, TlsVersion};
use crate::request::HttpRequest;

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock.
pub trait Clock {
    fn now_us(&self) -> u64;
}

/// Blocking millisecond delay.
pub trait Delay {
    fn delay_ms(&self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Radio control
// ───────────────────────────────────────────────────────────────

/// WiFi power-save and coexistence arbitration knobs.
///
/// Failures in the underlying driver calls are not recoverable mid-suite;
/// implementations log them and latch a failed state rather than returning
/// errors to the runner.
pub trait RadioControl {
    fn set_power_save(&mut self, enabled: bool);
    fn set_coex_preference(&mut self, pref: CoexPreference);
}

/// BLE advertising beacon.
///
/// `start` on an already-advertising beacon restarts advertising with the
/// new interval; `stop` on an idle beacon is a no-op.
pub trait Beacon {
    fn start(&mut self, interval_ms: u16);
    fn stop(&mut self);
    fn is_advertising(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Probe transport
// ───────────────────────────────────────────────────────────────

/// Why a probe connection could not be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// TLS handle allocation failed.
    Alloc,
    /// Handshake or TCP connect failed.
    Connect,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc => write!(f, "TLS handle allocation failed"),
            Self::Connect => write!(f, "connection failed"),
        }
    }
}

/// Outcome of a single transport write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// `n` bytes were accepted (may be a short write).
    Written(usize),
    /// Transient want-read/want-write condition; retry without advancing.
    WouldBlock,
    /// Unrecoverable write failure.
    Failed,
}

/// Outcome of a single transport read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n > 0` bytes were read into the buffer.
    Data(usize),
    /// Transient want-read/want-write condition; retry.
    WouldBlock,
    /// Stream ended — connection closed or read error, treated identically.
    Closed,
}

/// A blocking encrypted byte stream for one probe.
pub trait ProbeStream {
    fn write(&mut self, data: &[u8]) -> WriteOutcome;
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome;
}

/// Opens one encrypted connection per probe to the configured endpoint.
pub trait ProbeConnector {
    type Stream: ProbeStream;

    /// Blocking connect with certificate validation. `tls` selects whether
    /// the cipher list is restricted to TLS 1.3 AEAD suites.
    fn connect(
        &mut self,
        request: &HttpRequest,
        tls: TlsVersion,
    ) -> Result<Self::Stream, ConnectError>;
}

// ───────────────────────────────────────────────────────────────
// Ancillary services
// ───────────────────────────────────────────────────────────────

/// Wall-clock synchronisation (SNTP). One attempt; retry policy is applied
/// by the caller.
pub trait TimeSync {
    fn sync(&mut self) -> Result<(), &'static str>;
}

/// Process-lifetime heap statistics for the summary footer.
pub trait HeapStats {
    fn min_free_bytes(&self) -> u32;
}
