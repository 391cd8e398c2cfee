//! Unified error types for the CoexBench firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! startup path's error handling uniform. Probe-level failures never reach
//! this type — per the measurement design they collapse into a failed
//! `TestResult` and the run continues.

use core::fmt;

use crate::request::ParseError;

/// Every fatal-tier operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The configured URL could not be parsed.
    Parse(ParseError),
    /// Foundational setup failed (NVS, netif, event loop, radio stacks).
    Init(&'static str),
    /// WiFi station bring-up failed.
    WifiConnect(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "url: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::WifiConnect(msg) => write!(f, "wifi: {msg}"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl std::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
