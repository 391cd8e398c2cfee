//! SNTP time-sync adapter.
//!
//! Certificate validity checks need a plausible wall clock, so startup
//! syncs time before the first probe. One [`TimeSync::sync`] call is one
//! attempt; the bounded retry policy lives with the caller.

use log::info;

use crate::ports::TimeSync;

/// How long one sync attempt waits for the SNTP response.
#[cfg(target_os = "espidf")]
const SYNC_TIMEOUT_MS: u32 = 10_000;
#[cfg(target_os = "espidf")]
const SYNC_POLL_MS: u32 = 100;

pub struct SntpSync {
    #[cfg(not(target_os = "espidf"))]
    sim_fail_attempts: u32,
}

impl Default for SntpSync {
    fn default() -> Self {
        Self::new()
    }
}

impl SntpSync {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            sim_fail_attempts: 0,
        }
    }

    /// Make the next `n` sync attempts fail (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, n: u32) {
        self.sim_fail_attempts = n;
    }
}

impl TimeSync for SntpSync {
    #[cfg(target_os = "espidf")]
    fn sync(&mut self) -> Result<(), &'static str> {
        use esp_idf_svc::sntp::{EspSntp, SyncStatus};

        let sntp = EspSntp::new_default().map_err(|_| "sntp init failed")?;
        let mut waited_ms = 0u32;
        while sntp.get_sync_status() != SyncStatus::Completed {
            if waited_ms >= SYNC_TIMEOUT_MS {
                return Err("sntp sync timed out");
            }
            esp_idf_hal::delay::FreeRtos::delay_ms(SYNC_POLL_MS);
            waited_ms += SYNC_POLL_MS;
        }
        info!("SNTP: time synchronised");
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn sync(&mut self) -> Result<(), &'static str> {
        if self.sim_fail_attempts > 0 {
            self.sim_fail_attempts -= 1;
            return Err("sntp sync failed (sim)");
        }
        info!("SNTP(sim): time synchronised");
        Ok(())
    }
}
