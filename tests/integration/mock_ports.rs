//! Recording mock ports for integration tests.
//!
//! Every radio/beacon/delay call is appended to a shared log so tests can
//! assert on the full call history without touching real drivers.

use std::cell::RefCell;
use std::rc::Rc;

use coexbench::config::CoexPreference;
use coexbench::ports::{Beacon, Delay, RadioControl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    PowerSave(bool),
    CoexPref(CoexPreference),
    BeaconStart(u16),
    BeaconStop,
    Delay(u32),
}

pub type CallLog = Rc<RefCell<Vec<PortCall>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

// ── Radio ─────────────────────────────────────────────────────

pub struct MockRadio {
    log: CallLog,
}

impl MockRadio {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl RadioControl for MockRadio {
    fn set_power_save(&mut self, enabled: bool) {
        self.log.borrow_mut().push(PortCall::PowerSave(enabled));
    }

    fn set_coex_preference(&mut self, pref: CoexPreference) {
        self.log.borrow_mut().push(PortCall::CoexPref(pref));
    }
}

// ── Beacon ────────────────────────────────────────────────────

pub struct MockBeacon {
    log: CallLog,
    advertising: bool,
}

impl MockBeacon {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            advertising: false,
        }
    }
}

impl Beacon for MockBeacon {
    fn start(&mut self, interval_ms: u16) {
        self.log.borrow_mut().push(PortCall::BeaconStart(interval_ms));
        self.advertising = true;
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(PortCall::BeaconStop);
        self.advertising = false;
    }

    fn is_advertising(&self) -> bool {
        self.advertising
    }
}

// ── Delay (records instead of sleeping) ───────────────────────

pub struct InstantDelay {
    log: CallLog,
}

impl InstantDelay {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl Delay for InstantDelay {
    fn delay_ms(&self, ms: u32) {
        self.log.borrow_mut().push(PortCall::Delay(ms));
    }
}
