//! Heap statistics adapter for the summary footer.

use crate::ports::HeapStats;

/// Reports the minimum free heap observed over the process lifetime.
#[derive(Default)]
pub struct HeapMonitor;

impl HeapMonitor {
    pub fn new() -> Self {
        Self
    }
}

impl HeapStats for HeapMonitor {
    #[cfg(target_os = "espidf")]
    fn min_free_bytes(&self) -> u32 {
        unsafe { esp_idf_svc::sys::esp_get_minimum_free_heap_size() }
    }

    /// Host simulation: no meaningful heap watermark, report zero.
    #[cfg(not(target_os = "espidf"))]
    fn min_free_bytes(&self) -> u32 {
        0
    }
}
