//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter | Implements               | Connects to                      |
//! |---------|--------------------------|----------------------------------|
//! | `wifi`  | RadioControl             | ESP-IDF WiFi STA + coex driver   |
//! | `ble`   | Beacon                   | Bluedroid GAP advertising        |
//! | `tls`   | ProbeConnector/Stream    | esp_tls client (mbedTLS)         |
//! | `sntp`  | TimeSync                 | ESP-IDF SNTP service             |
//! | `time`  | Clock, Delay             | ESP32 system timer / FreeRTOS    |
//! | `heap`  | HeapStats                | ESP-IDF heap accounting          |
//!
//! Each adapter carries a host-side simulation behind
//! `#[cfg(not(target_os = "espidf"))]` so the suite runs end to end in
//! host tests.

pub mod ble;
pub mod heap;
pub mod sntp;
pub mod time;
pub mod tls;
pub mod wifi;
