//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a subsystem against mock
//! ports or a loopback TCP server. All tests run on the host (x86_64) with
//! no real radio hardware required.

#![cfg(not(target_os = "espidf"))]

mod http_server;
mod mock_ports;
mod suite_tests;
