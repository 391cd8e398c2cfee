//! Probe transport adapter.
//!
//! Implements [`ProbeConnector`]/[`ProbeStream`] — one blocking encrypted
//! client connection per probe.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_tls` client (mbedTLS underneath) with
//!   certificate validation against the bundled root store. A TLS 1.3 probe
//!   restricts the offered cipher list to three AEAD suites; otherwise the
//!   default list allows negotiation down to 1.2.
//! - **all other targets**: plaintext `std::net::TcpStream` — no TLS, for
//!   ease of host-side testing against a loopback server.

use log::info;

#[cfg(target_os = "espidf")]
use log::error;

use crate::config::TlsVersion;
use crate::ports::{ConnectError, ProbeConnector, ProbeStream, ReadOutcome, WriteOutcome};
use crate::request::HttpRequest;

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

/// Cipher suites offered when a probe forces TLS 1.3.
/// Zero-terminated, as mbedTLS expects.
#[cfg(target_os = "espidf")]
static TLS13_CIPHERSUITES: [i32; 4] = [
    esp_idf_svc::sys::MBEDTLS_TLS1_3_AES_128_GCM_SHA256 as i32,
    esp_idf_svc::sys::MBEDTLS_TLS1_3_AES_256_GCM_SHA384 as i32,
    esp_idf_svc::sys::MBEDTLS_TLS1_3_CHACHA20_POLY1305_SHA256 as i32,
    0,
];

/// Opens `esp_tls` connections to the benchmark endpoint.
#[cfg(target_os = "espidf")]
#[derive(Default)]
pub struct EspTlsConnector;

#[cfg(target_os = "espidf")]
impl EspTlsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl ProbeConnector for EspTlsConnector {
    type Stream = EspTlsStream;

    fn connect(
        &mut self,
        request: &HttpRequest,
        tls: TlsVersion,
    ) -> Result<EspTlsStream, ConnectError> {
        use esp_idf_svc::sys::*;

        let mut cfg: esp_tls_cfg_t = unsafe { core::mem::zeroed() };
        cfg.crt_bundle_attach = Some(esp_crt_bundle_attach);
        if tls == TlsVersion::V1_3 {
            cfg.ciphersuites_list = TLS13_CIPHERSUITES.as_ptr();
        }

        let handle = unsafe { esp_tls_init() };
        if handle.is_null() {
            return Err(ConnectError::Alloc);
        }

        let host = request.host();
        let ret = unsafe {
            esp_tls_conn_new_sync(
                host.as_ptr().cast(),
                host.len() as i32,
                i32::from(request.port()),
                &cfg,
                handle,
            )
        };
        if ret != 1 {
            error!("esp_tls connect to {host} failed ({ret})");
            unsafe {
                esp_tls_conn_destroy(handle);
            }
            return Err(ConnectError::Connect);
        }
        Ok(EspTlsStream { handle })
    }
}

/// One live `esp_tls` session. Destroyed on drop.
#[cfg(target_os = "espidf")]
pub struct EspTlsStream {
    handle: *mut esp_idf_svc::sys::esp_tls_t,
}

#[cfg(target_os = "espidf")]
impl ProbeStream for EspTlsStream {
    fn write(&mut self, data: &[u8]) -> WriteOutcome {
        use esp_idf_svc::sys::*;
        let ret = unsafe { esp_tls_conn_write(self.handle, data.as_ptr().cast(), data.len()) };
        if ret > 0 {
            WriteOutcome::Written(ret as usize)
        } else if ret == ESP_TLS_ERR_SSL_WANT_READ as isize
            || ret == ESP_TLS_ERR_SSL_WANT_WRITE as isize
        {
            WriteOutcome::WouldBlock
        } else {
            WriteOutcome::Failed
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        use esp_idf_svc::sys::*;
        let ret = unsafe { esp_tls_conn_read(self.handle, buf.as_mut_ptr().cast(), buf.len()) };
        if ret > 0 {
            ReadOutcome::Data(ret as usize)
        } else if ret == ESP_TLS_ERR_SSL_WANT_READ as isize
            || ret == ESP_TLS_ERR_SSL_WANT_WRITE as isize
        {
            ReadOutcome::WouldBlock
        } else {
            // Closed and errored streams end the measurement identically.
            ReadOutcome::Closed
        }
    }
}

#[cfg(target_os = "espidf")]
impl Drop for EspTlsStream {
    fn drop(&mut self) {
        unsafe {
            esp_idf_svc::sys::esp_tls_conn_destroy(self.handle);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation (plaintext TCP)
// ───────────────────────────────────────────────────────────────

/// Plaintext TCP connector for host tests. The TLS-version argument only
/// selects the cipher list on device, so it is accepted and ignored here.
#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct PlainTcpConnector {
    port_override: Option<u16>,
}

#[cfg(not(target_os = "espidf"))]
impl PlainTcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to this port instead of the request's port — lets tests aim
    /// probes at an ephemeral loopback listener.
    pub fn with_port_override(port: u16) -> Self {
        Self {
            port_override: Some(port),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl ProbeConnector for PlainTcpConnector {
    type Stream = PlainTcpStream;

    fn connect(
        &mut self,
        request: &HttpRequest,
        _tls: TlsVersion,
    ) -> Result<PlainTcpStream, ConnectError> {
        let port = self.port_override.unwrap_or_else(|| request.port());
        let addr = (request.host(), port);
        let stream = std::net::TcpStream::connect(addr).map_err(|_| ConnectError::Connect)?;
        info!("TLS(sim): plaintext connection to {}:{}", request.host(), port);
        Ok(PlainTcpStream { stream })
    }
}

#[cfg(not(target_os = "espidf"))]
pub struct PlainTcpStream {
    stream: std::net::TcpStream,
}

#[cfg(not(target_os = "espidf"))]
impl ProbeStream for PlainTcpStream {
    fn write(&mut self, data: &[u8]) -> WriteOutcome {
        use std::io::Write;
        match self.stream.write(data) {
            Ok(n) => WriteOutcome::Written(n),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => WriteOutcome::WouldBlock,
            Err(_) => WriteOutcome::Failed,
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        use std::io::Read;
        match self.stream.read(buf) {
            Ok(0) => ReadOutcome::Closed,
            Ok(n) => ReadOutcome::Data(n),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => ReadOutcome::WouldBlock,
            // Read errors fold into end-of-stream.
            Err(_) => ReadOutcome::Closed,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests (host / simulation path only)
// ───────────────────────────────────────────────────────────────
