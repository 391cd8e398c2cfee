//! WiFi station adapter.
//!
//! Brings the station interface up once at startup and blocks until an IP
//! address is acquired — the one-shot rendezvous the rest of the firmware
//! waits behind. Also implements [`RadioControl`], the power-save and
//! coexistence knobs toggled between tests.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::BlockingWifi`, raw `sys` calls for power save and
//!   coexistence preference (no safe wrapper exists for those).
//! - **all other targets**: simulation stubs recording the last applied
//!   settings for host-side tests.
//!
//! The regulatory country code is applied **before** `start()` so the
//! driver picks up the correct channel plan.

use log::info;

#[cfg(target_os = "espidf")]
use log::error;

use crate::config::CoexPreference;
use crate::ports::RadioControl;

#[cfg(target_os = "espidf")]
use crate::error::Error;

/// WiFi station with blocking bring-up.
pub struct WifiStation {
    /// Held for its lifetime; dropping it tears the driver down.
    #[cfg(target_os = "espidf")]
    _wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    /// Re-issues `esp_wifi_connect()` whenever the station drops off the AP.
    #[cfg(target_os = "espidf")]
    _disconnect_watch: esp_idf_svc::eventloop::EspSubscription<'static, esp_idf_svc::eventloop::System>,
    /// Latched when a radio call fails; subsequent settings still attempt.
    failed: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_power_save: Option<bool>,
    #[cfg(not(target_os = "espidf"))]
    sim_coex_pref: Option<CoexPreference>,
}

impl WifiStation {
    /// Initialise the station, apply the country code, connect and block
    /// until the netif reports an IP address.
    #[cfg(target_os = "espidf")]
    pub fn connect(
        modem: esp_idf_svc::hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
        ssid: &str,
        password: &str,
        country: &str,
    ) -> crate::Result<Self> {
        use esp_idf_svc::wifi::{
            AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi,
        };

        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(|e| {
            error!("WiFi: driver init failed ({e})");
            Error::Init("wifi driver")
        })?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop.clone()).map_err(|e| {
            error!("WiFi: event wiring failed ({e})");
            Error::Init("wifi event loop")
        })?;

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| Error::WifiConnect("ssid too long"))?,
            password: password
                .try_into()
                .map_err(|_| Error::WifiConnect("password too long"))?,
            auth_method,
            ..Default::default()
        }))
        .map_err(|e| {
            error!("WiFi: set_configuration failed ({e})");
            Error::WifiConnect("configuration rejected")
        })?;

        // Country code must land before start for regulatory channel limits.
        info!("Setting WiFi country: {country}");
        set_country_code(country)?;

        wifi.start().map_err(|e| {
            error!("WiFi: start failed ({e})");
            Error::WifiConnect("start failed")
        })?;

        // Reconnect on disconnect, mirroring the event handler the netif
        // rendezvous was originally built around.
        let disconnect_watch = sysloop
            .subscribe::<esp_idf_svc::wifi::WifiEvent, _>(|event| {
                if matches!(event, esp_idf_svc::wifi::WifiEvent::StaDisconnected(_)) {
                    info!("Disconnected, reconnecting...");
                    unsafe {
                        esp_idf_svc::sys::esp_wifi_connect();
                    }
                }
            })
            .map_err(|e| {
                error!("WiFi: event subscription failed ({e})");
                Error::Init("wifi event subscription")
            })?;

        info!("WiFi: connecting to '{ssid}'");
        wifi.connect().map_err(|e| {
            error!("WiFi: connect failed ({e})");
            Error::WifiConnect("association failed")
        })?;
        // The one-shot startup rendezvous: block until got-IP.
        wifi.wait_netif_up().map_err(|e| {
            error!("WiFi: IP acquisition failed ({e})");
            Error::WifiConnect("no IP address")
        })?;
        info!("WiFi: connected, IP acquired");

        Ok(Self {
            _wifi: wifi,
            _disconnect_watch: disconnect_watch,
            failed: false,
        })
    }

    /// Host simulation: immediately "connected".
    #[cfg(not(target_os = "espidf"))]
    pub fn connect_sim(ssid: &str) -> crate::Result<Self> {
        info!("WiFi(sim): connected to '{ssid}'");
        Ok(Self {
            failed: false,
            sim_power_save: None,
            sim_coex_pref: None,
        })
    }

    /// Whether any radio-control call has failed since bring-up.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Last power-save setting applied (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_power_save(&self) -> Option<bool> {
        self.sim_power_save
    }

    /// Last coexistence preference applied (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_coex_pref(&self) -> Option<CoexPreference> {
        self.sim_coex_pref
    }
}

#[cfg(target_os = "espidf")]
fn set_country_code(country: &str) -> crate::Result<()> {
    // The driver expects a NUL-terminated 2-3 character code.
    let mut code = [0u8; 4];
    let src = country.as_bytes();
    if src.is_empty() || src.len() > 3 {
        return Err(Error::Init("country code must be 2-3 chars"));
    }
    code[..src.len()].copy_from_slice(src);
    let ret = unsafe {
        esp_idf_svc::sys::esp_wifi_set_country_code(code.as_ptr().cast(), true)
    };
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        error!("WiFi: set_country_code failed ({ret})");
        return Err(Error::Init("country code rejected"));
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// RadioControl
// ───────────────────────────────────────────────────────────────

impl RadioControl for WifiStation {
    #[cfg(target_os = "espidf")]
    fn set_power_save(&mut self, enabled: bool) {
        use esp_idf_svc::sys::{
            esp_wifi_set_ps, wifi_ps_type_t_WIFI_PS_MIN_MODEM, wifi_ps_type_t_WIFI_PS_NONE,
        };
        let ps_type = if enabled {
            wifi_ps_type_t_WIFI_PS_MIN_MODEM
        } else {
            wifi_ps_type_t_WIFI_PS_NONE
        };
        let ret = unsafe { esp_wifi_set_ps(ps_type) };
        if ret != esp_idf_svc::sys::ESP_OK as i32 {
            error!("WiFi: set_ps failed ({ret})");
            self.failed = true;
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn set_power_save(&mut self, enabled: bool) {
        info!("WiFi(sim): power save {}", if enabled { "on" } else { "off" });
        self.sim_power_save = Some(enabled);
    }

    #[cfg(target_os = "espidf")]
    fn set_coex_preference(&mut self, pref: CoexPreference) {
        use esp_idf_svc::sys::{
            esp_coex_preference_set, esp_coex_prefer_t_ESP_COEX_PREFER_BALANCE,
            esp_coex_prefer_t_ESP_COEX_PREFER_BT, esp_coex_prefer_t_ESP_COEX_PREFER_WIFI,
        };
        let native = match pref {
            CoexPreference::Wifi => esp_coex_prefer_t_ESP_COEX_PREFER_WIFI,
            CoexPreference::Bt => esp_coex_prefer_t_ESP_COEX_PREFER_BT,
            CoexPreference::Balanced => esp_coex_prefer_t_ESP_COEX_PREFER_BALANCE,
        };
        let ret = unsafe { esp_coex_preference_set(native) };
        if ret != esp_idf_svc::sys::ESP_OK as i32 {
            error!("WiFi: coex_preference_set failed ({ret})");
            self.failed = true;
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn set_coex_preference(&mut self, pref: CoexPreference) {
        info!("WiFi(sim): coex preference {}", pref.as_str());
        self.sim_coex_pref = Some(pref);
    }
}

// ───────────────────────────────────────────────────────────────
// Tests (host / simulation path only)
// ───────────────────────────────────────────────────────────────
