use log::info;
use s3_lcd_box::framework::{WifiConfigReset, WifiStation};
use s3_lcd_box::settings::{Setting, SettingsStore};

use crate::settings::RtcSettings;

/// Wi-Fi station of the firmware.
///
/// No network stack is linked into this image, so the station never holds a
/// link. While the board is still starting, every click therefore requests
/// provisioning before toggling chat.
#[derive(Debug, Default)]
pub struct StationLink;

impl WifiStation for StationLink {
    fn is_connected(&self) -> bool {
        false
    }
}

/// Requests the provisioning access point and restarts the chip.
#[derive(Debug, Default)]
pub struct ForceApReset;

impl WifiConfigReset for ForceApReset {
    fn reset_wifi_configuration(&mut self) {
        RtcSettings.set(Setting::ForceAp, 1);
        info!("Wi-Fi configuration reset, restarting into provisioning mode");
        esp_hal::system::software_reset();
    }
}
