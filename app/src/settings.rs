//! Settings kept in RTC fast memory.
//!
//! The values survive a software reset, which is how a Wi-Fi configuration
//! reset hands the `ForceAp` flag to the next boot. They are lost on power
//! loss; a marker byte tells written slots from uninitialised memory.

use core::ptr::{addr_of, addr_of_mut};

use esp_hal::ram;
use s3_lcd_box::settings::{Setting, SettingsStore};

const WRITTEN: u8 = 0xA5;

#[ram(rtc_fast, persistent)]
static mut VALUES: [[u8; 2]; Setting::COUNT] = [[0; 2]; Setting::COUNT];

/// Handle onto the RTC settings block.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtcSettings;

impl RtcSettings {
    /// Reads and clears the provisioning request left by a Wi-Fi reset.
    pub fn take_force_ap(&mut self) -> bool {
        let requested = self.get(Setting::ForceAp).unwrap_or(0) != 0;
        if requested {
            self.set(Setting::ForceAp, 0);
        }
        requested
    }
}

impl SettingsStore for RtcSettings {
    fn get(&self, key: Setting) -> Option<u8> {
        let [marker, value] =
            critical_section::with(|_| unsafe { (*addr_of!(VALUES))[key.index()] });
        (marker == WRITTEN).then_some(value)
    }

    fn set(&mut self, key: Setting, value: u8) {
        critical_section::with(|_| unsafe {
            (*addr_of_mut!(VALUES))[key.index()] = [WRITTEN, value];
        });
    }
}
