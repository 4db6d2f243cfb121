//! Capability interface
//!
//! Generic application code operates a board only through [`Board`] and the
//! peripheral traits below; it never learns which chips sit behind them.

use core::fmt::Debug;

use bitflags::bitflags;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::{AudioCodecConfig, DisplayGeometry};
use crate::display::{DisplayLockGuard, UiLock};
use crate::framework::DeviceState;
use crate::touch::TouchSample;

/// Status LED.
pub trait Led {
    fn turn_on(&mut self);
    fn turn_off(&mut self);
    fn is_on(&self) -> bool;

    fn toggle(&mut self) {
        if self.is_on() {
            self.turn_off();
        } else {
            self.turn_on();
        }
    }

    /// Lit while the device is listening, speaking or has failed.
    fn on_state_changed(&mut self, state: DeviceState) {
        match state {
            DeviceState::Listening | DeviceState::Speaking | DeviceState::FatalError => {
                self.turn_on()
            }
            _ => self.turn_off(),
        }
    }
}

/// Display whose UI state may only be mutated while holding its lock.
pub trait Display {
    type RawMutex: RawMutex;

    fn geometry(&self) -> &DisplayGeometry;

    /// The lock guarding UI state against the renderer.
    fn ui(&self) -> &UiLock<Self::RawMutex>;

    /// Non-blocking scoped acquisition; the lock is released when the guard drops.
    fn try_lock(&self) -> Option<DisplayLockGuard<'_, Self::RawMutex>> {
        self.ui().try_lock().ok()
    }
}

pub trait Backlight {
    type Error: Debug;

    /// Current level in percent.
    fn brightness(&self) -> u8;

    /// Applies `level` (percent); `permanent` also persists it.
    fn set_brightness(&mut self, level: u8, permanent: bool) -> Result<(), Self::Error>;

    /// Applies the persisted level.
    fn restore_brightness(&mut self) -> Result<(), Self::Error>;
}

pub trait AudioCodec {
    type Error: Debug;

    /// Construction parameters, exactly as passed in.
    fn config(&self) -> &AudioCodecConfig;

    fn input_sample_rate(&self) -> u32 {
        self.config().input_sample_rate
    }

    fn output_sample_rate(&self) -> u32 {
        self.config().output_sample_rate
    }

    fn output_volume(&self) -> u8;
    fn set_output_volume(&mut self, volume: u8) -> Result<(), Self::Error>;
    fn enable_input(&mut self, enable: bool) -> Result<(), Self::Error>;
    fn enable_output(&mut self, enable: bool) -> Result<(), Self::Error>;
}

/// Present only when a touch controller was detected at startup.
pub trait Touchpad {
    /// Most recent sample read by the poller.
    fn touch_point(&self) -> TouchSample;

    /// Ends touch polling; no further gesture events are delivered.
    fn stop(&self);
}

bitflags! {
    /// Peripheral roles a board binds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const LED         = 1 << 0;
        const DISPLAY     = 1 << 1;
        const BACKLIGHT   = 1 << 2;
        const AUDIO_CODEC = 1 << 3;
        const TOUCHPAD    = 1 << 4;
    }
}

pub trait Board {
    type Led: Led;
    type Display: Display;
    type Backlight: Backlight;
    type AudioCodec: AudioCodec;
    type Touchpad: Touchpad;

    fn name(&self) -> &'static str;
    fn led(&mut self) -> &mut Self::Led;
    fn display(&self) -> &Self::Display;
    fn backlight(&mut self) -> &mut Self::Backlight;
    fn audio_codec(&mut self) -> &mut Self::AudioCodec;

    /// `None` means no gesture events will ever be delivered; it is not an error.
    fn touchpad(&self) -> Option<&Self::Touchpad>;

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::LED
            | Capabilities::DISPLAY
            | Capabilities::BACKLIGHT
            | Capabilities::AUDIO_CODEC;
        if self.touchpad().is_some() {
            caps |= Capabilities::TOUCHPAD;
        }
        caps
    }
}
