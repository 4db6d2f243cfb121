//! PWM backlight
//!
//! The LCD backlight is driven through an LEDC channel. On this board the
//! enable line is inverted, so 100 % brightness is 0 % duty.

use embedded_hal::pwm::{Error, ErrorKind, SetDutyCycle};
use log::{debug, info};

use crate::capability::Backlight;
use crate::config::DEFAULT_BRIGHTNESS;
use crate::settings::{Setting, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklightError {
    Pwm(ErrorKind),
}

pub struct PwmBacklight<P, S> {
    pwm: P,
    settings: S,
    invert: bool,
    brightness: u8,
    restored: bool,
}

impl<P, S> PwmBacklight<P, S>
where
    P: SetDutyCycle,
    S: SettingsStore,
{
    /// Does not touch the output; call [`Backlight::restore_brightness`] once
    /// the panel shows something.
    pub fn new(pwm: P, settings: S, invert: bool) -> Self {
        Self {
            pwm,
            settings,
            invert,
            brightness: 0,
            restored: false,
        }
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    fn apply(&mut self, level: u8) -> Result<(), BacklightError> {
        let duty = if self.invert { 100 - level } else { level };
        self.pwm
            .set_duty_cycle_percent(duty)
            .map_err(|e| BacklightError::Pwm(e.kind()))?;
        self.brightness = level;
        Ok(())
    }
}

impl<P, S> Backlight for PwmBacklight<P, S>
where
    P: SetDutyCycle,
    S: SettingsStore,
{
    type Error = BacklightError;

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn set_brightness(&mut self, level: u8, permanent: bool) -> Result<(), BacklightError> {
        let level = level.min(100);
        if permanent {
            self.settings.set(Setting::Brightness, level);
        }
        self.apply(level)
    }

    /// Only the first call has an effect.
    fn restore_brightness(&mut self) -> Result<(), BacklightError> {
        if self.restored {
            debug!("backlight already restored");
            return Ok(());
        }
        let level = self
            .settings
            .get_or(Setting::Brightness, DEFAULT_BRIGHTNESS)
            .min(100);
        self.apply(level)?;
        self.restored = true;
        info!("backlight restored to {level}%");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;
    use crate::testing::FakePwm;

    #[test]
    fn test_restore_uses_default() {
        let pwm = FakePwm::default();
        let mut backlight = PwmBacklight::new(pwm.clone(), MemorySettings::new(), false);
        assert_eq!(pwm.duty(), None);

        backlight.restore_brightness().unwrap();
        assert_eq!(backlight.brightness(), DEFAULT_BRIGHTNESS);
        assert_eq!(pwm.duty(), Some(75));
    }

    #[test]
    fn test_restore_uses_persisted_level() {
        let pwm = FakePwm::default();
        let mut settings = MemorySettings::new();
        settings.set(Setting::Brightness, 40);
        let mut backlight = PwmBacklight::new(pwm.clone(), settings, true);

        backlight.restore_brightness().unwrap();
        assert_eq!(backlight.brightness(), 40);
        assert_eq!(pwm.duty(), Some(60));
    }

    #[test]
    fn test_restore_applies_once() {
        let pwm = FakePwm::default();
        let mut backlight = PwmBacklight::new(pwm.clone(), MemorySettings::new(), false);
        backlight.restore_brightness().unwrap();
        backlight.set_brightness(10, false).unwrap();
        backlight.restore_brightness().unwrap();

        assert_eq!(backlight.brightness(), 10);
        assert_eq!(*pwm.duties.borrow(), [75, 10]);
    }

    #[test]
    fn test_permanent_level_is_persisted() {
        let mut backlight = PwmBacklight::new(FakePwm::default(), MemorySettings::new(), false);
        backlight.set_brightness(30, false).unwrap();
        assert_eq!(backlight.settings().get(Setting::Brightness), None);

        backlight.set_brightness(180, true).unwrap();
        assert_eq!(backlight.brightness(), 100);
        assert_eq!(backlight.settings().get(Setting::Brightness), Some(100));
    }
}
