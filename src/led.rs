use embedded_hal::digital::{Error, OutputPin};
use log::warn;

use crate::capability::Led;

/// Single-colour status LED on a push-pull GPIO, lit when high.
pub struct GpioLed<P> {
    pin: P,
    on: bool,
}

impl<P> GpioLed<P>
where
    P: OutputPin,
{
    /// Takes the pin and switches the LED off.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, on: false })
    }
}

impl<P> Led for GpioLed<P>
where
    P: OutputPin,
{
    fn turn_on(&mut self) {
        match self.pin.set_high() {
            Ok(()) => self.on = true,
            Err(e) => warn!("LED on failed: {:?}", e.kind()),
        }
    }

    fn turn_off(&mut self) {
        match self.pin.set_low() {
            Ok(()) => self.on = false,
            Err(e) => warn!("LED off failed: {:?}", e.kind()),
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::DeviceState;
    use crate::testing::FakeOutputPin;

    #[test]
    fn test_starts_off() {
        let pin = FakeOutputPin::default();
        let led = GpioLed::new(pin.clone()).unwrap();
        assert!(!led.is_on());
        assert_eq!(pin.level(), Some(false));
    }

    #[test]
    fn test_toggle() {
        let pin = FakeOutputPin::default();
        let mut led = GpioLed::new(pin.clone()).unwrap();
        led.toggle();
        assert!(led.is_on());
        assert_eq!(pin.level(), Some(true));
        led.toggle();
        assert_eq!(pin.level(), Some(false));
    }

    #[test]
    fn test_follows_device_state() {
        let pin = FakeOutputPin::default();
        let mut led = GpioLed::new(pin.clone()).unwrap();
        led.on_state_changed(DeviceState::Listening);
        assert!(led.is_on());
        led.on_state_changed(DeviceState::Idle);
        assert!(!led.is_on());
        led.on_state_changed(DeviceState::FatalError);
        assert_eq!(pin.level(), Some(true));
    }
}
