//! Hardware fakes for host tests.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::framework::{Application, DeviceState, WifiConfigReset, WifiStation};
use crate::touch::{TouchSample, TouchSensor};

pub use drivers::fake::FakeI2c;

/// ES8311 control port answering the chip id probe.
pub fn es8311_bus() -> FakeI2c {
    let mut i2c = FakeI2c::new(drivers::es8311::ES8311_ADDRESS);
    i2c.regs[0xFD] = 0x83;
    i2c.regs[0xFE] = 0x11;
    i2c
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadResult {
    Contacts(u8),
    Error,
}

/// Touch sensor replaying a script; released once the script runs out.
pub struct FakeTouchSensor {
    script: VecDeque<ReadResult>,
}

impl FakeTouchSensor {
    pub fn new(script: Vec<ReadResult>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl TouchSensor for FakeTouchSensor {
    type Error = ();

    fn read_sample(&mut self) -> Result<TouchSample, ()> {
        match self.script.pop_front().unwrap_or(ReadResult::Contacts(0)) {
            ReadResult::Contacts(0) => Ok(TouchSample::RELEASED),
            ReadResult::Contacts(n) => Ok(TouchSample {
                contact_count: n,
                x: 120,
                y: 120,
            }),
            ReadResult::Error => Err(()),
        }
    }
}

/// Output pin whose level history can be inspected through a clone.
#[derive(Clone, Default)]
pub struct FakeOutputPin {
    pub levels: Rc<RefCell<Vec<bool>>>,
}

impl FakeOutputPin {
    pub fn level(&self) -> Option<bool> {
        self.levels.borrow().last().copied()
    }
}

impl digital::ErrorType for FakeOutputPin {
    type Error = Infallible;
}

impl OutputPin for FakeOutputPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

/// PWM channel with a 0..=100 duty range so duty equals percent.
#[derive(Clone, Default)]
pub struct FakePwm {
    pub duties: Rc<RefCell<Vec<u16>>>,
}

impl FakePwm {
    pub fn duty(&self) -> Option<u16> {
        self.duties.borrow().last().copied()
    }
}

impl pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        100
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duties.borrow_mut().push(duty);
        Ok(())
    }
}

/// Boot button that is never pressed.
pub struct IdleButton;

impl digital::ErrorType for IdleButton {
    type Error = Infallible;
}

impl InputPin for IdleButton {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(false)
    }
}

impl embedded_hal_async::digital::Wait for IdleButton {
    async fn wait_for_high(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }

    async fn wait_for_low(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }
}

/// Calls made on the chat collaborators, in order.
pub type CallLog = Rc<RefCell<Vec<&'static str>>>;

pub struct FakeApp {
    pub state: DeviceState,
    pub log: CallLog,
}

impl Application for FakeApp {
    fn device_state(&self) -> DeviceState {
        self.state
    }

    fn toggle_chat_state(&mut self) {
        self.log.borrow_mut().push("toggle");
    }
}

pub struct FakeWifi(pub bool);

impl WifiStation for FakeWifi {
    fn is_connected(&self) -> bool {
        self.0
    }
}

pub struct FakeProvisioning(pub CallLog);

impl WifiConfigReset for FakeProvisioning {
    fn reset_wifi_configuration(&mut self) {
        self.0.borrow_mut().push("reset");
    }
}
