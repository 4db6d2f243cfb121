//! Touch input
//!
//! A periodic poller reads the touch controller every tick and feeds the
//! samples into a debounce state machine that recognises taps.

mod classifier;
mod poller;

pub use classifier::{GestureClassifier, GestureState, Tap};
pub use poller::{next_deadline, TouchLink, TouchPoller, TouchShared};

use core::fmt::Debug;

use drivers::cst816d::{Cst816d, TouchSensorError};
use embedded_hal::i2c::I2c;

/// One raw reading of the touch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchSample {
    pub contact_count: u8,
    pub x: i32,
    pub y: i32,
}

impl TouchSample {
    pub const RELEASED: TouchSample = TouchSample {
        contact_count: 0,
        x: -1,
        y: -1,
    };

    pub const fn is_touched(&self) -> bool {
        self.contact_count > 0
    }
}

impl Default for TouchSample {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// Source of touch samples, one bus transaction per call.
pub trait TouchSensor {
    type Error: Debug;

    fn read_sample(&mut self) -> Result<TouchSample, Self::Error>;
}

impl<I2C> TouchSensor for Cst816d<I2C>
where
    I2C: I2c,
{
    type Error = TouchSensorError;

    fn read_sample(&mut self) -> Result<TouchSample, Self::Error> {
        let point = self.update_touch_point()?;
        Ok(TouchSample {
            contact_count: point.num,
            x: point.x,
            y: point.y,
        })
    }
}
