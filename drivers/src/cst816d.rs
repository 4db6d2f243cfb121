// https://github.com/fbiego/CST816S
use core::fmt::{Display, Formatter};

use embedded_hal::i2c::{Error, I2c};
use log::info;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::RegisterDevice;

/// Default 7-bit slave address of the CST816 family.
pub const CST816D_ADDRESS: u8 = 0x15;

/// Number of bytes in a single touch report, starting at [`REG_FINGER_NUM`].
pub const RAW_TOUCH_REPORT_LEN: usize = 6;

const REG_FINGER_NUM: u8 = 0x02;
const REG_CHIP_ID: u8 = 0xA3;

#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipID {
    CST716 = 0x20,
    CST816S = 0xB4,
    CST816T = 0xB5,
    CST816D = 0xB6,
}

impl Display for ChipID {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ChipID::CST716 => write!(f, "CST716"),
            ChipID::CST816S => write!(f, "CST816S"),
            ChipID::CST816T => write!(f, "CST816T"),
            ChipID::CST816D => write!(f, "CST816D"),
        }
    }
}

/// One decoded touch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    /// Number of fingers currently on the panel.
    pub num: u8,
    pub x: i32,
    pub y: i32,
}

impl Default for TouchPoint {
    fn default() -> Self {
        Self { num: 0, x: -1, y: -1 }
    }
}

impl TouchPoint {
    /// Decodes the six bytes read from the finger-count register onwards.
    pub fn from_report(report: &[u8; RAW_TOUCH_REPORT_LEN]) -> Self {
        let x = (i32::from(report[1] & 0x0F) << 8) | i32::from(report[2]);
        let y = (i32::from(report[3] & 0x0F) << 8) | i32::from(report[4]);
        Self {
            num: report[0] & 0x0F,
            x,
            y,
        }
    }
}

/// Errors that can occur when interacting with the CST816D
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchSensorError {
    I2CError,
}

impl<E> From<E> for TouchSensorError
where
    E: Error,
{
    fn from(_: E) -> Self {
        TouchSensorError::I2CError
    }
}

/// CST816D touch controller polled over I2C.
#[derive(Debug)]
pub struct Cst816d<I2C> {
    dev: RegisterDevice<I2C>,
    chip_id: u8,
    point: TouchPoint,
}

impl<I2C> Cst816d<I2C>
where
    I2C: I2c,
{
    /// Creates the driver and reads the chip id to verify the controller answers.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, TouchSensorError> {
        let mut dev = RegisterDevice::new(i2c, address);
        let chip_id = dev.read_register(REG_CHIP_ID)?;
        match ChipID::try_from(chip_id) {
            Ok(chip) => info!("Get chip ID: 0x{chip_id:02X} ({chip})"),
            Err(_) => info!("Get chip ID: 0x{chip_id:02X}"),
        }
        Ok(Self {
            dev,
            chip_id,
            point: TouchPoint::default(),
        })
    }

    pub fn chip_id(&self) -> u8 {
        self.chip_id
    }

    /// Reads a fresh report; the cached point is left untouched when the read fails.
    pub fn update_touch_point(&mut self) -> Result<TouchPoint, TouchSensorError> {
        let mut report = [0u8; RAW_TOUCH_REPORT_LEN];
        self.dev.read_register_buffer(REG_FINGER_NUM, &mut report)?;
        self.point = TouchPoint::from_report(&report);
        Ok(self.point)
    }

    /// Last successfully read point.
    pub fn touch_point(&self) -> &TouchPoint {
        &self.point
    }

    pub fn release(self) -> I2C {
        self.dev.release()
    }
}
