use embedded_hal::i2c::{Error, I2c};
use log::info;

use crate::RegisterDevice;

/// ES8311 address with CE pulled low.
pub const ES8311_ADDRESS: u8 = 0x18;

const REG_DAC_MUTE: u8 = 0x31;
const REG_DAC_VOLUME: u8 = 0x32;
const REG_CHIP_ID1: u8 = 0xFD;
const REG_CHIP_ID2: u8 = 0xFE;

const CHIP_ID: [u8; 2] = [0x83, 0x11];
const DAC_MUTE_BITS: u8 = 0b0110_0000;
/// DAC volume register value for 0 dB; higher values add digital gain.
const DAC_VOLUME_0DB: u8 = 0xBF;

/// Errors that can occur when interacting with the ES8311
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    UnknownChip(u8, u8),
    I2CError,
}

impl<E> From<E> for CodecError
where
    E: Error,
{
    fn from(_: E) -> Self {
        CodecError::I2CError
    }
}

/// Control port of the ES8311 mono codec. Audio data flows over I2S and is not handled here.
#[derive(Debug)]
pub struct Es8311<I2C> {
    dev: RegisterDevice<I2C>,
}

impl<I2C> Es8311<I2C>
where
    I2C: I2c,
{
    /// Probes the chip id registers and fails if another part answers.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, CodecError> {
        let mut dev = RegisterDevice::new(i2c, address);
        let id1 = dev.read_register(REG_CHIP_ID1)?;
        let id2 = dev.read_register(REG_CHIP_ID2)?;
        if [id1, id2] != CHIP_ID {
            return Err(CodecError::UnknownChip(id1, id2));
        }
        info!("ES8311 found at 0x{address:02X}");
        Ok(Self { dev })
    }

    /// Sets the DAC volume in percent, 100 maps to 0 dB.
    pub fn set_volume(&mut self, percent: u8) -> Result<(), CodecError> {
        let percent = percent.min(100) as u16;
        let value = (percent * DAC_VOLUME_0DB as u16 / 100) as u8;
        self.dev.write_register(&[REG_DAC_VOLUME, value])?;
        Ok(())
    }

    pub fn volume_register(&mut self) -> Result<u8, CodecError> {
        Ok(self.dev.read_register(REG_DAC_VOLUME)?)
    }

    pub fn set_mute(&mut self, mute: bool) -> Result<(), CodecError> {
        let mut reg = self.dev.read_register(REG_DAC_MUTE)?;
        if mute {
            reg |= DAC_MUTE_BITS;
        } else {
            reg &= !DAC_MUTE_BITS;
        }
        self.dev.write_register(&[REG_DAC_MUTE, reg])?;
        Ok(())
    }

    pub fn is_muted(&mut self) -> Result<bool, CodecError> {
        let reg = self.dev.read_register(REG_DAC_MUTE)?;
        Ok(reg & DAC_MUTE_BITS == DAC_MUTE_BITS)
    }
}
