use drivers::es8311::{CodecError, Es8311};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use log::info;

use crate::capability::AudioCodec;
use crate::config::AudioCodecConfig;

/// Output volume until the application sets one.
pub const DEFAULT_OUTPUT_VOLUME: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioError {
    Codec(CodecError),
    /// Power amplifier enable pin.
    Amplifier,
}

impl From<CodecError> for AudioError {
    fn from(e: CodecError) -> Self {
        AudioError::Codec(e)
    }
}

/// ES8311 codec with its external power amplifier.
pub struct Es8311AudioCodec<I2C, PA> {
    codec: Es8311<I2C>,
    pa: PA,
    config: AudioCodecConfig,
    output_volume: u8,
    input_enabled: bool,
    output_enabled: bool,
}

impl<I2C, PA> Es8311AudioCodec<I2C, PA>
where
    I2C: I2c,
    PA: OutputPin,
{
    /// Starts with both paths disabled and the amplifier off.
    pub fn new(codec: Es8311<I2C>, mut pa: PA, config: AudioCodecConfig) -> Result<Self, AudioError> {
        pa.set_low().map_err(|_| AudioError::Amplifier)?;
        info!(
            "audio codec: {} Hz in, {} Hz out",
            config.input_sample_rate, config.output_sample_rate
        );
        Ok(Self {
            codec,
            pa,
            config,
            output_volume: DEFAULT_OUTPUT_VOLUME,
            input_enabled: false,
            output_enabled: false,
        })
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn output_enabled(&self) -> bool {
        self.output_enabled
    }
}

impl<I2C, PA> AudioCodec for Es8311AudioCodec<I2C, PA>
where
    I2C: I2c,
    PA: OutputPin,
{
    type Error = AudioError;

    fn config(&self) -> &AudioCodecConfig {
        &self.config
    }

    fn output_volume(&self) -> u8 {
        self.output_volume
    }

    fn set_output_volume(&mut self, volume: u8) -> Result<(), AudioError> {
        let volume = volume.min(100);
        self.codec.set_volume(volume)?;
        self.output_volume = volume;
        Ok(())
    }

    fn enable_input(&mut self, enable: bool) -> Result<(), AudioError> {
        self.input_enabled = enable;
        Ok(())
    }

    fn enable_output(&mut self, enable: bool) -> Result<(), AudioError> {
        if enable == self.output_enabled {
            return Ok(());
        }
        if enable {
            self.codec.set_volume(self.output_volume)?;
            self.codec.set_mute(false)?;
            self.pa.set_high().map_err(|_| AudioError::Amplifier)?;
        } else {
            self.pa.set_low().map_err(|_| AudioError::Amplifier)?;
            self.codec.set_mute(true)?;
        }
        self.output_enabled = enable;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::testing::{es8311_bus, FakeOutputPin};
    use drivers::es8311::ES8311_ADDRESS;

    fn codec(pa: FakeOutputPin) -> Es8311AudioCodec<crate::testing::FakeI2c, FakeOutputPin> {
        let es8311 = Es8311::new(es8311_bus(), ES8311_ADDRESS).unwrap();
        Es8311AudioCodec::new(es8311, pa, BoardConfig::DEFAULT.audio).unwrap()
    }

    #[test]
    fn test_config_is_passed_through() {
        let codec = codec(FakeOutputPin::default());
        assert_eq!(*codec.config(), BoardConfig::DEFAULT.audio);
        assert_eq!(codec.input_sample_rate(), 24_000);
        assert_eq!(codec.output_sample_rate(), 24_000);
        assert_eq!(codec.output_volume(), DEFAULT_OUTPUT_VOLUME);
    }

    #[test]
    fn test_output_drives_amplifier() {
        let pa = FakeOutputPin::default();
        let mut codec = codec(pa.clone());
        assert_eq!(pa.level(), Some(false));

        codec.enable_output(true).unwrap();
        assert!(codec.output_enabled());
        assert_eq!(pa.level(), Some(true));

        codec.enable_output(false).unwrap();
        assert_eq!(pa.level(), Some(false));
        assert_eq!(*pa.levels.borrow(), [false, true, false]);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut codec = codec(FakeOutputPin::default());
        codec.set_output_volume(130).unwrap();
        assert_eq!(codec.output_volume(), 100);
    }

    #[test]
    fn test_input_toggle() {
        let mut codec = codec(FakeOutputPin::default());
        codec.enable_input(true).unwrap();
        assert!(codec.input_enabled());
        assert!(!codec.output_enabled());
    }
}
