//! Board configuration
//!
//! Geometry, codec and timing parameters of the ESP32-S3 1.28" LCD box.
//! Pin numbers for the audio path are carried as plain GPIO numbers and are
//! handed to the codec glue unchanged.

use embassy_time::Duration;

/// Display resolution width in pixels
pub const DISPLAY_WIDTH: u16 = 240;
/// Display resolution height in pixels
pub const DISPLAY_HEIGHT: u16 = 240;

/// Default persisted backlight level in percent
pub const DEFAULT_BRIGHTNESS: u8 = 75;

/// I2C address of the CST816D touch controller
pub const TOUCH_I2C_ADDRESS: u8 = 0x15;

/// Colour component order expected by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbOrder {
    Rgb,
    Bgr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub width: u16,
    pub height: u16,
    pub offset_x: i16,
    pub offset_y: i16,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub swap_xy: bool,
}

impl DisplayGeometry {
    /// Bytes needed for one full RGB565 frame.
    pub const fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * core::mem::size_of::<u16>()
    }
}

/// Everything the panel driver needs during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub geometry: DisplayGeometry,
    pub invert_colors: bool,
    pub rgb_order: RgbOrder,
    pub bits_per_pixel: u8,
    pub pixel_clock_hz: u32,
}

/// I2S pin assignment of the codec, as GPIO numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2sPins {
    pub mclk: u8,
    pub bclk: u8,
    pub ws: u8,
    pub dout: u8,
    pub din: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCodecConfig {
    pub input_sample_rate: u32,
    pub output_sample_rate: u32,
    pub i2s: I2sPins,
    pub pa_pin: u8,
    pub codec_address: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    pub panel: PanelConfig,
    pub audio: AudioCodecConfig,
    /// Interval between two touch controller reads.
    pub touch_poll_period: Duration,
    /// Contacts lasting at least this long never produce a tap.
    pub long_press_threshold: Duration,
    /// Horizontal status bar padding as a fraction of the display width.
    pub status_bar_padding: f32,
}

impl BoardConfig {
    pub const DEFAULT: BoardConfig = BoardConfig {
        panel: PanelConfig {
            geometry: DisplayGeometry {
                width: DISPLAY_WIDTH,
                height: DISPLAY_HEIGHT,
                offset_x: 0,
                offset_y: 0,
                mirror_x: true,
                mirror_y: false,
                swap_xy: false,
            },
            invert_colors: true,
            rgb_order: RgbOrder::Bgr,
            bits_per_pixel: 16,
            pixel_clock_hz: 40_000_000,
        },
        audio: AudioCodecConfig {
            input_sample_rate: 24_000,
            output_sample_rate: 24_000,
            i2s: I2sPins {
                mclk: 16,
                bclk: 9,
                ws: 45,
                dout: 8,
                din: 10,
            },
            pa_pin: 46,
            codec_address: drivers::es8311::ES8311_ADDRESS,
        },
        touch_poll_period: Duration::from_millis(10),
        long_press_threshold: Duration::from_millis(500),
        status_bar_padding: 0.33,
    };

    /// Status bar padding in pixels, truncated like the GUI toolkit does.
    pub fn status_bar_padding_px(&self) -> u16 {
        (self.panel.geometry.width as f32 * self.status_bar_padding) as u16
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_buffer_size() {
        assert_eq!(
            BoardConfig::DEFAULT.panel.geometry.frame_bytes(),
            240 * 240 * 2
        );
    }

    #[test]
    fn test_status_bar_padding() {
        assert_eq!(BoardConfig::DEFAULT.status_bar_padding_px(), 79);
    }
}
