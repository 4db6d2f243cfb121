//! Hardware initialization modules
//!
//! [`EspHardware`] owns the raw peripherals of the ESP32-S3 1.28" LCD box and
//! hands out initialised drivers when the board bring-up asks for them.
//!
//! Pin assignment:
//!
//! - **Touchpad**: CST816D on I2C1, SDA GPIO11, SCL GPIO7, INT GPIO12 (also
//!   the presence detect line)
//! - **Audio codec**: ES8311 on I2C0, SDA GPIO15, SCL GPIO14, PA GPIO46
//! - **Display**: GC9A01 on SPI2, SCLK GPIO4, MOSI GPIO2, CS GPIO5, DC GPIO47,
//!   RST GPIO38
//! - **Backlight**: LEDC channel on GPIO42, active low
//! - **LED**: GPIO48
//! - **Boot button**: GPIO0

pub mod backlight;
pub mod display;
pub mod touch;

use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::peripherals::{
    DMA_CH0, GPIO0, GPIO11, GPIO12, GPIO14, GPIO15, GPIO2, GPIO38, GPIO4, GPIO42, GPIO46,
    GPIO47, GPIO48, GPIO5, GPIO7, I2C0, I2C1, LEDC, SPI2,
};
use esp_hal::spi::master::SpiDmaBus;
use esp_hal::time::Rate;
use esp_hal::Blocking;
use log::{info, warn};
use s3_lcd_box::codec::Es8311AudioCodec;
use s3_lcd_box::config::{AudioCodecConfig, PanelConfig};
use s3_lcd_box::error::{BringUpError, BringUpStep, Cause};
use s3_lcd_box::led::GpioLed;
use s3_lcd_box::BoardHardware;

use crate::settings::RtcSettings;
pub use backlight::{initialize_backlight, BoardBacklight};
pub use display::{initialize_panel, initialize_spi_bus, LcdPanel};
pub use touch::{initialize_touchpad, TouchController};

/// Backlight PWM is inverted on this board.
pub const BACKLIGHT_OUTPUT_INVERT: bool = true;

/// Bus clock shared by both I2C ports.
const I2C_FREQUENCY_KHZ: u32 = 400;

/// Raw peripherals used by the board.
pub struct BoardPeripherals {
    pub touch_int: GPIO12<'static>,
    pub touch_i2c: I2C1<'static>,
    pub touch_sda: GPIO11<'static>,
    pub touch_scl: GPIO7<'static>,
    pub codec_i2c: I2C0<'static>,
    pub codec_sda: GPIO15<'static>,
    pub codec_scl: GPIO14<'static>,
    pub codec_pa: GPIO46<'static>,
    pub spi: SPI2<'static>,
    pub dma: DMA_CH0<'static>,
    pub lcd_sclk: GPIO4<'static>,
    pub lcd_mosi: GPIO2<'static>,
    pub lcd_cs: GPIO5<'static>,
    pub lcd_dc: GPIO47<'static>,
    pub lcd_rst: GPIO38<'static>,
    pub ledc: LEDC<'static>,
    pub backlight: GPIO42<'static>,
    pub led: GPIO48<'static>,
    pub button: GPIO0<'static>,
}

/// Hands out each peripheral group exactly once.
pub struct EspHardware {
    touch_int: Option<GPIO12<'static>>,
    touch_bus: Option<(I2C1<'static>, GPIO11<'static>, GPIO7<'static>)>,
    codec_bus: Option<(I2C0<'static>, GPIO15<'static>, GPIO14<'static>)>,
    codec_pa: Option<GPIO46<'static>>,
    spi: Option<(SPI2<'static>, DMA_CH0<'static>, GPIO4<'static>, GPIO2<'static>)>,
    lcd: Option<(GPIO5<'static>, GPIO47<'static>, GPIO38<'static>)>,
    backlight: Option<(LEDC<'static>, GPIO42<'static>)>,
    led: Option<GPIO48<'static>>,
    button: Option<GPIO0<'static>>,
    fatal_led: Option<Output<'static>>,
}

impl EspHardware {
    pub fn new(p: BoardPeripherals) -> Self {
        Self {
            touch_int: Some(p.touch_int),
            touch_bus: Some((p.touch_i2c, p.touch_sda, p.touch_scl)),
            codec_bus: Some((p.codec_i2c, p.codec_sda, p.codec_scl)),
            codec_pa: Some(p.codec_pa),
            spi: Some((p.spi, p.dma, p.lcd_sclk, p.lcd_mosi)),
            lcd: Some((p.lcd_cs, p.lcd_dc, p.lcd_rst)),
            backlight: Some((p.ledc, p.backlight)),
            led: Some(p.led),
            button: Some(p.button),
            fatal_led: None,
        }
    }
}

fn taken(step: BringUpStep) -> BringUpError {
    BringUpError::new(step, Cause::Busy)
}

fn i2c_bus(step: BringUpStep) -> impl FnOnce(esp_hal::i2c::master::ConfigError) -> BringUpError {
    move |e| {
        warn!("I2C config rejected: {e:?}");
        BringUpError::bus(step)
    }
}

impl BoardHardware for EspHardware {
    type TouchBus = I2c<'static, Blocking>;
    type TouchSensor = TouchController;
    type CodecBus = I2c<'static, Blocking>;
    type SpiBus = SpiDmaBus<'static, Blocking>;
    type Panel = LcdPanel;
    type ButtonPin = Input<'static>;
    type Led = GpioLed<Output<'static>>;
    type Backlight = BoardBacklight;
    type AudioCodec = Es8311AudioCodec<I2c<'static, Blocking>, Output<'static>>;

    fn touch_controller_present(&mut self) -> Result<bool, BringUpError> {
        let pin = self
            .touch_int
            .take()
            .ok_or(taken(BringUpStep::TouchDetect))?;
        let detect = Input::new(pin, InputConfig::default().with_pull(Pull::None));
        Ok(detect.is_high())
    }

    fn init_touch_bus(&mut self) -> Result<Self::TouchBus, BringUpError> {
        let (i2c, sda, scl) = self.touch_bus.take().ok_or(taken(BringUpStep::TouchBus))?;
        let bus = I2c::new(
            i2c,
            I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ)),
        )
        .map_err(i2c_bus(BringUpStep::TouchBus))?
        .with_sda(sda)
        .with_scl(scl);
        info!("touch I2C bus ready");
        Ok(bus)
    }

    fn init_touch_sensor(&mut self, bus: Self::TouchBus) -> Result<Self::TouchSensor, BringUpError> {
        initialize_touchpad(bus)
    }

    fn init_codec_bus(&mut self) -> Result<Self::CodecBus, BringUpError> {
        let (i2c, sda, scl) = self.codec_bus.take().ok_or(taken(BringUpStep::CodecBus))?;
        let bus = I2c::new(
            i2c,
            I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ)),
        )
        .map_err(i2c_bus(BringUpStep::CodecBus))?
        .with_sda(sda)
        .with_scl(scl);
        Ok(bus)
    }

    fn init_spi_bus(&mut self, max_transfer_bytes: usize) -> Result<Self::SpiBus, BringUpError> {
        let (spi, dma, sclk, mosi) = self.spi.take().ok_or(taken(BringUpStep::SpiBus))?;
        initialize_spi_bus(spi, dma, sclk, mosi, max_transfer_bytes)
    }

    fn init_panel(&mut self, spi: Self::SpiBus, config: &PanelConfig) -> Result<Self::Panel, BringUpError> {
        let (cs, dc, rst) = self.lcd.take().ok_or(taken(BringUpStep::Panel))?;
        initialize_panel(spi, cs, dc, rst, config)
    }

    fn init_button(&mut self) -> Result<Self::ButtonPin, BringUpError> {
        let pin = self.button.take().ok_or(taken(BringUpStep::Button))?;
        Ok(Input::new(pin, InputConfig::default().with_pull(Pull::Up)))
    }

    fn init_led(&mut self) -> Result<Self::Led, BringUpError> {
        let pin = self.led.take().ok_or(taken(BringUpStep::Led))?;
        let output = Output::new(pin, Level::Low, OutputConfig::default());
        GpioLed::new(output).map_err(|_| BringUpError::pin(BringUpStep::Led))
    }

    fn init_audio_codec(
        &mut self,
        bus: Self::CodecBus,
        config: &AudioCodecConfig,
    ) -> Result<Self::AudioCodec, BringUpError> {
        let pa = self.codec_pa.take().ok_or(taken(BringUpStep::AudioCodec))?;
        let pa = Output::new(pa, Level::Low, OutputConfig::default());
        let codec = drivers::es8311::Es8311::new(bus, config.codec_address).map_err(|e| {
            warn!("ES8311 probe failed: {e:?}");
            BringUpError::driver(BringUpStep::AudioCodec)
        })?;
        Es8311AudioCodec::new(codec, pa, *config).map_err(|e| {
            warn!("audio codec setup failed: {e:?}");
            BringUpError::pin(BringUpStep::AudioCodec)
        })
    }

    fn init_backlight(&mut self) -> Result<Self::Backlight, BringUpError> {
        let (ledc, pin) = self.backlight.take().ok_or(taken(BringUpStep::Backlight))?;
        initialize_backlight(ledc, pin, RtcSettings, BACKLIGHT_OUTPUT_INVERT)
    }

    /// Lights the status LED if bring-up failed before it was handed out.
    fn indicate_fatal(&mut self, _error: &BringUpError) {
        if let Some(pin) = self.led.take() {
            self.fatal_led = Some(Output::new(pin, Level::High, OutputConfig::default()));
        }
    }
}
