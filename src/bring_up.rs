//! Initialization orchestrator
//!
//! Brings the board up in a fixed order, branching once on whether a touch
//! controller is fitted. Any failing step aborts bring-up; nothing is left
//! half initialised for the application to trip over.
//!
//! The order is:
//! 1. touch detect line, and if high the touch bus and controller
//! 2. codec I2C bus
//! 3. SPI bus sized to one frame
//! 4. panel, then the display on top of it
//! 5. boot button
//! 6. IoT things
//! 7. LED, audio codec and backlight, then the persisted brightness

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;
use log::{error, info, warn};

use crate::board::{LcdBox, SharedState};
use crate::button::BootButton;
use crate::capability::{AudioCodec, Backlight, Board, Led};
use crate::config::{AudioCodecConfig, BoardConfig, PanelConfig};
use crate::display::LcdDisplay;
use crate::error::{BringUpError, BringUpStep, Cause};
use crate::iot::{ThingRegistry, SCREEN, SPEAKER};
use crate::touch::{TouchPoller, TouchSensor};

/// Chip-level bring-up of the board's peripherals.
///
/// Implementations own the raw peripherals and hand out initialised drivers.
/// Every method is called at most once, in the order documented on the
/// module.
pub trait BoardHardware {
    type TouchBus;
    type TouchSensor: TouchSensor;
    type CodecBus;
    type SpiBus;
    type Panel;
    type ButtonPin: Wait + InputPin;
    type Led: Led;
    type Backlight: Backlight;
    type AudioCodec: AudioCodec;

    /// Samples the touch detect line; high means a controller is fitted.
    fn touch_controller_present(&mut self) -> Result<bool, BringUpError>;

    fn init_touch_bus(&mut self) -> Result<Self::TouchBus, BringUpError>;

    fn init_touch_sensor(&mut self, bus: Self::TouchBus) -> Result<Self::TouchSensor, BringUpError>;

    fn init_codec_bus(&mut self) -> Result<Self::CodecBus, BringUpError>;

    fn init_spi_bus(&mut self, max_transfer_bytes: usize) -> Result<Self::SpiBus, BringUpError>;

    /// Installs panel IO and driver, then resets, initialises, applies colour
    /// inversion and mirroring and switches the panel on.
    fn init_panel(&mut self, spi: Self::SpiBus, config: &PanelConfig) -> Result<Self::Panel, BringUpError>;

    fn init_button(&mut self) -> Result<Self::ButtonPin, BringUpError>;

    fn init_led(&mut self) -> Result<Self::Led, BringUpError>;

    fn init_audio_codec(
        &mut self,
        bus: Self::CodecBus,
        config: &AudioCodecConfig,
    ) -> Result<Self::AudioCodec, BringUpError>;

    fn init_backlight(&mut self) -> Result<Self::Backlight, BringUpError>;

    /// Makes a failed bring-up visible on the device.
    fn indicate_fatal(&mut self, _error: &BringUpError) {}
}

/// Everything bring-up produces.
pub struct BringUp<'a, H, M>
where
    H: BoardHardware,
    M: RawMutex,
{
    pub board: LcdBox<'a, H, M>,
    /// Present when a touch controller was detected; must be driven by a task.
    pub touch: Option<TouchPoller<'a, H::TouchSensor, M>>,
    pub button: BootButton<H::ButtonPin>,
}

pub fn bring_up<'a, H, M>(
    hw: &mut H,
    config: &BoardConfig,
    shared: &'a SharedState<M>,
    things: &mut impl ThingRegistry,
) -> Result<BringUp<'a, H, M>, BringUpError>
where
    H: BoardHardware,
    M: RawMutex,
{
    match run(hw, config, shared, things) {
        Ok(bring_up) => {
            info!("board bring-up complete");
            Ok(bring_up)
        }
        Err(e) => {
            error!("board bring-up failed: {e}");
            hw.indicate_fatal(&e);
            Err(e)
        }
    }
}

fn run<'a, H, M>(
    hw: &mut H,
    config: &BoardConfig,
    shared: &'a SharedState<M>,
    things: &mut impl ThingRegistry,
) -> Result<BringUp<'a, H, M>, BringUpError>
where
    H: BoardHardware,
    M: RawMutex,
{
    let touch = if hw.touch_controller_present()? {
        info!("touch controller detected");
        let bus = hw.init_touch_bus()?;
        let sensor = hw.init_touch_sensor(bus)?;
        Some(TouchPoller::new(
            sensor,
            &shared.touch,
            config.touch_poll_period,
            config.long_press_threshold,
        ))
    } else {
        info!("no touch controller");
        None
    };

    let codec_bus = hw.init_codec_bus()?;
    info!("codec I2C bus ready");

    let frame_bytes = config.panel.geometry.frame_bytes();
    let spi = hw.init_spi_bus(frame_bytes)?;
    info!("SPI bus ready, max transfer {frame_bytes} bytes");

    let panel = hw.init_panel(spi, &config.panel)?;
    let display = LcdDisplay::new(
        panel,
        config.panel.geometry,
        &shared.ui,
        config.status_bar_padding_px(),
    )?;
    info!(
        "display ready ({}x{})",
        config.panel.geometry.width, config.panel.geometry.height
    );

    let button = BootButton::new(hw.init_button()?);

    things.add_thing(SPEAKER);
    things.add_thing(SCREEN);

    let led = hw.init_led()?;
    let audio_codec = hw.init_audio_codec(codec_bus, &config.audio)?;
    let backlight = hw.init_backlight()?;

    let touchpad = touch.as_ref().map(|poller| poller.link());
    let mut board = LcdBox::<H, M>::new(led, display, backlight, audio_codec, touchpad, shared);
    board.backlight().restore_brightness().map_err(|e| {
        warn!("restoring brightness failed: {e:?}");
        BringUpError::new(BringUpStep::Backlight, Cause::Driver)
    })?;

    Ok(BringUp {
        board,
        touch,
        button,
    })
}
