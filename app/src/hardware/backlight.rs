//! Backlight hardware initialization module
//!
//! The backlight is dimmed by an LEDC low speed channel. [`LedcChannel`]
//! adapts the channel to the embedded-hal PWM trait so the board's
//! [`PwmBacklight`] can drive it.

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::{GPIO42, LEDC};
use esp_hal::time::Rate;
use log::{info, warn};
use s3_lcd_box::backlight::PwmBacklight;
use s3_lcd_box::error::{BringUpError, BringUpStep};
use static_cell::StaticCell;

use crate::settings::RtcSettings;

pub type BoardBacklight = PwmBacklight<LedcChannel, RtcSettings>;

const BACKLIGHT_PWM_KHZ: u32 = 25;

pub struct LedcChannel {
    channel: channel::Channel<'static, LowSpeed>,
}

impl ErrorType for LedcChannel {
    type Error = ErrorKind;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        100
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), ErrorKind> {
        self.channel
            .set_duty(duty.min(100) as u8)
            .map_err(|_| ErrorKind::Other)
    }
}

/// Configures LEDC timer 0 and channel 0 on the backlight pin.
///
/// The output starts dark; brightness is applied when the board restores
/// the persisted level.
pub fn initialize_backlight(
    ledc: LEDC<'static>,
    pin: GPIO42<'static>,
    settings: RtcSettings,
    invert: bool,
) -> Result<BoardBacklight, BringUpError> {
    let mut ledc = Ledc::new(ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    static TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();
    let lstimer = TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    lstimer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty10Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(BACKLIGHT_PWM_KHZ),
        })
        .map_err(|e| {
            warn!("LEDC timer config failed: {e:?}");
            BringUpError::bus(BringUpStep::Backlight)
        })?;
    let lstimer: &'static timer::Timer<'static, LowSpeed> = lstimer;

    let mut channel = ledc.channel(channel::Number::Channel0, pin);
    channel
        .configure(channel::config::Config {
            timer: lstimer,
            duty_pct: if invert { 100 } else { 0 },
            pin_config: channel::config::PinConfig::PushPull,
        })
        .map_err(|e| {
            warn!("LEDC channel config failed: {e:?}");
            BringUpError::bus(BringUpStep::Backlight)
        })?;

    info!("backlight PWM at {BACKLIGHT_PWM_KHZ} kHz");
    Ok(PwmBacklight::new(LedcChannel { channel }, settings, invert))
}
