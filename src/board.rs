//! Board instance
//!
//! [`LcdBox`] owns every peripheral bound during bring-up and exposes them
//! through the [`Board`] capability interface.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::bring_up::BoardHardware;
use crate::capability::{Board, Touchpad};
use crate::display::{LcdDisplay, UiLock, UiState};
use crate::touch::{TouchLink, TouchShared};

pub const BOARD_NAME: &str = "esp32-s3-lcd-1.28-box";

/// State shared between the board, its input tasks and the renderer.
pub struct SharedState<M: RawMutex> {
    pub ui: UiLock<M>,
    pub touch: TouchShared<M>,
    pub button_stop: Signal<M, ()>,
}

impl<M: RawMutex> Default for SharedState<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> SharedState<M> {
    pub const fn new() -> Self {
        Self {
            ui: UiLock::new(UiState::new()),
            touch: TouchShared::new(),
            button_stop: Signal::new(),
        }
    }
}

pub struct LcdBox<'a, H, M>
where
    H: BoardHardware,
    M: RawMutex,
{
    led: H::Led,
    display: LcdDisplay<'a, M, H::Panel>,
    backlight: H::Backlight,
    audio_codec: H::AudioCodec,
    touchpad: Option<TouchLink<'a, M>>,
    shared: &'a SharedState<M>,
}

impl<'a, H, M> LcdBox<'a, H, M>
where
    H: BoardHardware,
    M: RawMutex,
{
    pub(crate) fn new(
        led: H::Led,
        display: LcdDisplay<'a, M, H::Panel>,
        backlight: H::Backlight,
        audio_codec: H::AudioCodec,
        touchpad: Option<TouchLink<'a, M>>,
        shared: &'a SharedState<M>,
    ) -> Self {
        Self {
            led,
            display,
            backlight,
            audio_codec,
            touchpad,
            shared,
        }
    }

    pub fn display_mut(&mut self) -> &mut LcdDisplay<'a, M, H::Panel> {
        &mut self.display
    }

    /// Stops touch polling and boot button handling.
    pub fn stop_input(&self) {
        if let Some(touchpad) = &self.touchpad {
            touchpad.stop();
        }
        self.shared.button_stop.signal(());
    }
}

impl<'a, H, M> Board for LcdBox<'a, H, M>
where
    H: BoardHardware,
    M: RawMutex,
{
    type Led = H::Led;
    type Display = LcdDisplay<'a, M, H::Panel>;
    type Backlight = H::Backlight;
    type AudioCodec = H::AudioCodec;
    type Touchpad = TouchLink<'a, M>;

    fn name(&self) -> &'static str {
        BOARD_NAME
    }

    fn led(&mut self) -> &mut H::Led {
        &mut self.led
    }

    fn display(&self) -> &Self::Display {
        &self.display
    }

    fn backlight(&mut self) -> &mut H::Backlight {
        &mut self.backlight
    }

    fn audio_codec(&mut self) -> &mut H::AudioCodec {
        &mut self.audio_codec
    }

    fn touchpad(&self) -> Option<&TouchLink<'a, M>> {
        self.touchpad.as_ref()
    }
}
