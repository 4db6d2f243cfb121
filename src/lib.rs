#![cfg_attr(not(test), no_std)]
//! Board support for the ESP32-S3 1.28" round LCD box
//!
//! The board exposes its status LED, round GC9A01 display, PWM backlight,
//! ES8311 audio codec and optional CST816D touch panel to a generic chat
//! application through the traits in [`capability`]. [`bring_up::bring_up`]
//! initialises the peripherals in their required order and returns the
//! finished [`board::LcdBox`] together with the input handlers that still
//! have to be driven by tasks.

extern crate alloc;

pub mod backlight;
pub mod board;
pub mod bring_up;
pub mod button;
pub mod capability;
pub mod chat;
pub mod codec;
pub mod config;
pub mod display;
pub mod error;
pub mod framework;
pub mod iot;
pub mod led;
pub mod settings;
pub mod touch;

#[cfg(test)]
mod testing;

pub use board::{LcdBox, SharedState};
pub use bring_up::{bring_up, BoardHardware, BringUp};
pub use config::BoardConfig;
pub use error::BringUpError;
