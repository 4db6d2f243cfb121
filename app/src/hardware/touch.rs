//! Touchpad hardware initialization module
//!
//! The CST816D sits on its own I2C port. It is only probed when the touch
//! detect line reported a fitted controller.

use drivers::cst816d::Cst816d;
use esp_hal::i2c::master::I2c;
use esp_hal::Blocking;
use log::{info, warn};
use s3_lcd_box::config::TOUCH_I2C_ADDRESS;
use s3_lcd_box::error::{BringUpError, BringUpStep};

/// Type alias for the CST816D touchpad driver instance
pub type TouchController = Cst816d<I2c<'static, Blocking>>;

/// Creates the CST816D driver; the constructor reads and logs the chip id.
///
/// # Arguments
///
/// * `i2c` - Touch I2C bus, owned exclusively by the controller
///
/// # Errors
///
/// Returns a [`BringUpStep::TouchController`] error if the controller does
/// not answer.
pub fn initialize_touchpad(i2c: I2c<'static, Blocking>) -> Result<TouchController, BringUpError> {
    info!("Init CST816D");
    let touchpad = Cst816d::new(i2c, TOUCH_I2C_ADDRESS).map_err(|e| {
        warn!("CST816D not responding: {e:?}");
        BringUpError::driver(BringUpStep::TouchController)
    })?;
    info!("Touchpad chip ID: 0x{:02X}", touchpad.chip_id());
    Ok(touchpad)
}
