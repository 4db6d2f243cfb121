use alloc::rc::Rc;
use embassy_time::Instant;
use log::debug;
use s3_lcd_box::config::DisplayGeometry;
use slint::platform::software_renderer::{MinimalSoftwareWindow, RepaintBufferType};
use slint::platform::{Platform, WindowAdapter};
use slint::{PhysicalSize, PlatformError};

/// Slint platform for the round panel: one fixed-size software window and a
/// clock counted from platform creation.
pub struct LcdBoxPlatform {
    window: Rc<MinimalSoftwareWindow>,
    started: Instant,
}

impl LcdBoxPlatform {
    /// Creates the platform and the window it hands to slint, sized to the panel.
    pub fn new(geometry: DisplayGeometry) -> (Self, Rc<MinimalSoftwareWindow>) {
        let window = MinimalSoftwareWindow::new(RepaintBufferType::ReusedBuffer);
        window.set_size(PhysicalSize::new(
            geometry.width.into(),
            geometry.height.into(),
        ));
        let platform = Self {
            window: window.clone(),
            started: Instant::now(),
        };
        (platform, window)
    }
}

impl Platform for LcdBoxPlatform {
    fn create_window_adapter(&self) -> Result<Rc<dyn WindowAdapter>, PlatformError> {
        debug!("slint window adapter requested");
        Ok(self.window.clone())
    }

    fn duration_since_start(&self) -> core::time::Duration {
        self.started.elapsed().into()
    }

    fn debug_log(&self, arguments: core::fmt::Arguments) {
        debug!("slint: {arguments}");
    }
}
