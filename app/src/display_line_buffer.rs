use embedded_graphics_core::pixelcolor::raw::RawU16;
use log::warn;
use slint::platform::software_renderer::{LineBufferProvider, Rgb565Pixel};

use crate::hardware::LcdPanel;

pub struct DisplayLineBuffer<'a> {
    pub display: &'a mut LcdPanel,
    pub line_buffer: &'a mut [Rgb565Pixel],
}

impl<'a> DisplayLineBuffer<'a> {
    pub fn new(display: &'a mut LcdPanel, line_buffer: &'a mut [Rgb565Pixel]) -> Self {
        DisplayLineBuffer {
            display,
            line_buffer,
        }
    }
}

impl LineBufferProvider for &mut DisplayLineBuffer<'_> {
    type TargetPixel = Rgb565Pixel;

    fn process_line(
        &mut self,
        line: usize,
        range: core::ops::Range<usize>,
        render_fn: impl FnOnce(&mut [Self::TargetPixel]),
    ) {
        let buffer = &mut self.line_buffer[range.clone()];
        render_fn(buffer);

        // end coordinates are inclusive
        if let Err(e) = self.display.set_pixels(
            range.start as u16,
            line as u16,
            range.end.saturating_sub(1) as u16,
            line as u16,
            buffer.iter().map(|x| RawU16::new(x.0).into()),
        ) {
            warn!("set_pixels failed: {e:?}");
        }
    }
}
