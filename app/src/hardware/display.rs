//! Display hardware initialization module
//!
//! This module handles the initialization of the GC9A01 round display
//! controller via SPI interface with DMA support.

use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::dma::{DmaRxBuf, DmaTxBuf};
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::peripherals::{DMA_CH0, GPIO2, GPIO38, GPIO4, GPIO47, GPIO5, SPI2};
use esp_hal::spi::master::{Config as SpiConfig, Spi, SpiDmaBus};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::{dma_buffers, Blocking};
use log::{info, warn};
use mipidsi::interface::SpiInterface;
use mipidsi::models::GC9A01;
use mipidsi::options::{ColorInversion, ColorOrder, Orientation, Rotation};
use mipidsi::{Builder, Display};
use s3_lcd_box::config::{PanelConfig, RgbOrder};
use s3_lcd_box::error::{BringUpError, BringUpStep};
use static_cell::StaticCell;

/// Size of one DMA transfer; longer writes are split by the bus.
const SPI_DMA_CHUNK: usize = 32000;

/// Type alias for the GC9A01 display instance using SPI interface
pub type LcdPanel = Display<
    SpiInterface<
        'static,
        ExclusiveDevice<SpiDmaBus<'static, Blocking>, Output<'static>, NoDelay>,
        Output<'static>,
    >,
    GC9A01,
    Output<'static>,
>;

/// Sets up SPI2 with DMA for panel writes of up to `max_transfer_bytes`.
///
/// The clock starts at a conservative rate; [`initialize_panel`] switches to
/// the panel's pixel clock.
pub fn initialize_spi_bus(
    spi: SPI2<'static>,
    dma: DMA_CH0<'static>,
    sclk: GPIO4<'static>,
    mosi: GPIO2<'static>,
    max_transfer_bytes: usize,
) -> Result<SpiDmaBus<'static, Blocking>, BringUpError> {
    let sclk = Output::new(sclk, Level::Low, OutputConfig::default());
    let mosi = Output::new(mosi, Level::Low, OutputConfig::default());

    let spi_dma = Spi::new(
        spi,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(10))
            .with_mode(Mode::_0),
    )
    .map_err(|e| {
        warn!("SPI config rejected: {e:?}");
        BringUpError::bus(BringUpStep::SpiBus)
    })?
    .with_sck(sclk)
    .with_mosi(mosi)
    .with_dma(dma);

    #[allow(clippy::manual_div_ceil)]
    let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(4, SPI_DMA_CHUNK);
    let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer)
        .map_err(|_| BringUpError::bus(BringUpStep::SpiBus))?;
    let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer)
        .map_err(|_| BringUpError::bus(BringUpStep::SpiBus))?;

    info!("SPI bus ready for {max_transfer_bytes} byte frames");
    Ok(SpiDmaBus::new(spi_dma, dma_rx_buf, dma_tx_buf))
}

/// Initializes the GC9A01 panel on an already configured SPI bus.
///
/// Installs the panel IO (CS and DC), installs the driver with its reset
/// pin, then resets, initialises, inverts colours, mirrors and switches the
/// panel on. mipidsi performs the last five steps inside `init`.
///
/// # Arguments
///
/// * `spi` - SPI bus from [`initialize_spi_bus`]
/// * `cs` - GPIO pin for chip select
/// * `dc` - GPIO pin for data/command selection
/// * `rst` - GPIO pin for display reset
/// * `config` - Geometry, colour and clock settings
pub fn initialize_panel(
    mut spi: SpiDmaBus<'static, Blocking>,
    cs: GPIO5<'static>,
    dc: GPIO47<'static>,
    rst: GPIO38<'static>,
    config: &PanelConfig,
) -> Result<LcdPanel, BringUpError> {
    info!("Init GC9A01 display");

    spi.apply_config(
        &SpiConfig::default()
            .with_frequency(Rate::from_hz(config.pixel_clock_hz))
            .with_mode(Mode::_0),
    )
    .map_err(|e| {
        warn!("pixel clock rejected: {e:?}");
        BringUpError::bus(BringUpStep::Panel)
    })?;

    info!("Install panel IO");
    let dc = Output::new(dc, Level::Low, OutputConfig::default());
    let cs = Output::new(cs, Level::High, OutputConfig::default());
    let rst = Output::new(rst, Level::High, OutputConfig::default());
    let spi_device =
        ExclusiveDevice::new_no_delay(spi, cs).map_err(|_| BringUpError::pin(BringUpStep::Panel))?;

    static DISPLAY_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let buffer = DISPLAY_BUFFER.init([0_u8; 512]);
    let di = SpiInterface::new(spi_device, dc, buffer);

    info!("Install GC9A01 panel driver");
    let geometry = &config.geometry;
    let mut orientation = Orientation::new();
    if geometry.mirror_x {
        orientation = orientation.flip_horizontal();
    }
    if geometry.mirror_y {
        orientation = orientation.flip_vertical();
    }
    if geometry.swap_xy {
        orientation = orientation.rotate(Rotation::Deg90);
    }

    Builder::new(GC9A01, di)
        .display_size(geometry.width, geometry.height)
        .display_offset(geometry.offset_x as u16, geometry.offset_y as u16)
        .invert_colors(if config.invert_colors {
            ColorInversion::Inverted
        } else {
            ColorInversion::Normal
        })
        .color_order(match config.rgb_order {
            RgbOrder::Rgb => ColorOrder::Rgb,
            RgbOrder::Bgr => ColorOrder::Bgr,
        })
        .orientation(orientation)
        .reset_pin(rst)
        .init(&mut esp_hal::delay::Delay::new())
        .map_err(|e| {
            warn!("GC9A01 init failed: {e:?}");
            BringUpError::driver(BringUpStep::Panel)
        })
}
