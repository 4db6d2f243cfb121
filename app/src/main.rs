#![no_std]
#![no_main]

use alloc::boxed::Box;
use chat_app::CHAT;
use controller::Controller;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_embassy::main;
use hardware::{BoardPeripherals, EspHardware};
use input_task::{button_task, touch_task};
use log::info;
use s3_lcd_box::capability::Board;
use s3_lcd_box::iot::ThingList;
use s3_lcd_box::{bring_up, BoardConfig, BringUp, SharedState};
use settings::RtcSettings;
use slint::ComponentHandle;
use slint_backend::LcdBoxPlatform;
use slint_generated::AppWindow;

extern crate alloc;

mod chat_app;
mod controller;
mod display_line_buffer;
mod hardware;
mod input_task;
mod settings;
mod slint_backend;
mod wifi;

esp_bootloader_esp_idf::esp_app_desc!();

static SHARED: SharedState<CriticalSectionRawMutex> = SharedState::new();

#[main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    // Initialize peripherals
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);
    info!("Embassy initialized!");

    let provisioning = RtcSettings.take_force_ap();

    let mut hardware = EspHardware::new(BoardPeripherals {
        touch_int: peripherals.GPIO12,
        touch_i2c: peripherals.I2C1,
        touch_sda: peripherals.GPIO11,
        touch_scl: peripherals.GPIO7,
        codec_i2c: peripherals.I2C0,
        codec_sda: peripherals.GPIO15,
        codec_scl: peripherals.GPIO14,
        codec_pa: peripherals.GPIO46,
        spi: peripherals.SPI2,
        dma: peripherals.DMA_CH0,
        lcd_sclk: peripherals.GPIO4,
        lcd_mosi: peripherals.GPIO2,
        lcd_cs: peripherals.GPIO5,
        lcd_dc: peripherals.GPIO47,
        lcd_rst: peripherals.GPIO38,
        ledc: peripherals.LEDC,
        backlight: peripherals.GPIO42,
        led: peripherals.GPIO48,
        button: peripherals.GPIO0,
    });

    let mut things = ThingList::new();
    let BringUp {
        board,
        touch,
        button,
    } = match bring_up(&mut hardware, &BoardConfig::DEFAULT, &SHARED, &mut things) {
        Ok(bring_up) => bring_up,
        Err(e) => panic!("board bring-up failed: {e}"),
    };
    info!(
        "{} up, capabilities {:?}, things {:?}",
        board.name(),
        board.capabilities(),
        things.things()
    );

    // TASK: poll the touch controller
    if let Some(poller) = touch {
        spawner.spawn(touch_task(poller)).ok();
    }

    // TASK: handle boot button clicks
    spawner.spawn(button_task(button, &SHARED.button_stop)).ok();

    // Set the platform for Slint
    let (platform, window) = LcdBoxPlatform::new(BoardConfig::DEFAULT.panel.geometry);
    slint::platform::set_platform(Box::new(platform)).expect("set_platform failed");

    // Initialize UI
    let app_window = AppWindow::new().expect("UI init failed");
    app_window.show().expect("UI show failed");

    CHAT.with(|targets| targets.app.start(provisioning));

    // run the controller loop
    let mut controller = Controller::new(&app_window, window, board);
    controller.run().await;
}
