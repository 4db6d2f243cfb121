//! Main loop of the firmware
//!
//! Mirrors the device state onto the LED and the UI model, copies the UI
//! model into the slint component when it changed and renders dirty frames
//! line by line onto the panel.

use alloc::rc::Rc;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Timer;
use s3_lcd_box::capability::{Board, Led};
use s3_lcd_box::config::DISPLAY_WIDTH;
use s3_lcd_box::display::ChatRole;
use s3_lcd_box::framework::DeviceState;
use s3_lcd_box::LcdBox;
use slint::platform::software_renderer::{MinimalSoftwareWindow, Rgb565Pixel};
use slint_generated::AppWindow;

use crate::chat_app::CHAT;
use crate::display_line_buffer::DisplayLineBuffer;
use crate::hardware::EspHardware;

pub type EspBoard = LcdBox<'static, EspHardware, CriticalSectionRawMutex>;

const PROVISIONING_HINT: &str = "Join the device's Wi-Fi access point to configure the network";

pub struct Controller<'a> {
    app_window: &'a AppWindow,
    window: Rc<MinimalSoftwareWindow>,
    board: EspBoard,
    last_state: Option<DeviceState>,
    last_revision: Option<u32>,
}

impl<'a> Controller<'a> {
    pub fn new(app_window: &'a AppWindow, window: Rc<MinimalSoftwareWindow>, board: EspBoard) -> Self {
        Self {
            app_window,
            window,
            board,
            last_state: None,
            last_revision: None,
        }
    }

    pub async fn run(&mut self) -> ! {
        let line_buffer = &mut [Rgb565Pixel(0); DISPLAY_WIDTH as usize];

        loop {
            self.sync_device_state().await;
            self.sync_ui().await;

            // Update timers and animations
            slint::platform::update_timers_and_animations();

            // Draw the scene if something needs to be drawn
            let board = &mut self.board;
            let is_dirty = self.window.draw_if_needed(|renderer| {
                let mut buffer_provider =
                    DisplayLineBuffer::new(board.display_mut().panel_mut(), line_buffer);
                renderer.render_by_line(&mut buffer_provider);
            });

            if !is_dirty {
                Timer::after_millis(10).await
            }
        }
    }

    async fn sync_device_state(&mut self) {
        let state = CHAT.with(|targets| targets.app.device_state());
        if self.last_state == Some(state) {
            return;
        }
        self.board.led().on_state_changed(state);

        let mut ui = self.board.display().lock().await;
        ui.set_status(state.name());
        ui.set_emotion(match state {
            DeviceState::Listening => "listening",
            DeviceState::Speaking => "happy",
            DeviceState::FatalError => "sad",
            _ => "neutral",
        });
        if state == DeviceState::WifiConfiguring {
            ui.set_chat_message(ChatRole::System, PROVISIONING_HINT);
        }
        self.last_state = Some(state);
    }

    async fn sync_ui(&mut self) {
        let ui = self.board.display().lock().await;
        if self.last_revision == Some(ui.revision()) {
            return;
        }
        let status_bar = ui.status_bar();
        self.app_window.set_status(status_bar.status.as_str().into());
        self.app_window
            .set_notification(status_bar.notification.as_deref().unwrap_or("").into());
        self.app_window.set_status_padding(status_bar.pad_left as f32);
        self.app_window.set_emotion(ui.emotion().into());
        self.app_window.set_chat_message(ui.chat_message().1.into());
        self.last_revision = Some(ui.revision());
    }
}
