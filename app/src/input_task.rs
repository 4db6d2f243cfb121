use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use esp_hal::gpio::Input;
use log::info;
use s3_lcd_box::button::BootButton;
use s3_lcd_box::touch::TouchPoller;

use crate::chat_app::CHAT;
use crate::hardware::TouchController;

#[embassy_executor::task]
pub async fn touch_task(mut poller: TouchPoller<'static, TouchController, CriticalSectionRawMutex>) {
    poller.run(&CHAT).await;
    info!("touch task done, {} failed reads", poller.read_errors());
}

#[embassy_executor::task]
pub async fn button_task(
    mut button: BootButton<Input<'static>>,
    stop: &'static Signal<CriticalSectionRawMutex, ()>,
) {
    button.run(&CHAT, stop).await;
    info!("button task done after {} clicks", button.clicks());
}
