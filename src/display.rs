//! Display abstraction with scoped locking
//!
//! UI state is shared between application logic and the renderer. All
//! mutation goes through a [`DisplayLockGuard`]; the lock is released when
//! the guard goes out of scope, on every exit path.

use alloc::string::String;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

use crate::capability::Display;
use crate::config::DisplayGeometry;
use crate::error::{BringUpError, BringUpStep, Cause};

pub type UiLock<M> = Mutex<M, UiState>;
pub type DisplayLockGuard<'a, M> = MutexGuard<'a, M, UiState>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBar {
    pub pad_left: u16,
    pub pad_right: u16,
    pub status: String,
    pub notification: Option<String>,
}

/// Everything the renderer draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    status_bar: StatusBar,
    emotion: &'static str,
    chat_role: ChatRole,
    chat_message: String,
    revision: u32,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub const fn new() -> Self {
        Self {
            status_bar: StatusBar {
                pad_left: 0,
                pad_right: 0,
                status: String::new(),
                notification: None,
            },
            emotion: "neutral",
            chat_role: ChatRole::System,
            chat_message: String::new(),
            revision: 0,
        }
    }

    pub fn status_bar(&self) -> &StatusBar {
        &self.status_bar
    }

    pub fn emotion(&self) -> &'static str {
        self.emotion
    }

    pub fn chat_message(&self) -> (ChatRole, &str) {
        (self.chat_role, &self.chat_message)
    }

    /// Bumped on every change; renderers redraw when it moves.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn set_status_bar_padding(&mut self, left: u16, right: u16) {
        if (self.status_bar.pad_left, self.status_bar.pad_right) != (left, right) {
            self.status_bar.pad_left = left;
            self.status_bar.pad_right = right;
            self.bump();
        }
    }

    pub fn set_status(&mut self, status: &str) {
        if self.status_bar.status != status {
            self.status_bar.status.clear();
            self.status_bar.status.push_str(status);
            self.bump();
        }
    }

    pub fn show_notification(&mut self, text: &str) {
        self.status_bar.notification = Some(String::from(text));
        self.bump();
    }

    pub fn clear_notification(&mut self) {
        if self.status_bar.notification.take().is_some() {
            self.bump();
        }
    }

    pub fn set_emotion(&mut self, emotion: &'static str) {
        if self.emotion != emotion {
            self.emotion = emotion;
            self.bump();
        }
    }

    pub fn set_chat_message(&mut self, role: ChatRole, content: &str) {
        self.chat_role = role;
        self.chat_message.clear();
        self.chat_message.push_str(content);
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// SPI LCD panel plus the UI state drawn onto it.
pub struct LcdDisplay<'a, M: RawMutex, P> {
    panel: P,
    geometry: DisplayGeometry,
    ui: &'a UiLock<M>,
}

impl<'a, M: RawMutex, P> LcdDisplay<'a, M, P> {
    /// Wraps an initialised panel and widens the status bar so it clears the
    /// curved edge of the round screen.
    pub fn new(
        panel: P,
        geometry: DisplayGeometry,
        ui: &'a UiLock<M>,
        status_bar_padding: u16,
    ) -> Result<Self, BringUpError> {
        let display = Self {
            panel,
            geometry,
            ui,
        };
        {
            let mut ui = display
                .try_lock()
                .ok_or(BringUpError::new(BringUpStep::Display, Cause::Busy))?;
            ui.set_status_bar_padding(status_bar_padding, status_bar_padding);
        }
        Ok(display)
    }

    /// Waits until the renderer releases the UI state.
    pub async fn lock(&self) -> DisplayLockGuard<'a, M> {
        self.ui.lock().await
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }
}

impl<M: RawMutex, P> Display for LcdDisplay<'_, M, P> {
    type RawMutex = M;

    fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    fn ui(&self) -> &UiLock<M> {
        self.ui
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    fn geometry() -> DisplayGeometry {
        BoardConfig::DEFAULT.panel.geometry
    }

    #[test]
    fn test_construction_pads_status_bar() {
        let ui = UiLock::<NoopRawMutex>::new(UiState::new());
        let display = LcdDisplay::new((), geometry(), &ui, 79).unwrap();

        let state = display.try_lock().unwrap();
        assert_eq!(state.status_bar().pad_left, 79);
        assert_eq!(state.status_bar().pad_right, 79);
    }

    #[test]
    fn test_construction_fails_when_ui_is_held() {
        let ui = UiLock::<NoopRawMutex>::new(UiState::new());
        let _renderer = ui.try_lock().unwrap();
        let err = LcdDisplay::new((), geometry(), &ui, 79).err().unwrap();
        assert_eq!(err, BringUpError::new(BringUpStep::Display, Cause::Busy));
    }

    #[test]
    fn test_guard_is_exclusive_and_released_on_drop() {
        let ui = UiLock::<CriticalSectionRawMutex>::new(UiState::new());
        let display = LcdDisplay::new((), geometry(), &ui, 0).unwrap();

        let mut guard = block_on(display.lock());
        guard.set_status("listening");
        assert!(display.try_lock().is_none());
        drop(guard);

        assert_eq!(display.try_lock().unwrap().status_bar().status, "listening");
    }

    #[test]
    fn test_guard_released_on_early_return() {
        fn update<M: RawMutex, P>(display: &LcdDisplay<'_, M, P>) -> Result<(), &'static str> {
            let mut ui = display.try_lock().ok_or("busy")?;
            ui.set_emotion("happy");
            Err("render failed")
        }

        let ui = UiLock::<NoopRawMutex>::new(UiState::new());
        let display = LcdDisplay::new((), geometry(), &ui, 0).unwrap();
        assert_eq!(update(&display), Err("render failed"));

        let state = display.try_lock().unwrap();
        assert_eq!(state.emotion(), "happy");
    }

    #[test]
    fn test_revision_tracks_changes_only() {
        let mut ui = UiState::new();
        ui.set_status("idle");
        let rev = ui.revision();
        ui.set_status("idle");
        ui.set_emotion("neutral");
        assert_eq!(ui.revision(), rev);

        ui.set_chat_message(ChatRole::User, "hello");
        assert_eq!(ui.chat_message(), (ChatRole::User, "hello"));
        ui.show_notification("Wi-Fi reset");
        ui.clear_notification();
        assert_eq!(ui.revision(), rev + 3);
        assert_eq!(ui.status_bar().notification, None);
    }
}
