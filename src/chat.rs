//! The chat toggle shared by the boot button and the touch screen.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use log::info;

use crate::framework::{Application, DeviceState, WifiConfigReset, WifiStation};

/// Where a chat toggle request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Button,
    Touch,
}

/// Outcome of one chat toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatToggle {
    /// Wi-Fi configuration was reset before toggling.
    pub wifi_reset: bool,
}

/// While still starting without a Wi-Fi link, the stored Wi-Fi configuration
/// is reset first. The chat state is toggled in every case.
pub fn toggle_chat_state<A, W, R>(app: &mut A, wifi: &W, provisioning: &mut R) -> ChatToggle
where
    A: Application + ?Sized,
    W: WifiStation + ?Sized,
    R: WifiConfigReset + ?Sized,
{
    let wifi_reset = app.device_state() == DeviceState::Starting && !wifi.is_connected();
    if wifi_reset {
        provisioning.reset_wifi_configuration();
    }
    app.toggle_chat_state();
    ChatToggle { wifi_reset }
}

/// Something an input event can fire.
pub trait ChatAction {
    fn fire(&self, source: InputSource) -> ChatToggle;
}

impl<T: ChatAction + ?Sized> ChatAction for &T {
    fn fire(&self, source: InputSource) -> ChatToggle {
        (**self).fire(source)
    }
}

/// The collaborators a chat toggle touches.
pub struct ChatTargets<A, W, R> {
    pub app: A,
    pub wifi: W,
    pub provisioning: R,
}

/// Serialises chat toggles from concurrently running input tasks.
///
/// Each toggle runs to completion under the lock, so a button press and a tap
/// landing together are applied one after the other.
pub struct ChatTrigger<M: RawMutex, A, W, R> {
    targets: BlockingMutex<M, RefCell<ChatTargets<A, W, R>>>,
}

impl<M, A, W, R> ChatTrigger<M, A, W, R>
where
    M: RawMutex,
    A: Application,
    W: WifiStation,
    R: WifiConfigReset,
{
    pub const fn new(app: A, wifi: W, provisioning: R) -> Self {
        Self {
            targets: BlockingMutex::new(RefCell::new(ChatTargets {
                app,
                wifi,
                provisioning,
            })),
        }
    }

    /// Runs `f` with exclusive access to the targets.
    pub fn with<T>(&self, f: impl FnOnce(&mut ChatTargets<A, W, R>) -> T) -> T {
        self.targets.lock(|targets| f(&mut targets.borrow_mut()))
    }
}

impl<M, A, W, R> ChatAction for ChatTrigger<M, A, W, R>
where
    M: RawMutex,
    A: Application,
    W: WifiStation,
    R: WifiConfigReset,
{
    fn fire(&self, source: InputSource) -> ChatToggle {
        self.with(|targets| {
            let outcome =
                toggle_chat_state(&mut targets.app, &targets.wifi, &mut targets.provisioning);
            info!(
                "{source:?} toggled chat, now {}{}",
                targets.app.device_state().name(),
                if outcome.wifi_reset {
                    " (wifi config reset)"
                } else {
                    ""
                }
            );
            outcome
        })
    }
}
