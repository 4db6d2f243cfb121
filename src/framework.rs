//! Interfaces of the generic application framework the board plugs into.

/// Top-level state of the chat application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Unknown,
    Starting,
    WifiConfiguring,
    Idle,
    Connecting,
    Listening,
    Speaking,
    Upgrading,
    Activating,
    FatalError,
}

impl DeviceState {
    pub const fn name(self) -> &'static str {
        match self {
            DeviceState::Unknown => "unknown",
            DeviceState::Starting => "starting",
            DeviceState::WifiConfiguring => "configuring",
            DeviceState::Idle => "idle",
            DeviceState::Connecting => "connecting",
            DeviceState::Listening => "listening",
            DeviceState::Speaking => "speaking",
            DeviceState::Upgrading => "upgrading",
            DeviceState::Activating => "activating",
            DeviceState::FatalError => "fatal_error",
        }
    }
}

/// The two transitions of the application state machine the board drives.
pub trait Application {
    fn device_state(&self) -> DeviceState;
    fn toggle_chat_state(&mut self);
}

pub trait WifiStation {
    fn is_connected(&self) -> bool;
}

/// Drops the stored Wi-Fi credentials and re-enters provisioning.
pub trait WifiConfigReset {
    fn reset_wifi_configuration(&mut self);
}
