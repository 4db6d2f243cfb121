use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::info;
use s3_lcd_box::chat::ChatTrigger;
use s3_lcd_box::framework::{Application, DeviceState};

use crate::wifi::{ForceApReset, StationLink};

pub type BoardChat = ChatTrigger<CriticalSectionRawMutex, ChatApp, StationLink, ForceApReset>;

/// Chat action shared by the touch and boot button tasks.
pub static CHAT: BoardChat = ChatTrigger::new(ChatApp::new(), StationLink, ForceApReset);

/// Device state machine of the firmware.
#[derive(Debug)]
pub struct ChatApp {
    state: DeviceState,
}

impl ChatApp {
    pub const fn new() -> Self {
        Self {
            state: DeviceState::Starting,
        }
    }

    /// Leaves `Starting` once the board is up.
    pub fn start(&mut self, provisioning: bool) {
        self.state = if provisioning {
            DeviceState::WifiConfiguring
        } else {
            DeviceState::Idle
        };
        info!("application started: {}", self.state.name());
    }
}

impl Application for ChatApp {
    fn device_state(&self) -> DeviceState {
        self.state
    }

    fn toggle_chat_state(&mut self) {
        self.state = match self.state {
            DeviceState::Idle => DeviceState::Listening,
            DeviceState::Listening | DeviceState::Speaking => DeviceState::Idle,
            other => {
                info!("chat toggle ignored while {}", other.name());
                other
            }
        };
    }
}
