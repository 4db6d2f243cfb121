//! Persisted board settings

/// Keys of the values the board persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Backlight level in percent.
    Brightness,
    /// Non-zero forces the provisioning access point on next boot.
    ForceAp,
}

impl Setting {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        match self {
            Setting::Brightness => 0,
            Setting::ForceAp => 1,
        }
    }
}

pub trait SettingsStore {
    fn get(&self, key: Setting) -> Option<u8>;
    fn set(&mut self, key: Setting, value: u8);

    fn get_or(&self, key: Setting, default: u8) -> u8 {
        self.get(key).unwrap_or(default)
    }
}

/// Volatile settings kept in RAM.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: [Option<u8>; Setting::COUNT],
}

impl MemorySettings {
    pub const fn new() -> Self {
        Self {
            values: [None; Setting::COUNT],
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: Setting) -> Option<u8> {
        self.values[key.index()]
    }

    fn set(&mut self, key: Setting, value: u8) {
        self.values[key.index()] = Some(value);
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for &mut S {
    fn get(&self, key: Setting) -> Option<u8> {
        (**self).get(key)
    }

    fn set(&mut self, key: Setting, value: u8) {
        (**self).set(key, value)
    }
}
