//! Registration of the IoT "things" a board exposes to the assistant.

use alloc::vec::Vec;
use log::info;

/// Built-in thing controlling the audio output volume.
pub const SPEAKER: &str = "Speaker";
/// Built-in thing controlling the display backlight.
pub const SCREEN: &str = "Screen";

pub trait ThingRegistry {
    fn add_thing(&mut self, name: &'static str);
}

impl<T: ThingRegistry + ?Sized> ThingRegistry for &mut T {
    fn add_thing(&mut self, name: &'static str) {
        (**self).add_thing(name)
    }
}

/// Registered things in registration order.
#[derive(Debug, Default)]
pub struct ThingList {
    things: Vec<&'static str>,
}

impl ThingList {
    pub const fn new() -> Self {
        Self { things: Vec::new() }
    }

    pub fn things(&self) -> &[&'static str] {
        &self.things
    }

    pub fn contains(&self, name: &str) -> bool {
        self.things.iter().any(|t| *t == name)
    }
}

impl ThingRegistry for ThingList {
    /// Registering a name twice keeps the first entry.
    fn add_thing(&mut self, name: &'static str) {
        if self.contains(name) {
            return;
        }
        info!("thing registered: {name}");
        self.things.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order_and_dedup() {
        let mut list = ThingList::new();
        list.add_thing(SPEAKER);
        list.add_thing(SCREEN);
        list.add_thing(SPEAKER);
        assert_eq!(list.things(), [SPEAKER, SCREEN]);
        assert!(list.contains("Screen"));
        assert!(!list.contains("Lamp"));
    }
}
