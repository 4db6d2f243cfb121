use embassy_time::{Duration, Instant};
use log::debug;

use super::TouchSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Touching { start: Instant },
}

/// A contact shorter than the long-press threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    pub duration: Duration,
}

/// Turns per-tick samples into taps. Long presses are swallowed.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    state: GestureState,
    long_press: Duration,
}

impl GestureClassifier {
    pub const fn new(long_press: Duration) -> Self {
        Self {
            state: GestureState::Idle,
            long_press,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Advances the state machine by one tick. A tap is only ever reported
    /// on the transition from touching back to idle.
    pub fn update(&mut self, sample: &TouchSample, now: Instant) -> Option<Tap> {
        match (self.state, sample.is_touched()) {
            (GestureState::Idle, true) => {
                self.state = GestureState::Touching { start: now };
                None
            }
            (GestureState::Touching { start }, false) => {
                self.state = GestureState::Idle;
                let duration = now
                    .checked_duration_since(start)
                    .unwrap_or(Duration::from_ticks(0));
                if duration < self.long_press {
                    Some(Tap { duration })
                } else {
                    debug!("long press of {} ms ignored", duration.as_millis());
                    None
                }
            }
            (GestureState::Touching { .. }, true) | (GestureState::Idle, false) => None,
        }
    }
}
