//! Boot button
//!
//! GPIO0 doubles as the strapping pin and the only user button. A click is a
//! press followed by a release; each click fires the shared chat action.
//! The contact bounces, so after the first falling edge the level is sampled
//! every [`DEBOUNCE_SAMPLE_PERIOD`]. Only a press that holds for four samples,
//! followed by a release that holds as long, counts.

use debouncr::{debounce_4, Edge};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;
use log::{debug, info, warn};

use crate::chat::{ChatAction, InputSource};

pub const DEBOUNCE_SAMPLE_PERIOD: Duration = Duration::from_millis(5);

pub struct BootButton<P> {
    pin: P,
    clicks: u32,
}

impl<P> BootButton<P>
where
    P: Wait + InputPin,
{
    /// `pin` must be an active-low input with pull-up.
    pub fn new(pin: P) -> Self {
        Self { pin, clicks: 0 }
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub async fn wait_for_click(&mut self) -> Result<(), P::Error> {
        loop {
            self.pin.wait_for_low().await?;
            if self.debounced_press().await? {
                self.clicks = self.clicks.wrapping_add(1);
                return Ok(());
            }
            debug!("boot button glitch ignored");
        }
    }

    /// Samples the pin until it settles released. Returns whether it was held
    /// pressed long enough in between.
    async fn debounced_press(&mut self) -> Result<bool, P::Error> {
        let mut debouncer = debounce_4(false);
        let mut held = false;
        loop {
            match debouncer.update(self.pin.is_low()?) {
                Some(Edge::Rising) => held = true,
                Some(Edge::Falling) => return Ok(held),
                None => {}
            }
            Timer::after(DEBOUNCE_SAMPLE_PERIOD).await;
        }
    }

    /// Fires `action` on every click until `stop` is signalled or the pin fails.
    pub async fn run<M: RawMutex>(&mut self, action: &impl ChatAction, stop: &Signal<M, ()>) {
        loop {
            match select(self.wait_for_click(), stop.wait()).await {
                Either::First(Ok(())) => {
                    action.fire(InputSource::Button);
                }
                Either::First(Err(e)) => {
                    warn!("boot button: {e:?}");
                    return;
                }
                Either::Second(()) => {
                    info!("boot button handling stopped");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatToggle;
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::future::pending;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Replays one level per sample (`true` is pressed), released afterwards.
    struct ScriptedButton {
        levels: VecDeque<bool>,
        fail: bool,
    }

    impl ScriptedButton {
        fn new(levels: &[bool]) -> Self {
            Self {
                levels: levels.iter().copied().collect(),
                fail: false,
            }
        }
    }

    impl ErrorType for ScriptedButton {
        type Error = ErrorKind;
    }

    impl InputPin for ScriptedButton {
        fn is_high(&mut self) -> Result<bool, ErrorKind> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, ErrorKind> {
            Ok(self.levels.pop_front().unwrap_or(false))
        }
    }

    impl Wait for ScriptedButton {
        async fn wait_for_high(&mut self) -> Result<(), ErrorKind> {
            pending().await
        }

        async fn wait_for_low(&mut self) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            while self.levels.front() == Some(&false) {
                self.levels.pop_front();
            }
            if self.levels.is_empty() {
                pending::<()>().await;
            }
            Ok(())
        }

        async fn wait_for_rising_edge(&mut self) -> Result<(), ErrorKind> {
            pending().await
        }

        async fn wait_for_falling_edge(&mut self) -> Result<(), ErrorKind> {
            pending().await
        }

        async fn wait_for_any_edge(&mut self) -> Result<(), ErrorKind> {
            pending().await
        }
    }

    struct Recorder(RefCell<Vec<InputSource>>);

    impl ChatAction for Recorder {
        fn fire(&self, source: InputSource) -> ChatToggle {
            self.0.borrow_mut().push(source);
            ChatToggle { wifi_reset: false }
        }
    }

    const PRESSED: bool = true;
    const RELEASED: bool = false;

    /// Runs the button over `levels` and returns the sources it fired.
    fn fired(levels: &[bool]) -> (Vec<InputSource>, u32) {
        let mut button = BootButton::new(ScriptedButton::new(levels));
        let recorder = Recorder(RefCell::new(Vec::new()));
        let stop = Signal::<NoopRawMutex, ()>::new();
        let settle = DEBOUNCE_SAMPLE_PERIOD * (levels.len() as u32 + 10);

        block_on(join(button.run(&recorder, &stop), async {
            Timer::after(settle).await;
            stop.signal(());
        }));
        (recorder.0.into_inner(), button.clicks())
    }

    #[test]
    fn test_click_is_press_then_release() {
        let mut levels = [PRESSED; 6].to_vec();
        levels.extend([RELEASED; 6]);
        let mut button = BootButton::new(ScriptedButton::new(&levels));

        block_on(button.wait_for_click()).unwrap();
        assert_eq!(button.clicks(), 1);
    }

    #[test]
    fn test_bouncing_press_fires_once() {
        let levels = [
            PRESSED, RELEASED, PRESSED, RELEASED, PRESSED, PRESSED, PRESSED, PRESSED, PRESSED,
            RELEASED, PRESSED, RELEASED, RELEASED, RELEASED, RELEASED, RELEASED,
        ];
        let (sources, clicks) = fired(&levels);
        assert_eq!(sources, [InputSource::Button]);
        assert_eq!(clicks, 1);
    }

    #[test]
    fn test_short_glitch_is_not_a_click() {
        let levels = [PRESSED, PRESSED, RELEASED, RELEASED, RELEASED, RELEASED, RELEASED];
        let (sources, clicks) = fired(&levels);
        assert!(sources.is_empty());
        assert_eq!(clicks, 0);
    }

    #[test]
    fn test_each_click_fires_action() {
        let mut levels = Vec::new();
        for _ in 0..2 {
            levels.extend([PRESSED; 5]);
            levels.extend([RELEASED; 5]);
        }
        let (sources, clicks) = fired(&levels);
        assert_eq!(sources, [InputSource::Button, InputSource::Button]);
        assert_eq!(clicks, 2);
    }

    #[test]
    fn test_pin_error_ends_handling() {
        let mut pin = ScriptedButton::new(&[PRESSED; 8]);
        pin.fail = true;
        let mut button = BootButton::new(pin);
        let recorder = Recorder(RefCell::new(Vec::new()));
        let stop = Signal::<NoopRawMutex, ()>::new();

        block_on(button.run(&recorder, &stop));
        assert!(recorder.0.borrow().is_empty());
    }
}
