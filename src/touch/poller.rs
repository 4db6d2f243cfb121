use core::cell::Cell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};
use log::{debug, info};

use super::{GestureClassifier, GestureState, Tap, TouchSample, TouchSensor};
use crate::capability::Touchpad;
use crate::chat::{ChatAction, InputSource};

/// State the poller shares with the rest of the board.
pub struct TouchShared<M: RawMutex> {
    stop: Signal<M, ()>,
    last: BlockingMutex<M, Cell<TouchSample>>,
}

impl<M: RawMutex> Default for TouchShared<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> TouchShared<M> {
    pub const fn new() -> Self {
        Self {
            stop: Signal::new(),
            last: BlockingMutex::new(Cell::new(TouchSample::RELEASED)),
        }
    }

    pub fn last_sample(&self) -> TouchSample {
        self.last.lock(|last| last.get())
    }

    pub fn request_stop(&self) {
        self.stop.signal(());
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.signaled()
    }

    fn record(&self, sample: TouchSample) {
        self.last.lock(|last| last.set(sample));
    }
}

/// Board-side handle onto a running poller.
pub struct TouchLink<'a, M: RawMutex> {
    shared: &'a TouchShared<M>,
}

impl<'a, M: RawMutex> TouchLink<'a, M> {
    pub const fn new(shared: &'a TouchShared<M>) -> Self {
        Self { shared }
    }
}

impl<M: RawMutex> Touchpad for TouchLink<'_, M> {
    fn touch_point(&self) -> TouchSample {
        self.shared.last_sample()
    }

    fn stop(&self) {
        self.shared.request_stop();
    }
}

/// Computes the next tick deadline after the tick scheduled at `previous`.
///
/// Deadlines that already lie in the past are skipped rather than replayed,
/// so a late tick never causes a burst of catch-up reads. Returns the new
/// deadline and the number of skipped ticks.
pub fn next_deadline(previous: Instant, period: Duration, now: Instant) -> (Instant, u64) {
    let period_ticks = period.as_ticks();
    if period_ticks == 0 {
        return (now, 0);
    }
    let next = previous + period;
    if next >= now {
        return (next, 0);
    }
    let behind = (now - previous).as_ticks();
    let steps = behind.div_ceil(period_ticks);
    (
        previous + Duration::from_ticks(steps * period_ticks),
        steps - 1,
    )
}

/// Polls a [`TouchSensor`] on a fixed period and fires the chat action on taps.
pub struct TouchPoller<'a, S, M>
where
    S: TouchSensor,
    M: RawMutex,
{
    sensor: S,
    classifier: GestureClassifier,
    shared: &'a TouchShared<M>,
    period: Duration,
    read_errors: u32,
}

impl<'a, S, M> TouchPoller<'a, S, M>
where
    S: TouchSensor,
    M: RawMutex,
{
    pub fn new(
        sensor: S,
        shared: &'a TouchShared<M>,
        period: Duration,
        long_press: Duration,
    ) -> Self {
        Self {
            sensor,
            classifier: GestureClassifier::new(long_press),
            shared,
            period,
            read_errors: 0,
        }
    }

    pub fn link(&self) -> TouchLink<'a, M> {
        TouchLink::new(self.shared)
    }

    pub fn state(&self) -> GestureState {
        self.classifier.state()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Failed reads since start.
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    /// One poll. A failed read leaves the gesture state as it was.
    pub fn tick(&mut self, now: Instant) -> Option<Tap> {
        match self.sensor.read_sample() {
            Ok(sample) => {
                self.shared.record(sample);
                self.classifier.update(&sample, now)
            }
            Err(e) => {
                self.read_errors = self.read_errors.wrapping_add(1);
                debug!("touch read failed: {e:?}");
                None
            }
        }
    }

    /// Polls until [`TouchShared::request_stop`] is called.
    pub async fn run(&mut self, action: &impl ChatAction) {
        info!("touch polling every {} ms", self.period.as_millis());
        let mut deadline = Instant::now() + self.period;
        loop {
            if let Either::Second(()) = select(Timer::at(deadline), self.shared.stop.wait()).await
            {
                info!("touch polling stopped");
                return;
            }

            if let Some(tap) = self.tick(Instant::now()) {
                debug!("tap ({} ms)", tap.duration.as_millis());
                action.fire(InputSource::Touch);
            }

            let (next, skipped) = next_deadline(deadline, self.period, Instant::now());
            if skipped > 0 {
                debug!("touch polling late, {skipped} ticks skipped");
            }
            deadline = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatToggle, ChatTrigger};
    use crate::framework::DeviceState;
    use crate::testing::{
        CallLog, FakeApp, FakeProvisioning, FakeTouchSensor, FakeWifi, ReadResult,
    };
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    const PERIOD: Duration = Duration::from_millis(10);
    const LONG_PRESS: Duration = Duration::from_millis(500);

    fn poller<'a>(
        script: Vec<ReadResult>,
        shared: &'a TouchShared<NoopRawMutex>,
    ) -> TouchPoller<'a, FakeTouchSensor, NoopRawMutex> {
        TouchPoller::new(FakeTouchSensor::new(script), shared, PERIOD, LONG_PRESS)
    }

    fn taps(poller: &mut TouchPoller<'_, FakeTouchSensor, NoopRawMutex>, ticks: u64) -> usize {
        (0..ticks)
            .filter(|i| poller.tick(Instant::from_millis(i * 10)).is_some())
            .count()
    }

    #[test]
    fn test_short_tap_fires_once() {
        let shared = TouchShared::new();
        let mut poller = poller(
            vec![
                ReadResult::Contacts(0),
                ReadResult::Contacts(1),
                ReadResult::Contacts(1),
                ReadResult::Contacts(1),
                ReadResult::Contacts(0),
                ReadResult::Contacts(0),
            ],
            &shared,
        );
        assert_eq!(taps(&mut poller, 6), 1);
        assert_eq!(poller.state(), GestureState::Idle);
    }

    #[test]
    fn test_long_press_never_fires() {
        let shared = TouchShared::new();
        let mut script = vec![ReadResult::Contacts(1); 61];
        script.push(ReadResult::Contacts(0));
        let mut poller = poller(script, &shared);
        assert_eq!(taps(&mut poller, 62), 0);
    }

    #[test]
    fn test_read_error_skips_tick() {
        let shared = TouchShared::new();
        let mut poller = poller(
            vec![
                ReadResult::Contacts(1),
                ReadResult::Error,
                ReadResult::Error,
                ReadResult::Contacts(0),
            ],
            &shared,
        );
        assert_eq!(poller.tick(Instant::from_millis(0)), None);
        assert!(matches!(poller.state(), GestureState::Touching { .. }));
        assert_eq!(poller.tick(Instant::from_millis(10)), None);
        assert_eq!(poller.tick(Instant::from_millis(20)), None);
        assert!(matches!(poller.state(), GestureState::Touching { .. }));
        assert_eq!(poller.read_errors(), 2);

        let tap = poller.tick(Instant::from_millis(30)).unwrap();
        assert_eq!(tap.duration, Duration::from_millis(30));
    }

    #[test]
    fn test_link_reports_last_sample() {
        let shared = TouchShared::new();
        let mut poller = poller(vec![ReadResult::Contacts(1), ReadResult::Error], &shared);
        let link = poller.link();
        assert_eq!(link.touch_point(), TouchSample::RELEASED);

        poller.tick(Instant::from_millis(0));
        poller.tick(Instant::from_millis(10));
        assert_eq!(link.touch_point().contact_count, 1);
    }

    #[test]
    fn test_next_deadline_on_time() {
        let (next, skipped) = next_deadline(
            Instant::from_millis(100),
            PERIOD,
            Instant::from_millis(103),
        );
        assert_eq!(next, Instant::from_millis(110));
        assert_eq!(skipped, 0);

        let (next, skipped) = next_deadline(
            Instant::from_millis(100),
            PERIOD,
            Instant::from_millis(110),
        );
        assert_eq!(next, Instant::from_millis(110));
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_next_deadline_skips_missed_ticks() {
        let (next, skipped) = next_deadline(
            Instant::from_millis(100),
            PERIOD,
            Instant::from_millis(135),
        );
        assert_eq!(next, Instant::from_millis(140));
        assert_eq!(skipped, 3);
    }

    struct RecordingAction(RefCell<Vec<InputSource>>);

    impl ChatAction for RecordingAction {
        fn fire(&self, source: InputSource) -> ChatToggle {
            self.0.borrow_mut().push(source);
            ChatToggle { wifi_reset: false }
        }
    }

    /// Drives `run` in real time and stops it after `ms`.
    fn run_for(
        poller: &mut TouchPoller<'_, FakeTouchSensor, NoopRawMutex>,
        shared: &TouchShared<NoopRawMutex>,
        action: &impl ChatAction,
        ms: u64,
    ) {
        block_on(join(poller.run(action), async {
            Timer::after_millis(ms).await;
            shared.request_stop();
        }));
    }

    #[test]
    fn test_run_returns_once_stopped() {
        let shared = TouchShared::<NoopRawMutex>::new();
        let mut poller = poller(vec![], &shared);
        let action = RecordingAction(RefCell::new(Vec::new()));

        poller.link().stop();
        assert!(shared.stop_requested());
        block_on(poller.run(&action));
        assert!(action.0.borrow().is_empty());
    }

    #[test]
    fn test_run_fires_tap_on_release() {
        let shared = TouchShared::<NoopRawMutex>::new();
        let mut poller = poller(
            vec![
                ReadResult::Contacts(1),
                ReadResult::Contacts(1),
                ReadResult::Contacts(0),
            ],
            &shared,
        );
        let action = RecordingAction(RefCell::new(Vec::new()));

        run_for(&mut poller, &shared, &action, 200);
        assert_eq!(*action.0.borrow(), [InputSource::Touch]);
        assert_eq!(poller.state(), GestureState::Idle);
    }

    #[test]
    fn test_tap_while_starting_offline_resets_before_toggle() {
        let shared = TouchShared::<NoopRawMutex>::new();
        let mut poller = poller(vec![ReadResult::Contacts(1), ReadResult::Contacts(0)], &shared);
        let log = CallLog::default();
        let trigger = ChatTrigger::<NoopRawMutex, _, _, _>::new(
            FakeApp {
                state: DeviceState::Starting,
                log: log.clone(),
            },
            FakeWifi(false),
            FakeProvisioning(log.clone()),
        );

        run_for(&mut poller, &shared, &trigger, 200);
        assert_eq!(*log.borrow(), ["reset", "toggle"]);
    }
}
