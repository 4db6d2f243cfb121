use core::fmt::{Display, Formatter};

/// Bring-up stage in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringUpStep {
    TouchDetect,
    TouchBus,
    TouchController,
    CodecBus,
    AudioCodec,
    SpiBus,
    Panel,
    Display,
    Button,
    Led,
    Backlight,
}

impl Display for BringUpStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BringUpStep::TouchDetect => write!(f, "touch detection"),
            BringUpStep::TouchBus => write!(f, "touch I2C bus"),
            BringUpStep::TouchController => write!(f, "touch controller"),
            BringUpStep::CodecBus => write!(f, "codec I2C bus"),
            BringUpStep::AudioCodec => write!(f, "audio codec"),
            BringUpStep::SpiBus => write!(f, "SPI bus"),
            BringUpStep::Panel => write!(f, "display panel"),
            BringUpStep::Display => write!(f, "display"),
            BringUpStep::Button => write!(f, "boot button"),
            BringUpStep::Led => write!(f, "status LED"),
            BringUpStep::Backlight => write!(f, "backlight"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// Bus or peripheral configuration was rejected.
    Bus,
    /// The device did not answer or answered unexpectedly.
    Driver,
    /// A GPIO could not be configured or read.
    Pin,
    /// A resource was already held by someone else.
    Busy,
    /// Persisted settings could not be read or written.
    Settings,
}

/// Fatal board bring-up failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BringUpError {
    pub step: BringUpStep,
    pub cause: Cause,
}

impl BringUpError {
    pub const fn new(step: BringUpStep, cause: Cause) -> Self {
        Self { step, cause }
    }

    pub const fn bus(step: BringUpStep) -> Self {
        Self::new(step, Cause::Bus)
    }

    pub const fn driver(step: BringUpStep) -> Self {
        Self::new(step, Cause::Driver)
    }

    pub const fn pin(step: BringUpStep) -> Self {
        Self::new(step, Cause::Pin)
    }
}

impl Display for BringUpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let cause = match self.cause {
            Cause::Bus => "bus setup failed",
            Cause::Driver => "device not responding",
            Cause::Pin => "GPIO error",
            Cause::Busy => "resource busy",
            Cause::Settings => "settings unavailable",
        };
        write!(f, "{}: {}", self.step, cause)
    }
}
