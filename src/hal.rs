//! Hardware contracts consumed by the driver.
//!
//! The capture loop needs two things from the platform: a microsecond counter
//! and a data pin whose direction and pull can be switched at runtime. Both
//! are traits so the protocol logic runs unchanged against real hardware or
//! a scripted test double.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

/// Monotonic microsecond counter.
pub trait TimeSource {
    /// Current tick count in microseconds. Allowed to wrap at `u32::MAX`.
    fn now(&mut self) -> u32;

    /// Microseconds elapsed since `since`, correct across one 32-bit wrap.
    fn elapsed(&mut self, since: u32) -> u32 {
        self.now().wrapping_sub(since)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &mut T {
    fn now(&mut self) -> u32 {
        T::now(self)
    }

    fn elapsed(&mut self, since: u32) -> u32 {
        T::elapsed(self, since)
    }
}

/// Internal pull resistor selection.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    /// Pull the line towards VCC.
    Up,
    /// Pull the line towards GND.
    Down,
}

/// A single bidirectional GPIO line.
pub trait DataLine: ErrorType {
    /// Switch the line to push-pull output with the given pull.
    fn set_output(&mut self, pull: Pull) -> Result<(), Self::Error>;

    /// Switch the line to input with the given pull.
    fn set_input(&mut self, pull: Pull) -> Result<(), Self::Error>;

    /// Drive the line. Only meaningful in output mode.
    fn write(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Sample the current line level.
    fn read(&mut self) -> Result<bool, Self::Error>;
}

impl<T: DataLine + ?Sized> DataLine for &mut T {
    fn set_output(&mut self, pull: Pull) -> Result<(), Self::Error> {
        T::set_output(self, pull)
    }

    fn set_input(&mut self, pull: Pull) -> Result<(), Self::Error> {
        T::set_input(self, pull)
    }

    fn write(&mut self, high: bool) -> Result<(), Self::Error> {
        T::write(self, high)
    }

    fn read(&mut self) -> Result<bool, Self::Error> {
        T::read(self)
    }
}

/// [`DataLine`] over a plain `embedded-hal` pin configured as open-drain.
///
/// Most HALs expose a flexible or open-drain pin that implements both
/// [`InputPin`] and [`OutputPin`] but cannot switch its pull at runtime. On
/// such a pin the external pull-up does the work: "input" means releasing
/// the line high and letting the sensor drive it.
pub struct OpenDrainLine<P> {
    pin: P,
}

impl<P> OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    /// Wraps `pin`, which must already be configured as open-drain.
    pub fn new(pin: P) -> Self {
        OpenDrainLine { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrainLine<P> {
    type Error = P::Error;
}

impl<P> DataLine for OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    fn set_output(&mut self, _pull: Pull) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_input(&mut self, _pull: Pull) -> Result<(), Self::Error> {
        // Release the line; the external pull-up holds it high.
        self.pin.set_high()
    }

    fn write(&mut self, high: bool) -> Result<(), Self::Error> {
        self.pin.set_state(PinState::from(high))
    }

    fn read(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}

/// Host clock backed by [`std::time::Instant`].
#[cfg(feature = "std")]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Starts counting from zero at the moment of construction.
    pub fn new() -> Self {
        StdClock {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for StdClock {
    fn now(&mut self) -> u32 {
        // Truncation gives the same wrap behaviour as a hardware counter.
        self.origin.elapsed().as_micros() as u32
    }
}
