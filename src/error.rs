/// Possible errors from the DHT driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor produced more transitions than a frame holds.
    TooManyPulses,
    /// The line stalled before a full frame was received.
    WrongPulseCount {
        /// Transitions in a complete frame.
        expected: usize,
        /// Transitions seen before the line went quiet.
        actual: usize,
    },
    /// Checksum did not match the received data.
    InvalidChecksum,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}
