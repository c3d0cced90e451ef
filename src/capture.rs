//! Start signal and edge-timing capture.
//!
//! Rather than sampling each bit at a fixed offset, the line is polled as
//! fast as possible and the duration of every level is recorded. A frame is
//! exactly [`EXPECTED_PULSES`] transitions; the line going quiet for
//! [`MAX_UNCHANGED`] consecutive polls ends the capture.

use embedded_hal::delay::DelayNs;

use crate::error::DhtError;
use crate::hal::{DataLine, Pull, TimeSource};

/// How long the host holds the line high before the start signal.
pub const INIT_HIGH_MS: u32 = 50;

/// How long the host pulls the line low to wake the sensor.
pub const INIT_LOW_MS: u32 = 18;

/// Transitions in one complete frame, response preamble included.
pub const EXPECTED_PULSES: usize = 84;

/// Leading transitions that belong to the sensor's response, not the data.
pub const PREAMBLE_PULSES: usize = 4;

/// Durations handed to the decoder.
pub const PULSE_TRAIN_LEN: usize = EXPECTED_PULSES - PREAMBLE_PULSES;

/// Consecutive unchanged polls after which the line is considered idle.
pub const MAX_UNCHANGED: u32 = 100;

/// Durations in microseconds of the 80 levels that carry the payload.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseTrain([u32; PULSE_TRAIN_LEN]);

impl PulseTrain {
    pub const fn new(durations: [u32; PULSE_TRAIN_LEN]) -> Self {
        PulseTrain(durations)
    }

    pub const fn durations(&self) -> &[u32; PULSE_TRAIN_LEN] {
        &self.0
    }
}

/// Runs one full capture: start signal, edge polling, line release.
///
/// The line is always put back to output/low with pull-down before this
/// returns, whatever the outcome. If both the capture and the release fail,
/// the capture error is reported.
pub fn capture<LINE, CLOCK, DELAY>(
    line: &mut LINE,
    clock: &mut CLOCK,
    delay: &mut DELAY,
) -> Result<PulseTrain, DhtError<LINE::Error>>
where
    LINE: DataLine,
    CLOCK: TimeSource,
    DELAY: DelayNs,
{
    let mut transitions = [0u32; EXPECTED_PULSES];

    trace!("sending start signal");
    let polled = send_init_signal(line, delay)
        .map_err(DhtError::PinError)
        .and_then(|()| poll_transitions(line, clock, &mut transitions));
    let released = release(line);

    let count = polled.inspect_err(|_| warn!("capture aborted"))?;
    released?;

    debug!("captured {} transitions", count);
    if count != EXPECTED_PULSES {
        warn!("expected {} transitions, got {}", EXPECTED_PULSES, count);
        return Err(DhtError::WrongPulseCount {
            expected: EXPECTED_PULSES,
            actual: count,
        });
    }

    let mut train = [0u32; PULSE_TRAIN_LEN];
    train.copy_from_slice(&transitions[PREAMBLE_PULSES..]);
    Ok(PulseTrain(train))
}

/// Holds the line high, then low long enough for the sensor to wake up.
fn send_init_signal<LINE, DELAY>(line: &mut LINE, delay: &mut DELAY) -> Result<(), LINE::Error>
where
    LINE: DataLine,
    DELAY: DelayNs,
{
    line.set_output(Pull::Down)?;
    line.write(true)?;
    delay.delay_ms(INIT_HIGH_MS);
    line.write(false)?;
    delay.delay_ms(INIT_LOW_MS);
    Ok(())
}

/// Hands the line to the sensor and records the duration of each level.
///
/// Returns how many transitions were recorded before the line went idle.
/// This is the timing-critical part: no allocation, no logging.
fn poll_transitions<LINE, CLOCK>(
    line: &mut LINE,
    clock: &mut CLOCK,
    transitions: &mut [u32; EXPECTED_PULSES],
) -> Result<usize, DhtError<LINE::Error>>
where
    LINE: DataLine,
    CLOCK: TimeSource,
{
    line.set_input(Pull::Up)?;

    // The host left the line low.
    let mut level = false;
    let mut count = 0;
    let mut unchanged = 0;
    let mut timestamp = clock.now();

    while unchanged < MAX_UNCHANGED {
        if line.read()? != level {
            if count >= EXPECTED_PULSES {
                return Err(DhtError::TooManyPulses);
            }
            let now = clock.now();
            transitions[count] = now.wrapping_sub(timestamp);
            timestamp = now;
            count += 1;

            level = !level;
            unchanged = 0;
        } else {
            unchanged += 1;
        }
    }

    Ok(count)
}

/// Parks the line as a driven low output.
fn release<LINE: DataLine>(line: &mut LINE) -> Result<(), LINE::Error> {
    line.set_output(Pull::Down)?;
    line.write(false)
}
