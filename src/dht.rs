use embedded_hal::delay::DelayNs;

use crate::capture::capture;
use crate::error::DhtError;
use crate::hal::{DataLine, TimeSource};
use crate::payload::{decode, validate};

/// Shortest time in microseconds the sensor allows between two measurements.
pub const MIN_INTERVAL_US: u32 = 200_000;

/// Driver for a DHT sensor on a single data line.
///
/// Keeps the last good reading and serves it again while the sensor is
/// still inside its minimum sampling interval.
pub struct Dht<LINE, CLOCK, DELAY> {
    line: LINE,
    clock: CLOCK,
    delay: DELAY,
    last_reading: Option<Reading>,
}

/// Reading returned by the DHT sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    #[cfg_attr(feature = "serde", serde(rename = "temp"))]
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Clock ticks (microseconds) at which the measurement completed.
    #[cfg_attr(feature = "serde", serde(rename = "timestamp"))]
    pub measured_at: u32,
}

impl<LINE, CLOCK, DELAY> Dht<LINE, CLOCK, DELAY>
where
    LINE: DataLine,
    CLOCK: TimeSource,
    DELAY: DelayNs,
{
    /// Creates a new instance of the DHT driver.
    ///
    /// # Arguments
    ///
    /// * `line` - The data line. Must be able to switch between input and output.
    /// * `clock` - A microsecond counter used to time the pulses.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(line: LINE, clock: CLOCK, delay: DELAY) -> Self {
        Dht {
            line,
            clock,
            delay,
            last_reading: None,
        }
    }

    /// Takes a fresh measurement unless the last one is still recent.
    ///
    /// This method performs the complete communication sequence when needed:
    /// sending the start signal, capturing the pulse train, decoding it and
    /// validating the checksum. Within [`MIN_INTERVAL_US`] of a successful
    /// measurement it returns immediately without touching the line.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the cached reading is fresh or was just replaced.
    /// * `Err(DhtError)` if any stage failed. The cached reading is untouched.
    pub fn measure(&mut self) -> Result<(), DhtError<LINE::Error>> {
        self.reading().map(|_| ())
    }

    /// Returns the current reading, measuring first if it is due.
    pub fn reading(&mut self) -> Result<Reading, DhtError<LINE::Error>> {
        if let Some(reading) = self.last_reading {
            if self.clock.elapsed(reading.measured_at) < MIN_INTERVAL_US {
                trace!("reusing reading from {}", reading.measured_at);
                return Ok(reading);
            }
        }

        let train = capture(&mut self.line, &mut self.clock, &mut self.delay)?;
        let payload = decode(&train);
        validate(&payload).map_err(|_| {
            warn!(
                "checksum mismatch: got {}, expected {}",
                payload.checksum(),
                payload.expected_checksum()
            );
            DhtError::InvalidChecksum
        })?;

        let reading = Reading {
            temperature: payload.temperature(),
            humidity: payload.humidity(),
            measured_at: self.clock.now(),
        };
        debug!(
            "measured {} C, {} %",
            reading.temperature,
            reading.humidity
        );
        self.last_reading = Some(reading);
        Ok(reading)
    }

    /// Temperature in degrees Celsius, measuring first if it is due.
    pub fn temperature(&mut self) -> Result<f32, DhtError<LINE::Error>> {
        self.reading().map(|r| r.temperature)
    }

    /// Relative humidity in percent, measuring first if it is due.
    pub fn humidity(&mut self) -> Result<f32, DhtError<LINE::Error>> {
        self.reading().map(|r| r.humidity)
    }

    /// The cached reading, without touching the sensor.
    pub fn last_reading(&self) -> Option<Reading> {
        self.last_reading
    }

    /// Releases the line, clock and delay provider.
    pub fn release(self) -> (LINE, CLOCK, DELAY) {
        (self.line, self.clock, self.delay)
    }
}
