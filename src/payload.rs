//! Turning a captured pulse train into checked sensor bytes.

use crate::capture::PulseTrain;

/// Data pulses longer than this many microseconds encode a `1` bit.
pub const HIGH_LEVEL_US: u32 = 50;

/// Bytes in one sensor frame, checksum included.
pub const PAYLOAD_LEN: usize = 5;

/// The five bytes of one sensor frame:
/// `[humidity-int, humidity-dec, temperature-int, temperature-dec, checksum]`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payload([u8; PAYLOAD_LEN]);

/// The checksum byte did not match the data bytes.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidChecksum;

impl Payload {
    /// Wraps raw frame bytes without checking them.
    pub const fn from_bytes(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Payload(bytes)
    }

    /// Raw frame bytes.
    pub const fn bytes(&self) -> [u8; PAYLOAD_LEN] {
        self.0
    }

    /// Checksum carried in the frame.
    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Low 8 bits of the sum of the four data bytes.
    pub fn expected_checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Whether the carried checksum matches the data bytes.
    pub fn is_valid(&self) -> bool {
        self.expected_checksum() == self.checksum()
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        tenths(self.0[0], self.0[1])
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> f32 {
        tenths(self.0[2], self.0[3])
    }
}

/// The sensor sends each value as an integral byte and a tenths byte.
fn tenths(integral: u8, decimal: u8) -> f32 {
    f32::from(integral) + f32::from(decimal) / 10.0
}

/// Decodes a pulse train into a payload.
///
/// Pulses alternate sync, data, sync, data. Only the data pulses (odd
/// indices) carry information: longer than [`HIGH_LEVEL_US`] is a `1`.
/// Bits are packed MSB first. Any train decodes; garbage simply fails
/// [`validate`] afterwards.
pub fn decode(train: &PulseTrain) -> Payload {
    let mut bytes = [0u8; PAYLOAD_LEN];

    for (bit, duration) in train.durations().iter().skip(1).step_by(2).enumerate() {
        if *duration > HIGH_LEVEL_US {
            bytes[bit / 8] |= 1 << (7 - bit % 8);
        }
    }

    Payload(bytes)
}

/// Checks the frame's checksum. A payload that fails is discarded whole.
pub fn validate(payload: &Payload) -> Result<(), InvalidChecksum> {
    if payload.is_valid() {
        Ok(())
    } else {
        Err(InvalidChecksum)
    }
}
