//! DHT Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic, edge-timing driver for DHT-family
//! single-wire temperature and humidity sensors.
//!
//! Instead of sampling each bit at a fixed delay, the driver polls the data
//! line, records the duration of every level the sensor drives, and decodes
//! the frame from those durations:
//!
//! 1. [`capture`](capture::capture) sends the start signal and records the
//!    84 transitions of a frame into a [`PulseTrain`].
//! 2. [`decode`] turns the train into a five byte [`Payload`].
//! 3. [`validate`] checks the payload's checksum.
//! 4. [`Dht`] runs the three stages and caches the result for
//!    [`MIN_INTERVAL_US`].
//!
//! # Features
//! - Blocking synchronous API, allocation free
//! - Designed for `no_std` environments
//! - Hardware behind the [`DataLine`] and [`TimeSource`] traits, so the
//!   protocol can be tested against a scripted line and a fake clock
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`DelayNs`] for the start signal
//! - [`InputPin`] and [`OutputPin`] through [`OpenDrainLine`]
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and emits driver logs through `defmt`
//! - `serde`: Serializes [`Reading`] as `{"timestamp", "temp", "humidity"}`
//! - `std`: Provides [`StdClock`](hal::StdClock)
//!
//! [`DelayNs`]: embedded_hal::delay::DelayNs
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod fmt;

pub mod capture;
pub mod dht;
pub mod error;
pub mod hal;
pub mod payload;

#[cfg(test)]
mod sim;

pub use capture::{EXPECTED_PULSES, MAX_UNCHANGED, PulseTrain};
pub use dht::{Dht, MIN_INTERVAL_US, Reading};
pub use error::DhtError;
pub use hal::{DataLine, OpenDrainLine, Pull, TimeSource};
pub use payload::{HIGH_LEVEL_US, InvalidChecksum, Payload, decode, validate};
