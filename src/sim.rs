//! Simulated sensor used by the unit tests.
//!
//! A [`Bus`] holds a virtual microsecond clock and a scripted response
//! waveform. Every time the line is switched to input the waveform restarts;
//! every read samples it and advances the clock by one microsecond.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::ErrorType;

use crate::hal::{DataLine, Pull, TimeSource};

/// Microseconds consumed by one poll of the line.
const POLL_US: u32 = 1;

/// Calls made on the line, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Output(Pull),
    Input(Pull),
    Driven(bool),
}

#[derive(Default)]
struct State {
    now: u32,
    input: bool,
    driven: bool,
    response_start: u32,
    response: Vec<(bool, u32)>,
    captures: usize,
    history: Vec<Mode>,
}

impl State {
    fn level(&self) -> bool {
        if !self.input {
            return self.driven;
        }
        let offset = self.now.wrapping_sub(self.response_start);
        let mut end = 0u32;
        for (level, duration) in &self.response {
            end = end.saturating_add(*duration);
            if offset < end {
                return *level;
            }
        }
        // Past the script the line keeps its last level; with no script the
        // pull-up wins.
        self.response.last().map_or(true, |(level, _)| *level)
    }
}

#[derive(Clone)]
pub struct Bus(Rc<RefCell<State>>);

impl Bus {
    pub fn new(now: u32) -> Self {
        Bus(Rc::new(RefCell::new(State {
            now,
            ..State::default()
        })))
    }

    pub fn line(&self) -> SimLine {
        SimLine(self.clone())
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.clone())
    }

    /// Sets the waveform the sensor sends after each start signal.
    pub fn respond_with(&self, segments: Vec<(bool, u32)>) {
        self.0.borrow_mut().response = segments;
    }

    pub fn advance(&self, us: u32) {
        let mut state = self.0.borrow_mut();
        state.now = state.now.wrapping_add(us);
    }

    /// Number of times the line was handed to the sensor.
    pub fn captures(&self) -> usize {
        self.0.borrow().captures
    }

    pub fn history(&self) -> Vec<Mode> {
        self.0.borrow().history.clone()
    }
}

pub struct SimLine(Bus);

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl DataLine for SimLine {
    fn set_output(&mut self, pull: Pull) -> Result<(), Self::Error> {
        let mut state = (self.0).0.borrow_mut();
        state.input = false;
        state.history.push(Mode::Output(pull));
        Ok(())
    }

    fn set_input(&mut self, pull: Pull) -> Result<(), Self::Error> {
        let mut state = (self.0).0.borrow_mut();
        state.input = true;
        state.response_start = state.now;
        state.captures += 1;
        state.history.push(Mode::Input(pull));
        Ok(())
    }

    fn write(&mut self, high: bool) -> Result<(), Self::Error> {
        let mut state = (self.0).0.borrow_mut();
        state.driven = high;
        state.history.push(Mode::Driven(high));
        Ok(())
    }

    fn read(&mut self) -> Result<bool, Self::Error> {
        let mut state = (self.0).0.borrow_mut();
        let level = state.level();
        state.now = state.now.wrapping_add(POLL_US);
        Ok(level)
    }
}

pub struct SimClock(Bus);

impl TimeSource for SimClock {
    fn now(&mut self) -> u32 {
        (self.0).0.borrow().now
    }
}

pub fn waveform(segments: &[(bool, u32)]) -> Vec<(bool, u32)> {
    segments.to_vec()
}

/// The waveform of a complete frame carrying `bytes`.
///
/// Response preamble (pull-up high, 80 µs low, 80 µs high), then per bit a
/// 50 µs low sync pulse and a 26 µs (`0`) or 70 µs (`1`) high data pulse,
/// then the end-of-frame low that the line keeps. That is 84 levels, one
/// transition each.
pub fn frame(bytes: [u8; 5]) -> Vec<(bool, u32)> {
    let mut segments = waveform(&[(true, 30), (false, 80), (true, 80)]);
    for bit in 0..40 {
        let set = bytes[bit / 8] >> (7 - bit % 8) & 1 == 1;
        segments.push((false, 50));
        segments.push((true, if set { 70 } else { 26 }));
    }
    segments.push((false, 50));
    segments
}
