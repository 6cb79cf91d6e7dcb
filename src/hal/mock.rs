//! Scripted peripherals for host tests

use std::collections::VecDeque;
use std::vec::Vec;

use core::convert::Infallible;
use embedded_hal::serial;

use crate::error::BusPhase;
use crate::hal::twi::{Direction, TwiController, TwiFault};

/// Bus activity recorded by [`MockTwi`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwiEvent {
    Start(u8, Direction),
    Stop,
    Tx(u8),
    Drain,
    Rx(u8),
}

/// Mock TWI controller
///
/// Records every accepted primitive and serves received bytes from a
/// queue. Each wait first answers `WouldBlock` `busy_polls` times.
#[derive(Debug, Default)]
pub struct MockTwi {
    events: Vec<TwiEvent>,
    rx_data: VecDeque<u8>,
    busy_polls: u32,
    pending: u32,
    stalled: Option<BusPhase>,
    nack_on_tx: Option<usize>,
    tx_count: usize,
}

impl MockTwi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rx_data(data: &[u8]) -> Self {
        let mut twi = Self::new();
        twi.queue_rx(data);
        twi
    }

    pub fn queue_rx(&mut self, data: &[u8]) {
        self.rx_data.extend(data.iter().copied());
    }

    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    /// Never become ready in `phase`.
    pub fn stall_in(&mut self, phase: BusPhase) {
        self.stalled = Some(phase);
    }

    /// Fail the `index`-th transmitted byte (0-based) with a NACK.
    pub fn nack_on_tx(&mut self, index: usize) {
        self.nack_on_tx = Some(index);
    }

    pub fn events(&self) -> &[TwiEvent] {
        &self.events
    }

    fn ready(&mut self, phase: BusPhase) -> nb::Result<(), TwiFault> {
        if self.stalled == Some(phase) {
            return Err(nb::Error::WouldBlock);
        }
        if self.pending < self.busy_polls {
            self.pending += 1;
            return Err(nb::Error::WouldBlock);
        }
        self.pending = 0;
        Ok(())
    }
}

impl TwiController for MockTwi {
    type Error = TwiFault;

    fn start(&mut self, address: u8, direction: Direction) {
        self.events.push(TwiEvent::Start(address, direction));
    }

    fn stop(&mut self) {
        self.events.push(TwiEvent::Stop);
    }

    fn stop_complete(&mut self) -> nb::Result<(), TwiFault> {
        self.ready(BusPhase::Stop)
    }

    fn transmit(&mut self, byte: u8) -> nb::Result<(), TwiFault> {
        self.ready(BusPhase::Transmit)?;
        let index = self.tx_count;
        self.tx_count += 1;
        if self.nack_on_tx == Some(index) {
            return Err(nb::Error::Other(TwiFault::Nack));
        }
        self.events.push(TwiEvent::Tx(byte));
        Ok(())
    }

    fn drain(&mut self) -> nb::Result<(), TwiFault> {
        self.ready(BusPhase::Drain)?;
        self.events.push(TwiEvent::Drain);
        Ok(())
    }

    fn receive(&mut self) -> nb::Result<u8, TwiFault> {
        self.ready(BusPhase::Receive)?;
        match self.rx_data.pop_front() {
            Some(byte) => {
                self.events.push(TwiEvent::Rx(byte));
                Ok(byte)
            }
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// Mock serial transmitter collecting written bytes
#[derive(Debug, Default)]
pub struct MockSerial {
    output: Vec<u8>,
    busy_polls: u32,
    pending: u32,
    stalled: bool,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.output.clone()).expect("serial output is UTF-8")
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().split("\r\n").map(String::from).collect()
    }
}

impl serial::Write<u8> for MockSerial {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        if self.stalled {
            return Err(nb::Error::WouldBlock);
        }
        if self.pending < self.busy_polls {
            self.pending += 1;
            return Err(nb::Error::WouldBlock);
        }
        self.pending = 0;
        self.output.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}
