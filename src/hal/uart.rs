//! Blocking byte-at-a-time serial output

use embedded_hal::serial;
use ufmt::uWrite;

use crate::error::SerialError;
use crate::hal::{poll, PollError};

/// Writes text to a serial port one byte at a time, waiting on the
/// transmitter for at most `poll_limit` polls per byte.
pub struct SerialSink<'a, S> {
    serial: &'a mut S,
    poll_limit: u32,
}

impl<'a, S, E> SerialSink<'a, S>
where
    S: serial::Write<u8, Error = E>,
{
    pub fn new(serial: &'a mut S, poll_limit: u32) -> Self {
        Self { serial, poll_limit }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), SerialError<E>> {
        let serial = &mut *self.serial;
        poll(self.poll_limit, || serial.write(byte)).map_err(|e| match e {
            PollError::Exhausted => SerialError::Stall,
            PollError::Other(e) => SerialError::Serial(e),
        })
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError<E>> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

impl<'a, S, E> uWrite for SerialSink<'a, S>
where
    S: serial::Write<u8, Error = E>,
{
    type Error = SerialError<E>;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_bytes(s.as_bytes())
    }
}
