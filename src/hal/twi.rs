//! TWI (I2C) controller interface
//!
//! The primitives a bus master drives. Every flag wait is expressed as a
//! non-blocking `nb` call returning `WouldBlock` until the hardware is
//! ready, so callers decide how long to keep polling.

/// Transfer direction of a (repeated) start condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Transmit,
    Receive,
}

/// Faults a controller can report for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiFault {
    /// Address or data byte was not acknowledged
    Nack,
    /// Another master won arbitration
    ArbitrationLost,
    /// Unexpected controller state
    Bus,
}

/// Single-owner TWI master peripheral
pub trait TwiController {
    type Error;

    /// Whether a stop can still be requested once the final received byte
    /// has been acknowledged. Controllers that can only stop by NACKing the
    /// last byte set this to `false`.
    const STOP_AFTER_RECEIVE: bool = true;

    /// Queue a start condition addressed to `address`. Issued while a
    /// transaction is open this is a repeated start.
    fn start(&mut self, address: u8, direction: Direction);

    /// Request a stop condition at the end of the current byte.
    fn stop(&mut self);

    /// Abandon the current transaction and release the bus.
    fn abort(&mut self) {
        self.stop();
    }

    /// Ready once no previously requested stop is still in progress.
    fn stop_complete(&mut self) -> nb::Result<(), Self::Error>;

    /// Load one byte once the transmit buffer can take it.
    fn transmit(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Ready once the last loaded byte has left the transmit buffer.
    fn drain(&mut self) -> nb::Result<(), Self::Error>;

    /// Take one received byte once available.
    fn receive(&mut self) -> nb::Result<u8, Self::Error>;
}
