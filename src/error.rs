//! Error types for bus and serial operations

use core::fmt;

/// Step of a bus transaction that was waiting when a poll limit ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusPhase {
    /// Waiting for the transmit buffer to accept a byte
    Transmit,
    /// Waiting for the last loaded byte to leave the transmit buffer
    Drain,
    /// Waiting for a received byte
    Receive,
    /// Waiting for a previous stop condition to complete
    Stop,
}

/// Bus transaction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<E> {
    /// A ready flag never came up within the poll limit
    Stall(BusPhase),
    /// The controller reported a fault (missing ACK, lost arbitration)
    Controller(E),
}

/// Serial transmit failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError<E> {
    /// The transmitter never became ready within the poll limit
    Stall,
    /// The serial peripheral reported an error
    Serial(E),
}

/// Coarse classification of the last fault seen by the supervisor loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ErrorCode {
    AcquisitionFailed = 0x3000,
    PublishFailed = 0x3100,
}

impl<E: fmt::Debug> fmt::Display for BusError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Stall(phase) => write!(f, "bus stalled during {:?}", phase),
            BusError::Controller(e) => write!(f, "bus controller fault: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for SerialError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::Stall => write!(f, "serial transmitter stalled"),
            SerialError::Serial(e) => write!(f, "serial error: {:?}", e),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::AcquisitionFailed => write!(f, "acquisition failed"),
            ErrorCode::PublishFailed => write!(f, "publish failed"),
        }
    }
}
