pub mod twi;
pub mod uart;

#[cfg(feature = "atmega128")]
pub mod atmega128;

#[cfg(test)]
pub(crate) mod mock;

// Re-export commonly used types
pub use twi::{Direction, TwiController, TwiFault};
pub use uart::SerialSink;

/// Outcome of a bounded poll that did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollError<E> {
    /// `WouldBlock` was returned on every attempt
    Exhausted,
    Other(E),
}

/// Retry a non-blocking operation at most `limit` times.
///
/// A `limit` of zero still makes one attempt.
pub fn poll<T, E, F>(limit: u32, mut op: F) -> Result<T, PollError<E>>
where
    F: FnMut() -> nb::Result<T, E>,
{
    let mut remaining = limit.max(1);
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(nb::Error::Other(e)) => return Err(PollError::Other(e)),
            Err(nb::Error::WouldBlock) => {
                remaining -= 1;
                if remaining == 0 {
                    return Err(PollError::Exhausted);
                }
            }
        }
    }
}
