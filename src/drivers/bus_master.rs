//! Addressed register transactions over a TWI controller

use embedded_hal::blocking::i2c;

use crate::config::{BusConfig, StopTiming};
use crate::error::{BusError, BusPhase};
use crate::hal::twi::{Direction, TwiController};
use crate::hal::{poll, PollError};

/// Owns a TWI controller and frames whole transactions on it.
///
/// A failed transaction is always aborted so the next transaction starts
/// from an idle bus.
pub struct BusMaster<C> {
    twi: C,
    config: BusConfig,
}

impl<C: TwiController> BusMaster<C> {
    /// A controller without [`TwiController::STOP_AFTER_RECEIVE`] support
    /// always uses [`StopTiming::BeforeLastByte`].
    pub fn new(twi: C, mut config: BusConfig) -> Self {
        if config.stop_timing == StopTiming::AfterLastByte && !C::STOP_AFTER_RECEIVE {
            crate::log_warn!("controller cannot stop after an acked byte, stopping before the last one");
            config.stop_timing = StopTiming::BeforeLastByte;
        }
        Self { twi, config }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Give back the controller
    pub fn release(self) -> C {
        self.twi
    }

    /// START - ADDR(W) - DATA... - STOP
    pub fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError<C::Error>> {
        self.twi.start(address, Direction::Transmit);
        let result = self.write_body(bytes);
        self.close(result)
    }

    /// Read `buffer.len()` bytes starting at `register`.
    pub fn read_register(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), BusError<C::Error>> {
        self.write_read(address, &[register], buffer)
    }

    /// START - ADDR(W) - BYTES... - RSTART - ADDR(R) - DATA... - STOP
    ///
    /// With an empty `buffer` only the write half is performed.
    pub fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), BusError<C::Error>> {
        if buffer.is_empty() {
            return self.write(address, bytes);
        }

        self.twi.start(address, Direction::Transmit);
        let result = self.read_body(address, bytes, buffer);
        if result.is_err() {
            self.twi.abort();
        }
        result
    }

    fn write_body(&mut self, bytes: &[u8]) -> Result<(), BusError<C::Error>> {
        for &byte in bytes {
            self.wait(BusPhase::Transmit, |twi| twi.transmit(byte))?;
        }
        Ok(())
    }

    fn read_body(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), BusError<C::Error>> {
        self.write_body(bytes)?;
        self.wait(BusPhase::Drain, |twi| twi.drain())?;

        // Repeated start, no stop in between
        self.twi.start(address, Direction::Receive);

        let last = buffer.len() - 1;
        for (i, slot) in buffer.iter_mut().enumerate() {
            if i == last && self.config.stop_timing == StopTiming::BeforeLastByte {
                self.twi.stop();
            }
            *slot = self.wait(BusPhase::Receive, |twi| twi.receive())?;
        }

        if self.config.stop_timing == StopTiming::AfterLastByte {
            self.twi.stop();
        }
        Ok(())
    }

    fn close(&mut self, result: Result<(), BusError<C::Error>>) -> Result<(), BusError<C::Error>> {
        match result.and_then(|()| self.wait(BusPhase::Stop, |twi| twi.stop_complete())) {
            Ok(()) => {
                self.twi.stop();
                Ok(())
            }
            Err(e) => {
                self.twi.abort();
                Err(e)
            }
        }
    }

    fn wait<T, F>(&mut self, phase: BusPhase, mut op: F) -> Result<T, BusError<C::Error>>
    where
        F: FnMut(&mut C) -> nb::Result<T, C::Error>,
    {
        let twi = &mut self.twi;
        poll(self.config.poll_limit, || op(twi)).map_err(|e| match e {
            PollError::Exhausted => {
                crate::log_warn!("bus stalled after {} polls", self.config.poll_limit);
                BusError::Stall(phase)
            }
            PollError::Other(e) => BusError::Controller(e),
        })
    }
}

impl<C: TwiController> i2c::Write for BusMaster<C> {
    type Error = BusError<C::Error>;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        BusMaster::write(self, address, bytes)
    }
}

impl<C: TwiController> i2c::WriteRead for BusMaster<C> {
    type Error = BusError<C::Error>;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
        BusMaster::write_read(self, address, bytes, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::{MockTwi, TwiEvent};
    use crate::hal::twi::TwiFault;
    use TwiEvent::*;

    const ADDR: u8 = crate::config::MONITOR_ADDR;

    fn master(twi: MockTwi) -> BusMaster<MockTwi> {
        BusMaster::new(twi, BusConfig::default())
    }

    #[test]
    fn write_frames_bytes_between_start_and_stop() {
        let mut bus = master(MockTwi::new());
        bus.write(ADDR, &[0x3E, 0x01, 0x02]).unwrap();

        let twi = bus.release();
        assert_eq!(
            twi.events(),
            &[
                Start(ADDR, Direction::Transmit),
                Tx(0x3E),
                Tx(0x01),
                Tx(0x02),
                Stop,
            ]
        );
    }

    #[test]
    fn empty_write_is_start_then_stop() {
        let mut bus = master(MockTwi::new());
        bus.write(ADDR, &[]).unwrap();

        let twi = bus.release();
        assert_eq!(twi.events(), &[Start(ADDR, Direction::Transmit), Stop]);
    }

    #[test]
    fn read_register_stops_before_last_byte() {
        let mut bus = master(MockTwi::with_rx_data(&[0xE4, 0x0C, 0x7F]));
        let mut buffer = [0u8; 3];
        bus.read_register(ADDR, 0x14, &mut buffer).unwrap();

        assert_eq!(buffer, [0xE4, 0x0C, 0x7F]);
        let twi = bus.release();
        assert_eq!(
            twi.events(),
            &[
                Start(ADDR, Direction::Transmit),
                Tx(0x14),
                Drain,
                Start(ADDR, Direction::Receive),
                Rx(0xE4),
                Rx(0x0C),
                Stop,
                Rx(0x7F),
            ]
        );
    }

    #[test]
    fn single_byte_read_stops_right_after_repeated_start() {
        let mut bus = master(MockTwi::with_rx_data(&[0x55]));
        let mut buffer = [0u8; 1];
        bus.read_register(ADDR, 0x2C, &mut buffer).unwrap();

        let twi = bus.release();
        assert_eq!(
            &twi.events()[3..],
            &[Start(ADDR, Direction::Receive), Stop, Rx(0x55)]
        );
    }

    #[test]
    fn stop_after_last_byte_when_configured() {
        let config = BusConfig {
            stop_timing: StopTiming::AfterLastByte,
            ..BusConfig::default()
        };
        let mut bus = BusMaster::new(MockTwi::with_rx_data(&[1, 2]), config);
        let mut buffer = [0u8; 2];
        bus.read_register(ADDR, 0x00, &mut buffer).unwrap();

        let twi = bus.release();
        assert_eq!(&twi.events()[4..], &[Rx(1), Rx(2), Stop]);
    }

    /// Controller that can only stop by NACKing the final byte
    struct NackStopTwi(MockTwi);

    impl TwiController for NackStopTwi {
        type Error = TwiFault;

        const STOP_AFTER_RECEIVE: bool = false;

        fn start(&mut self, address: u8, direction: Direction) {
            self.0.start(address, direction)
        }

        fn stop(&mut self) {
            self.0.stop()
        }

        fn stop_complete(&mut self) -> nb::Result<(), TwiFault> {
            self.0.stop_complete()
        }

        fn transmit(&mut self, byte: u8) -> nb::Result<(), TwiFault> {
            self.0.transmit(byte)
        }

        fn drain(&mut self) -> nb::Result<(), TwiFault> {
            self.0.drain()
        }

        fn receive(&mut self) -> nb::Result<u8, TwiFault> {
            self.0.receive()
        }
    }

    #[test]
    fn stop_after_last_byte_falls_back_when_controller_cannot() {
        let config = BusConfig {
            stop_timing: StopTiming::AfterLastByte,
            ..BusConfig::default()
        };
        let twi = NackStopTwi(MockTwi::with_rx_data(&[1, 2]));
        let mut bus = BusMaster::new(twi, config);
        assert_eq!(bus.config().stop_timing, StopTiming::BeforeLastByte);

        let mut buffer = [0u8; 2];
        bus.read_register(ADDR, 0x00, &mut buffer).unwrap();
        assert_eq!(buffer, [1, 2]);

        let twi = bus.release().0;
        assert_eq!(&twi.events()[4..], &[Rx(1), Stop, Rx(2)]);
    }

    #[test]
    fn empty_read_only_writes_register_pointer() {
        let mut bus = master(MockTwi::new());
        bus.read_register(ADDR, 0x14, &mut []).unwrap();

        let twi = bus.release();
        assert_eq!(
            twi.events(),
            &[Start(ADDR, Direction::Transmit), Tx(0x14), Stop]
        );
    }

    #[test]
    fn busy_flags_are_waited_out() {
        let mut twi = MockTwi::with_rx_data(&[0xAA, 0xBB]);
        twi.set_busy_polls(25);
        let mut bus = master(twi);

        let mut buffer = [0u8; 2];
        bus.read_register(ADDR, 0x10, &mut buffer).unwrap();
        assert_eq!(buffer, [0xAA, 0xBB]);
    }

    #[test]
    fn stalled_receive_is_reported_and_bus_released() {
        let mut twi = MockTwi::with_rx_data(&[0x01]);
        twi.stall_in(BusPhase::Receive);
        let config = BusConfig {
            poll_limit: 50,
            ..BusConfig::default()
        };
        let mut bus = BusMaster::new(twi, config);

        let mut buffer = [0u8; 2];
        let result = bus.read_register(ADDR, 0x10, &mut buffer);
        assert_eq!(result, Err(BusError::Stall(BusPhase::Receive)));

        let twi = bus.release();
        assert_eq!(twi.events().last(), Some(&Stop));
    }

    #[test]
    fn stalled_stop_is_reported() {
        let mut twi = MockTwi::new();
        twi.stall_in(BusPhase::Stop);
        let mut bus = master(twi);

        assert_eq!(bus.write(ADDR, &[0x01]), Err(BusError::Stall(BusPhase::Stop)));
    }

    #[test]
    fn nack_surfaces_as_controller_fault() {
        let mut twi = MockTwi::new();
        twi.nack_on_tx(1);
        let mut bus = master(twi);

        let result = bus.write(ADDR, &[0x01, 0x02, 0x03]);
        assert_eq!(result, Err(BusError::Controller(TwiFault::Nack)));

        let twi = bus.release();
        assert_eq!(
            twi.events(),
            &[Start(ADDR, Direction::Transmit), Tx(0x01), Stop]
        );
    }

    #[test]
    fn embedded_hal_traits_forward_to_transactions() {
        fn read_word<I: i2c::WriteRead>(i2c: &mut I) -> Result<u16, I::Error> {
            let mut raw = [0u8; 2];
            i2c.write_read(ADDR, &[0x9A], &mut raw)?;
            Ok(u16::from_le_bytes(raw))
        }

        let mut bus = master(MockTwi::with_rx_data(&[0x34, 0x12]));
        assert_eq!(read_word(&mut bus), Ok(0x1234));

        i2c::Write::write(&mut bus, ADDR, &[0x61, 0x00]).unwrap();
        let twi = bus.release();
        assert_eq!(twi.events().len(), 11);
    }
}
