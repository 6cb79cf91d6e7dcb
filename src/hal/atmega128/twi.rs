//! TWI controller on the ATmega128

use avr_device::atmega128a::TWI;

use crate::config::{CPU_FREQ_HZ, TWI_FREQ_HZ};
use crate::hal::twi::{Direction, TwiController, TwiFault};

// TWCR bits
const TWINT: u8 = 0x80;
const TWEA: u8 = 0x40;
const TWSTA: u8 = 0x20;
const TWSTO: u8 = 0x10;
const TWEN: u8 = 0x04;

/// TWI status codes (TWSR & 0xF8)
#[derive(Clone, Copy, PartialEq)]
#[repr(u8)]
enum TwiStatus {
    StartTransmitted = 0x08,
    RepStartTransmitted = 0x10,
    AddrWriteAck = 0x18,
    AddrWriteNack = 0x20,
    DataWriteAck = 0x28,
    DataWriteNack = 0x30,
    ArbitrationLost = 0x38,
    AddrReadAck = 0x40,
    AddrReadNack = 0x48,
    DataReadAck = 0x50,
    DataReadNack = 0x58,
}

/// SCL = CPU / (16 + 2 * TWBR), prescaler 1
const fn twbr() -> u8 {
    ((CPU_FREQ_HZ / TWI_FREQ_HZ - 16) / 2) as u8
}

/// The TWI peripheral driven as a polled master.
///
/// Each primitive advances the hardware by at most one bus step per call
/// and answers `WouldBlock` while TWINT is clear.
pub struct Twi {
    twi: TWI,
    /// SLA+R/W waiting for the start condition to complete
    address: Option<u8>,
    direction: Direction,
    /// A received byte has been clocked in and not yet collected
    rx_armed: bool,
    /// Answer the next received byte with NACK, then stop
    nack_next: bool,
}

impl Twi {
    pub fn new(twi: TWI) -> Self {
        unsafe {
            twi.twbr.write(|w| w.bits(twbr()));
            twi.twsr.write(|w| w.bits(0));
            twi.twcr.write(|w| w.bits(TWEN));
        }

        Self {
            twi,
            address: None,
            direction: Direction::Transmit,
            rx_armed: false,
            nack_next: false,
        }
    }

    pub fn free(self) -> TWI {
        self.twi
    }

    fn control(&self) -> u8 {
        self.twi.twcr.read().bits()
    }

    fn set_control(&mut self, bits: u8) {
        unsafe { self.twi.twcr.write(|w| w.bits(bits)) }
    }

    fn status(&self) -> u8 {
        self.twi.twsr.read().bits() & 0xF8
    }

    fn idle(&self) -> nb::Result<(), TwiFault> {
        if self.control() & TWINT == 0 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    fn check(&self, ok: &[TwiStatus]) -> Result<(), TwiFault> {
        let status = self.status();
        if ok.iter().any(|s| *s as u8 == status) {
            return Ok(());
        }
        Err(match status {
            s if s == TwiStatus::AddrWriteNack as u8
                || s == TwiStatus::DataWriteNack as u8
                || s == TwiStatus::AddrReadNack as u8 =>
            {
                TwiFault::Nack
            }
            s if s == TwiStatus::ArbitrationLost as u8 => TwiFault::ArbitrationLost,
            _ => TwiFault::Bus,
        })
    }

    /// Send SLA+R/W once the start condition is on the bus.
    fn send_address(&mut self) -> nb::Result<(), TwiFault> {
        if let Some(sla) = self.address.take() {
            self.check(&[TwiStatus::StartTransmitted, TwiStatus::RepStartTransmitted])?;
            unsafe { self.twi.twdr.write(|w| w.bits(sla)) };
            self.set_control(TWINT | TWEN);
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}

impl TwiController for Twi {
    type Error = TwiFault;

    // Status 0x50 (data received, ACK returned) offers no STOP action
    const STOP_AFTER_RECEIVE: bool = false;

    fn start(&mut self, address: u8, direction: Direction) {
        let rw = (direction == Direction::Receive) as u8;
        self.address = Some((address << 1) | rw);
        self.direction = direction;
        self.rx_armed = false;
        self.nack_next = false;
        self.set_control(TWINT | TWSTA | TWEN);
    }

    /// In receive direction the stop goes out once the next byte has been
    /// answered with NACK.
    fn stop(&mut self) {
        if self.direction == Direction::Receive {
            self.nack_next = true;
            return;
        }
        self.set_control(TWINT | TWSTO | TWEN);
    }

    fn abort(&mut self) {
        self.address = None;
        self.rx_armed = false;
        self.nack_next = false;
        self.set_control(TWINT | TWSTO | TWEN);
    }

    fn stop_complete(&mut self) -> nb::Result<(), TwiFault> {
        if self.control() & TWSTO != 0 {
            return Err(nb::Error::WouldBlock);
        }
        if self.direction == Direction::Transmit {
            self.idle()?;
            self.send_address()?;
        }
        Ok(())
    }

    fn transmit(&mut self, byte: u8) -> nb::Result<(), TwiFault> {
        self.idle()?;
        self.send_address()?;
        self.check(&[TwiStatus::AddrWriteAck, TwiStatus::DataWriteAck])?;

        unsafe { self.twi.twdr.write(|w| w.bits(byte)) };
        self.set_control(TWINT | TWEN);
        Ok(())
    }

    fn drain(&mut self) -> nb::Result<(), TwiFault> {
        self.idle()?;
        self.send_address()?;
        self.check(&[TwiStatus::AddrWriteAck, TwiStatus::DataWriteAck])?;
        Ok(())
    }

    fn receive(&mut self) -> nb::Result<u8, TwiFault> {
        self.idle()?;
        self.send_address()?;

        if !self.rx_armed {
            self.check(&[TwiStatus::AddrReadAck, TwiStatus::DataReadAck])?;
            let ack = if self.nack_next { 0 } else { TWEA };
            self.set_control(TWINT | ack | TWEN);
            self.rx_armed = true;
            return Err(nb::Error::WouldBlock);
        }

        self.check(&[TwiStatus::DataReadAck, TwiStatus::DataReadNack])?;
        let byte = self.twi.twdr.read().bits();
        self.rx_armed = false;
        if self.status() == TwiStatus::DataReadNack as u8 {
            self.set_control(TWINT | TWSTO | TWEN);
        }
        Ok(byte)
    }
}
