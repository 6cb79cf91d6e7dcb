//! USART0 transmitter on the ATmega128

use core::convert::Infallible;

use avr_device::atmega128a::USART0;
use embedded_hal::serial;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// UCSR0A bits
const UDRE0: u8 = 0x20;
const TXC0: u8 = 0x40;
const U2X0: u8 = 0x02;

// UCSR0B bits
const TXEN0: u8 = 0x08;

// UCSR0C: 8 data bits, no parity, 1 stop bit
const UCSZ_8N1: u8 = 0x06;

/// Baud divisor in double-speed mode
const fn ubrr() -> u16 {
    (CPU_FREQ_HZ / (8 * UART_BAUD) - 1) as u16
}

/// Polled USART0 transmitter, no interrupts
pub struct Usart0 {
    usart: USART0,
}

impl Usart0 {
    pub fn new(usart: USART0) -> Self {
        let [high, low] = ubrr().to_be_bytes();
        unsafe {
            usart.ubrr0h.write(|w| w.bits(high));
            usart.ubrr0l.write(|w| w.bits(low));
            usart.ucsr0a.write(|w| w.bits(U2X0));
            usart.ucsr0c.write(|w| w.bits(UCSZ_8N1));
            usart.ucsr0b.write(|w| w.bits(TXEN0));
        }

        Self { usart }
    }

    pub fn free(self) -> USART0 {
        self.usart
    }
}

impl serial::Write<u8> for Usart0 {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().bits() & UDRE0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        unsafe { self.usart.udr0.write(|w| w.bits(word)) };
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().bits() & TXC0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}
