//! Millisecond busy-wait on Timer0

use avr_device::atmega128a::TC0;
use embedded_hal::blocking::delay::DelayMs;

// Timer0 clk/64: 16 MHz / 64 = 250 kHz, 250 ticks per millisecond
const PRESCALE_64: u8 = 0x04;
const TICKS_PER_MS: u8 = 250;

pub struct Delay {
    timer: TC0,
}

impl Delay {
    pub fn new(timer: TC0) -> Self {
        unsafe {
            timer.tccr0.write(|w| w.bits(0));
            timer.tcnt0.write(|w| w.bits(0));
        }
        Self { timer }
    }

    pub fn free(self) -> TC0 {
        self.timer
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        unsafe {
            self.timer.tcnt0.write(|w| w.bits(0));
            self.timer.tccr0.write(|w| w.bits(PRESCALE_64));
        }

        for _ in 0..ms {
            while self.timer.tcnt0.read().bits() < TICKS_PER_MS {}
            unsafe { self.timer.tcnt0.write(|w| w.bits(0)) };
        }

        unsafe { self.timer.tccr0.write(|w| w.bits(0)) };
    }
}
