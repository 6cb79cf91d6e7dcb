//! Peripheral bindings for the ATmega128(A)
//!
//! Registers come from the `atmega128a` device module of `avr-device`.
//!
//! ```ignore
//! let dp = avr_device::atmega128a::Peripherals::take().unwrap();
//!
//! let bus = BusMaster::new(Twi::new(dp.TWI), BusConfig::default());
//! let monitor = MyMonitorDriver::new(bus);
//! let publisher = TelemetryPublisher::new(Usart0::new(dp.USART0), SerialConfig::default());
//!
//! SupervisorLoop::new(monitor, publisher, Delay::new(dp.TC0), SupervisorConfig::default()).run()
//! ```

pub mod delay;
pub mod twi;
pub mod usart;

pub use delay::Delay;
pub use twi::Twi;
pub use usart::Usart0;
