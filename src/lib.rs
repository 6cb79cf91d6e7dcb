//! Battery-monitor telemetry for bare-metal microcontrollers.
//!
//! A [`BusMaster`](drivers::BusMaster) frames register transactions on a
//! TWI controller for the monitor driver, a
//! [`TelemetrySnapshot`](telemetry::TelemetrySnapshot) keeps the latest pack
//! state, and the [`SupervisorLoop`](application::SupervisorLoop) publishes
//! it as text over a serial port every few cycles.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod logging;

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod hal;
pub mod telemetry;

pub use application::{CycleReport, SupervisorLoop};
pub use drivers::{BatteryMonitor, BusMaster, MonitorReading};
pub use error::{BusError, BusPhase, SerialError};
pub use telemetry::{TelemetryPublisher, TelemetrySnapshot};
