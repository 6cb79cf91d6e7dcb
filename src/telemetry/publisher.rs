//! Text report of a telemetry snapshot over a serial port

use embedded_hal::serial;
use ufmt::{uWrite, uwrite};

use crate::config::SerialConfig;
use crate::error::SerialError;
use crate::hal::SerialSink;
use crate::telemetry::format::{CellNumber, DeciCelsius, Milliamps, Millivolts};
use crate::telemetry::TelemetrySnapshot;

/// Renders snapshots as `\r\n`-terminated text lines
pub struct TelemetryPublisher<S> {
    serial: S,
    config: SerialConfig,
}

impl<S, E> TelemetryPublisher<S>
where
    S: serial::Write<u8, Error = E>,
{
    pub fn new(serial: S, config: SerialConfig) -> Self {
        Self { serial, config }
    }

    /// Give back the serial port
    pub fn release(self) -> S {
        self.serial
    }

    /// Write the full report for `snapshot`.
    ///
    /// ```text
    /// SOC: 76%
    /// Pack Voltage: 13.205V
    /// Current: -1.500A
    ///
    /// Cell Voltages:
    ///   Cell  1: 3.300V
    ///   Cell  2: 3.310V [BAL]
    ///
    /// Temperatures:
    ///   Sensor 1: 25.3°C
    /// ```
    pub fn publish(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), SerialError<E>> {
        let mut out = SerialSink::new(&mut self.serial, self.config.poll_limit);

        uwrite!(out, "SOC: {}%\r\n", snapshot.soc())?;
        uwrite!(out, "Pack Voltage: {}V\r\n", Millivolts(snapshot.pack_voltage()))?;
        uwrite!(out, "Current: {}A\r\n", Milliamps(snapshot.current()))?;

        out.write_str("\r\nCell Voltages:\r\n")?;
        for (i, &mv) in snapshot.cell_voltages().iter().enumerate() {
            uwrite!(out, "  Cell {}: {}V", CellNumber(i + 1), Millivolts(u32::from(mv)))?;
            if snapshot.is_balancing(i) {
                out.write_str(" [BAL]")?;
            }
            out.write_str("\r\n")?;
        }

        out.write_str("\r\nTemperatures:\r\n")?;
        for (i, &t) in snapshot.temperatures().iter().enumerate() {
            uwrite!(out, "  Sensor {}: {}", i + 1, DeciCelsius(t))?;
            out.write_str("°C\r\n")?;
        }

        Ok(())
    }

    /// Warn that the following report carries data `age` cycles old.
    pub fn publish_stale_notice(&mut self, age: u32) -> Result<(), SerialError<E>> {
        let mut out = SerialSink::new(&mut self.serial, self.config.poll_limit);
        uwrite!(out, "STALE: no update for {} cycles\r\n", age)
    }
}
