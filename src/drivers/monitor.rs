//! Battery monitor driver interface
//!
//! The device driver itself (register map, chemistry handling) lives
//! outside this crate. It talks to the device through a [`BusMaster`] and
//! hands back one [`MonitorReading`] per acquisition.
//!
//! [`BusMaster`]: crate::drivers::BusMaster

/// Maximum number of series cells a reading can carry
pub const MAX_CELLS: usize = 16;

/// Number of temperature sensors on the monitor
pub const TEMP_SENSORS: usize = 4;

/// Protection faults latched by the monitor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProtectionStatus {
    pub overvoltage: bool,
    pub undervoltage: bool,
    pub overcurrent_charge: bool,
    pub overcurrent_discharge: bool,
    pub overtemperature: bool,
    pub undertemperature: bool,
    pub short_circuit: bool,
}

/// Charge/discharge FET enables
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetState {
    pub charge: bool,
    pub discharge: bool,
}

/// One raw acquisition from the battery monitor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorReading {
    /// Millivolts, first `num_cells` entries valid
    pub cell_voltages: [u16; MAX_CELLS],
    pub num_cells: u8,
    /// Stack voltage in millivolts
    pub stack_voltage: u32,
    /// Milliamps, positive while charging
    pub current: i32,
    /// Tenths of a degree Celsius
    pub temperatures: [i16; TEMP_SENSORS],
    /// State of charge in percent
    pub soc: u8,
    pub protection: ProtectionStatus,
    pub fets: FetState,
    /// Bit i set while cell i is being balanced
    pub balancing_cells: u16,
}

/// A device driver able to produce readings
pub trait BatteryMonitor {
    type Error;

    /// Refresh every field of `reading` from the device.
    ///
    /// On error `reading` may be partially written and must not be used.
    fn acquire(&mut self, reading: &mut MonitorReading) -> Result<(), Self::Error>;
}
