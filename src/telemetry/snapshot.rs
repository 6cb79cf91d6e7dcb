//! Pack state snapshot

use bitflags::bitflags;

use crate::drivers::monitor::{FetState, MonitorReading, ProtectionStatus, MAX_CELLS, TEMP_SENSORS};

bitflags! {
    /// Latched protection faults, bit positions fixed for reporting
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ProtectionFlags: u8 {
        const OVERVOLTAGE = 1 << 0;
        const UNDERVOLTAGE = 1 << 1;
        const OVERCURRENT_CHARGE = 1 << 2;
        const OVERCURRENT_DISCHARGE = 1 << 3;
        const OVERTEMPERATURE = 1 << 4;
        const UNDERTEMPERATURE = 1 << 5;
        const SHORT_CIRCUIT = 1 << 6;
    }
}

bitflags! {
    /// FET enables, bit positions fixed for reporting
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FetStatus: u8 {
        const CHARGE = 1 << 0;
        const DISCHARGE = 1 << 1;
    }
}

impl From<ProtectionStatus> for ProtectionFlags {
    fn from(status: ProtectionStatus) -> Self {
        let mut flags = ProtectionFlags::empty();
        flags.set(ProtectionFlags::OVERVOLTAGE, status.overvoltage);
        flags.set(ProtectionFlags::UNDERVOLTAGE, status.undervoltage);
        flags.set(ProtectionFlags::OVERCURRENT_CHARGE, status.overcurrent_charge);
        flags.set(ProtectionFlags::OVERCURRENT_DISCHARGE, status.overcurrent_discharge);
        flags.set(ProtectionFlags::OVERTEMPERATURE, status.overtemperature);
        flags.set(ProtectionFlags::UNDERTEMPERATURE, status.undertemperature);
        flags.set(ProtectionFlags::SHORT_CIRCUIT, status.short_circuit);
        flags
    }
}

impl From<FetState> for FetStatus {
    fn from(state: FetState) -> Self {
        let mut status = FetStatus::empty();
        status.set(FetStatus::CHARGE, state.charge);
        status.set(FetStatus::DISCHARGE, state.discharge);
        status
    }
}

/// The one consistent view of pack state.
///
/// Starts zeroed and is replaced wholesale by [`update`](Self::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    cell_voltages: [u16; MAX_CELLS],
    pack_voltage: u32,
    current: i32,
    temperatures: [i16; TEMP_SENSORS],
    soc: u8,
    num_cells: u8,
    protection: ProtectionFlags,
    fets: FetStatus,
    balancing: u16,
    timestamp: u32,
    /// Set by the first [`update`](Self::update)
    updated: bool,
}

impl TelemetrySnapshot {
    pub const fn new() -> Self {
        Self {
            cell_voltages: [0; MAX_CELLS],
            pack_voltage: 0,
            current: 0,
            temperatures: [0; TEMP_SENSORS],
            soc: 0,
            num_cells: 0,
            protection: ProtectionFlags::empty(),
            fets: FetStatus::empty(),
            balancing: 0,
            timestamp: 0,
            updated: false,
        }
    }

    /// Replace every field from `reading`, stamped with tick `now`.
    ///
    /// A cell count above [`MAX_CELLS`] is clamped.
    pub fn update(&mut self, reading: &MonitorReading, now: u32) {
        let mut num_cells = reading.num_cells;
        if usize::from(num_cells) > MAX_CELLS {
            crate::log_warn!("monitor reported {} cells, clamping", num_cells);
            num_cells = MAX_CELLS as u8;
        }

        self.cell_voltages = reading.cell_voltages;
        self.pack_voltage = reading.stack_voltage;
        self.current = reading.current;
        self.temperatures = reading.temperatures;
        self.soc = reading.soc;
        self.num_cells = num_cells;
        self.protection = reading.protection.into();
        self.fets = reading.fets.into();
        self.balancing = reading.balancing_cells;
        self.timestamp = now;
        self.updated = true;
    }

    /// Voltages of the populated cells, in millivolts
    pub fn cell_voltages(&self) -> &[u16] {
        &self.cell_voltages[..usize::from(self.num_cells)]
    }

    pub fn pack_voltage(&self) -> u32 {
        self.pack_voltage
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn temperatures(&self) -> &[i16; TEMP_SENSORS] {
        &self.temperatures
    }

    pub fn soc(&self) -> u8 {
        self.soc
    }

    pub fn num_cells(&self) -> u8 {
        self.num_cells
    }

    pub fn protection(&self) -> ProtectionFlags {
        self.protection
    }

    pub fn fets(&self) -> FetStatus {
        self.fets
    }

    /// Raw balancing mask as reported; bits at or above `num_cells` are noise
    pub fn balancing_status(&self) -> u16 {
        self.balancing
    }

    /// Whether cell `index` (0-based) is being balanced
    pub fn is_balancing(&self, index: usize) -> bool {
        index < usize::from(self.num_cells) && self.balancing & (1 << index) != 0
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Whether any reading has been stored yet
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Ticks elapsed since the last update
    pub fn age(&self, now: u32) -> u32 {
        now.wrapping_sub(self.timestamp)
    }

    /// A snapshot that was never updated is always stale.
    pub fn is_stale(&self, now: u32, max_age: u32) -> bool {
        !self.updated || self.age(now) > max_age
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::new()
    }
}
