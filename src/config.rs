//! Configuration constants for the telemetry firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 115_200;

/// 7-bit bus address of the battery monitor
pub const MONITOR_ADDR: u8 = 0x08;

/// Bus clock in Hz
pub const TWI_FREQ_HZ: u32 = 100_000;

/// Polls of a ready flag before a bus wait is abandoned
pub const BUS_POLL_LIMIT: u32 = 10_000;

/// Polls of the transmit-ready flag before a serial write is abandoned
pub const SERIAL_POLL_LIMIT: u32 = 10_000;

/// A report is published every this many loop cycles
pub const PUBLISH_INTERVAL: u8 = 10;

/// Idle time at the end of each loop cycle in milliseconds
pub const IDLE_MS: u16 = 100;

/// Snapshot age in cycles after which reports are marked stale
pub const STALE_AFTER_CYCLES: u32 = 20;

/// When the stop condition is requested during a register read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopTiming {
    /// Stop is requested just before the final byte is received, so the
    /// controller NACKs that byte and stops in the same slot.
    BeforeLastByte,
    /// Stop is requested once every byte has been received.
    AfterLastByte,
}

/// Bus master configuration
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    pub poll_limit: u32,
    pub stop_timing: StopTiming,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            poll_limit: BUS_POLL_LIMIT,
            stop_timing: StopTiming::BeforeLastByte,
        }
    }
}

/// Serial output configuration
#[derive(Debug, Clone, Copy)]
pub struct SerialConfig {
    pub poll_limit: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            poll_limit: SERIAL_POLL_LIMIT,
        }
    }
}

/// Supervisor loop scheduling
#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    /// Cycles between two reports; must be at least 1
    pub publish_interval: u8,
    pub idle_ms: u16,
    pub stale_after: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            publish_interval: PUBLISH_INTERVAL,
            idle_ms: IDLE_MS,
            stale_after: STALE_AFTER_CYCLES,
        }
    }
}
