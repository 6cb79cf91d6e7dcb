pub mod bus_master;
pub mod monitor;

pub use bus_master::BusMaster;
pub use monitor::{BatteryMonitor, FetState, MonitorReading, ProtectionStatus, MAX_CELLS, TEMP_SENSORS};
