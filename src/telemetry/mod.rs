pub mod format;
pub mod publisher;
pub mod snapshot;

pub use format::{CellNumber, DeciCelsius, Milliamps, Millivolts};
pub use publisher::TelemetryPublisher;
pub use snapshot::{FetStatus, ProtectionFlags, TelemetrySnapshot};
