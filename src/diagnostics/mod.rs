//! Fault accounting for the supervisor loop

use crate::error::ErrorCode;

/// Counters owned by the supervisor loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    cycles: u32,
    reports: u32,
    acquisition_failures: u32,
    publish_failures: u32,
    consecutive_failures: u32,
    last_error: Option<ErrorCode>,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            cycles: 0,
            reports: 0,
            acquisition_failures: 0,
            publish_failures: 0,
            consecutive_failures: 0,
            last_error: None,
        }
    }

    pub fn record_cycle(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
    }

    pub fn record_acquisition(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn record_error(&mut self, code: ErrorCode) {
        match code {
            ErrorCode::AcquisitionFailed => {
                self.acquisition_failures = self.acquisition_failures.saturating_add(1);
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            }
            ErrorCode::PublishFailed => {
                self.publish_failures = self.publish_failures.saturating_add(1);
            }
        }
        self.last_error = Some(code);
    }

    pub fn record_report(&mut self) {
        self.reports = self.reports.wrapping_add(1);
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn reports(&self) -> u32 {
        self.reports
    }

    pub fn acquisition_failures(&self) -> u32 {
        self.acquisition_failures
    }

    pub fn publish_failures(&self) -> u32 {
        self.publish_failures
    }

    /// Failed acquisitions since the last successful one
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }
}
