//! Supervisor loop: acquire, aggregate, publish, idle

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial;

use crate::config::SupervisorConfig;
use crate::diagnostics::Diagnostics;
use crate::drivers::monitor::{BatteryMonitor, MonitorReading};
use crate::error::ErrorCode;
use crate::telemetry::{TelemetryPublisher, TelemetrySnapshot};

/// What one loop cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Loop tick of this cycle, starting at 1
    pub tick: u32,
    /// The snapshot was refreshed from the monitor
    pub acquired: bool,
    /// A report was written out completely
    pub published: bool,
}

/// Owns every piece of loop state: the monitor driver, the snapshot, the
/// publisher and the publish counter.
pub struct SupervisorLoop<M, S, D> {
    monitor: M,
    publisher: TelemetryPublisher<S>,
    delay: D,
    config: SupervisorConfig,
    reading: MonitorReading,
    snapshot: TelemetrySnapshot,
    publish_counter: u8,
    tick: u32,
    diagnostics: Diagnostics,
}

impl<M, S, D> SupervisorLoop<M, S, D>
where
    M: BatteryMonitor,
    S: serial::Write<u8>,
    D: DelayMs<u16>,
{
    pub fn new(monitor: M, publisher: TelemetryPublisher<S>, delay: D, config: SupervisorConfig) -> Self {
        Self {
            monitor,
            publisher,
            delay,
            config,
            reading: MonitorReading::default(),
            snapshot: TelemetrySnapshot::new(),
            publish_counter: 0,
            tick: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run one acquire/aggregate/publish/idle cycle.
    pub fn step(&mut self) -> CycleReport {
        self.tick = self.tick.wrapping_add(1);
        self.diagnostics.record_cycle();

        let acquired = self.acquire();
        let published = self.maybe_publish();

        self.delay.delay_ms(self.config.idle_ms);

        CycleReport {
            tick: self.tick,
            acquired,
            published,
        }
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Tear down into the monitor, publisher and delay
    pub fn release(self) -> (M, TelemetryPublisher<S>, D) {
        (self.monitor, self.publisher, self.delay)
    }

    fn acquire(&mut self) -> bool {
        match self.monitor.acquire(&mut self.reading) {
            Ok(()) => {
                self.snapshot.update(&self.reading, self.tick);
                self.diagnostics.record_acquisition();
                true
            }
            Err(_) => {
                self.diagnostics.record_error(ErrorCode::AcquisitionFailed);
                crate::log_warn!(
                    "acquisition failed, {} in a row",
                    self.diagnostics.consecutive_failures()
                );
                false
            }
        }
    }

    fn maybe_publish(&mut self) -> bool {
        self.publish_counter += 1;
        if self.publish_counter < self.config.publish_interval.max(1) {
            return false;
        }
        self.publish_counter = 0;

        let age = self.snapshot.age(self.tick);
        let result = if self.snapshot.is_stale(self.tick, self.config.stale_after) {
            self.publisher
                .publish_stale_notice(age)
                .and_then(|()| self.publisher.publish(&self.snapshot))
        } else {
            self.publisher.publish(&self.snapshot)
        };

        match result {
            Ok(()) => {
                self.diagnostics.record_report();
                crate::log_debug!("report {} sent", self.diagnostics.reports());
                true
            }
            Err(_) => {
                self.diagnostics.record_error(ErrorCode::PublishFailed);
                crate::log_warn!("report dropped at tick {}", self.tick);
                false
            }
        }
    }
}
