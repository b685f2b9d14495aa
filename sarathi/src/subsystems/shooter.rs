//! Shooter flywheel subsystem

use crate::core::subsystem::Subsystem;
use crate::telemetry::{ACTUATOR_TABLE, TelemetryHub, TelemetryTable};
use tracing::info;

/// Flywheel that is either spinning at a fixed output or stopped
#[derive(Debug)]
pub struct ShooterSubsystem {
    outputs: TelemetryTable,
    speed: f64,
    enabled: bool,
}

impl ShooterSubsystem {
    pub fn new(telemetry: &TelemetryHub, speed: f64) -> Self {
        Self {
            outputs: telemetry.table(ACTUATOR_TABLE),
            speed,
            enabled: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            info!("ShooterSubsystem: {}", if enabled { "on" } else { "off" });
            self.enabled = enabled;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn output(&self) -> f64 {
        if self.enabled { self.speed } else { 0.0 }
    }
}

impl Subsystem for ShooterSubsystem {
    fn name(&self) -> &'static str {
        "shooter"
    }

    fn refresh(&mut self) {
        self.outputs.set("shooter/output", self.output());
    }
}
