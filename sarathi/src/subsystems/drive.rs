//! Differential drive subsystem

use crate::config::DriveConfig;
use crate::core::subsystem::Subsystem;
use crate::telemetry::{ACTUATOR_TABLE, TelemetryHub, TelemetryTable};
use tracing::debug;

/// Output scaling applied to operator and autonomous demands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveMode {
    #[default]
    Normal,
    /// Outputs forced to zero with motor brake engaged
    Brake,
    Boost,
    Slow,
}

/// Left/right wheel demands, published to the motor drivers each tick
#[derive(Debug)]
pub struct DriveSubsystem {
    outputs: TelemetryTable,
    config: DriveConfig,
    mode: DriveMode,
    left: f64,
    right: f64,
}

impl DriveSubsystem {
    pub fn new(telemetry: &TelemetryHub, config: DriveConfig) -> Self {
        Self {
            outputs: telemetry.table(ACTUATOR_TABLE),
            config,
            mode: DriveMode::Normal,
            left: 0.0,
            right: 0.0,
        }
    }

    /// Arcade mix of throttle and turn, both in [-1, 1]. Positive turn
    /// rotates clockwise.
    pub fn arcade(&mut self, throttle: f64, turn: f64) {
        let scale = self.scale();
        self.left = (throttle + turn).clamp(-1.0, 1.0) * scale;
        self.right = (throttle - turn).clamp(-1.0, 1.0) * scale;
    }

    pub fn stop(&mut self) {
        self.left = 0.0;
        self.right = 0.0;
    }

    pub fn set_mode(&mut self, mode: DriveMode) {
        if mode != self.mode {
            debug!("DriveSubsystem: Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Current (left, right) demand
    pub fn output(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Stick deadband from the drive configuration
    pub fn deadband(&self) -> f64 {
        self.config.deadband
    }

    fn scale(&self) -> f64 {
        match self.mode {
            DriveMode::Normal => self.config.normal_scale,
            DriveMode::Brake => 0.0,
            DriveMode::Boost => self.config.boost_scale,
            DriveMode::Slow => self.config.slow_scale,
        }
    }
}

impl Subsystem for DriveSubsystem {
    fn name(&self) -> &'static str {
        "drive"
    }

    fn refresh(&mut self) {
        if self.mode == DriveMode::Brake {
            self.stop();
        }
        self.outputs.set_many(&[
            ("drive/left", self.left),
            ("drive/right", self.right),
            ("drive/brake", if self.mode == DriveMode::Brake { 1.0 } else { 0.0 }),
        ]);
    }
}
