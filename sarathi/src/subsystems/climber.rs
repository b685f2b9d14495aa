//! Climber winch subsystem

use crate::core::subsystem::Subsystem;
use crate::telemetry::{ACTUATOR_TABLE, TelemetryHub, TelemetryTable};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimbDirection {
    Up,
    Down,
    #[default]
    Stopped,
}

#[derive(Debug)]
pub struct ClimberSubsystem {
    outputs: TelemetryTable,
    speed: f64,
    direction: ClimbDirection,
}

impl ClimberSubsystem {
    pub fn new(telemetry: &TelemetryHub, speed: f64) -> Self {
        Self {
            outputs: telemetry.table(ACTUATOR_TABLE),
            speed,
            direction: ClimbDirection::Stopped,
        }
    }

    pub fn set_direction(&mut self, direction: ClimbDirection) {
        if direction != self.direction {
            debug!("ClimberSubsystem: {:?} -> {:?}", self.direction, direction);
            self.direction = direction;
        }
    }

    /// Stop the winch and publish the stop immediately
    pub fn set_stop(&mut self) {
        self.set_direction(ClimbDirection::Stopped);
        self.refresh();
    }

    pub fn direction(&self) -> ClimbDirection {
        self.direction
    }

    pub fn output(&self) -> f64 {
        match self.direction {
            ClimbDirection::Up => self.speed,
            ClimbDirection::Down => -self.speed,
            ClimbDirection::Stopped => 0.0,
        }
    }
}

impl Subsystem for ClimberSubsystem {
    fn name(&self) -> &'static str {
        "climber"
    }

    fn refresh(&mut self) {
        self.outputs.set("climber/output", self.output());
    }
}
