//! Test utilities for Sarathi integration tests.
//!
//! Helpers for building robots with chosen capabilities and feeding them
//! vision and operator input.

#![allow(dead_code)]

use sarathi::input::{Control, GamepadState};
use sarathi::{Capability, CapabilityConfig, InputHub, Robot, SarathiConfig, TelemetryHub};

pub const PRIMARY: u8 = 0;
pub const SECONDARY: u8 = 1;

/// Robot, its telemetry hub and its input hub
pub struct Rig {
    pub robot: Robot,
    pub telemetry: TelemetryHub,
    pub inputs: InputHub,
}

impl Rig {
    /// Publish one vision processor sample
    pub fn see(&self, x: f64, y: f64, visible: bool) {
        self.telemetry.table("limelight").set_many(&[
            ("tx", x),
            ("ty", y),
            ("tv", if visible { 1.0 } else { 0.0 }),
        ]);
    }

    pub fn press(&self, device: u8, control: Control) {
        self.inputs
            .update(device, GamepadState::new().with_pressed(control));
    }

    pub fn release_all(&self) {
        self.inputs.update(PRIMARY, GamepadState::new());
        self.inputs.update(SECONDARY, GamepadState::new());
    }

    pub fn tick(&mut self) {
        self.robot.tick().expect("tick");
    }

    pub fn actuator(&self, key: &str) -> Option<f64> {
        self.telemetry.table("actuators").get(key)
    }
}

/// Robot with exactly the listed capabilities enabled
pub fn rig_with(capabilities: &[Capability]) -> Rig {
    let caps = capabilities
        .iter()
        .fold(CapabilityConfig::none(), |caps, c| caps.with(*c, true));
    rig_from(SarathiConfig {
        capabilities: caps,
        ..SarathiConfig::default()
    })
}

pub fn rig_from(config: SarathiConfig) -> Rig {
    let telemetry = TelemetryHub::new();
    let inputs = InputHub::new();
    let robot = Robot::new(config, telemetry.clone(), inputs.clone()).expect("robot");
    Rig {
        robot,
        telemetry,
        inputs,
    }
}
