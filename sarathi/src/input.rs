//! Operator input snapshots.
//!
//! The host polls the physical gamepads and writes one [`GamepadState`] per
//! device into the [`InputHub`] before each control tick. Bindings and
//! commands only ever see these snapshots.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Digital controls on a gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Control {
    A,
    B,
    X,
    Y,
    BumperLeft,
    BumperRight,
    Back,
    Start,
    PovUp,
    PovDown,
    PovLeft,
    PovRight,
}

/// Analog axes on a gamepad, each in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

/// One sampled state of a gamepad
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    pressed: Vec<Control>,
    axes: HashMap<Axis, f64>,
}

impl GamepadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style press, for hosts and tests
    pub fn with_pressed(mut self, control: Control) -> Self {
        self.set_pressed(control, true);
        self
    }

    pub fn with_axis(mut self, axis: Axis, value: f64) -> Self {
        self.set_axis(axis, value);
        self
    }

    pub fn set_pressed(&mut self, control: Control, pressed: bool) {
        let held = self.pressed.contains(&control);
        if pressed && !held {
            self.pressed.push(control);
        } else if !pressed && held {
            self.pressed.retain(|c| *c != control);
        }
    }

    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        self.axes.insert(axis, value.clamp(-1.0, 1.0));
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        self.pressed.contains(&control)
    }

    /// Axis value, 0 when never set
    pub fn axis(&self, axis: Axis) -> f64 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }
}

/// Latest gamepad snapshots keyed by device index
#[derive(Clone, Debug, Default)]
pub struct InputHub {
    devices: Arc<RwLock<HashMap<u8, GamepadState>>>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot of one device
    pub fn update(&self, device: u8, state: GamepadState) {
        self.devices.write().insert(device, state);
    }

    /// Drop a device; its controls read as released
    pub fn disconnect(&self, device: u8) {
        self.devices.write().remove(&device);
    }

    pub fn is_pressed(&self, device: u8, control: Control) -> bool {
        self.devices
            .read()
            .get(&device)
            .is_some_and(|state| state.is_pressed(control))
    }

    pub fn axis(&self, device: u8, axis: Axis) -> f64 {
        self.devices
            .read()
            .get(&device)
            .map(|state| state.axis(axis))
            .unwrap_or(0.0)
    }
}
