//! Control panel color spinner subsystem
//!
//! The serial color sensor parser publishes the color under the wheel and the
//! requested target color into a telemetry table as numeric codes:
//!
//! | Code | Color |
//! |------|-------|
//! | 0 | Red |
//! | 1 | Green |
//! | 2 | Blue |
//! | 3 | Yellow |
//!
//! Any other code, or a missing key, reads as "unknown".

use crate::core::subsystem::Subsystem;
use crate::telemetry::{ACTUATOR_TABLE, TelemetryHub, TelemetryTable};

const COLOR_KEY: &str = "color";
const TARGET_KEY: &str = "target";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl WheelColor {
    pub fn from_code(code: f64) -> Option<Self> {
        match code {
            c if c == 0.0 => Some(WheelColor::Red),
            c if c == 1.0 => Some(WheelColor::Green),
            c if c == 2.0 => Some(WheelColor::Blue),
            c if c == 3.0 => Some(WheelColor::Yellow),
            _ => None,
        }
    }

    pub fn code(self) -> f64 {
        match self {
            WheelColor::Red => 0.0,
            WheelColor::Green => 1.0,
            WheelColor::Blue => 2.0,
            WheelColor::Yellow => 3.0,
        }
    }
}

#[derive(Debug)]
pub struct ColorSpinnerSubsystem {
    sensor: TelemetryTable,
    outputs: TelemetryTable,
    speed: f64,
    spinning: bool,
    sensed: Option<WheelColor>,
}

impl ColorSpinnerSubsystem {
    pub fn new(telemetry: &TelemetryHub, sensor_table: &str, speed: f64) -> Self {
        Self {
            sensor: telemetry.table(sensor_table),
            outputs: telemetry.table(ACTUATOR_TABLE),
            speed,
            spinning: false,
            sensed: None,
        }
    }

    pub fn set_spinning(&mut self, spinning: bool) {
        self.spinning = spinning;
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Color under the sensor as of the last refresh
    pub fn sensed_color(&self) -> Option<WheelColor> {
        self.sensed
    }

    /// Color requested by the field, read directly from the sensor table
    pub fn requested_color(&self) -> Option<WheelColor> {
        self.sensor.get(TARGET_KEY).and_then(WheelColor::from_code)
    }

    pub fn output(&self) -> f64 {
        if self.spinning { self.speed } else { 0.0 }
    }
}

impl Subsystem for ColorSpinnerSubsystem {
    fn name(&self) -> &'static str {
        "color_spinner"
    }

    fn refresh(&mut self) {
        self.sensed = self.sensor.get(COLOR_KEY).and_then(WheelColor::from_code);
        self.outputs.set("color_spinner/output", self.output());
    }
}
