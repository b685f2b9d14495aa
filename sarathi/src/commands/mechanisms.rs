//! Shooter, climber and color spinner commands

use crate::core::command::Command;
use crate::core::subsystem::{SubsystemHandle, SubsystemId};
use crate::subsystems::{
    ClimbDirection, ClimberSubsystem, ColorSpinnerSubsystem, ShooterSubsystem, WheelColor,
};
use tracing::{debug, warn};

/// Instant command switching the shooter on or off
pub struct ShooterCommand {
    shooter: SubsystemHandle<ShooterSubsystem>,
    enable: bool,
    requirements: [SubsystemId; 1],
}

impl ShooterCommand {
    pub fn on(shooter: SubsystemHandle<ShooterSubsystem>) -> Self {
        Self::new(shooter, true)
    }

    pub fn off(shooter: SubsystemHandle<ShooterSubsystem>) -> Self {
        Self::new(shooter, false)
    }

    fn new(shooter: SubsystemHandle<ShooterSubsystem>, enable: bool) -> Self {
        Self {
            shooter,
            enable,
            requirements: [SubsystemId::of::<ShooterSubsystem>()],
        }
    }
}

impl Command for ShooterCommand {
    fn name(&self) -> &str {
        if self.enable { "shooter_on" } else { "shooter_off" }
    }

    fn requirements(&self) -> &[SubsystemId] {
        &self.requirements
    }

    fn initialize(&mut self) {
        self.shooter.lock().set_enabled(self.enable);
    }

    fn execute(&mut self) {}

    fn is_finished(&self) -> bool {
        true
    }
}

/// Runs the climber winch one way while active, stops it on end
pub struct ClimbCommand {
    climber: SubsystemHandle<ClimberSubsystem>,
    direction: ClimbDirection,
    requirements: [SubsystemId; 1],
}

impl ClimbCommand {
    pub fn new(climber: SubsystemHandle<ClimberSubsystem>, direction: ClimbDirection) -> Self {
        Self {
            climber,
            direction,
            requirements: [SubsystemId::of::<ClimberSubsystem>()],
        }
    }
}

impl Command for ClimbCommand {
    fn name(&self) -> &str {
        match self.direction {
            ClimbDirection::Up => "climb_up",
            ClimbDirection::Down => "climb_down",
            ClimbDirection::Stopped => "climb_stop",
        }
    }

    fn requirements(&self) -> &[SubsystemId] {
        &self.requirements
    }

    fn initialize(&mut self) {
        self.climber.lock().set_direction(self.direction);
    }

    fn execute(&mut self) {}

    fn end(&mut self, _interrupted: bool) {
        self.climber.lock().set_stop();
    }
}

/// Spin the control panel until the requested color is under the sensor.
///
/// The requested color is latched when the command starts. With no valid
/// request the command finishes immediately without spinning.
pub struct ColorTargetCommand {
    spinner: SubsystemHandle<ColorSpinnerSubsystem>,
    target: Option<WheelColor>,
    requirements: [SubsystemId; 1],
}

impl ColorTargetCommand {
    pub fn new(spinner: SubsystemHandle<ColorSpinnerSubsystem>) -> Self {
        Self {
            spinner,
            target: None,
            requirements: [SubsystemId::of::<ColorSpinnerSubsystem>()],
        }
    }

    fn reached(&self) -> bool {
        match self.target {
            Some(target) => self.spinner.lock().sensed_color() == Some(target),
            None => true,
        }
    }
}

impl Command for ColorTargetCommand {
    fn name(&self) -> &str {
        "color_target"
    }

    fn requirements(&self) -> &[SubsystemId] {
        &self.requirements
    }

    fn initialize(&mut self) {
        self.target = self.spinner.lock().requested_color();
        match self.target {
            Some(target) => debug!("ColorTargetCommand: Seeking {:?}", target),
            None => warn!("ColorTargetCommand: No target color requested"),
        }
    }

    fn execute(&mut self) {
        let spin = !self.reached();
        self.spinner.lock().set_spinning(spin);
    }

    fn is_finished(&self) -> bool {
        self.reached()
    }

    fn end(&mut self, _interrupted: bool) {
        self.spinner.lock().set_spinning(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::subsystem::Subsystem;
    use crate::telemetry::TelemetryHub;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_shooter_commands_are_instant() {
        let hub = TelemetryHub::new();
        let shooter = Arc::new(Mutex::new(ShooterSubsystem::new(&hub, 0.9)));
        let mut on = ShooterCommand::on(Arc::clone(&shooter));
        let mut off = ShooterCommand::off(Arc::clone(&shooter));

        on.initialize();
        assert!(on.is_finished());
        assert_eq!(shooter.lock().output(), 0.9);

        off.initialize();
        assert!(!shooter.lock().is_enabled());
    }

    #[test]
    fn test_climb_stops_on_end() {
        let hub = TelemetryHub::new();
        let climber = Arc::new(Mutex::new(ClimberSubsystem::new(&hub, 0.6)));
        let mut down = ClimbCommand::new(Arc::clone(&climber), ClimbDirection::Down);

        down.initialize();
        assert_eq!(climber.lock().output(), -0.6);
        down.end(true);
        assert_eq!(climber.lock().direction(), ClimbDirection::Stopped);
        assert_eq!(hub.table("actuators").get("climber/output"), Some(0.0));
    }

    #[test]
    fn test_color_target_spins_until_match() {
        let hub = TelemetryHub::new();
        let sensor = hub.table("color_sensor");
        let spinner = Arc::new(Mutex::new(ColorSpinnerSubsystem::new(&hub, "color_sensor", 0.5)));
        let mut command = ColorTargetCommand::new(Arc::clone(&spinner));

        sensor.set_many(&[("color", 0.0), ("target", 1.0)]);
        spinner.lock().refresh();
        command.initialize();
        command.execute();
        assert!(spinner.lock().is_spinning());
        assert!(!command.is_finished());

        sensor.set("color", 1.0);
        spinner.lock().refresh();
        assert!(command.is_finished());
        command.end(false);
        assert!(!spinner.lock().is_spinning());
    }

    #[test]
    fn test_color_target_without_request_finishes() {
        let hub = TelemetryHub::new();
        let spinner = Arc::new(Mutex::new(ColorSpinnerSubsystem::new(&hub, "color_sensor", 0.5)));
        let mut command = ColorTargetCommand::new(spinner);

        command.initialize();
        assert!(command.is_finished());
    }
}
