//! Robot container
//!
//! Builds the whole object graph once from a [`SarathiConfig`]: subsystems
//! into the registry, commands into the scheduler, operator bindings, and the
//! phase controller. Disabled capabilities leave their handle `None`, so no
//! command or binding can reach them.
//!
//! # Control Tick
//!
//! ```text
//! tick():
//! 1. refresh every subsystem (registration order)
//! 2. poll operator bindings          ┐ skipped while
//! 3. run scheduled commands          ┘ disabled
//! ```
//!
//! # Bindings
//!
//! | Capability | Device | Control | Trigger | Command |
//! |------------|--------|---------|---------|---------|
//! | drive | primary | B | while active | brake |
//! | drive | primary | right bumper | while active | boost |
//! | drive | primary | left bumper | while active | slow |
//! | drive | primary | POV left | on trigger | auto_drive_linear |
//! | vision | primary | Y | while active | vision_align (needs drive) |
//! | climber | primary | POV up | while active | climb_up |
//! | climber | primary | POV down | while active | climb_down |
//! | shooter | secondary | A | on trigger | shooter_on |
//! | shooter | secondary | B | on trigger | shooter_off |
//! | color_spinner | secondary | X | on trigger | color_target |

use crate::bindings::{CommandBindingTable, InputBinding};
use crate::commands::{
    AutoDriveLinear, ClimbCommand, ColorTargetCommand, DriveModeCommand, ManualDrive,
    ShooterCommand, VisionAlign,
};
use crate::config::{Capability, SarathiConfig};
use crate::core::subsystem::{SubsystemHandle, SubsystemId};
use crate::error::Result;
use crate::input::{Control, InputHub};
use crate::phase::{MatchPhase, MatchPhaseController};
use crate::registry::SubsystemRegistry;
use crate::scheduler::{CommandId, CommandScheduler};
use crate::subsystems::{
    ClimbDirection, ClimberSubsystem, ColorSpinnerSubsystem, DriveMode, DriveSubsystem,
    ShooterSubsystem,
};
use crate::telemetry::TelemetryHub;
use crate::vision::VisionTargetSubsystem;
use tracing::info;

/// Drive subsystem and its commands
#[derive(Debug, Clone)]
pub struct DriveCapability {
    pub subsystem: SubsystemHandle<DriveSubsystem>,
    pub manual: CommandId,
    pub brake: CommandId,
    pub boost: CommandId,
    pub slow: CommandId,
    pub auto_linear: CommandId,
}

/// Vision subsystem and, when drive is enabled too, the alignment command
#[derive(Debug, Clone)]
pub struct VisionCapability {
    pub subsystem: SubsystemHandle<VisionTargetSubsystem>,
    pub align: Option<CommandId>,
}

#[derive(Debug, Clone)]
pub struct ShooterCapability {
    pub subsystem: SubsystemHandle<ShooterSubsystem>,
    pub on: CommandId,
    pub off: CommandId,
}

#[derive(Debug, Clone)]
pub struct ColorSpinnerCapability {
    pub subsystem: SubsystemHandle<ColorSpinnerSubsystem>,
    pub target: CommandId,
}

#[derive(Debug, Clone)]
pub struct ClimberCapability {
    pub subsystem: SubsystemHandle<ClimberSubsystem>,
    pub up: CommandId,
    pub down: CommandId,
}

/// Context object owning every subsystem, command and binding of the robot
#[derive(Debug)]
pub struct Robot {
    config: SarathiConfig,
    telemetry: TelemetryHub,
    inputs: InputHub,
    registry: SubsystemRegistry,
    scheduler: CommandScheduler,
    bindings: CommandBindingTable,
    phases: MatchPhaseController,
    drive: Option<DriveCapability>,
    vision: Option<VisionCapability>,
    shooter: Option<ShooterCapability>,
    color_spinner: Option<ColorSpinnerCapability>,
    climber: Option<ClimberCapability>,
    ticks: u64,
}

impl Robot {
    /// Build the robot. Invalid configuration and wiring mistakes surface
    /// here as errors.
    pub fn new(config: SarathiConfig, telemetry: TelemetryHub, inputs: InputHub) -> Result<Self> {
        config.validate()?;
        let caps = config.capabilities;
        let enabled: Vec<&str> = caps.enabled().map(Capability::name).collect();
        info!("Robot: Capabilities [{}]", enabled.join(", "));

        let mut registry = SubsystemRegistry::new();
        let mut scheduler = CommandScheduler::new();

        let drive = caps
            .drive
            .then(|| build_drive(&config, &telemetry, &inputs, &mut registry, &mut scheduler));
        let vision = caps.vision.then(|| {
            build_vision(&config, &telemetry, drive.as_ref(), &mut registry, &mut scheduler)
        });
        let shooter = caps
            .shooter
            .then(|| build_shooter(&config, &telemetry, &mut registry, &mut scheduler));
        let color_spinner = caps
            .color_spinner
            .then(|| build_color_spinner(&config, &telemetry, &mut registry, &mut scheduler));
        let climber = caps
            .climber
            .then(|| build_climber(&config, &telemetry, &mut registry, &mut scheduler));

        if let Some(drive) = &drive {
            scheduler.set_default_command(SubsystemId::of::<DriveSubsystem>(), drive.manual)?;
        }

        let mut robot = Self {
            phases: MatchPhaseController::new(
                drive.as_ref().map(|d| d.manual),
                vision.as_ref().map(|v| v.subsystem.clone()),
                vision.as_ref().and_then(|v| v.align),
            ),
            bindings: CommandBindingTable::new(caps),
            config,
            telemetry,
            inputs,
            registry,
            scheduler,
            drive,
            vision,
            shooter,
            color_spinner,
            climber,
            ticks: 0,
        };
        robot.setup_bindings()?;

        info!(
            "Robot: {} subsystems, {} commands, {} bindings",
            robot.registry.len(),
            robot.scheduler.len(),
            robot.bindings.len()
        );
        Ok(robot)
    }

    fn setup_bindings(&mut self) -> Result<()> {
        let primary = self.config.control.primary_device;
        let secondary = self.config.control.secondary_device;
        let table = &mut self.bindings;

        if let Some(drive) = &self.drive {
            table.bind(
                Capability::Drive,
                InputBinding::while_active(primary, Control::B, drive.brake),
            )?;
            table.bind(
                Capability::Drive,
                InputBinding::while_active(primary, Control::BumperRight, drive.boost),
            )?;
            table.bind(
                Capability::Drive,
                InputBinding::while_active(primary, Control::BumperLeft, drive.slow),
            )?;
            table.bind(
                Capability::Drive,
                InputBinding::on_trigger(primary, Control::PovLeft, drive.auto_linear),
            )?;
        }
        if let Some(align) = self.vision.as_ref().and_then(|v| v.align) {
            table.bind(
                Capability::Vision,
                InputBinding::while_active(primary, Control::Y, align),
            )?;
        }
        if let Some(climber) = &self.climber {
            table.bind(
                Capability::Climber,
                InputBinding::while_active(primary, Control::PovUp, climber.up),
            )?;
            table.bind(
                Capability::Climber,
                InputBinding::while_active(primary, Control::PovDown, climber.down),
            )?;
        }

        if let Some(shooter) = &self.shooter {
            table.bind(
                Capability::Shooter,
                InputBinding::on_trigger(secondary, Control::A, shooter.on),
            )?;
            table.bind(
                Capability::Shooter,
                InputBinding::on_trigger(secondary, Control::B, shooter.off),
            )?;
        }
        if let Some(spinner) = &self.color_spinner {
            table.bind(
                Capability::ColorSpinner,
                InputBinding::on_trigger(secondary, Control::X, spinner.target),
            )?;
        }
        Ok(())
    }

    /// Advance the robot by one control period
    pub fn tick(&mut self) -> Result<()> {
        self.registry.tick();
        if self.phases.phase() != MatchPhase::Disabled {
            self.bindings.poll(&self.inputs, &mut self.scheduler)?;
            self.scheduler.run();
        }
        self.ticks += 1;
        Ok(())
    }

    pub fn enter_teleop(&mut self) -> Result<()> {
        self.phases.enter_teleop(&mut self.scheduler)
    }

    pub fn enter_autonomous(&mut self) -> Result<()> {
        self.phases.enter_autonomous(&mut self.scheduler)
    }

    /// Stop every running command, then apply the disabled side effects
    pub fn enter_disabled(&mut self) {
        self.scheduler.cancel_all();
        self.phases.enter_disabled();
    }

    pub fn enter(&mut self, phase: MatchPhase) -> Result<()> {
        match phase {
            MatchPhase::Disabled => {
                self.enter_disabled();
                Ok(())
            }
            MatchPhase::Teleop => self.enter_teleop(),
            MatchPhase::Autonomous => self.enter_autonomous(),
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phases.phase()
    }

    pub fn config(&self) -> &SarathiConfig {
        &self.config
    }

    pub fn telemetry(&self) -> &TelemetryHub {
        &self.telemetry
    }

    pub fn inputs(&self) -> &InputHub {
        &self.inputs
    }

    pub fn registry(&self) -> &SubsystemRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &CommandScheduler {
        &self.scheduler
    }

    pub fn bindings(&self) -> &CommandBindingTable {
        &self.bindings
    }

    pub fn drive(&self) -> Option<&DriveCapability> {
        self.drive.as_ref()
    }

    pub fn vision(&self) -> Option<&VisionCapability> {
        self.vision.as_ref()
    }

    pub fn shooter(&self) -> Option<&ShooterCapability> {
        self.shooter.as_ref()
    }

    pub fn color_spinner(&self) -> Option<&ColorSpinnerCapability> {
        self.color_spinner.as_ref()
    }

    pub fn climber(&self) -> Option<&ClimberCapability> {
        self.climber.as_ref()
    }

    /// Control ticks completed
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn build_drive(
    config: &SarathiConfig,
    telemetry: &TelemetryHub,
    inputs: &InputHub,
    registry: &mut SubsystemRegistry,
    scheduler: &mut CommandScheduler,
) -> DriveCapability {
    let drive_config = config.drive;
    let subsystem = registry.get_or_create(|| DriveSubsystem::new(telemetry, drive_config));

    DriveCapability {
        manual: scheduler.add(ManualDrive::new(
            subsystem.clone(),
            inputs.clone(),
            config.control.primary_device,
        )),
        brake: scheduler.add(DriveModeCommand::new(subsystem.clone(), DriveMode::Brake)),
        boost: scheduler.add(DriveModeCommand::new(subsystem.clone(), DriveMode::Boost)),
        slow: scheduler.add(DriveModeCommand::new(subsystem.clone(), DriveMode::Slow)),
        auto_linear: scheduler.add(AutoDriveLinear::new(
            subsystem.clone(),
            drive_config.auto_linear_speed,
            drive_config.auto_linear_ticks,
        )),
        subsystem,
    }
}

fn build_vision(
    config: &SarathiConfig,
    telemetry: &TelemetryHub,
    drive: Option<&DriveCapability>,
    registry: &mut SubsystemRegistry,
    scheduler: &mut CommandScheduler,
) -> VisionCapability {
    let subsystem =
        registry.get_or_create(|| VisionTargetSubsystem::new(telemetry, config.vision.clone()));
    subsystem.lock().set_running(true);

    let align = drive.map(|drive| {
        scheduler.add(VisionAlign::new(
            drive.subsystem.clone(),
            subsystem.clone(),
            config.vision.align,
        ))
    });

    VisionCapability { subsystem, align }
}

fn build_shooter(
    config: &SarathiConfig,
    telemetry: &TelemetryHub,
    registry: &mut SubsystemRegistry,
    scheduler: &mut CommandScheduler,
) -> ShooterCapability {
    let speed = config.mechanisms.shooter_speed;
    let subsystem = registry.get_or_create(|| ShooterSubsystem::new(telemetry, speed));

    ShooterCapability {
        on: scheduler.add(ShooterCommand::on(subsystem.clone())),
        off: scheduler.add(ShooterCommand::off(subsystem.clone())),
        subsystem,
    }
}

fn build_color_spinner(
    config: &SarathiConfig,
    telemetry: &TelemetryHub,
    registry: &mut SubsystemRegistry,
    scheduler: &mut CommandScheduler,
) -> ColorSpinnerCapability {
    let mechanisms = &config.mechanisms;
    let subsystem = registry.get_or_create(|| {
        ColorSpinnerSubsystem::new(telemetry, &mechanisms.color_sensor_table, mechanisms.spinner_speed)
    });

    ColorSpinnerCapability {
        target: scheduler.add(ColorTargetCommand::new(subsystem.clone())),
        subsystem,
    }
}

fn build_climber(
    config: &SarathiConfig,
    telemetry: &TelemetryHub,
    registry: &mut SubsystemRegistry,
    scheduler: &mut CommandScheduler,
) -> ClimberCapability {
    let speed = config.mechanisms.climber_speed;
    let subsystem = registry.get_or_create(|| ClimberSubsystem::new(telemetry, speed));
    subsystem.lock().set_stop();

    ClimberCapability {
        up: scheduler.add(ClimbCommand::new(subsystem.clone(), ClimbDirection::Up)),
        down: scheduler.add(ClimbCommand::new(subsystem.clone(), ClimbDirection::Down)),
        subsystem,
    }
}
