//! Drive commands

use crate::core::command::Command;
use crate::core::subsystem::{SubsystemHandle, SubsystemId};
use crate::input::{Axis, InputHub};
use crate::subsystems::{DriveMode, DriveSubsystem};

/// Operator arcade drive from the primary gamepad.
///
/// Left stick Y is throttle (pushed forward reads negative), right stick X
/// is turn. Runs as the drive default command and never finishes.
pub struct ManualDrive {
    drive: SubsystemHandle<DriveSubsystem>,
    inputs: InputHub,
    device: u8,
    requirements: [SubsystemId; 1],
}

impl ManualDrive {
    pub fn new(drive: SubsystemHandle<DriveSubsystem>, inputs: InputHub, device: u8) -> Self {
        Self {
            drive,
            inputs,
            device,
            requirements: [SubsystemId::of::<DriveSubsystem>()],
        }
    }
}

impl Command for ManualDrive {
    fn name(&self) -> &str {
        "manual_drive"
    }

    fn requirements(&self) -> &[SubsystemId] {
        &self.requirements
    }

    fn execute(&mut self) {
        let mut drive = self.drive.lock();
        let deadband = drive.deadband();
        let throttle = apply_deadband(-self.inputs.axis(self.device, Axis::LeftY), deadband);
        let turn = apply_deadband(self.inputs.axis(self.device, Axis::RightX), deadband);
        drive.arcade(throttle, turn);
    }

    fn end(&mut self, _interrupted: bool) {
        self.drive.lock().stop();
    }
}

/// Holds a drive mode while active and restores `Normal` on end.
///
/// Boost and slow only rescale whatever command is driving, so they claim
/// nothing, and re-apply their mode whenever the drive falls back to
/// `Normal` while they are still held. Brake claims the drive so no other
/// command can move it, and its mode is never overridden.
pub struct DriveModeCommand {
    drive: SubsystemHandle<DriveSubsystem>,
    mode: DriveMode,
    name: &'static str,
    requirements: Vec<SubsystemId>,
}

impl DriveModeCommand {
    pub fn new(drive: SubsystemHandle<DriveSubsystem>, mode: DriveMode) -> Self {
        let (name, requirements) = match mode {
            DriveMode::Brake => ("brake", vec![SubsystemId::of::<DriveSubsystem>()]),
            DriveMode::Boost => ("boost", Vec::new()),
            DriveMode::Slow => ("slow", Vec::new()),
            DriveMode::Normal => ("normal", Vec::new()),
        };
        Self {
            drive,
            mode,
            name,
            requirements,
        }
    }
}

impl Command for DriveModeCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn requirements(&self) -> &[SubsystemId] {
        &self.requirements
    }

    fn initialize(&mut self) {
        self.drive.lock().set_mode(self.mode);
    }

    fn execute(&mut self) {
        let mut drive = self.drive.lock();
        match self.mode {
            DriveMode::Brake => drive.stop(),
            _ if drive.mode() == DriveMode::Normal => drive.set_mode(self.mode),
            _ => {}
        }
    }

    fn end(&mut self, _interrupted: bool) {
        let mut drive = self.drive.lock();
        if drive.mode() == self.mode {
            drive.set_mode(DriveMode::Normal);
        }
    }
}

/// Drive straight at a fixed throttle for a fixed number of ticks
pub struct AutoDriveLinear {
    drive: SubsystemHandle<DriveSubsystem>,
    speed: f64,
    duration_ticks: u32,
    elapsed: u32,
    requirements: [SubsystemId; 1],
}

impl AutoDriveLinear {
    pub fn new(drive: SubsystemHandle<DriveSubsystem>, speed: f64, duration_ticks: u32) -> Self {
        Self {
            drive,
            speed,
            duration_ticks,
            elapsed: 0,
            requirements: [SubsystemId::of::<DriveSubsystem>()],
        }
    }
}

impl Command for AutoDriveLinear {
    fn name(&self) -> &str {
        "auto_drive_linear"
    }

    fn requirements(&self) -> &[SubsystemId] {
        &self.requirements
    }

    fn initialize(&mut self) {
        self.elapsed = 0;
    }

    fn execute(&mut self) {
        self.drive.lock().arcade(self.speed, 0.0);
        self.elapsed += 1;
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration_ticks
    }

    fn end(&mut self, _interrupted: bool) {
        self.drive.lock().stop();
    }
}

fn apply_deadband(value: f64, deadband: f64) -> f64 {
    if value.abs() < deadband { 0.0 } else { value }
}
