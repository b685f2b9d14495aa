//! Vision alignment command

use crate::config::AlignConfig;
use crate::core::command::Command;
use crate::core::subsystem::{SubsystemHandle, SubsystemId};
use crate::subsystems::DriveSubsystem;
use crate::vision::VisionTargetSubsystem;

/// Turn in place toward the vision target.
///
/// Turn output is proportional to the horizontal offset and limited to
/// `max_turn`. With no target visible the drive holds still rather than
/// steering on a stale reading. Finishes once a visible target sits within
/// `tolerance_deg`.
///
/// Only the drive is claimed; the vision subsystem is read, not commanded.
pub struct VisionAlign {
    drive: SubsystemHandle<DriveSubsystem>,
    vision: SubsystemHandle<VisionTargetSubsystem>,
    config: AlignConfig,
    aligned: bool,
    requirements: [SubsystemId; 1],
}

impl VisionAlign {
    pub fn new(
        drive: SubsystemHandle<DriveSubsystem>,
        vision: SubsystemHandle<VisionTargetSubsystem>,
        config: AlignConfig,
    ) -> Self {
        Self {
            drive,
            vision,
            config,
            aligned: false,
            requirements: [SubsystemId::of::<DriveSubsystem>()],
        }
    }
}

impl Command for VisionAlign {
    fn name(&self) -> &str {
        "vision_align"
    }

    fn requirements(&self) -> &[SubsystemId] {
        &self.requirements
    }

    fn initialize(&mut self) {
        self.aligned = false;
    }

    fn execute(&mut self) {
        let (visible, offset) = {
            let vision = self.vision.lock();
            (vision.visible(), vision.horizontal_offset())
        };

        let mut drive = self.drive.lock();
        if !visible {
            drive.stop();
            return;
        }

        self.aligned = offset.abs() <= self.config.tolerance_deg;
        if self.aligned {
            drive.stop();
        } else {
            let turn = (offset * self.config.turn_gain).clamp(-self.config.max_turn, self.config.max_turn);
            drive.arcade(0.0, turn);
        }
    }

    fn is_finished(&self) -> bool {
        self.aligned
    }

    fn end(&mut self, _interrupted: bool) {
        self.drive.lock().stop();
    }
}
