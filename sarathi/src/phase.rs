//! Match phase transitions
//!
//! The field signals phase changes; this module only reacts. Each entry
//! routine is idempotent and touches enabled capabilities only:
//!
//! | Phase | Drive | Vision |
//! |-------|-------|--------|
//! | Teleop | start default drive command | illumination off |
//! | Autonomous | start alignment (needs drive and vision) | illumination on (needs drive and vision) |
//! | Disabled | nothing | illumination off |
//!
//! Illumination stays off outside autonomous target acquisition.

use crate::core::subsystem::SubsystemHandle;
use crate::error::Result;
use crate::scheduler::{CommandId, CommandScheduler};
use crate::vision::VisionTargetSubsystem;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum MatchPhase {
    #[default]
    Disabled,
    Teleop,
    Autonomous,
}

/// Phase entry side effects, wired from optional capability handles
#[derive(Debug)]
pub struct MatchPhaseController {
    /// Default drive command, present when drive is enabled
    drive_default: Option<CommandId>,
    /// Present when vision is enabled
    vision: Option<SubsystemHandle<VisionTargetSubsystem>>,
    /// Present when both drive and vision are enabled
    alignment: Option<CommandId>,
    phase: MatchPhase,
}

impl MatchPhaseController {
    pub fn new(
        drive_default: Option<CommandId>,
        vision: Option<SubsystemHandle<VisionTargetSubsystem>>,
        alignment: Option<CommandId>,
    ) -> Self {
        Self {
            drive_default,
            vision,
            alignment,
            phase: MatchPhase::Disabled,
        }
    }

    /// Last phase entered
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn enter(&mut self, phase: MatchPhase, scheduler: &mut CommandScheduler) -> Result<()> {
        match phase {
            MatchPhase::Disabled => {
                self.enter_disabled();
                Ok(())
            }
            MatchPhase::Teleop => self.enter_teleop(scheduler),
            MatchPhase::Autonomous => self.enter_autonomous(scheduler),
        }
    }

    pub fn enter_teleop(&mut self, scheduler: &mut CommandScheduler) -> Result<()> {
        self.transition(MatchPhase::Teleop);
        if let Some(manual) = self.drive_default {
            scheduler.schedule(manual)?;
        }
        if let Some(vision) = &self.vision {
            vision.lock().set_illumination(false);
        }
        Ok(())
    }

    pub fn enter_autonomous(&mut self, scheduler: &mut CommandScheduler) -> Result<()> {
        self.transition(MatchPhase::Autonomous);
        if let (Some(vision), Some(alignment)) = (&self.vision, self.alignment) {
            vision.lock().set_illumination(true);
            scheduler.schedule(alignment)?;
        }
        Ok(())
    }

    pub fn enter_disabled(&mut self) {
        self.transition(MatchPhase::Disabled);
        if let Some(vision) = &self.vision {
            vision.lock().set_illumination(false);
        }
    }

    fn transition(&mut self, next: MatchPhase) {
        if next != self.phase {
            info!("MatchPhaseController: {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
    }
}
