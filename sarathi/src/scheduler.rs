//! Command scheduler
//!
//! Holds every command of the robot and decides which ones run. A running
//! command claims its required subsystems; scheduling a command interrupts
//! whichever commands hold those claims. Default commands fill subsystems
//! nothing else claims.
//!
//! ```text
//! run():
//! 1. execute() every running command, in the order it was scheduled
//! 2. end(false) and release claims for commands reporting finished
//! 3. schedule default commands of unclaimed subsystems
//! ```

use crate::core::command::Command;
use crate::core::subsystem::SubsystemId;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Identifier of a command owned by a [`CommandScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

struct Slot {
    command: Box<dyn Command>,
    running: bool,
}

/// Owns commands, subsystem claims and default commands
#[derive(Default)]
pub struct CommandScheduler {
    slots: Vec<Slot>,
    /// Running commands in schedule order
    running: Vec<CommandId>,
    claims: HashMap<SubsystemId, CommandId>,
    defaults: HashMap<SubsystemId, CommandId>,
    /// Default command registration order, so defaults start deterministically
    default_order: Vec<SubsystemId>,
}

impl CommandScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand a command to the scheduler. It stays idle until scheduled.
    pub fn add(&mut self, command: impl Command + 'static) -> CommandId {
        let id = CommandId(self.slots.len());
        debug!("CommandScheduler: Added '{}' as #{}", command.name(), id.0);
        self.slots.push(Slot {
            command: Box::new(command),
            running: false,
        });
        id
    }

    /// Bind the command run whenever nothing else claims `subsystem`.
    ///
    /// A subsystem has at most one default command; a second assignment is
    /// refused and the first binding kept.
    pub fn set_default_command(&mut self, subsystem: SubsystemId, id: CommandId) -> Result<()> {
        let requested = self.slot(id)?;
        if let Some(existing) = self.defaults.get(&subsystem) {
            return Err(Error::DuplicateDefaultCommand {
                subsystem: subsystem.name(),
                existing: self.slots[existing.0].command.name().to_string(),
                rejected: requested.command.name().to_string(),
            });
        }
        if !requested.command.requirements().contains(&subsystem) {
            return Err(Error::DefaultCommandMissingRequirement {
                subsystem: subsystem.name(),
                command: requested.command.name().to_string(),
            });
        }

        info!(
            "CommandScheduler: Default command for {} is '{}'",
            subsystem,
            requested.command.name()
        );
        self.defaults.insert(subsystem, id);
        self.default_order.push(subsystem);
        Ok(())
    }

    pub fn default_command(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.defaults.get(&subsystem).copied()
    }

    /// Start a command. No-op if it is already running; commands holding
    /// any of its requirements are interrupted first.
    pub fn schedule(&mut self, id: CommandId) -> Result<()> {
        if self.slot(id)?.running {
            return Ok(());
        }

        let requirements = self.slots[id.0].command.requirements().to_vec();
        for requirement in &requirements {
            if let Some(holder) = self.claims.get(requirement).copied() {
                debug!(
                    "CommandScheduler: '{}' interrupts '{}' on {}",
                    self.slots[id.0].command.name(),
                    self.slots[holder.0].command.name(),
                    requirement
                );
                self.stop(holder, true);
            }
        }

        for requirement in requirements {
            self.claims.insert(requirement, id);
        }
        let slot = &mut self.slots[id.0];
        slot.running = true;
        slot.command.initialize();
        self.running.push(id);
        debug!("CommandScheduler: Started '{}'", slot.command.name());
        Ok(())
    }

    /// Stop a running command synchronously with `interrupted = true`
    pub fn cancel(&mut self, id: CommandId) -> Result<()> {
        if self.slot(id)?.running {
            self.stop(id, true);
        }
        Ok(())
    }

    /// Cancel every running command, most recently scheduled first
    pub fn cancel_all(&mut self) {
        while let Some(id) = self.running.last().copied() {
            self.stop(id, true);
        }
    }

    /// Advance every running command by one tick
    pub fn run(&mut self) {
        let snapshot = self.running.clone();
        for id in snapshot {
            // An earlier command in this pass may have cancelled this one
            if !self.slots[id.0].running {
                continue;
            }

            let slot = &mut self.slots[id.0];
            slot.command.execute();
            if slot.command.is_finished() {
                self.stop(id, false);
            }
        }

        self.schedule_defaults();
    }

    pub fn is_scheduled(&self, id: CommandId) -> bool {
        self.slots.get(id.0).is_some_and(|slot| slot.running)
    }

    /// Command currently claiming `subsystem`
    pub fn claimant(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.claims.get(&subsystem).copied()
    }

    pub fn command_name(&self, id: CommandId) -> Option<&str> {
        self.slots.get(id.0).map(|slot| slot.command.name())
    }

    /// Running commands in schedule order
    pub fn running(&self) -> &[CommandId] {
        &self.running
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn schedule_defaults(&mut self) {
        for i in 0..self.default_order.len() {
            let subsystem = self.default_order[i];
            if self.claims.contains_key(&subsystem) {
                continue;
            }
            let id = self.defaults[&subsystem];
            // Only ids issued by `add` reach `defaults`
            let _ = self.schedule(id);
        }
    }

    fn stop(&mut self, id: CommandId, interrupted: bool) {
        let slot = &mut self.slots[id.0];
        slot.running = false;
        slot.command.end(interrupted);

        if interrupted {
            debug!("CommandScheduler: Interrupted '{}'", slot.command.name());
        } else {
            debug!("CommandScheduler: Finished '{}'", slot.command.name());
        }

        self.claims.retain(|_, holder| *holder != id);
        self.running.retain(|running| *running != id);
    }

    fn slot(&self, id: CommandId) -> Result<&Slot> {
        self.slots.get(id.0).ok_or(Error::UnknownCommand(id.0))
    }
}

impl fmt::Debug for CommandScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let running: Vec<&str> = self
            .running
            .iter()
            .map(|id| self.slots[id.0].command.name())
            .collect();
        f.debug_struct("CommandScheduler")
            .field("commands", &self.slots.len())
            .field("running", &running)
            .field("defaults", &self.default_order)
            .finish()
    }
}
