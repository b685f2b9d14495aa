//! Operator input to command bindings
//!
//! Each binding ties one control on one device to a command, with one of two
//! activation modes:
//!
//! | Trigger | Starts | Stops |
//! |---------|--------|-------|
//! | `WhileActive` | every tick the control is held and the command is idle | cancelled on release |
//! | `OnTrigger` | once per press (rising edge) | when the command finishes by itself |
//!
//! Bindings are only accepted for enabled capabilities and are fixed once
//! setup completes.

use crate::config::{Capability, CapabilityConfig};
use crate::error::{Error, Result};
use crate::input::{Control, InputHub};
use crate::scheduler::{CommandId, CommandScheduler};
use tracing::debug;

/// Activation mode of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Active while the control is held, cancelled the tick it is released
    WhileActive,
    /// Started on press, runs to its own completion
    OnTrigger,
}

/// (device, control, trigger) → command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBinding {
    pub device: u8,
    pub control: Control,
    pub trigger: Trigger,
    pub command: CommandId,
}

impl InputBinding {
    pub fn while_active(device: u8, control: Control, command: CommandId) -> Self {
        Self {
            device,
            control,
            trigger: Trigger::WhileActive,
            command,
        }
    }

    pub fn on_trigger(device: u8, control: Control, command: CommandId) -> Self {
        Self {
            device,
            control,
            trigger: Trigger::OnTrigger,
            command,
        }
    }
}

#[derive(Debug)]
struct BoundInput {
    binding: InputBinding,
    capability: Capability,
    /// Control state seen on the previous poll
    was_pressed: bool,
}

/// Capability-gated binding table
#[derive(Debug)]
pub struct CommandBindingTable {
    capabilities: CapabilityConfig,
    bindings: Vec<BoundInput>,
}

impl CommandBindingTable {
    pub fn new(capabilities: CapabilityConfig) -> Self {
        Self {
            capabilities,
            bindings: Vec::new(),
        }
    }

    /// Add a binding governed by `capability`. Refused when that
    /// capability is disabled.
    pub fn bind(&mut self, capability: Capability, binding: InputBinding) -> Result<()> {
        if !self.capabilities.is_enabled(capability) {
            return Err(Error::CapabilityDisabled(capability));
        }

        debug!(
            "CommandBindingTable: [{}] device {} {:?} {:?} -> #{}",
            capability,
            binding.device,
            binding.control,
            binding.trigger,
            binding.command.index()
        );
        self.bindings.push(BoundInput {
            binding,
            capability,
            was_pressed: false,
        });
        Ok(())
    }

    /// Sample every bound control and start or cancel commands accordingly
    pub fn poll(&mut self, inputs: &InputHub, scheduler: &mut CommandScheduler) -> Result<()> {
        for bound in &mut self.bindings {
            let binding = bound.binding;
            let pressed = inputs.is_pressed(binding.device, binding.control);
            let rising = pressed && !bound.was_pressed;
            let falling = !pressed && bound.was_pressed;
            bound.was_pressed = pressed;

            match binding.trigger {
                Trigger::WhileActive => {
                    if pressed && !scheduler.is_scheduled(binding.command) {
                        scheduler.schedule(binding.command)?;
                    } else if falling {
                        scheduler.cancel(binding.command)?;
                    }
                }
                Trigger::OnTrigger => {
                    if rising {
                        scheduler.schedule(binding.command)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn bindings(&self) -> impl Iterator<Item = (Capability, &InputBinding)> + '_ {
        self.bindings
            .iter()
            .map(|bound| (bound.capability, &bound.binding))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::Command;
    use crate::core::subsystem::SubsystemId;
    use crate::input::GamepadState;

    /// Runs for a fixed number of ticks, or forever when `ticks` is None
    struct Timed {
        ticks: Option<u32>,
        executed: u32,
        starts: u32,
    }

    impl Command for Timed {
        fn name(&self) -> &str {
            "timed"
        }
        fn requirements(&self) -> &[SubsystemId] {
            &[]
        }
        fn initialize(&mut self) {
            self.executed = 0;
            self.starts += 1;
        }
        fn execute(&mut self) {
            self.executed += 1;
        }
        fn is_finished(&self) -> bool {
            self.ticks.is_some_and(|n| self.executed >= n)
        }
    }

    fn timed(ticks: Option<u32>) -> Timed {
        Timed {
            ticks,
            executed: 0,
            starts: 0,
        }
    }

    fn press(inputs: &InputHub, control: Control) {
        inputs.update(0, GamepadState::new().with_pressed(control));
    }

    fn release(inputs: &InputHub) {
        inputs.update(0, GamepadState::new());
    }

    fn step(table: &mut CommandBindingTable, inputs: &InputHub, scheduler: &mut CommandScheduler) {
        table.poll(inputs, scheduler).unwrap();
        scheduler.run();
    }

    #[test]
    fn test_bind_disabled_capability_fails() {
        let mut scheduler = CommandScheduler::new();
        let id = scheduler.add(timed(None));
        let caps = CapabilityConfig::none().with(Capability::Drive, true);
        let mut table = CommandBindingTable::new(caps);

        table
            .bind(Capability::Drive, InputBinding::while_active(0, Control::B, id))
            .unwrap();
        let err = table
            .bind(Capability::Shooter, InputBinding::on_trigger(1, Control::A, id))
            .unwrap_err();

        assert!(matches!(err, Error::CapabilityDisabled(Capability::Shooter)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_while_active_follows_control() {
        let inputs = InputHub::new();
        let mut scheduler = CommandScheduler::new();
        let id = scheduler.add(timed(None));
        let mut table = CommandBindingTable::new(CapabilityConfig::all());
        table
            .bind(Capability::Drive, InputBinding::while_active(0, Control::B, id))
            .unwrap();

        step(&mut table, &inputs, &mut scheduler);
        assert!(!scheduler.is_scheduled(id));

        press(&inputs, Control::B);
        step(&mut table, &inputs, &mut scheduler);
        assert!(scheduler.is_scheduled(id));
        step(&mut table, &inputs, &mut scheduler);
        assert!(scheduler.is_scheduled(id));

        release(&inputs);
        table.poll(&inputs, &mut scheduler).unwrap();
        assert!(!scheduler.is_scheduled(id));
    }

    #[test]
    fn test_while_active_restarts_finished_command() {
        let inputs = InputHub::new();
        let mut scheduler = CommandScheduler::new();
        let id = scheduler.add(timed(Some(1)));
        let mut table = CommandBindingTable::new(CapabilityConfig::all());
        table
            .bind(Capability::Climber, InputBinding::while_active(0, Control::PovUp, id))
            .unwrap();

        press(&inputs, Control::PovUp);
        step(&mut table, &inputs, &mut scheduler);
        // Finished during run, restarted on the next poll
        assert!(!scheduler.is_scheduled(id));
        table.poll(&inputs, &mut scheduler).unwrap();
        assert!(scheduler.is_scheduled(id));
    }

    #[test]
    fn test_on_trigger_fires_once_per_press() {
        let inputs = InputHub::new();
        let mut scheduler = CommandScheduler::new();
        let id = scheduler.add(timed(Some(3)));
        let mut table = CommandBindingTable::new(CapabilityConfig::all());
        table
            .bind(Capability::Drive, InputBinding::on_trigger(0, Control::PovLeft, id))
            .unwrap();

        press(&inputs, Control::PovLeft);
        step(&mut table, &inputs, &mut scheduler);
        assert!(scheduler.is_scheduled(id));

        // Releasing does not cancel; the command runs to completion
        release(&inputs);
        step(&mut table, &inputs, &mut scheduler);
        assert!(scheduler.is_scheduled(id));
        step(&mut table, &inputs, &mut scheduler);
        assert!(!scheduler.is_scheduled(id));

        // Holding past completion does not restart it
        press(&inputs, Control::PovLeft);
        for _ in 0..5 {
            step(&mut table, &inputs, &mut scheduler);
        }
        assert!(!scheduler.is_scheduled(id));
    }
}
