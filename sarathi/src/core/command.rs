//! Command trait definition

use crate::core::subsystem::SubsystemId;

/// Schedulable behavior with an explicit lifecycle.
///
/// The scheduler calls `initialize` once when the command starts, `execute`
/// once per tick while it runs, and `end` exactly once when it stops. `end`
/// receives `interrupted = true` when the command was cancelled or displaced
/// by another command claiming one of its subsystems; it must release any
/// outputs it holds before returning.
pub trait Command: Send {
    fn name(&self) -> &str;

    /// Subsystems this command claims while running
    fn requirements(&self) -> &[SubsystemId];

    fn initialize(&mut self) {}

    fn execute(&mut self);

    /// Commands that never finish on their own run until cancelled
    fn is_finished(&self) -> bool {
        false
    }

    fn end(&mut self, interrupted: bool) {
        let _ = interrupted;
    }
}
