//! Core abstractions for the control loop.
//!
//! - [`subsystem::Subsystem`]: Trait to implement for a stateful mechanism
//! - [`command::Command`]: Trait to implement for a schedulable behavior

pub mod command;
pub mod subsystem;
