//! Subsystem trait definition

use parking_lot::Mutex;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Stateful mechanism refreshed once per control tick
pub trait Subsystem: Send {
    /// Human readable name used in logs
    fn name(&self) -> &'static str;

    /// Periodic hook. Must not block; reads are last-known-value only.
    fn refresh(&mut self);
}

/// Shared handle to a registered subsystem
pub type SubsystemHandle<T> = Arc<Mutex<T>>;

/// Type-level identity of a subsystem, used for command requirements
#[derive(Clone, Copy)]
pub struct SubsystemId {
    type_id: TypeId,
    name: &'static str,
}

impl SubsystemId {
    pub fn of<T: Subsystem + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            type_id: TypeId::of::<T>(),
            name: full.rsplit("::").next().unwrap_or(full),
        }
    }

    /// Short type name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for SubsystemId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for SubsystemId {}

impl Hash for SubsystemId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
