//! Subsystem registry
//!
//! Owns every subsystem instance of one robot. At most one instance per
//! subsystem type exists; the first [`SubsystemRegistry::get_or_create`]
//! constructs and registers it, later calls hand back the same handle.
//! [`SubsystemRegistry::tick`] refreshes each registered subsystem exactly
//! once, in registration order.

use crate::core::subsystem::{Subsystem, SubsystemHandle, SubsystemId};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

struct Entry {
    id: SubsystemId,
    /// Type-erased view used by `tick`
    subsystem: Arc<Mutex<dyn Subsystem>>,
    /// Typed `SubsystemHandle<T>` for handing out clones
    handle: Box<dyn Any + Send>,
}

/// Registry of singleton subsystems
#[derive(Default)]
pub struct SubsystemRegistry {
    entries: Vec<Entry>,
    index: HashMap<TypeId, usize>,
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the subsystem of type `T`, constructing and registering it on
    /// first access.
    pub fn get_or_create<T, F>(&mut self, create: F) -> SubsystemHandle<T>
    where
        T: Subsystem + 'static,
        F: FnOnce() -> T,
    {
        if let Some(handle) = self.get::<T>() {
            return handle;
        }

        let handle = Arc::new(Mutex::new(create()));
        self.insert(Arc::clone(&handle));
        handle
    }

    /// Register an already constructed subsystem.
    ///
    /// Fails if an instance of `T` is already registered; the existing
    /// instance is left untouched.
    pub fn register<T>(&mut self, subsystem: T) -> Result<SubsystemHandle<T>>
    where
        T: Subsystem + 'static,
    {
        if self.contains::<T>() {
            return Err(Error::SubsystemAlreadyRegistered(SubsystemId::of::<T>().name()));
        }

        let handle = Arc::new(Mutex::new(subsystem));
        self.insert(Arc::clone(&handle));
        Ok(handle)
    }

    /// Handle to the subsystem of type `T`, if registered
    pub fn get<T>(&self) -> Option<SubsystemHandle<T>>
    where
        T: Subsystem + 'static,
    {
        let idx = *self.index.get(&TypeId::of::<T>())?;
        self.entries[idx]
            .handle
            .downcast_ref::<SubsystemHandle<T>>()
            .cloned()
    }

    pub fn contains<T>(&self) -> bool
    where
        T: Subsystem + 'static,
    {
        self.index.contains_key(&TypeId::of::<T>())
    }

    /// Refresh every registered subsystem once, in registration order
    pub fn tick(&self) {
        for entry in &self.entries {
            entry.subsystem.lock().refresh();
        }
    }

    /// Registered subsystem ids in registration order
    pub fn ids(&self) -> Vec<SubsystemId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert<T>(&mut self, handle: SubsystemHandle<T>)
    where
        T: Subsystem + 'static,
    {
        let id = SubsystemId::of::<T>();
        let subsystem: Arc<Mutex<dyn Subsystem>> = handle.clone();

        debug!("SubsystemRegistry: Registered {} (#{})", id, self.entries.len());

        self.index.insert(TypeId::of::<T>(), self.entries.len());
        self.entries.push(Entry {
            id,
            subsystem,
            handle: Box::new(handle),
        });
    }
}

impl fmt::Debug for SubsystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubsystemRegistry")
            .field("subsystems", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records the global refresh order into a shared log
    #[derive(Debug)]
    struct Gauge {
        label: &'static str,
        refreshes: usize,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Subsystem for Gauge {
        fn name(&self) -> &'static str {
            self.label
        }

        fn refresh(&mut self) {
            self.refreshes += 1;
            self.log.lock().push(self.label);
        }
    }

    struct Other {
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Subsystem for Other {
        fn name(&self) -> &'static str {
            "other"
        }

        fn refresh(&mut self) {
            self.log.lock().push("other");
        }
    }

    fn gauge(log: &Arc<Mutex<Vec<&'static str>>>) -> Gauge {
        Gauge {
            label: "gauge",
            refreshes: 0,
            log: Arc::clone(log),
        }
    }

    #[test]
    fn test_get_or_create_returns_same_instance() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let constructed = AtomicUsize::new(0);
        let mut registry = SubsystemRegistry::new();

        let first = registry.get_or_create(|| {
            constructed.fetch_add(1, Ordering::Relaxed);
            gauge(&log)
        });
        let second = registry.get_or_create(|| {
            constructed.fetch_add(1, Ordering::Relaxed);
            gauge(&log)
        });

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(constructed.load(Ordering::Relaxed), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_tick_refreshes_once_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubsystemRegistry::new();

        let other_log = Arc::clone(&log);
        registry.get_or_create(move || Other { log: other_log });
        let gauge = registry.get_or_create(|| gauge(&log));

        registry.tick();
        assert_eq!(gauge.lock().refreshes, 1);
        assert_eq!(*log.lock(), vec!["other", "gauge"]);

        registry.tick();
        assert_eq!(gauge.lock().refreshes, 2);
        assert_eq!(log.lock().len(), 4);
    }

    #[test]
    fn test_register_rejects_second_instance() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubsystemRegistry::new();

        let first = registry.register(gauge(&log)).unwrap();
        let err = registry.register(gauge(&log)).unwrap_err();

        assert!(matches!(err, Error::SubsystemAlreadyRegistered("Gauge")));
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&first, &registry.get::<Gauge>().unwrap()));
    }

    #[test]
    fn test_get_unregistered() {
        let registry = SubsystemRegistry::new();
        assert!(registry.get::<Gauge>().is_none());
        assert!(!registry.contains::<Gauge>());
        assert!(registry.is_empty());
    }
}
