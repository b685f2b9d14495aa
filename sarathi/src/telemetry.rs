//! Shared key/value telemetry tables.
//!
//! A [`TelemetryHub`] is a set of named [`TelemetryTable`]s holding numeric
//! fields. Tables are cheap to clone and may be written from outside the
//! control loop (the vision processor, sensor parsers); every access is a
//! non-blocking last-known-value read or a last-writer-wins write.
//!
//! The hub also carries actuator outputs: subsystems publish their motor
//! demands into the `actuators` table where the motor drivers pick them up.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Table that subsystems publish actuator outputs into
pub const ACTUATOR_TABLE: &str = "actuators";

/// Collection of named telemetry tables
#[derive(Clone, Debug, Default)]
pub struct TelemetryHub {
    tables: Arc<RwLock<HashMap<String, TelemetryTable>>>,
}

impl TelemetryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a table by name, creating it empty on first use
    pub fn table(&self, name: &str) -> TelemetryTable {
        if let Some(table) = self.tables.read().get(name) {
            return table.clone();
        }

        self.tables
            .write()
            .entry(name.to_string())
            .or_insert_with(TelemetryTable::default)
            .clone()
    }

    /// Names of all tables created so far
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[derive(Debug, Default)]
struct TableInner {
    values: HashMap<String, f64>,
    /// Number of write operations applied (a batch counts once)
    writes: u64,
}

/// Handle to one named table of numeric fields
#[derive(Clone, Debug, Default)]
pub struct TelemetryTable {
    inner: Arc<RwLock<TableInner>>,
}

impl TelemetryTable {
    /// Last written value, `None` if the key was never written
    pub fn get(&self, key: &str) -> Option<f64> {
        self.inner.read().values.get(key).copied()
    }

    /// Read several keys under one lock
    pub fn get_many<const N: usize>(&self, keys: [&str; N]) -> [Option<f64>; N] {
        let inner = self.inner.read();
        keys.map(|key| inner.values.get(key).copied())
    }

    pub fn set(&self, key: &str, value: f64) {
        let mut inner = self.inner.write();
        set_value(&mut inner.values, key, value);
        inner.writes += 1;
    }

    /// Write several keys under one lock; readers never observe a partial batch
    pub fn set_many(&self, entries: &[(&str, f64)]) {
        let mut inner = self.inner.write();
        for (key, value) in entries {
            set_value(&mut inner.values, key, *value);
        }
        inner.writes += 1;
    }

    /// Total write operations applied to this table
    pub fn writes(&self) -> u64 {
        self.inner.read().writes
    }
}

/// Set a value (create or update in-place)
#[inline]
fn set_value(values: &mut HashMap<String, f64>, key: &str, value: f64) {
    if let Some(v) = values.get_mut(key) {
        *v = value;
    } else {
        values.insert(key.to_string(), value);
    }
}
