use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::record::LogRecord;
use crate::transport::Transport;

/// Host-side capabilities the adapter consumes.
///
/// A host owns a registry of named transport slots, routes its own log
/// calls through them, and can dispatch a record to an explicit list of
/// transports on request. The adapter only ever needs these three
/// operations; everything else about the host stays opaque.
pub trait LogHost: Send + Sync {
    /// Register a transport under a named slot, replacing any previous
    /// occupant of that slot.
    fn register(&self, name: &str, transport: Arc<dyn Transport>);

    /// Snapshot of every currently registered transport.
    fn transports(&self) -> Vec<Arc<dyn Transport>>;

    /// Hand a record to each target exactly once, bypassing the host's
    /// own severity filtering.
    fn dispatch(&self, record: &LogRecord, targets: &[Arc<dyn Transport>]) {
        for target in targets {
            target.log(record);
        }
    }
}

/// In-memory [`LogHost`] keyed by slot name.
#[derive(Default)]
pub struct TransportRegistry {
    slots: Mutex<HashMap<String, Arc<dyn Transport>>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        TransportRegistry::default()
    }
}

impl LogHost for TransportRegistry {
    fn register(&self, name: &str, transport: Arc<dyn Transport>) {
        // A poisoned guard still holds a usable map; the host path must
        // not panic.
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), transport);
    }

    fn transports(&self) -> Vec<Arc<dyn Transport>> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;
    use serde_json::json;

    #[test]
    fn registering_the_same_slot_twice_keeps_one_entry() {
        let registry = TransportRegistry::new();
        registry.register("discord", Arc::new(MemoryTransport::new()));
        registry.register("discord", Arc::new(MemoryTransport::new()));
        assert_eq!(registry.transports().len(), 1);
    }

    #[test]
    fn dispatch_hits_each_target_exactly_once() {
        let registry = TransportRegistry::new();
        let a = Arc::new(MemoryTransport::new());
        let b = Arc::new(MemoryTransport::new());
        registry.register("a", a.clone());
        registry.register("b", b.clone());

        let record = LogRecord::new("warn", vec![json!("delivery failed")]);
        let targets = registry.transports();
        registry.dispatch(&record, &targets);

        assert_eq!(a.records().len(), 1);
        assert_eq!(b.records().len(), 1);
        assert_eq!(a.records()[0].level, "warn");
    }

    #[test]
    fn registry_survives_a_poisoned_lock() {
        let registry = Arc::new(TransportRegistry::new());
        let poisoner = registry.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.slots.lock().unwrap();
            panic!("poison the registry lock");
        })
        .join();

        registry.register("discord", Arc::new(MemoryTransport::new()));
        assert_eq!(registry.transports().len(), 1);
    }

    #[test]
    fn transports_are_distinct_by_id() {
        let registry = TransportRegistry::new();
        registry.register("a", Arc::new(MemoryTransport::new()));
        registry.register("b", Arc::new(MemoryTransport::new()));
        let transports = registry.transports();
        assert_ne!(transports[0].id(), transports[1].id());
    }
}
