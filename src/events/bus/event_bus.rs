// src/events/bus/event_bus.rs
//
// In-process event bus for catalog events.
//
// RULES:
// - Delivery is synchronous, in subscription order, on the emitting thread
// - Handlers run without the registry lock held, so a handler may emit
// - A panicking handler is logged and skipped
// - The last MAX_LOG_ENTRIES emissions are kept for inspection

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock};

use crate::events::types::DomainEvent;

type Handler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

const MAX_LOG_ENTRIES: usize = 512;

/// Lets the catalog services publish facts (page fetched, cache fallback,
/// favorite changed) without knowing who listens.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<TypeId, Vec<Handler>>>,
    recent: Mutex<VecDeque<EventLogEntry>>,
}

/// One recorded emission
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every future `E`
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: Handler = Arc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        match self.handlers.write() {
            Ok(mut handlers) => handlers.entry(TypeId::of::<E>()).or_default().push(erased),
            Err(_) => log::error!(
                "Event registry poisoned; {} subscription dropped",
                std::any::type_name::<E>()
            ),
        }
    }

    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let targets: Vec<Handler> = self
            .handlers
            .read()
            .ok()
            .and_then(|handlers| handlers.get(&TypeId::of::<E>()).cloned())
            .unwrap_or_default();

        log::debug!(
            "[EVENT] {} ({}) -> {} handlers",
            event.event_type(),
            event.event_id(),
            targets.len()
        );
        self.record(EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: targets.len(),
        });

        for handler in targets {
            if catch_unwind(AssertUnwindSafe(|| handler(&event as &dyn Any))).is_err() {
                log::error!("A {} handler panicked", event.event_type());
            }
        }
    }

    /// Recent emissions, oldest first
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.recent
            .lock()
            .map(|recent| recent.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn record(&self, entry: EventLogEntry) {
        if let Ok(mut recent) = self.recent.lock() {
            if recent.len() == MAX_LOG_ENTRIES {
                recent.pop_front();
            }
            recent.push_back(entry);
        }
    }
}
