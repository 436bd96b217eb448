use std::sync::Arc;

use crate::event_bus::{Event, EventBus};
use crate::state::{Action, AppState, reduce};

/// Owns the current snapshot. Readers hold an `Arc` that never changes
/// under them; each dispatch swaps in a new one.
#[derive(Debug, Default)]
pub struct Store {
    state: Arc<AppState>,
    bus: EventBus,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            bus: EventBus::new(),
        }
    }

    /// Caps the event log; see [`EventBus::with_capacity`].
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.bus = EventBus::with_capacity(capacity);
        self
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Applies `action` and records it. Returns the new snapshot.
    pub fn dispatch(&mut self, action: Action) -> Arc<AppState> {
        let message = action.to_string();
        let kind = action.kind();
        self.state = Arc::new(reduce(&self.state, action));
        self.bus.emit(kind, message);
        self.state()
    }

    /// Buffered events, oldest first. The log is bounded, so long-lived
    /// stores should drain it.
    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }
}
