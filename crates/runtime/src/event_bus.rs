/// One applied state change, for traceability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Monotonic per bus, starting at 1.
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Events kept before the oldest are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Bounded log. Once `capacity` events are buffered, each new one evicts the
/// oldest; callers that need every event must drain regularly.
#[derive(Debug)]
pub struct EventBus {
    next_seq: u64,
    capacity: usize,
    dropped: u64,
    events: Vec<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            capacity: capacity.max(1),
            dropped: 0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) -> u64 {
        self.next_seq += 1;
        if self.events.len() >= self.capacity {
            self.events.remove(0);
            self.dropped += 1;
        }
        self.events.push(Event {
            seq: self.next_seq,
            kind,
            message: message.into(),
        });
        self.next_seq
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events evicted because the log was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Sequence numbers keep increasing across drains.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
