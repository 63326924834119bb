//! Topic-based event bus for runtime events.
//!
//! Engine events are published to specific topics, and consumers subscribe
//! only to the topics they need. Each topic preserves emission order; the
//! `seq` number on every event restores the global order across topics.

mod bus;

pub use bus::{Event, EventBus, Topic};
