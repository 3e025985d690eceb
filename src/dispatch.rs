//! Dispatch bus routing invocation events to user handlers.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::commands::{CommandContext, CommandEvent, CommandRegistry};
use crate::emitter::{EventEmitter, EventPriority, Listener};

/// The single emitter every accepted invocation is published on.
pub struct DispatchBus {
    emitter: EventEmitter<CommandEvent>,
}

impl DispatchBus {
    /// Create the bus with its routing listener already subscribed.
    pub fn new(registry: Rc<CommandRegistry>) -> Self {
        let emitter = EventEmitter::new();
        emitter.subscribe(route_to_callback(registry), EventPriority::Low);
        Self { emitter }
    }

    pub fn emit(&self, event: &CommandEvent) -> anyhow::Result<()> {
        self.emitter.emit(event)
    }

    /// Add an observer alongside the routing listener.
    pub fn subscribe(&self, listener: Listener<CommandEvent>, priority: EventPriority) {
        self.emitter.subscribe(listener, priority);
    }

    pub fn unsubscribe(&self, listener: &Listener<CommandEvent>) {
        self.emitter.unsubscribe(listener);
    }

    pub fn emitter(&self) -> &EventEmitter<CommandEvent> {
        &self.emitter
    }
}

impl fmt::Debug for DispatchBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchBus")
            .field("listeners", &self.emitter.len())
            .finish()
    }
}

fn route_to_callback(registry: Rc<CommandRegistry>) -> Listener<CommandEvent> {
    Rc::new(move |event: &CommandEvent| {
        let Some(callback) = registry.callback(&event.name) else {
            debug!(command = %event.name, "no handler bound, dropping event");
            return Ok(());
        };
        callback(&CommandContext::new(&registry, &event.origin, &event.args))
    })
}
