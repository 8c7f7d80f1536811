use std::cell::RefCell;
use std::collections::VecDeque;

use crate::event::MapEvent;

/// A frame-local queue of map events.
///
/// Panels and tools emit through a shared reference while the UI is being
/// built; the app drains the queue into the controller once per frame.
pub struct EventBus {
    queue: RefCell<VecDeque<MapEvent>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queue", &format!("<{} pending>", self.queue.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
        }
    }

    /// Queue an event for the controller
    pub fn emit(&self, event: MapEvent) {
        log::debug!("Event emitted: {:?}", event.kind());
        self.queue.borrow_mut().push_back(event);
    }

    /// Take every pending event in emission order
    pub fn drain(&self) -> Vec<MapEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let bus = EventBus::new();
        bus.emit(MapEvent::EditRequested { index: 2 });
        bus.emit(MapEvent::SaveRequested);
        assert_eq!(
            bus.drain(),
            vec![MapEvent::EditRequested { index: 2 }, MapEvent::SaveRequested]
        );
        assert!(bus.is_empty());
    }
}
