//=========================================================================
// Event Queue
//=========================================================================
//
// Strict FIFO of pending dispatch work.
//
// Ordinary events and the loop's own control requests (deferred handler
// removal, loop termination) travel through the same queue, so control
// takes effect exactly where it was queued relative to the events
// around it. The control forms are crate-private: applications can only
// queue ordinary events.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::event::Event;
use crate::core::handler::EventHandler;

//=== QueueItem ===========================================================

/// One unit of queued work: an event to dispatch, or a control request
/// interpreted by the loop itself.
pub(crate) enum QueueItem {
    /// An ordinary event, fanned out to every registered handler.
    Event(Event),

    /// Deferred removal of the referenced handler.
    RemoveHandler(Rc<dyn EventHandler>),

    /// Stop the dispatch loop after the current cycle.
    BreakLoop,
}

//=== EventQueue ==========================================================

/// FIFO queue of [`QueueItem`]s.
pub(crate) struct EventQueue {
    items: VecDeque<QueueItem>,
}

impl EventQueue {
    /// Creates an empty queue with room for `capacity` items before
    /// reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Adds an item at the tail.
    pub(crate) fn enqueue(&mut self, item: QueueItem) {
        self.items.push_back(item);
    }

    /// Removes and returns the head item, or `None` if the queue is
    /// empty.
    pub(crate) fn dequeue(&mut self) -> Option<QueueItem> {
        self.items.pop_front()
    }

    /// Returns the number of queued items.
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is queued.
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every queued item. Event payloads are released here.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::core::event::EventKind;
    use crate::core::system::EventSystem;

    //--- Fixtures ---------------------------------------------------------

    struct NullHandler;

    impl EventHandler for NullHandler {
        fn handle_event(&self, _system: &mut EventSystem, _event: &Event) {}
    }

    /// Bumps a counter when dropped.
    struct DropPayload {
        drops: Rc<Cell<usize>>,
    }

    impl Drop for DropPayload {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn event_item(tag: i32) -> QueueItem {
        QueueItem::Event(Event::new(EventKind::Custom(tag)))
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn items_dequeue_in_fifo_order() {
        let mut queue = EventQueue::with_capacity(4);
        queue.enqueue(event_item(1));
        queue.enqueue(event_item(2));
        queue.enqueue(event_item(3));

        for expected in 1..=3 {
            match queue.dequeue() {
                Some(QueueItem::Event(event)) => {
                    assert_eq!(event.kind(), EventKind::Custom(expected));
                }
                _ => panic!("expected an event item"),
            }
        }
    }

    #[test]
    fn dequeue_on_an_empty_queue_returns_none() {
        let mut queue = EventQueue::with_capacity(4);
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn control_items_keep_their_place_in_line() {
        let mut queue = EventQueue::with_capacity(4);
        let handler: Rc<dyn EventHandler> = Rc::new(NullHandler);

        queue.enqueue(event_item(1));
        queue.enqueue(QueueItem::RemoveHandler(Rc::clone(&handler)));
        queue.enqueue(QueueItem::BreakLoop);

        assert!(matches!(queue.dequeue(), Some(QueueItem::Event(_))));
        assert!(matches!(queue.dequeue(), Some(QueueItem::RemoveHandler(_))));
        assert!(matches!(queue.dequeue(), Some(QueueItem::BreakLoop)));
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn len_tracks_enqueue_and_dequeue() {
        let mut queue = EventQueue::with_capacity(4);
        assert!(queue.is_empty());

        queue.enqueue(event_item(1));
        queue.enqueue(event_item(2));
        assert_eq!(queue.len(), 2);

        queue.dequeue();
        assert_eq!(queue.len(), 1);
        assert!(!queue.is_empty());
    }

    #[test]
    fn clear_drops_pending_payloads() {
        let drops = Rc::new(Cell::new(0));
        let mut queue = EventQueue::with_capacity(4);

        for _ in 0..3 {
            queue.enqueue(QueueItem::Event(Event::new(EventKind::Custom(1)).with_payload(
                DropPayload {
                    drops: Rc::clone(&drops),
                },
            )));
        }

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn removal_item_holds_its_own_handler_reference() {
        let handler: Rc<dyn EventHandler> = Rc::new(NullHandler);
        let mut queue = EventQueue::with_capacity(4);

        queue.enqueue(QueueItem::RemoveHandler(Rc::clone(&handler)));
        assert_eq!(Rc::strong_count(&handler), 2);

        queue.clear();
        assert_eq!(Rc::strong_count(&handler), 1);
    }
}
