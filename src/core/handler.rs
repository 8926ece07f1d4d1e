//=========================================================================
// Event Handler
//=========================================================================
//
// The contract between application code and the dispatch loop.
//
// Handlers are registered as `Rc<dyn EventHandler>` and invoked for
// every dispatched event, in registration order. The callback receives
// the event system itself, so handlers can emit follow-up events,
// register or remove handlers, and request loop termination. All of
// these are queued and applied in order, never mid-enumeration.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::event::Event;
use crate::core::system::EventSystem;

//=== EventHandler ========================================================

/// A recipient of dispatched events.
///
/// Implementations hold their own state; the callback takes `&self`,
/// so per-handler mutation goes through interior mutability
/// (`Cell`/`RefCell`). A handler is a shared value: the registry holds
/// one `Rc` reference, and callers keep clones for as long as they
/// need a handle (for removal, or to outlive the system).
///
/// The system is single-threaded by design: handlers run on the loop's
/// thread, one at a time, and need not be `Send`.
///
/// # Examples
///
/// ```
/// use cadence::prelude::*;
/// use std::cell::Cell;
///
/// struct FrameCounter {
///     frames: Cell<u64>,
/// }
///
/// impl EventHandler for FrameCounter {
///     fn handle_event(&self, _system: &mut EventSystem, event: &Event) {
///         if let EventKind::Update = event.kind() {
///             self.frames.set(self.frames.get() + 1);
///         }
///     }
/// }
/// ```
///
/// Closures work too:
///
/// ```
/// use cadence::prelude::*;
/// use std::rc::Rc;
///
/// let mut system = EventSystem::new();
/// system.add_handler(Rc::new(|_system: &mut EventSystem, event: &Event| {
///     if event.kind() == EventKind::Exit {
///         println!("goodbye");
///     }
/// }));
/// ```
pub trait EventHandler {
    /// Called once for every event dispatched while this handler is
    /// registered.
    ///
    /// Runs synchronously on the loop thread; a slow handler delays the
    /// whole frame. Mutating calls on `system` (emit, removal, exit)
    /// are queued and processed in order, so the enumeration this
    /// callback is part of is never invalidated under it.
    fn handle_event(&self, system: &mut EventSystem, event: &Event);
}

//=== Closure Handlers ====================================================

/// Any `Fn(&mut EventSystem, &Event)` closure is a handler.
impl<F> EventHandler for F
where
    F: Fn(&mut EventSystem, &Event),
{
    fn handle_event(&self, system: &mut EventSystem, event: &Event) {
        self(system, event)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::core::event::EventKind;

    //--- Fixtures ---------------------------------------------------------

    struct KindLog {
        kinds: RefCell<Vec<EventKind>>,
    }

    impl EventHandler for KindLog {
        fn handle_event(&self, _system: &mut EventSystem, event: &Event) {
            self.kinds.borrow_mut().push(event.kind());
        }
    }

    /// Bumps a counter when its last reference is dropped.
    struct HeldResource {
        drops: Rc<Cell<usize>>,
    }

    impl EventHandler for HeldResource {
        fn handle_event(&self, _system: &mut EventSystem, _event: &Event) {}
    }

    impl Drop for HeldResource {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn struct_handlers_observe_events() {
        let handler = KindLog {
            kinds: RefCell::new(Vec::new()),
        };
        let mut system = EventSystem::new();

        handler.handle_event(&mut system, &Event::new(EventKind::Start));
        handler.handle_event(&mut system, &Event::new(EventKind::Custom(9)));

        assert_eq!(
            *handler.kinds.borrow(),
            vec![EventKind::Start, EventKind::Custom(9)]
        );
    }

    #[test]
    fn closures_are_handlers() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let handler = move |_system: &mut EventSystem, _event: &Event| {
            seen.set(seen.get() + 1);
        };
        let mut system = EventSystem::new();

        handler.handle_event(&mut system, &Event::new(EventKind::Start));
        handler.handle_event(&mut system, &Event::new(EventKind::Start));

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn closures_coerce_to_trait_objects() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let handler: Rc<dyn EventHandler> = Rc::new(move |_: &mut EventSystem, _: &Event| {
            seen.set(seen.get() + 1);
        });
        let mut system = EventSystem::new();

        handler.handle_event(&mut system, &Event::new(EventKind::Custom(1)));

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn handler_state_is_released_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        let handler: Rc<dyn EventHandler> = Rc::new(HeldResource {
            drops: Rc::clone(&drops),
        });
        let clone = Rc::clone(&handler);

        drop(handler);
        assert_eq!(drops.get(), 0, "a live reference remains");

        drop(clone);
        assert_eq!(drops.get(), 1, "last reference releases the state once");
    }
}
