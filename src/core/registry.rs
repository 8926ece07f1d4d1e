//=========================================================================
// Handler Registry
//=========================================================================
//
// Ordered storage for registered handlers.
//
// Registration order is dispatch order. Removal is identity-based
// (`Rc::ptr_eq`), never value-based: two handlers with identical state
// are still distinct registrations. The dispatch cursor indexes into
// the live collection, so removals must stay deferred while a dispatch
// is in progress; that deferral lives in the event system, not here.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::handler::EventHandler;

//=== HandlerRegistry =====================================================

/// Ordered collection of live handler registrations.
pub(crate) struct HandlerRegistry {
    handlers: Vec<Rc<dyn EventHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler, taking over the caller's reference.
    pub(crate) fn add(&mut self, handler: Rc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the handler at `index` in registration order, or `None`
    /// past the end.
    pub(crate) fn get(&self, index: usize) -> Option<&Rc<dyn EventHandler>> {
        self.handlers.get(index)
    }

    /// Removes the registration identical to `handler`, dropping the
    /// registry's reference to it.
    ///
    /// Returns false when `handler` is not registered; the registry is
    /// left untouched in that case.
    pub(crate) fn remove(&mut self, handler: &Rc<dyn EventHandler>) -> bool {
        if let Some(position) = self.handlers.iter().position(|h| Rc::ptr_eq(h, handler)) {
            self.handlers.remove(position);
            true
        } else {
            false
        }
    }

    /// Returns the number of registered handlers.
    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handlers are registered.
    pub(crate) fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drops every registration.
    pub(crate) fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
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

    use crate::core::event::Event;
    use crate::core::system::EventSystem;

    //--- Fixtures ---------------------------------------------------------

    struct Probe;

    impl EventHandler for Probe {
        fn handle_event(&self, _system: &mut EventSystem, _event: &Event) {}
    }

    /// Bumps a counter when its last reference is dropped.
    struct DropProbe {
        drops: Rc<Cell<usize>>,
    }

    impl EventHandler for DropProbe {
        fn handle_event(&self, _system: &mut EventSystem, _event: &Event) {}
    }

    impl Drop for DropProbe {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn probe() -> Rc<dyn EventHandler> {
        Rc::new(Probe)
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn registration_order_is_preserved() {
        let (a, b, c) = (probe(), probe(), probe());
        let mut registry = HandlerRegistry::new();
        registry.add(Rc::clone(&a));
        registry.add(Rc::clone(&b));
        registry.add(Rc::clone(&c));

        assert!(Rc::ptr_eq(registry.get(0).unwrap(), &a));
        assert!(Rc::ptr_eq(registry.get(1).unwrap(), &b));
        assert!(Rc::ptr_eq(registry.get(2).unwrap(), &c));
        assert!(registry.get(3).is_none());
    }

    #[test]
    fn remove_matches_identity_not_shape() {
        let (a, b) = (probe(), probe());
        let mut registry = HandlerRegistry::new();
        registry.add(Rc::clone(&a));
        registry.add(Rc::clone(&b));

        assert!(registry.remove(&a));

        assert_eq!(registry.len(), 1);
        assert!(Rc::ptr_eq(registry.get(0).unwrap(), &b));
    }

    #[test]
    fn remove_keeps_the_order_of_the_rest() {
        let (a, b, c) = (probe(), probe(), probe());
        let mut registry = HandlerRegistry::new();
        registry.add(Rc::clone(&a));
        registry.add(Rc::clone(&b));
        registry.add(Rc::clone(&c));

        registry.remove(&b);

        assert!(Rc::ptr_eq(registry.get(0).unwrap(), &a));
        assert!(Rc::ptr_eq(registry.get(1).unwrap(), &c));
    }

    #[test]
    fn remove_of_an_unregistered_handler_is_refused() {
        let (registered, stranger) = (probe(), probe());
        let mut registry = HandlerRegistry::new();
        registry.add(Rc::clone(&registered));

        assert!(!registry.remove(&stranger));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn double_remove_is_a_noop() {
        let handler = probe();
        let mut registry = HandlerRegistry::new();
        registry.add(Rc::clone(&handler));

        assert!(registry.remove(&handler));
        assert!(!registry.remove(&handler));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_drops_the_registry_reference() {
        let drops = Rc::new(Cell::new(0));
        let handler: Rc<dyn EventHandler> = Rc::new(DropProbe {
            drops: Rc::clone(&drops),
        });
        let mut registry = HandlerRegistry::new();
        registry.add(Rc::clone(&handler));

        registry.remove(&handler);
        assert_eq!(drops.get(), 0, "the caller still holds a reference");

        drop(handler);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn clear_releases_every_registration() {
        let drops = Rc::new(Cell::new(0));
        let mut registry = HandlerRegistry::new();
        for _ in 0..3 {
            registry.add(Rc::new(DropProbe {
                drops: Rc::clone(&drops),
            }));
        }

        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(drops.get(), 3);
    }
}
