//=========================================================================
// Event
//=========================================================================
//
// The unit of dispatch: a kind tag, an optional opaque payload, and an
// optional weak reference to the emitting handler.
//
// Events are created by application code (or by the loop itself for
// lifecycle notifications), queued, delivered to every registered
// handler, and dropped right after dispatch. The payload rides in an
// owned box, so whatever cleanup it needs happens exactly once, when
// the event is dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

//=== Internal Dependencies ===============================================

use crate::core::handler::EventHandler;

//=== EventKind ===========================================================

/// Identifies what an [`Event`] means.
///
/// The three lifecycle kinds are raised by the dispatch loop itself:
/// [`Start`](EventKind::Start) once before the first frame,
/// [`Update`](EventKind::Update) every frame (payload: elapsed
/// milliseconds since the previous frame, as `f64`), and
/// [`Exit`](EventKind::Exit) once after loop termination has been
/// requested. Application events use [`Custom`](EventKind::Custom) with
/// a program-defined tag.
///
/// # Examples
///
/// ```
/// use cadence::prelude::*;
///
/// const ENEMY_SPAWNED: EventKind = EventKind::Custom(1);
///
/// let event = Event::new(ENEMY_SPAWNED);
/// assert_eq!(event.kind(), ENEMY_SPAWNED);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Raised once by the loop before the first frame.
    Start,

    /// Raised every frame; carries elapsed milliseconds as `f64`.
    Update,

    /// Raised once when loop termination has been requested.
    Exit,

    /// Application-defined event, identified by its tag.
    Custom(i32),
}

//=== Event ===============================================================

/// A queued unit of dispatch.
///
/// An event owns its payload: the payload is created with the event,
/// borrowed by handlers during dispatch, and dropped with the event
/// once dispatch is over. Sender tracking is deliberately weak: a
/// queued event never keeps its emitter alive.
///
/// Construction is fluent:
///
/// ```
/// use cadence::prelude::*;
///
/// struct Damage { amount: u32 }
///
/// let event = Event::new(EventKind::Custom(3)).with_payload(Damage { amount: 12 });
/// assert_eq!(event.payload::<Damage>().unwrap().amount, 12);
/// ```
pub struct Event {
    sender: Option<Weak<dyn EventHandler>>,
    kind: EventKind,
    payload: Option<Box<dyn Any>>,
}

impl Event {
    //--- Construction -----------------------------------------------------

    /// Creates an event with no sender and no payload.
    pub fn new(kind: EventKind) -> Self {
        Self {
            sender: None,
            kind,
            payload: None,
        }
    }

    /// Attaches a payload, consuming and returning the event.
    ///
    /// The payload is owned by the event and dropped with it after
    /// dispatch; handlers borrow it via [`Event::payload`].
    pub fn with_payload<P: Any>(mut self, payload: P) -> Self {
        self.payload = Some(Box::new(payload));
        self
    }

    /// Records the emitting handler, consuming and returning the event.
    ///
    /// Only a weak reference is kept: a handler does not outlive its
    /// registrations just because an event it raised is still queued.
    pub fn with_sender(mut self, sender: &Rc<dyn EventHandler>) -> Self {
        self.sender = Some(Rc::downgrade(sender));
        self
    }

    //--- Accessors --------------------------------------------------------

    /// Returns what this event means.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Borrows the payload, if one of the given type was attached.
    ///
    /// Returns `None` when the event carries no payload, or a payload
    /// of a different type.
    pub fn payload<P: Any>(&self) -> Option<&P> {
        self.payload.as_ref()?.downcast_ref::<P>()
    }

    /// Returns the emitting handler, if one was recorded and is still
    /// alive.
    pub fn sender(&self) -> Option<Rc<dyn EventHandler>> {
        self.sender.as_ref()?.upgrade()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("has_sender", &self.sender.is_some())
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
