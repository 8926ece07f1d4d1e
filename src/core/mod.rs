//=========================================================================
// Core
//
// The dispatch primitives: events and their kinds, the handler trait,
// and the event system that ties registration, queueing, and the frame
// loop together.
//
// Registry, queue, and pacing are implementation detail and stay
// crate-private; everything an application touches is re-exported
// below.
//=========================================================================

pub mod event;
pub mod handler;
pub mod system;

pub(crate) mod pacing;
pub(crate) mod queue;
pub(crate) mod registry;

//=== Re-exports ==========================================================

pub use event::{Event, EventKind};
pub use handler::EventHandler;
pub use system::{EventSystem, EventSystemBuilder, LoopState};
