//=========================================================================
// Cadence — Library Root
//
// This crate defines the public API surface of Cadence, a cooperative
// single-threaded event dispatch loop.
//
// Responsibilities:
// - Expose the dispatch loop interface (`EventSystem`)
// - Keep internal plumbing (queue, registry, pacing) hidden from
//   end users
// - Provide clean separation between the high-level dispatch facade
//   and the lower-level queueing and scheduling machinery
//
// Typical usage:
// ```no_run
// use cadence::EventSystem;
//
// fn main() {
//     let mut system = EventSystem::new();
//     // ... register handlers ...
//     system.run();
//     system.cleanup();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the dispatch machinery (events, handlers, the event
// system). It is exposed publicly for extensibility, but normal
// application code will mostly use the top-level re-exports or the
// prelude.
//
pub mod core;
pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the main entry points so users can simply
// `use cadence::EventSystem;` without having to know the internal
// module structure.
//
pub use crate::core::event::{Event, EventKind};
pub use crate::core::handler::EventHandler;
pub use crate::core::system::{EventSystem, EventSystemBuilder, LoopState};
