//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cadence::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Dispatch loop
pub use crate::core::system::{EventSystem, EventSystemBuilder, LoopState};

// Events
pub use crate::core::event::{Event, EventKind};

// Handler trait
pub use crate::core::handler::EventHandler;
