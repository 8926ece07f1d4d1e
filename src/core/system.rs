//=========================================================================
// Event System
//
// The dispatch loop: handler registry, event queue, and the fixed-rate
// frame loop that drains one into the other.
//
// Architecture:
// ```text
//     EventSystemBuilder ──build()──> EventSystem ──run()──> [Loop]
//         │                              │
//         ├─ with_frame_rate()           ├─ queue:    emit / exit / removal
//         └─ with_queue_capacity()       ├─ registry: add_handler
//                                        └─ per tick: Update → drain → sleep
// ```
//
// Each tick enqueues a synthetic Update event, then drains the queue to
// empty: ordinary events fan out to every registered handler, control
// items mutate the registry or mark the loop for termination. Handlers
// may enqueue more work mid-drain; it is processed within the same
// cycle. After the drain, the pacer sleeps off the rest of the frame
// budget.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;
use std::time::Duration;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::event::{Event, EventKind};
use crate::core::handler::EventHandler;
use crate::core::pacing::{frame_budget, FramePacer};
use crate::core::queue::{EventQueue, QueueItem};
use crate::core::registry::HandlerRegistry;

//=== LoopState ===========================================================

/// Dispatch loop lifecycle.
///
/// The loop is one-shot: once `Stopped`, an [`EventSystem`] never runs
/// again (its registry and queue remain inspectable and cleanable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// [`EventSystem::run`] has not been called yet.
    NotStarted,

    /// The loop is ticking and dispatching events.
    Running,

    /// Termination was processed; the current cycle is the last one.
    Stopping,

    /// [`EventSystem::run`] has returned. Terminal.
    Stopped,
}

//=== EventSystemBuilder ==================================================

/// Builder for configuring and constructing an [`EventSystem`].
///
/// Provides a fluent API for setting loop parameters before
/// construction.
///
/// # Default Values
///
/// - **Frame rate**: 30.0 (dispatch cycles per second)
/// - **Queue capacity**: 32 events
///
/// # Examples
///
/// ```
/// use cadence::EventSystemBuilder;
///
/// let system = EventSystemBuilder::new()
///     .with_frame_rate(60.0)
///     .with_queue_capacity(64)
///     .build();
/// ```
pub struct EventSystemBuilder {
    frame_rate: f64,
    queue_capacity: usize,
}

impl EventSystemBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            frame_rate: 30.0,
            queue_capacity: 32,
        }
    }

    /// Sets the target dispatch cycles per second.
    ///
    /// Each cycle raises one `Update` event, drains the queue, and
    /// sleeps off the rest of its budget. Higher rates deliver events
    /// sooner but spend more CPU on near-empty drains.
    ///
    /// Default: 30.0
    ///
    /// # Panics
    ///
    /// Panics if `frame_rate <= 0.0`.
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        assert!(frame_rate > 0.0, "Frame rate must be positive, got {}", frame_rate);
        self.frame_rate = frame_rate;
        self
    }

    /// Sets the initial event queue allocation.
    ///
    /// The queue grows past this freely; the capacity only avoids
    /// reallocation during bursts of same-cycle events.
    ///
    /// Default: 32
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Queue capacity must be positive");
        self.queue_capacity = capacity;
        self
    }

    /// Builds the event system.
    ///
    /// Consumes the builder and produces a configured [`EventSystem`]
    /// in the `NotStarted` state, ready for handler registration and
    /// [`EventSystem::run`].
    pub fn build(self) -> EventSystem {
        info!(
            "Building event system (frame rate: {}, queue capacity: {})",
            self.frame_rate, self.queue_capacity
        );

        EventSystem {
            registry: HandlerRegistry::new(),
            queue: EventQueue::with_capacity(self.queue_capacity),
            state: LoopState::NotStarted,
            frame_budget: frame_budget(self.frame_rate),
        }
    }
}

impl Default for EventSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== EventSystem =========================================================

/// Cooperative single-threaded event dispatch loop.
///
/// Handlers register with the system; events flow through a strict
/// FIFO queue; [`EventSystem::run`] drains the queue once per frame and
/// fans each event out to every handler in registration order. All
/// mutation requested from inside a callback (emitting, removal, exit)
/// is queued and applied in order, never under a running enumeration.
///
/// # Architecture
///
/// ```text
/// EventSystem
///   ├─► registry  (registration order is dispatch order)
///   ├─► queue     (FIFO of events and control requests)
///   └─► run()     (per tick: queue Update → drain to empty → sleep)
/// ```
///
/// # Examples
///
/// ```no_run
/// use cadence::prelude::*;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Countdown {
///     frames_left: Cell<u32>,
/// }
///
/// impl EventHandler for Countdown {
///     fn handle_event(&self, system: &mut EventSystem, event: &Event) {
///         if let EventKind::Update = event.kind() {
///             match self.frames_left.get() {
///                 0 => system.request_exit(),
///                 n => self.frames_left.set(n - 1),
///             }
///         }
///     }
/// }
///
/// let mut system = EventSystem::builder().with_frame_rate(60.0).build();
/// system.add_handler(Rc::new(Countdown { frames_left: Cell::new(120) }));
/// system.run();
/// system.cleanup();
/// ```
pub struct EventSystem {
    registry: HandlerRegistry,
    queue: EventQueue,
    state: LoopState,
    frame_budget: Duration,
}

impl EventSystem {
    //--- Construction -----------------------------------------------------

    /// Creates an event system with default configuration.
    pub fn new() -> Self {
        EventSystemBuilder::new().build()
    }

    /// Returns a builder for custom configuration.
    pub fn builder() -> EventSystemBuilder {
        EventSystemBuilder::new()
    }

    //--- Registration -----------------------------------------------------

    /// Registers a handler at the end of the dispatch order.
    ///
    /// Takes over the caller's reference; callers that need a handle
    /// afterwards (for [`EventSystem::remove_handler`], or to inspect
    /// handler state after the loop) clone before registering.
    ///
    /// Registration is immediate: a handler added from inside a
    /// callback still receives the event currently being dispatched.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence::prelude::*;
    /// use std::rc::Rc;
    ///
    /// let mut system = EventSystem::new();
    /// let logger: Rc<dyn EventHandler> = Rc::new(|_: &mut EventSystem, event: &Event| {
    ///     println!("saw {:?}", event.kind());
    /// });
    ///
    /// system.add_handler(Rc::clone(&logger)); // keep a handle for removal
    /// assert_eq!(system.handler_count(), 1);
    /// ```
    pub fn add_handler(&mut self, handler: Rc<dyn EventHandler>) {
        self.registry.add(handler);
        debug!("Handler registered ({} total)", self.registry.len());
    }

    /// Requests removal of a handler.
    ///
    /// Removal is deferred: the request is queued and takes effect when
    /// the drain reaches it. Events already queued ahead of the request
    /// are still delivered to the handler, and the event currently
    /// being dispatched always completes delivery. An unregistered
    /// target makes the request a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence::prelude::*;
    /// use std::rc::Rc;
    ///
    /// let mut system = EventSystem::new();
    /// let handler: Rc<dyn EventHandler> = Rc::new(|_: &mut EventSystem, _: &Event| {});
    ///
    /// system.add_handler(Rc::clone(&handler));
    /// system.remove_handler(&handler);
    ///
    /// // Still registered: the request waits in the queue until the
    /// // next drain cycle processes it.
    /// assert_eq!(system.handler_count(), 1);
    /// assert_eq!(system.pending_events(), 1);
    /// ```
    pub fn remove_handler(&mut self, handler: &Rc<dyn EventHandler>) {
        self.queue.enqueue(QueueItem::RemoveHandler(Rc::clone(handler)));
        debug!("Handler removal queued");
    }

    //--- Event Intake -----------------------------------------------------

    /// Queues an event for dispatch.
    ///
    /// Events are dispatched in queue order. An event emitted from
    /// inside a callback joins the tail of the queue and is dispatched
    /// within the same drain cycle, before the frame's pacing sleep.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence::prelude::*;
    ///
    /// let mut system = EventSystem::new();
    /// system.emit(Event::new(EventKind::Custom(2)).with_payload(String::from("saved")));
    /// assert_eq!(system.pending_events(), 1);
    /// ```
    pub fn emit(&mut self, event: Event) {
        trace!("Queued {:?}", event);
        self.queue.enqueue(QueueItem::Event(event));
    }

    /// Requests loop termination.
    ///
    /// Termination is deferred like everything else: a control item is
    /// queued, and when the drain processes it the loop is marked as
    /// stopping and an `Exit` event is raised. Because the drain runs
    /// to empty, that `Exit` event is delivered to every handler within
    /// the same cycle; the loop then finishes the cycle (including its
    /// pacing sleep) and returns. No further frames run.
    pub fn request_exit(&mut self) {
        debug!("Exit requested");
        self.queue.enqueue(QueueItem::BreakLoop);
    }

    //--- Introspection ----------------------------------------------------

    /// Returns the loop lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the number of queued items not yet processed.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    //--- Execution --------------------------------------------------------

    /// Runs the dispatch loop, blocking until termination is requested.
    ///
    /// # Lifecycle
    ///
    /// 1. Transitions to `Running` and queues the `Start` event. Events
    ///    emitted before `run` sit ahead of it and are dispatched first.
    /// 2. Every tick: queues an `Update` event carrying the elapsed
    ///    milliseconds (`f64`) since the previous tick started, then
    ///    drains the queue to empty, including whatever handlers
    ///    enqueue mid-drain.
    /// 3. Sleeps off the remainder of the frame budget.
    /// 4. After the tick whose drain processed an exit request (which
    ///    also delivered the `Exit` event), returns with the state set
    ///    to `Stopped`.
    ///
    /// The loop is one-shot: calling `run` on a system that is not in
    /// the `NotStarted` state logs a warning and returns immediately.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cadence::prelude::*;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let frames = Cell::new(0);
    /// let mut system = EventSystem::builder().with_frame_rate(60.0).build();
    /// system.add_handler(Rc::new(move |system: &mut EventSystem, event: &Event| {
    ///     if let EventKind::Update = event.kind() {
    ///         frames.set(frames.get() + 1);
    ///         if frames.get() == 600 {
    ///             system.request_exit(); // stop after ten seconds
    ///         }
    ///     }
    /// }));
    /// system.run();
    /// ```
    pub fn run(&mut self) {
        if self.state != LoopState::NotStarted {
            warn!("run() called on a dispatch loop in state {:?}, ignoring", self.state);
            return;
        }

        info!("Dispatch loop starting (frame budget: {:?})", self.frame_budget);
        self.state = LoopState::Running;
        self.queue.enqueue(QueueItem::Event(Event::new(EventKind::Start)));

        let mut pacer = FramePacer::new(self.frame_budget);
        while self.state == LoopState::Running {
            let tick = pacer.begin_tick();

            self.queue.enqueue(QueueItem::Event(
                Event::new(EventKind::Update).with_payload(tick.elapsed_millis()),
            ));
            self.drain_queue();

            pacer.end_tick(&tick);
        }

        self.state = LoopState::Stopped;
        info!("Dispatch loop stopped");
    }

    //--- Teardown ---------------------------------------------------------

    /// Releases everything the system still holds.
    ///
    /// Drops every queued item (event payloads are released exactly
    /// once) and every handler registration (handlers with no surviving
    /// external reference are dropped). The loop state is untouched.
    /// Dropping the system releases the same resources implicitly; this
    /// operation exists for deterministic teardown at a chosen point.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence::prelude::*;
    ///
    /// let mut system = EventSystem::new();
    /// system.emit(Event::new(EventKind::Custom(1)));
    /// system.cleanup();
    /// assert_eq!(system.pending_events(), 0);
    /// ```
    pub fn cleanup(&mut self) {
        if self.queue.is_empty() && self.registry.is_empty() {
            debug!("Cleanup: nothing to release");
            return;
        }

        let dropped = self.queue.len();
        let released = self.registry.len();
        self.queue.clear();
        self.registry.clear();

        debug!(
            "Cleanup: {} pending event(s) dropped, {} handler(s) released",
            dropped, released
        );
    }

    //--- Drain & Dispatch -------------------------------------------------

    // Processes queued items until the queue is empty at the moment of
    // the check. Handlers enqueue more items mid-drain; those are
    // reached by the same loop.
    fn drain_queue(&mut self) {
        while let Some(item) = self.queue.dequeue() {
            match item {
                QueueItem::Event(event) => self.dispatch(&event),
                QueueItem::RemoveHandler(handler) => self.finish_removal(&handler),
                QueueItem::BreakLoop => {
                    // Mark first so handlers receiving the Exit event
                    // below already observe a stopping system.
                    self.state = LoopState::Stopping;
                    self.queue.enqueue(QueueItem::Event(Event::new(EventKind::Exit)));
                }
            }
            // The item is dropped here; an event's payload is released
            // after its dispatch, unconditionally.
        }
    }

    // Fans one event out to every handler, in registration order. The
    // cursor re-checks the live count each step, so handlers appended
    // mid-dispatch are reached too; removals are deferred through the
    // queue and never happen under this loop.
    fn dispatch(&mut self, event: &Event) {
        trace!("Dispatching {:?} to {} handler(s)", event, self.registry.len());

        let mut index = 0;
        while let Some(handler) = self.registry.get(index) {
            let handler = Rc::clone(handler);
            handler.handle_event(self, event);
            index += 1;
        }
    }

    fn finish_removal(&mut self, handler: &Rc<dyn EventHandler>) {
        if self.registry.remove(handler) {
            debug!("Handler removed ({} remaining)", self.registry.len());
        } else {
            debug!("Removal target not registered, skipping");
        }
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
