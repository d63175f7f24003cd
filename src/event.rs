//! The timestamp contract a caller's event payload must satisfy.
//!
//! The scheduler policy treats an event as an opaque payload it never
//! inspects beyond its simulation time — the payload's shape (what work it
//! does, which host it targets) is the simulator's event-payload model, out
//! of scope for this crate.

use crate::time::SimulationTime;

/// Anything the scheduler can read and, under the causality rule, rewrite
/// the delivery time of.
pub trait SchedEvent: Send {
    /// The event's current simulation time.
    fn time(&self) -> SimulationTime;

    /// Overwrite the event's simulation time.
    fn set_time(&mut self, time: SimulationTime);
}
