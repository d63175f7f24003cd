//! A parallel discrete-event scheduler policy.
//!
//! In a discrete-event simulation, each host has a queue of events it must
//! process, and within a given scheduling round the host can process these
//! events independently of all other hosts. This means the hosts can be
//! processed in parallel, as long as one invariant holds: a host must never
//! observe an event from another host that is timestamped earlier than the
//! point up to which it has itself already run. [`SchedulerPolicy`] enforces
//! that invariant by rewriting the timestamp of any cross-host event that
//! would otherwise arrive too early, clamping it forward to the round's
//! barrier time instead.
//!
//! This crate does not run any threads, own any hosts, or decide how work is
//! distributed across a machine's CPUs — it is pure bookkeeping, deliberately
//! decoupled from the thread-pool and CPU-pinning concerns that a full
//! simulator's engine layers on top. A caller registers each host with
//! [`SchedulerPolicy::add_host`], pushes events onto hosts with
//! [`SchedulerPolicy::push`], and each worker thread drains its own hosts'
//! due events with [`SchedulerPolicy::pop`], advancing a shared barrier time
//! between rounds.
//!
//! ```
//! use scheduler::policy::SchedulerPolicy;
//! use scheduler::event::SchedEvent;
//! use scheduler::time::SimulationTime;
//!
//! #[derive(Debug, Clone, PartialEq, Eq)]
//! struct Packet(SimulationTime);
//!
//! impl SchedEvent for Packet {
//!     fn time(&self) -> SimulationTime {
//!         self.0
//!     }
//!     fn set_time(&mut self, time: SimulationTime) {
//!         self.0 = time;
//!     }
//! }
//!
//! let policy: SchedulerPolicy<u32, Packet> = SchedulerPolicy::new();
//! policy.add_host(0, None);
//!
//! let barrier = SimulationTime::from_millis(1);
//! policy.push(Packet(SimulationTime::ZERO), 0, 0, barrier);
//!
//! assert_eq!(policy.pop(barrier), Some(Packet(SimulationTime::ZERO)));
//! assert_eq!(policy.pop(barrier), None);
//! ```

// https://github.com/rust-lang/rfcs/blob/master/text/2585-unsafe-block-in-unsafe-fn.md
#![deny(unsafe_op_in_unsafe_fn)]

pub mod event;
pub mod event_queue;
pub mod policy;
pub mod time;

mod worker_state;

pub use event::SchedEvent;
pub use policy::{Host, SchedulerPolicy, WorkerId};
pub use time::{EmulatedTime, SimulationTime};
