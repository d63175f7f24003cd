//! The scheduler policy itself: host registration, the causality-rewrite
//! `push`, and the round-draining `pop`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::thread::ThreadId;

use crate::event::SchedEvent;
use crate::event_queue::EventQueue;
use crate::time::{EmulatedTime, SimulationTime};
use crate::worker_state::WorkerState;

/// A worker's stable identity. Workers are OS threads, so the thread's own
/// runtime identity is the natural (and only) identifier we need — see the
/// design notes' resolution of the "what is a worker id" open question.
pub type WorkerId = ThreadId;

/// The bound a caller's host handle type must satisfy: a cheap, `Copy`
/// identity with no content-based comparison. The scheduler never owns or
/// drops a host — it only ever holds this identity for one.
pub trait Host: Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + 'static {}
impl<T> Host for T where T: Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + 'static {}

/// The top-level scheduler registry: host→queue, host→worker, and
/// worker→round state.
///
/// `host_to_queue` and `host_to_worker` are populated only during
/// single-threaded registration (`add_host`) and are effectively read-only
/// for the remainder of the policy's life; `worker_to_state` gains new
/// entries the same way, but each entry's contents are thereafter mutated
/// only by the worker that owns it (with the narrow read-only exceptions
/// in `next_time` and `assigned_hosts` documented on [`WorkerState`]).
pub struct SchedulerPolicy<H: Host, E: SchedEvent> {
    host_to_queue: RwLock<HashMap<H, Arc<EventQueue<E>>>>,
    host_to_worker: RwLock<HashMap<H, WorkerId>>,
    worker_to_state: RwLock<HashMap<WorkerId, Arc<Mutex<WorkerState<H>>>>>,
}

impl<H: Host, E: SchedEvent> SchedulerPolicy<H, E> {
    pub fn new() -> Self {
        Self {
            host_to_queue: RwLock::new(HashMap::new()),
            host_to_worker: RwLock::new(HashMap::new()),
            worker_to_state: RwLock::new(HashMap::new()),
        }
    }

    /// Register `host`, assigning it to `worker` if given, or to the
    /// calling thread's own id otherwise. Must happen before any `push` or
    /// `pop` touches `host`, and must not be called twice for the same
    /// host (see §4.3.1 — doing so silently reassigns its `host_to_worker`
    /// entry without removing it from its previous worker's partitions,
    /// which would violate invariant 2).
    pub fn add_host(&self, host: H, worker: Option<WorkerId>) {
        let worker_id = worker.unwrap_or_else(|| std::thread::current().id());

        self.host_to_queue
            .write()
            .unwrap()
            .entry(host)
            .or_insert_with(|| Arc::new(EventQueue::new()));

        self.host_to_worker.write().unwrap().insert(host, worker_id);

        let state = self
            .worker_to_state
            .write()
            .unwrap()
            .entry(worker_id)
            .or_insert_with(|| Arc::new(Mutex::new(WorkerState::new())))
            .clone();

        state.lock().unwrap().add_host(host);
        log::debug!("scheduler: registered host {host:?} to worker {worker_id:?}");
    }

    /// Enqueue `event` for `dst_host`, rewriting its time forward to
    /// `barrier` if it crosses hosts and would otherwise arrive before the
    /// destination's worker can have advanced past it. Returns the final
    /// (possibly rewritten) event time.
    ///
    /// Fatally aborts if `dst_host` was never registered with `add_host`.
    pub fn push(&self, mut event: E, src_host: H, dst_host: H, barrier: SimulationTime) -> SimulationTime {
        if src_host != dst_host && event.time() < barrier {
            log::trace!(
                "scheduler: rewriting cross-host event time to barrier (crosses {src_host:?} -> {dst_host:?})"
            );
            event.set_time(barrier);
        }

        let effective_time = event.time();

        let queue = {
            let queues = self.host_to_queue.read().unwrap();
            queues
                .get(&dst_host)
                .unwrap_or_else(|| {
                    panic!("SchedulerPolicy::push: destination host {dst_host:?} has no registered queue")
                })
                .clone()
        };
        queue.push(event);

        effective_time
    }

    /// Return the next due event for the calling worker's own hosts, or
    /// `None` if none is due before `barrier`.
    ///
    /// If `barrier` is newer than the last barrier this worker observed, a
    /// new round begins first: every assigned host is rotated back into
    /// the unprocessed work-list (§4.3.3, §4.4).
    pub fn pop(&self, barrier: SimulationTime) -> Option<E> {
        let worker_id = std::thread::current().id();
        let state = self.worker_to_state.read().unwrap().get(&worker_id).cloned()?;
        let mut state = state.lock().unwrap();

        state.begin_round_if_new(barrier);

        loop {
            let host = state.head()?;

            let queue = self
                .host_to_queue
                .read()
                .unwrap()
                .get(&host)
                .expect("invariant violation: a host in a worker's partitions has no queue")
                .clone();

            match queue.pop_if_before(barrier) {
                Some(event) => return Some(event),
                None => {
                    log::trace!("scheduler: host {host:?} drained for this round, advancing");
                    state.retire_head();
                }
            }
        }
    }

    /// The next event time in `host`'s queue, translated to emulated
    /// (epoch-shifted) time, or `None` if its queue is empty.
    ///
    /// Fatally aborts if `host` was never registered with `add_host`.
    pub fn next_host_event_time(&self, host: H) -> Option<EmulatedTime> {
        let queue = {
            let queues = self.host_to_queue.read().unwrap();
            queues
                .get(&host)
                .unwrap_or_else(|| panic!("SchedulerPolicy::next_host_event_time: host {host:?} has no registered queue"))
                .clone()
        };
        queue.next_event_time().map(EmulatedTime::from_abs_simtime)
    }

    /// The minimum next-event time across every host owned by the calling
    /// worker, or [`SimulationTime::MAX`] if none has a pending event (or
    /// the calling thread owns no hosts at all). Read-only: never mutates
    /// any queue or partition.
    pub fn next_time(&self) -> SimulationTime {
        let worker_id = std::thread::current().id();
        let Some(state) = self.worker_to_state.read().unwrap().get(&worker_id).cloned() else {
            return SimulationTime::MAX;
        };
        let state = state.lock().unwrap();

        let queues = self.host_to_queue.read().unwrap();
        state
            .iter_all()
            .filter_map(|host| queues.get(host).and_then(|q| q.next_event_time()))
            .min()
            .unwrap_or(SimulationTime::MAX)
    }

    /// The calling worker's assigned hosts (`processed` then
    /// `unprocessed`, without duplication), or an empty list if the
    /// calling thread owns no hosts.
    pub fn assigned_hosts(&self) -> Vec<H> {
        let worker_id = std::thread::current().id();
        let Some(state) = self.worker_to_state.read().unwrap().get(&worker_id).cloned() else {
            return Vec::new();
        };
        let mut state = state.lock().unwrap();
        state.assigned_hosts().to_vec()
    }
}

impl<H: Host, E: SchedEvent> Default for SchedulerPolicy<H, E> {
    fn default() -> Self {
        Self::new()
    }
}
