//! A thread-safe, per-host priority queue of events.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Mutex;

use crate::event::SchedEvent;
use crate::time::SimulationTime;

/// A concurrent min-heap of events ordered by simulation time, with FIFO
/// tie-breaking for events that land on the same time.
///
/// Every [`SchedulerPolicy`](crate::policy::SchedulerPolicy) owns exactly
/// one of these per registered host. Pushes may arrive from any worker
/// thread (the causality rewrite rule lets any worker target any host);
/// pops are only ever issued by the host's owning worker, but the queue
/// itself does not enforce that — [`SchedulerPolicy::pop`](crate::policy::SchedulerPolicy::pop)
/// does.
pub struct EventQueue<E: SchedEvent> {
    inner: Mutex<Inner<E>>,
}

struct Inner<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    /// Monotonically increasing counter assigned at push, used only to
    /// break ties between events with equal time so that pop order is
    /// deterministic FIFO rather than heap-implementation-defined.
    next_seq: u64,
}

struct Entry<E> {
    time: SimulationTime,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.time.cmp(&other.time).then(self.seq.cmp(&other.seq))
    }
}

impl<E: SchedEvent> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                heap: BinaryHeap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Push a new event onto the queue. Never fails, never blocks on
    /// anything but this queue's own (briefly-held) mutex.
    pub fn push(&self, event: E) {
        let mut inner = self.inner.lock().unwrap();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let time = event.time();
        inner.heap.push(Reverse(Entry { time, seq, event }));
    }

    /// If the earliest event's time is strictly less than `barrier`,
    /// remove and return it. Otherwise leave the queue untouched and
    /// return `None`. Events exactly at `barrier` are left for a future
    /// round (the barrier-exclusion rule).
    pub fn pop_if_before(&self, barrier: SimulationTime) -> Option<E> {
        let mut inner = self.inner.lock().unwrap();
        if inner.heap.peek()?.0.time < barrier {
            let Reverse(entry) = inner.heap.pop().unwrap();
            Some(entry.event)
        } else {
            None
        }
    }

    /// The time of the earliest event currently queued, or `None` if
    /// empty. A snapshot: by the time the caller acts on it, a concurrent
    /// push or pop may have already invalidated it. Only meaningful when
    /// compared against a barrier the caller itself controls.
    pub fn next_event_time(&self) -> Option<SimulationTime> {
        let inner = self.inner.lock().unwrap();
        inner.heap.peek().map(|Reverse(entry)| entry.time)
    }
}

impl<E: SchedEvent> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct TestEvent {
        time: SimulationTime,
        label: &'static str,
    }

    impl SchedEvent for TestEvent {
        fn time(&self) -> SimulationTime {
            self.time
        }
        fn set_time(&mut self, time: SimulationTime) {
            self.time = time;
        }
    }

    fn ev(nanos: u64, label: &'static str) -> TestEvent {
        TestEvent {
            time: SimulationTime::from_nanos(nanos),
            label,
        }
    }

    #[test]
    fn pops_in_time_order() {
        let q = EventQueue::new();
        q.push(ev(3, "c"));
        q.push(ev(1, "a"));
        q.push(ev(2, "b"));

        assert_eq!(q.pop_if_before(SimulationTime::from_nanos(100)).unwrap().label, "a");
        assert_eq!(q.pop_if_before(SimulationTime::from_nanos(100)).unwrap().label, "b");
        assert_eq!(q.pop_if_before(SimulationTime::from_nanos(100)).unwrap().label, "c");
        assert!(q.pop_if_before(SimulationTime::from_nanos(100)).is_none());
    }

    #[test]
    fn equal_times_break_ties_fifo() {
        let q = EventQueue::new();
        q.push(ev(5, "first"));
        q.push(ev(5, "second"));

        assert_eq!(q.pop_if_before(SimulationTime::from_nanos(10)).unwrap().label, "first");
        assert_eq!(q.pop_if_before(SimulationTime::from_nanos(10)).unwrap().label, "second");
    }

    #[test]
    fn pop_if_before_uses_strict_less_than() {
        let q = EventQueue::new();
        q.push(ev(10, "at_barrier"));

        // exactly at the barrier: not returned
        assert!(q.pop_if_before(SimulationTime::from_nanos(10)).is_none());
        // strictly less than a later barrier: returned
        assert!(q.pop_if_before(SimulationTime::from_nanos(11)).is_some());
    }

    #[test]
    fn next_event_time_is_a_non_mutating_peek() {
        let q: EventQueue<TestEvent> = EventQueue::new();
        assert_eq!(q.next_event_time(), None);

        q.push(ev(4, "x"));
        assert_eq!(q.next_event_time(), Some(SimulationTime::from_nanos(4)));
        // peeking twice doesn't consume it
        assert_eq!(q.next_event_time(), Some(SimulationTime::from_nanos(4)));
        assert!(q.pop_if_before(SimulationTime::from_nanos(5)).is_some());
    }
}
