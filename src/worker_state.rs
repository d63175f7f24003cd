//! Per-worker round-partition bookkeeping.

use std::collections::VecDeque;

use crate::time::SimulationTime;

/// The hosts assigned to one worker, split into the current round's
/// work-list (`unprocessed`) and the hosts already drained this round
/// (`processed`).
///
/// Accessed only by its owning worker thread, except that
/// [`SchedulerPolicy::next_time`](crate::policy::SchedulerPolicy::next_time)
/// and
/// [`SchedulerPolicy::assigned_hosts`](crate::policy::SchedulerPolicy::assigned_hosts)
/// read it from whichever thread calls them — safe in practice because the
/// outer engine only does so at round boundaries (see §5, §9(b) of the
/// design notes).
pub(crate) struct WorkerState<H> {
    unprocessed: VecDeque<H>,
    processed: VecDeque<H>,
    all_hosts_cache: Option<Vec<H>>,
    current_barrier: SimulationTime,
}

impl<H: Copy + Eq> WorkerState<H> {
    pub(crate) fn new() -> Self {
        Self {
            unprocessed: VecDeque::new(),
            processed: VecDeque::new(),
            all_hosts_cache: None,
            current_barrier: SimulationTime::ZERO,
        }
    }

    pub(crate) fn add_host(&mut self, host: H) {
        self.unprocessed.push_back(host);
        self.all_hosts_cache = None;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.unprocessed.is_empty() && self.processed.is_empty()
    }

    /// If `barrier` is newer than the last round this worker observed,
    /// rotate every host back into `unprocessed` and advance the round
    /// marker. A no-op if the barrier isn't new.
    pub(crate) fn begin_round_if_new(&mut self, barrier: SimulationTime) {
        if barrier <= self.current_barrier {
            return;
        }

        if self.unprocessed.is_empty() {
            // O(1): every host was already drained into `processed` last round.
            std::mem::swap(&mut self.unprocessed, &mut self.processed);
        } else {
            // A round ended early (the engine advanced the barrier before this
            // worker finished draining) — preserve processing order while
            // folding `processed` back onto the tail of `unprocessed`.
            while let Some(host) = self.processed.pop_front() {
                self.unprocessed.push_back(host);
            }
        }

        self.current_barrier = barrier;
        self.all_hosts_cache = None;
    }

    /// The host at the head of this round's work-list, if any.
    pub(crate) fn head(&self) -> Option<H> {
        self.unprocessed.front().copied()
    }

    /// Move the head of `unprocessed` to the tail of `processed`: this
    /// worker has drained that host's queue up to the current barrier.
    pub(crate) fn retire_head(&mut self) {
        if let Some(host) = self.unprocessed.pop_front() {
            self.processed.push_back(host);
            self.all_hosts_cache = None;
        }
    }

    /// Every host assigned to this worker, across both partitions.
    pub(crate) fn iter_all(&self) -> impl Iterator<Item = &H> {
        self.processed.iter().chain(self.unprocessed.iter())
    }

    /// `processed` followed by `unprocessed`, without duplication. Builds
    /// and caches the concatenation only when both partitions are
    /// non-empty; otherwise returns the single non-empty partition
    /// directly with no allocation.
    pub(crate) fn assigned_hosts(&mut self) -> &[H] {
        if self.processed.is_empty() {
            return self.unprocessed.make_contiguous();
        }
        if self.unprocessed.is_empty() {
            return self.processed.make_contiguous();
        }

        let cache = self
            .all_hosts_cache
            .get_or_insert_with(|| self.processed.iter().chain(self.unprocessed.iter()).copied().collect());
        cache.as_slice()
    }
}
