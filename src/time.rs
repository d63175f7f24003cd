//! Time values for the scheduler policy.
//!
//! `SimulationTime` represents a duration in nanoseconds since simulation
//! start; `EmulatedTime` represents an instant, equal to `SimulationTime`
//! plus a fixed epoch offset. Both are small `Copy` newtypes over `u64` so
//! they can be freely passed by value through the policy's hot paths.

use std::time::Duration;

/// A duration of simulated time, in nanoseconds.
#[derive(Copy, Clone, Eq, PartialEq, Debug, PartialOrd, Ord, Hash, Default)]
pub struct SimulationTime(u64);

/// Invalid simulation time, used as a wire-level sentinel by callers that
/// need to round-trip through a plain `u64`.
pub const SIMTIME_INVALID: u64 = u64::MAX;

/// Maximum and minimum valid raw values.
pub const SIMTIME_MAX: u64 = u64::MAX - 1;
pub const SIMTIME_MIN: u64 = 0;

pub const SIMTIME_ONE_NANOSECOND: u64 = 1;
pub const SIMTIME_ONE_MICROSECOND: u64 = 1_000;
pub const SIMTIME_ONE_MILLISECOND: u64 = 1_000_000;
pub const SIMTIME_ONE_SECOND: u64 = 1_000_000_000;
pub const SIMTIME_ONE_MINUTE: u64 = 60 * SIMTIME_ONE_SECOND;
pub const SIMTIME_ONE_HOUR: u64 = 60 * SIMTIME_ONE_MINUTE;

impl SimulationTime {
    pub const ZERO: Self = Self(0);
    pub const NANOSECOND: Self = Self(SIMTIME_ONE_NANOSECOND);
    pub const MICROSECOND: Self = Self(SIMTIME_ONE_MICROSECOND);
    pub const MILLISECOND: Self = Self(SIMTIME_ONE_MILLISECOND);
    pub const SECOND: Self = Self(SIMTIME_ONE_SECOND);
    /// The sentinel used by [`SchedulerPolicy::next_time`](crate::policy::SchedulerPolicy::next_time)
    /// when a worker has no pending events.
    pub const MAX: Self = Self(SIMTIME_MAX);

    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros * SIMTIME_ONE_MICROSECOND)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * SIMTIME_ONE_MILLISECOND)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * SIMTIME_ONE_SECOND)
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        let sum = self.0.checked_add(other.0)?;
        (sum <= SIMTIME_MAX).then_some(Self(sum))
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0).min(SIMTIME_MAX))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl std::ops::Add for SimulationTime {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        self.checked_add(other)
            .expect("SimulationTime addition overflowed SIMTIME_MAX")
    }
}

impl std::ops::Sub for SimulationTime {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        self.checked_sub(other)
            .expect("SimulationTime subtraction underflowed")
    }
}

impl From<SimulationTime> for Duration {
    fn from(val: SimulationTime) -> Duration {
        Duration::from_nanos(val.0)
    }
}

impl From<Duration> for SimulationTime {
    fn from(val: Duration) -> SimulationTime {
        SimulationTime(val.as_nanos().min(SIMTIME_MAX as u128) as u64)
    }
}

/// An instant in simulated wall-clock time: [`SimulationTime`] since
/// simulation start, shifted by a fixed epoch offset so that applications
/// observing it see a plausible "recent" time rather than time zero.
#[derive(Copy, Clone, Eq, PartialEq, Debug, PartialOrd, Ord, Hash)]
pub struct EmulatedTime(u64);

/// Nanoseconds from the Unix epoch to the start of the simulation
/// (00:00:00 UTC on 1 January 2000), matching the offset Shadow itself
/// emulates so that simulated applications observe a recent-looking clock.
pub const SIMULATION_START_SEC: u64 = 946_684_800;
pub const EMUTIME_SIMULATION_START: u64 = SIMULATION_START_SEC * SIMTIME_ONE_SECOND;
pub const EMUTIME_MAX: u64 = u64::MAX - 1;

impl EmulatedTime {
    pub const UNIX_EPOCH: Self = Self(0);
    pub const SIMULATION_START: Self = Self(EMUTIME_SIMULATION_START);
    pub const MAX: Self = Self(EMUTIME_MAX);

    /// The instant corresponding to `val` simulation time units since the
    /// simulation began.
    pub fn from_abs_simtime(val: SimulationTime) -> Self {
        Self::SIMULATION_START + val
    }

    /// The simulation time elapsed since the simulation began.
    pub fn to_abs_simtime(self) -> SimulationTime {
        self.duration_since(Self::SIMULATION_START)
    }

    pub fn duration_since(self, earlier: Self) -> SimulationTime {
        SimulationTime(
            self.0
                .checked_sub(earlier.0)
                .expect("EmulatedTime::duration_since: `earlier` is after `self`"),
        )
    }

    pub fn checked_add(self, duration: SimulationTime) -> Option<Self> {
        self.0
            .checked_add(duration.as_nanos())
            .filter(|&t| t <= EMUTIME_MAX)
            .map(Self)
    }

    pub fn saturating_add(self, duration: SimulationTime) -> Self {
        self.checked_add(duration).unwrap_or(Self::MAX)
    }
}

impl std::ops::Add<SimulationTime> for EmulatedTime {
    type Output = Self;
    fn add(self, other: SimulationTime) -> Self {
        self.checked_add(other)
            .expect("EmulatedTime addition overflowed EMUTIME_MAX")
    }
}

impl std::ops::Sub<SimulationTime> for EmulatedTime {
    type Output = Self;
    fn sub(self, other: SimulationTime) -> Self {
        Self(
            self.0
                .checked_sub(other.as_nanos())
                .expect("EmulatedTime subtraction underflowed"),
        )
    }
}

impl std::ops::Sub<EmulatedTime> for EmulatedTime {
    type Output = SimulationTime;
    fn sub(self, other: EmulatedTime) -> SimulationTime {
        self.duration_since(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_time_units() {
        assert_eq!(SimulationTime::from_secs(1).as_nanos(), SIMTIME_ONE_SECOND);
        assert_eq!(
            SimulationTime::from_millis(7).as_nanos(),
            7 * SIMTIME_ONE_MILLISECOND
        );
    }

    #[test]
    fn simulation_time_arithmetic() {
        let a = SimulationTime::from_secs(5);
        let b = SimulationTime::from_millis(7);
        assert_eq!((a + b).as_nanos(), 5 * SIMTIME_ONE_SECOND + 7 * SIMTIME_ONE_MILLISECOND);
        assert_eq!(a - b, SimulationTime::from_nanos(a.as_nanos() - b.as_nanos()));
    }

    #[test]
    fn emulated_time_from_abs_simtime() {
        assert_eq!(
            EmulatedTime::from_abs_simtime(SimulationTime::ZERO),
            EmulatedTime::SIMULATION_START
        );
        assert_eq!(
            EmulatedTime::from_abs_simtime(SimulationTime::SECOND),
            EmulatedTime::SIMULATION_START + SimulationTime::SECOND
        );
    }

    #[test]
    fn emulated_time_round_trips_through_abs_simtime() {
        let t = EmulatedTime::SIMULATION_START + SimulationTime::from_secs(42);
        assert_eq!(t.to_abs_simtime(), SimulationTime::from_secs(42));
    }

    #[test]
    fn emulated_time_ordering_matches_simulation_time_ordering() {
        let earlier = EmulatedTime::SIMULATION_START + SimulationTime::from_secs(1);
        let later = EmulatedTime::SIMULATION_START + SimulationTime::from_secs(2);
        assert!(earlier < later);
        assert_eq!(later - earlier, SimulationTime::from_secs(1));
    }
}
