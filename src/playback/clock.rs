//! Periodic tick sources driving a [`Player`](crate::playback::player::Player).

use std::time::{Duration, Instant};

/// Periodic callback source provided by the host.
///
/// A source driven by an external display link only tracks attach and detach; the host calls
/// [`Player::tick`](crate::playback::player::Player::tick) while attached. A source that keeps its
/// own schedule also reports due ticks, and the host drives it through
/// [`Player::advance`](crate::playback::player::Player::advance).
pub trait TickSource {
    /// Begin ticking at `fps` frames per second, replacing any previous cadence.
    fn attach(&mut self, fps: u32);
    /// Stop ticking immediately.
    fn detach(&mut self);
    /// Whether the source is currently attached.
    fn is_attached(&self) -> bool;

    /// Ticks due at `now`, consuming them. Externally driven sources report none.
    fn due_ticks(&mut self, _now: Instant) -> u32 {
        0
    }

    /// Time until the next scheduled tick, if the source schedules its own.
    fn until_next(&self, _now: Instant) -> Option<Duration> {
        None
    }
}

/// Tick source that only records its lifecycle; the host ticks by hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    fps: Option<u32>,
}

impl ManualClock {
    /// Frame rate of the current attachment.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}

impl TickSource for ManualClock {
    fn attach(&mut self, fps: u32) {
        self.fps = Some(fps.max(1));
    }

    fn detach(&mut self) {
        self.fps = None;
    }

    fn is_attached(&self) -> bool {
        self.fps.is_some()
    }
}

/// Wall-clock pacer for hosts without a display link.
///
/// Its [`TickSource::due_ticks`] reports how many periods have elapsed since the last call.
#[derive(Clone, Copy, Debug, Default)]
pub struct FramePacer {
    period: Option<Duration>,
    next: Option<Instant>,
}

impl FramePacer {
    /// Time between ticks while attached.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl TickSource for FramePacer {
    fn attach(&mut self, fps: u32) {
        let period = Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)));
        self.period = Some(period);
        self.next = Some(Instant::now() + period);
    }

    fn detach(&mut self) {
        self.period = None;
        self.next = None;
    }

    fn is_attached(&self) -> bool {
        self.period.is_some()
    }

    fn due_ticks(&mut self, now: Instant) -> u32 {
        let (Some(period), Some(mut next)) = (self.period, self.next) else {
            return 0;
        };
        let mut due = 0;
        while next <= now {
            due += 1;
            next += period;
        }
        self.next = Some(next);
        due
    }

    fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next.map(|n| n.saturating_duration_since(now))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
