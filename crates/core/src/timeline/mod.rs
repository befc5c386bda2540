//! Replay of finished traces at a fixed cadence.
//!
//! Operations complete before their trace is handed over, so playback only
//! decides how much of an existing event list is visible. Nothing here
//! sleeps; the caller advances the clock.

mod highlight;

use std::time::Duration;

use crate::trace::AnimationEvent;

pub use highlight::{apply_highlights, highlight_states};

#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    pub elapsed: Duration,
}

impl PlaybackClock {
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }
}

/// Steps through a recorded trace. Event `i` becomes due at `i * step_delay`,
/// so the first one is shown immediately.
#[derive(Debug, Clone)]
pub struct Player {
    events: Vec<AnimationEvent>,
    next_event: usize,
    step_delay: Duration,
}

impl Player {
    pub fn new(events: Vec<AnimationEvent>, step_delay: Duration) -> Self {
        Self {
            events,
            next_event: 0,
            step_delay,
        }
    }

    pub fn events(&self) -> &[AnimationEvent] {
        &self.events
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Number of events delivered so far.
    pub fn position(&self) -> usize {
        self.next_event
    }

    /// Most recently delivered event.
    pub fn current(&self) -> Option<&AnimationEvent> {
        self.next_event
            .checked_sub(1)
            .and_then(|index| self.events.get(index))
    }

    pub fn is_finished(&self) -> bool {
        self.next_event >= self.events.len()
    }

    /// Events that became due since the last call, in order.
    pub fn tick(&mut self, clock: &PlaybackClock) -> &[AnimationEvent] {
        let due = if self.step_delay.is_zero() {
            self.events.len()
        } else {
            let steps = clock.elapsed.as_nanos() / self.step_delay.as_nanos();
            usize::try_from(steps)
                .map_or(self.events.len(), |steps| steps.saturating_add(1))
                .min(self.events.len())
        };

        let start = self.next_event.min(due);
        self.next_event = self.next_event.max(due);
        &self.events[start..due]
    }

    pub fn step_forward(&mut self) -> Option<&AnimationEvent> {
        let event = self.events.get(self.next_event)?;
        self.next_event += 1;
        Some(event)
    }

    /// Jumps so that `step` events have been delivered.
    pub fn seek(&mut self, step: usize) {
        self.next_event = step.min(self.events.len());
    }

    pub fn rewind(&mut self) {
        self.next_event = 0;
    }

    /// Time at which the whole trace has been shown.
    pub fn duration(&self) -> Duration {
        let steps = u32::try_from(self.events.len().saturating_sub(1)).unwrap_or(u32::MAX);
        self.step_delay.saturating_mul(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{event, EventKind};

    fn player(count: usize) -> Player {
        let events = (0..count)
            .map(|i| event(EventKind::Message, format!("step {i}")))
            .collect();
        Player::new(events, Duration::from_millis(100))
    }

    #[test]
    fn tick_releases_events_as_time_passes() {
        let mut player = player(4);
        let mut clock = PlaybackClock::default();

        assert_eq!(player.tick(&clock).len(), 1);
        assert!(player.tick(&clock).is_empty());

        clock.advance(Duration::from_millis(250));
        let due: Vec<_> = player.tick(&clock).iter().map(|e| e.message.clone()).collect();
        assert_eq!(due, ["step 1", "step 2"]);
        assert!(!player.is_finished());

        clock.advance(Duration::from_secs(10));
        assert_eq!(player.tick(&clock).len(), 1);
        assert!(player.is_finished());
        assert_eq!(player.current().unwrap().message, "step 3");
    }

    #[test]
    fn seek_and_step_forward() {
        let mut player = player(3);
        player.seek(2);
        assert_eq!(player.step_forward().unwrap().message, "step 2");
        assert!(player.step_forward().is_none());

        player.seek(99);
        assert_eq!(player.position(), 3);
        player.rewind();
        assert_eq!(player.position(), 0);
        assert!(player.current().is_none());
    }

    #[test]
    fn seeking_ahead_of_the_clock_does_not_replay() {
        let mut player = player(5);
        player.seek(3);
        let mut clock = PlaybackClock::default();
        clock.advance(Duration::from_millis(150));
        assert!(player.tick(&clock).is_empty());
        assert_eq!(player.position(), 3);
    }

    #[test]
    fn duration_covers_every_step() {
        assert_eq!(player(4).duration(), Duration::from_millis(300));
        assert_eq!(player(0).duration(), Duration::ZERO);
    }

    #[test]
    fn clock_reset() {
        let mut clock = PlaybackClock::default();
        clock.advance(Duration::from_millis(5));
        clock.reset();
        assert_eq!(clock.elapsed, Duration::ZERO);
    }
}
