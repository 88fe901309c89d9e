//! Delivery of recorded input events tick by tick.

use rampart_core::InputEvent;

/// Cursor over an ordered input stream.
///
/// Events are delivered in stream order. Each call hands out the run of
/// events whose tick is at or before the requested one, so an event recorded
/// out of order reaches the world late and is rejected there.
#[derive(Clone, Copy, Debug)]
pub struct InputSchedule<'a> {
    events: &'a [InputEvent],
    cursor: usize,
}

impl<'a> InputSchedule<'a> {
    /// Wraps an ordered input stream.
    #[must_use]
    pub const fn new(events: &'a [InputEvent]) -> Self {
        Self { events, cursor: 0 }
    }

    /// Returns the events to deliver on `tick` and moves past them.
    pub fn due(&mut self, tick: u64) -> &'a [InputEvent] {
        let start = self.cursor;
        let pending = &self.events[start..];
        let count = pending
            .iter()
            .position(|event| event.tick > tick)
            .unwrap_or(pending.len());
        self.cursor = start + count;
        &pending[..count]
    }

    /// Number of events not delivered yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::InputAction;

    fn focus(tick: u64) -> InputEvent {
        InputEvent {
            tick,
            action: InputAction::FocusTarget { enemy: None },
        }
    }

    #[test]
    fn events_are_released_on_their_tick() {
        let events = [focus(0), focus(0), focus(2), focus(5)];
        let mut schedule = InputSchedule::new(&events);

        assert_eq!(schedule.due(0).len(), 2);
        assert!(schedule.due(1).is_empty());
        assert_eq!(schedule.due(2), &events[2..3]);
        assert_eq!(schedule.remaining(), 1);
        assert!(schedule.due(4).is_empty());
        assert_eq!(schedule.due(5), &events[3..]);
        assert_eq!(schedule.remaining(), 0);
    }

    #[test]
    fn out_of_order_events_are_released_with_the_next_batch() {
        let events = [focus(3), focus(1)];
        let mut schedule = InputSchedule::new(&events);

        assert!(schedule.due(2).is_empty());
        assert_eq!(schedule.due(3), &events[..]);
    }
}
