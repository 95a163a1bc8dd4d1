use crate::form::Field;
use crate::map::GeoError;
use crate::types::{Coords, WorkoutType};
use std::collections::VecDeque;
use std::time::Duration;

/// Delay of each step of the form's closing transition.
pub const FORM_TRANSITION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PositionFound(Coords),
    PositionFailed(GeoError),
    MapClicked(Coords),
    FieldEdited(Field, String),
    TypeChanged(WorkoutType),
    FormSubmitted,
    EscapePressed,
    /// `data-id` of the closest list entry, if the click landed in one.
    ListClicked(Option<String>),
    Reset,

    CollapseForm,
    RestoreFormLayout,
    /// Index into the app's workout sequence.
    RenderWorkout(usize),
}

#[derive(Debug)]
struct Timer {
    due: Duration,
    seq: u64,
    event: Event,
}

/// Single-threaded event queue with deferred events on a virtual clock.
///
/// Deferred events can't be cancelled.
#[derive(Debug, Default)]
pub struct Runtime {
    queue: VecDeque<Event>,
    timers: Vec<Timer>,
    now: Duration,
    seq: u64,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn now(&self) -> Duration {
        self.now
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn defer(&mut self, delay: Duration, event: Event) {
        let due = self.now + delay;
        self.timers.push(Timer {
            due,
            seq: self.seq,
            event,
        });
        self.seq += 1;
    }

    /// Move the clock forward and queue every timer that came due.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;

        let now = self.now;
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = pending;

        due.sort_by_key(|t| (t.due, t.seq));
        self.queue.extend(due.into_iter().map(|t| t.event));
    }

    pub fn next_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Time until the earliest timer fires.
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.timers
            .iter()
            .map(|t| t.due.saturating_sub(self.now))
            .min()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.timers.is_empty()
    }
}
