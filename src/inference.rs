use chrono::{DateTime, TimeDelta, Utc};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::card::{MemoryState, Rating, State};
use crate::config::ForgettingCurve;
use crate::model::{FSRS, Model};

pub(crate) const S_MIN: f64 = 0.01;
pub(crate) const S_MAX: f64 = 36500.0;
pub(crate) const D_MIN: f64 = 1.0;
pub(crate) const D_MAX: f64 = 10.0;
pub(crate) const FSRS5_DECAY: f64 = -0.5;

/// This is a slice for efficiency, but should always be 19 in length once
/// filled.
pub type Parameters = [f64];

pub static DEFAULT_PARAMETERS: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192, 1.01925,
    1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
];

/// The two quantities the model actually tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub stability: f64,
    pub difficulty: f64,
}

/// How long until a card is shown again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    /// A learning or relearning step.
    Minutes(u32),
    Days(u32),
}

impl Interval {
    pub fn to_duration(self) -> TimeDelta {
        match self {
            Interval::Minutes(minutes) => TimeDelta::minutes(minutes.into()),
            Interval::Days(days) => TimeDelta::days(days.into()),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ItemState {
    pub memory: MemoryState,
    pub interval: Interval,
}

/// The outcome of every possible answer to a review.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStates {
    pub again: ItemState,
    pub hard: ItemState,
    pub good: ItemState,
    pub easy: ItemState,
}

impl NextStates {
    pub fn get(&self, rating: Rating) -> &ItemState {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }

    pub fn into_state(self, rating: Rating) -> ItemState {
        match rating {
            Rating::Again => self.again,
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }
}

/// Days until retrievability decays to `request_retention` on the default
/// power curve, unrounded.
pub fn next_interval(stability: f64, request_retention: f64) -> f64 {
    Model::new(&DEFAULT_PARAMETERS, ForgettingCurve::Power)
        .next_interval(stability, request_retention)
}

/// Whole days between the last review and `now`. A missing last review or a
/// clock that went backwards both count as zero.
fn elapsed_days(last_review: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    last_review.map_or(0, |last| {
        (now - last).num_days().clamp(0, u32::MAX.into()) as u32
    })
}

/// Delay for a card landing on `step` of a learning phase, or `None` when the
/// phase has no steps configured. Hard repeats the current step; on step 0
/// it waits between the first and second step.
fn step_delay(steps: &[u32], step: usize, rating: Rating) -> Option<u32> {
    let &first = steps.first()?;
    let delay = match (rating, step) {
        (Rating::Hard, 0) => match steps.get(1) {
            Some(&second) => ((first as f64 + second as f64) / 2.0).round() as u32,
            None => (first as f64 * 1.5).round() as u32,
        },
        _ => steps[step.min(steps.len() - 1)],
    };
    Some(delay)
}

impl FSRS {
    /// Schedules a single answer. Equivalent to picking `rating` out of
    /// [`FSRS::next_states`].
    pub fn schedule(&self, state: &MemoryState, rating: Rating, now: DateTime<Utc>) -> MemoryState {
        self.next_state(state, rating, now).memory
    }

    /// Computes the outcome of every answer, so callers can preview intervals
    /// before the user picks one.
    pub fn next_states(&self, state: &MemoryState, now: DateTime<Utc>) -> NextStates {
        NextStates {
            again: self.next_state(state, Rating::Again, now),
            hard: self.next_state(state, Rating::Hard, now),
            good: self.next_state(state, Rating::Good, now),
            easy: self.next_state(state, Rating::Easy, now),
        }
    }

    /// Current probability of recall. Unlike scheduling, this uses fractional
    /// days so it keeps falling within a day.
    pub fn retrievability(&self, state: &MemoryState, now: DateTime<Utc>) -> f64 {
        let Some(last_review) = state.last_review else {
            return 1.0;
        };
        if state.is_new() {
            return 1.0;
        }
        let elapsed = ((now - last_review).num_milliseconds() as f64 / 86_400_000.0).max(0.0);
        self.model
            .forgetting_curve(elapsed, state.stability.clamp(S_MIN, S_MAX))
            .clamp(0.0, 1.0)
    }

    fn next_state(&self, state: &MemoryState, rating: Rating, now: DateTime<Utc>) -> ItemState {
        let delta_t = elapsed_days(state.last_review, now);
        let mut lapses = state.lapses;

        let (memory, retrievability, phase) = if state.is_new() {
            let phase = match rating {
                Rating::Again | Rating::Hard => State::Learning { step: 0 },
                Rating::Good | Rating::Easy => State::Review,
            };
            (self.model.step(delta_t, rating, None), 1.0, phase)
        } else {
            let last = Memory {
                stability: state.stability,
                difficulty: state.difficulty,
            };
            let retrievability = self
                .model
                .forgetting_curve(delta_t as f64, state.stability.clamp(S_MIN, S_MAX))
                .clamp(0.0, 1.0);
            let phase = match (state.state, rating) {
                (State::Review, Rating::Again) => {
                    lapses += 1;
                    State::Relearning { step: 0 }
                }
                (State::Learning { .. }, Rating::Again) => State::Learning { step: 0 },
                (State::Relearning { .. }, Rating::Again) => State::Relearning { step: 0 },
                (State::Learning { step }, Rating::Hard) => State::Learning { step },
                (State::Relearning { step }, Rating::Hard) => State::Relearning { step },
                _ => State::Review,
            };
            let memory = if state.state == State::Review {
                self.model.step_long_term(delta_t, rating, last)
            } else {
                self.model.step(delta_t, rating, Some(last))
            };
            (memory, retrievability, phase)
        };

        let delay = match phase {
            State::Learning { step } => step_delay(&self.config.learning_steps, step, rating),
            State::Relearning { step } => step_delay(&self.config.relearning_steps, step, rating),
            State::New | State::Review => None,
        };
        let interval = match delay {
            Some(minutes) => Interval::Minutes(minutes),
            None => Interval::Days(self.interval_days(memory.stability)),
        };

        trace!(
            "rated {rating} after {delta_t}d: {:?} -> {phase:?}, s={:.4} d={:.4} ivl={interval:?}",
            state.state, memory.stability, memory.difficulty
        );

        ItemState {
            memory: MemoryState {
                difficulty: memory.difficulty,
                stability: memory.stability,
                retrievability,
                reps: state.reps.saturating_add(1),
                lapses,
                last_review: Some(now),
                next_review: Some(
                    now.checked_add_signed(interval.to_duration())
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                ),
                state: phase,
            },
            interval,
        }
    }

    /// Rounded review interval in days, between 1 and the configured maximum.
    fn interval_days(&self, stability: f64) -> u32 {
        self.model
            .next_interval(stability, self.config.requested_retention)
            .round()
            .clamp(1.0, self.config.maximum_interval as f64) as u32
    }
}
