mod card;
mod config;
mod dataset;
mod due;
mod error;
mod inference;
mod model;
mod parameter_clipper;
#[cfg(test)]
mod scheduler_tests;
#[cfg(test)]
mod test_helpers;

pub use card::{MemoryState, Rating, State};
pub use config::{ForgettingCurve, SchedulerConfig};
pub use dataset::FSRSReview;
pub use due::{
    DeckOverview, HasMemoryState, MASTERED_MIN_REPS, MASTERED_MIN_STABILITY, Progress, due_cards,
    is_due, sort_by_due,
};
pub use error::{FSRSError, Result};
pub use inference::{
    DEFAULT_PARAMETERS, Interval, ItemState, Memory, NextStates, Parameters, next_interval,
};
pub use model::FSRS;
