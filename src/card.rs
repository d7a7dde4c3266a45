use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::{FSRSError, Result};

/// The user's assessment of how well a card was recalled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumIter,
)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    pub fn as_f64(self) -> f64 {
        self as u8 as f64
    }

    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Rating {
    type Error = FSRSError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            _ => Err(FSRSError::InvalidInput),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating as u8
    }
}

/// Where a card sits in the review lifecycle. The learning phases carry the
/// index of the short-interval step the card is currently waiting on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    #[default]
    New,
    Learning {
        step: usize,
    },
    Review,
    Relearning {
        step: usize,
    },
}

/// Scheduling record of a single card.
///
/// The record is replaced wholesale after every review; the scheduler never
/// mutates one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub difficulty: f64,
    pub stability: f64,
    /// Recall probability at the moment of the last review, before it was
    /// answered. Use [`crate::FSRS::retrievability`] for the live value.
    pub retrievability: f64,
    pub reps: u32,
    pub lapses: u32,
    pub last_review: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub state: State,
}

impl MemoryState {
    /// State of a freshly authored card with no review history.
    pub fn new() -> Self {
        Self::default()
    }

    /// A card that has never been through the scheduler, or whose stored
    /// memory is unusable, is scheduled as new.
    pub fn is_new(&self) -> bool {
        self.reps == 0
            || self.state == State::New
            || !(self.stability.is_finite() && self.stability > 0.0)
    }
}
