use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::card::MemoryState;

/// Anything that carries a card's scheduling record. `None` means the card
/// has never been scheduled and counts as new.
pub trait HasMemoryState {
    fn memory_state(&self) -> Option<&MemoryState>;
}

impl HasMemoryState for MemoryState {
    fn memory_state(&self) -> Option<&MemoryState> {
        Some(self)
    }
}

impl HasMemoryState for Option<MemoryState> {
    fn memory_state(&self) -> Option<&MemoryState> {
        self.as_ref()
    }
}

impl<T: HasMemoryState + ?Sized> HasMemoryState for &T {
    fn memory_state(&self) -> Option<&MemoryState> {
        (**self).memory_state()
    }
}

pub fn is_due(state: &MemoryState, now: DateTime<Utc>) -> bool {
    state.reps == 0 || state.next_review.is_none_or(|next_review| next_review <= now)
}

fn card_is_due<T: HasMemoryState + ?Sized>(card: &T, now: DateTime<Utc>) -> bool {
    card.memory_state().is_none_or(|state| is_due(state, now))
}

/// Lazily keeps the cards that are due at `now`, in their original order.
pub fn due_cards<I>(cards: I, now: DateTime<Utc>) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    I::Item: HasMemoryState,
{
    cards.into_iter().filter(move |card| card_is_due(card, now))
}

/// Earliest next review first. Cards with no next review go last; ties keep
/// their relative order.
pub fn sort_by_due<T: HasMemoryState>(cards: &mut [T]) {
    let next_review = |card: &T| card.memory_state().and_then(|state| state.next_review);
    cards.sort_by(|a, b| match (next_review(a), next_review(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Stability, in days, above which a card that has been reviewed at least
/// [`MASTERED_MIN_REPS`] times counts as mastered.
pub const MASTERED_MIN_STABILITY: f64 = 10.0;
pub const MASTERED_MIN_REPS: u32 = 3;

/// Coarse label for where a card stands, as shown in card lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Progress {
    New,
    Learning,
    Due,
    Mastered,
}

impl Progress {
    pub fn of<T: HasMemoryState + ?Sized>(card: &T, now: DateTime<Utc>) -> Self {
        let Some(state) = card.memory_state() else {
            return Progress::New;
        };
        if state.reps == 0 {
            Progress::New
        } else if state.reps >= MASTERED_MIN_REPS && state.stability > MASTERED_MIN_STABILITY {
            Progress::Mastered
        } else if is_due(state, now) {
            Progress::Due
        } else {
            Progress::Learning
        }
    }
}

/// Per-deck counts. The due and new counts overlap, since new cards are always
/// due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOverview {
    pub total: usize,
    pub new: usize,
    pub due: usize,
    pub mastered: usize,
}

impl DeckOverview {
    pub fn collect<I>(cards: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator,
        I::Item: HasMemoryState,
    {
        cards.into_iter().fold(Self::default(), |mut overview, card| {
            overview.total += 1;
            if card_is_due(&card, now) {
                overview.due += 1;
            }
            match Progress::of(&card, now) {
                Progress::New => overview.new += 1,
                Progress::Mastered => overview.mastered += 1,
                Progress::Learning | Progress::Due => {}
            }
            overview
        })
    }

    pub fn mastery_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.mastered as f64 / self.total as f64
    }
}
