use serde::{Deserialize, Serialize};

use crate::card::Rating;
use crate::error::{FSRSError, Result};
use crate::inference::Memory;
use crate::model::FSRS;

/// One entry of an imported review history, in chronological order.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct FSRSReview {
    /// 1-4
    pub rating: u8,
    /// The number of days that passed since the previous review. Ignored for
    /// the first entry.
    pub delta_t: u32,
}

impl FSRS {
    /// Replays a review history through the model, for cards that arrive with
    /// reviews recorded elsewhere.
    pub fn memory_state_from_history(&self, reviews: &[FSRSReview]) -> Result<Memory> {
        let (first, rest) = reviews.split_first().ok_or(FSRSError::NotEnoughData)?;
        let mut memory = self.model.step(0, Rating::try_from(first.rating)?, None);
        for review in rest {
            memory = self
                .model
                .step(review.delta_t, Rating::try_from(review.rating)?, Some(memory));
        }
        Ok(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestHelper;

    fn review(rating: u8, delta_t: u32) -> FSRSReview {
        FSRSReview { rating, delta_t }
    }

    #[test]
    fn test_memory_state_from_history() {
        let fsrs = FSRS::default();
        let memory = fsrs
            .memory_state_from_history(&[
                review(1, 0),
                review(3, 1),
                review(3, 3),
                review(3, 8),
                review(3, 21),
            ])
            .unwrap();
        [memory.stability, memory.difficulty].assert_approx_eq([47.8444908, 7.1223472]);
    }

    #[test]
    fn rejects_bad_history() {
        let fsrs = FSRS::default();
        assert_eq!(
            fsrs.memory_state_from_history(&[]),
            Err(FSRSError::NotEnoughData)
        );
        assert_eq!(
            fsrs.memory_state_from_history(&[review(3, 0), review(7, 2)]),
            Err(FSRSError::InvalidInput)
        );
    }

    #[test]
    fn deserializes_from_json() {
        let reviews: Vec<FSRSReview> =
            serde_json::from_str(r#"[{"rating":3,"delta_t":0},{"rating":1,"delta_t":4}]"#).unwrap();
        assert_eq!(reviews, [review(3, 0), review(1, 4)]);
    }
}
