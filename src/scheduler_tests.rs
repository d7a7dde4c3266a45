use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

use crate::test_helpers::TestHelper;
use crate::{
    FSRS, ForgettingCurve, Interval, MemoryState, Rating, SchedulerConfig, State, is_due,
};

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_735_689_600, 0).unwrap()
}

fn schedulers() -> [FSRS; 2] {
    [
        FSRS::default(),
        FSRS::new(SchedulerConfig {
            forgetting_curve: ForgettingCurve::Exponential,
            ..Default::default()
        })
        .unwrap(),
    ]
}

fn review_card(stability: f64) -> MemoryState {
    MemoryState {
        difficulty: 5.0,
        stability,
        retrievability: 0.9,
        reps: 4,
        lapses: 0,
        last_review: Some(t0()),
        next_review: Some(t0() + TimeDelta::days(10)),
        state: State::Review,
    }
}

fn assert_invariants(state: &MemoryState, fsrs: &FSRS, now: DateTime<Utc>) {
    assert!((1.0..=10.0).contains(&state.difficulty), "{state:?}");
    assert!(state.stability > 0.0, "{state:?}");
    assert!((0.0..=1.0).contains(&state.retrievability), "{state:?}");
    assert!((0.0..=1.0).contains(&fsrs.retrievability(state, now)), "{state:?}");
}

#[test]
fn scenario_new_card_rated_good() {
    let fsrs = FSRS::default();
    let state = fsrs.schedule(&MemoryState::new(), Rating::Good, t0());

    assert_eq!(state.reps, 1);
    assert_ne!(state.state, State::New);
    assert!(state.next_review.unwrap() > t0());
    assert!(state.stability > 0.0);
    assert_eq!(state.last_review, Some(t0()));
}

#[test]
fn scenario_review_card_lapses() {
    for fsrs in schedulers() {
        let card = review_card(10.0);
        let now = t0() + TimeDelta::days(10);
        [fsrs.retrievability(&card, now)].assert_approx_eq([0.9]);

        let state = fsrs.schedule(&card, Rating::Again, now);
        assert_eq!(state.lapses, card.lapses + 1);
        assert!(state.stability < 10.0);
        assert_eq!(state.state, State::Relearning { step: 0 });
        [state.retrievability].assert_approx_eq([0.9]);
    }
}

#[test]
fn scenario_review_card_rated_easy() {
    for fsrs in schedulers() {
        let card = review_card(10.0);
        let now = t0() + TimeDelta::days(10);
        let states = fsrs.next_states(&card, now);

        assert!(states.easy.memory.stability > 10.0);
        assert!(states.easy.memory.next_review > states.again.memory.next_review);
        assert!(states.easy.interval.to_duration() > states.again.interval.to_duration());
        assert_eq!(states.easy.memory.lapses, 0);
    }
}

#[test]
fn scenario_consecutive_reviews() {
    let fsrs = FSRS::default();
    let first = fsrs.schedule(&MemoryState::new(), Rating::Good, t0());
    let second_at = first.next_review.unwrap();
    let second = fsrs.schedule(&first, Rating::Good, second_at);
    let third_at = second.next_review.unwrap();
    let third = fsrs.schedule(&second, Rating::Hard, third_at);

    assert_eq!([first.reps, second.reps, third.reps], [1, 2, 3]);
    assert!(second.next_review.unwrap() > first.next_review.unwrap());
    assert!(third.next_review.unwrap() > second.next_review.unwrap());
    assert!(second.stability > first.stability);
}

#[test]
fn ratings_order_stability() {
    for fsrs in schedulers() {
        let phases = [
            State::Review,
            State::Learning { step: 0 },
            State::Learning { step: 1 },
            State::Relearning { step: 0 },
        ];
        for state in phases {
            for (days, stability) in
                [(0, 3.0), (1, 3.0), (5, 3.0), (10, 10.0), (40, 10.0), (400, 90.0)]
            {
                let card = MemoryState {
                    state,
                    ..review_card(stability)
                };
                let states = fsrs.next_states(&card, t0() + TimeDelta::days(days));

                assert!(states.easy.memory.stability >= states.good.memory.stability);
                assert!(states.good.memory.stability >= states.hard.memory.stability);
                assert!(states.again.memory.stability < stability, "{state:?} after {days}d");
            }
        }
    }
}

#[test]
fn same_day_review_success_never_shrinks_stability() {
    for fsrs in schedulers() {
        let card = review_card(10.0);
        for now in [
            t0(),
            t0() + TimeDelta::hours(12),
            t0() + TimeDelta::hours(23),
            t0() - TimeDelta::days(3),
        ] {
            let states = fsrs.next_states(&card, now);
            for rating in [Rating::Hard, Rating::Good, Rating::Easy] {
                let next = &states.get(rating).memory;
                assert!(next.stability >= card.stability, "{rating} at {now}");
                assert_eq!(next.state, State::Review);
            }
            if now >= t0() {
                assert!(states.hard.memory.next_review >= card.next_review);
            }
        }
    }
}

#[test]
fn retrievability_decays() {
    for fsrs in schedulers() {
        let card = review_card(7.5);
        let mut previous = fsrs.retrievability(&card, t0());
        assert_eq!(previous, 1.0);
        for hours in (6..=24 * 60).step_by(6) {
            let current = fsrs.retrievability(&card, t0() + TimeDelta::hours(hours));
            assert!(current < previous, "not decreasing at {hours}h");
            previous = current;
        }
        let at_stability = t0() + TimeDelta::hours(180);
        assert!((fsrs.retrievability(&card, at_stability) - 0.9).abs() < 1e-6);
    }
}

#[test]
fn new_card_is_due_whenever() {
    let card = MemoryState::new();
    for days in [-365, 0, 1, 10_000] {
        assert!(is_due(&card, t0() + TimeDelta::days(days)));
    }
}

#[test]
fn every_rating_has_an_outcome() {
    let fsrs = FSRS::default();
    let states = fsrs.next_states(&review_card(10.0), t0() + TimeDelta::days(3));
    for rating in Rating::iter() {
        assert_eq!(
            states.get(rating).memory,
            fsrs.schedule(&review_card(10.0), rating, t0() + TimeDelta::days(3))
        );
        assert_eq!(states.get(rating), &states.clone().into_state(rating));
    }
}

#[test]
fn seventeen_parameter_vector_schedules() {
    let fsrs = FSRS::new(SchedulerConfig {
        parameters: vec![
            0.4, 0.6, 2.4, 5.8, 4.93, 0.94, 0.86, 0.01, 1.49, 0.14, 0.94, 2.18, 0.05, 0.34, 1.26,
            0.29, 2.61,
        ],
        ..Default::default()
    })
    .unwrap();
    let state = fsrs.schedule(&MemoryState::new(), Rating::Easy, t0());
    assert_eq!(state.stability, 5.8);
    assert_eq!(state.next_review, Some(t0() + TimeDelta::days(6)));
}

#[test]
fn random_review_sequences_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let ratings = Rating::iter().collect::<Vec<_>>();
    for fsrs in schedulers() {
        for _ in 0..200 {
            let mut state = MemoryState::new();
            let mut now = t0();
            let mut reps = 0;
            for _ in 0..30 {
                let rating = ratings[rng.random_range(0..ratings.len())];
                let next = fsrs.schedule(&state, rating, now);
                reps += 1;
                assert_eq!(next.reps, reps);
                assert_invariants(&next, &fsrs, now);
                if rating != Rating::Again {
                    assert!(next.next_review.unwrap() > now);
                }
                let late = TimeDelta::hours(rng.random_range(-12..=24 * 20));
                now = (next.next_review.unwrap() + late).max(now);
                state = next;
            }
        }
    }
}

#[test]
fn corrupt_records_are_treated_as_new() {
    let fsrs = FSRS::default();
    let card = MemoryState {
        stability: 0.0,
        difficulty: 0.0,
        reps: 3,
        state: State::Review,
        last_review: Some(t0()),
        ..Default::default()
    };
    let fresh = fsrs.next_states(&MemoryState::new(), t0() + TimeDelta::days(2));
    let states = fsrs.next_states(&card, t0() + TimeDelta::days(2));
    assert_eq!(states.good.memory.stability, fresh.good.memory.stability);
    assert_eq!(states.good.memory.reps, 4);
    assert_eq!(states.good.interval, Interval::Days(3));
}
