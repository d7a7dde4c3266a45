use chrono::{Duration, Utc};
use nopressure_scheduler::{
    DeckOverview, FSRS, MemoryState, NextStates, Progress, Rating, SchedulerConfig, State,
};

fn setup_logging() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(log::LevelFilter::Trace)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn print_intervals(next_states: &NextStates) {
    for rating in [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy] {
        println!("{rating} interval: {:?}", next_states.get(rating).interval);
    }
}

fn schedule_new_card(fsrs: &FSRS) {
    // A freshly authored card has no review history
    let card = MemoryState::new();
    let now = Utc::now();

    let next_states = fsrs.next_states(&card, now);
    print_intervals(&next_states);

    // Assume the card was reviewed and the rating was `good`
    let card = next_states.into_state(Rating::Good).memory;

    println!("Next review due: {:?}", card.next_review);
    println!("Memory state: {card:?}");
}

fn schedule_existing_card(fsrs: &FSRS) {
    let now = Utc::now();
    // An existing card last reviewed 7 days ago
    let card = MemoryState {
        difficulty: 5.0,
        stability: 7.0,
        retrievability: 0.9,
        reps: 4,
        lapses: 0,
        last_review: Some(now - Duration::days(7)),
        next_review: Some(now),
        state: State::Review,
    };
    println!("Retrievability now: {:.3}", fsrs.retrievability(&card, now));

    let next_states = fsrs.next_states(&card, now);
    print_intervals(&next_states);

    // Assume the card was reviewed and the rating was `again`
    let card = next_states.into_state(Rating::Again).memory;

    println!("Next review due: {:?}", card.next_review);
    println!("Memory state: {card:?}");
    println!("Progress: {}", Progress::of(&card, now));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging()?;

    let fsrs = FSRS::new(SchedulerConfig {
        requested_retention: 0.9,
        ..Default::default()
    })?;

    println!("Scheduling a new card:");
    schedule_new_card(&fsrs);

    println!("\nScheduling an existing card:");
    schedule_existing_card(&fsrs);

    let deck = [MemoryState::new(), MemoryState::new()];
    println!("\nDeck overview: {:?}", DeckOverview::collect(&deck, Utc::now()));

    Ok(())
}
