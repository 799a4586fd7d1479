//! Multiple-choice option building.
//!
//! A presentation helper with no persisted state: given a card's correct
//! answer and the answers of its deck siblings, sample wrong answers and
//! shuffle the final option set. Randomness is injected so tests can seed
//! their own generator.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Default number of distractors per question.
pub const DEFAULT_DISTRACTOR_COUNT: usize = 3;

/// Select up to `count` wrong answers for a question.
///
/// The correct answer and duplicates are excluded from the pool. When the
/// deduplicated pool is smaller than `count`, the result is padded by
/// resampling pool entries, so small decks still fill the option slots.
/// An empty pool yields an empty selection.
pub fn select_distractors<R: Rng + ?Sized>(
    correct: &str,
    siblings: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut pool: Vec<&String> = Vec::new();
    for answer in siblings {
        if answer == correct {
            continue;
        }
        if !pool.iter().any(|seen| *seen == answer) {
            pool.push(answer);
        }
    }

    pool.shuffle(rng);

    let mut distractors: Vec<String> = pool.iter().take(count).map(|s| (*s).clone()).collect();

    // Small decks: repeat pool entries rather than presenting short option
    // lists.
    while distractors.len() < count && !pool.is_empty() {
        if let Some(pick) = pool.choose(rng) {
            distractors.push((*pick).clone());
        }
    }

    distractors
}

/// Build the shuffled option set (correct answer plus distractors).
pub fn build_options<R: Rng + ?Sized>(
    correct: &str,
    siblings: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut options = select_distractors(correct, siblings, count, rng);
    options.push(correct.to_string());
    options.shuffle(rng);
    options
}
