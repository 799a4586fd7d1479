//! SM-2 variant review scheduling.
//!
//! The transition is a pure function: (card snapshot, rating, now) in, new
//! card snapshot out. No I/O, no side effects, no clock reads; persistence of
//! the returned snapshot is the caller's concern.
//!
//! Algorithm (fixed, simplified SM-2 variant):
//! - Again: repetitions and interval reset to 0, the card is due again after
//!   a short lapse window, ease factor untouched.
//! - Hard/Good/Easy: interval ladder 1 day, then 6 days, then
//!   floor(interval * ease); repetitions increments; Hard nudges the ease
//!   factor down, Easy up, Good leaves it alone. Ease stays in [1.3, 2.5].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::card::{Card, Rating, MAX_EASE_FACTOR, MIN_EASE_FACTOR};

/// Tunable constants for the scheduler.
///
/// Defaults reproduce the standard behavior; overrides come from
/// configuration (`config::Config::scheduler`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerParams {
    /// Minutes until a lapsed card is due again.
    pub lapse_delay_minutes: u32,
    /// Interval after the first successful review.
    pub first_interval_days: u32,
    /// Interval after the second successful review.
    pub second_interval_days: u32,
    /// Ease adjustment applied by Hard (down) and Easy (up).
    pub ease_step: f64,
    /// Lower ease bound.
    pub min_ease: f64,
    /// Upper ease bound.
    pub max_ease: f64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            lapse_delay_minutes: 10,
            first_interval_days: 1,
            second_interval_days: 6,
            ease_step: 0.15,
            min_ease: MIN_EASE_FACTOR,
            max_ease: MAX_EASE_FACTOR,
        }
    }
}

/// Apply one review to a card, returning the rescheduled card.
///
/// Total over its input domain: every `Rating` maps to exactly one branch
/// and no input produces an error. Raw integer ratings must already have
/// been validated into a [`Rating`] by the caller.
pub fn review(card: &Card, params: &SchedulerParams, rating: Rating, now: DateTime<Utc>) -> Card {
    let mut next = card.clone();

    match rating {
        Rating::Again => {
            next.repetitions = 0;
            next.interval_days = 0;
            next.next_review = Some(now + Duration::minutes(params.lapse_delay_minutes as i64));
            // Ease factor is deliberately left unchanged on a lapse.
        }
        success => {
            next.interval_days = match next.repetitions {
                0 => params.first_interval_days,
                1 => params.second_interval_days,
                // Truncates toward zero, matching integer scheduling.
                _ => (next.interval_days as f64 * next.ease_factor) as u32,
            };
            next.repetitions += 1;
            next.next_review = Some(now + Duration::days(next.interval_days as i64));

            match success {
                Rating::Hard => {
                    next.ease_factor = (next.ease_factor - params.ease_step).max(params.min_ease);
                }
                Rating::Easy => {
                    next.ease_factor = (next.ease_factor + params.ease_step).min(params.max_ease);
                }
                _ => {}
            }
        }
    }

    next.last_reviewed = Some(now);
    next
}
