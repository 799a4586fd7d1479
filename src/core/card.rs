//! Card entity and recall ratings.
//!
//! A card carries its own scheduling state: repetitions, ease factor,
//! interval, and review timestamps. The state is mutated exclusively through
//! the scheduler transition (`core::scheduler`) and the manual
//! suspend/unsuspend helpers here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MnemoError, Result};

/// Lower bound for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Upper bound for the ease factor.
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Ease factor assigned to a card that has never been reviewed.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// A flashcard with its scheduling state.
///
/// Invariants:
/// - `ease_factor` stays within [`MIN_EASE_FACTOR`, `MAX_EASE_FACTOR`]
///   after every scheduler transition.
/// - `repetitions` counts consecutive successful reviews since the last
///   lapse and resets to 0 exactly when a review fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    /// Unique card identifier.
    pub id: String,
    /// Owning user.
    pub owner: String,
    /// Deck the card belongs to.
    pub deck_id: String,
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: u32,
    /// Interval growth multiplier, bounded [1.3, 2.5].
    pub ease_factor: f64,
    /// Days until the next scheduled review. 0 means the card is in the
    /// lapse window and due again almost immediately.
    pub interval_days: u32,
    /// When the card is next due, or `None` for a never-studied card.
    pub next_review: Option<DateTime<Utc>>,
    /// When the card was last reviewed, or `None` for a never-studied card.
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Suspended cards are skipped when selecting due work.
    pub suspended: bool,
}

impl Card {
    /// Create a new, never-studied card.
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        deck_id: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            deck_id: deck_id.into(),
            front: front.into(),
            back: back.into(),
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 0,
            next_review: None,
            last_reviewed: None,
            suspended: false,
        }
    }

    /// Whether the card is due for review at `now`.
    ///
    /// Never-studied cards are always due. Suspended cards are never due;
    /// callers selecting due work must skip them.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        if self.suspended {
            return false;
        }
        match self.next_review {
            None => true,
            Some(due) => due <= now,
        }
    }

    /// Suspend the card, removing it from due-work selection.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Unsuspend the card.
    pub fn unsuspend(&mut self) {
        self.suspended = false;
    }
}

/// Learner's self-reported recall quality for one review.
///
/// Ratings arrive from the collaborator as raw integers; they are validated
/// once at the service boundary via [`Rating::try_from`], so everything past
/// that boundary works with the closed enum and is total over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Failed recall. Resets repetitions and schedules a short lapse window.
    Again,
    /// Recalled with difficulty. Lowers the ease factor.
    Hard,
    /// Recalled normally. Leaves the ease factor unchanged.
    Good,
    /// Recalled effortlessly. Raises the ease factor.
    Easy,
}

impl Rating {
    /// The wire value of the rating (1 through 4).
    pub fn value(&self) -> u32 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    /// Whether the review succeeded (anything but `Again`).
    pub fn is_success(&self) -> bool {
        !matches!(self, Rating::Again)
    }

    /// Whether the review counts as a correct answer (rating >= Good).
    pub fn is_correct(&self) -> bool {
        matches!(self, Rating::Good | Rating::Easy)
    }
}

impl TryFrom<i64> for Rating {
    type Error = MnemoError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(MnemoError::invalid_input(format!(
                "rating must be between 1 and 4, got {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        };
        write!(f, "{}", name)
    }
}
