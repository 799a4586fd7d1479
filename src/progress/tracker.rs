//! Per-user cumulative study progress.
//!
//! Tracks lifetime cards studied, points, and the current/longest daily
//! streak. Updated once per accepted non-practice review; practice sessions
//! bypass this tracker entirely.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::card::Rating;
use crate::progress::streak::{advance, GapPolicy, StreakState};

/// Points per derived user level.
pub const POINTS_PER_LEVEL: u32 = 100;

/// Cumulative study stats for one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProgress {
    /// Owning user.
    pub user: String,
    /// Lifetime count of reviews.
    pub total_cards_studied: u64,
    /// Lifetime points (sum of rating values).
    pub total_points: u64,
    /// Consecutive study days ending at `last_study_date`.
    pub current_streak: u32,
    /// Best streak ever reached.
    pub longest_streak: u32,
    /// Last calendar day with at least one review.
    pub last_study_date: Option<NaiveDate>,
}

impl UserProgress {
    /// Create an empty progress record for a user.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            total_cards_studied: 0,
            total_points: 0,
            current_streak: 0,
            longest_streak: 0,
            last_study_date: None,
        }
    }

    /// Fold one accepted review into the user's lifetime stats.
    ///
    /// `today` is the calendar date of the review in the collaborator's
    /// fixed reference time zone; deriving it consistently is what keeps
    /// streaks honest across midnight.
    pub fn record_review(&mut self, rating: Rating, today: NaiveDate) {
        self.total_cards_studied += 1;
        self.total_points += rating.value() as u64;

        let streak = advance(
            StreakState {
                current: self.current_streak,
                last_date: self.last_study_date,
            },
            today,
            today,
            GapPolicy::AdvanceAlways,
        );
        self.current_streak = streak.current;
        self.last_study_date = streak.last_date;
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }

    /// The user's level, always derived from points and never stored.
    pub fn level(&self) -> u64 {
        self.total_points / POINTS_PER_LEVEL as u64 + 1
    }
}
