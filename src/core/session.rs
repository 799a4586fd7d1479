//! Study sessions and per-session counters.
//!
//! A session is created at study start, its counters grow as reviews are
//! submitted, and it is closed exactly once. Practice-mode sessions record
//! reviews but never touch scheduling state or user-level progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::card::Rating;
use crate::error::{MnemoError, Result};

/// Session variant chosen at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Normal study: scheduling and progress are updated.
    #[default]
    Learning,
    /// Recall exercise only: cards and progress are left untouched.
    Practice,
}

/// One study session with its accumulated counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudySession {
    /// Unique session identifier.
    pub id: String,
    /// Owning user.
    pub owner: String,
    /// Deck being studied, if the session is scoped to one.
    pub deck_id: Option<String>,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session was closed, or `None` while open.
    pub ended_at: Option<DateTime<Utc>>,
    /// Number of reviews submitted in this session.
    pub cards_studied: u32,
    /// Reviews rated Good or better.
    pub cards_correct: u32,
    /// Points accumulated (sum of rating values; zero in practice mode).
    pub points_earned: u32,
    /// Session mode.
    pub mode: SessionMode,
    /// Front/back swap flag. Orthogonal to scheduling.
    pub reversed: bool,
}

impl StudySession {
    /// Start a new session.
    pub fn start(
        id: impl Into<String>,
        owner: impl Into<String>,
        deck_id: Option<String>,
        mode: SessionMode,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            deck_id,
            started_at,
            ended_at: None,
            cards_studied: 0,
            cards_correct: 0,
            points_earned: 0,
            mode,
            reversed: false,
        }
    }

    /// Mark the session as reversed (answer shown first).
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// Whether this is a practice session.
    pub fn is_practice(&self) -> bool {
        self.mode == SessionMode::Practice
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Fold one accepted review into the session counters.
    ///
    /// Practice-mode reviews count toward the studied/correct tallies but
    /// award zero points.
    pub fn apply_review(&mut self, rating: Rating) {
        self.cards_studied += 1;
        if rating.is_correct() {
            self.cards_correct += 1;
        }
        if !self.is_practice() {
            self.points_earned += rating.value();
        }
    }

    /// Fraction of reviews rated correct, 0.0 for an empty session.
    pub fn accuracy(&self) -> f64 {
        if self.cards_studied == 0 {
            return 0.0;
        }
        self.cards_correct as f64 / self.cards_studied as f64
    }

    /// Close the session, setting `ended_at` exactly once.
    ///
    /// Closing an already-closed session is an error.
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.is_closed() {
            return Err(MnemoError::invalid_input(format!(
                "session {} is already closed",
                self.id
            )));
        }
        self.ended_at = Some(now);
        Ok(())
    }
}
