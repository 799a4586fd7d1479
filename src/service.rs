//! Collaborator-facing operations.
//!
//! The service is the single choke point between the CRUD/API layer and the
//! scheduling core. It validates raw inputs (ratings, timing, ownership,
//! session lifecycle), runs the pure transitions, and hands back new
//! snapshots; persisting an outcome atomically is the store's job
//! (`storage::StudyStore`).
//!
//! Time is always an explicit parameter. The calendar "today" used for
//! streaks is derived from `now` in UTC, one fixed time zone, so streaks
//! cannot miscount across midnight in the caller's local zone.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::core::card::{Card, Rating};
use crate::core::review::ReviewEvent;
use crate::core::scheduler::{review, SchedulerParams};
use crate::core::session::StudySession;
use crate::error::{MnemoError, Result};
use crate::progress::companion::{Companion, XpAward};
use crate::progress::tracker::UserProgress;

pub use crate::quiz::{build_options, select_distractors};

/// Everything produced by one accepted review, to be persisted as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    /// The rescheduled card (unchanged in practice mode).
    pub card: Card,
    /// The immutable audit record.
    pub event: ReviewEvent,
    /// The session with updated counters.
    pub session: StudySession,
    /// Updated user progress, absent for practice sessions.
    pub progress: Option<UserProgress>,
}

impl ReviewOutcome {
    /// Points this review earned the user (zero in practice mode).
    pub fn points_earned(&self) -> u32 {
        if self.session.is_practice() {
            0
        } else {
            self.event.rating.value()
        }
    }
}

/// Everything produced by closing a session.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseOutcome {
    /// The closed session.
    pub session: StudySession,
    /// Updated companion, when one was supplied and the session studied
    /// at least one card.
    pub companion: Option<Companion>,
    /// The XP award, present exactly when `companion` is.
    pub xp_award: Option<XpAward>,
}

/// The scheduling service.
#[derive(Debug, Clone, Default)]
pub struct StudyService {
    params: SchedulerParams,
}

impl StudyService {
    /// Create a service with explicit scheduler parameters.
    pub fn new(params: SchedulerParams) -> Self {
        Self { params }
    }

    /// Create a service from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scheduler.clone())
    }

    /// The scheduler parameters in effect.
    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Submit one review.
    ///
    /// Validates the raw rating and timing, checks that the card belongs to
    /// the session's owner, reschedules the card, records the audit event,
    /// updates the session counters, and folds the review into user progress.
    /// Practice sessions skip the scheduler and the progress update: the card
    /// comes back unchanged and `progress` is `None`.
    ///
    /// The returned snapshots must be persisted together
    /// (`StudyStore::apply_review`); nothing is written here.
    pub fn submit_review(
        &self,
        card: &Card,
        session: &StudySession,
        progress: Option<&UserProgress>,
        rating: i64,
        time_taken_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        let rating = Rating::try_from(rating)?;

        if time_taken_secs < 0 {
            return Err(MnemoError::invalid_input(format!(
                "time_taken must be non-negative, got {}",
                time_taken_secs
            )));
        }

        if card.owner != session.owner {
            // Ownership mismatches surface as lookup failures, not
            // validation errors: the card does not exist for this owner.
            return Err(MnemoError::not_found("card", &card.id));
        }

        if session.is_closed() {
            return Err(MnemoError::invalid_input(format!(
                "session {} is already closed",
                session.id
            )));
        }

        let new_card = if session.is_practice() {
            card.clone()
        } else {
            review(card, &self.params, rating, now)
        };

        let event = ReviewEvent::record(
            &session.id,
            card,
            &new_card,
            rating,
            time_taken_secs as u32,
            now,
        );

        let mut new_session = session.clone();
        new_session.apply_review(rating);

        let new_progress = if session.is_practice() {
            None
        } else {
            progress.map(|p| {
                let mut p = p.clone();
                p.record_review(rating, now.date_naive());
                p
            })
        };

        tracing::debug!(
            card = %card.id,
            session = %session.id,
            %rating,
            interval = new_card.interval_days,
            "review accepted"
        );

        Ok(ReviewOutcome {
            card: new_card,
            event,
            session: new_session,
            progress: new_progress,
        })
    }

    /// Close a session and, when at least one card was studied, feed the
    /// companion its XP and streak update.
    ///
    /// Closing an already-closed session is an error. The XP carry loop and
    /// the level-up decision happen in one step (`Companion::add_xp`), so the
    /// returned snapshot is never observable mid-carry.
    pub fn close_session(
        &self,
        session: &StudySession,
        companion: Option<&Companion>,
        now: DateTime<Utc>,
    ) -> Result<CloseOutcome> {
        let mut closed = session.clone();
        closed.close(now)?;

        let (companion, xp_award) = match companion {
            Some(companion) if closed.cards_studied > 0 => {
                let mut companion = companion.clone();
                let award =
                    companion.award_session_xp(closed.cards_studied, closed.cards_correct);
                let today = now.date_naive();
                companion.update_streak(today, today);
                (Some(companion), Some(award))
            }
            _ => (None, None),
        };

        tracing::debug!(
            session = %closed.id,
            studied = closed.cards_studied,
            correct = closed.cards_correct,
            "session closed"
        );

        Ok(CloseOutcome {
            session: closed,
            companion,
            xp_award,
        })
    }
}
