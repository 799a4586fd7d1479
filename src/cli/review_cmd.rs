//! Review command: submit one recall rating for a card.
//!
//! Loads the card, session, and owner progress, runs the scheduling service,
//! and commits the outcome through the store's atomic review write.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::progress::tracker::UserProgress;
use crate::service::StudyService;
use crate::storage::StudyStore;

/// Options for the review command.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Seconds spent on the card.
    pub time_taken_secs: i64,
}

/// Output format for the review command.
///
/// Scheduling fields are present only on success; a rejected review carries
/// just the error.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutput {
    /// Whether the review was accepted.
    pub success: bool,
    /// The reviewed card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    /// New repetition count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
    /// New interval in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<u32>,
    /// New ease factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f64>,
    /// When the card is due next (RFC 3339), if scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<String>,
    /// Points awarded (zero in practice mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<u32>,
    /// The owner's streak after this review, when progress was updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_streak: Option<u32>,
    /// Error message if the review was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReviewOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            card_id: None,
            repetitions: None,
            interval_days: None,
            ease_factor: None,
            next_review: None,
            points_earned: None,
            current_streak: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match &self.error {
            Some(error) => format!("error: {}", error),
            None => {
                let due = self.next_review.as_deref().unwrap_or("unscheduled");
                format!(
                    "{}: interval {}d, ease {:.2}, due {} (+{} pts)",
                    self.card_id.as_deref().unwrap_or("?"),
                    self.interval_days.unwrap_or(0),
                    self.ease_factor.unwrap_or(0.0),
                    due,
                    self.points_earned.unwrap_or(0)
                )
            }
        }
    }
}

/// The review command implementation.
pub struct ReviewCommand<S: StudyStore> {
    store: S,
    service: StudyService,
}

impl<S: StudyStore> ReviewCommand<S> {
    /// Create a new review command.
    pub fn new(store: S, service: StudyService) -> Self {
        Self { store, service }
    }

    /// Submit a review of `card_id` within `session_id`.
    pub fn run(
        &self,
        card_id: &str,
        session_id: &str,
        rating: i64,
        options: &ReviewOptions,
        now: DateTime<Utc>,
    ) -> ReviewOutput {
        let card = match self.store.get_card(card_id) {
            Ok(Some(card)) => card,
            Ok(None) => return ReviewOutput::failure(format!("card not found: {}", card_id)),
            Err(err) => return ReviewOutput::failure(err.to_string()),
        };

        let session = match self.store.get_session(session_id) {
            Ok(Some(session)) => session,
            Ok(None) => {
                return ReviewOutput::failure(format!("session not found: {}", session_id))
            }
            Err(err) => return ReviewOutput::failure(err.to_string()),
        };

        let progress = match self.store.get_progress(&session.owner) {
            Ok(progress) => progress.unwrap_or_else(|| UserProgress::new(&session.owner)),
            Err(err) => return ReviewOutput::failure(err.to_string()),
        };

        let outcome = match self.service.submit_review(
            &card,
            &session,
            Some(&progress),
            rating,
            options.time_taken_secs,
            now,
        ) {
            Ok(outcome) => outcome,
            Err(err) => return ReviewOutput::failure(err.to_string()),
        };

        if let Err(err) = self.store.apply_review(&card, &session, &outcome) {
            return ReviewOutput::failure(err.to_string());
        }

        ReviewOutput {
            success: true,
            card_id: Some(outcome.card.id.clone()),
            repetitions: Some(outcome.card.repetitions),
            interval_days: Some(outcome.card.interval_days),
            ease_factor: Some(outcome.card.ease_factor),
            next_review: outcome.card.next_review.map(|t| t.to_rfc3339()),
            points_earned: Some(outcome.points_earned()),
            current_streak: outcome.progress.as_ref().map(|p| p.current_streak),
            error: None,
        }
    }
}
