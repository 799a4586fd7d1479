//! Close command: end a study session and feed the companion.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::progress::companion::{Companion, PetType};
use crate::service::StudyService;
use crate::storage::StudyStore;

/// Output format for the close command.
#[derive(Debug, Clone, Serialize)]
pub struct CloseOutput {
    /// Whether the session was closed.
    pub success: bool,
    /// The session id.
    pub session_id: String,
    /// Reviews submitted in the session.
    pub cards_studied: u32,
    /// Reviews rated correct.
    pub cards_correct: u32,
    /// Points earned in the session.
    pub points_earned: u32,
    /// Companion XP gained on close.
    pub xp_gained: u32,
    /// Companion level after the award.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companion_level: Option<u32>,
    /// Whether the companion leveled up.
    pub level_up: bool,
    /// Error message if the close failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CloseOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: String::new(),
            cards_studied: 0,
            cards_correct: 0,
            points_earned: 0,
            xp_gained: 0,
            companion_level: None,
            level_up: false,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match &self.error {
            Some(error) => format!("error: {}", error),
            None => {
                let mut line = format!(
                    "closed {}: {} studied, {} correct, {} pts, +{} xp",
                    self.session_id,
                    self.cards_studied,
                    self.cards_correct,
                    self.points_earned,
                    self.xp_gained
                );
                if self.level_up {
                    if let Some(level) = self.companion_level {
                        line.push_str(&format!(" (level up! now {})", level));
                    }
                }
                line
            }
        }
    }
}

/// The close command implementation.
pub struct CloseCommand<S: StudyStore> {
    store: S,
    service: StudyService,
}

impl<S: StudyStore> CloseCommand<S> {
    /// Create a new close command.
    pub fn new(store: S, service: StudyService) -> Self {
        Self { store, service }
    }

    /// Close `session_id` at `now`.
    pub fn run(&self, session_id: &str, now: DateTime<Utc>) -> CloseOutput {
        let session = match self.store.get_session(session_id) {
            Ok(Some(session)) => session,
            Ok(None) => {
                return CloseOutput::failure(format!("session not found: {}", session_id))
            }
            Err(err) => return CloseOutput::failure(err.to_string()),
        };

        // Companion is created lazily on first close that needs it.
        let companion = match self.store.get_companion(&session.owner) {
            Ok(companion) => {
                companion.unwrap_or_else(|| Companion::new(&session.owner, PetType::default()))
            }
            Err(err) => return CloseOutput::failure(err.to_string()),
        };

        let outcome = match self.service.close_session(&session, Some(&companion), now) {
            Ok(outcome) => outcome,
            Err(err) => return CloseOutput::failure(err.to_string()),
        };

        if let Err(err) = self.store.apply_close(&session, &outcome) {
            return CloseOutput::failure(err.to_string());
        }

        CloseOutput {
            success: true,
            session_id: outcome.session.id.clone(),
            cards_studied: outcome.session.cards_studied,
            cards_correct: outcome.session.cards_correct,
            points_earned: outcome.session.points_earned,
            xp_gained: outcome.xp_award.map(|a| a.gained).unwrap_or(0),
            companion_level: outcome.companion.as_ref().map(|c| c.level),
            level_up: outcome
                .xp_award
                .map(|a| a.leveled_up())
                .unwrap_or(false),
            error: None,
        }
    }
}
