//! Start command: open a new study session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::session::{SessionMode, StudySession};
use crate::storage::StudyStore;

/// Options for the start command.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    /// Deck to study, if scoped.
    pub deck_id: Option<String>,
    /// Open a practice session (no scheduling or progress changes).
    pub practice: bool,
    /// Show answers first.
    pub reversed: bool,
    /// Explicit session id; generated from the timestamp when absent.
    pub session_id: Option<String>,
}

/// Output format for the start command.
#[derive(Debug, Clone, Serialize)]
pub struct StartOutput {
    /// Whether the command succeeded.
    pub success: bool,
    /// The new session id.
    pub session_id: String,
    /// Session mode ("learning" or "practice").
    pub mode: String,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StartOutput {
    /// Create a successful output.
    pub fn success(session: &StudySession) -> Self {
        Self {
            success: true,
            session_id: session.id.clone(),
            mode: if session.is_practice() {
                "practice".into()
            } else {
                "learning".into()
            },
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: String::new(),
            mode: String::new(),
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match &self.error {
            Some(error) => format!("error: {}", error),
            None => format!("started {} session {}", self.mode, self.session_id),
        }
    }
}

/// The start command implementation.
pub struct StartCommand<S: StudyStore> {
    store: S,
}

impl<S: StudyStore> StartCommand<S> {
    /// Create a new start command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Open a session for `user` at `now`.
    pub fn run(&self, user: &str, options: &StartOptions, now: DateTime<Utc>) -> StartOutput {
        let id = options
            .session_id
            .clone()
            .unwrap_or_else(|| format!("session-{}", now.timestamp_millis()));

        let mode = if options.practice {
            SessionMode::Practice
        } else {
            SessionMode::Learning
        };

        let mut session = StudySession::start(id, user, options.deck_id.clone(), mode, now);
        if options.reversed {
            session = session.reversed();
        }

        match self.store.put_session(&session) {
            Ok(()) => StartOutput::success(&session),
            Err(err) => StartOutput::failure(err.to_string()),
        }
    }
}
