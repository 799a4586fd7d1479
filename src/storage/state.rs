//! The persisted study document and its transactional mutations.
//!
//! Both store backends keep the same in-memory document and funnel every
//! multi-record write through the compare-and-apply helpers here, under one
//! lock. The expected "before" snapshots act as an optimistic concurrency
//! check: if a competing update changed a record between read and write, the
//! whole operation fails with `Conflict` and the document is untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::card::Card;
use crate::core::review::ReviewEvent;
use crate::core::session::StudySession;
use crate::error::{MnemoError, Result};
use crate::progress::companion::Companion;
use crate::progress::tracker::UserProgress;
use crate::service::{CloseOutcome, ReviewOutcome};

/// Everything the collaborator persists, as one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StudyState {
    /// Cards by id.
    pub cards: HashMap<String, Card>,
    /// Sessions by id.
    pub sessions: HashMap<String, StudySession>,
    /// User progress by user.
    pub progress: HashMap<String, UserProgress>,
    /// Companions by user.
    pub companions: HashMap<String, Companion>,
    /// Append-only review audit trail.
    pub events: Vec<ReviewEvent>,
}

impl StudyState {
    /// Verify the review's expected before-snapshots and apply the outcome.
    ///
    /// Either every record (card, event, session, progress) lands, or none
    /// do: all checks run before the first mutation.
    pub fn apply_review(
        &mut self,
        expected_card: &Card,
        expected_session: &StudySession,
        outcome: &ReviewOutcome,
    ) -> Result<()> {
        let stored_card = self
            .cards
            .get(&expected_card.id)
            .ok_or_else(|| MnemoError::not_found("card", &expected_card.id))?;
        if stored_card != expected_card {
            return Err(MnemoError::conflict(format!(
                "card {} changed since it was read",
                expected_card.id
            )));
        }

        let stored_session = self
            .sessions
            .get(&expected_session.id)
            .ok_or_else(|| MnemoError::not_found("session", &expected_session.id))?;
        if stored_session != expected_session {
            return Err(MnemoError::conflict(format!(
                "session {} changed since it was read",
                expected_session.id
            )));
        }

        self.cards.insert(outcome.card.id.clone(), outcome.card.clone());
        self.sessions
            .insert(outcome.session.id.clone(), outcome.session.clone());
        self.events.push(outcome.event.clone());
        if let Some(progress) = &outcome.progress {
            self.progress.insert(progress.user.clone(), progress.clone());
        }

        Ok(())
    }

    /// Verify the close's expected before-snapshot and apply the outcome.
    pub fn apply_close(
        &mut self,
        expected_session: &StudySession,
        outcome: &CloseOutcome,
    ) -> Result<()> {
        let stored_session = self
            .sessions
            .get(&expected_session.id)
            .ok_or_else(|| MnemoError::not_found("session", &expected_session.id))?;
        if stored_session != expected_session {
            return Err(MnemoError::conflict(format!(
                "session {} changed since it was read",
                expected_session.id
            )));
        }

        self.sessions
            .insert(outcome.session.id.clone(), outcome.session.clone());
        if let Some(companion) = &outcome.companion {
            self.companions
                .insert(companion.user.clone(), companion.clone());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionMode;
    use crate::service::StudyService;
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn seeded_state() -> (StudyState, Card, StudySession) {
        let card = Card::new("card-1", "alice", "deck-1", "f", "b");
        let session = StudySession::start(
            "session-1",
            "alice",
            Some("deck-1".into()),
            SessionMode::Learning,
            now(),
        );
        let mut state = StudyState::default();
        state.cards.insert(card.id.clone(), card.clone());
        state.sessions.insert(session.id.clone(), session.clone());
        (state, card, session)
    }

    #[test]
    fn test_apply_review_commits_all_records() {
        let (mut state, card, session) = seeded_state();
        let outcome = StudyService::default()
            .submit_review(&card, &session, Some(&UserProgress::new("alice")), 3, 2, now())
            .unwrap();

        state.apply_review(&card, &session, &outcome).unwrap();

        assert_eq!(state.cards["card-1"], outcome.card);
        assert_eq!(state.sessions["session-1"], outcome.session);
        assert_eq!(state.events.len(), 1);
        assert_eq!(state.progress["alice"].total_points, 3);
    }

    #[test]
    fn test_apply_review_conflict_leaves_state_untouched() {
        let (mut state, card, session) = seeded_state();
        let outcome = StudyService::default()
            .submit_review(&card, &session, None, 3, 2, now())
            .unwrap();

        // A competing update lands first.
        let competing = StudyService::default()
            .submit_review(&card, &session, None, 4, 1, now())
            .unwrap();
        state.apply_review(&card, &session, &competing).unwrap();
        let snapshot = state.clone();

        let err = state.apply_review(&card, &session, &outcome).unwrap_err();
        assert!(matches!(err, MnemoError::Conflict { .. }));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_apply_review_missing_card_is_not_found() {
        let (mut state, card, session) = seeded_state();
        state.cards.clear();
        let outcome = StudyService::default()
            .submit_review(&card, &session, None, 3, 2, now())
            .unwrap();

        let err = state.apply_review(&card, &session, &outcome).unwrap_err();
        assert!(matches!(err, MnemoError::NotFound { .. }));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_apply_close_conflict_detected() {
        let (mut state, card, session) = seeded_state();

        // The stored session gains a review the caller has not seen.
        let reviewed = StudyService::default()
            .submit_review(&card, &session, None, 3, 2, now())
            .unwrap();
        state.apply_review(&card, &session, &reviewed).unwrap();

        let close = StudyService::default()
            .close_session(&session, None, now())
            .unwrap();
        let err = state.apply_close(&session, &close).unwrap_err();
        assert!(matches!(err, MnemoError::Conflict { .. }));
        assert!(!state.sessions["session-1"].is_closed());
    }

    #[test]
    fn test_study_state_serialization_roundtrip() {
        let (mut state, card, session) = seeded_state();
        let outcome = StudyService::default()
            .submit_review(&card, &session, None, 4, 1, now())
            .unwrap();
        state.apply_review(&card, &session, &outcome).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let back: StudyState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
