//! Storage trait for the scheduling core's collaborator-side persistence.

use std::sync::Arc;

use crate::core::card::Card;
use crate::core::review::ReviewEvent;
use crate::core::session::StudySession;
use crate::error::Result;
use crate::progress::companion::Companion;
use crate::progress::tracker::UserProgress;
use crate::service::{CloseOutcome, ReviewOutcome};

/// Persistent storage for cards, sessions, progress, and the review log.
///
/// The single-record `get`/`put` methods exist for setup and inspection; the
/// scheduling writes go through [`StudyStore::apply_review`] and
/// [`StudyStore::apply_close`], which commit their records as one atomic unit
/// or fail without modifying anything.
pub trait StudyStore: Send + Sync {
    /// Retrieve a card by id. `Ok(None)` if it doesn't exist.
    fn get_card(&self, id: &str) -> Result<Option<Card>>;

    /// Create or replace a card.
    fn put_card(&self, card: &Card) -> Result<()>;

    /// List the cards in a deck.
    fn list_deck_cards(&self, deck_id: &str) -> Result<Vec<Card>>;

    /// Retrieve a session by id. `Ok(None)` if it doesn't exist.
    fn get_session(&self, id: &str) -> Result<Option<StudySession>>;

    /// Create or replace a session.
    fn put_session(&self, session: &StudySession) -> Result<()>;

    /// Retrieve a user's progress. `Ok(None)` if never recorded.
    fn get_progress(&self, user: &str) -> Result<Option<UserProgress>>;

    /// Create or replace a user's progress.
    fn put_progress(&self, progress: &UserProgress) -> Result<()>;

    /// Retrieve a user's companion. `Ok(None)` if never created.
    fn get_companion(&self, user: &str) -> Result<Option<Companion>>;

    /// Create or replace a user's companion.
    fn put_companion(&self, companion: &Companion) -> Result<()>;

    /// List the review events recorded for a session, oldest first.
    fn list_session_events(&self, session_id: &str) -> Result<Vec<ReviewEvent>>;

    /// Commit one review atomically: card, audit event, session counters,
    /// and (when present) user progress.
    ///
    /// `expected_card` and `expected_session` are the snapshots the review
    /// was computed from. If either record changed in the meantime the
    /// commit fails with `Conflict` and nothing is written; the caller
    /// should retry the whole submission against fresh state.
    fn apply_review(
        &self,
        expected_card: &Card,
        expected_session: &StudySession,
        outcome: &ReviewOutcome,
    ) -> Result<()>;

    /// Commit a session close atomically: the closed session and (when
    /// present) the companion update. Conflict semantics as for
    /// [`StudyStore::apply_review`].
    fn apply_close(&self, expected_session: &StudySession, outcome: &CloseOutcome) -> Result<()>;
}

/// Blanket implementation for shared references.
///
/// Allows `&T` where `T: StudyStore` is expected, so a command can borrow a
/// store without taking ownership.
impl<T: StudyStore + ?Sized> StudyStore for &T {
    fn get_card(&self, id: &str) -> Result<Option<Card>> {
        (**self).get_card(id)
    }

    fn put_card(&self, card: &Card) -> Result<()> {
        (**self).put_card(card)
    }

    fn list_deck_cards(&self, deck_id: &str) -> Result<Vec<Card>> {
        (**self).list_deck_cards(deck_id)
    }

    fn get_session(&self, id: &str) -> Result<Option<StudySession>> {
        (**self).get_session(id)
    }

    fn put_session(&self, session: &StudySession) -> Result<()> {
        (**self).put_session(session)
    }

    fn get_progress(&self, user: &str) -> Result<Option<UserProgress>> {
        (**self).get_progress(user)
    }

    fn put_progress(&self, progress: &UserProgress) -> Result<()> {
        (**self).put_progress(progress)
    }

    fn get_companion(&self, user: &str) -> Result<Option<Companion>> {
        (**self).get_companion(user)
    }

    fn put_companion(&self, companion: &Companion) -> Result<()> {
        (**self).put_companion(companion)
    }

    fn list_session_events(&self, session_id: &str) -> Result<Vec<ReviewEvent>> {
        (**self).list_session_events(session_id)
    }

    fn apply_review(
        &self,
        expected_card: &Card,
        expected_session: &StudySession,
        outcome: &ReviewOutcome,
    ) -> Result<()> {
        (**self).apply_review(expected_card, expected_session, outcome)
    }

    fn apply_close(&self, expected_session: &StudySession, outcome: &CloseOutcome) -> Result<()> {
        (**self).apply_close(expected_session, outcome)
    }
}

/// Blanket implementation for Arc-wrapped stores.
///
/// Allows `Arc<T>` where `T: StudyStore` is expected, which keeps stores
/// shareable between tests and commands.
impl<T: StudyStore + ?Sized> StudyStore for Arc<T> {
    fn get_card(&self, id: &str) -> Result<Option<Card>> {
        (**self).get_card(id)
    }

    fn put_card(&self, card: &Card) -> Result<()> {
        (**self).put_card(card)
    }

    fn list_deck_cards(&self, deck_id: &str) -> Result<Vec<Card>> {
        (**self).list_deck_cards(deck_id)
    }

    fn get_session(&self, id: &str) -> Result<Option<StudySession>> {
        (**self).get_session(id)
    }

    fn put_session(&self, session: &StudySession) -> Result<()> {
        (**self).put_session(session)
    }

    fn get_progress(&self, user: &str) -> Result<Option<UserProgress>> {
        (**self).get_progress(user)
    }

    fn put_progress(&self, progress: &UserProgress) -> Result<()> {
        (**self).put_progress(progress)
    }

    fn get_companion(&self, user: &str) -> Result<Option<Companion>> {
        (**self).get_companion(user)
    }

    fn put_companion(&self, companion: &Companion) -> Result<()> {
        (**self).put_companion(companion)
    }

    fn list_session_events(&self, session_id: &str) -> Result<Vec<ReviewEvent>> {
        (**self).list_session_events(session_id)
    }

    fn apply_review(
        &self,
        expected_card: &Card,
        expected_session: &StudySession,
        outcome: &ReviewOutcome,
    ) -> Result<()> {
        (**self).apply_review(expected_card, expected_session, outcome)
    }

    fn apply_close(&self, expected_session: &StudySession, outcome: &CloseOutcome) -> Result<()> {
        (**self).apply_close(expected_session, outcome)
    }
}

/// Test utilities for StudyStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::card::Card;
    use crate::core::session::{SessionMode, StudySession};
    use crate::error::MnemoError;
    use crate::progress::companion::{Companion, PetType};
    use crate::service::StudyService;
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    /// Shared conformance test for StudyStore implementations.
    pub fn test_study_store_conformance<S: StudyStore>(store: &S) {
        let service = StudyService::default();

        // Seed a card, a session, progress, and a companion.
        let card = Card::new("card-1", "alice", "deck-1", "2 + 2", "4");
        let sibling = Card::new("card-2", "alice", "deck-1", "3 + 3", "6");
        let session = StudySession::start(
            "session-1",
            "alice",
            Some("deck-1".into()),
            SessionMode::Learning,
            now(),
        );
        let progress = crate::progress::tracker::UserProgress::new("alice");
        let companion = Companion::new("alice", PetType::Cat);

        assert!(store.get_card("card-1").unwrap().is_none());
        store.put_card(&card).unwrap();
        store.put_card(&sibling).unwrap();
        store.put_session(&session).unwrap();
        store.put_progress(&progress).unwrap();
        store.put_companion(&companion).unwrap();

        assert_eq!(store.get_card("card-1").unwrap().unwrap(), card);
        assert_eq!(store.get_session("session-1").unwrap().unwrap(), session);
        assert_eq!(store.get_progress("alice").unwrap().unwrap(), progress);
        assert_eq!(store.get_companion("alice").unwrap().unwrap(), companion);
        assert_eq!(store.list_deck_cards("deck-1").unwrap().len(), 2);
        assert!(store.list_deck_cards("deck-9").unwrap().is_empty());

        // Commit one review atomically.
        let outcome = service
            .submit_review(&card, &session, Some(&progress), 3, 2, now())
            .unwrap();
        store.apply_review(&card, &session, &outcome).unwrap();

        assert_eq!(store.get_card("card-1").unwrap().unwrap(), outcome.card);
        assert_eq!(
            store.get_session("session-1").unwrap().unwrap(),
            outcome.session
        );
        assert_eq!(
            store.get_progress("alice").unwrap().unwrap().total_points,
            3
        );
        let events = store.list_session_events("session-1").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], outcome.event);

        // Replaying against the stale snapshots must conflict and change
        // nothing.
        let before_card = store.get_card("card-1").unwrap().unwrap();
        let err = store.apply_review(&card, &session, &outcome).unwrap_err();
        assert!(matches!(err, MnemoError::Conflict { .. }));
        assert_eq!(store.get_card("card-1").unwrap().unwrap(), before_card);
        assert_eq!(store.list_session_events("session-1").unwrap().len(), 1);

        // Close against the fresh session snapshot.
        let fresh_session = store.get_session("session-1").unwrap().unwrap();
        let fresh_companion = store.get_companion("alice").unwrap().unwrap();
        let close = service
            .close_session(&fresh_session, Some(&fresh_companion), now())
            .unwrap();
        store.apply_close(&fresh_session, &close).unwrap();

        let stored = store.get_session("session-1").unwrap().unwrap();
        assert!(stored.is_closed());
        let stored_companion = store.get_companion("alice").unwrap().unwrap();
        assert!(stored_companion.xp > 0);

        // Closing again conflicts on the stale snapshot.
        let err = store.apply_close(&fresh_session, &close).unwrap_err();
        assert!(matches!(err, MnemoError::Conflict { .. }));
    }
}
