//! In-memory study storage.
//!
//! Thread-safe implementation backed by `RwLock<StudyState>`, primarily for
//! unit tests and embedding. Every transactional write holds the write lock
//! across check and apply, which is what makes the triple write atomic.

use std::sync::RwLock;

use crate::core::card::Card;
use crate::core::review::ReviewEvent;
use crate::core::session::StudySession;
use crate::error::Result;
use crate::progress::companion::Companion;
use crate::progress::tracker::UserProgress;
use crate::service::{CloseOutcome, ReviewOutcome};
use crate::storage::state::StudyState;
use crate::storage::StudyStore;

/// In-memory study store.
#[derive(Debug, Default)]
pub struct MemoryStudyStore {
    state: RwLock<StudyState>,
}

impl MemoryStudyStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of review events recorded across all sessions.
    pub fn event_count(&self) -> usize {
        self.state.read().unwrap().events.len()
    }

    /// Clear all stored state.
    pub fn clear(&self) {
        *self.state.write().unwrap() = StudyState::default();
    }
}

impl StudyStore for MemoryStudyStore {
    fn get_card(&self, id: &str) -> Result<Option<Card>> {
        Ok(self.state.read().unwrap().cards.get(id).cloned())
    }

    fn put_card(&self, card: &Card) -> Result<()> {
        self.state
            .write()
            .unwrap()
            .cards
            .insert(card.id.clone(), card.clone());
        Ok(())
    }

    fn list_deck_cards(&self, deck_id: &str) -> Result<Vec<Card>> {
        let state = self.state.read().unwrap();
        let mut cards: Vec<Card> = state
            .cards
            .values()
            .filter(|c| c.deck_id == deck_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(cards)
    }

    fn get_session(&self, id: &str) -> Result<Option<StudySession>> {
        Ok(self.state.read().unwrap().sessions.get(id).cloned())
    }

    fn put_session(&self, session: &StudySession) -> Result<()> {
        self.state
            .write()
            .unwrap()
            .sessions
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn get_progress(&self, user: &str) -> Result<Option<UserProgress>> {
        Ok(self.state.read().unwrap().progress.get(user).cloned())
    }

    fn put_progress(&self, progress: &UserProgress) -> Result<()> {
        self.state
            .write()
            .unwrap()
            .progress
            .insert(progress.user.clone(), progress.clone());
        Ok(())
    }

    fn get_companion(&self, user: &str) -> Result<Option<Companion>> {
        Ok(self.state.read().unwrap().companions.get(user).cloned())
    }

    fn put_companion(&self, companion: &Companion) -> Result<()> {
        self.state
            .write()
            .unwrap()
            .companions
            .insert(companion.user.clone(), companion.clone());
        Ok(())
    }

    fn list_session_events(&self, session_id: &str) -> Result<Vec<ReviewEvent>> {
        let state = self.state.read().unwrap();
        Ok(state
            .events
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect())
    }

    fn apply_review(
        &self,
        expected_card: &Card,
        expected_session: &StudySession,
        outcome: &ReviewOutcome,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.apply_review(expected_card, expected_session, outcome)
    }

    fn apply_close(&self, expected_session: &StudySession, outcome: &CloseOutcome) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.apply_close(expected_session, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_study_store_conformance;

    #[test]
    fn test_memory_store_conformance() {
        let store = MemoryStudyStore::new();
        test_study_store_conformance(&store);
    }

    #[test]
    fn test_store_usable_through_shared_reference() {
        let store = MemoryStudyStore::new();
        let by_ref: &MemoryStudyStore = &store;
        test_study_store_conformance(&by_ref);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStudyStore::new();
        store
            .put_card(&Card::new("card-1", "alice", "deck-1", "f", "b"))
            .unwrap();
        assert!(store.get_card("card-1").unwrap().is_some());

        store.clear();
        assert!(store.get_card("card-1").unwrap().is_none());
        assert_eq!(store.event_count(), 0);
    }

    #[test]
    fn test_list_deck_cards_is_sorted() {
        let store = MemoryStudyStore::new();
        for id in ["card-3", "card-1", "card-2"] {
            store
                .put_card(&Card::new(id, "alice", "deck-1", "f", "b"))
                .unwrap();
        }

        let ids: Vec<String> = store
            .list_deck_cards("deck-1")
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["card-1", "card-2", "card-3"]);
    }
}
