//! File-based study storage.
//!
//! The whole study document lives in a single JSON file (`study.json` under
//! the mnemo data directory). Writes go through the temp-file + rename
//! pattern, so a commit is one atomic rename: a crash mid-write leaves the
//! previous document intact, and the multi-record review write can never be
//! observed half-applied. A process-wide mutex serializes writers; callers in
//! other processes are expected to coordinate externally.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::config::data_dir;
use crate::core::card::Card;
use crate::core::review::ReviewEvent;
use crate::core::session::StudySession;
use crate::error::{MnemoError, Result};
use crate::progress::companion::Companion;
use crate::progress::tracker::UserProgress;
use crate::service::{CloseOutcome, ReviewOutcome};
use crate::storage::state::StudyState;
use crate::storage::StudyStore;

/// File-backed study store.
#[derive(Debug)]
pub struct FileStudyStore {
    /// Path of the study document.
    path: PathBuf,
    /// Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl FileStudyStore {
    /// Create a store at the default location (`<data_dir>/study.json`).
    pub fn new() -> Result<Self> {
        let dir = data_dir().ok_or_else(|| {
            MnemoError::config("could not determine data directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a store under a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| MnemoError::storage(&dir, e))?;
        }
        Ok(Self {
            path: dir.join("study.json"),
            write_lock: Mutex::new(()),
        })
    }

    /// The path of the study document.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> Result<StudyState> {
        if !self.path.exists() {
            return Ok(StudyState::default());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| MnemoError::storage(&self.path, e))?;
        let state: StudyState = serde_json::from_str(&content)?;
        Ok(state)
    }

    fn atomic_write(&self, state: &StudyState) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(state)?;

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| MnemoError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| MnemoError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| MnemoError::storage(&temp_path, e))?;
        }

        // Rename is atomic on POSIX.
        fs::rename(&temp_path, &self.path).map_err(|e| MnemoError::storage(&self.path, e))?;
        Ok(())
    }

    fn mutate<F>(&self, mutation: F) -> Result<()>
    where
        F: FnOnce(&mut StudyState) -> Result<()>,
    {
        let _guard = self.write_lock.lock().unwrap();
        let mut state = self.load()?;
        mutation(&mut state)?;
        self.atomic_write(&state)
    }
}

impl StudyStore for FileStudyStore {
    fn get_card(&self, id: &str) -> Result<Option<Card>> {
        Ok(self.load()?.cards.get(id).cloned())
    }

    fn put_card(&self, card: &Card) -> Result<()> {
        self.mutate(|state| {
            state.cards.insert(card.id.clone(), card.clone());
            Ok(())
        })
    }

    fn list_deck_cards(&self, deck_id: &str) -> Result<Vec<Card>> {
        let state = self.load()?;
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
        Ok(self.load()?.sessions.get(id).cloned())
    }

    fn put_session(&self, session: &StudySession) -> Result<()> {
        self.mutate(|state| {
            state.sessions.insert(session.id.clone(), session.clone());
            Ok(())
        })
    }

    fn get_progress(&self, user: &str) -> Result<Option<UserProgress>> {
        Ok(self.load()?.progress.get(user).cloned())
    }

    fn put_progress(&self, progress: &UserProgress) -> Result<()> {
        self.mutate(|state| {
            state.progress.insert(progress.user.clone(), progress.clone());
            Ok(())
        })
    }

    fn get_companion(&self, user: &str) -> Result<Option<Companion>> {
        Ok(self.load()?.companions.get(user).cloned())
    }

    fn put_companion(&self, companion: &Companion) -> Result<()> {
        self.mutate(|state| {
            state
                .companions
                .insert(companion.user.clone(), companion.clone());
            Ok(())
        })
    }

    fn list_session_events(&self, session_id: &str) -> Result<Vec<ReviewEvent>> {
        let state = self.load()?;
        Ok(state
            .events
            .into_iter()
            .filter(|e| e.session_id == session_id)
            .collect())
    }

    fn apply_review(
        &self,
        expected_card: &Card,
        expected_session: &StudySession,
        outcome: &ReviewOutcome,
    ) -> Result<()> {
        self.mutate(|state| state.apply_review(expected_card, expected_session, outcome))
    }

    fn apply_close(&self, expected_session: &StudySession, outcome: &CloseOutcome) -> Result<()> {
        self.mutate(|state| state.apply_close(expected_session, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_study_store_conformance;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_conformance() {
        let temp = TempDir::new().unwrap();
        let store = FileStudyStore::with_dir(temp.path()).unwrap();
        test_study_store_conformance(&store);
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStudyStore::with_dir(temp.path()).unwrap();
        assert!(store.get_card("card-1").unwrap().is_none());
        assert!(store.list_deck_cards("deck-1").unwrap().is_empty());
    }

    #[test]
    fn test_state_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let card = Card::new("card-1", "alice", "deck-1", "f", "b");
        {
            let store = FileStudyStore::with_dir(temp.path()).unwrap();
            store.put_card(&card).unwrap();
        }

        let store = FileStudyStore::with_dir(temp.path()).unwrap();
        assert_eq!(store.get_card("card-1").unwrap().unwrap(), card);
    }

    #[test]
    fn test_corrupt_file_surfaces_serde_error() {
        let temp = TempDir::new().unwrap();
        let store = FileStudyStore::with_dir(temp.path()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        let err = store.get_card("card-1").unwrap_err();
        assert!(matches!(err, MnemoError::Serde { .. }));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp = TempDir::new().unwrap();
        let store = FileStudyStore::with_dir(temp.path()).unwrap();
        store
            .put_card(&Card::new("card-1", "alice", "deck-1", "f", "b"))
            .unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }
}
