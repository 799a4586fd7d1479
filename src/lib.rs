//! mnemo - spaced repetition scheduling core.
//!
//! mnemo schedules flashcard reviews with an SM-2 style algorithm: each
//! review rating moves a card's repetition count, ease factor, interval, and
//! due date, while sessions, per-user progress, and a cosmetic study
//! companion accumulate around the scheduling core. The core transitions are
//! pure functions over explicit time; persistence goes through a storage
//! trait whose review and close writes commit atomically.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod service;
pub mod storage;

pub use config::Config;
pub use core::{Card, Rating, ReviewEvent, SchedulerParams, SessionMode, StudySession};
pub use error::{MnemoError, Result};
pub use progress::{Companion, GapPolicy, PetType, UserProgress, XpAward};
pub use service::{CloseOutcome, ReviewOutcome, StudyService};
pub use storage::{FileStudyStore, MemoryStudyStore, StudyState, StudyStore};

// CLI commands
pub use cli::{CloseCommand, QuizCommand, ReviewCommand, StartCommand, StatsCommand};
