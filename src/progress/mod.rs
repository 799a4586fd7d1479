//! Progress tracking for mnemo.
//!
//! Two independently-keyed subsystems share one daily-streak abstraction:
//! per-user cumulative study stats (driven by individual reviews) and the
//! cosmetic study companion (driven by session completion).

pub mod companion;
pub mod streak;
pub mod tracker;

pub use companion::{Companion, PetType, XpAward, XP_PER_LEVEL};
pub use streak::{advance as advance_streak, GapPolicy, StreakState};
pub use tracker::{UserProgress, POINTS_PER_LEVEL};
