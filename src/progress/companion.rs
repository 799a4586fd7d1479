//! Study companion: a cosmetic leveling system driven by session completion.
//!
//! The companion is keyed independently of user progress. It gains XP when a
//! session closes, carrying overflow into level-ups, and keeps its own daily
//! streak with its own date policy (stale dates are ignored rather than
//! restarting the streak).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::progress::streak::{advance, GapPolicy, StreakState};

/// XP needed per companion level.
pub const XP_PER_LEVEL: u32 = 100;

/// Cosmetic companion variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PetType {
    #[default]
    Cat,
    Dragon,
    Robot,
}

impl std::fmt::Display for PetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PetType::Cat => "cat",
            PetType::Dragon => "dragon",
            PetType::Robot => "robot",
        };
        write!(f, "{}", name)
    }
}

/// Result of an XP award, computed in one step so callers observe the
/// level-up decision and the new totals together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    /// XP granted by this award.
    pub gained: u32,
    /// Levels gained from carrying overflow (0 when no level-up).
    pub levels_gained: u32,
}

impl XpAward {
    /// Whether the award produced at least one level-up.
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Per-user companion state.
///
/// Entry invariant: `xp < XP_PER_LEVEL` after every award (overflow always
/// carries into levels).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Companion {
    /// Owning user.
    pub user: String,
    /// Cosmetic variant.
    pub pet_type: PetType,
    /// Current level, starting at 1.
    pub level: u32,
    /// XP toward the next level, always below [`XP_PER_LEVEL`].
    pub xp: u32,
    /// Consecutive study days.
    pub streak_days: u32,
    /// Last day that counted toward the companion streak.
    pub last_streak_date: Option<NaiveDate>,
}

impl Companion {
    /// Create a fresh companion for a user.
    pub fn new(user: impl Into<String>, pet_type: PetType) -> Self {
        Self {
            user: user.into(),
            pet_type,
            level: 1,
            xp: 0,
            streak_days: 0,
            last_streak_date: None,
        }
    }

    /// Add raw XP, carrying overflow into level-ups.
    ///
    /// A single large award can produce several level-ups; the carry loop
    /// runs until the entry invariant `xp < XP_PER_LEVEL` holds again.
    pub fn add_xp(&mut self, amount: u32) -> XpAward {
        let mut levels_gained = 0;
        self.xp += amount;
        while self.xp >= XP_PER_LEVEL {
            self.xp -= XP_PER_LEVEL;
            self.level += 1;
            levels_gained += 1;
        }
        XpAward {
            gained: amount,
            levels_gained,
        }
    }

    /// Award XP for a completed session.
    ///
    /// `xp_gain = floor(cards_studied * (1 + accuracy))`, so a perfect
    /// session is worth double its card count. Sessions with no cards
    /// studied award nothing.
    pub fn award_session_xp(&mut self, cards_studied: u32, cards_correct: u32) -> XpAward {
        if cards_studied == 0 {
            return XpAward {
                gained: 0,
                levels_gained: 0,
            };
        }
        let accuracy = cards_correct as f64 / cards_studied as f64;
        let gain = (cards_studied as f64 * (1.0 + accuracy)) as u32;
        self.add_xp(gain)
    }

    /// Advance the companion streak for an event on `event_date`.
    ///
    /// Events dated other than `today` are ignored ([`GapPolicy::RequireToday`]).
    pub fn update_streak(&mut self, event_date: NaiveDate, today: NaiveDate) {
        let streak = advance(
            StreakState {
                current: self.streak_days,
                last_date: self.last_streak_date,
            },
            event_date,
            today,
            GapPolicy::RequireToday,
        );
        self.streak_days = streak.current;
        self.last_streak_date = streak.last_date;
    }
}
