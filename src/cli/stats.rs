//! Stats command: report a user's cumulative progress and companion.

use serde::Serialize;

use crate::storage::StudyStore;

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    /// Whether the lookup succeeded.
    pub success: bool,
    /// The user whose stats were requested.
    pub user: String,
    /// Lifetime reviews.
    pub total_cards_studied: u64,
    /// Lifetime points.
    pub total_points: u64,
    /// Derived user level.
    pub level: u64,
    /// Current daily streak.
    pub current_streak: u32,
    /// Best streak ever reached.
    pub longest_streak: u32,
    /// Companion summary, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companion: Option<CompanionStats>,
    /// Error message if the lookup failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Companion summary embedded in stats output.
#[derive(Debug, Clone, Serialize)]
pub struct CompanionStats {
    /// Cosmetic variant.
    pub pet_type: String,
    /// Companion level.
    pub level: u32,
    /// XP toward the next level.
    pub xp: u32,
    /// Companion streak in days.
    pub streak_days: u32,
}

impl StatsOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            user: String::new(),
            total_cards_studied: 0,
            total_points: 0,
            level: 0,
            current_streak: 0,
            longest_streak: 0,
            companion: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match &self.error {
            Some(error) => format!("error: {}", error),
            None => {
                let mut lines = vec![
                    format!("{} (level {})", self.user, self.level),
                    format!(
                        "  studied {} cards, {} points",
                        self.total_cards_studied, self.total_points
                    ),
                    format!(
                        "  streak {} days (best {})",
                        self.current_streak, self.longest_streak
                    ),
                ];
                if let Some(companion) = &self.companion {
                    lines.push(format!(
                        "  {} level {}, {} xp, {} day streak",
                        companion.pet_type, companion.level, companion.xp, companion.streak_days
                    ));
                }
                lines.join("\n")
            }
        }
    }
}

/// The stats command implementation.
pub struct StatsCommand<S: StudyStore> {
    store: S,
}

impl<S: StudyStore> StatsCommand<S> {
    /// Create a new stats command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Report stats for `user`. Users with no recorded progress get an
    /// all-zero report rather than an error.
    pub fn run(&self, user: &str) -> StatsOutput {
        let progress = match self.store.get_progress(user) {
            Ok(progress) => progress,
            Err(err) => return StatsOutput::failure(err.to_string()),
        };

        let companion = match self.store.get_companion(user) {
            Ok(companion) => companion,
            Err(err) => return StatsOutput::failure(err.to_string()),
        };

        let (studied, points, level, current, longest) = match &progress {
            Some(p) => (
                p.total_cards_studied,
                p.total_points,
                p.level(),
                p.current_streak,
                p.longest_streak,
            ),
            None => (0, 0, 1, 0, 0),
        };

        StatsOutput {
            success: true,
            user: user.to_string(),
            total_cards_studied: studied,
            total_points: points,
            level,
            current_streak: current,
            longest_streak: longest,
            companion: companion.map(|c| CompanionStats {
                pet_type: c.pet_type.to_string(),
                level: c.level,
                xp: c.xp,
                streak_days: c.streak_days,
            }),
            error: None,
        }
    }
}
