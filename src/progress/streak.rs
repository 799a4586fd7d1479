//! Daily streak advancement.
//!
//! Two subsystems keep a consecutive-study-day counter: user progress and the
//! study companion. Their calendar comparison is identical (same day: no
//! change; yesterday: extend; any longer gap: restart at 1) but they disagree
//! on what to do when the event date is not today. The divergence is
//! intentional and kept explicit via [`GapPolicy`].

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// How a streak treats an event whose date is not today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Advance or restart on any qualifying event, whatever its date
    /// (user progress: the review itself defines the study day).
    AdvanceAlways,
    /// Ignore events whose date is not today (companion: the date argument
    /// comes from the caller and stale dates must not move the streak).
    RequireToday,
}

/// A daily streak counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreakState {
    /// Consecutive days with at least one qualifying event.
    pub current: u32,
    /// The last day that counted toward the streak.
    pub last_date: Option<NaiveDate>,
}

impl StreakState {
    /// Create a streak counter with no history.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Advance a streak for an event on `event_date`, evaluated against `today`.
///
/// Returns the new streak state; the input is never modified. With
/// [`GapPolicy::RequireToday`], an event dated other than `today` leaves the
/// state untouched. Second and later events on an already-counted day are
/// always no-ops.
pub fn advance(
    state: StreakState,
    event_date: NaiveDate,
    today: NaiveDate,
    policy: GapPolicy,
) -> StreakState {
    if policy == GapPolicy::RequireToday && event_date != today {
        return state;
    }

    if state.last_date == Some(today) {
        return state;
    }

    let yesterday = today.checked_sub_days(Days::new(1));
    let current = if state.last_date.is_some() && state.last_date == yesterday {
        state.current + 1
    } else {
        1
    };

    StreakState {
        current,
        last_date: Some(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_first_event_starts_streak_at_one() {
        let state = advance(StreakState::new(), day(15), day(15), GapPolicy::AdvanceAlways);
        assert_eq!(state.current, 1);
        assert_eq!(state.last_date, Some(day(15)));
    }

    #[test]
    fn test_consecutive_day_extends_streak() {
        let state = StreakState {
            current: 4,
            last_date: Some(day(14)),
        };
        let state = advance(state, day(15), day(15), GapPolicy::AdvanceAlways);
        assert_eq!(state.current, 5);
        assert_eq!(state.last_date, Some(day(15)));
    }

    #[test]
    fn test_gap_restarts_streak() {
        let state = StreakState {
            current: 9,
            last_date: Some(day(12)),
        };
        let state = advance(state, day(15), day(15), GapPolicy::AdvanceAlways);
        assert_eq!(state.current, 1);
        assert_eq!(state.last_date, Some(day(15)));
    }

    #[test]
    fn test_second_event_same_day_is_noop() {
        let state = StreakState {
            current: 5,
            last_date: Some(day(15)),
        };
        for policy in [GapPolicy::AdvanceAlways, GapPolicy::RequireToday] {
            let after = advance(state, day(15), day(15), policy);
            assert_eq!(after, state);
        }
    }

    #[test]
    fn test_require_today_ignores_stale_dates() {
        let state = StreakState {
            current: 3,
            last_date: Some(day(14)),
        };

        // Yesterday's date arriving late must not move the streak.
        let after = advance(state, day(14), day(15), GapPolicy::RequireToday);
        assert_eq!(after, state);

        // Neither must a future date.
        let after = advance(state, day(16), day(15), GapPolicy::RequireToday);
        assert_eq!(after, state);

        // Today's date advances normally.
        let after = advance(state, day(15), day(15), GapPolicy::RequireToday);
        assert_eq!(after.current, 4);
    }

    #[test]
    fn test_advance_always_ignores_event_date() {
        let state = StreakState {
            current: 3,
            last_date: Some(day(14)),
        };
        // The event date is stale but the policy advances against today.
        let after = advance(state, day(10), day(15), GapPolicy::AdvanceAlways);
        assert_eq!(after.current, 4);
        assert_eq!(after.last_date, Some(day(15)));
    }

    #[test]
    fn test_month_boundary_counts_as_consecutive() {
        let last_of_march = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let first_of_april = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let state = StreakState {
            current: 7,
            last_date: Some(last_of_march),
        };
        let after = advance(state, first_of_april, first_of_april, GapPolicy::AdvanceAlways);
        assert_eq!(after.current, 8);
    }

    #[test]
    fn test_fresh_streak_after_single_missed_day() {
        let state = StreakState {
            current: 30,
            last_date: Some(day(13)),
        };
        let after = advance(state, day(15), day(15), GapPolicy::RequireToday);
        assert_eq!(after.current, 1);
    }
}
