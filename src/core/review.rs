//! Immutable review-event records.
//!
//! Each submitted review produces exactly one event capturing the scheduling
//! decision: rating, timing, and the ease/interval values before and after.
//! Events are the only durable audit trail of scheduling decisions; they are
//! written atomically with the card and session updates (`storage`) and are
//! never mutated or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::card::{Card, Rating};

/// Schema version for review events.
///
/// Increment when the event shape changes in a breaking way.
pub const REVIEW_EVENT_SCHEMA_VERSION: u8 = 1;

/// An immutable record of one review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewEvent {
    /// Schema version for forward compatibility.
    pub v: u8,
    /// The card that was reviewed.
    pub card_id: String,
    /// The session the review belongs to.
    pub session_id: String,
    /// The learner's rating.
    pub rating: Rating,
    /// Seconds spent on the card.
    pub time_taken_secs: u32,
    /// Ease factor before the transition.
    pub ease_factor_before: f64,
    /// Ease factor after the transition.
    pub ease_factor_after: f64,
    /// Interval (days) before the transition.
    pub interval_before: u32,
    /// Interval (days) after the transition.
    pub interval_after: u32,
    /// When the review was submitted.
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewEvent {
    /// Record a review from the card snapshots on either side of the
    /// scheduler transition.
    ///
    /// For practice-mode reviews `before` and `after` are the same snapshot,
    /// which leaves the before/after columns equal by construction.
    pub fn record(
        session_id: impl Into<String>,
        before: &Card,
        after: &Card,
        rating: Rating,
        time_taken_secs: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            v: REVIEW_EVENT_SCHEMA_VERSION,
            card_id: after.id.clone(),
            session_id: session_id.into(),
            rating,
            time_taken_secs,
            ease_factor_before: before.ease_factor,
            ease_factor_after: after.ease_factor,
            interval_before: before.interval_days,
            interval_after: after.interval_days,
            reviewed_at: now,
        }
    }
}
