//! Core scheduling types for mnemo.
//!
//! This module contains the card entity, the SM-2 variant transition, the
//! immutable review-event record, and the study-session counters.

pub mod card;
pub mod review;
pub mod scheduler;
pub mod session;

pub use card::{Card, Rating, DEFAULT_EASE_FACTOR, MAX_EASE_FACTOR, MIN_EASE_FACTOR};
pub use review::{ReviewEvent, REVIEW_EVENT_SCHEMA_VERSION};
pub use scheduler::{review, SchedulerParams};
pub use session::{SessionMode, StudySession};
