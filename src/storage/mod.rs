//! Study storage for mnemo.
//!
//! Persistence for cards, sessions, progress, and the review audit trail,
//! with file-based and in-memory backends. The transactional write methods
//! on `StudyStore` are the atomic boundary the scheduling core requires.

pub mod file;
pub mod memory;
pub mod state;
pub mod traits;

pub use file::FileStudyStore;
pub use memory::MemoryStudyStore;
pub use state::StudyState;
pub use traits::StudyStore;
