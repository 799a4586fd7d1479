//! CLI commands for mnemo.
//!
//! Each command pairs an Options struct with a serializable Output that can
//! render itself as text or JSON. Commands are generic over the store so
//! tests run them against `MemoryStudyStore`.

pub mod close;
pub mod quiz_cmd;
pub mod review_cmd;
pub mod start;
pub mod stats;

pub use close::CloseCommand;
pub use quiz_cmd::QuizCommand;
pub use review_cmd::ReviewCommand;
pub use start::StartCommand;
pub use stats::StatsCommand;
