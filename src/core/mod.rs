pub mod clock;
pub mod config;
pub mod error;
pub mod timer;
pub mod types;

pub use clock::SimClock;
pub use config::EngineConfig;
pub use error::{QatraError, Result};
pub use timer::{TimerId, TimerQueue};
