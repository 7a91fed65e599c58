pub mod achievements;
pub mod activity;
pub mod daily;
pub mod leveling;
pub mod progress;
pub mod streak;

pub use progress::{AwardOutcome, LevelUp, ProgressRecord};
