pub mod accumulate;
pub mod extract;
pub mod followers;
pub mod stats;
pub mod thread;

pub use followers::{FollowerPipeline, FollowerRunOutcome};
pub use stats::RunStats;
pub use thread::{ThreadPipeline, ThreadRunOutcome};
