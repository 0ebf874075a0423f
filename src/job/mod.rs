pub mod cancel;
pub mod controller;

pub use cancel::CancelFlag;
pub use controller::{JobController, JobEvent, JobHandle, JobState, RunSummary};
