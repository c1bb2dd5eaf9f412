//! Balloon release orchestration
//!
//! Plans the scene, mounts one balloon per trajectory, launches every motion
//! at the next frame and settles a single completion signal once all of them
//! have finished and the scene is torn down.

mod latch;
mod release;
mod signal;

pub use latch::FanIn;
pub use release::{release, SceneContainer};
pub use signal::CompletionSignal;
