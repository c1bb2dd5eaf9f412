//! Balloon motion
//!
//! Builds the keyframe track each balloon flies along and the easing
//! curves that pace it.

mod easing;
mod motion;

pub use easing::{ease, CubicBezier, Easing};
pub use motion::{FrameSample, Keyframe, Motion, MotionParams};
