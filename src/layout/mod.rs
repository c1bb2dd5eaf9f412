//! Layout planning for a balloon release
//!
//! Turns a scene size into a depth-sorted set of balloon trajectories.

mod planner;

pub use planner::{round_half_up, LayoutParams, LayoutPlan, LayoutPlanner, Scene, Size, Trajectory};
