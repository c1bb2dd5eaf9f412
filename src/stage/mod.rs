//! Where balloons live
//!
//! [`SceneHost`] is the seam between the release logic and the element tree
//! it draws into. [`DomHost`] drives a browser document; [`HeadlessHost`]
//! keeps an in-memory tree with a manual clock.

mod dom;
mod factory;
mod headless;
mod host;
mod style;

pub use dom::DomHost;
pub use factory::{BalloonFactory, SvgBalloonFactory, BALLOON_REFERENCE_SIZE};
pub use headless::{HeadlessHost, HeadlessNode, NodeKind};
pub use host::SceneHost;
pub use style::{ContainerStyle, DepthStyle, StageParams};
