use crate::animation::Motion;
use crate::error::EffectError;
use crate::layout::Scene;
use super::style::{ContainerStyle, DepthStyle};

/// Element tree and timing primitives a release runs against.
///
/// All calls happen on one thread. Callbacks handed to [`request_frame`] and
/// [`play`] run later from the host's own event loop, never re-entrantly
/// from inside the call that registered them.
///
/// [`request_frame`]: SceneHost::request_frame
/// [`play`]: SceneHost::play
pub trait SceneHost: Clone + 'static {
    type Container: Clone + 'static;
    type Element: Clone + 'static;

    /// Size of the whole viewport
    fn viewport(&self) -> Result<Scene, EffectError>;

    /// Create a styled overlay and attach it to the document root
    fn create_overlay(&self, style: &ContainerStyle) -> Result<Self::Container, EffectError>;

    /// Style a caller-supplied container and measure its box
    fn prepare_container(
        &self,
        container: &Self::Container,
        style: &ContainerStyle,
    ) -> Result<Scene, EffectError>;

    /// Append the shared definitions (filters) balloons reference
    fn append_definitions(
        &self,
        container: &Self::Container,
        markup: &str,
    ) -> Result<Self::Element, EffectError>;

    /// Append one balloon, positioned at the container's top-left origin
    fn append_balloon(
        &self,
        container: &Self::Container,
        markup: &str,
    ) -> Result<Self::Element, EffectError>;

    fn apply_depth(&self, element: &Self::Element, depth: &DepthStyle) -> Result<(), EffectError>;

    /// Run `callback` at the next rendering frame
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), EffectError>;

    /// Start `motion` on `element`; `on_finish` runs once when it ends
    fn play(
        &self,
        element: &Self::Element,
        motion: &Motion,
        on_finish: Box<dyn FnOnce()>,
    ) -> Result<(), EffectError>;

    /// Detach an element; detaching twice is a no-op
    fn remove_element(&self, element: &Self::Element);

    fn remove_container(&self, container: &Self::Container);
}
