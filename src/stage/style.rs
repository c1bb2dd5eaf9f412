use serde::{Deserialize, Serialize};

pub const BLUR_THRESHOLD: u32 = 7;
pub const BLUR_PX: f64 = 4.0;
pub const PERSPECTIVE_PX: f64 = 1500.0;
pub const OVERLAY_Z_INDEX: i32 = 999;

/// Presentation parameters for the scene container and its balloons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageParams {
    /// Balloons stacked above this index are blurred
    pub blur_threshold: u32,
    pub blur_px: f64,
    pub perspective_px: f64,
    /// Stacking level of the full-viewport overlay
    pub overlay_z_index: i32,
}

impl Default for StageParams {
    fn default() -> Self {
        Self {
            blur_threshold: BLUR_THRESHOLD,
            blur_px: BLUR_PX,
            perspective_px: PERSPECTIVE_PX,
            overlay_z_index: OVERLAY_Z_INDEX,
        }
    }
}

/// Ordered CSS declarations applied to a scene container
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerStyle {
    pub declarations: Vec<(String, String)>,
}

impl ContainerStyle {
    /// Fixed, click-through overlay covering the viewport, viewed from bottom center
    pub fn overlay(params: &StageParams) -> Self {
        let mut style = Self::default();
        style
            .set("--perspective-origin-x", "50vw")
            .set("--perspective-origin-y", "100vh")
            .set("overflow", "hidden")
            .set("position", "fixed")
            .set("inset", "0")
            .set("z-index", &params.overlay_z_index.to_string())
            .set("display", "inline-block")
            .set("pointer-events", "none")
            .set("perspective", &format!("{}px", params.perspective_px))
            .set(
                "perspective-origin",
                "var(--perspective-origin-x) var(--perspective-origin-y)",
            )
            .set("contain", "style layout paint");
        style
    }

    /// Styling for a caller-positioned container; leaves its box alone
    pub fn adopted(params: &StageParams) -> Self {
        let mut style = Self::default();
        style
            .set("overflow", "hidden")
            .set("perspective", &format!("{}px", params.perspective_px))
            .set("perspective-origin", "50% 100%")
            .set("contain", "style layout paint");
        style
    }

    pub fn set(&mut self, property: &str, value: &str) -> &mut Self {
        self.declarations.push((property.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }
}

/// Stacking order and depth-of-field for one balloon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStyle {
    pub z_index: u32,
    pub blur_px: Option<f64>,
}

impl DepthStyle {
    pub fn for_stacking(z_index: u32, params: &StageParams) -> Self {
        Self {
            z_index,
            blur_px: (z_index > params.blur_threshold).then_some(params.blur_px),
        }
    }

    /// CSS `filter` value, if any
    pub fn filter(&self) -> Option<String> {
        self.blur_px.map(|px| format!("blur({}px)", px))
    }
}
