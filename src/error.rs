use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced by a balloon release
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    #[error("invalid color '{0}': expected #rgb, #rgba, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("palette must contain at least one color pair")]
    EmptyPalette,

    #[error("config error: {0}")]
    Config(String),

    /// The balloon factory could not produce a visual
    #[error("balloon factory failed: {0}")]
    Factory(String),

    /// A browser primitive the effect needs is missing
    #[error("environment unavailable: {0}")]
    Environment(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl EffectError {
    /// Wrap a thrown JS value as a DOM failure
    pub fn dom(value: JsValue) -> Self {
        EffectError::Dom(describe_js(&value))
    }
}

impl From<EffectError> for JsValue {
    fn from(err: EffectError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
