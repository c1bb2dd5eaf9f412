use crate::error::EffectError;
use crate::layout::Size;
use crate::palette::ColorPair;

/// Size the balloon artwork is drawn at; sets its aspect ratio
pub const BALLOON_REFERENCE_SIZE: Size = Size::new(200.0, 300.0);

const SHINE_FILTER_ID: &str = "balloon-release-shine";

/// Produces balloon markup for a color pair and width
pub trait BalloonFactory {
    /// Reference balloon size; only the aspect ratio matters
    fn reference_size(&self) -> Size;

    /// Shared definitions every balloon relies on, injected once per release
    fn definitions(&self) -> String;

    fn balloon(&self, colors: &ColorPair, width: f64) -> Result<String, EffectError>;
}

/// Inline SVG balloons with a blurred highlight
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBalloonFactory;

impl BalloonFactory for SvgBalloonFactory {
    fn reference_size(&self) -> Size {
        BALLOON_REFERENCE_SIZE
    }

    fn definitions(&self) -> String {
        format!(
            concat!(
                r#"<svg width="0" height="0" style="position:absolute" aria-hidden="true">"#,
                r#"<defs><filter id="{id}" x="-50%" y="-50%" width="200%" height="200%">"#,
                r#"<feGaussianBlur in="SourceGraphic" stdDeviation="8"/>"#,
                r#"</filter></defs></svg>"#
            ),
            id = SHINE_FILTER_ID
        )
    }

    fn balloon(&self, colors: &ColorPair, width: f64) -> Result<String, EffectError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(EffectError::Factory(format!("invalid balloon width {}", width)));
        }
        // Colors end up inside attributes, so re-check them here
        let colors = ColorPair::new(&colors.accent, &colors.primary)
            .map_err(|e| EffectError::Factory(e.to_string()))?;
        let height = width * BALLOON_REFERENCE_SIZE.height / BALLOON_REFERENCE_SIZE.width;

        Ok(format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 300" "#,
                r#"width="{width}" height="{height}" style="display:block;overflow:visible">"#,
                r#"<path d="M100 300 C90 262 114 236 100 200" stroke="{primary}" "#,
                r#"stroke-width="2" fill="none" opacity="0.6"/>"#,
                r#"<path d="M91 202 L109 202 L100 188 Z" fill="{primary}"/>"#,
                r#"<ellipse cx="100" cy="96" rx="90" ry="96" fill="{primary}"/>"#,
                r#"<ellipse cx="68" cy="58" rx="26" ry="38" fill="{accent}" "#,
                r#"filter="url(#{filter})"/>"#,
                r#"</svg>"#
            ),
            width = width,
            height = height,
            primary = colors.primary,
            accent = colors.accent,
            filter = SHINE_FILTER_ID,
        ))
    }
}
