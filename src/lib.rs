use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub mod animation;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod math;
pub mod orchestrator;
pub mod palette;
pub mod random;
pub mod stage;

pub use config::EffectConfig;
pub use error::EffectError;
pub use orchestrator::{release, CompletionSignal};
pub use palette::{ColorPair, Palette};

use random::MathRandom;
use stage::{DomHost, SvgBalloonFactory};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Configured balloon release exposed to JavaScript
#[wasm_bindgen]
pub struct Balloons {
    config: EffectConfig,
}

#[wasm_bindgen]
impl Balloons {
    /// Release with the default tuning
    #[wasm_bindgen(constructor)]
    pub fn new() -> Balloons {
        Self {
            config: EffectConfig::default(),
        }
    }

    /// Release with tuning overrides given as YAML
    #[wasm_bindgen(js_name = fromYaml)]
    pub fn from_yaml(yaml: &str) -> Result<Balloons, JsValue> {
        let config = EffectConfig::from_yaml(yaml)?;
        Ok(Self { config })
    }

    /// Release balloons into `container` (or a full-screen overlay).
    /// `palette` is an array of `[accent, primary]` hex color pairs.
    /// Resolves once every balloon is gone.
    #[wasm_bindgen]
    pub fn release(&self, container: Option<HtmlElement>, palette: Option<Array>) -> Promise {
        let palette = match palette.as_ref().map(palette_from_js).transpose() {
            Ok(palette) => palette,
            Err(err) => return Promise::reject(&err.into()),
        };
        let host = match DomHost::new() {
            Ok(host) => host,
            Err(err) => return Promise::reject(&err.into()),
        };

        let signal = release(
            &host,
            &SvgBalloonFactory,
            &mut MathRandom,
            &self.config,
            container,
            palette,
        );
        into_promise(&signal)
    }
}

impl Default for Balloons {
    fn default() -> Self {
        Self::new()
    }
}

/// Release balloons with the default tuning
#[wasm_bindgen]
pub fn balloons(container: Option<HtmlElement>, palette: Option<Array>) -> Promise {
    Balloons::new().release(container, palette)
}

fn palette_from_js(array: &Array) -> Result<Palette, EffectError> {
    let mut pairs = Vec::with_capacity(array.length() as usize);
    for entry in array.iter() {
        let pair = entry
            .dyn_into::<Array>()
            .map_err(|_| EffectError::Config("palette entries must be [accent, primary]".to_string()))?;
        let accent = pair.get(0).as_string();
        let primary = pair.get(1).as_string();
        match (accent, primary) {
            (Some(accent), Some(primary)) => pairs.push(ColorPair::new(&accent, &primary)?),
            _ => {
                return Err(EffectError::Config(
                    "palette colors must be strings".to_string(),
                ))
            }
        }
    }
    Palette::new(pairs)
}

fn into_promise(signal: &CompletionSignal) -> Promise {
    Promise::new(&mut |resolve, reject| {
        signal.on_settle(move |outcome| {
            let settled = match outcome {
                Ok(()) => resolve.call0(&JsValue::UNDEFINED),
                Err(err) => reject.call1(&JsValue::UNDEFINED, &err.into()),
            };
            if let Err(e) = settled {
                log::warn!("completion callback threw: {:?}", e);
            }
        });
    })
}
