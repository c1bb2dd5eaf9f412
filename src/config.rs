//! Release configuration
//!
//! Defaults reproduce the tuned look; any subset can be overridden from YAML:
//!
//! ```yaml
//! layout:
//!   min_balloons: 10
//! stage:
//!   blur_px: 6
//! ```

use serde::{Deserialize, Serialize};
use crate::animation::MotionParams;
use crate::error::EffectError;
use crate::layout::LayoutParams;
use crate::stage::StageParams;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectConfig {
    pub layout: LayoutParams,
    pub motion: MotionParams,
    pub stage: StageParams,
}

impl EffectConfig {
    /// Parse from YAML string; missing fields keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, EffectError> {
        let config: EffectConfig = if yaml.trim().is_empty() {
            EffectConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| EffectError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EffectError> {
        if self.layout.min_balloons == 0 {
            return Err(EffectError::Config("layout.min_balloons must be at least 1".to_string()));
        }
        if self.motion.tilt_min_deg > self.motion.tilt_max_deg {
            return Err(EffectError::Config(
                "motion.tilt_min_deg exceeds motion.tilt_max_deg".to_string(),
            ));
        }
        let timings = [
            self.motion.duration_base_ms,
            self.motion.duration_jitter_ms,
            self.motion.duration_scale,
            self.motion.delay_step_ms,
        ];
        if timings.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(EffectError::Config("motion timings must be non-negative".to_string()));
        }
        Ok(())
    }
}
