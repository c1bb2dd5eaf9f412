use serde::{Deserialize, Serialize};
use super::easing::{ease, Easing};
use crate::layout::Trajectory;
use crate::math::Vec3;
use crate::random::RandomSource;

pub const TRAVEL_SCALE: f64 = 5.0;
pub const TILT_MIN_DEG: f64 = 8.0;
pub const TILT_MAX_DEG: f64 = 15.0;
pub const DURATION_BASE_MS: f64 = 5000.0;
pub const DURATION_JITTER_MS: f64 = 1000.0;
pub const DURATION_SCALE: f64 = 5.0;
pub const DELAY_STEP_MS: f64 = 200.0;
pub const MIDPOINT_OFFSET: f64 = 0.5;

/// Timing and sway parameters for balloon flights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Multiplier on the vertical target, so balloons clear the top edge
    pub travel_scale: f64,
    /// Sway angle range in degrees
    pub tilt_min_deg: f64,
    pub tilt_max_deg: f64,
    /// Duration is `(U * jitter + base) * scale`
    pub duration_base_ms: f64,
    pub duration_jitter_ms: f64,
    pub duration_scale: f64,
    /// Launch delay per stacking index
    pub delay_step_ms: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            travel_scale: TRAVEL_SCALE,
            tilt_min_deg: TILT_MIN_DEG,
            tilt_max_deg: TILT_MAX_DEG,
            duration_base_ms: DURATION_BASE_MS,
            duration_jitter_ms: DURATION_JITTER_MS,
            duration_scale: DURATION_SCALE,
            delay_step_ms: DELAY_STEP_MS,
        }
    }
}

/// One pose on a balloon's track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub translate: Vec3,
    pub rotate_deg: f64,
    pub opacity: f64,
    /// Explicit position on the track in [0, 1]; spaced evenly when absent
    pub offset: Option<f64>,
}

impl Keyframe {
    pub fn new(translate: Vec3, rotate_deg: f64) -> Self {
        Self {
            translate,
            rotate_deg,
            opacity: 1.0,
            offset: None,
        }
    }

    pub fn at(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// CSS transform; the balloon is centered horizontally on its x
    pub fn css_transform(&self) -> String {
        format!(
            "translate(-50%, 0%) translate3d({}px, {}px, {}px) rotate({}deg)",
            self.translate.x, self.translate.y, self.translate.z, self.rotate_deg
        )
    }
}

/// Interpolated pose at some instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub translate: Vec3,
    pub rotate_deg: f64,
    pub opacity: f64,
}

/// Time-bounded keyframe animation owned by one balloon
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub keyframes: Vec<Keyframe>,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub easing: Easing,
}

impl Motion {
    /// Build the flight for the balloon stacked at `z_index`
    pub fn for_balloon<R: RandomSource + ?Sized>(
        trajectory: &Trajectory,
        z_index: u32,
        params: &MotionParams,
        rng: &mut R,
    ) -> Self {
        let tilt = rng.range(params.tilt_min_deg, params.tilt_max_deg) * rng.sign();

        let start = trajectory.start();
        let end = Vec3::new(
            trajectory.target_x,
            trajectory.y + trajectory.target_y * params.travel_scale,
            trajectory.target_z,
        );

        // Sway one way, swing back through the midpoint, settle again
        let keyframes = vec![
            Keyframe::new(start, tilt),
            Keyframe::new(start.midpoint(&end), -tilt).at(MIDPOINT_OFFSET),
            Keyframe::new(end, tilt),
        ];

        let duration_ms = (rng.next_unit() * params.duration_jitter_ms + params.duration_base_ms)
            * params.duration_scale;
        let easing = Easing::ALL[rng.index(Easing::ALL.len())];

        Self {
            keyframes,
            duration_ms,
            delay_ms: z_index as f64 * params.delay_step_ms,
            easing,
        }
    }

    /// Time from launch request until the motion finishes
    pub fn total_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }

    /// Offsets of every keyframe with gaps filled in
    pub fn computed_offsets(&self) -> Vec<f64> {
        let n = self.keyframes.len();
        let mut offsets: Vec<Option<f64>> = self.keyframes.iter().map(|k| k.offset).collect();
        match n {
            0 => return Vec::new(),
            1 => {
                offsets[0].get_or_insert(1.0);
            }
            _ => {
                offsets[0].get_or_insert(0.0);
                offsets[n - 1].get_or_insert(1.0);
            }
        }

        let mut known = 0;
        for i in 1..n {
            if let Some(end) = offsets[i] {
                let start = offsets[known].unwrap_or(0.0);
                let span = (i - known) as f64;
                for (step, slot) in offsets[known + 1..i].iter_mut().enumerate() {
                    *slot = Some(start + (end - start) * (step + 1) as f64 / span);
                }
                known = i;
            }
        }

        offsets.into_iter().map(|o| o.unwrap_or(1.0)).collect()
    }

    /// Pose after `elapsed_ms` since launch; holds the first pose during the delay
    pub fn sample(&self, elapsed_ms: f64) -> FrameSample {
        let local = elapsed_ms - self.delay_ms;
        let linear = if self.duration_ms > 0.0 {
            local / self.duration_ms
        } else if local >= 0.0 {
            1.0
        } else {
            0.0
        };
        self.pose_at(ease(linear, self.easing))
    }

    /// Pose at eased track position `progress`
    pub fn pose_at(&self, progress: f64) -> FrameSample {
        let offsets = self.computed_offsets();
        let Some(first) = self.keyframes.first() else {
            return FrameSample {
                translate: Vec3::ZERO,
                rotate_deg: 0.0,
                opacity: 1.0,
            };
        };

        let mut from = (first, offsets[0]);
        for (frame, &offset) in self.keyframes.iter().zip(&offsets) {
            if progress <= offset {
                let (prev, prev_offset) = from;
                let span = offset - prev_offset;
                let t = if span > 0.0 {
                    ((progress - prev_offset) / span).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                return interpolate(prev, frame, t);
            }
            from = (frame, offset);
        }

        interpolate(from.0, from.0, 1.0)
    }
}

fn interpolate(a: &Keyframe, b: &Keyframe, t: f64) -> FrameSample {
    FrameSample {
        translate: a.translate.lerp(&b.translate, t),
        rotate_deg: a.rotate_deg + (b.rotate_deg - a.rotate_deg) * t,
        opacity: a.opacity + (b.opacity - a.opacity) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    fn trajectory() -> Trajectory {
        Trajectory {
            x: 200.0,
            y: 600.0,
            z: -40.0,
            target_x: 440.0,
            target_y: -600.0,
            target_z: -40.0,
        }
    }

    fn motion() -> Motion {
        // tilt magnitude, tilt sign, duration, easing
        let mut rng = SequenceRandom::new(vec![0.5, 0.9, 0.5, 0.7]);
        Motion::for_balloon(&trajectory(), 3, &MotionParams::default(), &mut rng)
    }

    #[test]
    fn test_keyframes() {
        let m = motion();
        assert_eq!(m.keyframes.len(), 3);

        let start = m.keyframes[0];
        assert_eq!(start.translate, Vec3::new(200.0, 600.0, -40.0));
        assert_eq!(start.rotate_deg, 11.5);
        assert_eq!(start.offset, None);

        let mid = m.keyframes[1];
        assert_eq!(mid.translate, Vec3::new(320.0, -900.0, -40.0));
        assert_eq!(mid.rotate_deg, -11.5);
        assert_eq!(mid.offset, Some(0.5));

        let end = m.keyframes[2];
        assert_eq!(end.translate, Vec3::new(440.0, -2400.0, -40.0));
        assert_eq!(end.rotate_deg, 11.5);

        assert!(m.keyframes.iter().all(|k| k.opacity == 1.0));
    }

    #[test]
    fn test_timing() {
        let m = motion();
        assert_eq!(m.duration_ms, 27500.0);
        assert_eq!(m.delay_ms, 600.0);
        assert_eq!(m.easing, Easing::CubicOut);
        assert_eq!(m.total_ms(), 28100.0);
    }

    #[test]
    fn test_negative_tilt_and_quint() {
        let mut rng = SequenceRandom::new(vec![0.0, 0.1, 0.0, 0.2]);
        let m = Motion::for_balloon(&trajectory(), 1, &MotionParams::default(), &mut rng);
        assert_eq!(m.keyframes[0].rotate_deg, -8.0);
        assert_eq!(m.keyframes[1].rotate_deg, 8.0);
        assert_eq!(m.duration_ms, 25000.0);
        assert_eq!(m.easing, Easing::QuintOut);
        assert_eq!(m.delay_ms, 200.0);
    }

    #[test]
    fn test_duration_range() {
        let params = MotionParams::default();
        for u in [0.0, 0.25, 0.999] {
            let mut rng = SequenceRandom::new(vec![0.5, 0.5, u, 0.5]);
            let m = Motion::for_balloon(&trajectory(), 1, &params, &mut rng);
            assert!(m.duration_ms >= 25000.0 && m.duration_ms < 30000.0);
        }
    }

    #[test]
    fn test_computed_offsets() {
        assert_eq!(motion().computed_offsets(), vec![0.0, 0.5, 1.0]);

        let even = Motion {
            keyframes: vec![Keyframe::new(Vec3::ZERO, 0.0); 5],
            duration_ms: 1.0,
            delay_ms: 0.0,
            easing: Easing::CubicOut,
        };
        assert_eq!(even.computed_offsets(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_pose_at() {
        let m = motion();
        assert_eq!(m.pose_at(0.0).translate, Vec3::new(200.0, 600.0, -40.0));
        assert_eq!(m.pose_at(0.5).translate, Vec3::new(320.0, -900.0, -40.0));
        assert_eq!(m.pose_at(1.0).translate, Vec3::new(440.0, -2400.0, -40.0));

        let quarter = m.pose_at(0.25);
        assert_eq!(quarter.translate, Vec3::new(260.0, -150.0, -40.0));
        assert_eq!(quarter.rotate_deg, 0.0);
        assert_eq!(quarter.opacity, 1.0);
    }

    #[test]
    fn test_sample_over_time() {
        let m = motion();
        assert_eq!(m.sample(0.0), m.pose_at(0.0));
        assert_eq!(m.sample(m.delay_ms), m.pose_at(0.0));
        assert_eq!(m.sample(m.total_ms()), m.pose_at(1.0));
        assert_eq!(m.sample(m.total_ms() + 5000.0), m.pose_at(1.0));

        let mut prev_y = f64::MAX;
        let mut t = 0.0;
        while t <= m.total_ms() {
            let y = m.sample(t).translate.y;
            assert!(y <= prev_y + 1e-6);
            prev_y = y;
            t += 500.0;
        }
    }

    #[test]
    fn test_css_transform() {
        let frame = Keyframe::new(Vec3::new(200.0, 600.0, -40.0), 11.5);
        assert_eq!(
            frame.css_transform(),
            "translate(-50%, 0%) translate3d(200px, 600px, -40px) rotate(11.5deg)"
        );
    }
}
