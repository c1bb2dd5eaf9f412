use serde::{Deserialize, Serialize};
use crate::math::Vec3;
use crate::random::RandomSource;

pub const MIN_BALLOONS: usize = 7;
pub const DEPTH_FLOOR_WIDTHS: f64 = 5.0;
pub const DRIFT_WIDTHS: f64 = 6.0;

/// Parameters controlling balloon count, depth spread and lateral drift
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Lower bound on the number of balloons, even in tiny scenes
    pub min_balloons: usize,
    /// Minimum depth spread, in balloon widths
    pub depth_floor_widths: f64,
    /// Maximum lateral drift over the flight, in balloon widths
    pub drift_widths: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            min_balloons: MIN_BALLOONS,
            depth_floor_widths: DEPTH_FLOOR_WIDTHS,
            drift_widths: DRIFT_WIDTHS,
        }
    }
}

/// Usable dimensions of the effect, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
}

impl Scene {
    /// Dimensions below one pixel (or not finite) are clamped to 1
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
        }
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() && value >= 1.0 {
        value
    } else {
        1.0
    }
}

/// Width and height of a balloon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width of a similar shape `height` tall
    pub fn width_for_height(&self, height: f64) -> f64 {
        if self.height > 0.0 && self.width > 0.0 {
            height * self.width / self.height
        } else {
            height
        }
    }
}

/// Start and end position of one balloon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub target_z: f64,
}

impl Trajectory {
    pub fn start(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Output of [`LayoutPlanner::plan`]: trajectories sorted far to near
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub balloon_size: Size,
    /// Depth spread the z values were sampled from
    pub max_depth: f64,
    pub trajectories: Vec<Trajectory>,
}

impl LayoutPlan {
    pub fn amount(&self) -> usize {
        self.trajectories.len()
    }
}

/// Rounds halves toward positive infinity, so `-0.5` becomes `0`
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Balloon layout algorithm
pub struct LayoutPlanner {
    pub params: LayoutParams,
}

impl LayoutPlanner {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }

    /// Plan trajectories for `scene` with balloons shaped like `reference`
    pub fn plan<R: RandomSource + ?Sized>(
        &self,
        scene: Scene,
        reference: Size,
        rng: &mut R,
    ) -> LayoutPlan {
        // Balloon scale follows the smaller side so narrow scenes stay readable
        let balloon_height = scene.width.min(scene.height).floor().max(1.0);
        let balloon_width = reference.width_for_height(balloon_height);

        let half_widths = round_half_up(scene.width / (balloon_width / 2.0));
        let amount = (half_widths as usize).max(self.params.min_balloons);

        let max_depth = (amount as f64 * balloon_width / 2.0)
            .max(balloon_width * self.params.depth_floor_widths);

        let mut trajectories: Vec<Trajectory> = (0..amount)
            .map(|_| self.sample(scene, balloon_width, max_depth, rng))
            .collect();

        trajectories.sort_by(|a, b| a.z.total_cmp(&b.z));
        normalize_depth(&mut trajectories);

        LayoutPlan {
            balloon_size: Size::new(balloon_width, balloon_height),
            max_depth,
            trajectories,
        }
    }

    fn sample<R: RandomSource + ?Sized>(
        &self,
        scene: Scene,
        balloon_width: f64,
        max_depth: f64,
        rng: &mut R,
    ) -> Trajectory {
        let x = round_half_up(scene.width * rng.next_unit());
        let z = round_half_up(-rng.next_unit() * max_depth);

        let drift = rng.next_unit() * balloon_width * self.params.drift_widths;
        let target_x = round_half_up(x + drift * rng.sign());

        Trajectory {
            x,
            // Enter from the bottom edge, leave above the top edge
            y: scene.height,
            z,
            target_x,
            target_y: -scene.height,
            target_z: z,
        }
    }
}

/// Shift depths so the nearest balloon sits at z = 0.
/// The target depth is derived from the start depth, so balloons never travel in z.
fn normalize_depth(trajectories: &mut [Trajectory]) {
    let Some(closest) = trajectories.last().map(|t| t.z) else {
        return;
    };
    for t in trajectories.iter_mut() {
        let z = t.z - closest;
        t.z = z;
        t.target_z = z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Lcg, SequenceRandom};

    const TWO_BY_THREE: Size = Size::new(200.0, 300.0);

    fn planner() -> LayoutPlanner {
        LayoutPlanner::new(LayoutParams::default())
    }

    #[test]
    fn test_reference_scene_sizes() {
        let mut rng = SequenceRandom::new(vec![0.5]);
        let plan = planner().plan(Scene::new(800.0, 600.0), TWO_BY_THREE, &mut rng);

        assert_eq!(plan.balloon_size, Size::new(400.0, 600.0));
        assert_eq!(plan.amount(), 7);
        assert_eq!(plan.max_depth, 2000.0);
    }

    #[test]
    fn test_wide_scene_scales_count_and_depth() {
        let mut rng = Lcg::new(3);
        let plan = planner().plan(Scene::new(3000.0, 600.0), TWO_BY_THREE, &mut rng);

        assert_eq!(plan.amount(), 15);
        assert_eq!(plan.max_depth, 3000.0);
    }

    #[test]
    fn test_identical_samples() {
        let mut rng = SequenceRandom::new(vec![0.25, 0.5, 0.1, 0.9]);
        let plan = planner().plan(Scene::new(800.0, 600.0), TWO_BY_THREE, &mut rng);

        for t in &plan.trajectories {
            assert_eq!(t.x, 200.0);
            assert_eq!(t.y, 600.0);
            assert_eq!(t.z, 0.0);
            assert_eq!(t.target_x, 440.0);
            assert_eq!(t.target_y, -600.0);
            assert_eq!(t.target_z, 0.0);
        }
        assert_eq!(rng.drawn(), 28);
    }

    #[test]
    fn test_sorted_and_normalized() {
        let depths = [0.3, 0.9, 0.1, 0.5, 0.7, 0.2, 0.8];
        let mut samples = Vec::new();
        for (i, depth) in depths.iter().enumerate() {
            samples.extend([i as f64 * 0.1, *depth, 0.5, 0.2]);
        }
        let mut rng = SequenceRandom::new(samples);
        let plan = planner().plan(Scene::new(800.0, 600.0), TWO_BY_THREE, &mut rng);

        let z: Vec<f64> = plan.trajectories.iter().map(|t| t.z).collect();
        assert_eq!(z, vec![-1600.0, -1400.0, -1200.0, -800.0, -400.0, -200.0, 0.0]);

        // Farthest balloon was the second sample
        let farthest = plan.trajectories[0];
        assert_eq!(farthest.x, 80.0);
        assert_eq!(farthest.target_x, -1120.0);
        assert_eq!(farthest.target_z, farthest.z);
    }

    #[test]
    fn test_trajectory_invariants() {
        let mut rng = Lcg::new(99);
        for (w, h) in [(320.0, 480.0), (1920.0, 1080.0), (50.0, 2000.0), (4000.0, 90.0)] {
            let plan = planner().plan(Scene::new(w, h), TWO_BY_THREE, &mut rng);

            assert!(plan.amount() >= MIN_BALLOONS);
            let max_z = plan
                .trajectories
                .iter()
                .map(|t| t.z)
                .fold(f64::MIN, f64::max);
            assert_eq!(max_z, 0.0);

            for pair in plan.trajectories.windows(2) {
                assert!(pair[0].z <= pair[1].z);
            }
            for t in &plan.trajectories {
                assert!(t.z <= 0.0);
                assert!(t.z > -plan.max_depth - 1.0);
                assert_eq!(t.y, h);
                assert_eq!(t.target_y, -h);
                assert_eq!(t.target_z, t.z);
                assert!((0.0..=w).contains(&t.x));
            }
        }
    }

    #[test]
    fn test_amount_non_decreasing_in_width() {
        let mut previous = 0;
        let mut width = 1.0;
        while width < 4000.0 {
            let mut rng = Lcg::new(5);
            let plan = planner().plan(Scene::new(width, 600.0), TWO_BY_THREE, &mut rng);
            assert!(plan.amount() >= previous, "amount dropped at width {}", width);
            previous = plan.amount();
            width += 37.0;
        }
    }

    #[test]
    fn test_degenerate_scene_is_clamped() {
        let scene = Scene::new(0.0, -20.0);
        assert_eq!(scene, Scene::new(1.0, 1.0));
        assert_eq!(Scene::new(f64::NAN, 300.0).width, 1.0);

        let mut rng = Lcg::new(1);
        let plan = planner().plan(scene, TWO_BY_THREE, &mut rng);
        assert_eq!(plan.amount(), MIN_BALLOONS);
        assert!(plan.trajectories.iter().all(|t| t.x.is_finite() && t.target_x.is_finite()));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(-1.6), -2.0);
    }
}
