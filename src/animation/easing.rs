//! Easing curves for balloon flights

use serde::{Deserialize, Serialize};

/// Easing curves a balloon may be paced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Fast launch, long glide
    QuintOut,
    /// Gentler deceleration
    CubicOut,
}

impl Easing {
    /// Curves a release picks from
    pub const ALL: [Easing; 2] = [Easing::QuintOut, Easing::CubicOut];

    pub fn bezier(self) -> CubicBezier {
        match self {
            Easing::QuintOut => CubicBezier::new(0.22, 1.0, 0.36, 1.0),
            Easing::CubicOut => CubicBezier::new(0.33, 1.0, 0.68, 1.0),
        }
    }

    /// CSS timing function string
    pub fn css(self) -> String {
        self.bezier().css()
    }
}

/// CSS-style cubic Bézier timing function anchored at (0,0) and (1,1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn css(&self) -> String {
        format!("cubic-bezier({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }

    /// Eased progress for linear progress `t`
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = self.solve_x(t);
        bezier_coord(s, self.y1, self.y2)
    }

    /// Curve parameter whose x equals `x`
    fn solve_x(&self, x: f64) -> f64 {
        // Newton first, bisection when the slope is too flat
        let mut s = x;
        for _ in 0..8 {
            let err = bezier_coord(s, self.x1, self.x2) - x;
            if err.abs() < 1e-7 {
                return s;
            }
            let slope = bezier_slope(s, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..50 {
            let value = bezier_coord(s, self.x1, self.x2);
            if (value - x).abs() < 1e-7 {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

fn bezier_coord(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f64, easing: Easing) -> f64 {
    easing.bezier().apply(t)
}
