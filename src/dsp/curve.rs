//! Piecewise-linear transfer curves.

/// A curve defined by `(x, y)` breakpoints with strictly increasing `x`.
///
/// Between breakpoints the value is interpolated linearly; outside the
/// covered range the nearest end value is held.
#[derive(Debug, Clone, Copy)]
pub struct PiecewiseLinear {
    points: &'static [(f64, f64)],
}

impl PiecewiseLinear {
    pub const fn new(points: &'static [(f64, f64)]) -> Self {
        Self { points }
    }

    pub fn eval(&self, x: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        for pair in self.points.windows(2) {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];
            if x <= x2 {
                debug_assert!(x1 < x2, "curve breakpoints must be increasing");
                return y1 + (x - x1) / (x2 - x1) * (y2 - y1);
            }
        }
        last.1
    }
}
