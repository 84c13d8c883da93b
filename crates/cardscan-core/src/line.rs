use serde::{Deserialize, Serialize};

/// Linear edge model `x(y) = intercept + slope * y`, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeLine {
    pub intercept: f64,
    pub slope: f64,
}

impl EdgeLine {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// Line parallel to the image's vertical axis.
    pub fn vertical(x: f64) -> Self {
        Self::new(x, 0.0)
    }

    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        self.intercept + y * self.slope
    }
}

/// Ordinary least-squares fit of `xs` as a function of `ys`.
///
/// Returns `None` for fewer than two samples, mismatched lengths or when all
/// `ys` coincide.
pub fn fit_line(ys: &[f64], xs: &[f64]) -> Option<EdgeLine> {
    if ys.len() != xs.len() || ys.len() < 2 {
        return None;
    }
    let n = ys.len() as f64;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mean_x = xs.iter().sum::<f64>() / n;

    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&y, &x) in ys.iter().zip(xs) {
        let dy = y - mean_y;
        syy += dy * dy;
        sxy += dy * (x - mean_x);
    }
    if syy <= f64::EPSILON {
        return None;
    }

    let slope = sxy / syy;
    Some(EdgeLine::new(mean_x - slope * mean_y, slope))
}
