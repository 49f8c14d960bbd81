use serde::{Deserialize, Serialize};

/// Mean of the present values; `None` when nothing is present.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values.into_iter().flatten() {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Keeps only the observations where both sides are present.
pub fn complete_pairs<I>(pairs: I) -> Vec<(f64, f64)>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    pairs
        .into_iter()
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect()
}

/// Pearson correlation over pairwise-complete observations.
///
/// Undefined (`None`) with fewer than two complete pairs or when either side is constant.
/// Constancy is checked on the raw values so that float noise in the mean cannot turn a
/// constant column into a tiny non-zero variance.
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    pearson_complete(&complete_pairs(pairs))
}

pub fn pearson_complete(pairs: &[(f64, f64)]) -> Option<f64> {
    let m = Moments::from_pairs(pairs)?;
    if m.sxx == 0.0 || m.syy == 0.0 {
        return None;
    }
    let r = m.sxy / (m.sxx * m.syy).sqrt();
    Some(r.clamp(-1.0, 1.0))
}

/// Ordinary least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: Option<f64>,
    pub samples: usize,
}

impl Trendline {
    pub fn fit(pairs: &[(f64, f64)]) -> Option<Self> {
        let m = Moments::from_pairs(pairs)?;
        if m.sxx == 0.0 {
            return None;
        }
        let slope = (m.sxy / m.sxx) * (m.scale_y / m.scale_x);
        let intercept = m.mean_y - slope * m.mean_x;
        let r_squared = if m.syy == 0.0 {
            None
        } else {
            Some((m.sxy * m.sxy) / (m.sxx * m.syy))
        };
        Some(Self {
            slope,
            intercept,
            r_squared,
            samples: pairs.len(),
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// End points of the fitted line over `[x_min, x_max]`.
    pub fn segment(&self, x_min: f64, x_max: f64) -> [(f64, f64); 2] {
        [(x_min, self.predict(x_min)), (x_max, self.predict(x_max))]
    }
}

struct Moments {
    mean_x: f64,
    mean_y: f64,
    scale_x: f64,
    scale_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl Moments {
    /// Sums are taken over deviations divided by their largest magnitude, so large finite
    /// inputs cannot overflow when squared. `None` if the moments are still not finite.
    fn from_pairs(pairs: &[(f64, f64)]) -> Option<Self> {
        if pairs.len() < 2 {
            return None;
        }
        let mean_x = running_mean(pairs.iter().map(|(x, _)| *x))?;
        let mean_y = running_mean(pairs.iter().map(|(_, y)| *y))?;

        let (x0, y0) = pairs[0];
        let x_constant = pairs.iter().all(|(x, _)| *x == x0);
        let y_constant = pairs.iter().all(|(_, y)| *y == y0);

        let scale_x = max_abs_deviation(pairs.iter().map(|(x, _)| *x), mean_x)?;
        let scale_y = max_abs_deviation(pairs.iter().map(|(_, y)| *y), mean_y)?;

        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for (x, y) in pairs {
            let dx = if scale_x > 0.0 { (x - mean_x) / scale_x } else { 0.0 };
            let dy = if scale_y > 0.0 { (y - mean_y) / scale_y } else { 0.0 };
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        if x_constant {
            sxx = 0.0;
            sxy = 0.0;
        }
        if y_constant {
            syy = 0.0;
            sxy = 0.0;
        }
        if !(sxx.is_finite() && syy.is_finite() && sxy.is_finite()) {
            return None;
        }
        Some(Self {
            mean_x,
            mean_y,
            scale_x,
            scale_y,
            sxx,
            syy,
            sxy,
        })
    }
}

fn running_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut mean = 0.0;
    for (idx, v) in values.enumerate() {
        mean += (v - mean) / (idx + 1) as f64;
    }
    mean.is_finite().then_some(mean)
}

fn max_abs_deviation(values: impl Iterator<Item = f64>, mean: f64) -> Option<f64> {
    let mut max = 0.0f64;
    for v in values {
        let d = (v - mean).abs();
        if !d.is_finite() {
            return None;
        }
        max = max.max(d);
    }
    Some(max)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
