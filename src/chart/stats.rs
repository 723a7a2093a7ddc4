//! Summary statistics behind the distribution chart styles.

/// Statistics computed for a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Lower whisker: smallest value within 1.5 · IQR of Q1
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Upper whisker: largest value within 1.5 · IQR of Q3
    pub max: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute box plot statistics; non-finite values are ignored.
    pub fn from_data(data: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(data);
        if sorted.is_empty() {
            return None;
        }

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let min = sorted
            .iter()
            .copied()
            .find(|&x| x >= lower_fence)
            .unwrap_or(sorted[0]);
        let max = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= upper_fence)
            .unwrap_or(sorted[sorted.len() - 1]);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&x| x < lower_fence || x > upper_fence)
            .collect();

        Some(Self {
            min,
            q1,
            median,
            q3,
            max,
            outliers,
        })
    }
}

pub fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let k = (p / 100.0) * (n - 1) as f64;
            let f = k.floor() as usize;
            let c = k.ceil() as usize;
            if f == c || c >= n {
                sorted[f.min(n - 1)]
            } else {
                let d = k - f as f64;
                sorted[f] * (1.0 - d) + sorted[c] * d
            }
        }
    }
}

/// Gaussian kernel density estimate sampled at `n_points` positions
/// spanning the data range. Densities are normalised so the peak is 1.
///
/// Bandwidth follows Silverman's rule of thumb.
pub fn kde(data: &[f64], n_points: usize) -> Vec<(f64, f64)> {
    let clean = sorted_finite(data);
    if clean.is_empty() || n_points < 2 {
        return Vec::new();
    }
    let min_val = clean[0];
    let max_val = clean[clean.len() - 1];
    let range = max_val - min_val;
    if range == 0.0 {
        return vec![(min_val, 1.0)];
    }

    let n = clean.len() as f64;
    let mean = clean.iter().sum::<f64>() / n;
    let std_dev = (clean.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
    let h = (1.06 * std_dev * n.powf(-0.2)).max(range * 0.01);

    let step = range / (n_points - 1) as f64;
    let norm = (2.0 * std::f64::consts::PI).sqrt() * h;
    let mut points: Vec<(f64, f64)> = (0..n_points)
        .map(|i| {
            let x = min_val + i as f64 * step;
            let density = clean
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / h;
                    (-0.5 * u * u).exp() / norm
                })
                .sum::<f64>()
                / n;
            (x, density)
        })
        .collect();

    let peak = points.iter().map(|&(_, d)| d).fold(0.0, f64::max);
    if peak > 0.0 {
        for point in &mut points {
            point.1 /= peak;
        }
    }
    points
}

/// Count values into `bins` equal-width bins over `[lo, hi]`.
///
/// The last bin is closed on the right; values outside the range or
/// non-finite are ignored.
pub fn histogram_counts(data: &[f64], bins: usize, lo: f64, hi: f64) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 || hi <= lo {
        return counts;
    }
    let width = (hi - lo) / bins as f64;
    for &v in data {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}
