//! Coupling Coherence Index.
//!
//! CCI is the squared Pearson correlation between the ψₛ series and the
//! depth series of the event window. The depth series is smoothed, clipped
//! and resampled onto the ψₛ length first, since events arrive irregularly
//! while ψₛ is hourly.

/// Rolling mean over `window` points; the first points use the partial
/// window available so far.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Linearly resamples `values` onto `len` evenly spaced points spanning the
/// same index range.
pub fn resample_linear(values: &[f64], len: usize) -> Vec<f64> {
    match (values.len(), len) {
        (_, 0) | (0, _) => Vec::new(),
        (1, _) => vec![values[0]; len],
        (n, 1) => vec![values[n - 1]],
        (n, _) => {
            let step = (n - 1) as f64 / (len - 1) as f64;
            (0..len)
                .map(|i| {
                    let x = i as f64 * step;
                    let lo = (x.floor() as usize).min(n - 1);
                    let hi = (lo + 1).min(n - 1);
                    let frac = x - lo as f64;
                    values[lo] + (values[hi] - values[lo]) * frac
                })
                .collect()
        }
    }
}

// Rounding in the mean leaves a tiny spurious variance on a constant series,
// so flat input is detected directly rather than through a variance floor.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Pearson correlation coefficient. `None` when the series differ in length,
/// have fewer than two points, or either has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 || is_constant(xs) || is_constant(ys) {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then_some(r)
}

/// Squared correlation clamped to [0, 1], with 0 as the sentinel for
/// undefined correlation.
pub fn squared_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    pearson(xs, ys)
        .map(|r| (r * r).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Builds the depth signal the CCI compares against: rolling mean of
/// `smoothing` events, clipped to [0, `clip_km`], resampled to `len`.
pub fn depth_signal(depths: &[f64], smoothing: usize, clip_km: f64, len: usize) -> Vec<f64> {
    let smoothed: Vec<f64> = rolling_mean(depths, smoothing)
        .into_iter()
        .map(|d| d.clamp(0.0, clip_km.max(0.0)))
        .collect();
    resample_linear(&smoothed, len)
}

/// Coupling Coherence Index between the ψₛ series and raw event depths.
pub fn compute_cci(psi_series: &[f64], depths: &[f64], smoothing: usize, clip_km: f64) -> f64 {
    if psi_series.len() < 2 || depths.len() < 2 {
        return 0.0;
    }
    let depth = depth_signal(depths, smoothing, clip_km, psi_series.len());
    squared_correlation(psi_series, &depth)
}
