//! Energetic Instability Index.

use crate::model::SeismicEvent;

pub const WEIGHT_MD_MAX: f64 = 0.2;
pub const WEIGHT_MD_MEAN: f64 = 0.15;
pub const WEIGHT_SHALLOW_RATIO: f64 = 0.4;
pub const WEIGHT_PSI_S: f64 = 0.25;

/// Magnitude and depth statistics of an event window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub md_max: f64,
    pub md_mean: f64,
    pub shallow_ratio: f64,
}

impl WindowStats {
    /// Returns `None` for an empty window.
    pub fn from_events(events: &[SeismicEvent], shallow_depth_km: f64) -> Option<Self> {
        if events.is_empty() {
            return None;
        }
        let n = events.len() as f64;
        let md_max = events
            .iter()
            .map(|e| e.magnitude)
            .fold(f64::NEG_INFINITY, f64::max);
        let md_mean = events.iter().map(|e| e.magnitude).sum::<f64>() / n;
        let shallow = events.iter().filter(|e| e.depth_km < shallow_depth_km).count();

        Some(WindowStats {
            md_max,
            md_mean,
            shallow_ratio: shallow as f64 / n,
        })
    }

    pub fn eii(&self, psi_s: f64) -> f64 {
        compute_eii(self.md_max, self.md_mean, self.shallow_ratio, psi_s)
    }
}

/// Clamps ψₛ onto its nominal [0, 1] range. Non-finite input maps to 0.
pub fn clamp_psi(psi_s: f64) -> f64 {
    if psi_s.is_finite() { psi_s.clamp(0.0, 1.0) } else { 0.0 }
}

/// EII = 0.2·Md_max + 0.15·Md_mean + 0.4·Shallow_ratio + 0.25·ψₛ, clamped
/// to [0, 1].
///
/// All weights are positive and the clamp is monotone, so the index never
/// decreases when any single input increases.
pub fn compute_eii(md_max: f64, md_mean: f64, shallow_ratio: f64, psi_s: f64) -> f64 {
    let raw = WEIGHT_MD_MAX * md_max
        + WEIGHT_MD_MEAN * md_mean
        + WEIGHT_SHALLOW_RATIO * shallow_ratio
        + WEIGHT_PSI_S * clamp_psi(psi_s);
    if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
}
