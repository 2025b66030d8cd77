//! Band classification for the indicators.
//!
//! RPAM phase from EII, coherence band from CCI, geomagnetic state from Kp.
//! Every band is closed on its lower bound.

use serde::Serialize;
use std::fmt;

pub const RPAM_ACTIVE_MIN: f64 = 0.85;
pub const RPAM_ELEVATED_MIN: f64 = 0.60;

pub const CCI_COHERENT_MIN: f64 = 0.7;
pub const CCI_MODERATE_MIN: f64 = 0.4;

pub const KP_STORM_MIN: f64 = 5.0;
pub const KP_MODERATE_MIN: f64 = 3.0;

/// ψₛ scale gains 1/28 per Kp unit, saturating at Kp 7.
const PSI_SCALE_KP_DIVISOR: f64 = 28.0;
const PSI_SCALE_MAX_GAIN: f64 = 0.25;

// ---------------------------------------------------------------------------
// RPAM
// ---------------------------------------------------------------------------

/// Reactive Pressure Alignment Mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpamPhase {
    Active,
    Elevated,
    Monitoring,
}

impl RpamPhase {
    /// Classifies an EII value. NaN falls through to `Monitoring`.
    pub fn from_eii(eii: f64) -> Self {
        if eii >= RPAM_ACTIVE_MIN {
            RpamPhase::Active
        } else if eii >= RPAM_ELEVATED_MIN {
            RpamPhase::Elevated
        } else {
            RpamPhase::Monitoring
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RpamPhase::Active => "ACTIVE – Collapse Window Initiated",
            RpamPhase::Elevated => "ELEVATED – Pressure Coupling Phase",
            RpamPhase::Monitoring => "MONITORING – Stable",
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            RpamPhase::Active => {
                "System energetically saturated. Collapse-phase resonance possible; \
                 high internal coupling efficiency."
            }
            RpamPhase::Elevated => {
                "System in harmonic tension buildup. Energy transfer active; \
                 monitoring phase coherence recommended."
            }
            RpamPhase::Monitoring => "System stable; no significant external coupling.",
        }
    }
}

impl fmt::Display for RpamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpamPhase::Active => write!(f, "ACTIVE"),
            RpamPhase::Elevated => write!(f, "ELEVATED"),
            RpamPhase::Monitoring => write!(f, "MONITORING"),
        }
    }
}

// ---------------------------------------------------------------------------
// CCI bands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoherenceBand {
    Coherent,
    Moderate,
    Decoupled,
}

impl CoherenceBand {
    pub fn from_cci(cci: f64) -> Self {
        if cci >= CCI_COHERENT_MIN {
            CoherenceBand::Coherent
        } else if cci >= CCI_MODERATE_MIN {
            CoherenceBand::Moderate
        } else {
            CoherenceBand::Decoupled
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoherenceBand::Coherent => "Coherent",
            CoherenceBand::Moderate => "Moderate",
            CoherenceBand::Decoupled => "Decoupled",
        }
    }

    /// Gauge bar colour.
    pub fn color(&self) -> &'static str {
        match self {
            CoherenceBand::Coherent => "green",
            CoherenceBand::Moderate => "orange",
            CoherenceBand::Decoupled => "red",
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            CoherenceBand::Coherent => "ψₛ–Depth phases are synchronized; resonance feedback likely.",
            CoherenceBand::Moderate => {
                "Partial coherence detected; energy exchange possible but weak."
            }
            CoherenceBand::Decoupled => {
                "ψₛ–Depth phases misaligned; system energetically loaded but incoherent."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Geomagnetic state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeomagneticState {
    Storm,
    Moderate,
    Quiet,
}

impl GeomagneticState {
    pub fn from_kp(kp: f64) -> Self {
        if kp >= KP_STORM_MIN {
            GeomagneticState::Storm
        } else if kp >= KP_MODERATE_MIN {
            GeomagneticState::Moderate
        } else {
            GeomagneticState::Quiet
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GeomagneticState::Storm => "Geomagnetic Storm Active - potential resonance amplifier.",
            GeomagneticState::Moderate => {
                "Moderate Geomagnetic Activity - mild forcing potential."
            }
            GeomagneticState::Quiet => "Quiet geomagnetic conditions.",
        }
    }
}

/// Geomagnetic amplification of ψₛ: `1 + min(Kp / 28, 0.25)`, so in
/// [1, 1.25]. A non-finite or negative Kp gives 1.
pub fn psi_scale(kp: f64) -> f64 {
    if !kp.is_finite() {
        return 1.0;
    }
    1.0 + (kp.max(0.0) / PSI_SCALE_KP_DIVISOR).min(PSI_SCALE_MAX_GAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpam_boundaries() {
        assert_eq!(RpamPhase::from_eii(0.85), RpamPhase::Active);
        assert_eq!(RpamPhase::from_eii(0.849999), RpamPhase::Elevated);
        assert_eq!(RpamPhase::from_eii(0.6), RpamPhase::Elevated);
        assert_eq!(RpamPhase::from_eii(0.5999), RpamPhase::Monitoring);
    }

    #[test]
    fn test_rpam_extremes() {
        assert_eq!(RpamPhase::from_eii(1.0), RpamPhase::Active);
        assert_eq!(RpamPhase::from_eii(0.0), RpamPhase::Monitoring);
        assert_eq!(RpamPhase::from_eii(f64::NAN), RpamPhase::Monitoring);
    }

    #[test]
    fn test_rpam_serializes_upper_case() {
        let json = serde_json::to_string(&RpamPhase::Elevated).unwrap();
        assert_eq!(json, "\"ELEVATED\"");
    }

    #[test]
    fn test_coherence_bands() {
        assert_eq!(CoherenceBand::from_cci(0.7), CoherenceBand::Coherent);
        assert_eq!(CoherenceBand::from_cci(0.69), CoherenceBand::Moderate);
        assert_eq!(CoherenceBand::from_cci(0.4), CoherenceBand::Moderate);
        assert_eq!(CoherenceBand::from_cci(0.39), CoherenceBand::Decoupled);
        assert_eq!(CoherenceBand::from_cci(0.0).color(), "red");
    }

    #[test]
    fn test_geomagnetic_state() {
        assert_eq!(GeomagneticState::from_kp(5.0), GeomagneticState::Storm);
        assert_eq!(GeomagneticState::from_kp(4.67), GeomagneticState::Moderate);
        assert_eq!(GeomagneticState::from_kp(2.0), GeomagneticState::Quiet);
    }

    #[test]
    fn test_psi_scale() {
        assert_eq!(psi_scale(0.0), 1.0);
        assert!((psi_scale(2.8) - 1.1).abs() < 1e-12);
        assert_eq!(psi_scale(7.0), 1.25);
        assert_eq!(psi_scale(9.0), 1.25);
        assert_eq!(psi_scale(-1.0), 1.0);
        assert_eq!(psi_scale(f64::NAN), 1.0);
    }
}
