//! Event window summary shown beside the indicators.

use serde::Serialize;

use crate::model::SeismicEvent;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub count: usize,
    pub latest: Option<SeismicEvent>,
    pub mean_magnitude: Option<f64>,
    pub mean_depth_km: Option<f64>,
}

/// Summarizes a chronologically ordered event window.
pub fn summarize(events: &[SeismicEvent]) -> EventSummary {
    let n = events.len() as f64;
    let mean = |f: fn(&SeismicEvent) -> f64| {
        (!events.is_empty()).then(|| events.iter().map(f).sum::<f64>() / n)
    };
    EventSummary {
        count: events.len(),
        latest: events.last().cloned(),
        mean_magnitude: mean(|e| e.magnitude),
        mean_depth_km: mean(|e| e.depth_km),
    }
}
