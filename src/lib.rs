//! SUPT continuum monitor.
//!
//! Fetches solar wind / geomagnetic data from NOAA SWPC and seismic events
//! from INGV, cleans the seismic records, and computes the Energetic
//! Instability Index (EII), the RPAM phase, the Coupling Coherence Index
//! (CCI) and a 48-hour ψₛ projection. Every refresh runs the whole chain
//! synchronously in a fresh `cycle::CycleContext`.

pub mod analysis;
pub mod clean;
pub mod config;
pub mod cycle;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod report;
pub mod staleness;
pub mod verify;
