/// Region registry for the SUPT continuum monitor.
///
/// Defines the volcanic areas the monitor can watch, with the bounding boxes
/// used for INGV FDSN event queries. This is the single source of truth for
/// region coordinates; configuration refers to regions by id only.

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// A monitored volcanic area.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Stable identifier used in `supt.toml`.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// WGS84 bounding box, degrees.
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// All monitored regions.
///
/// Sources: INGV Osservatorio Vesuviano / Osservatorio Etneo monitoring
/// polygons, reduced to axis-aligned boxes.
pub static REGION_REGISTRY: &[Region] = &[
    Region {
        id: "campi_flegrei",
        name: "Campi Flegrei",
        min_latitude: 40.79,
        max_latitude: 40.84,
        min_longitude: 14.10,
        max_longitude: 14.15,
    },
    Region {
        id: "vulcano",
        name: "Vulcano (Aeolian Islands)",
        min_latitude: 38.38,
        max_latitude: 38.47,
        min_longitude: 14.90,
        max_longitude: 15.05,
    },
];

/// Looks up a region by id. Returns `None` if not found.
pub fn find_region(id: &str) -> Option<&'static Region> {
    REGION_REGISTRY.iter().find(|r| r.id == id)
}

/// Looks up a region by id, falling back to the first registry entry.
pub fn region_or_default(id: &str) -> &'static Region {
    find_region(id).unwrap_or(&REGION_REGISTRY[0])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_boxes_are_well_formed() {
        // An inverted box makes the FDSN service answer 400 for every query.
        for region in REGION_REGISTRY {
            assert!(
                region.min_latitude < region.max_latitude,
                "{}: latitude bounds inverted",
                region.id
            );
            assert!(
                region.min_longitude < region.max_longitude,
                "{}: longitude bounds inverted",
                region.id
            );
            assert!((-90.0..=90.0).contains(&region.min_latitude));
            assert!((-90.0..=90.0).contains(&region.max_latitude));
            assert!((-180.0..=180.0).contains(&region.min_longitude));
            assert!((-180.0..=180.0).contains(&region.max_longitude));
        }
    }

    #[test]
    fn test_region_ids_are_unique() {
        for (i, a) in REGION_REGISTRY.iter().enumerate() {
            for b in &REGION_REGISTRY[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate region id");
            }
        }
    }

    #[test]
    fn test_find_region() {
        assert_eq!(find_region("vulcano").map(|r| r.name), Some("Vulcano (Aeolian Islands)"));
        assert!(find_region("etna").is_none());
    }

    #[test]
    fn test_unknown_region_falls_back_to_first() {
        assert_eq!(region_or_default("nowhere").id, "campi_flegrei");
    }
}
