//! Engine build configuration and per-query options.

use gridclip_clip::ClipSettings;
use gridclip_core::StructuralError;

// ── EngineConfig ───────────────────────────────────────────────────

/// Settings fixed when an [`Engine`](crate::Engine) is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bulk-load an R-tree over the cells. Without it every query scans all
    /// cells, and [`query_point_to_cell`](crate::Engine::query_point_to_cell)
    /// is refused. Default: true.
    pub use_index: bool,
    /// Keep cells in the grid's local frame instead of applying its offset
    /// and rotation; shapes must then be in local coordinates too.
    /// Default: false.
    pub use_local_coords: bool,
    /// Build vertex-grid cells and run batched queries on the rayon pool.
    /// Default: true.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_index: true,
            use_local_coords: false,
            parallel: true,
        }
    }
}

// ── IntersectOptions ───────────────────────────────────────────────

/// Options of the clip queries.
///
/// ```
/// use gridclip_engine::IntersectOptions;
///
/// let opts = IntersectOptions::default()
///     .with_contains_centroid(true)
///     .with_min_area_fraction(0.25);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntersectOptions {
    /// Report every intersecting cell instead of resolving shared
    /// boundaries to the lowest cellid. Default: false.
    pub return_all_matches: bool,
    /// Polygons: drop cells whose centroid is not covered by the clipped
    /// geometry. Default: false.
    pub contains_centroid: bool,
    /// Polygons: drop cells whose clipped area is below this fraction of the
    /// cell area. Default: `None`.
    pub min_area_fraction: Option<f64>,
    /// Points: add a `layer` column from each point's z. Default: false.
    pub classify_elevation: bool,
}

impl IntersectOptions {
    /// Set [`return_all_matches`](Self::return_all_matches).
    pub fn with_return_all_matches(mut self, value: bool) -> Self {
        self.return_all_matches = value;
        self
    }

    /// Set [`contains_centroid`](Self::contains_centroid).
    pub fn with_contains_centroid(mut self, value: bool) -> Self {
        self.contains_centroid = value;
        self
    }

    /// Set [`min_area_fraction`](Self::min_area_fraction).
    pub fn with_min_area_fraction(mut self, value: f64) -> Self {
        self.min_area_fraction = Some(value);
        self
    }

    /// Set [`classify_elevation`](Self::classify_elevation).
    pub fn with_classify_elevation(mut self, value: bool) -> Self {
        self.classify_elevation = value;
        self
    }

    /// Check option values.
    ///
    /// `min_area_fraction` must be finite and non-negative. Values above 1
    /// are accepted and simply keep nothing.
    pub fn validate(&self) -> Result<(), StructuralError> {
        if let Some(f) = self.min_area_fraction {
            if !f.is_finite() || f < 0.0 {
                return Err(StructuralError::InvalidOption {
                    name: "min_area_fraction",
                    reason: format!("must be finite and >= 0, got {f}"),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn clip_settings(&self) -> ClipSettings {
        ClipSettings {
            return_all_matches: self.return_all_matches,
            contains_centroid: self.contains_centroid,
            min_area_fraction: self.min_area_fraction,
        }
    }
}
