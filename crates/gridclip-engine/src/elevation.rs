//! Point-in-layer classification from z values.

use gridclip_core::{CellId, GridError};
use gridclip_space::GridSource;

/// Layer containing elevation `z` for a cell column with `bounds`.
///
/// `bounds` runs from the top of the column to the bottom of the last layer
/// and must be strictly decreasing. Layer `L` spans `bounds[L]` down to
/// `bounds[L + 1]`; an interior bound belongs to the layer below it and the
/// bottom bound to the last layer. A `z` above the top or below the bottom,
/// a missing `z`, and fewer than two bounds all give `None`.
///
/// The layer is the number of interior bounds at or above `z`, counted
/// without branching on the values.
///
/// ```
/// use gridclip_engine::classify;
///
/// let bounds = [2.0, 1.0, 0.5, 0.0];
/// assert_eq!(classify(&bounds, Some(0.2)), Some(2));
/// assert_eq!(classify(&bounds, Some(1.0)), Some(1));
/// assert_eq!(classify(&bounds, Some(2.5)), None);
/// ```
pub fn classify(bounds: &[f64], z: Option<f64>) -> Option<usize> {
    let (&top, rest) = bounds.split_first()?;
    let (&bottom, interior) = rest.split_last()?;
    // NaN fails every comparison, so a missing z lands out of range.
    let z = z.unwrap_or(f64::NAN);
    let layer: usize = interior.iter().map(|&b| usize::from(b >= z)).sum();
    (z <= top && z >= bottom).then_some(layer)
}

/// Classify many `(cellid, z)` pairs against the layer bounds of `grid`.
///
/// Fails with the grid's error if a cell is out of range or the grid has no
/// elevations; an out-of-range `z` is a `None` entry, not an error.
pub fn classify_many(
    grid: &dyn GridSource,
    points: &[(CellId, Option<f64>)],
) -> Result<Vec<Option<usize>>, GridError> {
    points
        .iter()
        .map(|&(cellid, z)| {
            let bounds = grid.layer_elevation_bounds(cellid)?;
            Ok(classify(&bounds, z))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridclip_space::StructuredGrid;
    use proptest::prelude::*;

    const BOUNDS: [f64; 4] = [2.0, 1.0, 0.5, 0.0];

    #[test]
    fn interior_values() {
        assert_eq!(classify(&BOUNDS, Some(1.5)), Some(0));
        assert_eq!(classify(&BOUNDS, Some(0.75)), Some(1));
        assert_eq!(classify(&BOUNDS, Some(0.2)), Some(2));
    }

    #[test]
    fn bounds_belong_to_the_layer_below() {
        assert_eq!(classify(&BOUNDS, Some(2.0)), Some(0));
        assert_eq!(classify(&BOUNDS, Some(1.0)), Some(1));
        assert_eq!(classify(&BOUNDS, Some(0.5)), Some(2));
        assert_eq!(classify(&BOUNDS, Some(0.0)), Some(2));
    }

    #[test]
    fn out_of_range_is_none_not_clamped() {
        assert_eq!(classify(&BOUNDS, Some(10.0)), None);
        assert_eq!(classify(&BOUNDS, Some(-0.001)), None);
        assert_eq!(classify(&BOUNDS, None), None);
        assert_eq!(classify(&BOUNDS, Some(f64::NAN)), None);
    }

    #[test]
    fn degenerate_bounds() {
        assert_eq!(classify(&[], Some(0.0)), None);
        assert_eq!(classify(&[1.0], Some(1.0)), None);
        assert_eq!(classify(&[1.0, 0.0], Some(0.5)), Some(0));
    }

    #[test]
    fn many_against_grid() {
        let g = StructuredGrid::uniform(2, 2, 10.0)
            .unwrap()
            .with_elevations(vec![2.0; 4], vec![vec![1.0; 4], vec![0.5; 4], vec![0.0; 4]])
            .unwrap();
        let out = classify_many(
            &g,
            &[(CellId(2), Some(0.2)), (CellId(0), Some(10.0)), (CellId(1), None)],
        )
        .unwrap();
        assert_eq!(out, vec![Some(2), None, None]);
    }

    #[test]
    fn many_without_elevations_fails() {
        let g = StructuredGrid::uniform(1, 1, 1.0).unwrap();
        assert_eq!(
            classify_many(&g, &[(CellId(0), Some(0.0))]),
            Err(GridError::NoElevations)
        );
    }

    proptest! {
        #[test]
        fn layer_brackets_z(
            steps in proptest::collection::vec(0.1f64..5.0, 1..8),
            top in -10.0f64..10.0,
            frac in 0.0f64..=1.0,
        ) {
            let mut bounds = vec![top];
            for s in &steps {
                let last = *bounds.last().unwrap();
                bounds.push(last - s);
            }
            let bottom = *bounds.last().unwrap();
            let z = (bottom + frac * (top - bottom)).clamp(bottom, top);
            let layer = classify(&bounds, Some(z));
            prop_assert!(layer.is_some());
            let l = layer.unwrap();
            prop_assert!(l < steps.len());
            prop_assert!(bounds[l] >= z && z >= bounds[l + 1]);
        }
    }
}
