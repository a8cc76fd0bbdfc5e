//! Per-shape clip pipeline with exhaustive dispatch over shape kinds.

use crate::line::LineClip;
use crate::ownership::{resolve_ownership, CellClip, ClipPart};
use crate::point::PointClip;
use crate::polygon::PolygonClip;
use geo::{Geometry, LineString, MultiLineString, MultiPolygon, Polygon};
use gridclip_core::{CellId, PointZ, Shape};
use gridclip_space::CellPolygons;
use tracing::trace;

/// Clip-stage switches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipSettings {
    /// Skip boundary ownership; every intersecting cell keeps its clip.
    pub return_all_matches: bool,
    /// Polygons only: keep a cell only if its centroid is covered.
    pub contains_centroid: bool,
    /// Polygons only: keep a cell only if clipped area over cell area is at
    /// least this.
    pub min_area_fraction: Option<f64>,
}

/// Clip result for one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct ClippedCell {
    /// Cell the geometry belongs to.
    pub cellid: CellId,
    /// Clipped geometry, collapsed to a single part when possible.
    pub geometry: Geometry<f64>,
    /// Length, for line shapes.
    pub length: Option<f64>,
    /// Area, for polygon shapes.
    pub area: Option<f64>,
    /// Elevation of the first point with one, for point shapes.
    pub z: Option<f64>,
}

/// Clip `shape` against `candidates`, which must already be exact
/// intersectors.
///
/// The result is in ascending cellid order.
pub fn clip_shape(
    shape: &Shape,
    cells: &CellPolygons,
    candidates: &[CellId],
    settings: &ClipSettings,
) -> Vec<ClippedCell> {
    match shape {
        Shape::Point(_) | Shape::MultiPoint(_) => {
            clip_points(shape.points(), cells, candidates, settings)
        }
        Shape::LineString(ls) => {
            clip_lines(std::slice::from_ref(ls), cells, candidates, settings)
        }
        Shape::MultiLineString(mls) => clip_lines(&mls.0, cells, candidates, settings),
        Shape::Polygon(p) => clip_polygons(
            &MultiPolygon::new(vec![p.clone()]),
            cells,
            candidates,
            settings,
        ),
        Shape::MultiPolygon(mp) => clip_polygons(mp, cells, candidates, settings),
    }
}

fn resolve<G: ClipPart>(
    settings: &ClipSettings,
    clips: impl IntoIterator<Item = (CellId, G)>,
) -> Vec<CellClip<G>> {
    let mut raw: Vec<CellClip<G>> = clips
        .into_iter()
        .filter_map(|(id, g)| {
            if g.is_empty() {
                trace!(cellid = %id, "empty clip");
                return None;
            }
            Some(CellClip::new(id, g))
        })
        .collect();
    if settings.return_all_matches {
        raw.sort_by_key(|c| c.cellid);
        raw
    } else {
        resolve_ownership(raw)
    }
}

fn clip_points(
    points: &[PointZ],
    cells: &CellPolygons,
    candidates: &[CellId],
    settings: &ClipSettings,
) -> Vec<ClippedCell> {
    let clips = candidates
        .iter()
        .filter_map(|&id| Some((id, PointClip::clip(points, cells.get(id)?))));
    resolve(settings, clips)
    .into_iter()
    .map(|CellClip { cellid, mut geometry }| {
        if !settings.return_all_matches {
            geometry.collapse_duplicates();
        }
        ClippedCell {
            cellid,
            geometry: geometry.to_geometry(),
            length: None,
            area: None,
            z: geometry.first_z(),
        }
    })
    .collect()
}

fn clip_lines(
    parts: &[LineString<f64>],
    cells: &CellPolygons,
    candidates: &[CellId],
    settings: &ClipSettings,
) -> Vec<ClippedCell> {
    let (ids, polygons): (Vec<CellId>, Vec<&Polygon<f64>>) = candidates
        .iter()
        .filter_map(|&id| Some((id, cells.get(id)?)))
        .unzip();
    let clips = ids.into_iter().zip(LineClip::clip_cells(parts, &polygons));
    resolve(settings, clips)
    .into_iter()
    .map(|CellClip { cellid, geometry }| {
        let lines = match <[LineString<f64>; 1]>::try_from(geometry.to_lines(parts).0) {
            Ok([single]) => Geometry::LineString(single),
            Err(many) => Geometry::MultiLineString(MultiLineString::new(many)),
        };
        ClippedCell {
            cellid,
            geometry: lines,
            length: Some(geometry.length(parts)),
            area: None,
            z: None,
        }
    })
    .collect()
}

fn clip_polygons(
    shape: &MultiPolygon<f64>,
    cells: &CellPolygons,
    candidates: &[CellId],
    settings: &ClipSettings,
) -> Vec<ClippedCell> {
    let clips = candidates.iter().filter_map(|&id| {
        let cell = cells.get(id)?;
        Some((id, PolygonClip::clip(shape, cell, cells.area(id))))
    });
    resolve(settings, clips)
    .into_iter()
    .filter(|c| {
        let keep = !settings.contains_centroid || c.geometry.covers(&cells.centroid(c.cellid));
        if !keep {
            trace!(cellid = %c.cellid, "centroid not covered");
        }
        keep
    })
    .filter(|c| {
        let keep = settings
            .min_area_fraction
            .is_none_or(|f| c.geometry.area_fraction() >= f);
        if !keep {
            trace!(cellid = %c.cellid, "below minimum area fraction");
        }
        keep
    })
    .map(|CellClip { cellid, geometry }| {
        let area = geometry.area();
        let geometry = match <[Polygon<f64>; 1]>::try_from(geometry.into_polygons().0) {
            Ok([single]) => Geometry::Polygon(single),
            Err(many) => Geometry::MultiPolygon(MultiPolygon::new(many)),
        };
        ClippedCell {
            cellid,
            geometry,
            length: None,
            area: Some(area),
            z: None,
        }
    })
    .collect()
}
