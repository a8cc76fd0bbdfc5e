//! Linestring and multilinestring clipping.
//!
//! A clip is stored as parameter intervals along the segments of the source
//! lines rather than as coordinates. Two cells that both claim a stretch of
//! a line lying on their shared edge then hold intervals of the very same
//! segment, and ownership reduces to interval subtraction.

use crate::ownership::ClipPart;
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{
    BoundingRect, Closest, ClosestPoint, Coord, Intersects, Line, LineString, MultiLineString,
    Point, Polygon, Rect,
};

/// Pieces shorter than this fraction of their segment are dropped.
const T_EPS: f64 = 1e-9;

/// The stretch `[t0, t1]` of one segment of one source line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePiece {
    /// Index of the source linestring.
    pub part: usize,
    /// Index of the segment within that linestring.
    pub segment: usize,
    /// Start parameter in `[0, 1]`.
    pub t0: f64,
    /// End parameter in `[0, 1]`, greater than `t0`.
    pub t1: f64,
}

/// The part of a set of source lines inside one cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineClip {
    pieces: Vec<LinePiece>,
}

impl LineClip {
    /// Clip `parts` against `cell`.
    ///
    /// Every segment is split at its crossings with the cell's rings, and
    /// the sub-pieces whose midpoint is inside or on the boundary are kept.
    /// Zero-length touches produce no piece.
    pub fn clip(parts: &[LineString<f64>], cell: &Polygon<f64>) -> Self {
        Self::clip_cells(parts, &[cell]).pop().unwrap_or_default()
    }

    /// Clip `parts` against several cells at once, one clip per cell in
    /// input order.
    ///
    /// Each segment is split at its crossings with the rings of every cell
    /// near it, so all cells see the same windows. A window goes to each
    /// cell holding its midpoint, inside or on the boundary. Neighbouring
    /// cells share their edge coordinates, so a window inside the union of
    /// the cells always lands in at least one of them, however closely the
    /// line follows a shared edge. A window whose rounded midpoint misses
    /// every cell by less than a billionth of its segment length goes to
    /// the closest cell.
    pub fn clip_cells(parts: &[LineString<f64>], cells: &[&Polygon<f64>]) -> Vec<Self> {
        let rects: Vec<Option<Rect<f64>>> = cells.iter().map(|c| c.bounding_rect()).collect();
        let mut clips = vec![Self::default(); cells.len()];
        let mut near: Vec<usize> = Vec::new();
        for (part, ls) in parts.iter().enumerate() {
            for (segment, line) in ls.lines().enumerate() {
                let reach = line.bounding_rect();
                near.clear();
                near.extend(
                    rects
                        .iter()
                        .enumerate()
                        .filter(|(_, r)| r.is_some_and(|r| r.intersects(&reach)))
                        .map(|(i, _)| i),
                );
                let ts = breakpoints(line, near.iter().map(|&i| cells[i]));
                for w in ts.windows(2) {
                    let (t0, t1) = (w[0], w[1]);
                    if t1 - t0 <= T_EPS {
                        continue;
                    }
                    let mid = point_at(line, 0.5 * (t0 + t1));
                    let mut claimed = false;
                    for &i in &near {
                        let inside = rects[i].is_some_and(|r| r.intersects(&mid))
                            && cells[i].coordinate_position(&mid) != CoordPos::Outside;
                        if inside {
                            clips[i].extend(part, segment, t0, t1);
                            claimed = true;
                        }
                    }
                    // A midpoint rounded off a shared edge the line runs along.
                    if !claimed {
                        let tolerance = T_EPS * line.dx().hypot(line.dy());
                        if let Some(i) = nearest_cell(&near, cells, mid, tolerance) {
                            clips[i].extend(part, segment, t0, t1);
                        }
                    }
                }
            }
        }
        clips
    }

    fn extend(&mut self, part: usize, segment: usize, t0: f64, t1: f64) {
        match self.pieces.last_mut() {
            Some(last) if last.part == part && last.segment == segment && last.t1 == t0 => {
                last.t1 = t1;
            }
            _ => self.pieces.push(LinePiece {
                part,
                segment,
                t0,
                t1,
            }),
        }
    }

    /// Kept pieces in source order.
    pub fn pieces(&self) -> &[LinePiece] {
        &self.pieces
    }

    /// Total Euclidean length of the kept pieces.
    pub fn length(&self, parts: &[LineString<f64>]) -> f64 {
        self.pieces
            .iter()
            .map(|p| {
                let line = segment(parts, p);
                (p.t1 - p.t0) * line.dx().hypot(line.dy())
            })
            .sum()
    }

    /// Re-chain the kept pieces into polylines.
    ///
    /// Consecutive pieces join when they continue one another along the
    /// same source line.
    pub fn to_lines(&self, parts: &[LineString<f64>]) -> MultiLineString<f64> {
        let mut lines = Vec::new();
        let mut current: Vec<Coord<f64>> = Vec::new();
        let mut prev: Option<LinePiece> = None;
        for p in &self.pieces {
            let line = segment(parts, p);
            let joins = prev.is_some_and(|q| {
                q.part == p.part
                    && ((q.segment == p.segment && (p.t0 - q.t1).abs() <= T_EPS)
                        || (q.segment + 1 == p.segment && q.t1 >= 1.0 - T_EPS && p.t0 <= T_EPS))
            });
            if !joins {
                if current.len() >= 2 {
                    lines.push(LineString::new(std::mem::take(&mut current)));
                }
                current.clear();
                current.push(point_at(line, p.t0));
            }
            current.push(point_at(line, p.t1));
            prev = Some(*p);
        }
        if current.len() >= 2 {
            lines.push(LineString::new(current));
        }
        MultiLineString::new(lines)
    }
}

impl ClipPart for LineClip {
    fn subtract(&self, others: &[&Self]) -> Self {
        let mut pieces = Vec::with_capacity(self.pieces.len());
        for p in &self.pieces {
            let mut cuts: Vec<(f64, f64)> = others
                .iter()
                .flat_map(|o| o.pieces.iter())
                .filter(|q| {
                    q.part == p.part && q.segment == p.segment && q.t0 < p.t1 && q.t1 > p.t0
                })
                .map(|q| (q.t0, q.t1))
                .collect();
            cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut start = p.t0;
            for (c0, c1) in cuts {
                if c0 - start > T_EPS {
                    pieces.push(LinePiece { t0: start, t1: c0, ..*p });
                }
                start = start.max(c1);
                if start >= p.t1 {
                    break;
                }
            }
            if p.t1 - start > T_EPS {
                pieces.push(LinePiece { t0: start, ..*p });
            }
        }
        Self { pieces }
    }

    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

fn segment(parts: &[LineString<f64>], p: &LinePiece) -> Line<f64> {
    let coords = &parts[p.part].0;
    Line::new(coords[p.segment], coords[p.segment + 1])
}

fn point_at(line: Line<f64>, t: f64) -> Coord<f64> {
    if t <= 0.0 {
        line.start
    } else if t >= 1.0 {
        line.end
    } else {
        line.start + line.delta() * t
    }
}

/// The cell of `near` closest to `at`, if within `tolerance`. Ties go to
/// the first.
fn nearest_cell(
    near: &[usize],
    cells: &[&Polygon<f64>],
    at: Coord<f64>,
    tolerance: f64,
) -> Option<usize> {
    let target = Point::from(at);
    near.iter()
        .filter_map(|&i| match cells[i].closest_point(&target) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => {
                Some((i, (p.x() - at.x).hypot(p.y() - at.y)))
            }
            Closest::Indeterminate => None,
        })
        .filter(|&(_, d)| d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Sorted split parameters of `line`: its ends plus every crossing with
/// the rings of `cells`, with near-duplicates merged.
fn breakpoints<'a>(line: Line<f64>, cells: impl Iterator<Item = &'a Polygon<f64>>) -> Vec<f64> {
    let d = line.delta();
    let len2 = d.x * d.x + d.y * d.y;
    if len2 == 0.0 {
        return Vec::new();
    }
    let param = |c: Coord<f64>| {
        (((c.x - line.start.x) * d.x + (c.y - line.start.y) * d.y) / len2).clamp(0.0, 1.0)
    };

    let mut ts = vec![0.0, 1.0];
    for cell in cells {
        for ring in std::iter::once(cell.exterior()).chain(cell.interiors()) {
            for edge in ring.lines().filter(|e| e.start != e.end) {
                match line_intersection(line, edge) {
                    Some(LineIntersection::SinglePoint { intersection, .. }) => {
                        ts.push(param(intersection));
                    }
                    Some(LineIntersection::Collinear { intersection }) => {
                        ts.push(param(intersection.start));
                        ts.push(param(intersection.end));
                    }
                    None => {}
                }
            }
        }
    }
    ts.sort_by(f64::total_cmp);
    ts.dedup_by(|later, earlier| *later - *earlier <= T_EPS);
    if let Some(last) = ts.last_mut() {
        *last = 1.0;
    }
    ts
}
